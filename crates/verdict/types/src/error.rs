/// Errors raised while loading or validating a rubric.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RubricError {
    #[error("cannot read rubric {path}: {message}")]
    Io { path: String, message: String },
    #[error("rubric parse error: {0}")]
    Parse(String),
    #[error("rubric has no dimensions")]
    Empty,
    #[error("duplicate criterion id: {0}")]
    DuplicateCriterion(String),
    #[error("unknown criterion id: {0}")]
    UnknownCriterion(String),
    #[error("invalid rubric: {0}")]
    Invalid(String),
}
