use thiserror::Error;
use verdict_report::ReportError;
use verdict_types::RubricError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("judge '{id}': {reason}")]
    InvalidJudge { id: String, reason: String },

    #[error("judge '{0}' is declared more than once")]
    DuplicateJudge(String),

    #[error("no judges configured")]
    NoJudges,

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fatal pipeline errors. Extraction and judgment failures never surface
/// here; they degrade the report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Rubric(#[from] RubricError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
