use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report to {path}: {message}")]
    Io { path: String, message: String },

    #[error("report serialisation failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: unreadable score '{value}'")]
    Score { line: usize, value: String },
}
