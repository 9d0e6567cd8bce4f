use std::time::Duration;
use verdict_types::JudgeId;

/// Why a judge failed to produce a usable opinion.
///
/// Every variant is recoverable: the bench retries, and on persistent
/// failure the criterion is adjudicated with the remaining opinions.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum JudgmentError {
    /// The response did not have the opinion shape, or its score was out of
    /// range.
    #[error("judge {judge} returned a malformed opinion: {message}")]
    Malformed { judge: JudgeId, message: String },

    #[error("judge {judge} timed out after {timeout:?}")]
    Timeout { judge: JudgeId, timeout: Duration },

    /// The judge could not be reached (process spawn, non-zero exit...).
    #[error("judge {judge} unreachable: {message}")]
    Transport { judge: JudgeId, message: String },

    /// The opinion answered a different judge or criterion than asked.
    #[error("judge {judge} answered for {got}, expected {expected}")]
    Mismatch {
        judge: JudgeId,
        expected: String,
        got: String,
    },
}

impl JudgmentError {
    pub fn judge(&self) -> &JudgeId {
        match self {
            Self::Malformed { judge, .. }
            | Self::Timeout { judge, .. }
            | Self::Transport { judge, .. }
            | Self::Mismatch { judge, .. } => judge,
        }
    }
}

/// Errors loading or checking persona charters.
#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid persona file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("at least two personas are required, found {0}")]
    TooFew(usize),
}
