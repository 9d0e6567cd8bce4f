use crate::syntax::ParseError;
use std::time::Duration;

/// Errors raised while materialising or analysing an evidence source.
///
/// All of them are recoverable: the pipeline turns each into low-confidence
/// synthetic evidence for the criteria the failing extractor owns.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    /// `git clone` exited non-zero.
    #[error("clone of '{locator}' failed: {stderr}")]
    CloneFailed { locator: String, stderr: String },

    /// An external process exceeded its wall-clock budget and was killed.
    #[error("'{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// An external process could not be started or awaited.
    #[error("failed to run '{command}': {message}")]
    Spawn { command: String, message: String },

    /// Program source could not be parsed.
    #[error("{path}: {source}")]
    Parse { path: String, source: ParseError },

    #[error("i/o error on {path}: {message}")]
    Io { path: String, message: String },

    /// The document format has no text representation available.
    #[error("unsupported document: {0}")]
    UnsupportedDocument(String),

    /// A source the extractor depends on was never materialised.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The diagram classifier failed.
    #[error("classification failed: {0}")]
    Classification(String),
}

impl ExtractionError {
    pub(crate) fn io(path: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = ExtractionError::CloneFailed {
            locator: "https://example.invalid/r.git".into(),
            stderr: "repository not found".into(),
        };
        assert_eq!(
            e.to_string(),
            "clone of 'https://example.invalid/r.git' failed: repository not found"
        );

        let e = ExtractionError::Timeout {
            command: "git clone".into(),
            timeout: Duration::from_secs(90),
        };
        assert_eq!(e.to_string(), "'git clone' timed out after 90s");

        let e = ExtractionError::Parse {
            path: "src/graph.py".into(),
            source: ParseError {
                line: 3,
                message: "expected ':'".into(),
            },
        };
        assert_eq!(
            e.to_string(),
            "src/graph.py: syntax error at line 3: expected ':'"
        );
    }

    #[test]
    fn error_is_clone_and_comparable() {
        let e = ExtractionError::UnsupportedDocument("report.pdf".into());
        assert_eq!(e.clone(), e);
    }
}
