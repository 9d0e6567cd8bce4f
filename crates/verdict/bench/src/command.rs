//! Judges that live in an external program.
//!
//! Protocol: the [`JudgmentRequest`] is written to stdin as JSON; the program
//! answers on stdout with `{"score", "argument", "cited_evidence"}` and exits
//! zero.

use crate::error::JudgmentError;
use crate::judge::{Judge, JudgmentRequest, JudgmentResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use verdict_forensics::{ExtractionError, ProcessRunner};
use verdict_types::{JudgeId, Opinion};

pub struct CommandJudge {
    id: JudgeId,
    program: String,
    args: Vec<String>,
    runner: ProcessRunner,
}

impl CommandJudge {
    pub fn new(id: impl Into<JudgeId>, program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            id: id.into(),
            program: program.into(),
            args: Vec::new(),
            runner: ProcessRunner::new(timeout),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn transport(&self, err: ExtractionError) -> JudgmentError {
        match err {
            ExtractionError::Timeout { timeout, .. } => JudgmentError::Timeout {
                judge: self.id.clone(),
                timeout,
            },
            other => JudgmentError::Transport {
                judge: self.id.clone(),
                message: other.to_string(),
            },
        }
    }
}

#[async_trait]
impl Judge for CommandJudge {
    fn id(&self) -> &JudgeId {
        &self.id
    }

    #[instrument(skip_all, fields(judge = %self.id, criterion = %request.criterion.id))]
    async fn judge(&self, request: &JudgmentRequest) -> Result<Opinion, JudgmentError> {
        let input = serde_json::to_vec(request).map_err(|e| JudgmentError::Transport {
            judge: self.id.clone(),
            message: format!("request encoding: {e}"),
        })?;
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = self
            .runner
            .run_with_input(&self.program, &args, None, Some(&input))
            .await
            .map_err(|e| self.transport(e))?;
        if !output.success() {
            return Err(JudgmentError::Transport {
                judge: self.id.clone(),
                message: format!(
                    "exit status {:?}: {}",
                    output.status,
                    output.stderr.trim()
                ),
            });
        }
        debug!(bytes = output.stdout.len(), "judge responded");
        let response: JudgmentResponse =
            serde_json::from_str(output.stdout.trim()).map_err(|e| JudgmentError::Malformed {
                judge: self.id.clone(),
                message: e.to_string(),
            })?;
        response.into_opinion(request)
    }
}
