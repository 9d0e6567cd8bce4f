//! Audit configuration (TOML).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use verdict_bench::{Bench, CommandJudge, HeuristicJudge, Judge, Posture, RetryPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeKind {
    Heuristic,
    Command,
}

/// One `[[judges]]` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JudgeSpec {
    pub id: String,
    pub kind: JudgeKind,
    /// Required for `heuristic` judges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture: Option<Posture>,
    /// Required for `command` judges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl JudgeSpec {
    pub fn heuristic(id: impl Into<String>, posture: Posture) -> Self {
        Self {
            id: id.into(),
            kind: JudgeKind::Heuristic,
            posture: Some(posture),
            program: None,
            args: Vec::new(),
        }
    }

    pub fn command(id: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            id: id.into(),
            kind: JudgeKind::Command,
            posture: None,
            program: Some(program.into()),
            args,
        }
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidJudge {
            id: self.id.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(self.invalid("empty id"));
        }
        match self.kind {
            JudgeKind::Heuristic if self.posture.is_none() => Err(self.invalid("heuristic judge needs a posture")),
            JudgeKind::Command if self.program.as_deref().map_or(true, |p| p.trim().is_empty()) => {
                Err(self.invalid("command judge needs a program"))
            }
            _ => Ok(()),
        }
    }

    /// Instantiate the judge. Command judges get `timeout` as their process
    /// deadline.
    pub fn build(&self, timeout: Duration) -> Result<Arc<dyn Judge>, ConfigError> {
        self.validate()?;
        match (self.kind, self.posture, self.program.as_deref()) {
            (JudgeKind::Heuristic, Some(posture), _) => Ok(Arc::new(HeuristicJudge::new(self.id.as_str(), posture))),
            (JudgeKind::Command, _, Some(program)) => Ok(Arc::new(
                CommandJudge::new(self.id.as_str(), program, timeout).with_args(self.args.iter().cloned()),
            )),
            _ => Err(self.invalid("incomplete judge declaration")),
        }
    }
}

/// The default bench: one judge per posture.
pub fn default_roster() -> Vec<JudgeSpec> {
    vec![
        JudgeSpec::heuristic("prosecutor", Posture::Strict),
        JudgeSpec::heuristic("defense", Posture::Lenient),
        JudgeSpec::heuristic("tech_lead", Posture::Pragmatic),
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub clone_timeout_secs: u64,
    pub git_log_timeout_secs: u64,
    pub judge_timeout_secs: u64,
    pub judge_max_attempts: u32,
    pub judge_retry_backoff_ms: u64,
    pub rubric_path: PathBuf,
    pub judges: Vec<JudgeSpec>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            clone_timeout_secs: 90,
            git_log_timeout_secs: 15,
            judge_timeout_secs: 120,
            judge_max_attempts: 2,
            judge_retry_backoff_ms: 2000,
            rubric_path: PathBuf::from("rubric.json"),
            judges: default_roster(),
        }
    }
}

impl AuditConfig {
    /// Generous deadlines and an extra retry, for slow external judges.
    pub fn strict() -> Self {
        Self {
            clone_timeout_secs: 180,
            git_log_timeout_secs: 30,
            judge_timeout_secs: 300,
            judge_max_attempts: 3,
            judge_retry_backoff_ms: 5000,
            ..Self::default()
        }
    }

    /// Tight deadlines and no retries, for local runs and tests.
    pub fn fast() -> Self {
        Self {
            clone_timeout_secs: 30,
            git_log_timeout_secs: 5,
            judge_timeout_secs: 20,
            judge_max_attempts: 1,
            judge_retry_backoff_ms: 100,
            ..Self::default()
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.judges.is_empty() {
            return Err(ConfigError::NoJudges);
        }
        let mut seen = BTreeSet::new();
        for judge in &self.judges {
            judge.validate()?;
            if !seen.insert(judge.id.as_str()) {
                return Err(ConfigError::DuplicateJudge(judge.id.clone()));
            }
        }
        if self.judge_max_attempts == 0 {
            return Err(ConfigError::Invalid("judge_max_attempts must be at least 1".into()));
        }
        if self.clone_timeout_secs == 0 || self.git_log_timeout_secs == 0 || self.judge_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".into()));
        }
        Ok(())
    }

    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }

    pub fn git_log_timeout(&self) -> Duration {
        Duration::from_secs(self.git_log_timeout_secs)
    }

    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.judge_max_attempts,
            backoff: Duration::from_millis(self.judge_retry_backoff_ms),
            timeout: self.judge_timeout(),
        }
    }

    /// The configured judges behind this config's retry policy.
    pub fn build_bench(&self) -> Result<Bench, ConfigError> {
        self.validate()?;
        let mut bench = Bench::new(self.retry_policy());
        for spec in &self.judges {
            bench = bench.with_judge(spec.build(self.judge_timeout())?);
        }
        Ok(bench)
    }
}
