//! # verdict-tests
//!
//! Shared fixtures for the end-to-end, property and adversarial suites:
//! the shipped rubric, throwaway repositories with a known shape, and
//! benches of scripted judges.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use verdict_bench::{Bench, RetryPolicy, SimulatedJudge};
use verdict_pipeline::AuditConfig;
use verdict_types::{Rubric, Score};

// ---------------------------------------------------------------------------
// Rubric
// ---------------------------------------------------------------------------

/// Path of the rubric shipped at the workspace root.
pub fn workspace_rubric_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../rubric.json")
}

pub fn workspace_rubric() -> Rubric {
    Rubric::load(workspace_rubric_path()).unwrap()
}

// ---------------------------------------------------------------------------
// Repository fixtures
// ---------------------------------------------------------------------------

pub const STATE_PY: &str = "\
import operator
from typing import Annotated, TypedDict
from pydantic import BaseModel

class Evidence(BaseModel):
    found: bool
    location: str

class JudicialOpinion(BaseModel):
    score: int
    argument: str

class AgentState(TypedDict):
    evidences: Annotated[dict, operator.ior]
    opinions: Annotated[list, operator.add]
";

pub const GRAPH_PY: &str = "\
from langgraph.graph import StateGraph, START, END

builder = StateGraph(AgentState)
builder.add_node('repo_investigator', repo_node)
builder.add_node('doc_analyst', doc_node)
builder.add_node('evidence_aggregator', aggregate)
builder.add_edge(START, 'repo_investigator')
builder.add_edge(START, 'doc_analyst')
builder.add_edge(['repo_investigator', 'doc_analyst'], 'evidence_aggregator')
builder.add_edge('evidence_aggregator', END)
";

pub const SAFE_TOOLS_PY: &str = "\
import subprocess, tempfile
d = tempfile.mkdtemp()
subprocess.run(['git', 'clone', URL, d], capture_output=True)
";

pub const UNSAFE_TOOLS_PY: &str = "\
import os

def clone(url):
    os.system('git clone ' + url)
";

pub const JUDGES_PY: &str = "\
from src.state import JudicialOpinion

PROSECUTOR_PROMPT = 'Trust nothing. Hunt for security flaws, missing reducers and hallucinated claims.'
DEFENSE_PROMPT = 'Reward effort and intent; highlight creative workarounds in the git history.'
TECH_LEAD_PROMPT = 'Judge maintainability and architectural soundness pragmatically.'

llm = ChatModel().with_structured_output(JudicialOpinion)
";

pub const RULES_PY: &str = "\
def apply_security_override(score, evidence):
    return min(score, 3)

def fact_supremacy(opinions):
    return [o for o in opinions if o.cited]

def functionality_weight(ops):
    return sum(ops) / len(ops)

def dissent_summary(scores):
    return max(scores) - min(scores) > 2
";

pub const REPORT_MD: &str = "\
# Architecture

The graph in src/graph.py implements fan-out because every detective runs in
parallel against the same state.

Fan-in happens at the evidence aggregation node; the design ensures that no
judge sees partial evidence.

Dialectical synthesis is implemented as three personas whose disagreement the
chief justice resolves with deterministic rules, because a model should not
referee itself.

Typed state lives in src/state.py.
";

/// A throwaway repository directory.
pub struct FixtureRepo {
    dir: TempDir,
}

impl FixtureRepo {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A repository every file protocol scores well.
    pub fn well_built() -> Self {
        Self::empty()
            .with_file("src/state.py", STATE_PY)
            .with_file("src/graph.py", GRAPH_PY)
            .with_file("src/tools/repo_tools.py", SAFE_TOOLS_PY)
            .with_file("src/nodes/judges.py", JUDGES_PY)
            .with_file("src/rules.py", RULES_PY)
    }

    pub fn with_file(self, relative: &str, body: &str) -> Self {
        let full = self.dir.path().join(relative);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, body).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Locator the pipeline accepts for this repository.
    pub fn locator(&self) -> String {
        self.dir.path().display().to_string()
    }

    /// `git init` and commit every file, one commit per `(subject,
    /// author_time)` step. Files are all staged by the first commit; later
    /// steps are empty commits.
    pub fn commit_steps(self, steps: &[(&str, i64)]) -> Self {
        git(self.path(), &["init", "--quiet"], None);
        git(self.path(), &["add", "--all"], None);
        for (index, (subject, time)) in steps.iter().enumerate() {
            let mut args = vec!["commit", "--quiet", "-m", subject];
            if index > 0 {
                args.push("--allow-empty");
            }
            git(self.path(), &args, Some(*time));
        }
        self
    }
}

fn git(dir: &Path, args: &[&str], time: Option<i64>) {
    let mut command = Command::new("git");
    command
        .args(["-c", "user.name=Fixture", "-c", "user.email=fixture@example.com", "-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir);
    if let Some(time) = time {
        let stamp = format!("@{time} +0000");
        command
            .env("GIT_AUTHOR_DATE", &stamp)
            .env("GIT_COMMITTER_DATE", &stamp);
    }
    let status = command.status().unwrap();
    assert!(status.success(), "git {args:?} failed");
}

/// Whether a usable `git` binary is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Benches
// ---------------------------------------------------------------------------

pub fn score(value: i64) -> Score {
    Score::new(value).unwrap()
}

/// No retries, short deadline, no backoff.
pub fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 1,
        backoff: Duration::ZERO,
        timeout: Duration::from_millis(200),
    }
}

pub fn bench_of(judges: Vec<SimulatedJudge>) -> Bench {
    judges
        .into_iter()
        .fold(Bench::new(quick_policy()), |bench, judge| bench.with_judge(Arc::new(judge)))
}

/// Fast config pointed at the shipped rubric.
pub fn test_config() -> AuditConfig {
    AuditConfig {
        rubric_path: workspace_rubric_path(),
        ..AuditConfig::fast()
    }
}
