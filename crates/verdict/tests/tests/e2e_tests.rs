#[path = "e2e/full_audit.rs"]
mod full_audit;

#[path = "e2e/git_history.rs"]
mod git_history;

#[path = "e2e/degraded_evidence.rs"]
mod degraded_evidence;
