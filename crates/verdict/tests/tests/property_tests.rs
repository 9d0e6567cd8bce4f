#[path = "property/evidence_merge.rs"]
mod evidence_merge;

#[path = "property/adjudication.rs"]
mod adjudication;

#[path = "property/report_scores.rs"]
mod report_scores;
