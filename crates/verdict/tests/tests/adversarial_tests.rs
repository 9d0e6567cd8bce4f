#[path = "adversarial/hallucinated_citations.rs"]
mod hallucinated_citations;

#[path = "adversarial/security_scope.rs"]
mod security_scope;

#[path = "adversarial/raw_content_isolation.rs"]
mod raw_content_isolation;

#[path = "adversarial/forged_report.rs"]
mod forged_report;

#[path = "adversarial/unreliable_judges.rs"]
mod unreliable_judges;

#[path = "adversarial/structural_evasion.rs"]
mod structural_evasion;

#[path = "adversarial/repository_authored_text.rs"]
mod repository_authored_text;
