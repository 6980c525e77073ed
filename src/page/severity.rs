// src/page/severity.rs
use serde::Serialize;

use crate::health::{CheckResult, Importance, Outcome};

/// Three-way presentation class for a target. Unlike the aggregate
/// decision, a failing low-importance target is visible as a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Fail,
}

impl Severity {
    pub fn of(result: &CheckResult) -> Self {
        match (&result.outcome, result.target.importance) {
            (Outcome::Ok, _) => Severity::Ok,
            (Outcome::Fail(_), Importance::High) => Severity::Fail,
            (Outcome::Fail(_), Importance::Low) => Severity::Warning,
        }
    }
}
