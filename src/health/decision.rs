// src/health/decision.rs
use super::result::CheckResult;
use super::target::Importance;

/// Two-state verdict used for the health endpoint's status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Healthy,
    Unhealthy,
}

impl Decision {
    pub fn is_healthy(&self) -> bool {
        *self == Decision::Healthy
    }
}

/// Unhealthy if and only if some high-importance target failed. Low
/// importance failures never change the verdict.
pub fn decide(results: &[CheckResult]) -> Decision {
    let high_failure = results
        .iter()
        .any(|result| result.target.importance == Importance::High && !result.is_ok());

    if high_failure {
        Decision::Unhealthy
    } else {
        Decision::Healthy
    }
}
