// src/health/result.rs
use serde::{Serialize, Serializer};
use std::time::Duration;

use super::target::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Fail(String),
}

/// What one probe reported during one orchestration pass.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub target: Target,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl CheckResult {
    pub fn status(&self) -> Status {
        match self.outcome {
            Outcome::Ok => Status::Ok,
            Outcome::Fail(_) => Status::Fail,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Ok
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Ok => None,
            Outcome::Fail(message) => Some(message),
        }
    }
}

// Wire form: {"target":{..},"status":"fail","error":"..","duration":123}
// `duration` is in nanoseconds and left out when zero.
#[derive(Serialize)]
struct WireResult<'a> {
    target: &'a Target,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
}

impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX);
        WireResult {
            target: &self.target,
            status: self.status(),
            error: self.error(),
            duration: (nanos > 0).then_some(nanos),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{CheckContext, Importance, ProbeError};
    use std::sync::Arc;

    fn target(name: &str, importance: Importance) -> Target {
        let probe = |_: CheckContext| async { Ok::<(), ProbeError>(()) };
        Target::new(name, importance, Arc::new(probe))
    }

    #[test]
    fn failed_result_carries_error_and_duration() {
        let result = CheckResult {
            target: target("db", Importance::High),
            outcome: Outcome::Fail("connection refused".into()),
            elapsed: Duration::from_millis(3),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target": {"name": "db", "importance": "high"},
                "status": "fail",
                "error": "connection refused",
                "duration": 3_000_000u64,
            })
        );
    }

    #[test]
    fn ok_result_omits_error_and_zero_duration() {
        let result = CheckResult {
            target: target("cache", Importance::Low),
            outcome: Outcome::Ok,
            elapsed: Duration::ZERO,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target": {"name": "cache", "importance": "low"},
                "status": "ok",
            })
        );
    }
}
