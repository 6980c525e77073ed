// src/health/target.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::probe::Probe;

/// How much a target's failure matters to the aggregate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Failure is reported but the service stays healthy.
    Low,
    /// Failure makes the whole service unhealthy.
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::High => "high",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named dependency probe. Targets are identified by their position in
/// the registry, so two targets may share a name.
#[derive(Clone, Serialize)]
pub struct Target {
    pub name: String,
    pub importance: Importance,
    #[serde(skip)]
    probe: Arc<dyn Probe>,
}

impl Target {
    pub fn new(name: impl Into<String>, importance: Importance, probe: Arc<dyn Probe>) -> Self {
        Self {
            name: name.into(),
            importance,
            probe,
        }
    }

    pub fn probe(&self) -> &Arc<dyn Probe> {
        &self.probe
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("importance", &self.importance)
            .finish_non_exhaustive()
    }
}
