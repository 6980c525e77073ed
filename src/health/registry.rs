// src/health/registry.rs
use std::sync::Arc;

use super::checker::HealthChecker;
use super::probe::Probe;
use super::target::{Importance, Target};

/// Ordered, append-only list of targets. Names are not validated, so empty
/// or repeated names are kept as they are.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    targets: Vec<Target>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target<P>(mut self, name: impl Into<String>, importance: Importance, probe: P) -> Self
    where
        P: Probe + 'static,
    {
        self.targets.push(Target::new(name, importance, Arc::new(probe)));
        self
    }

    /// Same as [`Registry::with_target`] for a probe that is already shared.
    pub fn with_shared_target(
        mut self,
        name: impl Into<String>,
        importance: Importance,
        probe: Arc<dyn Probe>,
    ) -> Self {
        self.targets.push(Target::new(name, importance, probe));
        self
    }

    /// Freeze the registry. The checker can be shared across request tasks.
    pub fn build(self) -> HealthChecker {
        HealthChecker::new(self)
    }
}

impl From<Registry> for Vec<Target> {
    fn from(registry: Registry) -> Self {
        registry.targets
    }
}
