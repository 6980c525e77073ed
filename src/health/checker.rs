// src/health/checker.rs
use crate::metrics::MetricsCollector;
use std::sync::Arc;
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::context::CheckContext;
use super::decision::decide;
use super::registry::Registry;
use super::result::{CheckResult, Outcome};
use super::target::Target;

/// Runs every registered probe concurrently and collects one result per
/// target, in registration order.
#[derive(Clone)]
pub struct HealthChecker {
    targets: Arc<[Target]>,
    metrics: Option<Arc<MetricsCollector>>,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("check worker for target {target:?} failed: {source}")]
    Worker {
        target: String,
        #[source]
        source: JoinError,
    },
}

impl std::fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthChecker")
            .field("targets", &self.targets)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl HealthChecker {
    pub fn new(registry: Registry) -> Self {
        let targets: Vec<Target> = registry.into();
        Self {
            targets: targets.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        metrics.update_target_count(self.targets.len());
        self.metrics = Some(metrics);
        self
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// One orchestration pass. Probe failures come back as `Fail` outcomes;
    /// an `Err` means a worker itself broke (it panicked).
    pub async fn check(&self, ctx: &CheckContext) -> Result<Vec<CheckResult>, CheckError> {
        if self.targets.is_empty() {
            return Ok(Vec::new());
        }

        // Probes still running once the pass is over (or abandoned) see a
        // cancelled context.
        let pass = ctx.child();
        let _cancel_on_exit = pass.drop_guard();

        let tasks: Vec<_> = self
            .targets
            .iter()
            .cloned()
            .map(|target| tokio::spawn(check_target(target, pass.clone())))
            .collect();

        // join_all keeps the order of `tasks`, so slot i belongs to target i
        // whatever the completion order was.
        let joined = futures::future::join_all(tasks).await;

        let mut results = Vec::with_capacity(joined.len());
        for (target, outcome) in self.targets.iter().zip(joined) {
            match outcome {
                Ok(result) => results.push(result),
                Err(source) => {
                    return Err(CheckError::Worker {
                        target: target.name.clone(),
                        source,
                    })
                }
            }
        }

        self.report(&results);
        Ok(results)
    }

    fn report(&self, results: &[CheckResult]) {
        let mut failed = 0;
        for result in results {
            match &result.outcome {
                Outcome::Ok => debug!(
                    target_name = %result.target.name,
                    elapsed = ?result.elapsed,
                    "check passed"
                ),
                Outcome::Fail(message) => {
                    failed += 1;
                    warn!(
                        target_name = %result.target.name,
                        importance = %result.target.importance,
                        elapsed = ?result.elapsed,
                        "check failed: {}",
                        message
                    );
                }
            }
        }

        if let Some(metrics) = &self.metrics {
            for result in results {
                metrics.record_check(result);
            }
            metrics.update_decision(decide(results));
        }

        debug!(
            "Check pass complete: {} ok, {} failed",
            results.len() - failed,
            failed
        );
    }
}

async fn check_target(target: Target, ctx: CheckContext) -> CheckResult {
    let start = Instant::now();
    let outcome = target.probe().check(ctx).await;
    let elapsed = start.elapsed();

    let outcome = match outcome {
        Ok(()) => Outcome::Ok,
        Err(e) => Outcome::Fail(e.to_string()),
    };

    CheckResult {
        target,
        outcome,
        elapsed,
    }
}
