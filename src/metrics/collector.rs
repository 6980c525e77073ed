// src/metrics/collector.rs
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;

use crate::health::{CheckResult, Decision};

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Check metrics
    pub checks_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,

    // Endpoint metrics
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,

    // Aggregate state
    pub healthy: IntGauge,
    pub targets: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("status_checks_total", "Total number of dependency checks"),
            &["target", "importance", "status"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "status_check_duration_seconds",
                "Dependency check duration in seconds",
            ),
            &["target"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let requests_total = IntCounterVec::new(
            Opts::new("status_requests_total", "Total number of endpoint requests"),
            &["endpoint", "status_code"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "status_request_duration_seconds",
                "Endpoint request duration in seconds",
            ),
            &["endpoint"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let healthy = IntGauge::new(
            "status_healthy",
            "Aggregate decision of the last check pass (1=healthy, 0=unhealthy)",
        )?;
        registry.register(Box::new(healthy.clone()))?;

        let targets = IntGauge::new("status_targets", "Number of registered targets")?;
        registry.register(Box::new(targets.clone()))?;

        Ok(Self {
            checks_total,
            check_duration_seconds,
            requests_total,
            request_duration_seconds,
            healthy,
            targets,
        })
    }

    pub fn record_check(&self, result: &CheckResult) {
        let target = result.target.name.as_str();
        self.checks_total
            .with_label_values(&[
                target,
                result.target.importance.as_str(),
                result.status().as_str(),
            ])
            .inc();

        self.check_duration_seconds
            .with_label_values(&[target])
            .observe(result.elapsed.as_secs_f64());
    }

    pub fn record_request(&self, endpoint: &str, status_code: u16, duration: Duration) {
        let status = status_code.to_string();
        self.requests_total
            .with_label_values(&[endpoint, &status])
            .inc();

        self.request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration.as_secs_f64());
    }

    pub fn update_decision(&self, decision: Decision) {
        let value = if decision.is_healthy() { 1 } else { 0 };
        self.healthy.set(value);
    }

    pub fn update_target_count(&self, count: usize) {
        self.targets.set(count as i64);
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
