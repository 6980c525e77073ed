// src/health/probe.rs
use async_trait::async_trait;
use std::future::Future;

use super::context::CheckContext;

/// A single dependency check.
///
/// Implementations should watch `ctx` (see [`CheckContext::run`]) so that a
/// cancelled or expired pass returns promptly. The orchestrator never aborts
/// a probe on its own.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, ctx: CheckContext) -> Result<(), ProbeError>;
}

#[async_trait]
impl<F, Fut> Probe for F
where
    F: Fn(CheckContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    async fn check(&self, ctx: CheckContext) -> Result<(), ProbeError> {
        (self)(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("check cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("{0}")]
    Unhealthy(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProbeError {
    pub fn unhealthy(message: impl Into<String>) -> Self {
        ProbeError::Unhealthy(message.into())
    }
}
