// src/health/context.rs
// Cancellation and deadline shared by every probe of one orchestration pass.
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

use super::probe::ProbeError;

#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CheckContext {
    /// A context that never ends on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighten the deadline to `timeout` from now. An earlier deadline
    /// already in place is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Derive a context that is cancelled together with this one but can
    /// also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancels this context when the returned guard is dropped.
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Why the context has ended, or `None` while it is still live.
    pub fn err(&self) -> Option<ProbeError> {
        if self.token.is_cancelled() {
            return Some(ProbeError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ProbeError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ProbeError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => ProbeError::Cancelled,
                _ = sleep_until(deadline) => ProbeError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                ProbeError::Cancelled
            }
        }
    }

    /// Drive `fut` until it completes or the context ends, whichever is
    /// first. An already-ended context never polls `fut`.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ProbeError>
    where
        F: Future<Output = Result<T, ProbeError>>,
    {
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            outcome = fut => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_interrupts_slow_future() {
        let ctx = CheckContext::new().with_timeout(Duration::from_millis(20));
        let outcome = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), ProbeError>(())
            })
            .await;

        assert!(matches!(outcome, Err(ProbeError::DeadlineExceeded)));
        assert!(ctx.is_done());
    }

    #[tokio::test]
    async fn parent_cancellation_reaches_child() {
        let parent = CheckContext::new();
        let child = parent.child();
        assert!(child.err().is_none());

        parent.cancel();

        assert!(matches!(child.done().await, ProbeError::Cancelled));
        assert!(matches!(child.err(), Some(ProbeError::Cancelled)));
    }

    #[tokio::test]
    async fn child_cancellation_leaves_parent_alone() {
        let parent = CheckContext::new();
        let child = parent.child();

        child.cancel();

        assert!(child.is_done());
        assert!(!parent.is_done());
    }

    #[tokio::test]
    async fn drop_guard_cancels() {
        let ctx = CheckContext::new();
        {
            let _guard = ctx.drop_guard();
        }
        assert!(matches!(ctx.err(), Some(ProbeError::Cancelled)));
    }

    #[test]
    fn earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = CheckContext::new()
            .with_deadline(now + Duration::from_secs(1))
            .with_deadline(now + Duration::from_secs(10));

        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(1)));
    }
}
