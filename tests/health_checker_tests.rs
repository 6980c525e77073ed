// tests/health_checker_tests.rs
use async_trait::async_trait;
use rand::Rng;
use service_status::health::{
    decide, CheckContext, CheckError, Decision, Importance, Outcome, Probe, ProbeError, Registry,
    Status,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Sleeps (cooperatively) and then reports a fixed outcome.
struct DelayedProbe {
    delay: Duration,
    failure: Option<&'static str>,
}

#[async_trait]
impl Probe for DelayedProbe {
    async fn check(&self, ctx: CheckContext) -> Result<(), ProbeError> {
        ctx.run(sleep_ok(self.delay)).await?;
        match self.failure {
            Some(message) => Err(ProbeError::unhealthy(message)),
            None => Ok(()),
        }
    }
}

struct PanickingProbe;

#[async_trait]
impl Probe for PanickingProbe {
    async fn check(&self, _ctx: CheckContext) -> Result<(), ProbeError> {
        panic!("probe exploded");
    }
}

async fn sleep_ok(delay: Duration) -> Result<(), ProbeError> {
    sleep(delay).await;
    Ok(())
}

fn ok(delay_ms: u64) -> DelayedProbe {
    DelayedProbe {
        delay: Duration::from_millis(delay_ms),
        failure: None,
    }
}

fn failing(message: &'static str) -> DelayedProbe {
    DelayedProbe {
        delay: Duration::ZERO,
        failure: Some(message),
    }
}

#[tokio::test]
async fn test_empty_registry_returns_no_results() {
    let checker = Registry::new().build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(decide(&results), Decision::Healthy);
}

#[tokio::test]
async fn test_all_targets_healthy() {
    let checker = Registry::new()
        .with_target("test1", Importance::Low, ok(0))
        .with_target("test2", Importance::High, ok(0))
        .build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    let statuses: Vec<_> = results.iter().map(|r| r.status()).collect();
    assert_eq!(statuses, vec![Status::Ok, Status::Ok]);
    assert!(results.iter().all(|r| r.error().is_none()));
    assert_eq!(decide(&results), Decision::Healthy);
}

#[tokio::test]
async fn test_mixed_results_keep_messages() {
    let checker = Registry::new()
        .with_target("test1", Importance::Low, failing("low importance error"))
        .with_target("test2", Importance::High, ok(0))
        .build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(results[0].outcome, Outcome::Fail("low importance error".into()));
    assert_eq!(results[1].outcome, Outcome::Ok);
    assert_eq!(decide(&results), Decision::Healthy);
}

#[tokio::test]
async fn test_all_targets_unhealthy() {
    let checker = Registry::new()
        .with_target("test1", Importance::Low, failing("low importance error"))
        .with_target("test2", Importance::High, failing("high importance error"))
        .build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(results[0].error(), Some("low importance error"));
    assert_eq!(results[1].error(), Some("high importance error"));
    assert_eq!(decide(&results), Decision::Unhealthy);
}

#[tokio::test]
async fn test_results_follow_registration_order_not_completion_order() {
    let mut rng = rand::thread_rng();
    let delays: Vec<u64> = (0..16).map(|_| rng.gen_range(0..40)).collect();

    let registry = delays.iter().enumerate().fold(Registry::new(), |registry, (i, &delay)| {
        registry.with_target(format!("t{}", i), Importance::High, ok(delay))
    });
    let checker = registry.build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    let names: Vec<_> = results.iter().map(|r| r.target.name.clone()).collect();
    let expected: Vec<_> = (0..16).map(|i| format!("t{}", i)).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_slowest_first_still_comes_back_first() {
    let checker = Registry::new()
        .with_target("slow", Importance::High, ok(80))
        .with_target("fast", Importance::Low, failing("fast failure"))
        .build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(results[0].target.name, "slow");
    assert_eq!(results[0].outcome, Outcome::Ok);
    assert_eq!(results[1].target.name, "fast");
    assert!(results[0].elapsed >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_probes_run_in_parallel() {
    let registry = (0..5).fold(Registry::new(), |registry, i| {
        registry.with_target(format!("t{}", i), Importance::High, ok(200))
    });
    let checker = registry.build();

    let start = Instant::now();
    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(results.len(), 5);
    assert!(
        start.elapsed() < Duration::from_millis(800),
        "five 200ms probes took {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_failure_does_not_cancel_siblings() {
    let checker = Registry::new()
        .with_target("broken", Importance::High, failing("down"))
        .with_target("slow", Importance::High, ok(50))
        .build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(results[0].status(), Status::Fail);
    assert_eq!(results[1].status(), Status::Ok);
}

#[tokio::test]
async fn test_deadline_turns_slow_probe_into_failure() {
    let checker = Registry::new()
        .with_target("test1", Importance::Low, ok(500))
        .build();

    let ctx = CheckContext::new().with_timeout(Duration::from_millis(50));
    let results = checker.check(&ctx).await.unwrap();

    assert_eq!(results[0].error(), Some("deadline exceeded"));
    assert!(results[0].elapsed < Duration::from_millis(500));
}

#[tokio::test]
async fn test_cancelling_the_caller_context_interrupts_probes() {
    let probe = |ctx: CheckContext| async move { Err::<(), ProbeError>(ctx.done().await) };
    let checker = Registry::new()
        .with_target("waits-forever", Importance::High, probe)
        .build();

    let ctx = CheckContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let results = checker.check(&ctx).await.unwrap();

    assert_eq!(results[0].error(), Some("check cancelled"));
}

#[tokio::test]
async fn test_pass_context_is_cancelled_after_the_pass() {
    let seen = Arc::new(std::sync::Mutex::new(None));
    let captured = seen.clone();
    let probe = move |ctx: CheckContext| {
        let captured = captured.clone();
        async move {
            *captured.lock().unwrap() = Some(ctx);
            Ok::<(), ProbeError>(())
        }
    };
    let checker = Registry::new().with_target("t", Importance::Low, probe).build();

    let caller = CheckContext::new();
    checker.check(&caller).await.unwrap();

    let probe_ctx = seen.lock().unwrap().take().unwrap();
    assert!(probe_ctx.is_done());
    assert!(!caller.is_done());
}

#[tokio::test]
async fn test_duplicate_and_empty_names_are_distinct_targets() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let probe = move |_: CheckContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), ProbeError>(()) }
    };

    let checker = Registry::new()
        .with_target("db", Importance::High, probe.clone())
        .with_target("db", Importance::Low, probe.clone())
        .with_target("", Importance::Low, probe)
        .build();

    let results = checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].target.importance, Importance::High);
    assert_eq!(results[1].target.importance, Importance::Low);
    assert_eq!(results[2].target.name, "");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_each_pass_runs_probes_again() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let probe = move |_: CheckContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), ProbeError>(()) }
    };
    let checker = Registry::new().with_target("t", Importance::Low, probe).build();

    checker.check(&CheckContext::new()).await.unwrap();
    checker.check(&CheckContext::new()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_panicking_probe_is_an_orchestration_error() {
    let checker = Registry::new()
        .with_target("fine", Importance::Low, ok(0))
        .with_target("explodes", Importance::Low, PanickingProbe)
        .build();

    let err = checker.check(&CheckContext::new()).await.unwrap_err();

    let CheckError::Worker { target, source } = err;
    assert_eq!(target, "explodes");
    assert!(source.is_panic());
}
