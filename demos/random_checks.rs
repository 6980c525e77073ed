//! demos/random_checks.rs
//! Run: cargo run --example random_checks -- [port]
//!
//! Two fake dependencies that fail half of the time. Reload
//! http://127.0.0.1:8080/status to watch them flip.

use rand::Rng;
use service_status::{
    health::{CheckContext, HealthEndpoint, Importance, ProbeError, Registry},
    page::StatusPage,
    server::{RequestHandler, Routes, ServerBuilder},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::time::sleep;

// ——————————————————————————————————————————
// Flaky dependency: some latency, then a coin flip
async fn flaky(ctx: CheckContext) -> Result<(), ProbeError> {
    let (delay, healthy) = {
        let mut rng = rand::thread_rng();
        (Duration::from_millis(rng.gen_range(5..=150)), rng.gen_bool(0.5))
    };

    ctx.run(async move {
        sleep(delay).await;
        if healthy {
            Ok(())
        } else {
            Err(ProbeError::unhealthy("dependency is not healthy"))
        }
    })
    .await
}

// ——————————————————————————————————————————
// Main
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("service_status=debug".parse()?),
        )
        .init();

    let port: u16 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "8080".into())
        .parse()?;

    let checker = Arc::new(
        Registry::new()
            .with_target("database", Importance::High, flaky)
            .with_target("network", Importance::Low, flaky)
            .build(),
    );

    let page = StatusPage::builder()
        .with_health_checker(checker.clone())
        .with_link("OpenAPI Documentation", "/swagger")
        .with_link("Metrics", "/metrics")
        .with_version(true)
        .build()?;

    let handler = RequestHandler::new(
        Routes::default(),
        Arc::new(HealthEndpoint::new(checker)),
        Arc::new(page),
    )
    .with_check_timeout(Duration::from_secs(1));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Demo status server on http://{addr}  [/health, /status]");

    ServerBuilder::new(addr)
        .with_handler(handler)
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
            }
        })
        .await
}
