// src/main.rs
use anyhow::{Context, Result};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use service_status::{
    config::{self, Config},
    health::{HealthChecker, HealthEndpoint, HttpProbe, Registry},
    metrics::{MetricsCollector, MetricsRegistry},
    page::{BuildInfo, StatusPage},
    server::{RequestHandler, Routes, ServerBuilder},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("service_status=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "status.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    // Initialize metrics
    let metrics_registry = MetricsRegistry::new()?;
    let metrics = metrics_registry.collector();

    let checker = Arc::new(build_checker(&config, metrics.clone())?);
    info!("Registered {} targets", checker.targets().len());

    let page = Arc::new(build_page(&config, checker.clone()).await?);
    let health = Arc::new(HealthEndpoint::new(checker));

    // Start metrics server if enabled
    if config.metrics.enabled {
        let metrics_addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        start_metrics_server(metrics_addr, metrics_registry, config.metrics.path.clone()).await?;
    }

    let routes = Routes {
        health_path: config.server.health_path.clone(),
        status_path: config.server.status_path.clone(),
    };
    let handler = RequestHandler::new(routes, health, page)
        .with_check_timeout(config.server.check_timeout())
        .with_metrics(metrics);

    info!("Starting status server on {}", config.server.listen_addr);

    ServerBuilder::new(config.server.listen_addr)
        .with_handler(handler)
        .serve_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_checker(config: &Config, metrics: Arc<MetricsCollector>) -> Result<HealthChecker> {
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let registry = config.targets.iter().fold(Registry::new(), |registry, target| {
        let probe = HttpProbe::with_client(client.clone(), target.url.clone());
        registry.with_target(target.name.clone(), target.importance, probe)
    });

    Ok(registry.build().with_metrics(metrics))
}

async fn build_page(config: &Config, checker: Arc<HealthChecker>) -> Result<StatusPage> {
    let mut builder = StatusPage::builder()
        .with_title(config.page.title.clone())
        .with_health_checker(checker)
        .with_version(config.page.show_version)
        .with_build_info(BuildInfo::from_build_env());

    for link in &config.page.links {
        builder = builder.with_link(link.name.clone(), link.url.clone());
    }

    if let Some(path) = &config.page.template_path {
        let source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read page template {}", path.display()))?;
        builder = builder.with_template(source);
    }

    Ok(builder.build()?)
}

async fn start_metrics_server(
    addr: SocketAddr,
    registry: MetricsRegistry,
    path: String,
) -> Result<()> {
    let registry = Arc::new(registry);
    let metrics_path = Arc::new(path); // keep this for logging
    let service_path = metrics_path.clone(); // clone for the service closure

    let make_service = hyper::service::make_service_fn(move |_| {
        let registry = registry.clone();
        let path = service_path.clone();

        async move {
            Ok::<_, Infallible>(hyper::service::service_fn(move |req: Request<Body>| {
                let registry = registry.clone();
                let path = path.clone();

                async move {
                    if req.uri().path() != path.as_str() {
                        return Ok::<_, Infallible>(plain(StatusCode::NOT_FOUND, "Not Found".into()));
                    }

                    let response = match registry.gather() {
                        Ok(metrics) => {
                            let mut response = plain(StatusCode::OK, metrics.into());
                            response.headers_mut().insert(
                                CONTENT_TYPE,
                                HeaderValue::from_static("text/plain; version=0.0.4"),
                            );
                            response
                        }
                        Err(e) => {
                            warn!("Failed to encode metrics: {}", e);
                            plain(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics".into())
                        }
                    };
                    Ok::<_, Infallible>(response)
                }
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);

    info!(
        "Metrics server listening on http://{}{}",
        addr,
        metrics_path.as_str()
    );

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(())
}

fn plain(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
