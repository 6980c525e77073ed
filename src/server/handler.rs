// src/server/handler.rs
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower::Service;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::health::{CheckContext, HealthEndpoint};
use crate::metrics::{MetricsCollector, Timer};
use crate::page::StatusPage;

/// Where the two endpoints are mounted.
#[derive(Debug, Clone)]
pub struct Routes {
    pub health_path: String,
    pub status_path: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            health_path: "/health".to_string(),
            status_path: "/status".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct RequestHandler {
    routes: Arc<Routes>,
    health: Arc<HealthEndpoint>,
    page: Arc<StatusPage>,
    check_timeout: Option<Duration>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RequestHandler {
    pub fn new(routes: Routes, health: Arc<HealthEndpoint>, page: Arc<StatusPage>) -> Self {
        Self {
            routes: Arc::new(routes),
            health,
            page,
            check_timeout: None,
            metrics: None,
        }
    }

    /// Deadline applied to every orchestration pass started by a request.
    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = Some(timeout);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let timer = Timer::new();
        let endpoint = self.endpoint(req.uri().path());

        let response = match endpoint {
            None => status_only(StatusCode::NOT_FOUND),
            Some(_) if *req.method() != Method::GET && *req.method() != Method::HEAD => {
                status_only(StatusCode::METHOD_NOT_ALLOWED)
            }
            Some(endpoint) => {
                // Dropping this request future (client gone) cancels the
                // probes it started.
                let ctx = self.request_context();
                let _cancel_on_drop = ctx.drop_guard();

                match endpoint {
                    Endpoint::Health => self.health.handle(req.uri(), ctx).await,
                    Endpoint::Status => self.page.handle(ctx).await,
                }
            }
        };

        let status = response.status();
        debug!(status = status.as_u16(), elapsed = ?timer.elapsed(), "request complete");
        if let (Some(metrics), Some(endpoint)) = (&self.metrics, endpoint) {
            metrics.record_request(endpoint.as_str(), status.as_u16(), timer.elapsed());
        }

        response
    }

    fn endpoint(&self, path: &str) -> Option<Endpoint> {
        if path == self.routes.health_path {
            Some(Endpoint::Health)
        } else if path == self.routes.status_path {
            Some(Endpoint::Status)
        } else {
            None
        }
    }

    fn request_context(&self) -> CheckContext {
        let ctx = CheckContext::new();
        match self.check_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Health,
    Status,
}

impl Endpoint {
    fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::Status => "status",
        }
    }
}

fn status_only(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        let span = info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %req.method(),
            path = %req.uri().path(),
        );
        Box::pin(async move { Ok(handler.handle(req).await) }.instrument(span))
    }
}
