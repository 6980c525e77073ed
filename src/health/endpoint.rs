// src/health/endpoint.rs
// JSON health endpoint: status code carries the aggregate verdict, the body
// carries every target's result.
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Response, StatusCode, Uri};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::checker::HealthChecker;
use super::context::CheckContext;
use super::decision::decide;

/// Query key that skips every dependency check.
pub const NO_DEPS_PARAM: &str = "no_deps";

#[derive(Debug, Clone)]
pub struct HealthEndpoint {
    checker: Arc<HealthChecker>,
}

impl HealthEndpoint {
    pub fn new(checker: Arc<HealthChecker>) -> Self {
        Self { checker }
    }

    pub async fn handle(&self, uri: &Uri, ctx: CheckContext) -> Response<Body> {
        if skips_dependencies(uri) {
            debug!("{} present, skipping dependency checks", NO_DEPS_PARAM);
            return status_only(StatusCode::OK);
        }

        let results = match self.checker.check(&ctx).await {
            Ok(results) => results,
            Err(e) => {
                error!(%e, "health check pass failed");
                return respond_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
            }
        };

        let status = if decide(&results).is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        respond_json(status, &results)
    }
}

fn skips_dependencies(uri: &Uri) -> bool {
    uri.query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes()).any(|(key, _)| key == NO_DEPS_PARAM)
        })
        .unwrap_or(false)
}

fn status_only(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// Serialize `data` as the body. The status is decided before encoding and
/// is kept even when encoding fails.
fn respond_json<T: Serialize + ?Sized>(status: StatusCode, data: &T) -> Response<Body> {
    let body = match serde_json::to_vec(data) {
        Ok(mut bytes) => {
            bytes.push(b'\n');
            Body::from(bytes)
        }
        Err(e) => {
            error!(%e, "encoding data to respond with json");
            Body::empty()
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
