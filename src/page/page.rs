// ────────────────────────────────
// src/page/page.rs
// Human-readable status page rendered from a template on every request.
// ────────────────────────────────
use chrono::Utc;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Response, StatusCode};
use std::sync::Arc;
use tracing::error;

use super::build_info::BuildInfo;
use super::model::{Link, RenderModel};
use super::template::PageTemplate;
use crate::health::{CheckContext, HealthChecker};

pub const DEFAULT_TITLE: &str = "Service Status";
pub const RENDER_ERROR_MESSAGE: &str = "Error executing template";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("parsing html template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Step-wise configuration for a [`StatusPage`]. Nothing can change once
/// [`PageBuilder::build`] has run.
#[derive(Debug, Default)]
pub struct PageBuilder {
    title: Option<String>,
    template: Option<String>,
    checker: Option<Arc<HealthChecker>>,
    links: Vec<Link>,
    show_version: bool,
    build_info: Option<BuildInfo>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the default template entirely.
    pub fn with_template(mut self, source: impl Into<String>) -> Self {
        self.template = Some(source.into());
        self
    }

    pub fn with_health_checker(mut self, checker: Arc<HealthChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Links are shown in the order they were added.
    pub fn with_link(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.push(Link {
            name: name.into(),
            url: url.into(),
        });
        self
    }

    pub fn with_version(mut self, show: bool) -> Self {
        self.show_version = show;
        self
    }

    pub fn with_build_info(mut self, build_info: BuildInfo) -> Self {
        self.build_info = Some(build_info);
        self
    }

    pub fn build(self) -> Result<StatusPage, PageError> {
        let template = PageTemplate::new(self.template)?;
        let version = if self.show_version {
            Some(self.build_info.unwrap_or_else(BuildInfo::from_build_env))
        } else {
            None
        };

        Ok(StatusPage {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            template,
            checker: self.checker,
            links: self.links,
            version,
        })
    }
}

#[derive(Debug)]
pub struct StatusPage {
    title: String,
    template: PageTemplate,
    checker: Option<Arc<HealthChecker>>,
    links: Vec<Link>,
    version: Option<BuildInfo>,
}

impl StatusPage {
    pub fn builder() -> PageBuilder {
        PageBuilder::new()
    }

    pub async fn handle(&self, ctx: CheckContext) -> Response<Body> {
        let results = match &self.checker {
            Some(checker) => match checker.check(&ctx).await {
                Ok(results) => results,
                Err(e) => {
                    error!(%e, "health check pass failed while rendering status page");
                    return text_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Error checking health: {}", e),
                    );
                }
            },
            None => Vec::new(),
        };

        let model = RenderModel::new(
            &self.title,
            self.version.as_ref(),
            &results,
            &self.links,
            Utc::now(),
        );

        match self.template.render(&model) {
            Ok(html) => {
                let mut response = Response::new(Body::from(html));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                response
            }
            Err(e) => {
                error!(%e, "rendering status page");
                text_response(StatusCode::INTERNAL_SERVER_ERROR, RENDER_ERROR_MESSAGE.to_string())
            }
        }
    }
}

fn text_response(status: StatusCode, message: String) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
