// src/page/model.rs
// Per-request data handed to the template.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::build_info::BuildInfo;
use super::severity::Severity;
use crate::health::{CheckResult, Importance, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CheckView<'a> {
    pub name: &'a str,
    pub importance: Importance,
    pub status: Status,
    pub severity: Severity,
    pub error: Option<&'a str>,
    pub duration: String,
}

impl<'a> From<&'a CheckResult> for CheckView<'a> {
    fn from(result: &'a CheckResult) -> Self {
        Self {
            name: &result.target.name,
            importance: result.target.importance,
            status: result.status(),
            severity: Severity::of(result),
            error: result.error(),
            duration: format!("{:?}", result.elapsed),
        }
    }
}

// Optional values serialize as `none` rather than being left out, so strict
// templates can test them.
#[derive(Debug, Serialize)]
pub struct RenderModel<'a> {
    pub title: &'a str,
    pub version: Option<&'a BuildInfo>,
    pub checks: Vec<CheckView<'a>>,
    pub links: &'a [Link],
    pub checked_at: String,
}

impl<'a> RenderModel<'a> {
    pub fn new(
        title: &'a str,
        version: Option<&'a BuildInfo>,
        results: &'a [CheckResult],
        links: &'a [Link],
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            version,
            checks: results.iter().map(CheckView::from).collect(),
            links,
            checked_at: checked_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
