// src/page/build_info.rs
use serde::Serialize;

const UNKNOWN: &str = "unknown";

/// Version metadata shown on the status page. Built once at startup and
/// handed to the page builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub revision: String,
    pub commit_date: String,
}

impl BuildInfo {
    pub fn new(
        version: impl Into<String>,
        revision: impl Into<String>,
        commit_date: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            revision: revision.into(),
            commit_date: commit_date.into(),
        }
    }

    /// Package version plus the revision and commit date the build
    /// pipeline injects through `STATUS_BUILD_REVISION` and
    /// `STATUS_BUILD_DATE`.
    pub fn from_build_env() -> Self {
        Self::new(
            env!("CARGO_PKG_VERSION"),
            option_env!("STATUS_BUILD_REVISION").unwrap_or(UNKNOWN),
            option_env!("STATUS_BUILD_DATE").unwrap_or(UNKNOWN),
        )
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::new(UNKNOWN, UNKNOWN, UNKNOWN)
    }
}
