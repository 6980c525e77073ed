// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::health::Importance;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub page: PageConfig,
    pub targets: Vec<TargetConfig>,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub health_path: String,
    pub status_path: String,
    /// Deadline for one orchestration pass, started per request.
    pub check_timeout_secs: u64,
}

impl ServerConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 8080).into(),
            health_path: "/health".to_string(),
            status_path: "/status".to_string(),
            check_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub show_version: bool,
    /// Replaces the built-in template when set.
    pub template_path: Option<PathBuf>,
    pub links: Vec<LinkConfig>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: crate::page::DEFAULT_TITLE.to_string(),
            show_version: true,
            template_path: None,
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    pub url: String,
}

/// A dependency checked over HTTP: any 2xx answer is healthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub importance: Importance,
    pub url: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
            path: "/metrics".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let server = &self.server;
        for path in [&server.health_path, &server.status_path] {
            if !path.starts_with('/') {
                bail!("endpoint path {:?} must start with '/'", path);
            }
        }
        if server.health_path == server.status_path {
            bail!(
                "health_path and status_path must differ (both are {:?})",
                server.health_path
            );
        }
        if server.check_timeout_secs == 0 {
            bail!("check_timeout_secs must be greater than zero");
        }

        if self.metrics.enabled {
            if !self.metrics.path.starts_with('/') {
                bail!("metrics path {:?} must start with '/'", self.metrics.path);
            }
            if self.metrics.port == server.listen_addr.port() {
                bail!(
                    "metrics port {} collides with the listen address",
                    self.metrics.port
                );
            }
        }

        Ok(())
    }
}
