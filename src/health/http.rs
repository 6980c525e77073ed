// src/health/http.rs
// Built-in probe for dependencies that expose an HTTP health URL.
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::context::CheckContext;
use super::probe::{Probe, ProbeError};

#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: Url,
}

impl HttpProbe {
    pub fn new(url: Url) -> reqwest::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, url))
    }

    /// Share one connection pool between several probes.
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self, ctx: CheckContext) -> Result<(), ProbeError> {
        ctx.run(async {
            match self.client.get(self.url.as_str()).send().await {
                Ok(response) if response.status().is_success() => Ok(()),
                Ok(response) => Err(ProbeError::unhealthy(format!("HTTP {}", response.status()))),
                Err(e) => Err(ProbeError::unhealthy(e.to_string())),
            }
        })
        .await
    }
}
