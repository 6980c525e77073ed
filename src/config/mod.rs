// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(path, &contents)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(path: &Path, contents: &str) -> Result<Config> {
    let extension = path.extension().and_then(|s| s.to_str());
    let config: Config = if matches!(extension, Some("yaml") | Some("yml")) {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Importance;

    const YAML: &str = r#"
server:
  listen_addr: "127.0.0.1:8081"
  check_timeout_secs: 3
page:
  title: Payments
  links:
    - name: Metrics
      url: /metrics
targets:
  - name: database
    importance: high
    url: http://db.internal:8080/health
  - name: cache
    importance: low
    url: http://cache.internal/ping
"#;

    #[test]
    fn yaml_fills_in_defaults() {
        let config = parse_config(Path::new("status.yaml"), YAML).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.listen_addr.port(), 8081);
        assert_eq!(config.server.health_path, "/health");
        assert_eq!(config.server.check_timeout().as_secs(), 3);
        assert_eq!(config.page.title, "Payments");
        assert!(config.page.show_version);
        assert_eq!(config.page.links.len(), 1);
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].importance, Importance::High);
        assert_eq!(config.targets[1].importance, Importance::Low);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn example_config_is_valid() {
        let example = include_str!("../../status.example.yaml");
        let config = parse_config(Path::new("status.example.yaml"), example).unwrap();
        config.validate().unwrap();
        assert!(config.metrics.enabled);
    }

    #[test]
    fn json_is_the_fallback_format() {
        let json = r#"{"targets":[{"name":"db","importance":"high","url":"http://db/health"}]}"#;
        let config = parse_config(Path::new("status.conf"), json).unwrap();
        assert_eq!(config.targets[0].name, "db");
    }

    #[test]
    fn rejects_unknown_importance() {
        let json = r#"{"targets":[{"name":"db","importance":"critical","url":"http://db/health"}]}"#;
        assert!(parse_config(Path::new("status.json"), json).is_err());
    }

    #[test]
    fn rejects_clashing_paths() {
        let mut config = Config::default();
        config.server.status_path = config.server.health_path.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::default();
        config.server.check_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_metrics_on_the_listen_port() {
        let mut config = Config::default();
        config.metrics.enabled = true;
        config.metrics.port = config.server.listen_addr.port();
        assert!(config.validate().is_err());
    }
}
