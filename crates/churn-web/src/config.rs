//! Web Configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config file location, overridable with `CHURN_CONFIG`
pub const DEFAULT_CONFIG_PATH: &str = "config/churn-web.json";

/// Web service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address
    pub listen_addr: String,
    /// Model artifact path
    pub model_path: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Decorative image, relative to `static_dir`
    pub image: String,
    /// Page title
    pub page_title: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8501".into(),
            model_path: PathBuf::from("models/final_model.json"),
            static_dir: PathBuf::from("assets"),
            image: "ecommerce.svg".into(),
            page_title: "E-Commerce Churn Predictor".into(),
        }
    }
}

impl WebConfig {
    /// Load from file
    pub fn load(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Load from `CHURN_CONFIG` (or the default path), falling back to
    /// defaults, then apply environment overrides
    pub fn from_env() -> Self {
        let path = std::env::var("CHURN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

        let mut config = Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Config {} not loaded ({}), using defaults", path, e);
            Self::default()
        });
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `CHURN_MODEL_PATH`, `CHURN_LISTEN_ADDR` and `CHURN_STATIC_DIR`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CHURN_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup("CHURN_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(dir) = lookup("CHURN_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
    }

    /// URL of the decorative image
    pub fn image_url(&self) -> String {
        format!("/static/{}", self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"listen_addr": "127.0.0.1:9000"}}"#).unwrap();

        let config = WebConfig::load(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.model_path, PathBuf::from("models/final_model.json"));
        assert_eq!(config.image_url(), "/static/ecommerce.svg");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "listen_addr = 1").unwrap();

        let err = WebConfig::load(tmp.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = WebConfig::default();
        config.apply_overrides(|key| match key {
            "CHURN_MODEL_PATH" => Some("/srv/model.json".into()),
            _ => None,
        });
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.listen_addr, "0.0.0.0:8501");
    }
}
