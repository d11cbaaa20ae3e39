//! Collaborator configuration.
//!
//! Resolution order, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file (`--config PATH`, else `cmm.toml` in the working directory)
//! 3. environment variables (`YOLO_URL_API`, `YOLO_MODEL_API`,
//!    `SUPABASE_URL`, `SUPABASE_KEY`)
//!
//! Missing secrets are not an error here. The client that needs one reports
//! [`ServiceError::MissingConfig`](crate::ServiceError::MissingConfig).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cmm_model::{PLAN_TABLE, RECORD_TABLE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "cmm.toml";

/// Ultralytics HUB inference endpoint.
pub const DEFAULT_DETECTION_ENDPOINT: &str = "https://predict.ultralytics.com";

pub const ENV_DETECTION_API_KEY: &str = "YOLO_URL_API";
pub const ENV_DETECTION_MODEL: &str = "YOLO_MODEL_API";
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
pub const ENV_STORE_KEY: &str = "SUPABASE_KEY";

/// Settings for every external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub detection: DetectionConfig,
    pub store: StoreConfig,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            store: StoreConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

/// Object-detection API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model URL on the detection hub.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub imgsz: u32,
    pub conf: f32,
    pub iou: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DETECTION_ENDPOINT.to_string(),
            api_key: None,
            model: None,
            imgsz: 640,
            conf: 0.25,
            iou: 0.45,
        }
    }
}

/// Hosted table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub table: String,
    /// Read-only roof plan table used by the usage summaries.
    pub plan_table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: RECORD_TABLE.to_string(),
            plan_table: PLAN_TABLE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment and an optional file.
    ///
    /// An explicit `path` must exist. Without one, `cmm.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load) with an injected environment lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!("No {DEFAULT_CONFIG_FILENAME} found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env(lookup);
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Override settings from environment variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = var(ENV_DETECTION_API_KEY) {
            self.detection.api_key = Some(value);
        }
        if let Some(value) = var(ENV_DETECTION_MODEL) {
            self.detection.model = Some(value);
        }
        if let Some(value) = var(ENV_STORE_URL) {
            self.store.url = Some(value);
        }
        if let Some(value) = var(ENV_STORE_KEY) {
            self.store.key = Some(value);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
