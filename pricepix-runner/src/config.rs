//! Application configuration (`pricepix.toml`).
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. CLI flags are applied on top after loading.

use crate::batch::FailurePolicy;
use crate::sink::{PngSink, MAX_IMAGE_EDGE};
use pricepix_core::data::{CryptoCompareConfig, TradingPair};
use pricepix_core::GridSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid_size: GridSize,
    pub pair: TradingPair,
    pub output: OutputConfig,
    pub batch: BatchConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Pixels per grid cell along each edge.
    pub scale: u32,
    /// Write a JSON manifest next to each image.
    pub manifest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub window_days: u32,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            pair: TradingPair::default(),
            output: OutputConfig::default(),
            batch: BatchConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("images"),
            scale: 1,
            manifest: true,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            failure_policy: FailurePolicy::FailFast,
            parallel: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let cc = CryptoCompareConfig::default();
        Self {
            base_url: cc.base_url,
            timeout_secs: cc.timeout.as_secs(),
            max_retries: cc.max_retries,
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.scale == 0 {
            return Err(ConfigError::Invalid("output.scale must be at least 1".into()));
        }
        let edge = (self.grid_size.get() as u64).saturating_mul(self.output.scale as u64);
        if edge > MAX_IMAGE_EDGE as u64 {
            return Err(ConfigError::Invalid(format!(
                "{} grid at scale {} is {edge}px wide (max {MAX_IMAGE_EDGE})",
                self.grid_size, self.output.scale
            )));
        }
        if self.batch.window_days == 0 {
            return Err(ConfigError::Invalid("batch.window_days must be at least 1".into()));
        }
        if self.pair.base.is_empty() || self.pair.quote.is_empty() {
            return Err(ConfigError::Invalid("pair.base and pair.quote must be set".into()));
        }
        // The day window must split into whole minutes for this grid.
        let sample_day = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
            .ok_or_else(|| ConfigError::Invalid("date arithmetic".into()))?;
        pricepix_core::DayWindow::for_date(sample_day, self.grid_size.price_cells())
            .map_err(|e| ConfigError::Invalid(format!("grid_size {}: {e}", self.grid_size.get())))?;
        Ok(())
    }

    pub fn crypto_compare(&self) -> CryptoCompareConfig {
        CryptoCompareConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            max_retries: self.api.max_retries,
            api_key: self.api.api_key.clone(),
            ..Default::default()
        }
    }

    pub fn png_sink(&self) -> PngSink {
        PngSink::new(&self.output.dir)
            .with_scale(self.output.scale)
            .with_manifest(self.output.manifest)
    }
}
