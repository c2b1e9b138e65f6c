//! Service settings
//!
//! Defaults, optionally overlaid by a TOML file, then by `APP_`-prefixed
//! environment variables (`APP_APP_NAME`, `APP_MODEL_PATH`, `APP_MODEL_HASH`,
//! `APP_LOG_LEVEL`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "APP_";

/// Pricing service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub app_name: String,
    /// Path of the JSON model artifact
    pub model_path: PathBuf,
    /// Expected Blake3 hash of the artifact; unchecked when unset
    pub model_hash: Option<String>,
    /// Tracing filter directive, e.g. `info` or `autoprice_pricing=debug`
    pub log_level: String,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            app_name: "Used Car Price API".to_string(),
            model_path: PathBuf::from("model/used_car_price_model_v2.json"),
            model_hash: None,
            log_level: "info".to_string(),
        }
    }
}

impl PricingSettings {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Read a TOML file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut settings = Self::from_toml_file(path)?;
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: PricingSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Overlay values found by `lookup` for each `APP_*` key
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(val) = var("APP_NAME") {
            self.app_name = val;
        }
        if let Some(val) = var("MODEL_PATH") {
            self.model_path = PathBuf::from(val);
        }
        if let Some(val) = var("MODEL_HASH") {
            self.model_hash = Some(val).filter(|h| !h.is_empty());
        }
        if let Some(val) = var("LOG_LEVEL") {
            self.log_level = val;
        }
    }
}
