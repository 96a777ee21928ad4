use crate::core::metal::MetalKind;
use crate::core::pricing::MarketConfig;
use crate::core::session::{DEFAULT_SESSION_HOURS, StaticCredentials};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Market settings from the config file; anything omitted keeps its default.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MarketSettings {
    #[serde(default)]
    pub spot_prices: BTreeMap<MetalKind, f64>,
    #[serde(default)]
    pub multipliers: BTreeMap<MetalKind, f64>,
    pub rounding: Option<bool>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
}

impl AuthConfig {
    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("session_hours", &self.session_hours)
            .finish()
    }
}

fn default_session_hours() -> i64 {
    DEFAULT_SESSION_HOURS
}

fn default_currency() -> String {
    "CAD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub market: MarketSettings,
    pub auth: Option<AuthConfig>,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            market: MarketSettings::default(),
            auth: None,
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in settings when
    /// none has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "assay", "assay")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("com", "assay", "assay")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Built-in market defaults overlaid with the configured values. Spot
    /// prices below zero and multipliers outside [0, 1] are clamped.
    pub fn market_config(&self) -> MarketConfig {
        let mut market = MarketConfig::default();
        for (metal, price) in &self.market.spot_prices {
            market.set_spot(*metal, *price);
        }
        for (metal, multiplier) in &self.market.multipliers {
            market.set_multiplier(*metal, *multiplier);
        }
        if let Some(rounding) = self.market.rounding {
            market.rounding = rounding;
        }
        market
    }
}
