use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::loader::{default_sources, SourceSpec};

/// Path of an optional JSON config file.
pub const CONFIG_ENV: &str = "GENDER_GAP_CONFIG";
/// Overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "GENDER_GAP_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Operator settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the source tables.
    pub data_dir: PathBuf,
    /// Tables to load, in concatenation order.
    pub sources: Vec<SourceSpec>,
    /// Country selected when the dashboard opens.
    pub default_country: String,
    /// Explorer topic selected when the dashboard opens.
    pub default_topic: String,
    /// Countries ranked by the advanced-insights leaderboards.
    pub leaderboard_countries: Vec<String>,
    /// Minimum non-null observations for a country to be ranked.
    pub min_samples: usize,
    /// Employment values outside `(-outlier_bound, outlier_bound)` are
    /// dropped before charting.
    pub outlier_bound: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_dir: PathBuf::from("data"),
            sources: default_sources(),
            default_country: "France".to_string(),
            default_topic: "Employment".to_string(),
            leaderboard_countries: ["Austria", "France", "Germany", "Portugal", "Spain"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_samples: 5,
            outlier_bound: 100.0,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the file named by `GENDER_GAP_CONFIG`, then
    /// `GENDER_GAP_DATA_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        )
    }

    /// Layer the optional config file and data directory over the defaults.
    pub fn resolve(
        config_file: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_file {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no source tables configured".into()));
        }
        if self.min_samples == 0 {
            return Err(ConfigError::Invalid("min_samples must be at least 1".into()));
        }
        if !(self.outlier_bound.is_finite() && self.outlier_bound > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "outlier_bound must be a positive number, got {}",
                self.outlier_bound
            )));
        }
        if self.leaderboard_countries.is_empty() {
            log::warn!("leaderboard_countries is empty; advanced insights will report no data");
        }
        Ok(())
    }
}
