//! Dashboard configuration, read from an optional JSON file.

use crate::charts::DashboardLayout;
use crate::data::export::DEFAULT_EXPORT_PATH;
use crate::data::loader::{DEFAULT_DATE_FORMAT, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
use crate::data::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_PATH: &str = "Imports_Exports_Dataset.csv";
pub const DEFAULT_CHART_DIR: &str = "charts";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("sample_size must be greater than zero")]
    EmptySample,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub sample_size: usize,
    pub seed: u64,
    pub date_format: String,
    pub export_path: PathBuf,
    pub chart_dir: PathBuf,
    pub layout: DashboardLayout,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            layout: DashboardLayout::default(),
            chart_width: 1024,
            chart_height: 768,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config; fields left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::EmptySample);
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sample_size: self.sample_size,
            seed: self.seed,
            date_format: self.date_format.clone(),
        }
    }

    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }
}
