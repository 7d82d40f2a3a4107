//! Configuration Module
//! Data location and dashboard limits, optionally read from a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats::DashboardLimits;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the uploaded CSV.
    pub data_dir: PathBuf,
    /// Name the upload is stored under, whatever the client called it.
    pub file_name: String,
    pub page_size: usize,
    pub top_transaction_types: usize,
    pub top_countries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: "transactions_biat.csv".to_string(),
            page_size: 50,
            top_transaction_types: 5,
            top_countries: 10,
        }
    }
}

impl Config {
    /// Read a TOML config; keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where uploads are written and loads read from.
    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    pub fn limits(&self) -> DashboardLimits {
        DashboardLimits {
            top_transaction_types: self.top_transaction_types,
            top_countries: self.top_countries,
        }
    }
}
