//! CSV Data Loader Module
//! Reads the stored transactions CSV with Polars and runs the cleaning pass.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::columns::REQUIRED;
use super::processor::{BankRemap, DataProcessor};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Transactions file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing column in CSV: {0}")]
    MissingColumn(String),
}

/// Loads and cleans the transactions file on every call.
///
/// Nothing is cached: each request gets a freshly read frame.
pub struct TransactionLoader {
    file_path: PathBuf,
    remap: BankRemap,
}

impl TransactionLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            remap: BankRemap::default(),
        }
    }

    /// Get file path.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read the CSV and return the cleaned frame.
    pub fn load(&self) -> Result<DataFrame, LoaderError> {
        let mut df = Self::read_raw(&self.file_path)?;

        for name in REQUIRED {
            if !df.get_column_names().iter().any(|c| c.as_str() == name) {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        let report = DataProcessor::clean(&mut df, &self.remap)?;
        if report.invalid_amounts > 0 || report.invalid_timestamps > 0 {
            warn!(
                invalid_amounts = report.invalid_amounts,
                invalid_timestamps = report.invalid_timestamps,
                "cells coerced to null"
            );
        }

        info!(
            path = %self.file_path.display(),
            rows = df.height(),
            remapped_issuing = report.remapped_issuing,
            remapped_acquiring = report.remapped_acquiring,
            "loaded transactions"
        );
        Ok(df)
    }

    /// Read every column as a string; typing happens in the cleaning pass.
    fn read_raw(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        Ok(df)
    }
}
