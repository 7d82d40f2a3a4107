//! Data Processor Module
//! Handles data cleaning: bank-name normalization and type coercion.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use super::columns::{ACQUIRING_BANK, AMOUNT, ISSUING_BANK, TIMESTAMP};

/// Issuing-bank corrections.
pub const ISSUING_BANK_FIXES: &[(&str, &str)] = &[("BM7", "BIAT")];

/// Acquiring-bank corrections.
pub const ACQUIRING_BANK_FIXES: &[(&str, &str)] = &[
    ("BMP Paribas", "BNP Paribas"),
    ("SG871", "Société Générale"),
    ("Univredit", "Unicredit"),
    ("Ocelet Agricole", "Credit Agricole"),
    ("Zionna Bank", "Zitouna Bank"),
    ("Anno Bank", "Amen Bank"),
    // Unconfirmed mapping, kept as received.
    ("USGSM", "UBCI"),
];

/// Formats tried in order for naive timestamps.
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Lookup tables applied to the two bank columns.
#[derive(Debug, Clone, Copy)]
pub struct BankRemap {
    pub issuing: &'static [(&'static str, &'static str)],
    pub acquiring: &'static [(&'static str, &'static str)],
}

impl Default for BankRemap {
    fn default() -> Self {
        Self {
            issuing: ISSUING_BANK_FIXES,
            acquiring: ACQUIRING_BANK_FIXES,
        }
    }
}

impl BankRemap {
    /// Map a raw bank name through a table; unknown names pass through.
    pub fn apply<'a>(table: &'a [(&'a str, &'a str)], raw: &'a str) -> &'a str {
        table
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, to)| *to)
            .unwrap_or(raw)
    }
}

/// What one cleaning pass changed, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub invalid_timestamps: usize,
    pub invalid_amounts: usize,
    pub remapped_issuing: usize,
    pub remapped_acquiring: usize,
}

/// Handles the single normalization pass over a freshly read frame.
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize bank names and coerce `timestamp`/`montant` in place.
    ///
    /// Expects the listed columns to be present as strings, which is how
    /// the loader reads every column.
    pub fn clean(df: &mut DataFrame, remap: &BankRemap) -> PolarsResult<CleaningReport> {
        let mut report = CleaningReport::default();

        let (issuing, changed) = Self::remap_column(df, ISSUING_BANK, remap.issuing)?;
        report.remapped_issuing = changed;
        df.with_column(issuing)?;

        let (acquiring, changed) = Self::remap_column(df, ACQUIRING_BANK, remap.acquiring)?;
        report.remapped_acquiring = changed;
        df.with_column(acquiring)?;

        let (timestamps, invalid) = Self::coerce_timestamps(df)?;
        report.invalid_timestamps = invalid;
        df.with_column(timestamps)?;

        let (amounts, invalid) = Self::coerce_amounts(df)?;
        report.invalid_amounts = invalid;
        df.with_column(amounts)?;

        debug!(?report, "cleaning pass finished");
        Ok(report)
    }

    fn remap_column(
        df: &DataFrame,
        name: &str,
        table: &[(&str, &str)],
    ) -> PolarsResult<(Column, usize)> {
        let raw = df.column(name)?.str()?;
        let mut changed = 0;

        let values: Vec<Option<String>> = raw
            .into_iter()
            .map(|cell| {
                cell.map(|v| {
                    let fixed = BankRemap::apply(table, v);
                    if fixed != v {
                        changed += 1;
                    }
                    fixed.to_string()
                })
            })
            .collect();

        Ok((Column::new(name.into(), values), changed))
    }

    fn coerce_timestamps(df: &DataFrame) -> PolarsResult<(Column, usize)> {
        let raw = df.column(TIMESTAMP)?.str()?;
        let mut invalid = 0;

        let millis: Vec<Option<i64>> = raw
            .into_iter()
            .map(|cell| {
                let parsed = cell.and_then(parse_timestamp);
                if parsed.is_none() {
                    invalid += 1;
                }
                parsed.map(|dt| dt.and_utc().timestamp_millis())
            })
            .collect();

        let column = Column::new(TIMESTAMP.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        Ok((column, invalid))
    }

    fn coerce_amounts(df: &DataFrame) -> PolarsResult<(Column, usize)> {
        let raw = df.column(AMOUNT)?.str()?;
        let mut invalid = 0;

        let amounts: Vec<Option<f64>> = raw
            .into_iter()
            .map(|cell| {
                let parsed = cell.and_then(parse_amount);
                if parsed.is_none() {
                    invalid += 1;
                }
                parsed
            })
            .collect();

        Ok((Column::new(AMOUNT.into(), amounts), invalid))
    }
}

/// Parse a timestamp cell, returning `None` when no known format matches.
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse an amount cell; non-numeric and non-finite values are `None`.
pub fn parse_amount(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
