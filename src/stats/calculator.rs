//! Statistics Calculator Module
//! Computes the dashboard aggregates from a cleaned transactions frame.

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::data::columns::{AMOUNT, CARD_TYPE, COUNTRY, TIMESTAMP, TRANSACTION_TYPE};

const COUNT: &str = "count";
const HOUR: &str = "hour";

/// Number of transactions observed in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Share of the counted (non-null) values, in percent.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_transactions: usize,
    pub total_montant: f64,
    pub montant_moyen: Option<f64>,
    pub transactions_par_heure: Vec<HourCount>,
    pub top_transactions: Vec<CategoryCount>,
    pub pays_distribution: Vec<CategoryCount>,
    pub carte_distribution: Vec<CategoryCount>,
}

/// Bucket limits applied by [`StatsCalculator::compute_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    pub top_transaction_types: usize,
    pub top_countries: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            top_transaction_types: 5,
            top_countries: 10,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute all dashboard aggregates.
    pub fn compute_dashboard(
        df: &DataFrame,
        limits: DashboardLimits,
    ) -> PolarsResult<DashboardStats> {
        let amounts = df.column(AMOUNT)?.f64()?;
        let total_montant = amounts.sum().unwrap_or(0.0);
        let montant_moyen = amounts.mean();

        let transactions_par_heure = Self::hourly_counts(df)?;

        // Categorical columns are independent; count them on the rayon pool.
        let specs = [
            (TRANSACTION_TYPE, Some(limits.top_transaction_types)),
            (COUNTRY, Some(limits.top_countries)),
            (CARD_TYPE, None),
        ];
        let mut counted: HashMap<&str, Vec<CategoryCount>> = specs
            .par_iter()
            .map(|(name, limit)| Self::value_counts(df, name, *limit).map(|c| (*name, c)))
            .collect::<PolarsResult<_>>()?;

        let stats = DashboardStats {
            total_transactions: df.height(),
            total_montant,
            montant_moyen,
            transactions_par_heure,
            top_transactions: counted.remove(TRANSACTION_TYPE).unwrap_or_default(),
            pays_distribution: counted.remove(COUNTRY).unwrap_or_default(),
            carte_distribution: counted.remove(CARD_TYPE).unwrap_or_default(),
        };

        debug!(
            total = stats.total_transactions,
            valid_amounts = amounts.len() - amounts.null_count(),
            "dashboard stats computed"
        );
        Ok(stats)
    }

    /// Count rows per value of a string column, most frequent first.
    ///
    /// Equal counts keep the order in which values first appear: groups come
    /// out of `group_by_stable` in encounter order and the sort keeps it.
    /// Nulls are not counted.
    pub fn value_counts(
        df: &DataFrame,
        column: &str,
        limit: Option<usize>,
    ) -> PolarsResult<Vec<CategoryCount>> {
        let values = df.column(column)?;
        let counted = values.len() - values.null_count();

        let mut grouped = df
            .clone()
            .lazy()
            .select([col(column)])
            .filter(col(column).is_not_null())
            .group_by_stable([col(column)])
            .agg([len().alias(COUNT)])
            .sort(
                [COUNT],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            );
        if let Some(limit) = limit {
            grouped = grouped.limit(limit as IdxSize);
        }
        let grouped = grouped.collect()?;

        let labels = grouped.column(column)?.str()?;
        let counts = grouped.column(COUNT)?.cast(&DataType::UInt64)?;

        Ok(labels
            .into_iter()
            .zip(counts.u64()?)
            .filter_map(|(label, count)| {
                let count = count? as usize;
                Some(CategoryCount {
                    label: label?.to_string(),
                    count,
                    percent: count as f64 * 100.0 / counted as f64,
                })
            })
            .collect())
    }

    /// Count rows per hour of day; hours with no rows are omitted.
    pub fn hourly_counts(df: &DataFrame) -> PolarsResult<Vec<HourCount>> {
        let grouped = df
            .clone()
            .lazy()
            .select([col(TIMESTAMP).dt().hour().cast(DataType::UInt32).alias(HOUR)])
            .filter(col(HOUR).is_not_null())
            .group_by([col(HOUR)])
            .agg([len().alias(COUNT)])
            .sort([HOUR], SortMultipleOptions::default())
            .collect()?;

        let hours = grouped.column(HOUR)?.u32()?;
        let counts = grouped.column(COUNT)?.cast(&DataType::UInt64)?;

        Ok(hours
            .into_iter()
            .zip(counts.u64()?)
            .filter_map(|(hour, count)| {
                Some(HourCount {
                    hour: hour?,
                    count: count? as usize,
                })
            })
            .collect())
    }
}
