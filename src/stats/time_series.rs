//! Time Series Module
//! Transactions per calendar day, zero-filled between the first and last day.

use chrono::{Days, NaiveDate};
use polars::prelude::*;
use serde::Serialize;

use crate::data::columns::TIMESTAMP;

const DAY: &str = "day";
const COUNT: &str = "count";

/// Days from 0001-01-01 to 1970-01-01; polars stores dates as days since the epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Transactions per calendar day between the first and last day seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub points: Vec<DailyCount>,
}

impl DailySeries {
    /// Build the series from a cleaned frame. Rows without a valid
    /// timestamp are skipped; days without rows are filled with zero.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<DailySeries> {
        let grouped = df
            .clone()
            .lazy()
            .select([col(TIMESTAMP).dt().date().alias(DAY)])
            .filter(col(DAY).is_not_null())
            .group_by([col(DAY)])
            .agg([len().alias(COUNT)])
            .sort([DAY], SortMultipleOptions::default())
            .collect()?;

        let days = grouped.column(DAY)?.cast(&DataType::Int32)?;
        let counts = grouped.column(COUNT)?.cast(&DataType::UInt64)?;

        let observed: Vec<DailyCount> = days
            .i32()?
            .into_iter()
            .zip(counts.u64()?)
            .filter_map(|(day, count)| {
                Some(DailyCount {
                    date: NaiveDate::from_num_days_from_ce_opt(day? + EPOCH_DAYS_FROM_CE)?,
                    count: count? as usize,
                })
            })
            .collect();

        Ok(DailySeries {
            points: Self::zero_fill(&observed),
        })
    }

    /// Insert zero-count days between sorted observations.
    fn zero_fill(observed: &[DailyCount]) -> Vec<DailyCount> {
        let mut points = Vec::with_capacity(observed.len());
        for point in observed {
            if let Some(prev) = points.last().map(|p: &DailyCount| p.date) {
                let mut day = prev;
                while let Some(next) = day.checked_add_days(Days::new(1)) {
                    if next >= point.date {
                        break;
                    }
                    points.push(DailyCount {
                        date: next,
                        count: 0,
                    });
                    day = next;
                }
            }
            points.push(*point);
        }
        points
    }

    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }

    /// Busiest day; the earliest one wins a tie.
    pub fn peak(&self) -> Option<DailyCount> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<DailyCount>, p| match best {
                Some(b) if b.count >= p.count => Some(b),
                _ => Some(p),
            })
    }
}
