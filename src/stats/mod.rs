//! Stats module - Dashboard aggregates and the daily series

mod calculator;
#[cfg(test)]
mod tests;
mod time_series;

pub use calculator::{CategoryCount, DashboardLimits, DashboardStats, StatsCalculator};
pub use time_series::DailySeries;
