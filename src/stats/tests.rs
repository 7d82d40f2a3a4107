use super::calculator::{DashboardLimits, HourCount, StatsCalculator};
use super::time_series::{DailyCount, DailySeries};

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tempfile::TempDir;

use crate::data::{TransactionLoader, TransactionRecord};

const HEADER: &str =
    "timestamp,montant,banque_emettrice,banque_aquereur,type_transaction,pays,type_carte";

fn load(dir: &TempDir, rows: &[&str]) -> Result<(PathBuf, DataFrame)> {
    let path = dir.path().join("transactions_biat.csv");
    let body = std::iter::once(HEADER)
        .chain(rows.iter().copied())
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&path, body)?;
    let df = TransactionLoader::new(&path).load()?;
    Ok((path, df))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_three_row_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let (_, df) = load(
        &dir,
        &[
            "2024-01-01 10:00:00,10,BM7,BIAT,Achat,Tunisie,Visa",
            "2024-01-01 11:00:00,20,BIAT,SG871,Achat,Tunisie,Visa",
            "2024-01-02 10:30:00,bad,BIAT,BIAT,Retrait,France,Mastercard",
        ],
    )?;

    let stats = StatsCalculator::compute_dashboard(&df, DashboardLimits::default())?;
    let records = TransactionRecord::from_frame(&df)?;

    assert_eq!(stats.total_transactions, 3);
    assert_eq!(stats.total_montant, 30.0);
    assert_eq!(stats.montant_moyen, Some(15.0));

    // BM7 is an issuing-bank code and SG871 an acquiring-bank code.
    let issuing: Vec<_> = records.iter().map(|r| r.banque_emettrice.as_deref()).collect();
    let acquiring: Vec<_> = records.iter().map(|r| r.banque_aquereur.as_deref()).collect();
    assert_eq!(issuing, vec![Some("BIAT"), Some("BIAT"), Some("BIAT")]);
    assert_eq!(
        acquiring,
        vec![Some("BIAT"), Some("Société Générale"), Some("BIAT")]
    );
    assert_eq!(
        [issuing[0], acquiring[1], issuing[2]],
        [Some("BIAT"), Some("Société Générale"), Some("BIAT")]
    );

    Ok(())
}

#[test]
fn test_unparseable_timestamp_counts_only_in_total() -> Result<()> {
    let dir = TempDir::new()?;
    let (_, df) = load(
        &dir,
        &[
            "2024-01-01 09:10:00,1,BIAT,UBCI,Achat,Tunisie,Visa",
            "2024-01-01 09:50:00,1,BIAT,UBCI,Achat,Tunisie,Visa",
            "2024-01-03 17:00:00,1,BIAT,UBCI,Achat,Tunisie,Visa",
            "n/a,1,BIAT,UBCI,Achat,Tunisie,Visa",
        ],
    )?;

    let stats = StatsCalculator::compute_dashboard(&df, DashboardLimits::default())?;
    let series = DailySeries::from_frame(&df)?;

    assert_eq!(stats.total_transactions, 4);
    assert_eq!(
        stats.transactions_par_heure,
        vec![
            HourCount { hour: 9, count: 2 },
            HourCount { hour: 17, count: 1 }
        ]
    );
    assert_eq!(series.total(), 3);

    Ok(())
}

#[test]
fn test_daily_series_is_zero_filled() -> Result<()> {
    let dir = TempDir::new()?;
    let (_, df) = load(
        &dir,
        &[
            "2024-02-28 10:00:00,1,BIAT,UBCI,Achat,Tunisie,Visa",
            "2024-03-01 10:00:00,1,BIAT,UBCI,Achat,Tunisie,Visa",
            "2024-03-01 23:59:59,1,BIAT,UBCI,Achat,Tunisie,Visa",
        ],
    )?;

    let series = DailySeries::from_frame(&df)?;

    assert_eq!(
        series.points,
        vec![
            DailyCount { date: date(2024, 2, 28), count: 1 },
            DailyCount { date: date(2024, 2, 29), count: 0 },
            DailyCount { date: date(2024, 3, 1), count: 2 },
        ]
    );
    assert_eq!(
        series.peak(),
        Some(DailyCount { date: date(2024, 3, 1), count: 2 })
    );

    Ok(())
}

#[test]
fn test_daily_series_without_timestamps_is_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let (_, df) = load(&dir, &["jamais,1,BIAT,UBCI,Achat,Tunisie,Visa"])?;

    let series = DailySeries::from_frame(&df)?;

    assert!(series.points.is_empty());
    assert_eq!(series.peak(), None);

    Ok(())
}

#[test]
fn test_value_counts_order_and_limits() -> Result<()> {
    let dir = TempDir::new()?;
    let (_, df) = load(
        &dir,
        &[
            "2024-01-01 10:00:00,1,BIAT,UBCI,Retrait,Tunisie,Visa",
            "2024-01-01 10:00:00,1,BIAT,UBCI,Achat,France,Visa",
            "2024-01-01 10:00:00,1,BIAT,UBCI,Achat,Italie,Mastercard",
            "2024-01-01 10:00:00,1,BIAT,UBCI,Virement,France,",
            "2024-01-01 10:00:00,1,BIAT,UBCI,Retrait,Tunisie,Visa",
            "2024-01-01 10:00:00,1,BIAT,UBCI,Remboursement,Maroc,Visa",
        ],
    )?;

    let limits = DashboardLimits {
        top_transaction_types: 3,
        top_countries: 2,
    };
    let stats = StatsCalculator::compute_dashboard(&df, limits)?;

    let types: Vec<_> = stats
        .top_transactions
        .iter()
        .map(|c| (c.label.as_str(), c.count))
        .collect();
    assert_eq!(types, vec![("Retrait", 2), ("Achat", 2), ("Virement", 1)]);

    let countries: Vec<_> = stats
        .pays_distribution
        .iter()
        .map(|c| (c.label.as_str(), c.count))
        .collect();
    assert_eq!(countries, vec![("Tunisie", 2), ("France", 2)]);

    // Null card type is not counted, so shares are out of 5.
    let cards: Vec<_> = stats
        .carte_distribution
        .iter()
        .map(|c| (c.label.as_str(), c.count, c.percent))
        .collect();
    assert_eq!(cards, vec![("Visa", 4, 80.0), ("Mastercard", 1, 20.0)]);

    Ok(())
}

#[test]
fn test_no_valid_amounts() -> Result<()> {
    let dir = TempDir::new()?;
    let (_, df) = load(&dir, &["2024-01-01 10:00:00,abc,BIAT,UBCI,Achat,Tunisie,Visa"])?;

    let stats = StatsCalculator::compute_dashboard(&df, DashboardLimits::default())?;

    assert_eq!(stats.total_transactions, 1);
    assert_eq!(stats.total_montant, 0.0);
    assert_eq!(stats.montant_moyen, None);

    Ok(())
}

#[test]
fn test_reloading_same_file_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let (path, first) = load(
        &dir,
        &[
            "2024-01-01 10:00:00,10,BM7,SG871,Achat,Tunisie,Visa",
            "2024-01-02 14:00:00,25.5,BIAT,Anno Bank,Retrait,France,Mastercard",
            "oops,x,BIAT,UBCI,Achat,Tunisie,Visa",
        ],
    )?;
    let second = TransactionLoader::new(&path).load()?;

    assert_eq!(
        StatsCalculator::compute_dashboard(&first, DashboardLimits::default())?,
        StatsCalculator::compute_dashboard(&second, DashboardLimits::default())?
    );
    assert_eq!(DailySeries::from_frame(&first)?, DailySeries::from_frame(&second)?);

    Ok(())
}
