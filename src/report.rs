//! Report Module
//! Plain-text and JSON rendering of dashboard results for the terminal.

use serde::Serialize;
use std::io::Write;

use crate::data::{TransactionPage, TransactionRecord};
use crate::stats::{CategoryCount, DailySeries, DashboardStats};

/// Write any result as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_dashboard<W: Write>(out: &mut W, stats: &DashboardStats) -> std::io::Result<()> {
    writeln!(out, "Transactions:   {}", stats.total_transactions)?;
    writeln!(out, "Montant total:  {:.2}", stats.total_montant)?;
    match stats.montant_moyen {
        Some(mean) => writeln!(out, "Montant moyen:  {mean:.2}")?,
        None => writeln!(out, "Montant moyen:  -")?,
    }

    writeln!(out)?;
    writeln!(out, "Transactions par heure")?;
    for h in &stats.transactions_par_heure {
        writeln!(out, "  {:02}h  {:>6}", h.hour, h.count)?;
    }

    write_counts(out, "Top types de transactions", &stats.top_transactions)?;
    write_counts(out, "Top pays", &stats.pays_distribution)?;
    write_counts(out, "Types de carte", &stats.carte_distribution)?;
    Ok(())
}

fn write_counts<W: Write>(
    out: &mut W,
    title: &str,
    counts: &[CategoryCount],
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    let width = counts.iter().map(|c| c.label.chars().count()).max().unwrap_or(0);
    for c in counts {
        writeln!(
            out,
            "  {:<width$}  {:>6}  {:>5.1}%",
            c.label, c.count, c.percent
        )?;
    }
    Ok(())
}

const PAGE_HEADER: [&str; 7] = [
    "timestamp",
    "montant",
    "banque_emettrice",
    "banque_aquereur",
    "type_transaction",
    "pays",
    "type_carte",
];

/// Write a page heading followed by its rows as quoted CSV.
pub fn write_page<W: Write>(out: &mut W, page: &TransactionPage) -> std::io::Result<()> {
    writeln!(
        out,
        "Page {}/{} ({} transactions)",
        page.page, page.total_pages, page.total_rows
    )?;

    let mut wtr = csv::Writer::from_writer(&mut *out);
    wtr.write_record(PAGE_HEADER)?;
    for record in &page.transactions {
        wtr.write_record(record_fields(record))?;
    }
    wtr.flush()?;
    Ok(())
}

fn record_fields(r: &TransactionRecord) -> [String; 7] {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        r.timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        r.montant.map(|m| m.to_string()).unwrap_or_default(),
        text(&r.banque_emettrice),
        text(&r.banque_aquereur),
        text(&r.type_transaction),
        text(&r.pays),
        text(&r.type_carte),
    ]
}

pub fn write_series<W: Write>(out: &mut W, series: &DailySeries) -> std::io::Result<()> {
    writeln!(out, "date,count")?;
    for p in &series.points {
        writeln!(out, "{},{}", p.date, p.count)?;
    }
    if let Some(peak) = series.peak() {
        writeln!(out)?;
        writeln!(
            out,
            "{} transactions over {} days, peak {} on {}",
            series.total(),
            series.points.len(),
            peak.count,
            peak.date
        )?;
    }
    Ok(())
}
