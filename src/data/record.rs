//! Record Module
//! Row view of the cleaned frame used by the tabular page.

use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;
use serde::Serialize;

use super::columns::{
    ACQUIRING_BANK, AMOUNT, CARD_TYPE, COUNTRY, ISSUING_BANK, TIMESTAMP, TRANSACTION_TYPE,
};

/// One cleaned row, as shown in the tabular view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub montant: Option<f64>,
    pub banque_emettrice: Option<String>,
    pub banque_aquereur: Option<String>,
    pub type_transaction: Option<String>,
    pub pays: Option<String>,
    pub type_carte: Option<String>,
}

impl TransactionRecord {
    /// Convert a cleaned frame into records, in row order.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Vec<TransactionRecord>> {
        let timestamps = read_timestamps(df)?;
        let amounts = read_amounts(df)?;
        let issuing = read_strings(df, ISSUING_BANK)?;
        let acquiring = read_strings(df, ACQUIRING_BANK)?;
        let types = read_strings(df, TRANSACTION_TYPE)?;
        let countries = read_strings(df, COUNTRY)?;
        let cards = read_strings(df, CARD_TYPE)?;

        let mut records = Vec::with_capacity(df.height());
        for (i, (timestamp, montant)) in timestamps.into_iter().zip(amounts).enumerate() {
            records.push(TransactionRecord {
                timestamp,
                montant,
                banque_emettrice: issuing[i].clone(),
                banque_aquereur: acquiring[i].clone(),
                type_transaction: types[i].clone(),
                pays: countries[i].clone(),
                type_carte: cards[i].clone(),
            });
        }

        Ok(records)
    }
}

fn read_timestamps(df: &DataFrame) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let as_millis = df.column(TIMESTAMP)?.cast(&DataType::Int64)?;

    Ok(as_millis
        .i64()?
        .into_iter()
        .map(|ms| {
            ms.and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
        })
        .collect())
}

fn read_amounts(df: &DataFrame) -> PolarsResult<Vec<Option<f64>>> {
    Ok(df.column(AMOUNT)?.f64()?.into_iter().collect())
}

fn read_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}
