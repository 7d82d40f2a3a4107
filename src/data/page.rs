//! Paging Module
//! Slices the cleaned frame into fixed-size pages for the tabular view.

use polars::prelude::*;
use serde::Serialize;

use super::record::TransactionRecord;

/// Requested slice of the table, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    /// Page numbers below 1 are read as 1; a zero size is read as 1.
    pub fn new(number: usize, size: usize) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// First row of the page, or `None` when it does not fit in `usize`.
    pub fn offset(&self) -> Option<usize> {
        self.number
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.size))
    }

    /// Number of pages needed for `rows`; an empty table still has one page.
    pub fn total_pages(&self, rows: usize) -> usize {
        rows.div_ceil(self.size).max(1)
    }
}

/// One page of the tabular view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub transactions: Vec<TransactionRecord>,
}

impl TransactionPage {
    /// Slice the cleaned frame; pages past the end are empty.
    pub fn from_frame(df: &DataFrame, page: Page) -> PolarsResult<TransactionPage> {
        let total_rows = df.height();
        let transactions = match page.offset() {
            Some(offset) if offset < total_rows => {
                let slice = df.slice(offset as i64, page.size);
                TransactionRecord::from_frame(&slice)?
            }
            _ => Vec::new(),
        };

        Ok(TransactionPage {
            page: page.number,
            page_size: page.size,
            total_pages: page.total_pages(total_rows),
            total_rows,
            transactions,
        })
    }
}
