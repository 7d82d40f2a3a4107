//! Data module - CSV loading, cleaning, paging and upload storage

mod loader;
mod page;
mod processor;
mod record;
mod upload;

pub use loader::TransactionLoader;
pub use page::{Page, TransactionPage};
pub use record::TransactionRecord;
pub use upload::store_upload;

/// Column names expected in the uploaded CSV.
pub mod columns {
    pub const ISSUING_BANK: &str = "banque_emettrice";
    pub const ACQUIRING_BANK: &str = "banque_aquereur";
    pub const TIMESTAMP: &str = "timestamp";
    pub const AMOUNT: &str = "montant";
    pub const TRANSACTION_TYPE: &str = "type_transaction";
    pub const COUNTRY: &str = "pays";
    pub const CARD_TYPE: &str = "type_carte";

    pub const REQUIRED: [&str; 7] = [
        ISSUING_BANK,
        ACQUIRING_BANK,
        TIMESTAMP,
        AMOUNT,
        TRANSACTION_TYPE,
        COUNTRY,
        CARD_TYPE,
    ];
}
