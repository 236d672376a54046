use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("the spreadsheet contained no rows")]
    EmptyInput,

    #[error("no importable rows were recognized; check that the columns include a product id/name and Day 1/2/3 Qty/Price headers")]
    NoRecognizedRows,

    #[error("not signed in; an active session is required before importing")]
    NotAuthenticated,

    #[error("batch insert failed starting at row {first_row}: {source}")]
    BatchWrite {
        /// 1-indexed offset of the first row in the failed chunk.
        first_row: usize,
        source: StoreError,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
