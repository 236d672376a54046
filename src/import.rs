use crate::aliases::AliasTable;
use crate::error::{MetricsError, Result};
use crate::normalize::normalize_records;
use crate::schema::RawRecord;
use crate::store::MetricStore;
use chrono::NaiveDate;
use log::{debug, info};

/// Rows per insert chunk. Matches the batch size the persistence backend
/// accepts in one atomic call.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Identity collaborator: answers whether an active user session exists.
/// Checked once, before any write.
pub trait Session {
    fn is_authenticated(&self) -> bool;
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Canonical rows committed to the store.
    pub inserted: usize,
    /// Input records dropped for lacking a product id or name.
    pub skipped: usize,
}

/// Runs the full import boundary: normalize, gate on the session, then
/// write in chunks.
///
/// Chunks are issued strictly sequentially; the first failing chunk is
/// terminal and reports the 1-indexed row offset where it started. Rows
/// committed by earlier chunks stay committed — there is no rollback and
/// no retry.
pub fn run_import<S: MetricStore>(
    records: &[RawRecord],
    anchor: NaiveDate,
    aliases: &AliasTable,
    session: &dyn Session,
    store: &mut S,
) -> Result<ImportReport> {
    run_import_chunked(records, anchor, aliases, session, store, DEFAULT_CHUNK_SIZE)
}

/// [`run_import`] with an explicit chunk size.
pub fn run_import_chunked<S: MetricStore>(
    records: &[RawRecord],
    anchor: NaiveDate,
    aliases: &AliasTable,
    session: &dyn Session,
    store: &mut S,
    chunk_size: usize,
) -> Result<ImportReport> {
    if records.is_empty() {
        return Err(MetricsError::EmptyInput);
    }

    let batch = normalize_records(records, anchor, aliases);
    if batch.rows.is_empty() {
        return Err(MetricsError::NoRecognizedRows);
    }

    if !session.is_authenticated() {
        return Err(MetricsError::NotAuthenticated);
    }

    info!(
        "importing {} rows ({} record(s) skipped)",
        batch.rows.len(),
        batch.skipped
    );

    let chunk_size = chunk_size.max(1);
    let mut inserted = 0;

    for (chunk_no, chunk) in batch.rows.chunks(chunk_size).enumerate() {
        let first_row = chunk_no * chunk_size + 1;
        store
            .insert_rows(chunk)
            .map_err(|source| MetricsError::BatchWrite { first_row, source })?;
        inserted += chunk.len();
        debug!("inserted {}/{} rows", inserted, batch.rows.len());
    }

    info!("import committed {} rows", inserted);

    Ok(ImportReport {
        inserted,
        skipped: batch.skipped,
    })
}
