use crate::schema::{CanonicalMetricRow, ProductOption};
use std::collections::BTreeSet;
use thiserror::Error;

/// Failure reported by a persistence backend, surfaced verbatim to the
/// caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Persistence seam for canonical rows.
///
/// All operations are discrete, sequential request/response calls; the
/// transform layer never holds a connection. Each `insert_rows` call is one
/// chunk and must be atomic: fully applied or fully rejected with an error.
pub trait MetricStore {
    /// Inserts one chunk of rows atomically.
    fn insert_rows(&mut self, rows: &[CanonicalMetricRow]) -> Result<(), StoreError>;

    /// Distinct non-empty product ids, ascending, each paired with a
    /// display name.
    fn product_options(&self) -> Result<Vec<ProductOption>, StoreError>;

    /// Rows filtered to the given ids, ordered by day index ascending then
    /// day ascending.
    fn rows_for_products(&self, ids: &[String]) -> Result<Vec<CanonicalMetricRow>, StoreError>;
}

/// In-memory reference implementation backing tests and demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<CanonicalMetricRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[CanonicalMetricRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl MetricStore for MemoryStore {
    fn insert_rows(&mut self, rows: &[CanonicalMetricRow]) -> Result<(), StoreError> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    fn product_options(&self) -> Result<Vec<ProductOption>, StoreError> {
        let mut options = Vec::new();
        let mut seen = BTreeSet::new();

        let mut ordered: Vec<&CanonicalMetricRow> = self.rows.iter().collect();
        ordered.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        for row in ordered {
            let id = row.product_id.trim();
            if id.is_empty() || !seen.insert(id.to_string()) {
                continue;
            }
            let name = if row.product_name.trim().is_empty() {
                id.to_string()
            } else {
                row.product_name.clone()
            };
            options.push(ProductOption {
                id: id.to_string(),
                name,
            });
        }

        Ok(options)
    }

    fn rows_for_products(&self, ids: &[String]) -> Result<Vec<CanonicalMetricRow>, StoreError> {
        let wanted: BTreeSet<&str> = ids.iter().map(|s| s.trim()).collect();
        let mut rows: Vec<CanonicalMetricRow> = self
            .rows
            .iter()
            .filter(|row| wanted.contains(row.product_id.trim()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.day_index, a.day).cmp(&(b.day_index, b.day)));
        Ok(rows)
    }
}
