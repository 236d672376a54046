//! # Daily Metrics Builder
//!
//! A library for normalizing loosely-labelled spreadsheet exports of
//! per-product procurement and sales activity (a rolling 3-day window)
//! into canonical daily rows, and deriving a running-inventory and
//! monetary-amount series shaped for multi-series plotting.
//!
//! ## Core Concepts
//!
//! - **RawRecord**: one decoded spreadsheet row, arbitrary bilingual column
//!   labels mapped to untyped cells
//! - **CanonicalMetricRow**: one row per product per day index (1..=3),
//!   the durable unit handed to a persistence backend
//! - **Running inventory**: seeded from the day-1 opening stock, advanced
//!   by procurement minus sales each day, floored at zero for display
//! - **Pivot table**: three day-labeled rows with sparse
//!   `"<product_id>__<metric>"` keys, ready for a line chart
//!
//! ## Example
//!
//! ```rust,ignore
//! use daily_metrics_builder::*;
//! use chrono::NaiveDate;
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
//! let mut store = MemoryStore::new();
//!
//! let report = run_import(&records, anchor, &AliasTable::default(), &session, &mut store)?;
//! println!("imported {} rows, skipped {}", report.inserted, report.skipped);
//!
//! let selected: Vec<String> = store
//!     .product_options()?
//!     .into_iter()
//!     .map(|p| p.id)
//!     .collect();
//! let chart = build_chart_data(&store, &selected)?;
//! println!("{}", serde_json::to_string_pretty(&chart.rows)?);
//! ```

pub mod aggregate;
pub mod aliases;
pub mod error;
pub mod import;
pub mod normalize;
pub mod pivot;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod style;

pub use aggregate::{aggregate_series, ProductSeries};
pub use aliases::AliasTable;
pub use error::{MetricsError, Result};
pub use import::{run_import, run_import_chunked, ImportReport, Session, DEFAULT_CHUNK_SIZE};
pub use normalize::{day_for_index, normalize_record, normalize_records, NormalizedBatch};
pub use pivot::{build_pivot, PivotRow};
pub use resolve::{coerce_number, resolve_field, resolve_text};
pub use schema::{CanonicalMetricRow, DayIndex, ProductOption, RawRecord, SeriesPoint};
pub use store::{MemoryStore, MetricStore, StoreError};
pub use style::{build_legend, color_for, hue_for, series_key, LegendEntry, Metric};

use log::info;
use serde::Serialize;

/// Everything a renderer needs for one chart: the pivoted series plus
/// legend metadata with stable colors and dash patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub rows: Vec<PivotRow>,
    pub legend: Vec<LegendEntry>,
}

/// Queries the store for the selected products and assembles the
/// chart-ready table and legend.
///
/// Derived data only; safe to re-run on every selection change.
pub fn build_chart_data<S: MetricStore>(store: &S, selected: &[String]) -> Result<ChartData> {
    let products = store.product_options()?;
    let rows = store.rows_for_products(selected)?;

    info!(
        "building chart data for {} selected product(s) over {} rows",
        selected.len(),
        rows.len()
    );

    let series = aggregate_series(selected, &rows);
    Ok(ChartData {
        rows: build_pivot(&series),
        legend: build_legend(selected, &products),
    })
}
