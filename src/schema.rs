use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A decoded spreadsheet row: arbitrary column labels mapped to untyped
/// cell values, exactly as a sheet-to-JSON decoder produces them.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Position of a record within the rolling 3-day window. Day 3 is the most
/// recent day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DayIndex {
    Day1,
    Day2,
    Day3,
}

impl DayIndex {
    pub const ALL: [DayIndex; 3] = [DayIndex::Day1, DayIndex::Day2, DayIndex::Day3];

    pub fn as_u8(self) -> u8 {
        match self {
            DayIndex::Day1 => 1,
            DayIndex::Day2 => 2,
            DayIndex::Day3 => 3,
        }
    }

    /// Axis label used by the pivot table ("Day 1" .. "Day 3").
    pub fn label(self) -> &'static str {
        match self {
            DayIndex::Day1 => "Day 1",
            DayIndex::Day2 => "Day 2",
            DayIndex::Day3 => "Day 3",
        }
    }

    /// Days back from the anchor date: Day 3 is the anchor itself.
    pub(crate) fn days_before_anchor(self) -> u64 {
        match self {
            DayIndex::Day1 => 2,
            DayIndex::Day2 => 1,
            DayIndex::Day3 => 0,
        }
    }
}

impl From<DayIndex> for u8 {
    fn from(idx: DayIndex) -> u8 {
        idx.as_u8()
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(DayIndex::Day1),
            2 => Ok(DayIndex::Day2),
            3 => Ok(DayIndex::Day3),
            other => Err(format!("day_index must be 1, 2 or 3 (got {})", other)),
        }
    }
}

impl JsonSchema for DayIndex {
    fn schema_name() -> String {
        "DayIndex".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        let mut schema = u8::json_schema(gen).into_object();
        schema.number().minimum = Some(1.0);
        schema.number().maximum = Some(3.0);
        schemars::schema::Schema::Object(schema)
    }
}

/// The durable unit of normalized data: one row per product per day index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CanonicalMetricRow {
    pub product_id: String,
    pub product_name: String,

    /// Calendar date derived from `day_index` at normalization time.
    /// Not recomputed afterwards.
    pub day: NaiveDate,
    pub day_index: DayIndex,

    /// Stock at the start of day 1. Populated only on the day-1 row; the
    /// sole seed value for the running inventory balance.
    pub opening_inventory_day1: Option<f64>,

    pub procurement_qty: Option<f64>,
    pub procurement_price: Option<f64>,
    pub sales_qty: Option<f64>,
    pub sales_price: Option<f64>,
}

impl CanonicalMetricRow {
    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(CanonicalMetricRow);
        serde_json::to_string_pretty(&schema)
    }
}

/// A selectable product, deduplicated by id, derived from the persisted
/// row set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
}

/// Derived per-product, per-day values. Recomputed on every aggregation
/// request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Running inventory balance, rounded and floored at zero for display.
    pub inventory: u64,
    pub procurement_amount: f64,
    pub sales_amount: f64,
}
