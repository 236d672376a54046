use crate::aliases::AliasTable;
use crate::resolve::{coerce_number, resolve_field, resolve_text};
use crate::schema::{CanonicalMetricRow, DayIndex, RawRecord};
use chrono::{Days, NaiveDate};
use log::debug;

/// Maps a day index to its calendar date, anchored to a caller-supplied
/// current date: day 3 is the anchor, day 2 the day before, day 1 two days
/// before.
///
/// The anchor is evaluated at normalization time, not carried in the source
/// data, so importing the same spreadsheet on different days yields
/// different `day` values for the same index. Callers own the clock; this
/// function never reads it.
pub fn day_for_index(anchor: NaiveDate, index: DayIndex) -> NaiveDate {
    anchor
        .checked_sub_days(Days::new(index.days_before_anchor()))
        .unwrap_or(anchor)
}

/// Output of normalizing a batch of raw records.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub rows: Vec<CanonicalMetricRow>,
    /// Records dropped because product id or name was empty after trimming.
    pub skipped: usize,
}

/// Expands one raw record into exactly three canonical rows (one per day
/// index), or zero rows when the product id or name is missing.
pub fn normalize_record(
    record: &RawRecord,
    anchor: NaiveDate,
    aliases: &AliasTable,
) -> Vec<CanonicalMetricRow> {
    let product_id = resolve_text(record, &aliases.product_id);
    let product_name = resolve_text(record, &aliases.product_name);

    if product_id.is_empty() || product_name.is_empty() {
        return Vec::new();
    }

    // Day-independent field, extracted once.
    let opening_inventory =
        resolve_field(record, &aliases.opening_inventory).and_then(coerce_number);

    DayIndex::ALL
        .iter()
        .map(|&index| {
            let qty_aliases = AliasTable::for_day(&aliases.procurement_qty, index);
            let price_aliases = AliasTable::for_day(&aliases.procurement_price, index);
            let sales_qty_aliases = AliasTable::for_day(&aliases.sales_qty, index);
            let sales_price_aliases = AliasTable::for_day(&aliases.sales_price, index);

            CanonicalMetricRow {
                product_id: product_id.clone(),
                product_name: product_name.clone(),
                day: day_for_index(anchor, index),
                day_index: index,
                opening_inventory_day1: if index == DayIndex::Day1 {
                    opening_inventory
                } else {
                    None
                },
                procurement_qty: resolve_field(record, &qty_aliases).and_then(coerce_number),
                procurement_price: resolve_field(record, &price_aliases).and_then(coerce_number),
                sales_qty: resolve_field(record, &sales_qty_aliases).and_then(coerce_number),
                sales_price: resolve_field(record, &sales_price_aliases).and_then(coerce_number),
            }
        })
        .collect()
}

/// Normalizes a sequence of raw records, counting silently skipped ones.
///
/// Skipping is intentional filtering, not an error: a record without an id
/// or name has nothing to key a series on.
pub fn normalize_records(
    records: &[RawRecord],
    anchor: NaiveDate,
    aliases: &AliasTable,
) -> NormalizedBatch {
    let mut rows = Vec::with_capacity(records.len() * DayIndex::ALL.len());
    let mut skipped = 0;

    for record in records {
        let expanded = normalize_record(record, anchor, aliases);
        if expanded.is_empty() {
            skipped += 1;
        } else {
            rows.extend(expanded);
        }
    }

    if skipped > 0 {
        debug!("skipped {} record(s) with no product id/name", skipped);
    }

    NormalizedBatch { rows, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn full_record() -> RawRecord {
        let value = json!({
            "ID": "P001",
            "Product Name": "Widget",
            "Opening Inventory": 100,
            "Procurement Qty (Day 1)": 20,
            "Procurement Price (Day 1)": 3.5,
            "Sales Qty (Day 1)": 10,
            "Sales Price (Day 1)": 5,
            "Procurement Qty (Day 2)": "",
            "Sales Qty (Day 2)": 5,
            "Procurement Qty (Day 3)": 50,
            "Sales Qty (Day 3)": "abc"
        });
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn day_assignment_counts_back_from_anchor() {
        assert_eq!(
            day_for_index(anchor(), DayIndex::Day3),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(
            day_for_index(anchor(), DayIndex::Day2),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
        assert_eq!(
            day_for_index(anchor(), DayIndex::Day1),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
    }

    #[test]
    fn day_assignment_crosses_month_boundaries() {
        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            day_for_index(first, DayIndex::Day1),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()
        );
    }

    #[test]
    fn complete_record_expands_to_three_rows() {
        let rows = normalize_record(&full_record(), anchor(), &AliasTable::default());

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.day_index.as_u8()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for row in &rows {
            assert_eq!(row.product_id, "P001");
            assert_eq!(row.product_name, "Widget");
        }

        // Opening inventory only lands on the day-1 row.
        assert_eq!(rows[0].opening_inventory_day1, Some(100.0));
        assert_eq!(rows[1].opening_inventory_day1, None);
        assert_eq!(rows[2].opening_inventory_day1, None);

        // Day-specific fields resolve independently per day.
        assert_eq!(rows[0].procurement_qty, Some(20.0));
        assert_eq!(rows[0].procurement_price, Some(3.5));
        assert_eq!(rows[1].procurement_qty, None);
        assert_eq!(rows[1].sales_qty, Some(5.0));
        assert_eq!(rows[2].procurement_qty, Some(50.0));
        assert_eq!(rows[2].sales_qty, None);
    }

    #[test]
    fn record_without_id_or_name_is_skipped() {
        let mut no_id = full_record();
        no_id.insert("ID".to_string(), json!("   "));
        assert!(normalize_record(&no_id, anchor(), &AliasTable::default()).is_empty());

        let mut no_name = full_record();
        no_name.remove("Product Name");
        assert!(normalize_record(&no_name, anchor(), &AliasTable::default()).is_empty());
    }

    #[test]
    fn batch_reports_skip_count() {
        let mut blank = RawRecord::new();
        blank.insert("Comment".to_string(), json!("header junk"));

        let records = vec![full_record(), blank, full_record()];
        let batch = normalize_records(&records, anchor(), &AliasTable::default());

        assert_eq!(batch.rows.len(), 6);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn bilingual_headers_resolve() {
        let value = json!({
            "货号": "SKU-9",
            "产品名称": "茶壶",
            "期初库存": "15",
            "采购 数量 (Day 1)": 4
        });
        let record = match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let rows = normalize_record(&record, anchor(), &AliasTable::default());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].product_id, "SKU-9");
        assert_eq!(rows[0].product_name, "茶壶");
        assert_eq!(rows[0].opening_inventory_day1, Some(15.0));
        assert_eq!(rows[0].procurement_qty, Some(4.0));
    }
}
