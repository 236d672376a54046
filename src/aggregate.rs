use crate::schema::{CanonicalMetricRow, DayIndex, SeriesPoint};
use log::debug;
use std::collections::BTreeMap;

/// Per-day points for one product, keyed by day index. Days with no row
/// have no entry.
pub type ProductSeries = BTreeMap<DayIndex, SeriesPoint>;

/// Rounds to two decimal places, the precision used for monetary amounts.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes per-product series from canonical rows: a running inventory
/// balance plus per-day procurement and sales amounts.
///
/// The balance is seeded from the first row (in day order) carrying an
/// opening inventory, re-seeded on the day-1 row, then advanced by
/// `procurement_qty - sales_qty` per row. Missing quantities count as zero;
/// a day with no row contributes nothing and the balance carries forward.
/// The stored inventory value is rounded and floored at zero, but the
/// running balance itself is not clamped, so a deficit on one day still
/// depresses the next.
///
/// Monetary amounts are independent of the running state:
/// `qty * price`, rounded to cents.
///
/// The accumulator is built fresh on every call and nothing mutable
/// escapes; re-running on a selection change is idempotent.
pub fn aggregate_series(
    selected: &[String],
    rows: &[CanonicalMetricRow],
) -> BTreeMap<String, ProductSeries> {
    let mut by_product: BTreeMap<String, ProductSeries> = BTreeMap::new();

    for id in selected {
        let id = id.trim();
        if id.is_empty() {
            continue;
        }

        let mut product_rows: Vec<&CanonicalMetricRow> = rows
            .iter()
            .filter(|row| row.product_id.trim() == id)
            .collect();
        if product_rows.is_empty() {
            continue;
        }
        product_rows.sort_by_key(|row| row.day_index);

        let opening = product_rows
            .iter()
            .find_map(|row| row.opening_inventory_day1);
        let mut running = opening.unwrap_or(0.0);

        let mut points = ProductSeries::new();
        for row in product_rows {
            // The day-1 row restates the seed; idempotent on clean data,
            // and it pins the balance even when rows arrive out of order.
            if row.day_index == DayIndex::Day1 {
                if let Some(seed) = opening {
                    running = seed;
                }
            }

            let procurement_qty = row.procurement_qty.unwrap_or(0.0);
            let procurement_price = row.procurement_price.unwrap_or(0.0);
            let sales_qty = row.sales_qty.unwrap_or(0.0);
            let sales_price = row.sales_price.unwrap_or(0.0);

            running += procurement_qty - sales_qty;

            points.insert(
                row.day_index,
                SeriesPoint {
                    inventory: running.round().max(0.0) as u64,
                    procurement_amount: round2(procurement_qty * procurement_price),
                    sales_amount: round2(sales_qty * sales_price),
                },
            );
        }

        by_product.insert(id.to_string(), points);
    }

    debug!(
        "aggregated {} product series from {} rows",
        by_product.len(),
        rows.len()
    );

    by_product
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(
        id: &str,
        index: DayIndex,
        opening: Option<f64>,
        pq: Option<f64>,
        pp: Option<f64>,
        sq: Option<f64>,
        sp: Option<f64>,
    ) -> CanonicalMetricRow {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        CanonicalMetricRow {
            product_id: id.to_string(),
            product_name: format!("{} name", id),
            day: crate::normalize::day_for_index(anchor, index),
            day_index: index,
            opening_inventory_day1: opening,
            procurement_qty: pq,
            procurement_price: pp,
            sales_qty: sq,
            sales_price: sp,
        }
    }

    fn inventory_sequence(series: &ProductSeries) -> Vec<u64> {
        series.values().map(|p| p.inventory).collect()
    }

    #[test]
    fn running_inventory_carries_across_days() {
        // Opening 100; day1 +20 -10; day2 +0 -5; day3 +50 -0.
        let rows = vec![
            row("P001", DayIndex::Day1, Some(100.0), Some(20.0), None, Some(10.0), None),
            row("P001", DayIndex::Day2, None, Some(0.0), None, Some(5.0), None),
            row("P001", DayIndex::Day3, None, Some(50.0), None, Some(0.0), None),
        ];

        let result = aggregate_series(&["P001".to_string()], &rows);
        let series = result.get("P001").unwrap();
        assert_eq!(inventory_sequence(series), vec![110, 105, 155]);
    }

    #[test]
    fn stored_inventory_is_floored_at_zero() {
        let rows = vec![row(
            "P001",
            DayIndex::Day1,
            Some(5.0),
            None,
            None,
            Some(50.0),
            None,
        )];

        let result = aggregate_series(&["P001".to_string()], &rows);
        let series = result.get("P001").unwrap();
        assert_eq!(series.get(&DayIndex::Day1).unwrap().inventory, 0);
    }

    #[test]
    fn running_balance_stays_unclamped_between_days() {
        // Day-1 deficit of 45 still depresses day 2: 5 - 50 + 40 = -5.
        let rows = vec![
            row("P001", DayIndex::Day1, Some(5.0), None, None, Some(50.0), None),
            row("P001", DayIndex::Day2, None, Some(40.0), None, None, None),
        ];

        let result = aggregate_series(&["P001".to_string()], &rows);
        let series = result.get("P001").unwrap();
        assert_eq!(inventory_sequence(series), vec![0, 0]);
    }

    #[test]
    fn amounts_are_qty_times_price_rounded_to_cents() {
        let rows = vec![row(
            "P001",
            DayIndex::Day1,
            None,
            Some(3.0),
            Some(1.333),
            Some(2.0),
            Some(0.555),
        )];

        let result = aggregate_series(&["P001".to_string()], &rows);
        let point = result.get("P001").unwrap().get(&DayIndex::Day1).unwrap();
        assert_eq!(point.procurement_amount, 4.0); // 3.999 -> 4.00
        assert_eq!(point.sales_amount, 1.11);
    }

    #[test]
    fn missing_opening_defaults_to_zero() {
        let rows = vec![row(
            "P001",
            DayIndex::Day2,
            None,
            Some(7.0),
            None,
            Some(3.0),
            None,
        )];

        let result = aggregate_series(&["P001".to_string()], &rows);
        let series = result.get("P001").unwrap();
        assert_eq!(series.get(&DayIndex::Day2).unwrap().inventory, 4);
        assert!(!series.contains_key(&DayIndex::Day1));
        assert!(!series.contains_key(&DayIndex::Day3));
    }

    #[test]
    fn products_without_rows_are_absent_from_the_result() {
        let rows = vec![row("P001", DayIndex::Day1, Some(1.0), None, None, None, None)];
        let result = aggregate_series(&["P001".to_string(), "P999".to_string()], &rows);
        assert!(result.contains_key("P001"));
        assert!(!result.contains_key("P999"));
    }

    #[test]
    fn duplicate_day_rows_both_feed_the_balance() {
        // Two day-2 rows: the balance accumulates through both, the later
        // point wins.
        let rows = vec![
            row("P001", DayIndex::Day1, Some(10.0), None, None, None, None),
            row("P001", DayIndex::Day2, None, Some(5.0), None, None, None),
            row("P001", DayIndex::Day2, None, Some(3.0), None, None, None),
        ];

        let result = aggregate_series(&["P001".to_string()], &rows);
        let series = result.get("P001").unwrap();
        assert_eq!(series.get(&DayIndex::Day2).unwrap().inventory, 18);
    }

    #[test]
    fn selection_filters_other_products() {
        let rows = vec![
            row("P001", DayIndex::Day1, Some(1.0), None, None, None, None),
            row("P002", DayIndex::Day1, Some(2.0), None, None, None, None),
        ];

        let result = aggregate_series(&["P002".to_string()], &rows);
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("P002"));
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(3.999), 4.0);
        assert_eq!(round2(1.005), 1.0); // 1.005 is just below 1.005 in binary
        assert_eq!(round2(-2.345), -2.35);
        assert_eq!(round2(0.0), 0.0);
    }
}
