use crate::aggregate::ProductSeries;
use crate::schema::DayIndex;
use crate::style::{series_key, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the chart-ready table: a day label plus sparse
/// `"<product_id>__<metric>"` keys.
///
/// Keys for products absent on a day are omitted, never zero-filled; a
/// renderer must treat absence as "no point" so lines don't falsely dip to
/// zero. The flattened map keeps that sparseness through JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub label: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl PivotRow {
    pub fn value(&self, product_id: &str, metric: Metric) -> Option<f64> {
        self.values.get(&series_key(product_id, metric)).copied()
    }
}

/// Reshapes per-product series into exactly three day-labeled rows, one
/// per day in the window, regardless of data completeness.
pub fn build_pivot(series: &BTreeMap<String, ProductSeries>) -> Vec<PivotRow> {
    let mut rows: Vec<PivotRow> = DayIndex::ALL
        .iter()
        .map(|index| PivotRow {
            label: index.label().to_string(),
            values: BTreeMap::new(),
        })
        .collect();

    for (product_id, points) in series {
        for (&index, point) in points {
            let row = &mut rows[(index.as_u8() - 1) as usize];
            row.values.insert(
                series_key(product_id, Metric::Inventory),
                point.inventory as f64,
            );
            row.values.insert(
                series_key(product_id, Metric::ProcurementAmount),
                point.procurement_amount,
            );
            row.values.insert(
                series_key(product_id, Metric::SalesAmount),
                point.sales_amount,
            );
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SeriesPoint;

    fn one_product_day2_only() -> BTreeMap<String, ProductSeries> {
        let mut points = ProductSeries::new();
        points.insert(
            DayIndex::Day2,
            SeriesPoint {
                inventory: 42,
                procurement_amount: 10.5,
                sales_amount: 0.0,
            },
        );
        let mut series = BTreeMap::new();
        series.insert("P001".to_string(), points);
        series
    }

    #[test]
    fn always_three_labeled_rows() {
        let rows = build_pivot(&one_product_day2_only());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Day 1");
        assert_eq!(rows[1].label, "Day 2");
        assert_eq!(rows[2].label, "Day 3");
    }

    #[test]
    fn empty_input_still_yields_the_skeleton() {
        let rows = build_pivot(&BTreeMap::new());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.values.is_empty()));
    }

    #[test]
    fn keys_are_sparse_not_zero_filled() {
        let rows = build_pivot(&one_product_day2_only());

        assert!(rows[0].values.is_empty());
        assert!(rows[2].values.is_empty());

        assert_eq!(rows[1].value("P001", Metric::Inventory), Some(42.0));
        assert_eq!(rows[1].value("P001", Metric::ProcurementAmount), Some(10.5));
        assert_eq!(rows[1].value("P001", Metric::SalesAmount), Some(0.0));
    }

    #[test]
    fn sparse_shape_survives_json_serialization() {
        let rows = build_pivot(&one_product_day2_only());
        let json = serde_json::to_value(&rows).unwrap();

        assert_eq!(json[0], serde_json::json!({ "label": "Day 1" }));
        assert_eq!(json[1]["P001__inventory"], 42.0);
        assert_eq!(json[1]["P001__procAmt"], 10.5);
        // Absent, not null and not zero.
        assert!(json[2].get("P001__inventory").is_none());
    }
}
