use crate::schema::ProductOption;
use serde::Serialize;
use std::fmt;

/// The three plotted metrics per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Inventory,
    ProcurementAmount,
    SalesAmount,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::Inventory,
        Metric::ProcurementAmount,
        Metric::SalesAmount,
    ];

    /// Short key used in composite series keys ("inventory", "procAmt",
    /// "salesAmt").
    pub fn key(self) -> &'static str {
        match self {
            Metric::Inventory => "inventory",
            Metric::ProcurementAmount => "procAmt",
            Metric::SalesAmount => "salesAmt",
        }
    }

    /// Human-readable legend suffix.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Inventory => "Inventory",
            Metric::ProcurementAmount => "Procurement Amount",
            Metric::SalesAmount => "Sales Amount",
        }
    }

    /// SVG stroke dash pattern: solid for inventory, distinct dashes for
    /// the two amount series.
    pub fn dash_pattern(self) -> &'static str {
        match self {
            Metric::Inventory => "0",
            Metric::ProcurementAmount => "6 4",
            Metric::SalesAmount => "2 6",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Composite key identifying one plotted line: `"<product_id>__<metric>"`.
pub fn series_key(product_id: &str, metric: Metric) -> String {
    format!("{}__{}", product_id, metric.key())
}

/// Deterministic hue in `[0, 360)` for a product id.
///
/// Polynomial hash over UTF-16 code units with wrapping 32-bit arithmetic,
/// so the same id maps to the same hue across calls and process runs.
pub fn hue_for(product_id: &str) -> u16 {
    let mut hash: u32 = 0;
    for code in product_id.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(u32::from(code));
    }
    (hash % 360) as u16
}

/// CSS color string for a product's lines.
pub fn color_for(product_id: &str) -> String {
    format!("hsl({} 70% 45%)", hue_for(product_id))
}

/// Styling and label for one (product, metric) line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    /// Matches the pivot table's composite key.
    pub key: String,
    pub product_id: String,
    /// e.g. "Widget • Procurement Amount".
    pub label: String,
    pub metric: Metric,
    pub color: String,
    pub dash_pattern: &'static str,
}

/// Builds legend entries for the selected products, three per product, in
/// selection order. Display names come from the product options, falling
/// back to the id for unknown products.
pub fn build_legend(selected: &[String], products: &[ProductOption]) -> Vec<LegendEntry> {
    let mut entries = Vec::with_capacity(selected.len() * Metric::ALL.len());

    for id in selected {
        let name = products
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or(id);
        let color = color_for(id);

        for metric in Metric::ALL {
            entries.push(LegendEntry {
                key: series_key(id, metric),
                product_id: id.clone(),
                label: format!("{} • {}", name, metric.display_name()),
                metric,
                color: color.clone(),
                dash_pattern: metric.dash_pattern(),
            });
        }
    }

    entries
}
