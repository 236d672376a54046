use crate::schema::DayIndex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the day number (1..=3) in per-day alias
/// templates.
pub const DAY_PLACEHOLDER: &str = "{d}";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Accepted spellings for each logical field, in priority order.
///
/// Spreadsheet exports in the wild label the same column in English or
/// Chinese, with underscores or spaces, with or without a day suffix. Each
/// list is scanned in order, so put the preferred spelling first. Per-day
/// fields are templates containing [`DAY_PLACEHOLDER`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AliasTable {
    #[schemars(description = "Spellings for the product identity column (e.g. 'id', 'sku', '货号')")]
    pub product_id: Vec<String>,

    #[schemars(description = "Spellings for the product display-name column")]
    pub product_name: Vec<String>,

    #[schemars(description = "Spellings for the day-1 opening inventory column")]
    pub opening_inventory: Vec<String>,

    #[schemars(description = "Per-day templates for the procurement quantity column; '{d}' is replaced by the day number")]
    pub procurement_qty: Vec<String>,

    #[schemars(description = "Per-day templates for the procurement unit price column")]
    pub procurement_price: Vec<String>,

    #[schemars(description = "Per-day templates for the sales quantity column")]
    pub sales_qty: Vec<String>,

    #[schemars(description = "Per-day templates for the sales unit price column")]
    pub sales_price: Vec<String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            product_id: strings(&["id", "product id", "product_id", "sku", "货号", "编码"]),
            product_name: strings(&["product name", "product_name", "产品名称", "商品名称"]),
            opening_inventory: strings(&[
                "opening inventory on day 1",
                "opening inventory",
                "开库存",
                "期初库存",
            ]),
            procurement_qty: strings(&[
                "procurement qty (day {d})",
                "procurement quantity (day {d})",
                "采购 数量 (day {d})",
            ]),
            procurement_price: strings(&["procurement price (day {d})", "采购 单价 (day {d})"]),
            sales_qty: strings(&[
                "sales qty (day {d})",
                "sales quantity (day {d})",
                "销售 数量 (day {d})",
            ]),
            sales_price: strings(&["sales price (day {d})", "销售 单价 (day {d})"]),
        }
    }
}

impl AliasTable {
    /// Expands a list of per-day templates for a concrete day index.
    pub fn for_day(templates: &[String], day: DayIndex) -> Vec<String> {
        let d = day.as_u8().to_string();
        templates
            .iter()
            .map(|t| t.replace(DAY_PLACEHOLDER, &d))
            .collect()
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(AliasTable);
        serde_json::to_string_pretty(&schema)
    }
}
