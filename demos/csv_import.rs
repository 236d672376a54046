use anyhow::Context;
use chrono::Local;
use daily_metrics_builder::{
    build_chart_data, run_import, AliasTable, MemoryStore, MetricStore, RawRecord, Session,
};

/// Demo session: always signed in. A real caller would check its identity
/// provider here.
struct DemoSession;

impl Session for DemoSession {
    fn is_authenticated(&self) -> bool {
        true
    }
}

const SAMPLE_CSV: &str = "\
ID,Product Name,Opening Inventory,Procurement Qty (Day 1),Procurement Price (Day 1),Sales Qty (Day 1),Sales Price (Day 1),Procurement Qty (Day 2),Sales Qty (Day 2),Sales Price (Day 2),Procurement Qty (Day 3),Procurement Price (Day 3),Sales Qty (Day 3)
P001,Widget,100,20,3.5,10,5,,5,5,50,3.4,
T-100,Teapot,5,,,4,12,40,,,,,
,missing id row,10,1,1,1,1,1,1,1,1,1,1
";

/// Converts CSV text into loosely-typed records, the same shape a
/// spreadsheet decoder produces: every cell a string, blank cells blank.
fn csv_to_records(text: &str) -> anyhow::Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let csv_row = result.context("reading CSV row")?;
        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(csv_row.iter()) {
            record.insert(
                header.to_string(),
                serde_json::Value::String(cell.to_string()),
            );
        }
        records.push(record);
    }

    Ok(records)
}

fn main() -> anyhow::Result<()> {
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading CSV file '{}'", path))?,
        None => SAMPLE_CSV.to_string(),
    };

    let records = csv_to_records(&text)?;
    let anchor = Local::now().date_naive();

    let mut store = MemoryStore::new();
    let report = run_import(
        &records,
        anchor,
        &AliasTable::default(),
        &DemoSession,
        &mut store,
    )?;
    println!(
        "imported {} rows ({} record(s) skipped)",
        report.inserted, report.skipped
    );

    let options = store.product_options()?;
    println!("products:");
    for option in &options {
        println!("  {} — {}", option.id, option.name);
    }

    let selected: Vec<String> = options.into_iter().map(|p| p.id).collect();
    let chart = build_chart_data(&store, &selected)?;

    println!("chart rows:");
    println!("{}", serde_json::to_string_pretty(&chart.rows)?);

    println!("legend:");
    for entry in &chart.legend {
        println!(
            "  {:<24} color={:<18} dash={:?}",
            entry.label, entry.color, entry.dash_pattern
        );
    }

    Ok(())
}
