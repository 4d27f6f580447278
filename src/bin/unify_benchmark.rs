//! Benchmark for a unification pass over synthetic heterogeneous rows.
//!
//! Half the rows carry the full document shape, half are sparse, so the
//! pass exercises skips, flat column creation and nested struct rebuilds.

use anneal::{unify, FieldPath, JsonTable, Table};
use serde_json::json;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    println!("=== Anneal Unification Benchmark ===\n");

    let mut rows = Vec::new();
    for i in 0..10_000 {
        if i % 2 == 0 {
            rows.push(json!({
                "id": format!("order-{}", i),
                "amount": {"value$numberDecimal": format!("{}.250", i % 900)},
                "meta": {"source$oid": "5f1d7f5e2cb4e2b1c0a1d2e3"}
            }));
        } else {
            rows.push(json!({"id": format!("order-{}", i)}));
        }
    }

    let expected: Vec<FieldPath> = [
        "id",
        "status",
        "amount.value$numberDecimal",
        "amount.currency",
        "meta.source$oid",
        "meta.ingested_at$timestamp",
        "meta.audit.checked$boolean",
    ]
    .iter()
    .map(|p| FieldPath::new(*p))
    .collect();

    let table = JsonTable::from_values(rows);
    println!("Rows: {}", table.rows().len());
    println!("Expected paths: {}\n", expected.len());

    let start = Instant::now();
    let unified = unify(table, &expected)?;
    let duration = start.elapsed();

    println!("Time: {:?}", duration);
    println!("Columns after unification: {}", unified.column_names().len());
    println!(
        "Average per row: {:.2}us",
        duration.as_micros() as f64 / unified.rows().len() as f64
    );

    Ok(())
}
