//! Basic usage example for liteorm
//!
//! Run with: cargo run --example basic -p liteorm
//!
//! Creates `example.db` in a temporary directory, fills one table and runs
//! a few selects, printing each result as a table.

use comfy_table::Table;
use liteorm::{Handle, MonitorConfig, OrmError, SelectSpec, StatsMonitor};
use std::sync::Arc;

fn print_rows(title: &str, headers: &[&str], values: &[String]) {
    println!("\n=== {title} ===");
    let mut table = Table::new();
    table.set_header(headers.iter().copied());
    for row in values.chunks(headers.len()) {
        table.add_row(row.iter().map(String::as_str));
    }
    println!("{table}");
}

fn main() -> Result<(), OrmError> {
    let dir = std::env::temp_dir().join("liteorm-basic");
    std::fs::create_dir_all(&dir).map_err(|e| OrmError::Other(e.to_string()))?;
    let path = dir.join("example.db");
    let _ = std::fs::remove_file(&path);

    let mut db = Handle::open(&path)?;
    let stats = Arc::new(StatsMonitor::new());
    db.set_monitor_config(MonitorConfig::new().enable_monitoring());
    db.set_monitor_arc(stats.clone());

    // ============================================
    // Structure
    // ============================================
    db.create_table(
        "CONNECTIONS",
        [
            ("ID", "INT PRIMARY KEY NOT NULL"),
            ("AGE", "INT NOT NULL"),
            ("PHONE", "INT NULL"),
            ("NAME", "CHAR(50) NOT NULL"),
        ],
    )?;
    println!("{db}");

    // ============================================
    // Inserts (an empty value leaves the column out)
    // ============================================
    db.insert_record("CONNECTIONS", ["1", "32", "665", "ANTHON33"])?;
    db.insert_record("CONNECTIONS", ["2", "43", "", "Julia"])?;
    db.insert_record("CONNECTIONS", ["3", "23", "", "Edu"])?;
    db.insert_record("CONNECTIONS", ["5", "999", "", "Julia"])?;

    match db.insert_record("CONNECTIONS", ["4", "abc", "", "Robert"]) {
        Err(e) if e.is_validation_error() => println!("rejected: {e}"),
        other => println!("unexpected: {other:?}"),
    }

    // ============================================
    // Selects
    // ============================================
    let names = db.select_records(
        &SelectSpec::new("CONNECTIONS")
            .fields(["ID", "NAME"])
            .order_by(["AGE"])
            .order_type("DESC"),
    )?;
    print_rows("By age", &["ID", "NAME"], &names);

    let counts = db.select_records(
        &SelectSpec::new("CONNECTIONS")
            .fields(["NAME", "COUNT(*)"])
            .group_by(["NAME"])
            .order_by(["NAME"]),
    )?;
    print_rows("Per name", &["NAME", "COUNT"], &counts);

    // ============================================
    // Update / delete
    // ============================================
    let updated = db.update_table("CONNECTIONS", [("PHONE", "700")], "NAME = 'Julia'")?;
    println!("\nupdated {updated} rows");
    let deleted = db.delete_records("CONNECTIONS", "AGE > 100")?;
    println!("deleted {deleted} rows");

    // PHONE is left out: NULL cells are skipped, which would break chunking.
    let rest = db.select_records(&SelectSpec::new("CONNECTIONS").fields(["ID", "AGE", "NAME"]))?;
    print_rows("Remaining", &["ID", "AGE", "NAME"], &rest);

    let s = stats.stats();
    println!(
        "\n{} statements ({} failed), {} inserts, {} selects",
        s.total, s.failed, s.inserts, s.selects
    );

    db.drop_table("CONNECTIONS")?;
    db.close();
    Ok(())
}
