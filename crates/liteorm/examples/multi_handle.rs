//! Two handles on one database file.
//!
//! Run with: cargo run --example multi_handle -p liteorm
//!
//! Each handle caches the schema it saw when it was opened. Tables created
//! through one handle stay invisible to the other until it refreshes.

use liteorm::{Handle, OrmError, SelectSpec};

fn main() -> Result<(), OrmError> {
    let path = std::env::temp_dir().join("liteorm-multi-handle.db");
    let _ = std::fs::remove_file(&path);

    let mut writer = Handle::open(&path)?;
    let mut reader = Handle::open(&path)?;

    writer.create_table("EVENTS", [("ID", "INTEGER PRIMARY KEY"), ("KIND", "TEXT NOT NULL")])?;
    writer.insert_record("EVENTS", ["1", "login"])?;
    writer.insert_record("EVENTS", ["2", "logout"])?;

    println!("writer sees: {:?}", writer.table_names());
    println!("reader sees: {:?}", reader.table_names());

    match reader.select_records(&SelectSpec::new("EVENTS")) {
        Err(e) => println!("reader before refresh: {e}"),
        Ok(rows) => println!("reader before refresh: {rows:?}"),
    }

    reader.refresh()?;
    println!("reader after refresh: {:?}", reader.table_names());

    let kinds = reader.select_records(&SelectSpec::new("EVENTS").fields(["KIND"]))?;
    println!("kinds: {kinds:?}");

    writer.drop_table("EVENTS")?;
    reader.refresh()?;
    println!("{reader}");

    Ok(())
}
