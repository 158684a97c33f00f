use crate::cli::{SchemaArgs, TablesArgs};
use crate::config;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use liteorm::Handle;

pub fn tables(args: TablesArgs) -> anyhow::Result<()> {
    let db = Handle::with_config(config::resolve(&args.db)?)?;

    if db.num_tables() == 0 {
        println!("{}", format!("no tables in {}", db.path().display()).yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["TABLE", "FIELDS"]);
    for (name, fields) in db.schema().iter() {
        table.add_row([name.to_string(), fields.len().to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn schema(args: SchemaArgs) -> anyhow::Result<()> {
    let db = Handle::with_config(config::resolve(&args.db)?)?;

    if args.json {
        println!("{}", db.schema().to_json()?);
        return Ok(());
    }

    match &args.table {
        Some(name) => print_table(name, db.fields(name)?),
        None => {
            for (name, fields) in db.schema().iter() {
                print_table(name, fields);
            }
        }
    }
    Ok(())
}

fn print_table(name: &str, fields: &[String]) {
    println!("{} ({} fields)", name.bold(), fields.len());
    for (idx, field) in fields.iter().enumerate() {
        println!("  {idx:>3}  {field}");
    }
}
