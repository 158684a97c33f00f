use crate::cli::QueryArgs;
use crate::config;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use liteorm::Handle;

pub fn run(args: QueryArgs) -> anyhow::Result<()> {
    let db = Handle::with_config(config::resolve(&args.db)?)?;

    if args.columns.is_empty() {
        let changed = db.execute(&args.sql)?;
        println!("{} ({changed} rows changed)", "ok".green());
        return Ok(());
    }

    let values = db.execute_query(&args.sql, &args.columns, args.verbose)?;
    println!("{}", render(&args.columns, &values));

    // NULL cells are dropped during collection, so the last row can come
    // up short and earlier rows may be misaligned.
    if values.len() % args.columns.len() != 0 {
        eprintln!(
            "{}",
            "warning: some values were NULL; rows may be misaligned".yellow()
        );
    }
    Ok(())
}

/// Rebuild rows by chunking the flat values by column count.
fn render(columns: &[usize], values: &[String]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|c| format!("#{c}")));
    for row in values.chunks(columns.len()) {
        table.add_row(row);
    }
    table
}
