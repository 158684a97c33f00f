use crate::cli::{AffinityArgs, CheckArgs};
use colored::Colorize;
use liteorm::{Affinity, Handle};

pub fn resolve(args: AffinityArgs) -> anyhow::Result<()> {
    let width = args.types.iter().map(|t| t.len()).max().unwrap_or(0).max(2);
    for declared in &args.types {
        let shown = if declared.is_empty() { "\"\"" } else { declared.as_str() };
        println!("{shown:<width$}  {}", Handle::affinity(declared).to_string().bold());
    }
    Ok(())
}

pub fn check(args: CheckArgs) -> anyhow::Result<()> {
    let affinity: Affinity = args.affinity.parse()?;
    if Handle::is_value_affined(affinity, &args.value) {
        println!("{} '{}' is compatible with {affinity}", "✓".green().bold(), args.value);
        Ok(())
    } else {
        println!("{} '{}' is not compatible with {affinity}", "✗".red().bold(), args.value);
        anyhow::bail!("value rejected")
    }
}
