use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Tables,
    Schema,
    Query,
    Affinity,
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(HelpTopic),
    Tables(TablesArgs),
    Schema(SchemaArgs),
    Query(QueryArgs),
    Affinity(AffinityArgs),
    Check(CheckArgs),
}

/// Where the database comes from: `--database` wins over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbArgs {
    pub config: PathBuf,
    pub database: Option<PathBuf>,
}

impl Default for DbArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("liteorm.toml"),
            database: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablesArgs {
    pub db: DbArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaArgs {
    pub db: DbArgs,
    pub table: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    pub db: DbArgs,
    pub sql: String,
    pub columns: Vec<usize>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityArgs {
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    pub affinity: String,
    pub value: String,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let rest = it.map(|s| s.as_str());
    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "tables" => parse_tables(rest),
        "schema" => parse_schema(rest),
        "query" => parse_query(rest),
        "affinity" => parse_affinity(rest),
        "check" => parse_check(rest),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume `--config`/`--database` in either `--flag value` or
/// `--flag=value` form. Returns `Ok(false)` if `token` is not one of them.
fn parse_db_flag<'a>(
    token: &str,
    it: &mut impl Iterator<Item = &'a str>,
    db: &mut DbArgs,
) -> anyhow::Result<bool> {
    match token {
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            db.config = PathBuf::from(v);
        }
        _ if token.starts_with("--config=") => {
            db.config = PathBuf::from(token.trim_start_matches("--config="));
        }
        "--database" | "-d" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            db.database = Some(PathBuf::from(v));
        }
        _ if token.starts_with("--database=") => {
            db.database = Some(PathBuf::from(token.trim_start_matches("--database=")));
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_tables<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut db = DbArgs::default();

    while let Some(token) = it.next() {
        if parse_db_flag(token, &mut it, &mut db)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Tables)),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Tables(TablesArgs { db }))
}

fn parse_schema<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut db = DbArgs::default();
    let mut table: Option<String> = None;
    let mut json = false;

    while let Some(token) = it.next() {
        if parse_db_flag(token, &mut it, &mut db)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Schema)),
            "--json" => json = true,
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => {
                if table.is_some() {
                    anyhow::bail!("schema takes at most one table, got extra: {other}");
                }
                table = Some(other.to_string());
            }
        }
    }

    Ok(Command::Schema(SchemaArgs { db, table, json }))
}

fn parse_query<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut db = DbArgs::default();
    let mut sql: Option<String> = None;
    let mut columns: Vec<usize> = Vec::new();
    let mut verbose = false;

    while let Some(token) = it.next() {
        if parse_db_flag(token, &mut it, &mut db)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Query)),
            "--verbose" | "-v" => verbose = true,
            "--columns" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--columns requires a value");
                };
                columns = parse_columns(v)?;
            }
            _ if token.starts_with("--columns=") => {
                columns = parse_columns(token.trim_start_matches("--columns="))?;
            }
            other if other.starts_with("--") => anyhow::bail!("unknown argument: {other}"),
            other => {
                if sql.is_some() {
                    anyhow::bail!("query takes one SQL string; quote it as a single argument");
                }
                sql = Some(other.to_string());
            }
        }
    }

    let Some(sql) = sql else {
        anyhow::bail!("query requires an SQL string");
    };

    Ok(Command::Query(QueryArgs {
        db,
        sql,
        columns,
        verbose,
    }))
}

fn parse_columns(v: &str) -> anyhow::Result<Vec<usize>> {
    let parsed = split_csv(v)
        .iter()
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| anyhow::anyhow!("invalid column index: {s}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if parsed.is_empty() {
        anyhow::bail!("--columns must not be empty");
    }
    Ok(parsed)
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_affinity<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut types = Vec::new();

    for token in it {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Affinity)),
            // Declared types may be empty or contain spaces, so everything
            // else is taken verbatim.
            other => types.push(other.to_string()),
        }
    }

    if types.is_empty() {
        anyhow::bail!("affinity requires at least one declared type");
    }

    Ok(Command::Affinity(AffinityArgs { types }))
}

fn parse_check<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut positional = Vec::new();

    for token in it {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Check)),
            other => positional.push(other.to_string()),
        }
    }

    let [affinity, value]: [String; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!("check requires exactly two arguments: AFFINITY VALUE"))?;

    Ok(Command::Check(CheckArgs { affinity, value }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
liteorm - inspect and query SQLite databases through liteorm

USAGE:
  liteorm <COMMAND> [OPTIONS]

COMMANDS:
  tables        List tables with their field counts
  schema        Print the fields of one or all tables
  query         Run raw SQL and print the collected columns
  affinity      Resolve the affinity of declared column types
  check         Check a literal against an affinity

Run `liteorm <command> --help` for more."
            );
        }
        HelpTopic::Tables => {
            println!(
                "\
USAGE:
  liteorm tables [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: liteorm.toml)
  -d, --database <PATH> Override database.path from config
  -h, --help            Print help"
            );
        }
        HelpTopic::Schema => {
            println!(
                "\
USAGE:
  liteorm schema [TABLE] [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: liteorm.toml)
  -d, --database <PATH> Override database.path from config
  --json                Dump the schema snapshot as JSON
  -h, --help            Print help"
            );
        }
        HelpTopic::Query => {
            println!(
                "\
USAGE:
  liteorm query <SQL> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: liteorm.toml)
  -d, --database <PATH> Override database.path from config
  --columns <CSV>       Result column indexes to collect, e.g. 0,1,2
                        (without it the statement is only executed)
  -v, --verbose         Echo every row as it is read
  -h, --help            Print help

Structural changes are not reflected in the schema until the next run."
            );
        }
        HelpTopic::Affinity => {
            println!(
                "\
USAGE:
  liteorm affinity <TYPE>...

Prints the affinity SQLite gives a column declared with each TYPE.
Quote types containing spaces, e.g. \"DOUBLE PRECISION\"."
            );
        }
        HelpTopic::Check => {
            println!(
                "\
USAGE:
  liteorm check <AFFINITY> <VALUE>

AFFINITY is one of INTEGER, TEXT, BLOB, REAL, NUMERIC, NULL (any case)."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("liteorm")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_arguments_prints_root_help() {
        assert_eq!(parse_args(&args(&[])).unwrap(), Command::Help(HelpTopic::Root));
    }

    #[test]
    fn tables_with_database_override() {
        let cmd = parse_args(&args(&["tables", "--database", "people.db"])).unwrap();
        assert_eq!(
            cmd,
            Command::Tables(TablesArgs {
                db: DbArgs {
                    config: PathBuf::from("liteorm.toml"),
                    database: Some(PathBuf::from("people.db")),
                },
            })
        );
    }

    #[test]
    fn schema_table_and_json() {
        let cmd =
            parse_args(&args(&["schema", "CONNECTIONS", "--json", "--config=db.toml"])).unwrap();
        let Command::Schema(schema) = cmd else {
            panic!("expected schema command");
        };
        assert_eq!(schema.table.as_deref(), Some("CONNECTIONS"));
        assert!(schema.json);
        assert_eq!(schema.db.config, PathBuf::from("db.toml"));
    }

    #[test]
    fn query_columns_and_verbose() {
        let cmd = parse_args(&args(&[
            "query",
            "SELECT ID, NAME FROM CONNECTIONS;",
            "--columns",
            "0, 1",
            "-v",
        ]))
        .unwrap();
        let Command::Query(query) = cmd else {
            panic!("expected query command");
        };
        assert_eq!(query.sql, "SELECT ID, NAME FROM CONNECTIONS;");
        assert_eq!(query.columns, vec![0, 1]);
        assert!(query.verbose);
    }

    #[test]
    fn query_errors() {
        assert!(parse_args(&args(&["query"])).is_err());
        assert!(parse_args(&args(&["query", "SELECT 1;", "--columns", "a"])).is_err());
        assert!(parse_args(&args(&["query", "SELECT 1;", "--columns"])).is_err());
        assert!(parse_args(&args(&["query", "SELECT", "1"])).is_err());
    }

    #[test]
    fn affinity_keeps_types_verbatim() {
        let cmd = parse_args(&args(&["affinity", "DOUBLE PRECISION", "", "INT"])).unwrap();
        assert_eq!(
            cmd,
            Command::Affinity(AffinityArgs {
                types: vec!["DOUBLE PRECISION".into(), String::new(), "INT".into()],
            })
        );
        assert!(parse_args(&args(&["affinity"])).is_err());
    }

    #[test]
    fn check_needs_two_arguments() {
        let cmd = parse_args(&args(&["check", "integer", "42"])).unwrap();
        assert_eq!(
            cmd,
            Command::Check(CheckArgs {
                affinity: "integer".into(),
                value: "42".into(),
            })
        );
        assert!(parse_args(&args(&["check", "integer"])).is_err());
    }

    #[test]
    fn subcommand_help_and_unknowns() {
        assert_eq!(
            parse_args(&args(&["query", "--help"])).unwrap(),
            Command::Help(HelpTopic::Query)
        );
        assert!(parse_args(&args(&["migrate"])).is_err());
        assert!(parse_args(&args(&["tables", "--frobnicate"])).is_err());
    }
}
