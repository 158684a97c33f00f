mod affinity;
mod cli;
mod config;
mod inspect;
mod query;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Tables(args) => inspect::tables(args),
        cli::Command::Schema(args) => inspect::schema(args),
        cli::Command::Query(args) => query::run(args),
        cli::Command::Affinity(args) => affinity::resolve(args),
        cli::Command::Check(args) => affinity::check(args),
    }
}
