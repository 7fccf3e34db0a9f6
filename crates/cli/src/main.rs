//! `air-mysql` CLI entry-point.
//!
//! Available sub-commands:
//! - `check` — initialize named databases and ping each one.
//! - `count` — count the rows matching `--eq` predicates.
//! - `query` — print the matching rows as JSON lines.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mysqlclient::{facade, ClientRegistry, Record, Settings, Value, Where};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "air-mysql",
    about = "Named MySQL connections with map-driven CRUD",
    version
)]
struct Cli {
    /// Settings file with one `[mysql.<name>]` table per database.
    #[arg(long, global = true, env = "AIR_MYSQL_CONFIG", default_value = "air-mysql.toml")]
    config: PathBuf,

    /// Log at debug level (generated SQL included) unless RUST_LOG is set.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize the named databases and ping each one.
    Check {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Count rows in a table.
    Count {
        /// Config name of the database.
        #[arg(long)]
        name: String,
        #[arg(long)]
        table: String,
        /// Equality predicate `column=value`; repeatable.
        #[arg(long = "eq", value_parser = parse_eq)]
        eq: Vec<(String, Value)>,
    },
    /// Print matching rows as JSON lines.
    Query {
        #[arg(long)]
        name: String,
        #[arg(long)]
        table: String,
        /// Comma-separated columns; all columns when omitted.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long = "eq", value_parser = parse_eq)]
        eq: Vec<(String, Value)>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let settings = Settings::load(Some(cli.config.as_path()))
        .with_context(|| format!("cannot load settings from {}", cli.config.display()))?;

    let registry = ClientRegistry::new();
    let result = run(cli.command, &settings, &registry).await;
    registry.close_all().await;
    result
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(command: Command, settings: &Settings, registry: &ClientRegistry) -> Result<()> {
    match command {
        Command::Check { names } => {
            registry.initialize(settings, &names).await;

            let mut failed = 0;
            for name in &names {
                let outcome = match registry.lookup(name).await {
                    Ok(client) => client.ping().await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(()) => println!("✅ {name}"),
                    Err(e) => {
                        println!("❌ {name}: {e}");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {} databases unavailable", names.len());
            }
        }
        Command::Count { name, table, eq } => {
            registry.initialize(settings, &[&name]).await;
            let filter: Where = eq.into_iter().collect();
            let count = facade::query_count(registry, &name, &table, &filter).await?;
            println!("{count}");
        }
        Command::Query {
            name,
            table,
            fields,
            offset,
            limit,
            eq,
        } => {
            registry.initialize(settings, &[&name]).await;
            let filter: Where = eq.into_iter().collect();
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let rows: Vec<Record> =
                facade::query(registry, &name, &table, &filter, &fields, offset, limit).await?;
            info!("{} rows from {table}", rows.len());
            for row in rows {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
    }
    Ok(())
}

/// Parse `column=value`. The column may carry an operator suffix, e.g.
/// `c_state >=1`: the split is on the first `=`, and a `>=`, `<=` or `!=`
/// stays with the column.
fn parse_eq(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = split_predicate(arg).ok_or_else(|| format!("expected column=value, got '{arg}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column in '{arg}'"));
    }
    Ok((key.to_string(), parse_literal(raw)))
}

fn split_predicate(arg: &str) -> Option<(&str, &str)> {
    let index = arg.find('=')?;
    // Keep `>=`, `<=` and `!=` on the column side.
    if arg[index + 1..].starts_with('=') {
        return None;
    }
    if index > 0 && matches!(arg.as_bytes()[index - 1], b'>' | b'<' | b'!') {
        let (key, rest) = arg.split_at(index + 1);
        return Some((key, rest));
    }
    Some((&arg[..index], &arg[index + 1..]))
}

fn parse_literal(raw: &str) -> Value {
    match raw {
        "null" | "NULL" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::Int)
            .or_else(|_| raw.parse::<f64>().map(Value::Float))
            .unwrap_or_else(|_| Value::Text(raw.to_string())),
    }
}
