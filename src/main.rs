use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use skyfetch::{Config, ConnectorKind, Engine, Vars};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyfetch")]
#[command(about = "Fetch public space-science data into local files")]
struct Cli {
    /// TOML file with api key, defaults and per-connector parameters
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available connectors
    List,
    /// Print the parameter schema of a connector
    Schema { connector: ConnectorKind },
    /// Run a connector
    Run {
        connector: ConnectorKind,
        /// Connector parameter as key=value, repeatable
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Only compose the request, no network call and no write
        #[arg(long)]
        check: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s.split_once('=').ok_or_else(|| anyhow!("invalid parameter '{}', expected key=value", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::create(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::List => {
            for kind in ConnectorKind::iter() {
                println!("{}", kind);
            }
        }
        Commands::Schema { connector } => {
            println!("{}", serde_json::to_string_pretty(&connector.schema())?);
        }
        Commands::Run { connector, params, check } => {
            let params = Vars::coerce(&connector.schema(), &params)?;
            match Engine::new(config).run(connector, params, check) {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(err) => {
                    let report = serde_json::json!({
                        "failed": true,
                        "msg": err.to_string(),
                        "status_code": err.status_code(),
                        "error": err,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
