use std::io::{self, Read};

use clap::Parser as ClapParser;
use sqlmongo::{TranslateError, TranslateOptions, Translator};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(ClapParser)]
#[command(name = "sql2mongo")]
#[command(about = "Translate a SQL SELECT statement into a MongoDB shell statement")]
#[command(version)]
struct Cli {
    /// The SQL query to translate (reads from stdin if not provided)
    query: Option<String>,

    /// Print the statement as a JSON object instead of a call chain
    #[arg(long)]
    json: bool,

    /// Parse identifiers as written, without rewriting dotted field names
    #[arg(long)]
    no_sanitize: bool,

    /// Emit `$neq` instead of `$ne` for IS NOT NULL
    #[arg(long)]
    legacy_not_null: bool,

    /// Log translation steps to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Could not read query from stdin: {0}")]
    Io(#[from] io::Error),
    #[error("No query given")]
    EmptyQuery,
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install logger: {e}");
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let query = match cli.query {
        Some(query) => query,
        None => {
            let mut query = String::new();
            io::stdin().read_to_string(&mut query)?;
            query
        }
    };
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::EmptyQuery);
    }

    let options = TranslateOptions::builder()
        .sanitize_identifiers(!cli.no_sanitize)
        .legacy_not_null(cli.legacy_not_null)
        .build();
    debug!(?options, "translating");

    let statement = Translator::new(options).translate(query)?;
    let output = if cli.json { statement.to_json()? } else { statement.render()? };

    Ok(output)
}
