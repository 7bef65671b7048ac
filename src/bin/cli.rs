//! kvlite CLI
//!
//! Command-line wrapper over the store API. Values are JSON; a bare word
//! that does not parse as JSON is treated as a JSON string.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kvlite::{Config, Store};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// kvlite CLI
#[derive(Parser, Debug)]
#[command(name = "kvlite")]
#[command(about = "Persistent key-value store over embedded SQLite")]
#[command(version)]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./kvs.db")]
    db: PathBuf,

    /// Table name
    #[arg(short, long, default_value = "items")]
    table: String,

    /// Treat find prefixes literally (escape LIKE wildcards)
    #[arg(long)]
    escape_wildcards: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key to a JSON value
    Set {
        /// The key to set
        key: String,

        /// The value to set (JSON, or a bare string)
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List every key and value
    All,

    /// List keys starting with a prefix
    Find {
        /// The key prefix
        prefix: String,
    },

    /// Show the raw record for a key, timestamps included
    Stat {
        /// The key to inspect
        key: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvlite=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> kvlite::Result<ExitCode> {
    let config = Config::builder()
        .path(&args.db)
        .table_name(&args.table)
        .escape_like_wildcards(args.escape_wildcards)
        .build();

    let store = Store::open(config)?;

    let code = match args.command {
        Commands::Get { key } => match store.get::<Value>(&key)? {
            Some(value) => {
                println!("{}", pretty(&value));
                ExitCode::SUCCESS
            }
            None => {
                println!("(nil)");
                ExitCode::FAILURE
            }
        },

        Commands::Set { key, value } => {
            // Bare words become JSON strings
            let value: Value =
                serde_json::from_str(&value).unwrap_or(Value::String(value));
            store.set(&key, &value)?;
            ExitCode::SUCCESS
        }

        Commands::Del { key } => {
            if store.delete(&key)? {
                ExitCode::SUCCESS
            } else {
                println!("(nil)");
                ExitCode::FAILURE
            }
        }

        Commands::All => {
            let entries = store.all::<Value>()?;
            println!("{}", pretty(&entries));
            ExitCode::SUCCESS
        }

        Commands::Find { prefix } => {
            let entries = store.find::<Value>(&prefix)?;
            println!("{}", pretty(&entries));
            ExitCode::SUCCESS
        }

        Commands::Stat { key } => match store.record(&key)? {
            Some(record) => {
                println!("{}", pretty(&record));
                ExitCode::SUCCESS
            }
            None => {
                println!("(nil)");
                ExitCode::FAILURE
            }
        },
    };

    store.close()?;
    Ok(code)
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unprintable>".to_string())
}
