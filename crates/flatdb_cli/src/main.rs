//! FlatDB CLI
//!
//! Command-line tools for FlatDB databases.
//!
//! # Commands
//!
//! - `inspect` - Display collections, counters and document counts
//! - `find` - Run an equality or range filter over a collection
//! - `bench` - Measure concurrent insert throughput

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use flatdb_core::{DocumentFormat, InsertMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// FlatDB command-line database tools.
#[derive(Parser)]
#[command(name = "flatdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display collections, counters and document counts
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Run a filter over a collection and print matching documents
    Find {
        /// Collection name
        #[arg(short, long)]
        collection: String,

        /// Field to filter on
        #[arg(long)]
        field: String,

        /// Comparison operator (=, <, >)
        #[arg(long, default_value = "=")]
        op: String,

        /// Operand; numbers and booleans are recognized, anything else is text
        #[arg(long)]
        value: String,

        /// Maximum number of documents to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Number of matching documents to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Document format; detected from the collection when omitted
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// Insert from concurrent workers until a deadline and report throughput
    Bench {
        /// Run time in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Number of concurrent workers
        #[arg(short, long, default_value = "100")]
        workers: usize,

        /// Insert locking discipline
        #[arg(long, value_enum, default_value = "phased")]
        mode: Mode,

        /// Fsync every document and counter write
        #[arg(long)]
        sync: bool,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Phased,
    Atomic,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Cbor,
}

impl From<Format> for DocumentFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => DocumentFormat::Json,
            Format::Cbor => DocumentFormat::Cbor,
        }
    }
}

impl From<Mode> for InsertMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Phased => InsertMode::Phased,
            Mode::Atomic => InsertMode::Atomic,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Database path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Find {
            collection,
            field,
            op,
            value,
            limit,
            offset,
            format,
        } => {
            let path = cli.path.ok_or("Database path required for find")?;
            let filter = commands::find::Filter {
                field,
                op,
                value,
                limit,
                offset,
                format: format.map(Into::into),
            };
            commands::find::run(&path, &collection, &filter)?;
        }
        Commands::Bench {
            duration,
            workers,
            mode,
            sync,
        } => {
            let options = commands::bench::BenchOptions {
                duration: std::time::Duration::from_secs(duration),
                workers,
                insert_mode: mode.into(),
                sync_on_write: sync,
            };
            commands::bench::run(cli.path.as_deref(), &options)?;
        }
        Commands::Version => {
            println!("FlatDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("FlatDB Core v{}", flatdb_core::VERSION);
        }
    }

    Ok(())
}
