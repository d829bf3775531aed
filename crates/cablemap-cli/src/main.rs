//! cablemap CLI
//!
//! Validates harness documents and exports their resolved wire links.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// cablemap - wiring harness descriptions to wire links
#[derive(Parser)]
#[command(name = "cablemap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a harness document without writing anything
    Validate {
        /// Harness document
        #[arg(value_name = "YAML_FILE")]
        input: String,

        /// Library file prepended to the document (shared connectors and cables)
        #[arg(long, value_name = "YAML_FILE")]
        prepend_file: Option<String>,
    },

    /// Resolve a harness document and export components and wire links
    Links {
        /// Harness document
        #[arg(value_name = "YAML_FILE")]
        input: String,

        /// Library file prepended to the document (shared connectors and cables)
        #[arg(long, value_name = "YAML_FILE")]
        prepend_file: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Write an example harness document
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },
}

/// Export format for `links`
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Validate {
            input,
            prepend_file,
        } => {
            commands::validate::run(&input, prepend_file.as_deref())?;
        }
        Commands::Links {
            input,
            prepend_file,
            output,
            format,
        } => {
            commands::links::run(&input, prepend_file.as_deref(), output.as_deref(), format)?;
        }
        Commands::Init { path } => {
            commands::init::run(&path)?;
        }
    }

    Ok(())
}
