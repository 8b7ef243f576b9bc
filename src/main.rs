//! lhdiff CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use lhdiff_report::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lhdiff")]
#[command(about = "Track how source lines move, split, or disappear across file versions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Map lines across an ordered list of versions of one file
    Map {
        /// Version files, oldest first
        #[arg(required = true)]
        versions: Vec<PathBuf>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format
        #[arg(short, long, value_enum, default_value_t = Format::Xml)]
        format: Format,

        /// Name recorded in the document (defaults to the first file's stem)
        #[arg(long)]
        name: Option<String>,
    },
    /// Map every case listed in a manifest, in parallel
    Batch {
        /// Manifest file (TOML)
        manifest: PathBuf,

        /// Directory that receives one document per case
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Document format
        #[arg(short, long, value_enum, default_value_t = Format::Xml)]
        format: Format,
    },
    /// Show version
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Xml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xml => OutputFormat::Xml,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "lhdiff={log_level},lhdiff_core={log_level},lhdiff_report={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Map {
            versions,
            output,
            format,
            name,
        } => commands::map(&versions, output, format.into(), name, &config),
        Commands::Batch {
            manifest,
            output_dir,
            format,
        } => commands::batch(&manifest, &output_dir, format.into(), &config),
        Commands::Version => {
            println!("lhdiff v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
