//! Command-line interface components.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tcad_reader")]
#[command(about = "Extract mesh cutlines from TCAD structure files and collect simulator logs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a 1-D cutline from a structure (.str) file
    Cutline {
        /// Structure file to read
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Axis the cutline is taken along (x or y)
        #[arg(short, long, default_value = "x")]
        axis: String,

        /// Requested position; the nearest mesh coordinate is used
        #[arg(short, long, allow_hyphen_values = true)]
        position: f64,

        /// Write the table to a .csv or .parquet file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read every log file in a directory into one table
    Logs {
        /// Directory holding the log files
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Write the table to a .csv or .parquet file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log file extension, without the dot
        #[arg(long, default_value = "log")]
        extension: String,

        /// Also read files whose name starts with '.'
        #[arg(long)]
        include_hidden: bool,
    },
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Command execution
pub mod commands {
    use super::*;
    use crate::config::ReaderConfig;
    use crate::discovery::collect_logs;
    use crate::output::write_table;
    use crate::structure::read_cutline;
    use anyhow::{Context, Result};
    use colored::*;
    use polars::prelude::DataFrame;
    use std::path::Path;

    /// Install the stderr tracing subscriber; `RUST_LOG` overrides `--verbose`
    pub fn setup_logging(args: &Args) {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("tcad_reader={}", args.log_level())));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    pub fn run(args: Args) -> Result<()> {
        setup_logging(&args);

        match args.command {
            Command::Cutline {
                path,
                axis,
                position,
                output,
            } => run_cutline(&path, &axis, position, output.as_deref()),
            Command::Logs {
                directory,
                output,
                extension,
                include_hidden,
            } => {
                let mut config = ReaderConfig::default()
                    .with_log_extension(extension)
                    .with_progress();
                if include_hidden {
                    config = config.with_hidden_files();
                }
                run_logs(&directory, &config, output.as_deref())
            }
        }
    }

    fn run_cutline(path: &Path, axis: &str, position: f64, output: Option<&Path>) -> Result<()> {
        let mut table = read_cutline(path, axis, position)
            .with_context(|| format!("Failed to extract cutline from {}", path.display()))?;

        println!(
            "{} {}={} from {}: {} points, {} columns",
            "Cutline".green().bold(),
            axis,
            position,
            path.display(),
            table.height(),
            table.width()
        );

        emit(&mut table, output)
    }

    fn run_logs(directory: &Path, config: &ReaderConfig, output: Option<&Path>) -> Result<()> {
        let (mut table, stats) = collect_logs(directory, config)
            .with_context(|| format!("Failed to collect logs from {}", directory.display()))?;

        println!(
            "{} {} files ({} rows) from {} in {} ms",
            "Collected".green().bold(),
            stats.files_read,
            stats.total_rows,
            stats.directory.display(),
            stats.processing_time_ms
        );
        if stats.files_failed > 0 {
            println!(
                "{} {} files could not be read",
                "Warning:".yellow().bold(),
                stats.files_failed
            );
        }
        if stats.files_hidden > 0 {
            println!("{} hidden files skipped", stats.files_hidden);
        }

        emit(&mut table, output)
    }

    fn emit(table: &mut DataFrame, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                let format = write_table(table, path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "{} {:?} table to {}",
                    "Wrote".cyan().bold(),
                    format,
                    path.display()
                );
            }
            None => println!("{}", table),
        }
        Ok(())
    }
}
