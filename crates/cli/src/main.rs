// Application crate, public items are internal to the binary.
#![allow(missing_docs)]

mod output;
mod process;
mod scan;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dataset::Part10Decoder;
use metadata::{ExtractOptions, DEFAULT_BINARY_SUMMARY_THRESHOLD, DEFAULT_MAX_BYTES_LENGTH};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::process::RunConfig;

const DEFAULT_OUTPUT_NAME: &str = "dicom_metadata.json";
const DEFAULT_LOG_NAME: &str = "dicom_processor_log.txt";

#[derive(Parser)]
#[command(name = "dicom-meta")]
#[command(about = "Extract DICOM metadata from a directory tree into one JSON file", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory to scan recursively
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output JSON file (default: <DIR>/dicom_metadata.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run log file (default: <DIR>/dicom_processor_log.txt)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Byte values longer than this are removed from the JSON output
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES_LENGTH)]
    max_bytes_length: usize,

    /// OB/OW/UN values longer than this are summarized during extraction
    #[arg(long, default_value_t = DEFAULT_BINARY_SUMMARY_THRESHOLD)]
    binary_summary_threshold: usize,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let output = self
            .output
            .unwrap_or_else(|| self.dir.join(DEFAULT_OUTPUT_NAME));
        let log = self.log.unwrap_or_else(|| self.dir.join(DEFAULT_LOG_NAME));
        RunConfig {
            scan_dir: self.dir,
            output,
            log,
            extract: ExtractOptions {
                binary_summary_threshold: self.binary_summary_threshold,
            },
            max_bytes_length: self.max_bytes_length,
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.into_config();

    let log_file = File::create(&config.log)
        .with_context(|| format!("cannot create log file {}", config.log.display()))?;
    let mut log = BufWriter::new(log_file);

    let result = process::run(&Part10Decoder::new(), &config, &mut log);
    match &result {
        Ok(summary) => info!(
            candidates = summary.candidates,
            processed = summary.processed,
            saved = summary.saved,
            "run finished"
        ),
        Err(e) => {
            // Best effort: the run log may itself be the failing sink.
            let _ = writeln!(log, "\nAn unhandled error occurred during execution: {e:#}");
        }
    }
    log.flush().context("cannot flush run log")?;

    println!(
        "Process finished. Check '{}' for full logs and '{}' for metadata.",
        config.log.display(),
        config.output.display()
    );
    result.map(|_| ())
}
