//! Well Connection Status CLI Application
//!
//! Command-line front end for the wellconn-status library. It adds:
//! - Locating the summary files of a simulation case
//! - TOML configuration with command-line overrides
//! - Logging setup
//! - Writing the status log (CSV/JSON) to a file or stdout

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, OutputFormat};

/// Extract connection OPEN/SHUT history from CPI summary vectors
#[derive(Parser, Debug)]
#[command(name = "wellconnstatus")]
#[command(
    about = "Export well connection status changes from Eclipse summary data",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Name of Eclipse DATA file. UNSMRY and SMSPEC files must lie alongside.
    #[arg(value_name = "DATAFILE")]
    datafile: Option<PathBuf>,

    /// Name of output file. Use '-' to write to stdout [default: well_connection_status.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Summary keyword of the connection flow indicator [default: CPI]
    #[arg(long, value_name = "KEYWORD")]
    keyword: Option<String>,

    /// Scan connections in parallel
    #[arg(long)]
    parallel: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("wellconnstatus v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using status library v{}", wellconn_status::VERSION);

    let config = resolve_config(&args)?;
    run(&config)
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(datafile) = &args.datafile {
        config.input.datafile = Some(datafile.clone());
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(keyword) = &args.keyword {
        config.processing.keyword = keyword.clone();
    }
    if args.parallel {
        config.processing.parallel = true;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run(config: &AppConfig) -> Result<()> {
    use wellconn_status::{Aggregator, SummaryCase};

    let Some(datafile) = &config.input.datafile else {
        bail!("No DATAFILE given (pass it as an argument or set input.datafile in the config)");
    };

    let case = SummaryCase::load(datafile)
        .with_context(|| format!("Failed to load summary for {:?}", datafile))?;

    let series = case
        .connection_series(&config.processing.keyword)
        .context("Failed to select connection vectors")?;
    if series.is_empty() {
        log::warn!(
            "No {} connection vectors in {:?}",
            config.processing.keyword,
            datafile
        );
    }

    let events = Aggregator::new(config.processing.clone())
        .aggregate(&series)
        .context("Failed to extract connection status changes")?;
    log::info!(
        "{} status changes from {} connections",
        events.len(),
        series.len()
    );

    report::write_report(&events, &config.output.path, config.output.format)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
