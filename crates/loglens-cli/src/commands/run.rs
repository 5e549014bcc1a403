use anyhow::{Context, Result};
use loglens_core::access::LogReader;
use loglens_core::analysis::{ReportBuilder, StreamAggregator};
use loglens_core::locate::find_latest_log;
use loglens_core::render::ReportRenderer;
use loglens_core::{Config, Error};
use std::path::{Path, PathBuf};

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The log directory has no access logs
    NoLogFound,
    /// The report for the newest log exists already
    AlreadyReported(PathBuf),
    Written { report: PathBuf, urls: usize },
}

/// Load the config file, or the defaults when no file is given and the
/// default config file is absent.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.is_file() {
                Config::load(default_path).with_context(|| {
                    format!("Failed to load config {}", default_path.display())
                })?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

/// Build the report for the newest log in the configured log directory
pub fn run(config: &Config) -> Result<RunOutcome> {
    let Some(log) = find_latest_log(&config.log_dir)
        .with_context(|| format!("Failed to scan {}", config.log_dir.display()))?
    else {
        tracing::info!("No log file to analyze");
        return Ok(RunOutcome::NoLogFound);
    };

    let report_path = config.report_dir.join(log.report_name());
    if report_path.exists() {
        tracing::info!("Report {} already exists", report_path.display());
        return Ok(RunOutcome::AlreadyReported(report_path));
    }

    // Load the template before the log so a bad template fails fast.
    let renderer = match &config.report_template {
        Some(path) => ReportRenderer::from_file(path)
            .with_context(|| format!("Failed to load template {}", path.display()))?,
        None => ReportRenderer::default(),
    };

    let reader = LogReader::open(&log.path, log.compressed)
        .with_context(|| format!("Failed to open {}", log.path.display()))?;

    let aggregation = match StreamAggregator::new(config.max_error_perc).aggregate_reader(reader) {
        Ok(aggregation) => aggregation,
        Err(e @ Error::FatalParseRatio { .. }) => {
            tracing::error!("Not writing a report for {}: {}", log.path.display(), e);
            return Err(e).context(format!("Log {} is not usable", log.path.display()));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", log.path.display()));
        }
    };

    let records = ReportBuilder::new(config.report_size).build(&aggregation);
    renderer
        .write_report(&report_path, &records)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    Ok(RunOutcome::Written {
        report: report_path,
        urls: records.len(),
    })
}

pub fn execute(config: &Config) -> Result<()> {
    tracing::info!("Looking for access logs in {}", config.log_dir.display());

    match run(config)? {
        RunOutcome::NoLogFound => {
            println!("No log file to analyze in {}", config.log_dir.display());
        }
        RunOutcome::AlreadyReported(path) => {
            println!("Report already exists: {}", path.display());
        }
        RunOutcome::Written { report, urls } => {
            println!("Wrote {} ({} urls)", report.display(), urls);
        }
    }

    Ok(())
}
