use anyhow::Result;
use clap::{Parser, Subcommand};
use loglens_cli::{OutputFormat, commands};
use loglens_core::analysis::{DEFAULT_ERROR_CEILING, DEFAULT_REPORT_SIZE, check_error_ceiling};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "loglens")]
#[command(author, version)]
#[command(
    about = "Report the slowest URLs of a web server access log",
    long_about = "loglens reads nginx access logs (plain or gzip), aggregates request times \
                  per URL and renders the URLs with the largest total request time into an \
                  HTML report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the HTML report for the newest log in the configured log directory
    Run {
        /// Path to a JSON config file (defaults to ./config.json when present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the slowest URLs of a single access log
    Analyze {
        /// Path to the access log (gzip if it ends in .gz)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of URLs to report
        #[arg(long, default_value_t = DEFAULT_REPORT_SIZE)]
        top: usize,

        /// Share of unparsable lines, in percent, at which the log is rejected
        #[arg(long, default_value_t = DEFAULT_ERROR_CEILING, value_parser = parse_error_ceiling)]
        max_error_perc: f64,

        /// Output format for printed results
        #[arg(short, long, value_enum, default_value_t = OutputFormat::default())]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Execute the command
    match cli.command {
        Commands::Run { config } => {
            let config = commands::run::load_config(config.as_deref())?;
            init_logging(cli.verbose, config.logging_dir.as_deref());
            commands::run::execute(&config)
        }
        Commands::Analyze {
            file,
            top,
            max_error_perc,
            format,
        } => {
            init_logging(cli.verbose, None);
            commands::analyze::execute(&file, top, max_error_perc, format)
        }
    }
}

fn parse_error_ceiling(value: &str) -> Result<f64, String> {
    let ceiling: f64 = value.parse().map_err(|e| format!("{}", e))?;
    check_error_ceiling(ceiling).map_err(|e| e.to_string())?;
    Ok(ceiling)
}

fn init_logging(verbose: bool, logging_dir: Option<&Path>) {
    use std::fs::OpenOptions;
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("loglens=debug,loglens_cli=debug,loglens_core=debug")
    } else {
        EnvFilter::new("loglens=info,loglens_cli=info,loglens_core=info")
    };

    let mut open_error = None;
    let log_file = logging_dir.filter(|dir| dir.is_dir()).and_then(|dir| {
        let path = dir.join("loglens.log");
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| open_error = Some(format!("{}: {}", path.display(), e)))
            .ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init(),
    }

    if let Some(e) = open_error {
        tracing::warn!("Cannot open log file {}, logging to stderr", e);
    }
}
