use clap::ValueEnum;
use std::fmt;

pub mod commands;

pub use commands::run::RunOutcome;

/// How `analyze` prints its results
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled summary and ranked list
    #[default]
    Pretty,
    /// Summary and records as one JSON document
    Json,
    /// Records as comma-separated rows with a header
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
