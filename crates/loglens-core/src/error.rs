use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "{error_perc:.3}% of lines could not be parsed ({parsed_lines} of {total_lines} parsed), \
         which reaches the allowed maximum of {ceiling}%"
    )]
    FatalParseRatio {
        error_perc: f64,
        total_lines: u64,
        parsed_lines: u64,
        ceiling: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid report template: {0}")]
    InvalidTemplate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
