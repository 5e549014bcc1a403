use crate::analysis::{DEFAULT_ERROR_CEILING, DEFAULT_REPORT_SIZE, check_error_ceiling};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration.
///
/// Read from a JSON object with upper-case keys. Keys missing from the file
/// keep their default value, unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    /// Number of urls kept in the report
    pub report_size: usize,
    pub report_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Share of unparsable lines, in percent, at which a log is rejected
    #[serde(alias = "MAX_ERR_PERC")]
    pub max_error_perc: f64,
    /// Write the tool's own log here instead of stderr
    pub logging_dir: Option<PathBuf>,
    /// Custom HTML template, must contain `$table_json`
    pub report_template: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: DEFAULT_REPORT_SIZE,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./log"),
            max_error_perc: DEFAULT_ERROR_CEILING,
            logging_dir: None,
            report_template: None,
        }
    }
}

impl Config {
    /// Load a config file and merge it over the defaults
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;

        tracing::debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::InvalidConfig("config file is empty".to_string()));
        }

        let value: serde_json::Value = serde_json::from_str(content)?;
        match value.as_object() {
            Some(object) if object.is_empty() => {
                return Err(Error::InvalidConfig(
                    "config file contains no settings".to_string(),
                ));
            }
            Some(_) => {}
            None => {
                return Err(Error::InvalidConfig(
                    "config must be a JSON object".to_string(),
                ));
            }
        }

        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_size == 0 {
            return Err(Error::InvalidConfig(
                "REPORT_SIZE must be at least 1".to_string(),
            ));
        }
        // MAX_ERROR_PERC
        check_error_ceiling(self.max_error_perc)
    }
}
