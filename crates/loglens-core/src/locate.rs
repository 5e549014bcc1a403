use crate::Result;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref LOG_NAME_PATTERN: Regex =
        Regex::new(r"^nginx-access-ui\.log-(?P<date>\d{8})(?P<gz>\.gz)?$").unwrap();
}

/// The newest access log found in a log directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestLog {
    pub date: NaiveDate,
    pub path: PathBuf,
    pub compressed: bool,
}

impl LatestLog {
    /// File name of the report for this log, e.g. `report-2017.06.30.html`
    pub fn report_name(&self) -> String {
        format!("report-{}.html", self.date.format("%Y.%m.%d"))
    }
}

/// Find the access log with the most recent date in its name.
///
/// Only plain and `.gz` logs are considered. Names with an impossible date
/// are skipped. If a plain and a gzipped log share a date, the plain one
/// wins. A missing directory is not an error.
pub fn find_latest_log(dir: &Path) -> Result<Option<LatestLog>> {
    if !dir.is_dir() {
        tracing::warn!("Log directory {} does not exist", dir.display());
        return Ok(None);
    }

    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut latest: Option<LatestLog> = None;
    for name in &names {
        let Some(candidate) = parse_log_name(dir, name) else {
            continue;
        };
        if latest.as_ref().is_none_or(|l| candidate.date > l.date) {
            latest = Some(candidate);
        }
    }

    match &latest {
        Some(log) => tracing::info!("Latest log file: {}", log.path.display()),
        None => tracing::info!("No access logs found in {}", dir.display()),
    }

    Ok(latest)
}

fn parse_log_name(dir: &Path, name: &str) -> Option<LatestLog> {
    let caps = LOG_NAME_PATTERN.captures(name)?;
    let date = match NaiveDate::parse_from_str(&caps["date"], "%Y%m%d") {
        Ok(date) => date,
        Err(e) => {
            tracing::debug!("Skipping {}: bad date: {}", name, e);
            return None;
        }
    };

    Some(LatestLog {
        date,
        path: dir.join(name),
        compressed: caps.name("gz").is_some(),
    })
}
