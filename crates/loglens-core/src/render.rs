use crate::analysis::ReportRecord;
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TEMPLATE: &str = include_str!("../templates/report.html");
const PLACEHOLDER: &str = "$table_json";

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Regex =
        Regex::new(r"\$\{table_json\}|\$table_json").unwrap();
}

/// Renders report records into an HTML template.
///
/// The template receives the records as a JSON array in place of
/// `$table_json` (or `${table_json}`). Any other `$` text is left alone.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    template: String,
}

impl ReportRenderer {
    pub fn new(template: String) -> Result<Self> {
        if !PLACEHOLDER_PATTERN.is_match(&template) {
            return Err(Error::InvalidTemplate(format!(
                "template has no {} placeholder",
                PLACEHOLDER
            )));
        }
        Ok(Self { template })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading report template from: {}", path.display());
        Self::new(fs::read_to_string(path)?)
    }

    pub fn render(&self, records: &[ReportRecord]) -> Result<String> {
        // `</` would end the surrounding <script> element early.
        let json = serde_json::to_string(records)?.replace("</", "<\\/");

        // One pass, so placeholder text inside the json stays literal.
        Ok(PLACEHOLDER_PATTERN
            .replace_all(&self.template, NoExpand(&json))
            .into_owned())
    }

    /// Render and write a report.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place, so an existing report is never left half-written.
    pub fn write_report(&self, path: &Path, records: &[ReportRecord]) -> Result<()> {
        let html = self.render(records)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.is_dir()
        {
            fs::create_dir_all(parent)?;
            tracing::info!("Created report directory {}", parent.display());
        }

        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, html).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::info!(
            "Wrote report with {} urls to {}",
            records.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "report.html".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
