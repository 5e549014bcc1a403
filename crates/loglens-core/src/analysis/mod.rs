mod aggregate;
mod report;
mod summary;

pub use aggregate::{StreamAggregator, check_error_ceiling};
pub use report::ReportBuilder;
pub use summary::SummaryAnalyzer;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error ceiling used when none is configured, in percent
pub const DEFAULT_ERROR_CEILING: f64 = 60.0;

/// Report size used when none is configured
pub const DEFAULT_REPORT_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: RunSummary,
    pub records: Vec<ReportRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_lines: u64,
    pub parsed_lines: u64,
    pub error_perc: Option<f64>,
    pub distinct_urls: usize,
    pub total_time: f64,
}

/// One row of the slowest-endpoints report.
///
/// Field names are what the HTML template reads, keep them stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub url: String,
    pub count: u64,
    pub time_sum: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
    pub count_perc: f64,
    pub time_perc: f64,
}

/// Line counters for one pass over a log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_lines: u64,
    pub parsed_lines: u64,
}

impl ParseStats {
    /// Percentage of lines that failed to parse, `None` for an empty stream
    pub fn error_perc(&self) -> Option<f64> {
        if self.total_lines == 0 {
            return None;
        }
        let failed = self.total_lines - self.parsed_lines;
        Some(failed as f64 / self.total_lines as f64 * 100.0)
    }

    fn merge(&mut self, other: ParseStats) {
        self.total_lines += other.total_lines;
        self.parsed_lines += other.parsed_lines;
    }
}

/// Running statistics for one url.
///
/// An accumulator is always created from its first sample, so `count` is
/// never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PathAccumulator {
    path: String,
    count: u64,
    time_sum: f64,
    durations: Vec<f64>,
}

impl PathAccumulator {
    pub fn new(path: impl Into<String>, duration: f64) -> Self {
        Self {
            path: path.into(),
            count: 1,
            time_sum: duration,
            durations: vec![duration],
        }
    }

    pub fn record(&mut self, duration: f64) {
        self.count += 1;
        self.time_sum += duration;
        self.durations.push(duration);
    }

    /// Fold another accumulator for the same url into this one
    pub fn merge(&mut self, other: PathAccumulator) {
        debug_assert_eq!(self.path, other.path);
        self.count += other.count;
        self.time_sum += other.time_sum;
        self.durations.extend(other.durations);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn time_sum(&self) -> f64 {
        self.time_sum
    }

    pub fn time_avg(&self) -> f64 {
        self.time_sum / self.count as f64
    }

    /// Samples in arrival order
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }
}

/// Result of one pass over a log: per-url accumulators in first-seen order
/// plus the line counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    paths: Vec<PathAccumulator>,
    stats: ParseStats,
}

impl Aggregation {
    pub fn paths(&self) -> &[PathAccumulator] {
        &self.paths
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn get(&self, path: &str) -> Option<&PathAccumulator> {
        self.paths.iter().find(|acc| acc.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Sum of `time_sum` over every url
    pub fn total_time(&self) -> f64 {
        self.paths.iter().map(|acc| acc.time_sum).sum()
    }

    /// Combine two partial aggregations, e.g. from separately parsed chunks.
    ///
    /// Urls already known keep their position, new ones are appended in the
    /// order `other` saw them.
    pub fn merge(mut self, other: Aggregation) -> Aggregation {
        let mut index: HashMap<String, usize> = self
            .paths
            .iter()
            .enumerate()
            .map(|(i, acc)| (acc.path.clone(), i))
            .collect();

        for acc in other.paths {
            match index.get(&acc.path) {
                Some(&i) => self.paths[i].merge(acc),
                None => {
                    index.insert(acc.path.clone(), self.paths.len());
                    self.paths.push(acc);
                }
            }
        }
        self.stats.merge(other.stats);
        self
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, aggregation: &Aggregation) -> crate::Result<Self::Output>;
}
