use super::{Aggregation, Analyzer, DEFAULT_REPORT_SIZE, PathAccumulator, ReportRecord};
use crate::Result;

/// Ranks urls by their total request time and keeps the `top_n` slowest
pub struct ReportBuilder {
    top_n: usize,
}

impl ReportBuilder {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn build(&self, aggregation: &Aggregation) -> Vec<ReportRecord> {
        let parsed_lines = aggregation.stats().parsed_lines;
        let total_time = aggregation.total_time();

        // Stable sort, so equal totals stay in first-seen order.
        let mut ranked: Vec<&PathAccumulator> = aggregation.paths().iter().collect();
        ranked.sort_by(|a, b| b.time_sum().total_cmp(&a.time_sum()));
        ranked.truncate(self.top_n);

        let records: Vec<ReportRecord> = ranked
            .into_iter()
            .map(|acc| finalize(acc, parsed_lines, total_time))
            .collect();

        tracing::info!(
            "Report built: {} of {} urls",
            records.len(),
            aggregation.paths().len()
        );

        records
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_SIZE)
    }
}

impl Analyzer for ReportBuilder {
    type Output = Vec<ReportRecord>;

    fn analyze(&self, aggregation: &Aggregation) -> Result<Self::Output> {
        Ok(self.build(aggregation))
    }
}

fn finalize(acc: &PathAccumulator, parsed_lines: u64, total_time: f64) -> ReportRecord {
    let mut durations = acc.durations().to_vec();
    durations.sort_by(f64::total_cmp);

    let time_max = durations.last().copied().unwrap_or_default();
    let time_perc = if total_time > 0.0 {
        acc.time_sum() / total_time * 100.0
    } else {
        0.0
    };

    ReportRecord {
        url: acc.path().to_string(),
        count: acc.count(),
        time_sum: round3(acc.time_sum()),
        time_avg: round3(acc.time_avg()),
        time_max: round3(time_max),
        time_med: round3(median(&durations)),
        count_perc: round3(acc.count() as f64 / parsed_lines as f64 * 100.0),
        time_perc: round3(time_perc),
    }
}

/// Median of an ascending slice: the middle element, or the mean of the two
/// middle elements for an even length.
fn median(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
