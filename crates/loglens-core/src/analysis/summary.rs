use super::{Aggregation, Analyzer, RunSummary};
use crate::Result;

pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = RunSummary;

    fn analyze(&self, aggregation: &Aggregation) -> Result<Self::Output> {
        tracing::debug!("Summarizing aggregation");

        let stats = aggregation.stats();
        let summary = RunSummary {
            total_lines: stats.total_lines,
            parsed_lines: stats.parsed_lines,
            error_perc: stats.error_perc(),
            distinct_urls: aggregation.paths().len(),
            total_time: aggregation.total_time(),
        };

        tracing::debug!(
            "Summary: {} lines, {} urls, {:.3}s total",
            summary.total_lines,
            summary.distinct_urls,
            summary.total_time
        );

        Ok(summary)
    }
}
