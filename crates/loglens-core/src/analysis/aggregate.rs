use super::{Aggregation, DEFAULT_ERROR_CEILING, ParseStats, PathAccumulator};
use crate::access::{LogReader, parse_line};
use crate::{Error, Result};
use std::collections::HashMap;
use std::io::BufRead;

/// Single-pass aggregator of access log lines into per-url statistics.
///
/// Lines that do not parse are counted and skipped. Once the input is
/// exhausted, a failure rate at or above the ceiling turns the whole pass
/// into [`Error::FatalParseRatio`].
pub struct StreamAggregator {
    error_ceiling: f64,
}

impl StreamAggregator {
    /// `error_ceiling` is the tolerated share of unparsable lines, in percent
    pub fn new(error_ceiling: f64) -> Self {
        Self { error_ceiling }
    }

    pub fn error_ceiling(&self) -> f64 {
        self.error_ceiling
    }

    pub fn aggregate<I, S>(&self, lines: I) -> Result<Aggregation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = AggregationBuilder::default();
        for line in lines {
            builder.observe(line.as_ref());
        }
        builder.finish(self.error_ceiling)
    }

    /// Aggregate straight from a byte stream, one line in memory at a time
    pub fn aggregate_reader<R: BufRead>(&self, reader: R) -> Result<Aggregation> {
        let mut builder = AggregationBuilder::default();
        for line in LogReader::lines(reader) {
            builder.observe(&line?);
        }
        builder.finish(self.error_ceiling)
    }
}

/// An error ceiling must lie in (0, 100]: above 100 no log can be rejected,
/// at 0 every non-empty log is.
pub fn check_error_ceiling(ceiling: f64) -> Result<()> {
    if ceiling > 0.0 && ceiling <= 100.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "error ceiling must be within (0, 100], got {}",
            ceiling
        )))
    }
}

impl Default for StreamAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_CEILING)
    }
}

#[derive(Default)]
struct AggregationBuilder {
    index: HashMap<String, usize>,
    paths: Vec<PathAccumulator>,
    stats: ParseStats,
}

impl AggregationBuilder {
    fn observe(&mut self, line: &str) {
        self.stats.total_lines += 1;

        let Some(sample) = parse_line(line) else {
            tracing::debug!("Line {} could not be parsed", self.stats.total_lines);
            return;
        };

        self.stats.parsed_lines += 1;
        match self.index.get(sample.path) {
            Some(&i) => self.paths[i].record(sample.duration),
            None => {
                self.index.insert(sample.path.to_string(), self.paths.len());
                self.paths
                    .push(PathAccumulator::new(sample.path, sample.duration));
            }
        }
    }

    fn finish(self, error_ceiling: f64) -> Result<Aggregation> {
        let stats = self.stats;

        let Some(error_perc) = stats.error_perc() else {
            tracing::info!("Log is empty, nothing to aggregate");
            return Ok(Aggregation::default());
        };

        if error_perc >= error_ceiling {
            return Err(Error::FatalParseRatio {
                error_perc,
                total_lines: stats.total_lines,
                parsed_lines: stats.parsed_lines,
                ceiling: error_ceiling,
            });
        }

        tracing::info!(
            "Aggregation complete: {} of {} lines parsed ({:.3}% unparsed), {} urls",
            stats.parsed_lines,
            stats.total_lines,
            error_perc,
            self.paths.len()
        );

        Ok(Aggregation {
            paths: self.paths,
            stats,
        })
    }
}
