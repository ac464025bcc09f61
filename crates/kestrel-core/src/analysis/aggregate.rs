use super::{EndpointReport, Report};
use crate::parse::parse_line;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Streaming per-endpoint latency aggregation.
///
/// Consumes a line source, tolerating per-line decode and parse failures up
/// to an error-rate threshold, and produces the ranked report. One
/// aggregator run owns its accumulator exclusively; nothing is retained
/// across files.
pub struct Aggregator {
    report_size: usize,
    error_threshold: f64,
    line_limit: Option<usize>,
}

impl Aggregator {
    pub fn new(report_size: usize) -> Self {
        Self {
            report_size,
            error_threshold: 1.0,
            line_limit: None,
        }
    }

    /// Fail the run when `errors / lines` reaches this ratio
    pub fn with_error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Process at most line indices 0..=limit, for smoke and diagnostic runs
    pub fn with_line_limit(mut self, limit: Option<usize>) -> Self {
        self.line_limit = limit;
        self
    }

    pub fn aggregate(&self, lines: impl Iterator<Item = Result<String>>) -> Result<Report> {
        let mut samples: IndexMap<String, Vec<f64>> = IndexMap::new();
        let mut line_count = 0usize;
        let mut error_count = 0usize;
        let mut latency_sum = 0f64;

        for (index, line) in lines.enumerate() {
            line_count += 1;
            match line {
                Ok(text) => match parse_line(&text) {
                    Ok(parsed) => {
                        latency_sum += parsed.latency_seconds;
                        samples
                            .entry(parsed.endpoint)
                            .or_default()
                            .push(parsed.latency_seconds);
                    }
                    Err(err) => {
                        tracing::debug!("Line {}: {}", index + 1, err);
                        error_count += 1;
                    }
                },
                Err(Error::Decode { line }) => {
                    tracing::debug!("Line {}: not decodable", line);
                    error_count += 1;
                }
                // infrastructure failure, not a data-quality one
                Err(err) => return Err(err),
            }

            if line_count % 100_000 == 0 {
                tracing::debug!("Processed {} lines", line_count);
            }
            if self.line_limit.is_some_and(|limit| index >= limit) {
                tracing::info!("Line limit reached after {} lines", line_count);
                break;
            }
        }

        if line_count == 0 {
            return Err(Error::EmptyInput);
        }
        if error_count as f64 / line_count as f64 >= self.error_threshold {
            return Err(Error::ErrorThreshold {
                errors: error_count,
                lines: line_count,
                threshold: self.error_threshold,
            });
        }

        tracing::info!(
            "Aggregated {} lines ({} failed) across {} endpoints",
            line_count,
            error_count,
            samples.len()
        );

        let mut entries: Vec<EndpointReport> = samples
            .into_iter()
            .map(|(url, mut times)| {
                let count = times.len();
                let time_sum: f64 = times.iter().sum();
                times.sort_by(f64::total_cmp);
                EndpointReport {
                    url,
                    count,
                    count_perc: count as f64 / line_count as f64,
                    time_sum,
                    time_perc: time_sum / latency_sum,
                    time_avg: time_sum / count as f64,
                    time_max: times.last().copied().unwrap_or(0.0),
                    time_median: median(&times),
                }
            })
            .collect();

        // stable sort: equal time_sum keeps first-seen endpoint order
        entries.sort_by(|a, b| b.time_sum.total_cmp(&a.time_sum));
        entries.truncate(self.report_size);

        Ok(Report {
            entries,
            lines_processed: line_count,
            lines_failed: error_count,
        })
    }
}

/// Median of an ascending-sorted, non-empty slice: the exact middle element
/// for odd lengths, the mean of the two central elements for even lengths.
fn median(sorted: &[f64]) -> f64 {
    let index = (sorted.len() - 1) / 2;
    if sorted.len() % 2 == 1 {
        sorted[index]
    } else {
        (sorted[index] + sorted[index + 1]) / 2.0
    }
}
