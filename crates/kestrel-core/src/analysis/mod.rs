mod aggregate;

pub use aggregate::Aggregator;

use serde::{Deserialize, Serialize};

/// Per-endpoint latency statistics.
///
/// Field names double as the JSON keys the HTML report template consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointReport {
    pub url: String,
    pub count: usize,
    pub count_perc: f64,
    pub time_sum: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_median: f64,
}

/// Ranked output of one aggregation run over one log file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Rows sorted by `time_sum` descending, truncated to the report size
    pub entries: Vec<EndpointReport>,
    pub lines_processed: usize,
    pub lines_failed: usize,
}
