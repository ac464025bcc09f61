use thiserror::Error;

/// Position of the request URL in the space-split ui_short record
const URL_FIELD: usize = 7;

/// One successfully parsed log line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub endpoint: String,
    pub latency_seconds: f64,
}

/// Structural failure of a single line; counted by the aggregator,
/// never aborts the stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseLineError {
    #[error("expected at least 8 space-separated fields, got {0}")]
    TooFewFields(usize),

    #[error("request time {0:?} is not a number")]
    BadLatency(String),
}

/// Extract (endpoint, latency) from one decoded line.
///
/// The ui_short format is split on single spaces with empty fields
/// preserved - the format itself contains a two-space run, so a
/// whitespace-collapsing split would shift the field positions. The URL
/// sits at a fixed index and the request time is always the final field.
pub fn parse_line(line: &str) -> Result<ParsedLine, ParseLineError> {
    let fields: Vec<&str> = line.trim().split(' ').collect();
    if fields.len() <= URL_FIELD {
        return Err(ParseLineError::TooFewFields(fields.len()));
    }

    let endpoint = fields[URL_FIELD];
    let last = fields[fields.len() - 1];
    let latency_seconds: f64 = last
        .parse()
        .map_err(|_| ParseLineError::BadLatency(last.to_string()))?;

    Ok(ParsedLine {
        endpoint: endpoint.to_string(),
        latency_seconds,
    })
}
