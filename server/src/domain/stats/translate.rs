//! Conversion of raw stat values into metric values
//!
//! Bridges report every value as text. Gauges and counters are plain
//! decimal numbers. Histograms arrive as a JSON array of per-bucket counts
//! where the array index is the bucket (e.g. `conference_sizes` = `[3,5,1]`
//! means three conferences of size 0, five of size 1, one of size 2).

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TranslateError {
    /// Gauge/counter value is not a decimal number
    #[error("invalid numeric value {value:?}: {reason}")]
    Parse { value: String, reason: String },

    /// Histogram value is not a JSON array of non-negative integers
    #[error("invalid histogram value {value:?}: {reason}")]
    Decode { value: String, reason: String },
}

/// Histogram with cumulative buckets, keyed by bucket index
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramValue {
    pub total_count: u64,
    pub sum: f64,
    /// `(boundary, cumulative count)` in ascending boundary order
    pub cumulative_by_boundary: Vec<(f64, u64)>,
}

impl HistogramValue {
    /// Per-bucket (non-cumulative) counts, recovered from the cumulative ones
    pub fn bucket_counts(&self) -> Vec<(f64, u64)> {
        let mut previous = 0;
        self.cumulative_by_boundary
            .iter()
            .map(|&(boundary, cumulative)| {
                let count = cumulative - previous;
                previous = cumulative;
                (boundary, count)
            })
            .collect()
    }
}

pub fn to_gauge(value: &str) -> Result<f64, TranslateError> {
    parse_decimal(value)
}

/// Same parse rule as gauges. Monotonicity is the source's responsibility.
pub fn to_counter(value: &str) -> Result<f64, TranslateError> {
    parse_decimal(value)
}

fn parse_decimal(value: &str) -> Result<f64, TranslateError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| TranslateError::Parse {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Decode the bridge's histogram encoding.
///
/// The bucket index doubles as the bucket boundary, so `sum` is
/// `Σ index * count`. Bridges send no boundary metadata.
pub fn to_histogram(value: &str) -> Result<HistogramValue, TranslateError> {
    let counts: Vec<u64> = serde_json::from_str(value).map_err(|e| TranslateError::Decode {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    let mut cumulative: u64 = 0;
    let mut sum = 0.0;
    let mut cumulative_by_boundary = Vec::with_capacity(counts.len());

    for (index, count) in counts.into_iter().enumerate() {
        cumulative = cumulative.saturating_add(count);
        cumulative_by_boundary.push((index as f64, cumulative));
        sum += index as f64 * count as f64;
    }

    Ok(HistogramValue {
        total_count: cumulative,
        sum,
        cumulative_by_boundary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_gauge_parses_decimals() {
        assert_eq!(to_gauge("42").unwrap(), 42.0);
        assert_eq!(to_gauge("0.25").unwrap(), 0.25);
        assert_eq!(to_gauge("-3.5").unwrap(), -3.5);
        assert_eq!(to_gauge(" 7 ").unwrap(), 7.0);
        assert_eq!(to_gauge("1e3").unwrap(), 1000.0);
    }

    #[test]
    fn test_to_gauge_rejects_non_numbers() {
        assert!(matches!(to_gauge("abc"), Err(TranslateError::Parse { .. })));
        assert!(matches!(to_gauge(""), Err(TranslateError::Parse { .. })));
        assert!(matches!(to_gauge("[1,2]"), Err(TranslateError::Parse { .. })));
    }

    #[test]
    fn test_to_counter_does_not_check_sign() {
        assert_eq!(to_counter("12345").unwrap(), 12345.0);
        assert_eq!(to_counter("-1").unwrap(), -1.0);
        assert!(to_counter("1.2.3").is_err());
    }

    #[test]
    fn test_to_histogram_accumulates_buckets() {
        let hist = to_histogram("[1,2,3]").unwrap();
        assert_eq!(hist.total_count, 6);
        assert_eq!(hist.sum, 8.0);
        assert_eq!(
            hist.cumulative_by_boundary,
            vec![(0.0, 1), (1.0, 3), (2.0, 6)]
        );
    }

    #[test]
    fn test_to_histogram_cumulative_is_non_decreasing() {
        let hist = to_histogram("[0,4,0,0,9,1]").unwrap();
        let counts: Vec<u64> = hist.cumulative_by_boundary.iter().map(|b| b.1).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(hist.total_count, 14);
        assert_eq!(hist.sum, 4.0 + 36.0 + 5.0);
    }

    #[test]
    fn test_to_histogram_empty_array() {
        let hist = to_histogram("[]").unwrap();
        assert_eq!(hist.total_count, 0);
        assert_eq!(hist.sum, 0.0);
        assert!(hist.cumulative_by_boundary.is_empty());
    }

    #[test]
    fn test_to_histogram_rejects_bad_input() {
        for bad in ["not-json", "{}", "5", "[1,-2]", "[1.5]", "[\"1\"]", ""] {
            assert!(
                matches!(to_histogram(bad), Err(TranslateError::Decode { .. })),
                "expected decode error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_bucket_counts_round_trip_per_bucket() {
        let hist = to_histogram("[1,0,3]").unwrap();
        assert_eq!(hist.bucket_counts(), vec![(0.0, 1), (1.0, 0), (2.0, 3)]);
    }

    #[test]
    fn test_error_message_includes_value() {
        let err = to_gauge("oops").unwrap_err();
        assert!(err.to_string().contains("\"oops\""));
    }
}
