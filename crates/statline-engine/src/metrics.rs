use serde::Serialize;
use statline_types::TranscriptRecord;

/// Aggregate token accounting for one transcript, recomputed fresh on every
/// render cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenMetrics {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_tokens: u64,
    pub total_tokens: u64,
    /// Context occupancy reported by the last counted record. A snapshot,
    /// not a running sum.
    pub context_length: u64,
    /// Context occupancy reported by the first counted record. The first
    /// real turn's input size approximates the fixed system-prompt and
    /// tool-definition cost carried through the session.
    pub system_overhead: u64,
}

impl TokenMetrics {
    pub fn collect<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TranscriptRecord>,
    {
        let mut acc = MetricsAccumulator::default();
        for record in records {
            acc.observe(&record);
        }
        acc.finish()
    }
}

/// Streaming accumulator so a single pass over the transcript can feed both
/// the metrics and the block detector.
#[derive(Debug, Default)]
pub(crate) struct MetricsAccumulator {
    input_tokens: u64,
    output_tokens: u64,
    cached_tokens: u64,
    context_length: u64,
    system_overhead: Option<u64>,
}

impl MetricsAccumulator {
    /// Fold one record in. Records without usage, sidechain branches, and
    /// failed API calls are not counted.
    pub fn observe(&mut self, record: &TranscriptRecord) {
        let Some(usage) = record.usage() else {
            return;
        };
        if record.is_sidechain || record.is_api_error {
            return;
        }

        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.cached_tokens += usage.cache_read_input_tokens.unwrap_or(0);

        let context = usage.context_tokens();
        self.context_length = context;
        if self.system_overhead.is_none() {
            self.system_overhead = Some(context);
        }
    }

    pub fn finish(self) -> TokenMetrics {
        TokenMetrics {
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            cached_tokens: self.cached_tokens,
            total_tokens: self.input_tokens + self.output_tokens,
            context_length: self.context_length,
            system_overhead: self.system_overhead.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> TranscriptRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn sums_counts_across_records() {
        let metrics = TokenMetrics::collect([
            record(
                r#"{"message":{"usage":{"input_tokens":500,"output_tokens":100,"cache_read_input_tokens":25000,"cache_creation_input_tokens":5000}}}"#,
            ),
            record(
                r#"{"message":{"usage":{"input_tokens":800,"output_tokens":200,"cache_read_input_tokens":30000,"cache_creation_input_tokens":0}}}"#,
            ),
        ]);

        assert_eq!(metrics.input_tokens, 1_300);
        assert_eq!(metrics.output_tokens, 300);
        assert_eq!(metrics.cached_tokens, 55_000);
        assert_eq!(metrics.total_tokens, 1_600);
    }

    #[test]
    fn system_overhead_comes_from_first_counted_record() {
        let metrics = TokenMetrics::collect([
            record(
                r#"{"message":{"usage":{"input_tokens":500,"output_tokens":100,"cache_read_input_tokens":25000,"cache_creation_input_tokens":5000}}}"#,
            ),
            record(
                r#"{"message":{"usage":{"input_tokens":800,"output_tokens":200,"cache_read_input_tokens":30000,"cache_creation_input_tokens":0}}}"#,
            ),
        ]);
        assert_eq!(metrics.system_overhead, 30_500);
    }

    #[test]
    fn system_overhead_skips_sidechain_records() {
        let metrics = TokenMetrics::collect([
            record(
                r#"{"isSidechain":true,"message":{"usage":{"input_tokens":999,"output_tokens":50}}}"#,
            ),
            record(
                r#"{"message":{"usage":{"input_tokens":400,"output_tokens":100,"cache_read_input_tokens":20000,"cache_creation_input_tokens":10000}}}"#,
            ),
        ]);
        assert_eq!(metrics.system_overhead, 30_400);
        assert_eq!(metrics.input_tokens, 400);
    }

    #[test]
    fn system_overhead_skips_api_error_records() {
        let metrics = TokenMetrics::collect([
            record(
                r#"{"isApiErrorMessage":true,"message":{"usage":{"input_tokens":0,"output_tokens":0}}}"#,
            ),
            record(
                r#"{"message":{"usage":{"input_tokens":300,"output_tokens":100,"cache_read_input_tokens":15000,"cache_creation_input_tokens":15000}}}"#,
            ),
        ]);
        assert_eq!(metrics.system_overhead, 30_300);
    }

    #[test]
    fn context_length_is_a_snapshot_of_the_last_counted_record() {
        let metrics = TokenMetrics::collect([
            record(
                r#"{"message":{"usage":{"input_tokens":500,"output_tokens":100,"cache_read_input_tokens":25000,"cache_creation_input_tokens":5000}}}"#,
            ),
            record(
                r#"{"message":{"usage":{"input_tokens":200,"output_tokens":50,"cache_read_input_tokens":40000,"cache_creation_input_tokens":1000}}}"#,
            ),
        ]);
        // 200 + 1000 + 40000, not a sum with the earlier record.
        assert_eq!(metrics.context_length, 41_200);
    }

    #[test]
    fn no_counted_records_means_all_zero() {
        let metrics = TokenMetrics::collect([
            record(r#"{"timestamp":"2025-09-23T08:00:00.000Z"}"#),
            record(
                r#"{"isSidechain":true,"message":{"usage":{"input_tokens":10,"output_tokens":5}}}"#,
            ),
        ]);
        assert_eq!(metrics, TokenMetrics::default());
    }
}
