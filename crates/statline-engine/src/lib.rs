// Engine module - the session metrics core.
// Sits between the wire schemas (statline-types) and CLI presentation:
// reads the transcript, aggregates token usage, reconstructs accounting
// blocks, and resolves context capacity. No component here errors; every
// degraded input maps to a zero or absent value.

pub mod blocks;
pub mod context_window;
pub mod metrics;
pub mod percentage;
pub mod transcript;

pub use blocks::{SessionBlock, active_block, default_session_duration};
pub use context_window::ContextConfig;
pub use metrics::TokenMetrics;
pub use percentage::{PercentScale, context_percentage};
pub use transcript::transcript_records;

use chrono::{DateTime, Duration, Utc};
use metrics::MetricsAccumulator;
use std::path::Path;

/// Everything one pass over the transcript produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionAnalysis {
    pub metrics: TokenMetrics,
    pub block: Option<SessionBlock>,
    /// Earliest qualifying activity instant, for session-elapsed display.
    pub first_activity: Option<DateTime<Utc>>,
}

/// Read the transcript once and feed both the token aggregator and the
/// block detector from the same scan.
///
/// Block detection qualifies records on a usage block, a parseable
/// timestamp and the main chain; the aggregator additionally drops failed
/// API calls.
pub fn analyze_transcript(
    path: &Path,
    now: DateTime<Utc>,
    session_duration: Duration,
) -> SessionAnalysis {
    let mut acc = MetricsAccumulator::default();
    let mut timestamps: Vec<DateTime<Utc>> = Vec::new();

    for record in transcript_records(path) {
        if record.usage().is_some()
            && !record.is_sidechain
            && let Some(ts) = record.parsed_timestamp()
        {
            timestamps.push(ts);
        }
        acc.observe(&record);
    }

    SessionAnalysis {
        metrics: acc.finish(),
        block: active_block(&timestamps, now, session_duration),
        first_activity: timestamps.iter().min().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ts(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn usage_line(timestamp: &str, input: u64, output: u64) -> String {
        format!(
            r#"{{"timestamp":"{}","message":{{"usage":{{"input_tokens":{},"output_tokens":{}}}}}}}"#,
            timestamp, input, output
        )
    }

    #[test]
    fn one_pass_produces_metrics_and_block() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", usage_line("2025-09-23T08:15:00.000Z", 100, 50)).unwrap();
        writeln!(file, "{}", usage_line("2025-09-23T10:00:00.000Z", 200, 80)).unwrap();

        let analysis = analyze_transcript(
            file.path(),
            ts("2025-09-23T11:30:00.000Z"),
            default_session_duration(),
        );

        assert_eq!(analysis.metrics.total_tokens, 430);
        assert_eq!(
            analysis.block.unwrap().start,
            ts("2025-09-23T08:00:00.000Z")
        );
        assert_eq!(
            analysis.first_activity,
            Some(ts("2025-09-23T08:15:00.000Z"))
        );
    }

    #[test]
    fn missing_file_degrades_to_empty_analysis() {
        let analysis = analyze_transcript(
            Path::new("/tmp/statline-no-such-file.jsonl"),
            Utc::now(),
            default_session_duration(),
        );
        assert_eq!(analysis.metrics, TokenMetrics::default());
        assert!(analysis.block.is_none());
        assert!(analysis.first_activity.is_none());
    }

    #[test]
    fn sidechain_timestamps_do_not_anchor_blocks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2025-09-23T10:00:00.000Z","isSidechain":true,"message":{{"usage":{{"input_tokens":1,"output_tokens":1}}}}}}"#
        )
        .unwrap();

        let analysis = analyze_transcript(
            file.path(),
            ts("2025-09-23T11:00:00.000Z"),
            default_session_duration(),
        );
        assert!(analysis.block.is_none());
    }

    #[test]
    fn api_error_records_still_anchor_blocks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2025-09-23T10:30:00.000Z","isApiErrorMessage":true,"message":{{"usage":{{"input_tokens":0,"output_tokens":0}}}}}}"#
        )
        .unwrap();

        let analysis = analyze_transcript(
            file.path(),
            ts("2025-09-23T11:00:00.000Z"),
            default_session_duration(),
        );
        // Excluded from the token totals but not from block detection.
        assert_eq!(analysis.metrics, TokenMetrics::default());
        assert_eq!(
            analysis.block.unwrap().start,
            ts("2025-09-23T10:00:00.000Z")
        );
    }
}
