use crate::context_window::ContextConfig;
use crate::metrics::TokenMetrics;
use statline_types::ContextWindowReport;

/// Which capacity figure a percentage is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentScale {
    /// The model's hard context maximum.
    Max,
    /// 80% of the maximum, the threshold before automatic compaction.
    Usable,
}

/// Context usage as a percentage in `[0, 100]`.
///
/// The provider's own report wins whenever it carries a positive capacity,
/// since it accounts for model-specific overhead the transcript cannot see.
/// Otherwise the transcript-derived occupancy is measured against the
/// capacity tier resolved from the model identifier. With neither source,
/// the answer is 0.
pub fn context_percentage(
    report: Option<ContextWindowReport>,
    metrics: Option<&TokenMetrics>,
    model_id: Option<&str>,
    scale: PercentScale,
) -> f64 {
    if let Some(report) = report
        && report.context_window_size > 0
    {
        let capacity = match scale {
            PercentScale::Max => report.context_window_size as f64,
            PercentScale::Usable => report.context_window_size as f64 * 0.8,
        };
        return percent_of(report.total_input_tokens as f64, capacity);
    }

    if let Some(metrics) = metrics {
        let config = ContextConfig::for_model(model_id);
        let capacity = match scale {
            PercentScale::Max => config.max_tokens,
            PercentScale::Usable => config.usable_tokens,
        };
        return percent_of(metrics.context_length as f64, capacity as f64);
    }

    0.0
}

fn percent_of(occupied: f64, capacity: f64) -> f64 {
    (occupied / capacity * 100.0).min(100.0)
}
