use chrono::{DateTime, Utc};
use statline_engine::{SessionAnalysis, TokenMetrics, analyze_transcript, default_session_duration};
use statline_types::{ContextWindowReport, StatusPayload};
use std::path::Path;

/// Everything a render cycle needs, assembled once per invocation.
#[derive(Debug)]
pub struct RenderContext {
    pub payload: StatusPayload,
    /// Transcript-derived figures; `None` when the payload named no
    /// transcript at all.
    pub analysis: Option<SessionAnalysis>,
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn build(payload: StatusPayload, now: DateTime<Utc>) -> Self {
        let analysis = payload
            .transcript_path
            .as_deref()
            .map(|path| analyze_transcript(Path::new(path), now, default_session_duration()));

        Self {
            payload,
            analysis,
            now,
        }
    }

    pub fn metrics(&self) -> Option<&TokenMetrics> {
        self.analysis.as_ref().map(|a| &a.metrics)
    }

    pub fn block(&self) -> Option<statline_engine::SessionBlock> {
        self.analysis.as_ref().and_then(|a| a.block)
    }

    pub fn first_activity(&self) -> Option<DateTime<Utc>> {
        self.analysis.as_ref().and_then(|a| a.first_activity)
    }

    pub fn model_id(&self) -> Option<&str> {
        self.payload.model_id()
    }

    pub fn report(&self) -> Option<ContextWindowReport> {
        self.payload.context_window.as_ref().map(|cw| cw.report())
    }
}
