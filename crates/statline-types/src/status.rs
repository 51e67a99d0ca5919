use serde::Deserialize;

/// Live session payload fed to the status line on stdin.
///
/// Every field is optional and unknown fields are ignored; the host emits
/// slightly different shapes across versions and a render must never fail
/// on account of the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub model: Option<ModelInfo>,
    #[serde(default)]
    pub workspace: Option<WorkspaceInfo>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub output_style: Option<OutputStyle>,
    #[serde(default)]
    pub cost: Option<CostInfo>,
    #[serde(default)]
    pub context_window: Option<ContextWindowInfo>,
}

impl StatusPayload {
    /// Parse a payload from raw stdin text. Malformed or empty input
    /// degrades to an empty payload rather than an error.
    pub fn from_json(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// Model identifier, whichever shape the host sent it in.
    pub fn model_id(&self) -> Option<&str> {
        self.model.as_ref().and_then(ModelInfo::id)
    }

    /// Human-facing model name, falling back to the identifier.
    pub fn model_name(&self) -> Option<&str> {
        self.model
            .as_ref()
            .and_then(|m| m.display_name().or_else(|| m.id()))
    }
}

/// The model field arrives either as a bare identifier string or as an
/// object carrying id + display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelInfo {
    Id(String),
    Detailed {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        display_name: Option<String>,
    },
}

impl ModelInfo {
    pub fn id(&self) -> Option<&str> {
        match self {
            ModelInfo::Id(id) => Some(id),
            ModelInfo::Detailed { id, .. } => id.as_deref(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            ModelInfo::Id(_) => None,
            ModelInfo::Detailed { display_name, .. } => display_name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub current_dir: Option<String>,
    #[serde(default)]
    pub project_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputStyle {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostInfo {
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub total_duration_ms: Option<u64>,
    #[serde(default)]
    pub total_api_duration_ms: Option<u64>,
    #[serde(default)]
    pub total_lines_added: Option<u64>,
    #[serde(default)]
    pub total_lines_removed: Option<u64>,
}

/// Provider-side context accounting attached to newer payloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextWindowInfo {
    #[serde(default)]
    pub total_input_tokens: Option<u64>,
    #[serde(default)]
    pub context_window_size: Option<u64>,
    #[serde(default)]
    pub current_usage: Option<CurrentUsage>,
}

impl ContextWindowInfo {
    pub fn report(&self) -> ContextWindowReport {
        ContextWindowReport {
            total_input_tokens: self.total_input_tokens.unwrap_or(0),
            context_window_size: self.context_window_size.unwrap_or(0),
        }
    }
}

/// Token breakdown of the most recent API call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
}

/// Occupancy/capacity pair as reported by the provider. Authoritative over
/// transcript-derived figures whenever `context_window_size > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindowReport {
    pub total_input_tokens: u64,
    pub context_window_size: u64,
}
