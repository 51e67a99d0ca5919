/// Context-window capacity tier for a model identifier.
///
/// `usable_tokens` is 80% of `max_tokens`, the headroom left before the
/// host starts compacting context automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    pub max_tokens: u64,
    pub usable_tokens: u64,
}

const DEFAULT_TIER: ContextConfig = ContextConfig {
    max_tokens: 200_000,
    usable_tokens: 160_000,
};

const EXTENDED_TIER: ContextConfig = ContextConfig {
    max_tokens: 1_000_000,
    usable_tokens: 800_000,
};

impl ContextConfig {
    /// Resolve capacity from a model identifier.
    ///
    /// Any identifier carrying the `[1m]` long-context marker gets the 1M
    /// tier, regardless of model family. Everything else, including absent
    /// or unrecognized identifiers, gets the 200k tier.
    pub fn for_model(model_id: Option<&str>) -> Self {
        match model_id {
            Some(id) if id.to_lowercase().contains("[1m]") => EXTENDED_TIER,
            _ => DEFAULT_TIER,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        DEFAULT_TIER
    }
}
