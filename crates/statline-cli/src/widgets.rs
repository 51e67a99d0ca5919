use crate::config::WidgetItem;
use crate::context::RenderContext;
use chrono::Duration;
use statline_engine::{PercentScale, context_percentage};
use std::path::Path;

/// Raw value a widget contributes to the line; the renderer owns the
/// formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    Count(u64),
    Percent(f64),
    Text(String),
    Elapsed(Duration),
    Cost(f64),
}

pub type Extractor = fn(&RenderContext, &WidgetItem) -> Option<WidgetValue>;

/// One widget: a label, a default color, and a value extractor closing over
/// the render context. A single concrete renderer consumes these; there is
/// no widget type hierarchy.
pub struct WidgetDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub default_color: &'static str,
    pub extract: Extractor,
}

pub const REGISTRY: &[WidgetDescriptor] = &[
    WidgetDescriptor {
        id: "model",
        label: "",
        description: "Model display name",
        default_color: "cyan",
        extract: model,
    },
    WidgetDescriptor {
        id: "directory",
        label: "",
        description: "Basename of the current working directory",
        default_color: "blue",
        extract: directory,
    },
    WidgetDescriptor {
        id: "version",
        label: "",
        description: "Host application version",
        default_color: "bright-black",
        extract: version,
    },
    WidgetDescriptor {
        id: "output-style",
        label: "Style:",
        description: "Active output style name",
        default_color: "white",
        extract: output_style,
    },
    WidgetDescriptor {
        id: "tokens-input",
        label: "In:",
        description: "Input tokens summed over the transcript",
        default_color: "yellow",
        extract: tokens_input,
    },
    WidgetDescriptor {
        id: "tokens-output",
        label: "Out:",
        description: "Output tokens summed over the transcript",
        default_color: "green",
        extract: tokens_output,
    },
    WidgetDescriptor {
        id: "tokens-cached",
        label: "Cached:",
        description: "Cache-read tokens summed over the transcript",
        default_color: "cyan",
        extract: tokens_cached,
    },
    WidgetDescriptor {
        id: "tokens-total",
        label: "Total:",
        description: "Input plus output tokens",
        default_color: "white",
        extract: tokens_total,
    },
    WidgetDescriptor {
        id: "context-length",
        label: "Ctx:",
        description: "Current context occupancy in tokens",
        default_color: "bright-black",
        extract: context_length,
    },
    WidgetDescriptor {
        id: "context-percentage",
        label: "Ctx: ",
        description: "Context used as a percentage of the hard maximum",
        default_color: "green",
        extract: context_pct,
    },
    WidgetDescriptor {
        id: "context-percentage-usable",
        label: "Ctx(u): ",
        description: "Context used against the auto-compact threshold (80% of max); inverse shows remaining",
        default_color: "green",
        extract: context_pct_usable,
    },
    WidgetDescriptor {
        id: "system-overhead",
        label: "Sys:",
        description: "Approximate system prompt + tool definition tokens",
        default_color: "bright-black",
        extract: system_overhead,
    },
    WidgetDescriptor {
        id: "conversation-content",
        label: "Conv:",
        description: "Context added since session start (occupancy minus overhead)",
        default_color: "magenta",
        extract: conversation_content,
    },
    WidgetDescriptor {
        id: "call-input",
        label: "CIn:",
        description: "Last API call's non-cached input tokens",
        default_color: "blue",
        extract: call_input,
    },
    WidgetDescriptor {
        id: "call-output",
        label: "COut:",
        description: "Last API call's output tokens",
        default_color: "green",
        extract: call_output,
    },
    WidgetDescriptor {
        id: "call-cache-read",
        label: "CCR:",
        description: "Last API call's cache-read tokens",
        default_color: "cyan",
        extract: call_cache_read,
    },
    WidgetDescriptor {
        id: "call-cache-write",
        label: "CCW:",
        description: "Last API call's cache-creation tokens",
        default_color: "yellow",
        extract: call_cache_write,
    },
    WidgetDescriptor {
        id: "session-clock",
        label: "Session:",
        description: "Elapsed time since the first transcript activity",
        default_color: "white",
        extract: session_clock,
    },
    WidgetDescriptor {
        id: "block-timer",
        label: "Block:",
        description: "Elapsed time in the active 5-hour block; inverse shows remaining",
        default_color: "yellow",
        extract: block_timer,
    },
    WidgetDescriptor {
        id: "session-cost",
        label: "",
        description: "Session cost reported by the host",
        default_color: "green",
        extract: session_cost,
    },
    WidgetDescriptor {
        id: "custom-text",
        label: "",
        description: "Literal text from the settings file",
        default_color: "white",
        extract: custom_text,
    },
];

pub fn find(id: &str) -> Option<&'static WidgetDescriptor> {
    REGISTRY.iter().find(|desc| desc.id == id)
}

fn model(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.payload
        .model_name()
        .map(|name| WidgetValue::Text(name.to_string()))
}

fn directory(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    let dir = ctx
        .payload
        .workspace
        .as_ref()
        .and_then(|ws| ws.current_dir.as_deref())
        .or(ctx.payload.cwd.as_deref())?;
    let name = Path::new(dir)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string());
    Some(WidgetValue::Text(name))
}

fn version(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.payload
        .version
        .as_deref()
        .map(|v| WidgetValue::Text(format!("v{}", v)))
}

fn output_style(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.payload
        .output_style
        .as_ref()
        .and_then(|style| style.name.as_deref())
        .map(|name| WidgetValue::Text(name.to_string()))
}

fn tokens_input(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.metrics().map(|m| WidgetValue::Count(m.input_tokens))
}

fn tokens_output(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.metrics().map(|m| WidgetValue::Count(m.output_tokens))
}

fn tokens_cached(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.metrics().map(|m| WidgetValue::Count(m.cached_tokens))
}

fn tokens_total(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.metrics().map(|m| WidgetValue::Count(m.total_tokens))
}

fn context_length(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    // The provider's own accounting wins when it carries a capacity.
    if let Some(report) = ctx.report()
        && report.context_window_size > 0
    {
        return Some(WidgetValue::Count(report.total_input_tokens));
    }
    ctx.metrics().map(|m| WidgetValue::Count(m.context_length))
}

fn context_pct(ctx: &RenderContext, item: &WidgetItem) -> Option<WidgetValue> {
    percent(ctx, item, PercentScale::Max)
}

fn context_pct_usable(ctx: &RenderContext, item: &WidgetItem) -> Option<WidgetValue> {
    percent(ctx, item, PercentScale::Usable)
}

fn percent(ctx: &RenderContext, item: &WidgetItem, scale: PercentScale) -> Option<WidgetValue> {
    if ctx.report().is_none() && ctx.metrics().is_none() {
        return None;
    }
    let mut pct = context_percentage(ctx.report(), ctx.metrics(), ctx.model_id(), scale);
    if item.inverse {
        pct = 100.0 - pct;
    }
    Some(WidgetValue::Percent(pct))
}

fn system_overhead(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.metrics().map(|m| WidgetValue::Count(m.system_overhead))
}

fn conversation_content(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.metrics()
        .map(|m| WidgetValue::Count(m.context_length.saturating_sub(m.system_overhead)))
}

fn call_input(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    current_usage_field(ctx, |u| u.input_tokens)
}

fn call_output(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    current_usage_field(ctx, |u| u.output_tokens)
}

fn call_cache_read(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    current_usage_field(ctx, |u| u.cache_read_input_tokens)
}

fn call_cache_write(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    current_usage_field(ctx, |u| u.cache_creation_input_tokens)
}

fn current_usage_field(
    ctx: &RenderContext,
    field: fn(&statline_types::CurrentUsage) -> Option<u64>,
) -> Option<WidgetValue> {
    ctx.payload
        .context_window
        .as_ref()
        .and_then(|cw| cw.current_usage.as_ref())
        .and_then(field)
        .map(WidgetValue::Count)
}

fn session_clock(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.first_activity()
        .map(|start| WidgetValue::Elapsed(ctx.now - start))
}

fn block_timer(ctx: &RenderContext, item: &WidgetItem) -> Option<WidgetValue> {
    ctx.block().map(|block| {
        let elapsed = if item.inverse {
            block.end - ctx.now
        } else {
            ctx.now - block.start
        };
        WidgetValue::Elapsed(elapsed)
    })
}

fn session_cost(ctx: &RenderContext, _item: &WidgetItem) -> Option<WidgetValue> {
    ctx.payload
        .cost
        .as_ref()
        .and_then(|cost| cost.total_cost_usd)
        .map(WidgetValue::Cost)
}

fn custom_text(_ctx: &RenderContext, item: &WidgetItem) -> Option<WidgetValue> {
    item.text.clone().map(WidgetValue::Text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use statline_types::StatusPayload;

    fn context_for(json: &str) -> RenderContext {
        // No transcript on disk; payload-only widgets are exercised here and
        // transcript-backed ones in the integration tests.
        RenderContext::build(
            StatusPayload::from_json(json),
            Utc.with_ymd_and_hms(2025, 9, 23, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn registry_ids_are_unique() {
        let mut ids: Vec<_> = REGISTRY.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), REGISTRY.len());
    }

    #[test]
    fn model_prefers_display_name() {
        let ctx = context_for(r#"{"model":{"id":"claude-opus-4-6","display_name":"Opus"}}"#);
        let value = model(&ctx, &WidgetItem::new("model")).unwrap();
        assert_eq!(value, WidgetValue::Text("Opus".to_string()));
    }

    #[test]
    fn directory_takes_the_basename() {
        let ctx = context_for(r#"{"workspace":{"current_dir":"/home/user/projects/demo"}}"#);
        let value = directory(&ctx, &WidgetItem::new("directory")).unwrap();
        assert_eq!(value, WidgetValue::Text("demo".to_string()));
    }

    #[test]
    fn token_widgets_hide_without_a_transcript() {
        let ctx = context_for(r#"{"model":"claude-sonnet-4-6"}"#);
        assert!(tokens_total(&ctx, &WidgetItem::new("tokens-total")).is_none());
        assert!(system_overhead(&ctx, &WidgetItem::new("system-overhead")).is_none());
    }

    #[test]
    fn percent_widget_uses_the_live_report() {
        let ctx = context_for(
            r#"{"context_window":{"total_input_tokens":80000,"context_window_size":200000}}"#,
        );
        let value = context_pct_usable(&ctx, &WidgetItem::new("context-percentage-usable")).unwrap();
        assert_eq!(value, WidgetValue::Percent(50.0));
    }

    #[test]
    fn percent_widget_inverse_shows_remaining() {
        let ctx = context_for(
            r#"{"context_window":{"total_input_tokens":80000,"context_window_size":200000}}"#,
        );
        let item = WidgetItem {
            inverse: true,
            ..WidgetItem::new("context-percentage-usable")
        };
        let value = context_pct_usable(&ctx, &item).unwrap();
        assert_eq!(value, WidgetValue::Percent(50.0));

        let max_item = WidgetItem {
            inverse: true,
            ..WidgetItem::new("context-percentage")
        };
        let Some(WidgetValue::Percent(pct)) = context_pct(&ctx, &max_item) else {
            panic!("expected a percent value");
        };
        assert!((pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn call_widgets_read_the_last_call_breakdown() {
        let ctx = context_for(
            r#"{"context_window":{"current_usage":{"input_tokens":500,"cache_read_input_tokens":80000}}}"#,
        );
        assert_eq!(
            call_input(&ctx, &WidgetItem::new("call-input")),
            Some(WidgetValue::Count(500))
        );
        assert_eq!(
            call_cache_read(&ctx, &WidgetItem::new("call-cache-read")),
            Some(WidgetValue::Count(80_000))
        );
        assert!(call_output(&ctx, &WidgetItem::new("call-output")).is_none());
    }

    #[test]
    fn session_cost_reads_the_host_total() {
        let ctx = context_for(r#"{"cost":{"total_cost_usd":0.42}}"#);
        assert_eq!(
            session_cost(&ctx, &WidgetItem::new("session-cost")),
            Some(WidgetValue::Cost(0.42))
        );
    }

    #[test]
    fn custom_text_echoes_the_configured_text() {
        let ctx = context_for("{}");
        let item = WidgetItem {
            text: Some("ready".to_string()),
            ..WidgetItem::new("custom-text")
        };
        assert_eq!(
            custom_text(&ctx, &item),
            Some(WidgetValue::Text("ready".to_string()))
        );
        assert!(custom_text(&ctx, &WidgetItem::new("custom-text")).is_none());
    }
}
