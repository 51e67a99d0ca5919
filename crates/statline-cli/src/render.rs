use crate::config::{Settings, WidgetItem};
use crate::context::RenderContext;
use crate::format::{format_cost, format_count, format_duration, format_percent};
use crate::widgets::{self, WidgetDescriptor, WidgetValue};
use owo_colors::{AnsiColors, OwoColorize};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
    pub width: Option<usize>,
}

/// Assemble the status line: run every configured widget, join the ones that
/// produced a value, and keep whole widgets while the visible line fits the
/// width budget.
pub fn render_line(ctx: &RenderContext, settings: &Settings, options: &RenderOptions) -> String {
    let mut plain = Vec::new();
    let mut painted = Vec::new();

    for item in &settings.widgets {
        let Some(desc) = widgets::find(&item.kind) else {
            continue;
        };
        let Some(value) = (desc.extract)(ctx, item) else {
            continue;
        };

        let text = render_value(desc, item, &value);
        let colored = if options.color {
            paint(&text, item.color.as_deref().unwrap_or(desc.default_color))
        } else {
            text.clone()
        };
        plain.push(text);
        painted.push(colored);
    }

    if let Some(width) = options.width {
        painted.truncate(widgets_fitting(&plain, &settings.separator, width));
    }

    painted.join(&settings.separator)
}

fn render_value(desc: &WidgetDescriptor, item: &WidgetItem, value: &WidgetValue) -> String {
    let body = match value {
        WidgetValue::Count(count) => format_count(*count),
        WidgetValue::Percent(pct) => format_percent(*pct),
        WidgetValue::Text(text) => text.clone(),
        WidgetValue::Elapsed(duration) => format_duration(*duration),
        WidgetValue::Cost(usd) => format_cost(*usd),
    };

    if item.raw_value || desc.label.is_empty() {
        body
    } else {
        format!("{}{}", desc.label, body)
    }
}

/// How many leading widgets fit in `width` visible columns. Measured on the
/// uncolored text so ANSI escapes never count against the budget.
fn widgets_fitting(parts: &[String], separator: &str, width: usize) -> usize {
    let separator_len = separator.chars().count();
    let mut used = 0;
    let mut kept = 0;

    for (i, part) in parts.iter().enumerate() {
        let cost = part.chars().count() + if i == 0 { 0 } else { separator_len };
        if used + cost > width {
            break;
        }
        used += cost;
        kept = i + 1;
    }

    kept
}

fn paint(text: &str, color: &str) -> String {
    match parse_color(color) {
        Some(color) => text.color(color).to_string(),
        None => text.to_string(),
    }
}

fn parse_color(name: &str) -> Option<AnsiColors> {
    match name {
        "black" => Some(AnsiColors::Black),
        "red" => Some(AnsiColors::Red),
        "green" => Some(AnsiColors::Green),
        "yellow" => Some(AnsiColors::Yellow),
        "blue" => Some(AnsiColors::Blue),
        "magenta" => Some(AnsiColors::Magenta),
        "cyan" => Some(AnsiColors::Cyan),
        "white" => Some(AnsiColors::White),
        "gray" | "grey" | "bright-black" => Some(AnsiColors::BrightBlack),
        "bright-red" => Some(AnsiColors::BrightRed),
        "bright-green" => Some(AnsiColors::BrightGreen),
        "bright-yellow" => Some(AnsiColors::BrightYellow),
        "bright-blue" => Some(AnsiColors::BrightBlue),
        "bright-magenta" => Some(AnsiColors::BrightMagenta),
        "bright-cyan" => Some(AnsiColors::BrightCyan),
        "bright-white" => Some(AnsiColors::BrightWhite),
        _ => None,
    }
}
