use crate::args::{Cli, Commands};
use crate::config::{Settings, expand_tilde};
use crate::context::RenderContext;
use crate::render::{self, RenderOptions};
use crate::widgets;
use anyhow::Result;
use chrono::Utc;
use is_terminal::IsTerminal;
use statline_types::StatusPayload;
use std::io::Read;
use std::path::{Path, PathBuf};

pub fn run(cli: Cli) -> Result<()> {
    let config_path = resolve_config_path(&cli)?;

    match cli.command {
        Some(Commands::Widgets) => {
            list_widgets();
            Ok(())
        }
        Some(Commands::Init { force }) => init_settings(&config_path, force),
        None => render_status_line(&cli, &config_path),
    }
}

fn resolve_config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(expand_tilde(path)),
        None => Settings::default_path(),
    }
}

fn render_status_line(cli: &Cli, config_path: &Path) -> Result<()> {
    let settings = Settings::load_from(config_path)?;

    // Unreadable stdin is treated like an empty payload; the line still
    // renders from whatever the widgets can produce.
    let mut input = String::new();
    let _ = std::io::stdin().read_to_string(&mut input);
    let payload = StatusPayload::from_json(&input);

    let ctx = RenderContext::build(payload, Utc::now());
    let options = RenderOptions {
        color: !cli.no_color && std::io::stdout().is_terminal(),
        width: cli.width.or_else(terminal_width),
    };

    println!("{}", render::render_line(&ctx, &settings, &options));
    Ok(())
}

fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w as usize)
}

fn list_widgets() {
    for desc in widgets::REGISTRY {
        println!("{:<28} {}", desc.id, desc.description);
    }
}

fn init_settings(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "settings already exist at {} (use --force to overwrite)",
            path.display()
        );
    }

    Settings::default().save_to(path)?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
