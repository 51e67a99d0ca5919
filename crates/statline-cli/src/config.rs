use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One configured widget slot on the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetItem {
    pub kind: String,
    /// Named ANSI color overriding the widget's default.
    #[serde(default)]
    pub color: Option<String>,
    /// Drop the label and print the bare value.
    #[serde(default)]
    pub raw_value: bool,
    /// Flip the reading where the widget supports it (percent used ->
    /// percent remaining, block elapsed -> block remaining).
    #[serde(default)]
    pub inverse: bool,
    /// Literal text for the custom-text widget.
    #[serde(default)]
    pub text: Option<String>,
}

impl WidgetItem {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            color: None,
            raw_value: false,
            inverse: false,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_widgets")]
    pub widgets: Vec<WidgetItem>,
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_widgets() -> Vec<WidgetItem> {
    [
        "model",
        "directory",
        "context-percentage-usable",
        "tokens-total",
        "block-timer",
    ]
    .iter()
    .map(|kind| WidgetItem::new(kind))
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            widgets: default_widgets(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load settings from a path; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Resolve the settings file path based on priority:
    /// 1. STATLINE_CONFIG environment variable (with tilde expansion)
    /// 2. XDG config directory
    /// 3. ~/.config/statline (fallback for systems without XDG)
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("STATLINE_CONFIG") {
            return Ok(expand_tilde(&env_path));
        }

        if let Some(config_dir) = dirs::config_dir() {
            return Ok(config_dir.join("statline").join("config.toml"));
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Ok(PathBuf::from(home)
                .join(".config")
                .join("statline")
                .join("config.toml"));
        }

        anyhow::bail!("could not determine settings path: no config directory or HOME found")
    }
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}
