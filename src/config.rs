// src/config.rs

//! Configuration for the `codetype` front-end.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only
//! needs the keys it wants to change. The process-wide [`CONFIG`] is read
//! from the file named by `CODETYPE_CONFIG`, or falls back to defaults.

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Palette;
use crate::highlight::{HighlightMode, HighlightOptions, Highlighter};
use crate::script::data_pipeline_lines;
use crate::typing::TypingConfig;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "CODETYPE_CONFIG";

/// Global configuration, resolved once on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
        warn!("Falling back to default configuration: {:#}", e);
        Config::default()
    }
});

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script and pacing of the animation.
    pub typing: TypingConfig,
    /// Tokenizer mode.
    pub highlight: HighlightConfig,
    /// Token colours.
    pub colors: Palette,
    /// Terminal output settings.
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            typing: TypingConfig::editor(data_pipeline_lines()),
            highlight: HighlightConfig::default(),
            colors: Palette::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    /// Reads and parses a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid configuration JSON")
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// The typing config to run. A config that leaves the script empty
    /// plays the built-in one.
    pub fn effective_typing(&self) -> TypingConfig {
        if self.typing.lines.is_empty() {
            TypingConfig {
                lines: data_pipeline_lines(),
                ..self.typing.clone()
            }
        } else {
            self.typing.clone()
        }
    }
}

// --- Highlight Configuration ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub mode: HighlightMode,
    /// Explicit scanner options; overrides `mode` when present.
    pub options: Option<HighlightOptions>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            // The typing block handles multi-line strings line by line.
            mode: HighlightMode::Editor,
            options: None,
        }
    }
}

impl HighlightConfig {
    pub fn highlighter(&self) -> Highlighter {
        match self.options {
            Some(options) => Highlighter::new(options),
            None => Highlighter::for_mode(self.mode),
        }
    }
}

// --- Render Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw the block cursor after the last typed line.
    pub show_cursor: bool,
    pub cursor_char: char,
    /// Clear the screen and home the cursor before each frame.
    pub clear_screen: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            show_cursor: true,
            cursor_char: '▌',
            clear_screen: true,
        }
    }
}
