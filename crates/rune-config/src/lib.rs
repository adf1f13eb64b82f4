//! Rune text area configuration
//!
//! Centralized settings for the text area engine, loaded from
//! `textarea.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default file name looked up by [`TextAreaConfig::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "textarea.toml";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`TextAreaConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the text area engine
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TextAreaConfig {
    /// Font selection
    pub font: FontConfig,
    /// Paragraph layout settings
    pub layout: LayoutConfig,
    /// Caret geometry and navigation
    pub caret: CaretConfig,
    /// Scroll-into-view policy
    pub scroll: ScrollConfig,
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// Font family name used to look up a face
    pub family: String,
    /// Font size in logical pixels (px per em)
    pub size: f32,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Wrap paragraphs at the viewport width
    pub wrap_text: bool,
    /// Extra space added below every visual line, in pixels
    pub line_spacing: f32,
}

/// Caret configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaretConfig {
    /// Width of the caret bar in pixels
    pub width: f32,
    /// Move past the trailing newline on paragraph-end (Windows behavior)
    pub paragraph_end_past_newline: bool,
}

/// Scroll configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    /// Distance from either scroll limit within which scrolling snaps to that limit
    pub slop: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 14.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wrap_text: true,
            line_spacing: 0.0,
        }
    }
}

impl Default for CaretConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            paragraph_end_past_newline: cfg!(windows),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { slop: 6.0 }
    }
}

impl TextAreaConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the textarea.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location (textarea.toml in the current directory)
    /// or return default configuration if the file is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                log::warn!("{DEFAULT_CONFIG_FILE}: {err}; using defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary key lookup (the environment in production).
    pub fn merge_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(family) = lookup("RUNE_TEXTAREA_FONT") {
            self.font.family = family;
        }
        if let Some(val) = lookup("RUNE_TEXTAREA_FONT_SIZE") {
            match val.parse::<f32>() {
                Ok(size) if size > 0.0 => self.font.size = size,
                _ => log::warn!("ignoring RUNE_TEXTAREA_FONT_SIZE={val:?}"),
            }
        }
        if let Some(val) = lookup("RUNE_TEXTAREA_WRAP") {
            self.layout.wrap_text = parse_flag(&val);
        }
        if let Some(val) = lookup("RUNE_TEXTAREA_LINE_SPACING") {
            if let Ok(spacing) = val.parse::<f32>() {
                self.layout.line_spacing = spacing.max(0.0);
            }
        }
        if let Some(val) = lookup("RUNE_TEXTAREA_CARET_WIDTH") {
            if let Ok(width) = val.parse::<f32>() {
                self.caret.width = width.max(0.0);
            }
        }
        if let Some(val) = lookup("RUNE_TEXTAREA_SCROLL_SLOP") {
            if let Ok(slop) = val.parse::<f32>() {
                self.scroll.slop = slop.max(0.0);
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from textarea.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}
