//! Engine configuration.
//!
//! # Responsibility
//! - Hold the knobs a host may set at bind time.
//! - Parse string-typed settings coming from env vars or FFI callers.
//!
//! # Invariants
//! - Every field has a default; an empty config is always valid.
//! - Configuration never changes the logical model: `\n` is one character
//!   and serializes as `\n` in every line-break mode.

use crate::buffer::OBJECT_PLACEHOLDER;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Env var overriding [`ComposeConfig::line_breaks`].
pub const LINE_BREAKS_ENV: &str = "COMPOSE_AREA_LINE_BREAKS";

/// How `\n` characters are rendered on the host surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBreakMode {
    /// Each `\n` becomes its own line-break element between text nodes.
    #[default]
    Element,
    /// `\n` stays inside text nodes (pre-wrapped surfaces).
    Inline,
}

impl LineBreakMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Inline => "inline",
        }
    }

    /// Parses a case-insensitive mode name.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "element" | "br" => Ok(Self::Element),
            "inline" | "pre" => Ok(Self::Inline),
            "" => Err(ConfigError::EmptyValue("line_breaks")),
            other => Err(ConfigError::UnsupportedLineBreakMode(other.to_string())),
        }
    }
}

/// Configuration parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue(&'static str),
    UnsupportedLineBreakMode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(field) => write!(f, "{field} cannot be empty"),
            Self::UnsupportedLineBreakMode(value) => write!(
                f,
                "unsupported line break mode `{value}`; expected element|inline"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Bind-time settings for one compose area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub line_breaks: LineBreakMode,
    /// Stand-in for objects in `get_text()` output.
    pub placeholder: char,
    /// Default trimming for `extract_text`.
    pub trim_extracted_text: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            line_breaks: LineBreakMode::default(),
            placeholder: OBJECT_PLACEHOLDER,
            trim_extracted_text: true,
        }
    }
}

impl ComposeConfig {
    /// Default config with env overrides applied.
    ///
    /// Blank values are ignored; invalid values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(LINE_BREAKS_ENV) {
            if !raw.trim().is_empty() {
                match LineBreakMode::parse(&raw) {
                    Ok(mode) => config.line_breaks = mode,
                    Err(err) => warn!(
                        "event=config_load module=config status=ignored key={} error={}",
                        LINE_BREAKS_ENV, err
                    ),
                }
            }
        }
        config
    }

    pub fn with_line_breaks(mut self, mode: LineBreakMode) -> Self {
        self.line_breaks = mode;
        self
    }
}
