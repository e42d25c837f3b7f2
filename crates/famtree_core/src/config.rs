//! Engine configuration.
//!
//! # Responsibility
//! - Describe page layout and logging settings for one run.
//! - Load settings from JSON with defaults for every omitted field.
//!
//! # Invariants
//! - A validated layout fits at least one line on a page.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// A4 height (842pt) minus 36pt top and bottom margins.
pub const DEFAULT_USABLE_HEIGHT: f32 = 770.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 36.0;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidLayout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidLayout(message) => write!(f, "invalid page layout: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidLayout(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Fixed-height page layout used by the document writer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageLayout {
    pub usable_height: f32,
    pub line_height: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            usable_height: DEFAULT_USABLE_HEIGHT,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("usable_height", self.usable_height),
            ("line_height", self.line_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidLayout(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.line_height > self.usable_height {
            return Err(ConfigError::InvalidLayout(format!(
                "line_height {} exceeds usable_height {}",
                self.line_height, self.usable_height
            )));
        }
        Ok(())
    }

    pub fn lines_per_page(&self) -> usize {
        (self.usable_height / self.line_height).floor() as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub layout: PageLayout,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when absent.
    pub log_dir: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            layout: PageLayout::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TemplateConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()
    }
}
