//! Configuration for template generation

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a generator configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("indent_width must be at least 1")]
    InvalidIndent,
}

/// How the column of trailing `# comment`s is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentAlignment {
    /// One column per sibling block of struct fields
    #[default]
    Block,
    /// One column for the whole document, counting every emitted line
    Document,
}

/// Configuration options for template output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Spaces per nesting level
    pub indent_width: usize,

    /// Comment column strategy
    pub alignment: CommentAlignment,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            alignment: CommentAlignment::Block,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spaces per nesting level (at least 1)
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Set the comment alignment strategy
    pub fn with_alignment(mut self, alignment: CommentAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(content)?;
        if config.indent_width == 0 {
            return Err(ConfigError::InvalidIndent);
        }
        Ok(config)
    }
}
