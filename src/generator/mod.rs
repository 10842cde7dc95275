//! YAML template generator
//!
//! This module takes a FieldDescriptor tree and produces a commented YAML
//! template with aligned help text.

pub mod config;
pub mod yaml;

pub use config::{CommentAlignment, ConfigError, GeneratorConfig};
pub use yaml::{generate, TemplateGenerator};
