//! yaml-template - Commented YAML configuration templates from typed schemas
//!
//! This library provides a schema parser, a resolver that builds field
//! descriptor trees, and a generator that renders them as YAML templates with
//! defaults and aligned help comments.
//!
//! # Example
//!
//! ```rust
//! use yaml_template::render;
//!
//! let yaml = render(r#"
//!     struct Config {
//!         host: string [default: "localhost", help: "The hostname"]
//!     }
//! "#).unwrap();
//! assert_eq!(yaml, "host: \"localhost\" # The hostname\n");
//! ```
//!
//! Descriptor trees can also be built directly and passed to [`generate`]:
//!
//! ```rust
//! use yaml_template::{generate, FieldDescriptor, ScalarType, TagSource};
//!
//! let root = FieldDescriptor::root(vec![
//!     FieldDescriptor::scalar("Port", ScalarType::Integer)
//!         .with_tag(TagSource::Mapstructure, "port")
//!         .with_default("8080"),
//! ]);
//! assert_eq!(generate(&root, true), "port: 8080\n");
//! ```

pub mod error;
pub mod generator;
pub mod parser;
pub mod schema;

pub use error::ParseError;
pub use generator::{generate, CommentAlignment, ConfigError, GeneratorConfig, TemplateGenerator};
pub use parser::{parse, Schema};
pub use schema::{
    resolve, ElementKind, FieldDescriptor, FieldKey, FieldKind, ScalarType, SchemaError, Tag,
    TagSource,
};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while resolving the schema
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl TemplateError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            TemplateError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect(),
            TemplateError::Schema(e) => e.format(source, filename),
        }
    }
}

impl From<Vec<ParseError>> for TemplateError {
    fn from(errors: Vec<ParseError>) -> Self {
        TemplateError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Template output configuration
    pub generator: GeneratorConfig,
    /// Struct to render; the first declared struct when unset
    pub root: Option<String>,
    /// Reserved; declared defaults are always rendered
    pub use_defaults: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            root: None,
            use_defaults: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generator configuration
    pub fn with_generator(mut self, config: GeneratorConfig) -> Self {
        self.generator = config;
        self
    }

    /// Select the root struct by name
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the reserved use-defaults flag
    pub fn with_use_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }
}

/// Render schema source to a YAML template with default configuration
pub fn render(source: &str) -> Result<String, TemplateError> {
    render_with_config(source, RenderConfig::default())
}

/// Render schema source to a YAML template with custom configuration
///
/// # Example
///
/// ```rust
/// use yaml_template::{render_with_config, CommentAlignment, GeneratorConfig, RenderConfig};
///
/// let config = RenderConfig::new()
///     .with_root("Server")
///     .with_generator(GeneratorConfig::new().with_alignment(CommentAlignment::Document));
///
/// let yaml = render_with_config(
///     "struct Client { url: string } struct Server { port: int [default: 80] }",
///     config,
/// )
/// .unwrap();
/// assert_eq!(yaml, "port: 80\n");
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, TemplateError> {
    // Parse the source
    let schema = parse(source)?;

    // Build the descriptor tree
    let root = resolve(&schema, config.root.as_deref())?;

    let generator = TemplateGenerator::new(config.generator);
    Ok(generator.generate(&root, config.use_defaults))
}
