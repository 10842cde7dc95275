//! Error types for schema resolution

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::Span;

/// Errors that can occur while turning a parsed schema into descriptors
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The source declares no structs
    #[error("schema declares no structs")]
    Empty,

    /// Two top-level structs share a name
    #[error("duplicate struct definition '{name}'")]
    DuplicateStruct { name: String, span: Span },

    /// Requested root struct is not declared
    #[error("root struct '{name}' not found (declared: {available})")]
    RootNotFound { name: String, available: String },

    /// Type name is neither a builtin nor a declared struct
    #[error("undefined type '{name}'")]
    UndefinedType {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    /// Collection element type the template cannot express
    #[error("unsupported element type '{ty}' in field '{field}'")]
    UnsupportedElement {
        field: String,
        ty: String,
        span: Span,
    },

    /// Attribute key other than yaml, mapstructure, default or help
    #[error("unknown attribute '{key}' on field '{field}'")]
    UnknownAttribute {
        field: String,
        key: String,
        span: Span,
    },

    /// Same attribute given twice on one field
    #[error("attribute '{key}' given more than once on field '{field}'")]
    DuplicateAttribute {
        field: String,
        key: String,
        span: Span,
    },

    /// Struct references that loop back on themselves
    #[error("circular struct reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },
}

impl SchemaError {
    /// Create an undefined type error with suggestions
    pub fn undefined(name: impl Into<String>, span: Span, suggestions: Vec<String>) -> Self {
        Self::UndefinedType {
            name: name.into(),
            span,
            suggestions,
        }
    }

    /// Source range the error points at, when it has one
    pub fn span(&self) -> Option<&Span> {
        match self {
            SchemaError::DuplicateStruct { span, .. }
            | SchemaError::UndefinedType { span, .. }
            | SchemaError::UnsupportedElement { span, .. }
            | SchemaError::UnknownAttribute { span, .. }
            | SchemaError::DuplicateAttribute { span, .. } => Some(span),
            SchemaError::Empty
            | SchemaError::RootNotFound { .. }
            | SchemaError::CircularReference { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Errors without a source location are formatted as a single line.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}\n", self);
        };

        let mut report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(self.to_string())
                    .with_color(Color::Red),
            );
        if let SchemaError::UndefinedType { suggestions, .. } = self {
            if !suggestions.is_empty() {
                report = report.with_help(format!("did you mean {}?", suggestions.join(", ")));
            }
        }

        let mut buf = Vec::new();
        // Writing into a Vec<u8> cannot fail
        let _ = report
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
