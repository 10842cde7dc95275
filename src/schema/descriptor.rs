//! Field descriptor tree consumed by the template generator

use super::tags::{resolve_key, FieldKey, Tag, TagSource};

/// Type of a scalar value, which decides how a default is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// Textual value, rendered double-quoted
    Text,
    Integer,
    Float,
    Bool,
}

impl ScalarType {
    /// Whether defaults of this type are quoted in the template
    pub fn is_textual(&self) -> bool {
        matches!(self, ScalarType::Text)
    }
}

/// Element shape of a sequence field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Scalar(ScalarType),
    /// Elements are structs described by the field's children
    Struct,
}

/// Structural category of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Sequence(ElementKind),
    Mapping,
    Struct,
    /// Never emitted and never counted for alignment
    Ignored,
}

/// One node of a schema tree
///
/// The emitted key is not stored: it is derived from `ident` and `tags`
/// through [`FieldDescriptor::key`]. Depth is derived during traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared field identifier
    pub ident: String,
    pub kind: FieldKind,
    /// Naming tags, in declaration order
    pub tags: Vec<Tag>,
    /// Raw default value, comma-separated for scalar sequences
    pub default: Option<String>,
    /// Trailing comment text
    pub help: Option<String>,
    /// Fields of a struct, or of the element struct of a sequence
    pub children: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    fn new(ident: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            ident: ident.into(),
            kind,
            tags: vec![],
            default: None,
            help: None,
            children: vec![],
        }
    }

    /// The top-level schema struct
    pub fn root(children: Vec<FieldDescriptor>) -> Self {
        Self::new("", FieldKind::Struct).with_children(children)
    }

    pub fn scalar(ident: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(ident, FieldKind::Scalar(ty))
    }

    /// Sequence of scalar elements
    pub fn sequence(ident: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(ident, FieldKind::Sequence(ElementKind::Scalar(ty)))
    }

    /// Sequence whose elements are structs with the given fields
    pub fn struct_sequence(ident: impl Into<String>, children: Vec<FieldDescriptor>) -> Self {
        Self::new(ident, FieldKind::Sequence(ElementKind::Struct)).with_children(children)
    }

    /// Nested struct
    pub fn structure(ident: impl Into<String>, children: Vec<FieldDescriptor>) -> Self {
        Self::new(ident, FieldKind::Struct).with_children(children)
    }

    pub fn mapping(ident: impl Into<String>) -> Self {
        Self::new(ident, FieldKind::Mapping)
    }

    pub fn ignored(ident: impl Into<String>) -> Self {
        Self::new(ident, FieldKind::Ignored)
    }

    /// Attach a naming tag
    pub fn with_tag(mut self, source: TagSource, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(source, value));
        self
    }

    /// Set the raw default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn with_children(mut self, children: Vec<FieldDescriptor>) -> Self {
        self.children = children;
        self
    }

    /// Resolve the key this field is emitted under
    pub fn key(&self) -> FieldKey {
        if self.kind == FieldKind::Ignored {
            return FieldKey::Ignored;
        }
        resolve_key(&self.ident, &self.tags)
    }

    /// Default value, with empty strings treated as absent
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }

    /// Help text, with empty strings treated as absent
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref().filter(|h| !h.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_metadata() {
        let field = FieldDescriptor::scalar("Host", ScalarType::Text)
            .with_tag(TagSource::Mapstructure, "host")
            .with_default("localhost")
            .with_help("The hostname");

        assert_eq!(field.kind, FieldKind::Scalar(ScalarType::Text));
        assert_eq!(field.key(), FieldKey::Named("host".to_string()));
        assert_eq!(field.default_value(), Some("localhost"));
        assert_eq!(field.help_text(), Some("The hostname"));
    }

    #[test]
    fn test_ignored_kind_has_no_key() {
        let field = FieldDescriptor::ignored("Secret").with_tag(TagSource::Yaml, "secret");
        assert_eq!(field.key(), FieldKey::Ignored);
    }

    #[test]
    fn test_empty_default_and_help_are_absent() {
        let field = FieldDescriptor::scalar("name", ScalarType::Text)
            .with_default("")
            .with_help("  ");
        assert_eq!(field.default_value(), None);
        assert_eq!(field.help_text(), None);
    }

    #[test]
    fn test_struct_sequence_keeps_child_order() {
        let field = FieldDescriptor::struct_sequence(
            "items",
            vec![
                FieldDescriptor::scalar("name", ScalarType::Text),
                FieldDescriptor::scalar("value", ScalarType::Integer),
            ],
        );
        assert_eq!(field.kind, FieldKind::Sequence(ElementKind::Struct));
        let idents: Vec<_> = field.children.iter().map(|c| c.ident.as_str()).collect();
        assert_eq!(idents, vec!["name", "value"]);
    }

    #[test]
    fn test_textual_scalar() {
        assert!(ScalarType::Text.is_textual());
        assert!(!ScalarType::Integer.is_textual());
        assert!(!ScalarType::Float.is_textual());
        assert!(!ScalarType::Bool.is_textual());
    }
}
