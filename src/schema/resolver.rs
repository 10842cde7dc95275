//! Resolve a parsed schema into a field descriptor tree
//!
//! Top-level structs are collected into a registry so fields can refer to
//! them by name. Named references are expanded in place, which means a
//! struct used twice is emitted twice, and a struct that reaches itself
//! through its own fields is rejected.

use std::collections::HashMap;

use log::{debug, trace};

use crate::parser::ast::{FieldDecl, Identifier, Schema, Span, Spanned, StructDecl, TypeExpr};

use super::descriptor::{FieldDescriptor, ScalarType};
use super::error::SchemaError;
use super::tags::{Tag, TagSource};

/// Map a builtin type name to its scalar type
pub fn builtin_scalar(name: &str) -> Option<ScalarType> {
    match name {
        "string" | "str" => Some(ScalarType::Text),
        "int" | "integer" => Some(ScalarType::Integer),
        "float" => Some(ScalarType::Float),
        "bool" | "boolean" => Some(ScalarType::Bool),
        _ => None,
    }
}

/// Resolve `schema` into the descriptor tree rooted at `root`
///
/// When `root` is `None` the first declared struct is used.
pub fn resolve(schema: &Schema, root: Option<&str>) -> Result<FieldDescriptor, SchemaError> {
    let registry = StructRegistry::build(schema)?;

    let root_decl = match root {
        Some(name) => registry
            .get(name)
            .ok_or_else(|| SchemaError::RootNotFound {
                name: name.to_string(),
                available: registry.names().join(", "),
            })?,
        None => schema
            .structs
            .first()
            .map(|s| &s.node)
            .ok_or(SchemaError::Empty)?,
    };

    let mut resolver = Resolver {
        registry: &registry,
        stack: Vec::new(),
    };
    let children = resolver.resolve_struct(root_decl)?;
    debug!(
        "resolved root struct '{}' with {} top-level fields",
        root_decl.name.node,
        children.len()
    );

    Ok(FieldDescriptor::root(children))
}

/// Top-level struct declarations by name, in declaration order
struct StructRegistry<'s> {
    structs: HashMap<&'s str, &'s StructDecl>,
    order: Vec<&'s str>,
}

impl<'s> StructRegistry<'s> {
    fn build(schema: &'s Schema) -> Result<Self, SchemaError> {
        let mut structs = HashMap::new();
        let mut order = Vec::new();
        for decl in &schema.structs {
            let name = decl.node.name.node.as_str();
            if structs.insert(name, &decl.node).is_some() {
                return Err(SchemaError::DuplicateStruct {
                    name: name.to_string(),
                    span: decl.node.name.span.clone(),
                });
            }
            order.push(name);
        }
        Ok(Self { structs, order })
    }

    fn get(&self, name: &str) -> Option<&'s StructDecl> {
        self.structs.get(name).copied()
    }

    fn contains(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    fn names(&self) -> Vec<&'s str> {
        self.order.clone()
    }

    /// Declared struct names within a small edit distance of `target`
    fn similar(&self, target: &str) -> Vec<String> {
        let mut candidates: Vec<(usize, &str)> = self
            .order
            .iter()
            .map(|name| (levenshtein_distance(name, target), *name))
            .filter(|(dist, _)| *dist > 0 && *dist <= 2)
            .collect();
        candidates.sort();
        candidates
            .into_iter()
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

struct Resolver<'r, 's> {
    registry: &'r StructRegistry<'s>,
    /// Named structs currently being expanded, outermost first
    stack: Vec<String>,
}

impl<'r, 's> Resolver<'r, 's> {
    fn resolve_struct(&mut self, decl: &StructDecl) -> Result<Vec<FieldDescriptor>, SchemaError> {
        let name = decl.name.node.as_str();
        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut chain = self.stack[pos..].to_vec();
            chain.push(name.to_string());
            return Err(SchemaError::CircularReference { chain });
        }

        trace!("expanding struct '{}'", name);
        self.stack.push(name.to_string());
        let fields = self.resolve_fields(&decl.fields)?;
        self.stack.pop();
        Ok(fields)
    }

    fn resolve_fields(
        &mut self,
        fields: &[Spanned<FieldDecl>],
    ) -> Result<Vec<FieldDescriptor>, SchemaError> {
        fields.iter().map(|f| self.resolve_field(&f.node)).collect()
    }

    fn resolve_named(
        &mut self,
        name: &Identifier,
        span: &Span,
    ) -> Result<Vec<FieldDescriptor>, SchemaError> {
        let decl = self.registry.get(name.as_str()).ok_or_else(|| {
            SchemaError::undefined(name.as_str(), span.clone(), self.registry.similar(name.as_str()))
        })?;
        self.resolve_struct(decl)
    }

    fn resolve_field(&mut self, field: &FieldDecl) -> Result<FieldDescriptor, SchemaError> {
        let ident = field.name.node.as_str();

        let mut descriptor = match &field.ty.node {
            TypeExpr::Named(name) => match builtin_scalar(name.as_str()) {
                Some(ty) => FieldDescriptor::scalar(ident, ty),
                None => FieldDescriptor::structure(ident, self.resolve_named(name, &field.ty.span)?),
            },
            TypeExpr::Struct(fields) => {
                FieldDescriptor::structure(ident, self.resolve_fields(fields)?)
            }
            TypeExpr::List(elem) => match &elem.node {
                TypeExpr::Named(name) => match builtin_scalar(name.as_str()) {
                    Some(ty) => FieldDescriptor::sequence(ident, ty),
                    None => FieldDescriptor::struct_sequence(
                        ident,
                        self.resolve_named(name, &elem.span)?,
                    ),
                },
                TypeExpr::Struct(fields) => {
                    FieldDescriptor::struct_sequence(ident, self.resolve_fields(fields)?)
                }
                other => {
                    return Err(SchemaError::UnsupportedElement {
                        field: ident.to_string(),
                        ty: other.describe(),
                        span: elem.span.clone(),
                    })
                }
            },
            TypeExpr::Map(key, value) => {
                // Map contents are rendered as a fixed example; only check names exist
                self.check_defined(key)?;
                self.check_defined(value)?;
                FieldDescriptor::mapping(ident)
            }
        };

        apply_attributes(&mut descriptor, field)?;
        Ok(descriptor)
    }

    fn check_defined(&self, ty: &Spanned<TypeExpr>) -> Result<(), SchemaError> {
        match &ty.node {
            TypeExpr::Named(name)
                if builtin_scalar(name.as_str()).is_none() && !self.registry.contains(name.as_str()) =>
            {
                Err(SchemaError::undefined(
                    name.as_str(),
                    ty.span.clone(),
                    self.registry.similar(name.as_str()),
                ))
            }
            TypeExpr::List(elem) => self.check_defined(elem),
            TypeExpr::Map(key, value) => {
                self.check_defined(key)?;
                self.check_defined(value)
            }
            _ => Ok(()),
        }
    }
}

/// Copy `default`, `help` and naming tags from the field's attribute block
fn apply_attributes(descriptor: &mut FieldDescriptor, field: &FieldDecl) -> Result<(), SchemaError> {
    let mut seen: Vec<&str> = Vec::with_capacity(field.attributes.len());

    for attr in &field.attributes {
        let key = attr.node.key.node.as_str();
        if seen.contains(&key) {
            return Err(SchemaError::DuplicateAttribute {
                field: field.name.node.to_string(),
                key: key.to_string(),
                span: attr.span.clone(),
            });
        }
        seen.push(key);

        let value = attr.node.value.node.clone();
        match key {
            "default" => descriptor.default = Some(value),
            "help" => descriptor.help = Some(value),
            other => match TagSource::from_attribute(other) {
                Some(source) => descriptor.tags.push(Tag::new(source, value)),
                None => {
                    return Err(SchemaError::UnknownAttribute {
                        field: field.name.node.to_string(),
                        key: other.to_string(),
                        span: attr.node.key.span.clone(),
                    })
                }
            },
        }
    }

    Ok(())
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::schema::{ElementKind, FieldKey, FieldKind};

    fn resolve_source(source: &str) -> Result<FieldDescriptor, SchemaError> {
        let schema = parse(source).expect("Should parse");
        resolve(&schema, None)
    }

    #[test]
    fn test_builtin_scalars() {
        let root = resolve_source(
            "struct C { a: string b: str c: int d: integer e: float f: bool g: boolean }",
        )
        .unwrap();
        let kinds: Vec<_> = root.children.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Scalar(ScalarType::Text),
                FieldKind::Scalar(ScalarType::Text),
                FieldKind::Scalar(ScalarType::Integer),
                FieldKind::Scalar(ScalarType::Integer),
                FieldKind::Scalar(ScalarType::Float),
                FieldKind::Scalar(ScalarType::Bool),
                FieldKind::Scalar(ScalarType::Bool),
            ]
        );
    }

    #[test]
    fn test_attributes_become_metadata() {
        let root = resolve_source(
            r#"struct C { host: string [yaml: "h", mapstructure: "host", default: "localhost", help: "The hostname"] }"#,
        )
        .unwrap();
        let host = &root.children[0];
        assert_eq!(host.key(), FieldKey::Named("h".to_string()));
        assert_eq!(host.default.as_deref(), Some("localhost"));
        assert_eq!(host.help.as_deref(), Some("The hostname"));
        assert_eq!(host.tags.len(), 2);
    }

    #[test]
    fn test_named_struct_reference_is_expanded() {
        let root = resolve_source(
            "struct Config { meta: Meta items: list<Meta> } struct Meta { version: string }",
        )
        .unwrap();
        assert_eq!(root.children[0].kind, FieldKind::Struct);
        assert_eq!(root.children[0].children[0].ident, "version");
        assert_eq!(
            root.children[1].kind,
            FieldKind::Sequence(ElementKind::Struct)
        );
        assert_eq!(root.children[1].children.len(), 1);
    }

    #[test]
    fn test_explicit_root() {
        let schema = parse("struct A { a: int } struct B { b: int }").unwrap();
        let root = resolve(&schema, Some("B")).unwrap();
        assert_eq!(root.children[0].ident, "b");
    }

    #[test]
    fn test_missing_root() {
        let schema = parse("struct A { a: int }").unwrap();
        let err = resolve(&schema, Some("Config")).unwrap_err();
        assert!(matches!(err, SchemaError::RootNotFound { ref available, .. } if available == "A"));
    }

    #[test]
    fn test_empty_schema() {
        assert!(matches!(resolve_source(""), Err(SchemaError::Empty)));
    }

    #[test]
    fn test_undefined_type_with_suggestion() {
        let err = resolve_source("struct C { item: Itme } struct Item { x: int }").unwrap_err();
        match err {
            SchemaError::UndefinedType {
                name, suggestions, ..
            } => {
                assert_eq!(name, "Itme");
                assert_eq!(suggestions, vec!["Item".to_string()]);
            }
            other => panic!("Expected undefined type, got {:?}", other),
        }
    }

    #[test]
    fn test_undefined_map_value_type() {
        let err = resolve_source("struct C { m: map<string, Missing> }").unwrap_err();
        assert!(matches!(err, SchemaError::UndefinedType { ref name, .. } if name == "Missing"));
    }

    #[test]
    fn test_nested_list_is_unsupported() {
        let err = resolve_source("struct C { grid: list<list<int>> }").unwrap_err();
        match err {
            SchemaError::UnsupportedElement { field, ty, .. } => {
                assert_eq!(field, "grid");
                assert_eq!(ty, "list<int>");
            }
            other => panic!("Expected unsupported element, got {:?}", other),
        }
    }

    #[test]
    fn test_circular_reference() {
        let err = resolve_source("struct A { b: B } struct B { a: list<A> }").unwrap_err();
        match err {
            SchemaError::CircularReference { chain } => {
                assert_eq!(chain, vec!["A", "B", "A"]);
            }
            other => panic!("Expected circular reference, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_reused_by_siblings_is_not_circular() {
        let root = resolve_source("struct C { a: P b: P } struct P { x: int }").unwrap();
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_duplicate_struct() {
        let err = resolve_source("struct A { } struct A { }").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateStruct { ref name, .. } if name == "A"));
    }

    #[test]
    fn test_unknown_attribute() {
        let err = resolve_source(r#"struct C { a: int [json: "a"] }"#).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownAttribute { ref key, .. } if key == "json"));
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = resolve_source(r#"struct C { a: int [default: 1, default: 2] }"#).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateAttribute { ref key, .. } if key == "default"));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("Item", "Itme"), 2);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }
}
