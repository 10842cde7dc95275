//! Abstract Syntax Tree types for the schema language

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete schema source
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub structs: Vec<Spanned<StructDecl>>,
}

/// Top-level `struct Name { ... }` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Spanned<Identifier>,
    pub fields: Vec<Spanned<FieldDecl>>,
}

/// `name: type [attributes]`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Spanned<Identifier>,
    pub ty: Spanned<TypeExpr>,
    pub attributes: Vec<Spanned<Attribute>>,
}

/// A field type as written in source
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Builtin scalar or reference to a top-level struct
    Named(Identifier),
    /// `list<T>`
    List(Box<Spanned<TypeExpr>>),
    /// `map<K, V>`
    Map(Box<Spanned<TypeExpr>>, Box<Spanned<TypeExpr>>),
    /// Inline `struct { ... }`
    Struct(Vec<Spanned<FieldDecl>>),
}

impl TypeExpr {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            TypeExpr::Named(id) => id.to_string(),
            TypeExpr::List(elem) => format!("list<{}>", elem.node.describe()),
            TypeExpr::Map(key, value) => {
                format!("map<{}, {}>", key.node.describe(), value.node.describe())
            }
            TypeExpr::Struct(_) => "struct".to_string(),
        }
    }
}

/// `key: value` inside a field's attribute block
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: Spanned<Identifier>,
    pub value: Spanned<String>,
}
