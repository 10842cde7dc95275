//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse schema source code into an AST
pub fn parse(input: &str) -> Result<Schema, Vec<crate::ParseError>> {
    let len = input.len();

    let tokens = crate::parser::lexer::lex(input)?;
    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    schema_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn schema_parser<'a, I>() -> impl Parser<'a, I, Schema, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    // Type keywords are plain names where only a field name can appear
    let field_name = select! {
        Token::Ident(s) => Identifier::new(s),
        Token::Struct => Identifier::new("struct"),
        Token::List => Identifier::new("list"),
        Token::Map => Identifier::new("map"),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    // Attribute values: quoted strings, bare numbers, or bare words like `true`
    let attribute_value = select! {
        Token::String(s) => s,
        Token::Number(n) => n,
        Token::Ident(s) => s,
    }
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let attribute = identifier
        .clone()
        .then_ignore(just(Token::Colon))
        .then(attribute_value)
        .map_with(|(key, value), e| Spanned::new(Attribute { key, value }, span_range(&e.span())));

    let attribute_block = attribute
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // Field lists nest through inline `struct { ... }` types
    let field_list = recursive(|fields| {
        let type_expr = recursive(|ty| {
            let inline_struct = just(Token::Struct)
                .ignore_then(
                    fields
                        .clone()
                        .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
                )
                .map(TypeExpr::Struct);

            let list = just(Token::List)
                .ignore_then(ty.clone().delimited_by(just(Token::Lt), just(Token::Gt)))
                .map(|elem| TypeExpr::List(Box::new(elem)));

            let map = just(Token::Map)
                .ignore_then(
                    ty.clone()
                        .then_ignore(just(Token::Comma))
                        .then(ty)
                        .delimited_by(just(Token::Lt), just(Token::Gt)),
                )
                .map(|(key, value)| TypeExpr::Map(Box::new(key), Box::new(value)));

            let named = identifier.clone().map(|id| TypeExpr::Named(id.node));

            choice((inline_struct, list, map, named))
                .map_with(|ty, e| Spanned::new(ty, span_range(&e.span())))
                .boxed()
        });

        field_name
            .clone()
            .then_ignore(just(Token::Colon))
            .then(type_expr)
            .then(attribute_block.clone().or_not())
            .map_with(|((name, ty), attributes), e| {
                Spanned::new(
                    FieldDecl {
                        name,
                        ty,
                        attributes: attributes.unwrap_or_default(),
                    },
                    span_range(&e.span()),
                )
            })
            .repeated()
            .collect::<Vec<_>>()
            .boxed()
    });

    let struct_decl = just(Token::Struct)
        .ignore_then(identifier)
        .then(field_list.delimited_by(just(Token::BraceOpen), just(Token::BraceClose)))
        .map_with(|(name, fields), e| {
            Spanned::new(StructDecl { name, fields }, span_range(&e.span()))
        });

    // A schema is a list of struct declarations
    struct_decl
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|structs| Schema { structs })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_struct(source: &str) -> StructDecl {
        let schema = parse(source).expect("Should parse");
        assert_eq!(schema.structs.len(), 1);
        schema.structs.into_iter().next().unwrap().node
    }

    #[test]
    fn test_parse_empty_struct() {
        let decl = single_struct("struct Config {}");
        assert_eq!(decl.name.node.as_str(), "Config");
        assert!(decl.fields.is_empty());
    }

    #[test]
    fn test_parse_scalar_field_with_attributes() {
        let decl = single_struct(
            r#"struct Config {
                host: string [mapstructure: "host", default: "localhost", help: "The hostname"]
            }"#,
        );
        assert_eq!(decl.fields.len(), 1);
        let field = &decl.fields[0].node;
        assert_eq!(field.name.node.as_str(), "host");
        assert_eq!(field.ty.node, TypeExpr::Named(Identifier::new("string")));
        let attrs: Vec<_> = field
            .attributes
            .iter()
            .map(|a| (a.node.key.node.as_str(), a.node.value.node.as_str()))
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("mapstructure", "host"),
                ("default", "localhost"),
                ("help", "The hostname")
            ]
        );
    }

    #[test]
    fn test_parse_bare_attribute_values() {
        let decl = single_struct("struct C { port: int [default: 8080,] enabled: bool [default: true] }");
        assert_eq!(decl.fields[0].node.attributes[0].node.value.node, "8080");
        assert_eq!(decl.fields[1].node.attributes[0].node.value.node, "true");
    }

    #[test]
    fn test_parse_list_and_map_types() {
        let decl = single_struct("struct C { options: list<string> settings: map<string, int> }");
        match &decl.fields[0].node.ty.node {
            TypeExpr::List(elem) => {
                assert_eq!(elem.node, TypeExpr::Named(Identifier::new("string")))
            }
            other => panic!("Expected list, got {:?}", other),
        }
        match &decl.fields[1].node.ty.node {
            TypeExpr::Map(key, value) => {
                assert_eq!(key.node, TypeExpr::Named(Identifier::new("string")));
                assert_eq!(value.node, TypeExpr::Named(Identifier::new("int")));
            }
            other => panic!("Expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_inline_structs() {
        let decl = single_struct(
            r#"struct C {
                meta: struct {
                    inner: struct { version: string }
                }
                items: list<struct { name: string }>
            }"#,
        );
        match &decl.fields[0].node.ty.node {
            TypeExpr::Struct(fields) => {
                assert_eq!(fields.len(), 1);
                assert!(matches!(fields[0].node.ty.node, TypeExpr::Struct(_)));
            }
            other => panic!("Expected struct, got {:?}", other),
        }
        match &decl.fields[1].node.ty.node {
            TypeExpr::List(elem) => assert!(matches!(elem.node, TypeExpr::Struct(_))),
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multiple_structs() {
        let schema = parse("struct A { b: B } struct B { x: int }").expect("Should parse");
        let names: Vec<_> = schema
            .structs
            .iter()
            .map(|s| s.node.name.node.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_empty_source() {
        let schema = parse("// nothing here").expect("Should parse");
        assert!(schema.structs.is_empty());
    }

    #[test]
    fn test_parse_error_missing_type() {
        let errors = parse("struct C { host: [default: \"x\"] }").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_parse_error_unclosed_struct() {
        let errors = parse("struct C { host: string").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_field_span_covers_declaration() {
        let source = "struct C { port: int }";
        let decl = single_struct(source);
        let span = decl.fields[0].span.clone();
        assert_eq!(span.start, 11);
        assert!(source[span].starts_with("port: int"));
    }

    #[test]
    fn test_keywords_as_field_names() {
        let decl = single_struct(
            "struct C { map: map<string, string> list: list<int> struct: struct { a: int } }",
        );
        let names: Vec<_> = decl
            .fields
            .iter()
            .map(|f| f.node.name.node.as_str())
            .collect();
        assert_eq!(names, vec!["map", "list", "struct"]);
        assert!(matches!(decl.fields[0].node.ty.node, TypeExpr::Map(_, _)));
        assert!(matches!(decl.fields[2].node.ty.node, TypeExpr::Struct(_)));
    }

    #[test]
    fn test_lex_errors_stop_parsing() {
        let errors =
            parse("struct C { host: string @ [default: \"x\"]; port: int [default: $80] }")
                .unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
