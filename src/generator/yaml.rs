//! YAML template emission from field descriptors
//!
//! Lines are collected first, each tagged with the sibling block it belongs
//! to, and rendered once every block's width is known.

use log::{debug, trace};

use crate::schema::{ElementKind, FieldDescriptor, FieldKey, FieldKind, ScalarType};

use super::config::{CommentAlignment, GeneratorConfig};

/// Placeholder element for scalar sequences without a default
const SEQUENCE_PLACEHOLDER: &str = "example";

/// Static example entry emitted under every mapping field
const MAP_EXAMPLE: &str = "key: value";
const MAP_EXAMPLE_COMMENT: &str = "Map example";

/// One output line before alignment
struct Line {
    depth: usize,
    body: String,
    comment: Option<String>,
    /// Sibling block for comment alignment; `None` for sequence rows
    block: Option<usize>,
}

/// Build template lines incrementally
struct TemplateBuilder {
    indent_width: usize,
    lines: Vec<Line>,
    blocks: usize,
}

impl TemplateBuilder {
    fn new(indent_width: usize) -> Self {
        Self {
            indent_width,
            lines: vec![],
            blocks: 0,
        }
    }

    fn open_block(&mut self) -> usize {
        let id = self.blocks;
        self.blocks += 1;
        id
    }

    fn push(&mut self, depth: usize, body: String, comment: Option<&str>, block: Option<usize>) {
        self.lines.push(Line {
            depth,
            body,
            comment: comment.map(single_line),
            block,
        });
    }

    fn width(&self, line: &Line) -> usize {
        self.indent_width * line.depth + line.body.chars().count()
    }

    /// Emit the fields of one struct as a sibling block at `depth`
    fn add_fields(&mut self, fields: &[FieldDescriptor], depth: usize) {
        let block = self.open_block();

        for field in fields {
            let key = match field.key() {
                FieldKey::Named(key) => key,
                FieldKey::Ignored => {
                    trace!("skipping ignored field '{}'", field.ident);
                    continue;
                }
            };
            let help = field.help_text();

            match field.kind {
                FieldKind::Scalar(ty) => {
                    let value = scalar_value(ty, field.default_value());
                    self.push(depth, format!("{}: {}", key, value), help, Some(block));
                }
                FieldKind::Sequence(ElementKind::Scalar(_)) => {
                    self.push(depth, format!("{}:", key), help, Some(block));
                    for element in sequence_elements(field.default_value()) {
                        self.push(depth + 1, format!("- {}", element), None, None);
                    }
                }
                FieldKind::Sequence(ElementKind::Struct) => {
                    self.push(depth, format!("{}:", key), help, Some(block));
                    // One representative element
                    self.push(depth + 1, "-".to_string(), None, None);
                    self.add_fields(&field.children, depth + 2);
                }
                FieldKind::Struct => {
                    self.push(depth, format!("{}:", key), None, Some(block));
                    self.add_fields(&field.children, depth + 1);
                }
                FieldKind::Mapping => {
                    self.push(depth, format!("{}:", key), help, Some(block));
                    let example = self.open_block();
                    self.push(
                        depth + 1,
                        MAP_EXAMPLE.to_string(),
                        Some(MAP_EXAMPLE_COMMENT),
                        Some(example),
                    );
                }
                FieldKind::Ignored => {}
            }
        }
    }

    /// Comment column (width the line body is padded to) for each block
    fn columns(&self, alignment: CommentAlignment) -> Vec<usize> {
        match alignment {
            CommentAlignment::Block => {
                let mut columns = vec![0; self.blocks];
                for line in &self.lines {
                    if let Some(block) = line.block {
                        columns[block] = columns[block].max(self.width(line));
                    }
                }
                columns
            }
            CommentAlignment::Document => {
                let column = self.lines.iter().map(|l| self.width(l)).max().unwrap_or(0);
                vec![column; self.blocks]
            }
        }
    }

    /// Build the final template string
    fn build(self, alignment: CommentAlignment) -> String {
        let columns = self.columns(alignment);
        let mut out = String::new();

        for line in &self.lines {
            out.push_str(&" ".repeat(self.indent_width * line.depth));
            out.push_str(&line.body);

            if let Some(comment) = &line.comment {
                let width = self.width(line);
                let column = line.block.map_or(width, |b| columns[b]);
                out.push_str(&" ".repeat(column.saturating_sub(width)));
                out.push_str(" # ");
                out.push_str(comment);
            }

            out.push('\n');
        }

        out
    }
}

/// Render a scalar default, or `null` when there is none
///
/// Unquoted values are collapsed onto one line.
fn scalar_value(ty: ScalarType, default: Option<&str>) -> String {
    match default {
        None => "null".to_string(),
        Some(value) if ty.is_textual() => quote(value),
        Some(value) => match single_line(value) {
            line if line.is_empty() => "null".to_string(),
            line => line,
        },
    }
}

/// Double-quote a string, escaping what YAML double-quoted scalars require
fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

/// Elements of a scalar sequence: the comma-separated default, or a placeholder
fn sequence_elements(default: Option<&str>) -> Vec<String> {
    let elements: Vec<String> = default
        .map(|d| d.split(',').map(single_line).filter(|e| !e.is_empty()).collect())
        .unwrap_or_default();

    if elements.is_empty() {
        vec![SEQUENCE_PLACEHOLDER.to_string()]
    } else {
        elements
    }
}

/// Collapse multi-line help text onto one line
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generates commented YAML templates from field descriptor trees
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator {
    config: GeneratorConfig,
}

impl TemplateGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate the template for the fields of `root`
    ///
    /// Declared defaults are always rendered. `use_defaults` is accepted for
    /// API compatibility and currently has no effect.
    pub fn generate(&self, root: &FieldDescriptor, use_defaults: bool) -> String {
        if !use_defaults {
            debug!("use_defaults=false is reserved; declared defaults are still rendered");
        }

        let mut builder = TemplateBuilder::new(self.config.indent_width.max(1));
        builder.add_fields(&root.children, 0);
        debug!(
            "generated {} template lines in {} blocks",
            builder.lines.len(),
            builder.blocks
        );

        builder.build(self.config.alignment)
    }
}

/// Generate a template with the default configuration
pub fn generate(root: &FieldDescriptor, use_defaults: bool) -> String {
    TemplateGenerator::default().generate(root, use_defaults)
}
