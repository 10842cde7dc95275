//! Schema model: field descriptors, naming tags, and resolution from source
//!
//! The template generator only consumes [`FieldDescriptor`] trees. They can be
//! built directly with the descriptor builders, or resolved from schema
//! source text parsed by [`crate::parser`].

mod descriptor;
mod error;
mod resolver;
mod tags;

pub use descriptor::{ElementKind, FieldDescriptor, FieldKind, ScalarType};
pub use error::SchemaError;
pub use resolver::{builtin_scalar, resolve};
pub use tags::{resolve_key, FieldKey, Tag, TagSource, IGNORE_SENTINEL, TAG_PRIORITY};
