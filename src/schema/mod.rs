//! Schema model for document types.
//!
//! A [`Schema`] describes one document type: an ordered set of
//! [`PropertyDescriptor`]s, each pairing a value kind with cardinality and
//! indexing configuration. Schemas are assembled through [`SchemaBuilder`],
//! which rejects duplicate property names and illegal flag combinations at
//! build time so that every constructed schema is valid.

pub mod dependency;
pub mod property;
#[allow(clippy::module_inception)]
pub mod schema;

pub use self::dependency::{SchemaProvider, dependency_document_types};
pub use self::property::{
    Cardinality, JoinableType, PropertyDescriptor, StringIndexing, StringTokenizer, ValueKind,
};
pub use self::schema::{Schema, SchemaBuilder};
