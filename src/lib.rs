//! # Vellum
//!
//! A typed object / generic document mapping layer for search indexing in Rust.
//!
//! ## Features
//!
//! - Schema model with per-property cardinality and indexing configuration
//! - Bidirectional codecs between Rust types and generic documents
//! - Nested document references resolved by schema name
//! - Process-wide codec registry with conflict detection
//! - Cycle-safe dependency resolution over the schema graph

pub mod codec;
pub mod document;
pub mod error;
pub mod schema;

pub mod prelude {
    pub use crate::codec::{
        CodecBuilder, CodecConfig, CodecRegistry, DocumentCodec, FieldState, FieldValue,
        from_generic_document, register_document_class, to_generic_document,
    };
    pub use crate::document::{GenericDocument, GenericDocumentBuilder, PropertyValues};
    pub use crate::error::{Result, VellumError};
    pub use crate::schema::{
        Cardinality, JoinableType, PropertyDescriptor, Schema, SchemaBuilder, StringIndexing,
        StringTokenizer, ValueKind,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
