//! Document codecs: typed objects in and out of generic documents.
//!
//! The pieces fit together like this: a [`DocumentCodec`] owns the schema
//! and accessor bindings for one Rust type, [`FieldState`] is the value
//! shape those accessors speak, and the [`CodecRegistry`] wires codecs
//! together by schema name so nested document references resolve at
//! conversion time.

#[allow(clippy::module_inception)]
pub mod codec;
pub mod field;
pub mod registry;

pub use self::codec::{CodecBuilder, CodecConfig, DocumentCodec};
pub use self::field::{FieldState, FieldValue, FromFieldValue};
pub use self::registry::{
    CodecRegistry, from_generic_document, global, register_document_class, to_generic_document,
};
