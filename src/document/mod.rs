//! Generic document representation.
//!
//! The [`GenericDocument`] is the schema-typed but otherwise untyped form a
//! document takes on its way in and out of the index: identity fields, system
//! metadata, and a map from property name to a homogeneous value array.

#[allow(clippy::module_inception)]
pub mod document;
pub mod value;

pub use self::document::{GenericDocument, GenericDocumentBuilder};
pub use self::value::PropertyValues;
