//! Typed field values exchanged between application objects and codecs.
//!
//! Property accessors hand values to the codec (and receive them back) as
//! [`FieldState`]: absent, a single value, or an array of values. This keeps
//! one accessor signature across all cardinalities while still letting the
//! codec tell "no value" apart from "an empty array of values".

use std::any::Any;
use std::fmt;

use crate::error::{Result, VellumError};

/// One typed value of a document field.
///
/// Nested typed documents are carried type-erased so that codecs for
/// different document types compose without generic plumbing; the codec
/// for the referenced type restores them via downcast.
pub enum FieldValue {
    /// A UTF-8 string value.
    String(String),
    /// A signed 64-bit integer value.
    Long(i64),
    /// A 64-bit floating point value.
    Double(f64),
    /// A boolean value.
    Boolean(bool),
    /// A raw byte array value.
    Bytes(Vec<u8>),
    /// A nested typed document, erased to `Any`.
    Document(Box<dyn Any + Send>),
}

impl FieldValue {
    /// Wrap a typed nested document.
    pub fn document<T: Send + 'static>(value: T) -> Self {
        FieldValue::Document(Box::new(value))
    }

    /// Name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Long(_) => "long",
            FieldValue::Double(_) => "double",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Document(_) => "document",
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(v) => f.debug_tuple("String").field(v).finish(),
            FieldValue::Long(v) => f.debug_tuple("Long").field(v).finish(),
            FieldValue::Double(v) => f.debug_tuple("Double").field(v).finish(),
            FieldValue::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            FieldValue::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            FieldValue::Document(_) => f.write_str("Document(..)"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Long(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

/// Conversion out of a [`FieldValue`] into a concrete scalar type.
pub trait FromFieldValue: Sized {
    /// Convert the value, failing on a kind mismatch.
    fn from_field_value(value: FieldValue) -> Result<Self>;
}

macro_rules! impl_from_field_value {
    ($type:ty, $variant:ident, $expected:literal) => {
        impl FromFieldValue for $type {
            fn from_field_value(value: FieldValue) -> Result<Self> {
                match value {
                    FieldValue::$variant(v) => Ok(v),
                    other => Err(VellumError::field(format!(
                        "expected a {} value, found {}",
                        $expected,
                        other.kind_name()
                    ))),
                }
            }
        }
    };
}

impl_from_field_value!(String, String, "string");
impl_from_field_value!(i64, Long, "long");
impl_from_field_value!(f64, Double, "double");
impl_from_field_value!(bool, Boolean, "boolean");
impl_from_field_value!(Vec<u8>, Bytes, "bytes");

/// The state of one field of a typed object.
///
/// `Absent` means the field carries no value at all, which a written
/// document expresses by omitting the property. `Many(vec![])` is different:
/// the property is present with zero values.
#[derive(Debug)]
pub enum FieldState {
    /// The field has no value; the property is omitted on encode.
    Absent,
    /// The field has exactly one value.
    Single(FieldValue),
    /// The field has an array of values, possibly empty.
    Many(Vec<FieldValue>),
}

impl FieldState {
    /// Build the state of an optional scalar field.
    pub fn optional<V: Into<FieldValue>>(value: Option<V>) -> Self {
        match value {
            Some(v) => FieldState::Single(v.into()),
            None => FieldState::Absent,
        }
    }

    /// Build the state of a single-valued scalar field.
    pub fn single<V: Into<FieldValue>>(value: V) -> Self {
        FieldState::Single(value.into())
    }

    /// Build the state of a repeated scalar field.
    pub fn repeated<V: Into<FieldValue>>(values: Vec<V>) -> Self {
        FieldState::Many(values.into_iter().map(Into::into).collect())
    }

    /// Build the state of an optional nested document field.
    pub fn optional_document<T: Send + 'static>(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldState::Single(FieldValue::document(v)),
            None => FieldState::Absent,
        }
    }

    /// Build the state of a single-valued nested document field.
    pub fn single_document<T: Send + 'static>(value: T) -> Self {
        FieldState::Single(FieldValue::document(value))
    }

    /// Build the state of a repeated nested document field.
    pub fn repeated_documents<T: Send + 'static>(values: Vec<T>) -> Self {
        FieldState::Many(values.into_iter().map(FieldValue::document).collect())
    }

    /// Check whether the field carries no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldState::Absent)
    }

    /// Flatten the state into a list of values.
    pub fn values(self) -> Vec<FieldValue> {
        match self {
            FieldState::Absent => Vec::new(),
            FieldState::Single(value) => vec![value],
            FieldState::Many(values) => values,
        }
    }

    /// Consume the state as an optional scalar.
    ///
    /// An array state yields its first value, matching how single-valued
    /// fields read stored arrays.
    pub fn into_optional<V: FromFieldValue>(self) -> Result<Option<V>> {
        match self {
            FieldState::Absent => Ok(None),
            FieldState::Single(value) => V::from_field_value(value).map(Some),
            FieldState::Many(values) => match values.into_iter().next() {
                Some(value) => V::from_field_value(value).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Consume the state as a list of scalars.
    pub fn into_repeated<V: FromFieldValue>(self) -> Result<Vec<V>> {
        self.values()
            .into_iter()
            .map(V::from_field_value)
            .collect()
    }

    /// Consume the state as an optional typed nested document.
    pub fn into_optional_document<U: 'static>(self) -> Result<Option<U>> {
        Ok(self.into_repeated_documents()?.into_iter().next())
    }

    /// Consume the state as a list of typed nested documents.
    pub fn into_repeated_documents<U: 'static>(self) -> Result<Vec<U>> {
        self.values()
            .into_iter()
            .map(|value| match value {
                FieldValue::Document(boxed) => boxed.downcast::<U>().map(|b| *b).map_err(|_| {
                    VellumError::field(format!(
                        "embedded document is not a {}",
                        std::any::type_name::<U>()
                    ))
                }),
                other => Err(VellumError::field(format!(
                    "expected a document value, found {}",
                    other.kind_name()
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_round_trip() {
        let state = FieldState::optional(Some("widget"));
        assert!(!state.is_absent());
        assert_eq!(state.into_optional::<String>().unwrap().as_deref(), Some("widget"));

        let state = FieldState::optional::<String>(None);
        assert!(state.is_absent());
        assert_eq!(state.into_optional::<String>().unwrap(), None);
    }

    #[test]
    fn test_repeated_round_trip() {
        let state = FieldState::repeated(vec![1i64, 2, 3]);
        assert_eq!(state.into_repeated::<i64>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_repeated_empty_is_present() {
        let state = FieldState::repeated::<i64>(vec![]);
        assert!(!state.is_absent());
        assert!(state.values().is_empty());
    }

    #[test]
    fn test_kind_mismatch_fails() {
        let state = FieldState::single(25i64);
        let result = state.into_optional::<String>();
        assert!(matches!(result, Err(VellumError::Field(_))));
    }

    #[test]
    fn test_many_yields_first_for_optional() {
        let state = FieldState::repeated(vec![10i64, 20]);
        assert_eq!(state.into_optional::<i64>().unwrap(), Some(10));
    }

    #[test]
    fn test_document_downcast() {
        #[derive(Debug, PartialEq)]
        struct Inner {
            label: String,
        }

        let state = FieldState::single_document(Inner {
            label: "a".to_string(),
        });
        let restored = state.into_optional_document::<Inner>().unwrap();
        assert_eq!(
            restored,
            Some(Inner {
                label: "a".to_string()
            })
        );
    }

    #[test]
    fn test_document_downcast_wrong_type_fails() {
        struct Inner;
        struct Other;

        let state = FieldState::single_document(Inner);
        let result = state.into_optional_document::<Other>();
        assert!(matches!(result, Err(VellumError::Field(_))));
    }

    #[test]
    fn test_scalar_into_document_fails() {
        struct Inner;

        let state = FieldState::single(7i64);
        let result = state.into_repeated_documents::<Inner>();
        assert!(matches!(result, Err(VellumError::Field(_))));
    }
}
