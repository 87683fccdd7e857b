//! Property value arrays stored inside a generic document.

use serde::{Deserialize, Serialize};

use crate::document::document::GenericDocument;
use crate::schema::ValueKind;

/// The values of one document property.
///
/// Every property is stored as a homogeneous array, even when the schema
/// declares it single-valued: a single value is an array of length one.
/// This keeps the storage representation uniform across cardinalities and
/// lets readers treat all properties the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValues {
    /// UTF-8 string values.
    String(Vec<String>),
    /// Signed 64-bit integer values.
    Long(Vec<i64>),
    /// 64-bit floating point values.
    Double(Vec<f64>),
    /// Boolean values.
    Boolean(Vec<bool>),
    /// Raw byte array values.
    Bytes(Vec<Vec<u8>>),
    /// Nested document values.
    Document(Vec<GenericDocument>),
}

impl PropertyValues {
    /// Name of the stored value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValues::String(_) => "string",
            PropertyValues::Long(_) => "long",
            PropertyValues::Double(_) => "double",
            PropertyValues::Boolean(_) => "boolean",
            PropertyValues::Bytes(_) => "bytes",
            PropertyValues::Document(_) => "document",
        }
    }

    /// Check whether the stored values match a schema value kind.
    ///
    /// Document values match any document kind regardless of the declared
    /// schema type; embedded schema names are checked during conversion.
    pub fn matches_kind(&self, kind: &ValueKind) -> bool {
        matches!(
            (self, kind),
            (PropertyValues::String(_), ValueKind::String)
                | (PropertyValues::Long(_), ValueKind::Long)
                | (PropertyValues::Double(_), ValueKind::Double)
                | (PropertyValues::Boolean(_), ValueKind::Boolean)
                | (PropertyValues::Bytes(_), ValueKind::Bytes)
                | (PropertyValues::Document(_), ValueKind::Document { .. })
        )
    }

    /// Get the number of stored values.
    pub fn len(&self) -> usize {
        match self {
            PropertyValues::String(values) => values.len(),
            PropertyValues::Long(values) => values.len(),
            PropertyValues::Double(values) => values.len(),
            PropertyValues::Boolean(values) => values.len(),
            PropertyValues::Bytes(values) => values.len(),
            PropertyValues::Document(values) => values.len(),
        }
    }

    /// Check if the array holds no values.
    ///
    /// An empty array is still a present property, distinct from the
    /// property being absent from the document.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the values as strings.
    pub fn as_string(&self) -> Option<&[String]> {
        match self {
            PropertyValues::String(values) => Some(values),
            _ => None,
        }
    }

    /// Get the values as longs.
    pub fn as_long(&self) -> Option<&[i64]> {
        match self {
            PropertyValues::Long(values) => Some(values),
            _ => None,
        }
    }

    /// Get the values as doubles.
    pub fn as_double(&self) -> Option<&[f64]> {
        match self {
            PropertyValues::Double(values) => Some(values),
            _ => None,
        }
    }

    /// Get the values as booleans.
    pub fn as_boolean(&self) -> Option<&[bool]> {
        match self {
            PropertyValues::Boolean(values) => Some(values),
            _ => None,
        }
    }

    /// Get the values as byte arrays.
    pub fn as_bytes(&self) -> Option<&[Vec<u8>]> {
        match self {
            PropertyValues::Bytes(values) => Some(values),
            _ => None,
        }
    }

    /// Get the values as nested documents.
    pub fn as_document(&self) -> Option<&[GenericDocument]> {
        match self {
            PropertyValues::Document(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Vec<String>> for PropertyValues {
    fn from(values: Vec<String>) -> Self {
        PropertyValues::String(values)
    }
}

impl From<Vec<i64>> for PropertyValues {
    fn from(values: Vec<i64>) -> Self {
        PropertyValues::Long(values)
    }
}

impl From<Vec<f64>> for PropertyValues {
    fn from(values: Vec<f64>) -> Self {
        PropertyValues::Double(values)
    }
}

impl From<Vec<bool>> for PropertyValues {
    fn from(values: Vec<bool>) -> Self {
        PropertyValues::Boolean(values)
    }
}

impl From<Vec<Vec<u8>>> for PropertyValues {
    fn from(values: Vec<Vec<u8>>) -> Self {
        PropertyValues::Bytes(values)
    }
}

impl From<Vec<GenericDocument>> for PropertyValues {
    fn from(values: Vec<GenericDocument>) -> Self {
        PropertyValues::Document(values)
    }
}
