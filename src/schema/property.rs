//! Property descriptors for schema definition.
//!
//! A [`PropertyDescriptor`] is the static, per-property metadata a schema is
//! assembled from: name, value kind, cardinality, and the string
//! tokenization/indexing/joinability flags consumed by the indexing backend.
//! Descriptors are supplied by an external class analyzer; this module only
//! models and validates them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VellumError};

/// The kind of value a property holds.
///
/// `Document` is a reference to another document type, identified by its
/// schema name; the referenced schema is resolved lazily through the codec
/// registry at conversion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// UTF-8 string value
    String,
    /// 64-bit signed integer value
    Long,
    /// 64-bit floating point value
    Double,
    /// Boolean value
    Boolean,
    /// Raw byte array value
    Bytes,
    /// Nested document value, referencing another schema by name
    Document {
        /// Schema name of the referenced document type
        schema_type: String,
    },
}

impl ValueKind {
    /// Get the kind name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Long => "long",
            ValueKind::Double => "double",
            ValueKind::Boolean => "boolean",
            ValueKind::Bytes => "bytes",
            ValueKind::Document { .. } => "document",
        }
    }

    /// Check if this is the string kind.
    pub fn is_string(&self) -> bool {
        matches!(self, ValueKind::String)
    }

    /// Check if this is the document-reference kind.
    pub fn is_document(&self) -> bool {
        matches!(self, ValueKind::Document { .. })
    }
}

/// Presence/multiplicity contract for a property.
///
/// In memory, a `Repeated` property is a sequence (possibly empty), an
/// `Optional` property is a single nullable value, and a `Required` property
/// is a single non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// Exactly one value
    Required,
    /// Zero or one value
    Optional,
    /// Zero or more values
    Repeated,
}

/// How a string property is tokenized by the indexing backend.
///
/// Meaningful only for [`ValueKind::String`]; set together with
/// [`StringIndexing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringTokenizer {
    /// Not tokenized
    None,
    /// Plain-text tokenization on word boundaries
    Plain,
    /// The whole value is one token
    Verbatim,
}

/// How a string property is indexed by the indexing backend.
///
/// Meaningful only for [`ValueKind::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringIndexing {
    /// Not indexed
    None,
    /// Indexed for exact term matching
    ExactTerms,
    /// Indexed for term prefix matching
    Prefixes,
}

/// Whether a string property can join documents across schemas by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinableType {
    /// Not joinable
    None,
    /// The value is a qualified document id usable for cross-schema joins
    QualifiedId,
}

/// Static metadata for one property of a schema.
///
/// Descriptors are built with per-kind constructors and chainable setters,
/// then validated as part of schema construction:
///
/// ```
/// use vellum::schema::{Cardinality, JoinableType, PropertyDescriptor};
///
/// let descriptor = PropertyDescriptor::string("object")
///     .cardinality(Cardinality::Optional)
///     .joinable(JoinableType::QualifiedId);
///
/// assert!(descriptor.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name, unique within a schema
    name: String,
    /// Kind of value this property holds
    value_kind: ValueKind,
    /// Presence/multiplicity contract
    cardinality: Cardinality,
    /// String tokenization flag
    tokenizer: StringTokenizer,
    /// String indexing flag
    indexing: StringIndexing,
    /// Cross-schema joinability flag
    joinable: JoinableType,
    /// Whether nested properties of a document value are indexed in place
    index_nested_properties: bool,
}

impl PropertyDescriptor {
    /// Create a new descriptor with default flags.
    ///
    /// Defaults are `Optional` cardinality with all string flags set to
    /// their `None` values and nested indexing disabled.
    pub fn new<S: Into<String>>(name: S, value_kind: ValueKind) -> Self {
        PropertyDescriptor {
            name: name.into(),
            value_kind,
            cardinality: Cardinality::Optional,
            tokenizer: StringTokenizer::None,
            indexing: StringIndexing::None,
            joinable: JoinableType::None,
            index_nested_properties: false,
        }
    }

    /// Create a new string property descriptor.
    pub fn string<S: Into<String>>(name: S) -> Self {
        Self::new(name, ValueKind::String)
    }

    /// Create a new long property descriptor.
    pub fn long<S: Into<String>>(name: S) -> Self {
        Self::new(name, ValueKind::Long)
    }

    /// Create a new double property descriptor.
    pub fn double<S: Into<String>>(name: S) -> Self {
        Self::new(name, ValueKind::Double)
    }

    /// Create a new boolean property descriptor.
    pub fn boolean<S: Into<String>>(name: S) -> Self {
        Self::new(name, ValueKind::Boolean)
    }

    /// Create a new bytes property descriptor.
    pub fn bytes<S: Into<String>>(name: S) -> Self {
        Self::new(name, ValueKind::Bytes)
    }

    /// Create a new document-reference property descriptor.
    pub fn document<S: Into<String>, T: Into<String>>(name: S, schema_type: T) -> Self {
        Self::new(
            name,
            ValueKind::Document {
                schema_type: schema_type.into(),
            },
        )
    }

    /// Set the cardinality of this property.
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Set the string tokenizer flag.
    pub fn tokenizer(mut self, tokenizer: StringTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Set the string indexing flag.
    pub fn indexing(mut self, indexing: StringIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// Set the joinable flag.
    pub fn joinable(mut self, joinable: JoinableType) -> Self {
        self.joinable = joinable;
        self
    }

    /// Set whether nested properties of a document value are indexed.
    pub fn index_nested_properties(mut self, index_nested: bool) -> Self {
        self.index_nested_properties = index_nested;
        self
    }

    /// Get the property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value kind.
    pub fn value_kind(&self) -> &ValueKind {
        &self.value_kind
    }

    /// Get the cardinality.
    pub fn property_cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Get the string tokenizer flag.
    pub fn string_tokenizer(&self) -> StringTokenizer {
        self.tokenizer
    }

    /// Get the string indexing flag.
    pub fn string_indexing(&self) -> StringIndexing {
        self.indexing
    }

    /// Get the joinable flag.
    pub fn joinable_type(&self) -> JoinableType {
        self.joinable
    }

    /// Check whether nested properties of a document value are indexed.
    pub fn indexes_nested_properties(&self) -> bool {
        self.index_nested_properties
    }

    /// Get the referenced schema name for a document-reference property.
    pub fn schema_type(&self) -> Option<&str> {
        match &self.value_kind {
            ValueKind::Document { schema_type } => Some(schema_type),
            _ => None,
        }
    }

    /// Validate the flag combination of this descriptor.
    ///
    /// String flags are only legal on string properties, nested indexing is
    /// only legal on document properties, indexing and tokenization must be
    /// enabled together, and a joinable property can neither be indexed nor
    /// repeated.
    pub fn validate(&self) -> Result<()> {
        if !self.value_kind.is_string() {
            if self.tokenizer != StringTokenizer::None {
                return Err(VellumError::invalid_flags(format!(
                    "property '{}' has kind {} but sets a string tokenizer",
                    self.name,
                    self.value_kind.name()
                )));
            }
            if self.indexing != StringIndexing::None {
                return Err(VellumError::invalid_flags(format!(
                    "property '{}' has kind {} but sets string indexing",
                    self.name,
                    self.value_kind.name()
                )));
            }
            if self.joinable != JoinableType::None {
                return Err(VellumError::invalid_flags(format!(
                    "property '{}' has kind {} but sets a joinable type",
                    self.name,
                    self.value_kind.name()
                )));
            }
        }

        if !self.value_kind.is_document() && self.index_nested_properties {
            return Err(VellumError::invalid_flags(format!(
                "property '{}' has kind {} but enables nested property indexing",
                self.name,
                self.value_kind.name()
            )));
        }

        // Indexing and tokenization go together: an indexed string needs a
        // tokenizer, and a tokenizer without indexing is meaningless.
        if self.indexing != StringIndexing::None && self.tokenizer == StringTokenizer::None {
            return Err(VellumError::invalid_flags(format!(
                "indexed string property '{}' requires a tokenizer",
                self.name
            )));
        }
        if self.tokenizer != StringTokenizer::None && self.indexing == StringIndexing::None {
            return Err(VellumError::invalid_flags(format!(
                "tokenized string property '{}' requires indexing",
                self.name
            )));
        }

        if self.joinable == JoinableType::QualifiedId {
            if self.indexing != StringIndexing::None {
                return Err(VellumError::invalid_flags(format!(
                    "joinable property '{}' cannot also be indexed",
                    self.name
                )));
            }
            if self.cardinality == Cardinality::Repeated {
                return Err(VellumError::invalid_flags(format!(
                    "joinable property '{}' cannot be repeated",
                    self.name
                )));
            }
        }

        Ok(())
    }
}
