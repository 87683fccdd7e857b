//! Schema construction and lookup.
//!
//! A [`Schema`] is a named, ordered set of [`PropertyDescriptor`]s defining a
//! document type's shape. Property order carries no semantics but is
//! preserved for stable externalization (debugging, schema diffing);
//! equality therefore comes in two flavors, the order-sensitive `PartialEq`
//! and the order-insensitive [`Schema::equivalent`] used for conflict
//! detection.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VellumError};
use crate::schema::property::PropertyDescriptor;

/// A named document schema: an ordered list of property descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaData", into = "SchemaData")]
pub struct Schema {
    /// Schema name, unique within a codec registry
    name: String,
    /// Property descriptors in insertion order
    properties: Vec<PropertyDescriptor>,
    /// Property name to position lookup
    index: AHashMap<String, usize>,
}

impl Schema {
    /// Build a schema from a name and a list of property descriptors.
    ///
    /// Fails with [`VellumError::DuplicateProperty`] if two descriptors
    /// share a name and with [`VellumError::InvalidFlagCombination`] if a
    /// descriptor carries flags that are illegal for its kind.
    pub fn build<S: Into<String>>(
        name: S,
        properties: Vec<PropertyDescriptor>,
    ) -> Result<Schema> {
        let mut builder = SchemaBuilder::new(name);
        for descriptor in properties {
            builder = builder.add_property(descriptor)?;
        }
        builder.build()
    }

    /// Create a builder for constructing schemas.
    pub fn builder<S: Into<String>>(name: S) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Get the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all property descriptors in insertion order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Get a property descriptor by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Check if a property exists.
    pub fn has_property(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get all property names in insertion order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name()).collect()
    }

    /// Get the descriptors of document-reference properties, in order.
    pub fn document_properties(&self) -> Vec<&PropertyDescriptor> {
        self.properties
            .iter()
            .filter(|p| p.value_kind().is_document())
            .collect()
    }

    /// Get the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the schema has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Compare two schemas ignoring property order.
    ///
    /// Property order is irrelevant for conversion semantics, so the codec
    /// registry treats schemas that differ only in ordering as the same
    /// schema.
    pub fn equivalent(&self, other: &Schema) -> bool {
        if self.name != other.name || self.properties.len() != other.properties.len() {
            return false;
        }
        self.properties
            .iter()
            .all(|p| other.property(p.name()) == Some(p))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.properties == other.properties
    }
}

/// Serialized form of a schema; the lookup index is rebuilt (and the schema
/// re-validated) on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaData {
    name: String,
    properties: Vec<PropertyDescriptor>,
}

impl TryFrom<SchemaData> for Schema {
    type Error = VellumError;

    fn try_from(data: SchemaData) -> Result<Schema> {
        Schema::build(data.name, data.properties)
    }
}

impl From<Schema> for SchemaData {
    fn from(schema: Schema) -> SchemaData {
        SchemaData {
            name: schema.name,
            properties: schema.properties,
        }
    }
}

/// A builder for constructing schemas in a fluent manner.
///
/// ```
/// use vellum::schema::{PropertyDescriptor, Schema};
///
/// let schema = Schema::builder("Gift")
///     .add_property(PropertyDescriptor::string("object"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.name(), "Gift");
/// assert!(schema.has_property("object"));
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    properties: Vec<PropertyDescriptor>,
    index: AHashMap<String, usize>,
}

impl SchemaBuilder {
    /// Create a new schema builder.
    pub fn new<S: Into<String>>(name: S) -> Self {
        SchemaBuilder {
            name: name.into(),
            properties: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Add a property descriptor to the schema being built.
    ///
    /// Validates the descriptor's flags and rejects duplicate or empty
    /// property names.
    pub fn add_property(mut self, descriptor: PropertyDescriptor) -> Result<Self> {
        if descriptor.name().is_empty() {
            return Err(VellumError::schema("Property name cannot be empty"));
        }
        if self.index.contains_key(descriptor.name()) {
            return Err(VellumError::duplicate_property(descriptor.name()));
        }
        descriptor.validate()?;

        self.index
            .insert(descriptor.name().to_string(), self.properties.len());
        self.properties.push(descriptor);
        Ok(self)
    }

    /// Build the final schema.
    pub fn build(self) -> Result<Schema> {
        if self.name.is_empty() {
            return Err(VellumError::schema("Schema name cannot be empty"));
        }
        Ok(Schema {
            name: self.name,
            properties: self.properties,
            index: self.index,
        })
    }
}
