//! Schema-typed generic document representation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::value::PropertyValues;

/// A document in the untyped wire representation.
///
/// A generic document carries identity (namespace and id), the name of the
/// schema it conforms to, system metadata, and a map from property name to
/// an array of values. It is the exchange format between typed application
/// objects and the index: codecs encode typed values into this form and
/// decode them back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericDocument {
    namespace: String,
    id: String,
    schema_name: String,
    score: i32,
    creation_timestamp_ms: i64,
    ttl_ms: i64,
    properties: HashMap<String, PropertyValues>,
}

impl GenericDocument {
    /// Create an empty document for a schema type.
    ///
    /// Metadata starts at its unset defaults: score 0, creation timestamp
    /// -1 (assigned by the index at put time), ttl 0 (never expires).
    pub fn new<N, I, S>(namespace: N, id: I, schema_name: S) -> Self
    where
        N: Into<String>,
        I: Into<String>,
        S: Into<String>,
    {
        GenericDocument {
            namespace: namespace.into(),
            id: id.into(),
            schema_name: schema_name.into(),
            score: 0,
            creation_timestamp_ms: -1,
            ttl_ms: 0,
            properties: HashMap::new(),
        }
    }

    /// Create a builder for constructing documents.
    pub fn builder<N, I, S>(namespace: N, id: I, schema_name: S) -> GenericDocumentBuilder
    where
        N: Into<String>,
        I: Into<String>,
        S: Into<String>,
    {
        GenericDocumentBuilder::new(namespace, id, schema_name)
    }

    /// Get the namespace of the document.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the id of the document.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the name of the schema this document conforms to.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Get the ranking score of the document.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Get the creation timestamp in milliseconds, or -1 if unset.
    pub fn creation_timestamp_ms(&self) -> i64 {
        self.creation_timestamp_ms
    }

    /// Get the time-to-live in milliseconds, or 0 if the document never
    /// expires.
    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Set the ranking score of the document.
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    /// Set the creation timestamp in milliseconds.
    pub fn set_creation_timestamp_ms(&mut self, timestamp_ms: i64) {
        self.creation_timestamp_ms = timestamp_ms;
    }

    /// Set the time-to-live in milliseconds.
    pub fn set_ttl_ms(&mut self, ttl_ms: i64) {
        self.ttl_ms = ttl_ms;
    }

    /// Store a property value array, replacing any previous values.
    pub fn set_property<S, V>(&mut self, name: S, values: V)
    where
        S: Into<String>,
        V: Into<PropertyValues>,
    {
        self.properties.insert(name.into(), values.into());
    }

    /// Get the value array of a property.
    pub fn property(&self, name: &str) -> Option<&PropertyValues> {
        self.properties.get(name)
    }

    /// Check if the document has a property.
    ///
    /// A property holding an empty array is present; only a missing map
    /// entry counts as absent.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Remove a property from the document.
    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValues> {
        self.properties.remove(name)
    }

    /// Get all property names.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(|s| s.as_str()).collect()
    }

    /// Get all properties.
    pub fn properties(&self) -> &HashMap<String, PropertyValues> {
        &self.properties
    }

    /// Get the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the document has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Get the string values of a property.
    pub fn string_values(&self, name: &str) -> Option<&[String]> {
        self.property(name).and_then(PropertyValues::as_string)
    }

    /// Get the long values of a property.
    pub fn long_values(&self, name: &str) -> Option<&[i64]> {
        self.property(name).and_then(PropertyValues::as_long)
    }

    /// Get the double values of a property.
    pub fn double_values(&self, name: &str) -> Option<&[f64]> {
        self.property(name).and_then(PropertyValues::as_double)
    }

    /// Get the boolean values of a property.
    pub fn boolean_values(&self, name: &str) -> Option<&[bool]> {
        self.property(name).and_then(PropertyValues::as_boolean)
    }

    /// Get the byte array values of a property.
    pub fn bytes_values(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.property(name).and_then(PropertyValues::as_bytes)
    }

    /// Get the nested document values of a property.
    pub fn document_values(&self, name: &str) -> Option<&[GenericDocument]> {
        self.property(name).and_then(PropertyValues::as_document)
    }

    /// Get the first string value of a property.
    pub fn string_value(&self, name: &str) -> Option<&str> {
        self.string_values(name)?.first().map(String::as_str)
    }

    /// Get the first long value of a property.
    pub fn long_value(&self, name: &str) -> Option<i64> {
        self.long_values(name)?.first().copied()
    }

    /// Get the first double value of a property.
    pub fn double_value(&self, name: &str) -> Option<f64> {
        self.double_values(name)?.first().copied()
    }

    /// Get the first boolean value of a property.
    pub fn boolean_value(&self, name: &str) -> Option<bool> {
        self.boolean_values(name)?.first().copied()
    }

    /// Get the first byte array value of a property.
    pub fn bytes_value(&self, name: &str) -> Option<&[u8]> {
        self.bytes_values(name)?.first().map(Vec::as_slice)
    }

    /// Get the first nested document value of a property.
    pub fn document_value(&self, name: &str) -> Option<&GenericDocument> {
        self.document_values(name)?.first()
    }
}

/// A builder for constructing generic documents in a fluent manner.
#[derive(Debug)]
pub struct GenericDocumentBuilder {
    document: GenericDocument,
}

impl GenericDocumentBuilder {
    /// Create a new document builder.
    pub fn new<N, I, S>(namespace: N, id: I, schema_name: S) -> Self
    where
        N: Into<String>,
        I: Into<String>,
        S: Into<String>,
    {
        GenericDocumentBuilder {
            document: GenericDocument::new(namespace, id, schema_name),
        }
    }

    /// Add a string property to the document.
    pub fn add_string<S: Into<String>>(mut self, name: S, values: Vec<String>) -> Self {
        self.document.set_property(name, values);
        self
    }

    /// Add a long property to the document.
    pub fn add_long<S: Into<String>>(mut self, name: S, values: Vec<i64>) -> Self {
        self.document.set_property(name, values);
        self
    }

    /// Add a double property to the document.
    pub fn add_double<S: Into<String>>(mut self, name: S, values: Vec<f64>) -> Self {
        self.document.set_property(name, values);
        self
    }

    /// Add a boolean property to the document.
    pub fn add_boolean<S: Into<String>>(mut self, name: S, values: Vec<bool>) -> Self {
        self.document.set_property(name, values);
        self
    }

    /// Add a bytes property to the document.
    pub fn add_bytes<S: Into<String>>(mut self, name: S, values: Vec<Vec<u8>>) -> Self {
        self.document.set_property(name, values);
        self
    }

    /// Add a nested document property to the document.
    pub fn add_document<S: Into<String>>(mut self, name: S, values: Vec<GenericDocument>) -> Self {
        self.document.set_property(name, values);
        self
    }

    /// Set the ranking score of the document.
    pub fn score(mut self, score: i32) -> Self {
        self.document.set_score(score);
        self
    }

    /// Set the creation timestamp in milliseconds.
    pub fn creation_timestamp_ms(mut self, timestamp_ms: i64) -> Self {
        self.document.set_creation_timestamp_ms(timestamp_ms);
        self
    }

    /// Set the time-to-live in milliseconds.
    pub fn ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.document.set_ttl_ms(ttl_ms);
        self
    }

    /// Build the final document.
    pub fn build(self) -> GenericDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_defaults() {
        let doc = GenericDocument::new("ns1", "id1", "Gift");
        assert_eq!(doc.namespace(), "ns1");
        assert_eq!(doc.id(), "id1");
        assert_eq!(doc.schema_name(), "Gift");
        assert_eq!(doc.score(), 0);
        assert_eq!(doc.creation_timestamp_ms(), -1);
        assert_eq!(doc.ttl_ms(), 0);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_builder() {
        let doc = GenericDocument::builder("ns1", "id1", "Gift")
            .add_string("object", vec!["widget".to_string()])
            .add_long("price", vec![25])
            .score(3)
            .build();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.string_value("object"), Some("widget"));
        assert_eq!(doc.long_value("price"), Some(25));
        assert_eq!(doc.score(), 3);
    }

    #[test]
    fn test_singular_accessors_return_first_element() {
        let doc = GenericDocument::builder("ns", "id", "Numbers")
            .add_long("values", vec![10, 20, 30])
            .build();

        assert_eq!(doc.long_value("values"), Some(10));
        assert_eq!(doc.long_values("values"), Some(&[10, 20, 30][..]));
    }

    #[test]
    fn test_empty_array_differs_from_absent() {
        let doc = GenericDocument::builder("ns", "id", "Gift")
            .add_string("tags", vec![])
            .build();

        assert!(doc.has_property("tags"));
        assert_eq!(doc.string_values("tags"), Some(&[][..]));
        assert_eq!(doc.string_value("tags"), None);
        assert!(!doc.has_property("object"));
    }

    #[test]
    fn test_kind_mismatch_returns_none() {
        let doc = GenericDocument::builder("ns", "id", "Gift")
            .add_string("object", vec!["widget".to_string()])
            .build();

        assert_eq!(doc.long_values("object"), None);
        assert_eq!(doc.string_values("object").map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_nested_documents() {
        let inner = GenericDocument::builder("ns", "inner", "Part").build();
        let doc = GenericDocument::builder("ns", "outer", "Machine")
            .add_document("parts", vec![inner.clone()])
            .build();

        assert_eq!(doc.document_value("parts"), Some(&inner));
        assert_eq!(doc.document_values("parts").map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_set_property_replaces() {
        let mut doc = GenericDocument::new("ns", "id", "Gift");
        doc.set_property("object", vec!["widget".to_string()]);
        doc.set_property("object", vec!["gadget".to_string()]);

        assert_eq!(doc.string_value("object"), Some("gadget"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let doc = GenericDocument::builder("ns1", "id1", "Gift")
            .add_string("object", vec!["widget".to_string()])
            .add_boolean("wrapped", vec![true])
            .creation_timestamp_ms(1_700_000_000_000)
            .build();

        let json = serde_json::to_string(&doc).unwrap();
        let restored: GenericDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, doc);
    }
}
