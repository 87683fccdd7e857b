//! Process-wide registry of document codecs.
//!
//! Nested document conversion is driven by schema name: when a codec meets
//! a document-reference property it asks the registry for the codec
//! registered under that name. The registry therefore keeps two views of
//! every registration: a name-keyed, type-erased view used during nested
//! conversion, and a `TypeId`-keyed view used to find the codec for a
//! concrete Rust type.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;

use crate::codec::codec::{ConvertContext, DocumentCodec};
use crate::document::GenericDocument;
use crate::error::{Result, VellumError};
use crate::schema::{Schema, SchemaProvider};

type ErasedEncodeFn =
    dyn Fn(&CodecRegistry, &dyn Any, &ConvertContext) -> Result<GenericDocument> + Send + Sync;
type ErasedDecodeFn =
    dyn Fn(&CodecRegistry, &GenericDocument, &ConvertContext) -> Result<Box<dyn Any + Send>>
        + Send
        + Sync;

struct ErasedCodec {
    schema: Schema,
    encode: Box<ErasedEncodeFn>,
    decode: Box<ErasedDecodeFn>,
}

struct RegistryInner {
    by_name: AHashMap<String, Arc<ErasedCodec>>,
    by_type: AHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

/// Registry mapping schema names and Rust types to their codecs.
///
/// Registration is idempotent: registering a codec under a name that
/// already holds an equivalent schema is a no-op and the first
/// registration wins. Registering a different schema under an existing
/// name fails with [`VellumError::SchemaConflict`].
pub struct CodecRegistry {
    inner: RwLock<RegistryInner>,
}

impl CodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        CodecRegistry {
            inner: RwLock::new(RegistryInner {
                by_name: AHashMap::new(),
                by_type: AHashMap::new(),
            }),
        }
    }

    /// Register a codec under its schema name.
    pub fn register<T: Send + 'static>(&self, codec: DocumentCodec<T>) -> Result<()> {
        let codec = Arc::new(codec);
        let schema = codec.schema().clone();
        let name = schema.name().to_string();

        let mut inner = self.inner.write();
        if let Some(existing) = inner.by_name.get(&name) {
            if !existing.schema.equivalent(&schema) {
                return Err(VellumError::schema_conflict(format!(
                    "'{name}' is already registered with a different schema"
                )));
            }
            debug!("codec for schema '{name}' is already registered; keeping the existing one");
            return Ok(());
        }

        let erased = ErasedCodec {
            schema,
            encode: {
                let codec = codec.clone();
                Box::new(move |registry, value, context| {
                    let value = value.downcast_ref::<T>().ok_or_else(|| {
                        VellumError::field(format!(
                            "embedded value is not a {}",
                            std::any::type_name::<T>()
                        ))
                    })?;
                    codec.encode_with_context(value, registry, context)
                })
            },
            decode: {
                let codec = codec.clone();
                Box::new(move |registry, document, context| {
                    codec
                        .decode_with_context(document, registry, context)
                        .map(|value| Box::new(value) as Box<dyn Any + Send>)
                })
            },
        };

        inner.by_name.insert(name.clone(), Arc::new(erased));
        let typed: Arc<dyn Any + Send + Sync> = codec;
        inner.by_type.insert(TypeId::of::<T>(), typed);
        debug!("registered codec for schema '{name}'");
        Ok(())
    }

    /// Get the schema registered under a name.
    pub fn schema(&self, name: &str) -> Option<Schema> {
        self.inner
            .read()
            .by_name
            .get(name)
            .map(|erased| erased.schema.clone())
    }

    /// Check whether a schema name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().by_name.contains_key(name)
    }

    /// Get all registered schema names, sorted.
    pub fn schema_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered codecs.
    pub fn len(&self) -> usize {
        self.inner.read().by_name.len()
    }

    /// Check if the registry has no registrations.
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_name.is_empty()
    }

    /// Get the codec registered for a Rust type.
    pub fn codec<T: Send + 'static>(&self) -> Option<Arc<DocumentCodec<T>>> {
        let entry = self.inner.read().by_type.get(&TypeId::of::<T>())?.clone();
        entry.downcast::<DocumentCodec<T>>().ok()
    }

    /// Encode a typed object using the codec registered for its type.
    pub fn encode<T: Send + 'static>(&self, value: &T) -> Result<GenericDocument> {
        let codec = self
            .codec::<T>()
            .ok_or_else(|| VellumError::unknown_schema(std::any::type_name::<T>()))?;
        codec.encode_in(value, self)
    }

    /// Decode a generic document using the codec registered for the target
    /// type.
    pub fn decode<T: Send + 'static>(&self, document: &GenericDocument) -> Result<T> {
        let codec = self
            .codec::<T>()
            .ok_or_else(|| VellumError::unknown_schema(std::any::type_name::<T>()))?;
        codec.decode_in(document, self)
    }

    pub(crate) fn encode_erased(
        &self,
        schema_type: &str,
        value: &dyn Any,
        context: &ConvertContext,
    ) -> Result<GenericDocument> {
        let erased = self.erased(schema_type)?;
        (erased.encode)(self, value, context)
    }

    pub(crate) fn decode_erased(
        &self,
        schema_name: &str,
        document: &GenericDocument,
        context: &ConvertContext,
    ) -> Result<Box<dyn Any + Send>> {
        let erased = self.erased(schema_name)?;
        (erased.decode)(self, document, context)
    }

    // The guard must be released before the erased function runs, since
    // nested conversion re-enters the registry.
    fn erased(&self, name: &str) -> Result<Arc<ErasedCodec>> {
        self.inner
            .read()
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| VellumError::unknown_schema(name))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaProvider for CodecRegistry {
    fn schema(&self, type_id: &str) -> Option<Schema> {
        CodecRegistry::schema(self, type_id)
    }
}

/// Get the process-wide codec registry.
pub fn global() -> &'static CodecRegistry {
    static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();
    GLOBAL.get_or_init(CodecRegistry::new)
}

/// Register a codec in the process-wide registry.
pub fn register_document_class<T: Send + 'static>(codec: DocumentCodec<T>) -> Result<()> {
    global().register(codec)
}

/// Encode a typed object through the process-wide registry.
pub fn to_generic_document<T: Send + 'static>(value: &T) -> Result<GenericDocument> {
    global().encode(value)
}

/// Decode a generic document through the process-wide registry.
pub fn from_generic_document<T: Send + 'static>(document: &GenericDocument) -> Result<T> {
    global().decode(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::codec::CodecConfig;
    use crate::codec::field::FieldState;
    use crate::schema::{Cardinality, PropertyDescriptor};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Address {
        namespace: String,
        id: String,
        street: Option<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Person {
        namespace: String,
        id: String,
        name: Option<String>,
        address: Option<Address>,
    }

    fn address_codec() -> DocumentCodec<Address> {
        DocumentCodec::<Address>::builder("Address")
            .namespace(|a| a.namespace.clone(), |a, v| a.namespace = v)
            .id(|a| a.id.clone(), |a, v| a.id = v)
            .property(
                PropertyDescriptor::string("street"),
                |a| FieldState::optional(a.street.clone()),
                |a, state| {
                    a.street = state.into_optional()?;
                    Ok(())
                },
            )
            .build()
            .unwrap()
    }

    fn person_codec() -> DocumentCodec<Person> {
        DocumentCodec::<Person>::builder("Person")
            .namespace(|p| p.namespace.clone(), |p, v| p.namespace = v)
            .id(|p| p.id.clone(), |p, v| p.id = v)
            .property(
                PropertyDescriptor::string("name"),
                |p| FieldState::optional(p.name.clone()),
                |p, state| {
                    p.name = state.into_optional()?;
                    Ok(())
                },
            )
            .property(
                PropertyDescriptor::document("address", "Address"),
                |p| FieldState::optional_document(p.address.clone()),
                |p, state| {
                    p.address = state.into_optional_document()?;
                    Ok(())
                },
            )
            .build()
            .unwrap()
    }

    fn sample_person() -> Person {
        Person {
            namespace: "contacts".to_string(),
            id: "p1".to_string(),
            name: Some("Ada".to_string()),
            address: Some(Address {
                namespace: "contacts".to_string(),
                id: "a1".to_string(),
                street: Some("Broadway".to_string()),
            }),
        }
    }

    #[test]
    fn test_register_and_convert() {
        let registry = CodecRegistry::new();
        registry.register(address_codec()).unwrap();
        registry.register(person_codec()).unwrap();

        let person = sample_person();
        let doc = registry.encode(&person).unwrap();
        assert_eq!(doc.schema_name(), "Person");
        let nested = doc.document_value("address").unwrap();
        assert_eq!(nested.schema_name(), "Address");
        assert_eq!(nested.string_value("street"), Some("Broadway"));

        let restored: Person = registry.decode(&doc).unwrap();
        assert_eq!(restored, person);
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let registry = CodecRegistry::new();
        registry.register(address_codec()).unwrap();
        registry.register(address_codec()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_conflicting_registration_fails() {
        let registry = CodecRegistry::new();
        registry.register(address_codec()).unwrap();

        let conflicting = DocumentCodec::<Address>::builder("Address")
            .namespace(|a| a.namespace.clone(), |a, v| a.namespace = v)
            .id(|a| a.id.clone(), |a, v| a.id = v)
            .property(
                PropertyDescriptor::long("street"),
                |_| FieldState::Absent,
                |_, _| Ok(()),
            )
            .build()
            .unwrap();

        let result = registry.register(conflicting);
        assert!(matches!(result, Err(VellumError::SchemaConflict(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_encode_unregistered_nested_schema_fails() {
        let registry = CodecRegistry::new();
        registry.register(person_codec()).unwrap();

        let result = registry.encode(&sample_person());
        assert!(matches!(result, Err(VellumError::UnknownSchema(_))));
    }

    #[test]
    fn test_encode_unregistered_type_fails() {
        let registry = CodecRegistry::new();
        let result = registry.encode(&sample_person());
        assert!(matches!(result, Err(VellumError::UnknownSchema(_))));
    }

    #[test]
    fn test_decode_dispatches_on_embedded_schema_name() {
        let registry = CodecRegistry::new();
        registry.register(address_codec()).unwrap();
        registry.register(person_codec()).unwrap();

        // A document claiming an unregistered embedded schema fails.
        let doc = GenericDocument::builder("contacts", "p2", "Person")
            .add_document(
                "address",
                vec![GenericDocument::new("contacts", "a2", "PostBox")],
            )
            .build();
        let result: Result<Person> = registry.decode(&doc);
        assert!(matches!(result, Err(VellumError::UnknownSchema(_))));
    }

    #[test]
    fn test_introspection() {
        let registry = CodecRegistry::new();
        assert!(registry.is_empty());
        registry.register(person_codec()).unwrap();
        registry.register(address_codec()).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Person"));
        assert!(!registry.contains("Gift"));
        assert_eq!(registry.schema_names(), vec!["Address", "Person"]);
        assert_eq!(registry.schema("Address").unwrap().name(), "Address");
        assert!(SchemaProvider::schema(&registry, "Person").is_some());
    }

    #[derive(Debug, Clone, Default)]
    struct Node {
        namespace: String,
        id: String,
        next: Option<Box<Node>>,
    }

    fn node_codec(max_nested_depth: usize) -> DocumentCodec<Node> {
        DocumentCodec::<Node>::builder("Node")
            .config(CodecConfig {
                max_nested_depth,
                ..CodecConfig::default()
            })
            .namespace(|n| n.namespace.clone(), |n, v| n.namespace = v)
            .id(|n| n.id.clone(), |n, v| n.id = v)
            .property(
                PropertyDescriptor::document("next", "Node").cardinality(Cardinality::Optional),
                |n| FieldState::optional_document(n.next.as_ref().map(|b| (**b).clone())),
                |n, state| {
                    n.next = state.into_optional_document::<Node>()?.map(Box::new);
                    Ok(())
                },
            )
            .build()
            .unwrap()
    }

    fn chain(length: usize) -> Node {
        let mut node = Node {
            namespace: "list".to_string(),
            id: format!("n{length}"),
            next: None,
        };
        for index in (0..length).rev() {
            node = Node {
                namespace: "list".to_string(),
                id: format!("n{index}"),
                next: Some(Box::new(node)),
            };
        }
        node
    }

    #[test]
    fn test_nesting_beyond_limit_is_cyclic_data() {
        let registry = CodecRegistry::new();
        registry.register(node_codec(4)).unwrap();

        let result = registry.encode(&chain(10));
        assert!(matches!(result, Err(VellumError::CyclicData(_))));
    }

    #[test]
    fn test_nesting_within_limit_round_trips() {
        let registry = CodecRegistry::new();
        registry.register(node_codec(16)).unwrap();

        let doc = registry.encode(&chain(3)).unwrap();
        let restored: Node = registry.decode(&doc).unwrap();

        let mut length = 0;
        let mut cursor = Some(&restored);
        while let Some(node) = cursor {
            length += 1;
            cursor = node.next.as_deref();
        }
        assert_eq!(length, 4);
    }
}
