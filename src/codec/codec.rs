//! Conversion between typed objects and generic documents.
//!
//! A [`DocumentCodec`] binds a schema to one Rust type: each property
//! descriptor is paired with a getter and a setter closure, and the codec
//! drives them to encode an object into a [`GenericDocument`] or decode one
//! back. Nested document properties are delegated through a
//! [`CodecRegistry`](crate::codec::registry::CodecRegistry), so a codec only
//! knows its own type and refers to others by schema name.

use log::warn;

use crate::codec::field::{FieldState, FieldValue, FromFieldValue};
use crate::codec::registry::CodecRegistry;
use crate::document::{GenericDocument, PropertyValues};
use crate::error::{Result, VellumError};
use crate::schema::{Cardinality, PropertyDescriptor, Schema, SchemaBuilder, SchemaProvider, ValueKind};

/// Conversion behavior knobs.
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    /// Fail decoding when a required property is missing from the document.
    ///
    /// Off by default: the field is left at its default, mirroring how
    /// documents written by older schema versions are read back. Encoding
    /// always fails when a required field is absent.
    pub strict_required: bool,
    /// Maximum depth of nested document conversion before the codec
    /// assumes the object graph is cyclic.
    pub max_nested_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            strict_required: false,
            max_nested_depth: 64,
        }
    }
}

/// Depth bookkeeping for one conversion pass.
///
/// Schemas may reference each other cyclically, so conversion cannot rely
/// on the schema graph being finite-depth. The context counts nesting
/// levels and aborts with a cycle error past the configured limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConvertContext {
    depth: usize,
    max_depth: usize,
}

impl ConvertContext {
    pub(crate) fn new(max_depth: usize) -> Self {
        ConvertContext {
            depth: 0,
            max_depth,
        }
    }

    fn descend(&self, schema_name: &str) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(VellumError::cyclic_data(format!(
                "document nesting exceeded {} levels at schema '{}'; the object graph may be cyclic",
                self.max_depth, schema_name
            )));
        }
        Ok(ConvertContext {
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }
}

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type GetString<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type SetString<T> = Box<dyn Fn(&mut T, String) + Send + Sync>;
type GetField<T> = Box<dyn Fn(&T) -> FieldState + Send + Sync>;
type SetField<T> = Box<dyn Fn(&mut T, FieldState) -> Result<()> + Send + Sync>;

struct PropertyBinding<T> {
    descriptor: PropertyDescriptor,
    get: GetField<T>,
    set: SetField<T>,
}

/// Bidirectional converter between a typed object and its document form.
pub struct DocumentCodec<T> {
    schema: Schema,
    config: CodecConfig,
    factory: Factory<T>,
    namespace_get: GetString<T>,
    namespace_set: SetString<T>,
    id_get: GetString<T>,
    id_set: SetString<T>,
    properties: Vec<PropertyBinding<T>>,
}

impl<T: Send + 'static> DocumentCodec<T> {
    /// Create a builder for a codec whose type constructs via `Default`.
    pub fn builder<S: Into<String>>(schema_name: S) -> CodecBuilder<T>
    where
        T: Default,
    {
        CodecBuilder::new(schema_name)
    }

    /// Create a builder with an explicit object factory.
    pub fn builder_with_factory<S, F>(schema_name: S, factory: F) -> CodecBuilder<T>
    where
        S: Into<String>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        CodecBuilder::with_factory(schema_name, factory)
    }

    /// Get the schema this codec converts to and from.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get the schema name this codec converts to and from.
    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    /// Resolve every schema reachable from this codec's document
    /// references.
    pub fn dependency_document_types(&self, provider: &dyn SchemaProvider) -> Result<Vec<String>> {
        crate::schema::dependency_document_types(&self.schema, provider)
    }

    /// Encode a typed object into a generic document, resolving nested
    /// codecs through the process-wide registry.
    pub fn encode(&self, value: &T) -> Result<GenericDocument> {
        self.encode_in(value, crate::codec::registry::global())
    }

    /// Decode a generic document into a typed object, resolving nested
    /// codecs through the process-wide registry.
    pub fn decode(&self, document: &GenericDocument) -> Result<T> {
        self.decode_in(document, crate::codec::registry::global())
    }

    /// Encode a typed object, resolving nested codecs through `registry`.
    pub fn encode_in(&self, value: &T, registry: &CodecRegistry) -> Result<GenericDocument> {
        self.encode_with_context(value, registry, &ConvertContext::new(self.config.max_nested_depth))
    }

    /// Decode a generic document, resolving nested codecs through
    /// `registry`.
    pub fn decode_in(&self, document: &GenericDocument, registry: &CodecRegistry) -> Result<T> {
        self.decode_with_context(document, registry, &ConvertContext::new(self.config.max_nested_depth))
    }

    pub(crate) fn encode_with_context(
        &self,
        value: &T,
        registry: &CodecRegistry,
        context: &ConvertContext,
    ) -> Result<GenericDocument> {
        let mut document = GenericDocument::new(
            (self.namespace_get)(value),
            (self.id_get)(value),
            self.schema.name(),
        );

        for binding in &self.properties {
            let name = binding.descriptor.name();
            let state = (binding.get)(value);

            if state.is_absent() {
                if binding.descriptor.property_cardinality() == Cardinality::Required {
                    return Err(VellumError::missing_required(name));
                }
                // Absent fields leave no trace in the document.
                continue;
            }

            let elements = state.values();
            match binding.descriptor.value_kind() {
                ValueKind::String => {
                    document.set_property(name, scalar_values::<String>(name, elements)?);
                }
                ValueKind::Long => {
                    document.set_property(name, scalar_values::<i64>(name, elements)?);
                }
                ValueKind::Double => {
                    document.set_property(name, scalar_values::<f64>(name, elements)?);
                }
                ValueKind::Boolean => {
                    document.set_property(name, scalar_values::<bool>(name, elements)?);
                }
                ValueKind::Bytes => {
                    document.set_property(name, scalar_values::<Vec<u8>>(name, elements)?);
                }
                ValueKind::Document { schema_type } => {
                    let nested = context.descend(schema_type)?;
                    let mut encoded = Vec::with_capacity(elements.len());
                    for element in elements {
                        match element {
                            FieldValue::Document(boxed) => {
                                encoded.push(registry.encode_erased(
                                    schema_type,
                                    boxed.as_ref(),
                                    &nested,
                                )?);
                            }
                            other => {
                                return Err(VellumError::field(format!(
                                    "property '{}' expected a document value, found {}",
                                    name,
                                    other.kind_name()
                                )));
                            }
                        }
                    }
                    document.set_property(name, encoded);
                }
            }
        }

        Ok(document)
    }

    pub(crate) fn decode_with_context(
        &self,
        document: &GenericDocument,
        registry: &CodecRegistry,
        context: &ConvertContext,
    ) -> Result<T> {
        let mut value = (self.factory)();
        (self.namespace_set)(&mut value, document.namespace().to_string());
        (self.id_set)(&mut value, document.id().to_string());

        for binding in &self.properties {
            let state = self.read_property(document, binding, registry, context)?;

            if state.is_absent()
                && self.config.strict_required
                && binding.descriptor.property_cardinality() == Cardinality::Required
            {
                return Err(VellumError::missing_required(binding.descriptor.name()));
            }

            (binding.set)(&mut value, state)?;
        }

        Ok(value)
    }

    fn read_property(
        &self,
        document: &GenericDocument,
        binding: &PropertyBinding<T>,
        registry: &CodecRegistry,
        context: &ConvertContext,
    ) -> Result<FieldState> {
        let name = binding.descriptor.name();
        let Some(values) = document.property(name) else {
            return Ok(FieldState::Absent);
        };

        if !values.matches_kind(binding.descriptor.value_kind()) {
            // Schema drift: the stored document disagrees with the current
            // descriptor. Treat the property as unset rather than failing
            // the whole document.
            warn!(
                "property '{}' of schema '{}' holds {} values where {} was expected; ignoring",
                name,
                self.schema.name(),
                values.kind_name(),
                binding.descriptor.value_kind().name()
            );
            return Ok(FieldState::Absent);
        }

        let repeated = binding.descriptor.property_cardinality() == Cardinality::Repeated;
        let state = match values {
            PropertyValues::String(items) => scalar_state(items, repeated),
            PropertyValues::Long(items) => scalar_state(items, repeated),
            PropertyValues::Double(items) => scalar_state(items, repeated),
            PropertyValues::Boolean(items) => scalar_state(items, repeated),
            PropertyValues::Bytes(items) => scalar_state(items, repeated),
            PropertyValues::Document(items) => {
                let declared = binding.descriptor.schema_type().unwrap_or("document");
                let nested = context.descend(declared)?;
                if repeated {
                    let mut decoded = Vec::with_capacity(items.len());
                    for item in items {
                        decoded.push(FieldValue::Document(registry.decode_erased(
                            item.schema_name(),
                            item,
                            &nested,
                        )?));
                    }
                    FieldState::Many(decoded)
                } else {
                    // Single-valued fields read element 0 of the stored
                    // array; extra values are ignored.
                    match items.first() {
                        Some(item) => FieldState::Single(FieldValue::Document(
                            registry.decode_erased(item.schema_name(), item, &nested)?,
                        )),
                        None => FieldState::Absent,
                    }
                }
            }
        };
        Ok(state)
    }
}

fn scalar_values<V: FromFieldValue>(name: &str, elements: Vec<FieldValue>) -> Result<Vec<V>> {
    elements
        .into_iter()
        .map(|element| {
            let found = element.kind_name();
            V::from_field_value(element).map_err(|_| {
                VellumError::field(format!(
                    "property '{name}' cannot store a {found} value"
                ))
            })
        })
        .collect()
}

fn scalar_state<V: Clone + Into<FieldValue>>(items: &[V], repeated: bool) -> FieldState {
    if repeated {
        FieldState::Many(items.iter().cloned().map(Into::into).collect())
    } else {
        match items.first() {
            Some(item) => FieldState::Single(item.clone().into()),
            None => FieldState::Absent,
        }
    }
}

/// A builder for assembling a [`DocumentCodec`] binding by binding.
pub struct CodecBuilder<T> {
    schema_name: String,
    config: CodecConfig,
    factory: Factory<T>,
    namespace: Option<(GetString<T>, SetString<T>)>,
    id: Option<(GetString<T>, SetString<T>)>,
    properties: Vec<PropertyBinding<T>>,
}

impl<T: Send + 'static> CodecBuilder<T> {
    /// Create a builder for a codec whose type constructs via `Default`.
    pub fn new<S: Into<String>>(schema_name: S) -> Self
    where
        T: Default,
    {
        Self::with_factory(schema_name, T::default)
    }

    /// Create a builder with an explicit object factory.
    pub fn with_factory<S, F>(schema_name: S, factory: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        CodecBuilder {
            schema_name: schema_name.into(),
            config: CodecConfig::default(),
            factory: Box::new(factory),
            namespace: None,
            id: None,
            properties: Vec::new(),
        }
    }

    /// Set the conversion configuration.
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind the document namespace to an object field.
    pub fn namespace<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&T) -> String + Send + Sync + 'static,
        S: Fn(&mut T, String) + Send + Sync + 'static,
    {
        self.namespace = Some((Box::new(get), Box::new(set)));
        self
    }

    /// Bind the document id to an object field.
    pub fn id<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&T) -> String + Send + Sync + 'static,
        S: Fn(&mut T, String) + Send + Sync + 'static,
    {
        self.id = Some((Box::new(get), Box::new(set)));
        self
    }

    /// Bind a property descriptor to a pair of field accessors.
    pub fn property<G, S>(mut self, descriptor: PropertyDescriptor, get: G, set: S) -> Self
    where
        G: Fn(&T) -> FieldState + Send + Sync + 'static,
        S: Fn(&mut T, FieldState) -> Result<()> + Send + Sync + 'static,
    {
        self.properties.push(PropertyBinding {
            descriptor,
            get: Box::new(get),
            set: Box::new(set),
        });
        self
    }

    /// Validate the bindings and build the codec.
    ///
    /// Fails if any descriptor is invalid, two bindings share a property
    /// name, or the namespace or id binding is missing.
    pub fn build(self) -> Result<DocumentCodec<T>> {
        let mut schema_builder = SchemaBuilder::new(self.schema_name.clone());
        for binding in &self.properties {
            schema_builder = schema_builder.add_property(binding.descriptor.clone())?;
        }
        let schema = schema_builder.build()?;

        let (namespace_get, namespace_set) = self.namespace.ok_or_else(|| {
            VellumError::schema(format!(
                "codec for '{}' has no namespace accessor",
                self.schema_name
            ))
        })?;
        let (id_get, id_set) = self.id.ok_or_else(|| {
            VellumError::schema(format!("codec for '{}' has no id accessor", self.schema_name))
        })?;

        Ok(DocumentCodec {
            schema,
            config: self.config,
            factory: self.factory,
            namespace_get,
            namespace_set,
            id_get,
            id_set,
            properties: self.properties,
        })
    }
}
