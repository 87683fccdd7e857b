//! Transitive resolution of document-reference dependencies.
//!
//! Registration and packaging logic needs to know every schema a document
//! type pulls in through its document-reference properties, so that nested
//! schemas can be registered before the root type is used. This module
//! walks that reference graph. Conversion itself never calls it; encode and
//! decode resolve references lazily through the codec registry.

use ahash::AHashSet;

use crate::error::{Result, VellumError};
use crate::schema::property::PropertyDescriptor;
use crate::schema::schema::Schema;

/// Source of schemas during dependency resolution.
///
/// Implemented by the codec registry; tests can substitute a plain map.
pub trait SchemaProvider {
    /// Get the schema registered under a type identifier, if any.
    fn schema(&self, type_id: &str) -> Option<Schema>;
}

/// Compute the transitive closure of document-reference schemas.
///
/// Walks the reference graph depth-first in property order and returns each
/// reachable schema name exactly once, dependencies before dependents
/// whenever the graph is acyclic. Self- and mutual-reference cycles are
/// legal: the visited set guarantees termination, and the root's own name
/// appears in the result iff the graph reaches back to it. A referenced
/// schema that is neither the root nor known to the provider fails with
/// [`VellumError::UnknownSchema`].
pub fn dependency_document_types(
    root: &Schema,
    provider: &dyn SchemaProvider,
) -> Result<Vec<String>> {
    let mut resolver = Resolver {
        root,
        provider,
        seen: AHashSet::new(),
        ordered: Vec::new(),
    };
    for descriptor in root.document_properties() {
        resolver.visit_descriptor(descriptor)?;
    }
    Ok(resolver.ordered)
}

struct Resolver<'a> {
    root: &'a Schema,
    provider: &'a dyn SchemaProvider,
    seen: AHashSet<String>,
    ordered: Vec<String>,
}

impl Resolver<'_> {
    fn visit_descriptor(&mut self, descriptor: &PropertyDescriptor) -> Result<()> {
        if let Some(schema_type) = descriptor.schema_type() {
            self.visit(schema_type)?;
        }
        Ok(())
    }

    fn visit(&mut self, name: &str) -> Result<()> {
        if self.seen.contains(name) {
            return Ok(());
        }
        self.seen.insert(name.to_string());

        // The root itself may not be registered yet; resolve it from the
        // argument so self-referential schemas work before registration.
        let schema = if name == self.root.name() {
            self.root.clone()
        } else {
            self.provider
                .schema(name)
                .ok_or_else(|| VellumError::unknown_schema(name))?
        };

        for descriptor in schema.document_properties() {
            self.visit_descriptor(descriptor)?;
        }

        // Post-order emission puts dependencies ahead of their dependents.
        self.ordered.push(name.to_string());
        Ok(())
    }
}
