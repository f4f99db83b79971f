//! Concurrent schema component registry

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::schema::component::{
    AttributeDecl, AttributeGroup, Component, ElementDecl, IdentityConstraint, ModelGroup,
    Notation, TypeDefinition,
};
use crate::schema::name::QName;

/// Prefix applied to an anonymous type's key while it collides
pub const MERGED_PREFIX: &str = "merged_";

#[derive(Debug)]
struct Category<T> {
    entries: HashMap<QName, Arc<T>>,
}

impl<T> Default for Category<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Category<T> {
    fn insert(&mut self, key: QName, component: Arc<T>) {
        self.entries.insert(key, component);
    }

    fn get(&self, key: &QName) -> Option<Arc<T>> {
        self.entries.get(key).map(Arc::clone)
    }

    fn contains(&self, key: &QName) -> bool {
        self.entries.contains_key(key)
    }

    fn values(&self) -> Vec<Arc<T>> {
        self.entries.values().map(Arc::clone).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: Component> Category<T> {
    fn add(&mut self, component: Arc<T>) {
        trace!(name = %component.name(), "registering schema component");
        self.insert(component.name().clone(), component);
    }
}

#[derive(Debug, Default)]
struct Components {
    target_namespace: String,
    elements: Category<ElementDecl>,
    attributes: Category<AttributeDecl>,
    types: Category<TypeDefinition>,
    anonymous_types: Category<TypeDefinition>,
    attribute_groups: Category<AttributeGroup>,
    model_groups: Category<ModelGroup>,
    notations: Category<Notation>,
    identity_constraints: Category<IdentityConstraint>,
}

/// Thread-safe registry of named schema components
///
/// Every category has its own key space, so an element and a type may share
/// a qualified name. All categories sit behind one reader/writer lock:
/// lookups and listings share it, additions take it exclusively. The lock is
/// eventually fair, so a stream of readers cannot starve a writer.
///
/// Registries are plain values; share one between threads with `Arc`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    inner: RwLock<Components>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_namespace(&self) -> String {
        self.inner.read().target_namespace.clone()
    }

    pub fn set_target_namespace(&self, namespace: impl Into<String>) {
        self.inner.write().target_namespace = namespace.into();
    }

    pub fn add_element(&self, element: impl Into<Arc<ElementDecl>>) {
        self.inner.write().elements.add(element.into());
    }

    pub fn get_element(&self, name: &QName) -> Option<Arc<ElementDecl>> {
        self.inner.read().elements.get(name)
    }

    pub fn list_elements(&self) -> Vec<Arc<ElementDecl>> {
        self.inner.read().elements.values()
    }

    pub fn add_attribute(&self, attribute: impl Into<Arc<AttributeDecl>>) {
        self.inner.write().attributes.add(attribute.into());
    }

    pub fn get_attribute(&self, name: &QName) -> Option<Arc<AttributeDecl>> {
        self.inner.read().attributes.get(name)
    }

    pub fn list_attributes(&self) -> Vec<Arc<AttributeDecl>> {
        self.inner.read().attributes.values()
    }

    pub fn add_type(&self, ty: impl Into<Arc<TypeDefinition>>) {
        self.inner.write().types.add(ty.into());
    }

    pub fn get_type(&self, name: &QName) -> Option<Arc<TypeDefinition>> {
        self.inner.read().types.get(name)
    }

    pub fn list_types(&self) -> Vec<Arc<TypeDefinition>> {
        self.inner.read().types.values()
    }

    /// Simple types defined by the schema itself (built-ins excluded)
    pub fn simple_types(&self) -> Vec<Arc<TypeDefinition>> {
        self.types_where(TypeDefinition::is_simple)
    }

    /// Complex types defined by the schema itself (built-ins excluded)
    pub fn complex_types(&self) -> Vec<Arc<TypeDefinition>> {
        self.types_where(TypeDefinition::is_complex)
    }

    fn types_where(&self, kind: fn(&TypeDefinition) -> bool) -> Vec<Arc<TypeDefinition>> {
        self.inner
            .read()
            .types
            .entries
            .values()
            .filter(|ty| kind(ty) && ty.is_defined_by_schema())
            .map(Arc::clone)
            .collect()
    }

    /// Register an anonymous type without ever replacing an existing one.
    ///
    /// The key starts as the type's own name and gains another
    /// [`MERGED_PREFIX`] for every collision (`Foo`, `merged_Foo`,
    /// `merged_merged_Foo`, ...). Returns the key the type was stored under.
    pub fn add_anonymous_type(&self, ty: impl Into<Arc<TypeDefinition>>) -> QName {
        let ty = ty.into();
        let mut guard = self.inner.write();
        let mut key = ty.name.clone();
        while guard.anonymous_types.contains(&key) {
            key = key.with_local_prefix(MERGED_PREFIX);
        }
        if key != ty.name {
            debug!(name = %ty.name, %key, "anonymous type name taken, stored under merged key");
        }
        guard.anonymous_types.insert(key.clone(), ty);
        key
    }

    pub fn get_anonymous_type(&self, key: &QName) -> Option<Arc<TypeDefinition>> {
        self.inner.read().anonymous_types.get(key)
    }

    pub fn list_anonymous_types(&self) -> Vec<Arc<TypeDefinition>> {
        self.inner.read().anonymous_types.values()
    }

    pub fn add_attribute_group(&self, group: impl Into<Arc<AttributeGroup>>) {
        self.inner.write().attribute_groups.add(group.into());
    }

    pub fn get_attribute_group(&self, name: &QName) -> Option<Arc<AttributeGroup>> {
        self.inner.read().attribute_groups.get(name)
    }

    pub fn list_attribute_groups(&self) -> Vec<Arc<AttributeGroup>> {
        self.inner.read().attribute_groups.values()
    }

    pub fn add_model_group(&self, group: impl Into<Arc<ModelGroup>>) {
        self.inner.write().model_groups.add(group.into());
    }

    pub fn get_model_group(&self, name: &QName) -> Option<Arc<ModelGroup>> {
        self.inner.read().model_groups.get(name)
    }

    pub fn list_model_groups(&self) -> Vec<Arc<ModelGroup>> {
        self.inner.read().model_groups.values()
    }

    pub fn add_notation(&self, notation: impl Into<Arc<Notation>>) {
        self.inner.write().notations.add(notation.into());
    }

    pub fn get_notation(&self, name: &QName) -> Option<Arc<Notation>> {
        self.inner.read().notations.get(name)
    }

    pub fn list_notations(&self) -> Vec<Arc<Notation>> {
        self.inner.read().notations.values()
    }

    pub fn add_identity_constraint(&self, constraint: impl Into<Arc<IdentityConstraint>>) {
        self.inner.write().identity_constraints.add(constraint.into());
    }

    pub fn get_identity_constraint(&self, name: &QName) -> Option<Arc<IdentityConstraint>> {
        self.inner.read().identity_constraints.get(name)
    }

    pub fn list_identity_constraints(&self) -> Vec<Arc<IdentityConstraint>> {
        self.inner.read().identity_constraints.values()
    }

    /// Components across every category
    pub fn len(&self) -> usize {
        let guard = self.inner.read();
        guard.elements.len()
            + guard.attributes.len()
            + guard.types.len()
            + guard.anonymous_types.len()
            + guard.attribute_groups.len()
            + guard.model_groups.len()
            + guard.notations.len()
            + guard.identity_constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::component::{Compositor, ConstraintKind};

    #[test]
    fn test_anonymous_type_keys_never_overwrite() {
        let registry = SchemaRegistry::new();
        let keys: Vec<QName> = (0..3)
            .map(|_| registry.add_anonymous_type(TypeDefinition::complex(QName::local("Foo"))))
            .collect();

        let locals: Vec<&str> = keys.iter().map(QName::local_name).collect();
        assert_eq!(locals, ["Foo", "merged_Foo", "merged_merged_Foo"]);
        for key in &keys {
            assert!(registry.get_anonymous_type(key).is_some());
        }
        assert_eq!(registry.list_anonymous_types().len(), 3);
    }

    #[test]
    fn test_named_add_overwrites() {
        let registry = SchemaRegistry::new();
        let name = QName::new("urn:t", "Item");
        registry.add_element(ElementDecl::new(name.clone()));
        registry.add_element(ElementDecl::new(name.clone()).with_type(QName::local("string")));

        assert_eq!(registry.list_elements().len(), 1);
        assert_eq!(
            registry.get_element(&name).and_then(|e| e.type_name.clone()),
            Some(QName::local("string"))
        );
    }

    #[test]
    fn test_categories_are_independent() {
        let registry = SchemaRegistry::new();
        let name = QName::new("urn:t", "Foo");
        registry.add_element(ElementDecl::new(name.clone()));
        registry.add_type(TypeDefinition::simple(name.clone()));
        registry.add_model_group(ModelGroup {
            name: name.clone(),
            compositor: Compositor::Sequence,
        });

        assert!(registry.get_element(&name).is_some());
        assert!(registry.get_type(&name).is_some());
        assert!(registry.get_model_group(&name).is_some());
        assert!(registry.get_attribute(&name).is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_simple_and_complex_filters() {
        let registry = SchemaRegistry::new();
        registry.add_type(TypeDefinition::simple(QName::local("Code")));
        registry.add_type(TypeDefinition::simple(QName::local("string")).built_in());
        registry.add_type(TypeDefinition::complex(QName::local("Order")));

        let simple: Vec<String> = registry
            .simple_types()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(simple, ["Code"]);
        assert_eq!(registry.complex_types().len(), 1);
        assert_eq!(registry.list_types().len(), 3);
    }

    #[test]
    fn test_remaining_categories() {
        let registry = SchemaRegistry::new();
        let name = QName::local("x");
        registry.add_attribute(AttributeDecl::new(name.clone()));
        registry.add_attribute_group(AttributeGroup {
            name: name.clone(),
            attributes: vec![name.clone()],
        });
        registry.add_notation(Notation {
            name: name.clone(),
            public_id: Some("-//X//EN".to_string()),
            system_id: None,
        });
        registry.add_identity_constraint(IdentityConstraint {
            name: name.clone(),
            kind: ConstraintKind::Unique,
            selector: ".//item".to_string(),
        });

        assert!(registry.get_attribute(&name).is_some());
        assert_eq!(registry.list_attribute_groups().len(), 1);
        assert_eq!(
            registry.get_notation(&name).and_then(|n| n.public_id.clone()),
            Some("-//X//EN".to_string())
        );
        assert_eq!(registry.list_identity_constraints().len(), 1);
        assert!(registry.get_identity_constraint(&QName::local("y")).is_none());
    }

    #[test]
    fn test_target_namespace() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.target_namespace(), "");
        registry.set_target_namespace("urn:books");
        assert_eq!(registry.target_namespace(), "urn:books");
        assert!(registry.is_empty());
    }
}
