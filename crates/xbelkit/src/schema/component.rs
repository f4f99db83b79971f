//! Schema component categories held by the registry

use crate::schema::name::QName;

/// Anything the registry can key by qualified name
pub trait Component {
    fn name(&self) -> &QName;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDecl {
    pub name: QName,
    pub type_name: Option<QName>,
}

impl ElementDecl {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            type_name: None,
        }
    }

    pub fn with_type(mut self, type_name: QName) -> Self {
        self.type_name = Some(type_name);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: QName,
    pub type_name: Option<QName>,
}

impl AttributeDecl {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            type_name: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Simple,
    Complex,
}

/// Simple or complex type definition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: QName,
    pub kind: TypeKind,
    /// False for built-in types the schema only references
    pub defined_by_schema: bool,
}

impl TypeDefinition {
    pub fn simple(name: QName) -> Self {
        Self {
            name,
            kind: TypeKind::Simple,
            defined_by_schema: true,
        }
    }

    pub fn complex(name: QName) -> Self {
        Self {
            name,
            kind: TypeKind::Complex,
            defined_by_schema: true,
        }
    }

    pub fn built_in(mut self) -> Self {
        self.defined_by_schema = false;
        self
    }

    pub fn is_simple(&self) -> bool {
        self.kind == TypeKind::Simple
    }

    pub fn is_complex(&self) -> bool {
        self.kind == TypeKind::Complex
    }

    pub fn is_defined_by_schema(&self) -> bool {
        self.defined_by_schema
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeGroup {
    pub name: QName,
    pub attributes: Vec<QName>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compositor {
    Sequence,
    Choice,
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelGroup {
    pub name: QName,
    pub compositor: Compositor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notation {
    pub name: QName,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Key,
    KeyRef,
    Unique,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityConstraint {
    pub name: QName,
    pub kind: ConstraintKind,
    /// XPath selecting the constrained elements
    pub selector: String,
}

impl Component for ElementDecl {
    fn name(&self) -> &QName {
        &self.name
    }
}

impl Component for AttributeDecl {
    fn name(&self) -> &QName {
        &self.name
    }
}

impl Component for TypeDefinition {
    fn name(&self) -> &QName {
        &self.name
    }
}

impl Component for AttributeGroup {
    fn name(&self) -> &QName {
        &self.name
    }
}

impl Component for ModelGroup {
    fn name(&self) -> &QName {
        &self.name
    }
}

impl Component for Notation {
    fn name(&self) -> &QName {
        &self.name
    }
}

impl Component for IdentityConstraint {
    fn name(&self) -> &QName {
        &self.name
    }
}
