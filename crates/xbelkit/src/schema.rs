//! Schema component registry

pub mod component;
pub mod name;
pub mod registry;

pub use component::{
    AttributeDecl, AttributeGroup, Component, Compositor, ConstraintKind, ElementDecl,
    IdentityConstraint, ModelGroup, Notation, TypeDefinition, TypeKind,
};
pub use name::QName;
pub use registry::{SchemaRegistry, MERGED_PREFIX};
