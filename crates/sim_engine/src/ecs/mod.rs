//! Entity-Component-System implementation
//!
//! Entities live in a dense arena owned by [`World`], indexed by their
//! monotonic id. Components are a closed set of kinds stored per entity;
//! systems are open trait objects scheduled by priority.

pub mod entity;
pub mod component;
pub mod data;
pub mod registry;
pub mod system;
pub mod world;
pub mod components;


pub use entity::{Entity, EntityRecord};
pub use component::{AnyComponent, Component, ComponentBase, ComponentKind, ComponentStore};
pub use data::{ComponentData, FieldValue};
pub use registry::{ComponentFactory, ComponentRegistry};
pub use system::{System, SystemManager};
pub use world::{World, WorldError};

/// Errors raised while converting components to and from [`ComponentData`]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// A field holds a value of the wrong type
    #[error("field `{field}` should be {expected}")]
    TypeMismatch {
        /// Field key
        field: String,
        /// Human readable expected type
        expected: &'static str,
    },

    /// A field holds a value outside its allowed set
    #[error("field `{field}` has invalid value `{value}`")]
    InvalidValue {
        /// Field key
        field: String,
        /// Offending value
        value: String,
    },

    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(String),

    /// No factory is registered for a type name
    #[error("unknown component type `{0}`")]
    UnknownComponent(String),
}
