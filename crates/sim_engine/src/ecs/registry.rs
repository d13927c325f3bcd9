//! Type-name → constructor table for the deserialization boundary
//!
//! Persistence code only knows a component by its stable type name. The
//! registry turns a name plus [`ComponentData`] back into a typed component.
//! It is populated once at startup and never consulted by the simulation
//! loop.

use std::collections::BTreeMap;

use super::component::{AnyComponent, Component};
use super::data::ComponentData;
use super::ComponentError;

/// Builds a component from its serialized fields
pub type ComponentFactory = fn(&ComponentData) -> Result<AnyComponent, ComponentError>;

/// Registry of component factories keyed by type name
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    factories: BTreeMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every built-in component
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<crate::ecs::components::Transform>();
        registry.register::<crate::ecs::components::RigidBody>();
        registry
    }

    /// Register a default-constructible component under its kind name
    pub fn register<T: Component + Default>(&mut self) {
        self.register_named(T::KIND.type_name(), build_default::<T>);
    }

    /// Register a factory under an explicit name (e.g. a legacy alias)
    pub fn register_named(&mut self, name: impl Into<String>, factory: ComponentFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            log::debug!("Replaced component factory `{name}`");
        }
    }

    /// Whether a factory exists for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Construct a component from its type name and fields
    pub fn create(&self, name: &str, data: &ComponentData) -> Result<AnyComponent, ComponentError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ComponentError::UnknownComponent(name.to_owned()))?;
        factory(data)
    }
}

fn build_default<T: Component + Default>(data: &ComponentData) -> Result<AnyComponent, ComponentError> {
    let mut component = T::default();
    component.deserialize(data)?;
    Ok(component.into_any())
}
