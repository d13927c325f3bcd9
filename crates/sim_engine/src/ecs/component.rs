//! Component trait and the closed set of component kinds
//!
//! Every attachable behaviour implements [`Component`]. The kinds are known
//! at compile time, so an entity's [`ComponentStore`] keeps one optional slot
//! per kind and typed lookups are plain field accesses.

use std::fmt;

use super::components::{RigidBody, Transform};
use super::data::ComponentData;
use super::{ComponentError, Entity};

/// Tag for each concrete component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// Spatial transform
    Transform,
    /// Rigid-body dynamics
    RigidBody,
}

impl ComponentKind {
    /// Every kind, in storage order
    pub const ALL: [Self; 2] = [Self::Transform, Self::RigidBody];

    /// Stable type name used at the persistence boundary
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Transform => "Transform",
            Self::RigidBody => "RigidBody",
        }
    }

    /// Resolve a stable type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// State shared by every component: owning entity and enabled flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentBase {
    owner: Option<Entity>,
    enabled: bool,
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self {
            owner: None,
            enabled: true,
        }
    }
}

impl ComponentBase {
    pub(crate) fn set_owner(&mut self, owner: Option<Entity>) {
        self.owner = owner;
    }

    pub(crate) fn write(&self, data: &mut ComponentData) {
        data.set("enabled", self.enabled);
    }

    pub(crate) fn read(&mut self, data: &ComponentData) -> Result<(), ComponentError> {
        data.read_bool("enabled", &mut self.enabled)
    }
}

/// Lifecycle and persistence contract for attachable behaviours
pub trait Component: Clone + fmt::Debug + 'static {
    /// Kind tag of this component type
    const KIND: ComponentKind;

    /// Shared component state
    fn base(&self) -> &ComponentBase;

    /// Mutable shared component state
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Entity this component is attached to
    fn owner(&self) -> Option<Entity> {
        self.base().owner
    }

    /// Whether the component participates in updates
    fn is_enabled(&self) -> bool {
        self.base().enabled
    }

    /// Toggle the component, firing `on_enable`/`on_disable` on an actual change
    fn set_enabled(&mut self, enabled: bool) {
        if self.base().enabled == enabled {
            return;
        }
        self.base_mut().enabled = enabled;
        if enabled {
            self.on_enable();
        } else {
            self.on_disable();
        }
    }

    /// Called after the component has been attached to `owner`
    fn on_attach(&mut self, _owner: Entity) {}

    /// Called before the component is removed from its entity
    fn on_detach(&mut self) {}

    /// Called when the component becomes enabled
    fn on_enable(&mut self) {}

    /// Called when the component becomes disabled
    fn on_disable(&mut self) {}

    /// Copy this component for attachment to another entity
    fn clone_for(&self, new_owner: Entity) -> Self {
        let mut copy = self.clone();
        copy.base_mut().set_owner(Some(new_owner));
        copy
    }

    /// Flatten the component into primitive fields
    fn serialize(&self) -> ComponentData;

    /// Overwrite fields present in `data`; absent fields keep their value
    fn deserialize(&mut self, data: &ComponentData) -> Result<(), ComponentError>;

    /// Typed slot lookup
    fn slot(store: &ComponentStore) -> Option<&Self>;

    /// Typed mutable slot lookup
    fn slot_mut(store: &mut ComponentStore) -> &mut Option<Self>;

    /// Wrap into the kind-tagged sum type
    fn into_any(self) -> AnyComponent;
}

/// A component of any kind
#[derive(Debug, Clone)]
pub enum AnyComponent {
    /// Transform component
    Transform(Transform),
    /// Rigid-body component
    RigidBody(RigidBody),
}

impl AnyComponent {
    /// Kind tag of the wrapped component
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::RigidBody(_) => ComponentKind::RigidBody,
        }
    }

    /// Serialize the wrapped component
    pub fn serialize(&self) -> ComponentData {
        match self {
            Self::Transform(component) => component.serialize(),
            Self::RigidBody(component) => component.serialize(),
        }
    }

    /// Copy the wrapped component for attachment to `new_owner`
    pub fn clone_for(&self, new_owner: Entity) -> Self {
        match self {
            Self::Transform(component) => Self::Transform(component.clone_for(new_owner)),
            Self::RigidBody(component) => Self::RigidBody(component.clone_for(new_owner)),
        }
    }
}

/// One optional slot per component kind
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    transform: Option<Transform>,
    rigid_body: Option<RigidBody>,
}

impl ComponentStore {
    /// Typed lookup
    pub fn get<T: Component>(&self) -> Option<&T> {
        T::slot(self)
    }

    /// Typed mutable lookup
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        T::slot_mut(self).as_mut()
    }

    /// Whether a component of `kind` is attached
    pub fn contains(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.transform.is_some(),
            ComponentKind::RigidBody => self.rigid_body.is_some(),
        }
    }

    /// Kinds currently attached, in storage order
    pub fn kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Whether no component is attached
    pub fn is_empty(&self) -> bool {
        self.transform.is_none() && self.rigid_body.is_none()
    }

    /// Attached components as kind-tagged copies
    pub fn to_any(&self) -> Vec<AnyComponent> {
        let mut components = Vec::new();
        if let Some(transform) = &self.transform {
            components.push(AnyComponent::Transform(transform.clone()));
        }
        if let Some(body) = &self.rigid_body {
            components.push(AnyComponent::RigidBody(body.clone()));
        }
        components
    }

    /// Transform and rigid body of the same entity, borrowed together
    pub(crate) fn body_parts_mut(&mut self) -> Option<(&mut Transform, &mut RigidBody)> {
        match (self.transform.as_mut(), self.rigid_body.as_mut()) {
            (Some(transform), Some(body)) => Some((transform, body)),
            _ => None,
        }
    }

    /// Run `on_detach` on every component and empty the store
    pub(crate) fn detach_all(&mut self) {
        if let Some(mut transform) = self.transform.take() {
            detach(&mut transform);
        }
        if let Some(mut body) = self.rigid_body.take() {
            detach(&mut body);
        }
    }
}

/// Bind a component to `owner` and fire its attach hook
pub(crate) fn attach<T: Component>(component: &mut T, owner: Entity) {
    component.base_mut().set_owner(Some(owner));
    component.on_attach(owner);
}

/// Fire a component's detach hook and clear its owner
pub(crate) fn detach<T: Component>(component: &mut T) {
    component.on_detach();
    component.base_mut().set_owner(None);
}

impl Component for Transform {
    const KIND: ComponentKind = ComponentKind::Transform;

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn serialize(&self) -> ComponentData {
        self.to_data()
    }

    fn deserialize(&mut self, data: &ComponentData) -> Result<(), ComponentError> {
        self.apply_data(data)
    }

    fn slot(store: &ComponentStore) -> Option<&Self> {
        store.transform.as_ref()
    }

    fn slot_mut(store: &mut ComponentStore) -> &mut Option<Self> {
        &mut store.transform
    }

    fn into_any(self) -> AnyComponent {
        AnyComponent::Transform(self)
    }
}

impl Component for RigidBody {
    const KIND: ComponentKind = ComponentKind::RigidBody;

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_detach(&mut self) {
        self.clear_accumulators();
    }

    fn on_disable(&mut self) {
        self.clear_accumulators();
    }

    fn serialize(&self) -> ComponentData {
        self.to_data()
    }

    fn deserialize(&mut self, data: &ComponentData) -> Result<(), ComponentError> {
        self.apply_data(data)
    }

    fn slot(store: &ComponentStore) -> Option<&Self> {
        store.rigid_body.as_ref()
    }

    fn slot_mut(store: &mut ComponentStore) -> &mut Option<Self> {
        &mut store.rigid_body
    }

    fn into_any(self) -> AnyComponent {
        AnyComponent::RigidBody(self)
    }
}
