//! ECS World implementation
//!
//! The world owns every entity record in a dense arena indexed by entity id.
//! Ids are monotonic and never reused; a destroyed entity leaves an empty
//! slot behind. Root list, tag index and name index are maintained
//! incrementally by every structural mutation.

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

use super::component::{attach, detach, AnyComponent, Component, ComponentKind};
use super::components::{ForceMode, RigidBody, Transform};
use super::entity::{Entity, EntityRecord};
use super::system::{System, SystemManager};
use crate::core::config::SchedulerConfig;
use crate::foundation::math::{utils, Mat4, Vec3};

/// Errors from structural world operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The handle does not refer to a live entity
    #[error("unknown entity {0}")]
    UnknownEntity(Entity),

    /// The requested parent is the entity itself or one of its descendants
    #[error("making {parent} the parent of {child} would create a cycle")]
    HierarchyCycle {
        /// Entity being re-parented
        child: Entity,
        /// Rejected parent
        parent: Entity,
    },
}

/// System change requested while the manager is lent out for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingSystemOp {
    SetEnabled(TypeId, bool),
    Remove(TypeId),
}

/// ECS World containing all entities, their components and the systems
#[derive(Debug, Default)]
pub struct World {
    next_entity_id: u32,
    entities: Vec<Option<EntityRecord>>,
    live_count: usize,
    roots: Vec<Entity>,
    tag_index: HashMap<String, BTreeSet<Entity>>,
    name_index: HashMap<String, BTreeSet<Entity>>,
    systems: SystemManager,
    lent_systems: Vec<TypeId>,
    pending_system_ops: Vec<PendingSystemOp>,
}

fn index_insert(index: &mut HashMap<String, BTreeSet<Entity>>, key: &str, entity: Entity) {
    index.entry(key.to_owned()).or_default().insert(entity);
}

fn index_remove(index: &mut HashMap<String, BTreeSet<Entity>>, key: &str, entity: Entity) {
    if let Some(set) = index.get_mut(key) {
        set.remove(&entity);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world whose scheduler uses `config`
    pub fn with_config(config: &SchedulerConfig) -> Self {
        Self {
            systems: SystemManager::new(config),
            ..Self::default()
        }
    }

    // ----------------------------------------------------------------------
    // Entities
    // ----------------------------------------------------------------------

    /// Create a new root entity
    ///
    /// Once the id space is exhausted the returned handle is never alive.
    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        let Some(next) = self.next_entity_id.checked_add(1) else {
            log::warn!("Entity ids exhausted; {entity} was not created");
            return entity;
        };
        self.next_entity_id = next;

        let record = EntityRecord::new(name.into());
        index_insert(&mut self.name_index, &record.name, entity);
        self.entities.push(Some(record));
        self.roots.push(entity);
        self.live_count += 1;
        entity
    }

    fn record(&self, entity: Entity) -> Option<&EntityRecord> {
        self.entities.get(entity.index()).and_then(Option::as_ref)
    }

    fn record_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        self.entities.get_mut(entity.index()).and_then(Option::as_mut)
    }

    fn require(&self, entity: Entity) -> Result<&EntityRecord, WorldError> {
        self.record(entity).ok_or(WorldError::UnknownEntity(entity))
    }

    /// Whether `entity` refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.record(entity).is_some()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.live_count
    }

    /// Live entities in ascending id order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().enumerate().filter_map(|(index, record)| {
            record.as_ref().and(u32::try_from(index).ok()).map(Entity::new)
        })
    }

    /// Full record of a live entity
    pub fn entity(&self, entity: Entity) -> Option<&EntityRecord> {
        self.record(entity)
    }

    /// Display name of an entity
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.record(entity).map(EntityRecord::name)
    }

    /// Rename an entity, keeping the name index current
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(record) = self.entities.get_mut(entity.index()).and_then(Option::as_mut) else {
            return false;
        };
        let old = std::mem::replace(&mut record.name, name.clone());
        index_remove(&mut self.name_index, &old, entity);
        index_insert(&mut self.name_index, &name, entity);
        true
    }

    /// Whether an entity is live and active
    pub fn is_active(&self, entity: Entity) -> bool {
        self.record(entity).is_some_and(EntityRecord::is_active)
    }

    /// Activate or deactivate an entity; inactive entities are not simulated
    pub fn set_active(&mut self, entity: Entity, active: bool) -> bool {
        match self.record_mut(entity) {
            Some(record) => {
                record.active = active;
                true
            }
            None => false,
        }
    }

    // ----------------------------------------------------------------------
    // Tags and lookups
    // ----------------------------------------------------------------------

    /// Add a tag; returns false if the entity is unknown or already tagged
    pub fn add_tag(&mut self, entity: Entity, tag: &str) -> bool {
        let Some(record) = self.entities.get_mut(entity.index()).and_then(Option::as_mut) else {
            return false;
        };
        if !record.tags.insert(tag.to_owned()) {
            return false;
        }
        index_insert(&mut self.tag_index, tag, entity);
        true
    }

    /// Remove a tag; returns false if the tag was not present
    pub fn remove_tag(&mut self, entity: Entity, tag: &str) -> bool {
        let Some(record) = self.entities.get_mut(entity.index()).and_then(Option::as_mut) else {
            return false;
        };
        if !record.tags.remove(tag) {
            return false;
        }
        index_remove(&mut self.tag_index, tag, entity);
        true
    }

    /// Whether an entity carries `tag`
    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.record(entity).is_some_and(|record| record.tags.contains(tag))
    }

    /// Tags of an entity
    pub fn tags(&self, entity: Entity) -> Option<&BTreeSet<String>> {
        self.record(entity).map(EntityRecord::tags)
    }

    /// Entities carrying `tag`, ascending id
    pub fn find_by_tag(&self, tag: &str) -> Vec<Entity> {
        self.tag_index
            .get(tag)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Entities named `name`, ascending id
    pub fn find_by_name(&self, name: &str) -> Vec<Entity> {
        self.name_index
            .get(name)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Oldest entity named `name`
    pub fn first_by_name(&self, name: &str) -> Option<Entity> {
        self.name_index.get(name)?.first().copied()
    }

    // ----------------------------------------------------------------------
    // Hierarchy
    // ----------------------------------------------------------------------

    /// Parent of an entity
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.record(entity)?.parent
    }

    /// Children of an entity in attachment order
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.record(entity)
            .map(EntityRecord::children)
            .unwrap_or_default()
    }

    /// Entities without a parent, in creation/detach order
    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    /// Whether `ancestor` is a strict ancestor of `entity`
    pub fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.parent(entity);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Attach `child` under `parent`, or make it a root with `None`
    ///
    /// Rejects a parent that is the child itself or one of its descendants.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), WorldError> {
        let current = self.require(child)?.parent;
        if let Some(parent) = parent {
            self.require(parent)?;
            if parent == child || self.is_ancestor(child, parent) {
                log::warn!("Rejected parenting {child} under {parent}: would create a cycle");
                return Err(WorldError::HierarchyCycle { child, parent });
            }
        }
        if current == parent {
            return Ok(());
        }

        self.unlink(child, current);
        match parent {
            Some(parent) => {
                if let Some(record) = self.record_mut(parent) {
                    record.children.push(child);
                }
            }
            None => self.roots.push(child),
        }
        if let Some(record) = self.record_mut(child) {
            record.parent = parent;
        }
        Ok(())
    }

    fn unlink(&mut self, child: Entity, parent: Option<Entity>) {
        match parent {
            Some(parent) => {
                if let Some(record) = self.record_mut(parent) {
                    record.children.retain(|entity| *entity != child);
                }
            }
            None => self.roots.retain(|entity| *entity != child),
        }
    }

    /// Every descendant of `entity`, depth first, parents before children
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut result = Vec::new();
        let mut stack: Vec<Entity> = self.children(entity).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        result
    }

    // ----------------------------------------------------------------------
    // Components
    // ----------------------------------------------------------------------

    /// Attach a component
    ///
    /// An entity holds at most one component of each kind: attaching a
    /// second one is logged and the existing component is returned untouched.
    pub fn add_component<T: Component>(&mut self, entity: Entity, mut component: T) -> Option<&mut T> {
        let Some(record) = self.record_mut(entity) else {
            log::warn!("Cannot add {} to unknown {entity}", T::KIND);
            return None;
        };
        let slot = T::slot_mut(&mut record.components);
        if slot.is_some() {
            log::warn!("{entity} already has a {} component", T::KIND);
            return slot.as_mut();
        }
        attach(&mut component, entity);
        Some(slot.insert(component))
    }

    /// Attach a kind-tagged component
    pub fn attach_any(&mut self, entity: Entity, component: AnyComponent) -> bool {
        match component {
            AnyComponent::Transform(transform) => self.add_component(entity, transform).is_some(),
            AnyComponent::RigidBody(body) => self.add_component(entity, body).is_some(),
        }
    }

    /// Borrow a component
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.record(entity)?.components.get::<T>()
    }

    /// Mutably borrow a component
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.record_mut(entity)?.components.get_mut::<T>()
    }

    /// Whether an entity carries a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Detach and return a component
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let mut component = T::slot_mut(&mut self.record_mut(entity)?.components).take()?;
        detach(&mut component);
        Some(component)
    }

    /// Kinds attached to an entity
    pub fn component_kinds(&self, entity: Entity) -> Vec<ComponentKind> {
        self.record(entity)
            .map(|record| record.components.kinds())
            .unwrap_or_default()
    }

    /// Live entities carrying every kind in `kinds`, ascending id
    pub fn entities_with_components(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        self.entities()
            .filter(|entity| {
                self.record(*entity).is_some_and(|record| {
                    kinds.iter().all(|kind| record.components.contains(*kind))
                })
            })
            .collect()
    }

    pub(crate) fn body_parts_mut(&mut self, entity: Entity) -> Option<(&mut Transform, &mut RigidBody)> {
        self.record_mut(entity)?.components.body_parts_mut()
    }

    // ----------------------------------------------------------------------
    // Spatial queries
    // ----------------------------------------------------------------------

    /// World matrix of an entity's Transform
    ///
    /// The parent's world matrix is applied when the parent has a Transform;
    /// otherwise the local matrix is returned as is.
    pub fn world_matrix(&self, entity: Entity) -> Option<Mat4> {
        let record = self.record(entity)?;
        let transform = record.components.get::<Transform>()?;
        let parent_world = record.parent.and_then(|parent| self.world_matrix(parent));
        Some(transform.world_matrix(parent_world.as_ref()))
    }

    /// World-space position of an entity's Transform
    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        self.world_matrix(entity).map(|matrix| utils::translation_of(&matrix))
    }

    /// Apply a force at a world-space point to an entity's rigid body
    pub fn add_force_at_position(
        &mut self,
        entity: Entity,
        force: Vec3,
        point: Vec3,
        mode: ForceMode,
    ) -> bool {
        let Some(body_position) = self.world_position(entity) else {
            return false;
        };
        match self.get_component_mut::<RigidBody>(entity) {
            Some(body) => {
                body.add_force_at_position(force, point, body_position, mode);
                true
            }
            None => false,
        }
    }

    // ----------------------------------------------------------------------
    // Lifecycle
    // ----------------------------------------------------------------------

    /// Destroy an entity and its whole subtree
    ///
    /// Children go first. Every component receives `on_detach` before the
    /// entity is unlinked from its parent and removed from the indices.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let Some(record) = self.record(entity) else {
            return false;
        };
        for child in record.children.clone() {
            self.destroy(child);
        }

        let Some(mut record) = self.entities.get_mut(entity.index()).and_then(Option::take) else {
            return false;
        };
        record.components.detach_all();
        self.unlink(entity, record.parent);
        index_remove(&mut self.name_index, &record.name, entity);
        for tag in &record.tags {
            index_remove(&mut self.tag_index, tag, entity);
        }
        record.active = false;
        self.live_count -= 1;
        log::debug!("Destroyed {entity} ({})", record.name);
        true
    }

    /// Copy an entity as a new root
    ///
    /// Tags, active flag and components are copied; components are cloned
    /// against the new entity and receive `on_attach`. A deep clone also
    /// copies the child subtree beneath the new entity.
    pub fn clone_entity(&mut self, entity: Entity, deep: bool) -> Option<Entity> {
        let source = self.record(entity)?.clone();
        let copy = self.create_entity(source.name.clone());
        self.set_active(copy, source.active);
        for tag in &source.tags {
            self.add_tag(copy, tag);
        }
        for component in source.components.to_any() {
            self.attach_any(copy, component.clone_for(copy));
        }

        if deep {
            for child in &source.children {
                let Some(child_copy) = self.clone_entity(*child, true) else {
                    continue;
                };
                if let Err(err) = self.set_parent(child_copy, Some(copy)) {
                    log::warn!("Failed to attach cloned child {child_copy}: {err}");
                }
            }
        }
        Some(copy)
    }

    // ----------------------------------------------------------------------
    // Systems
    // ----------------------------------------------------------------------

    /// Register a system and run its `on_added` hook
    ///
    /// A second system of the same type is rejected before `on_added` runs,
    /// including while the registered one is running its frame.
    pub fn add_system<S: System>(&mut self, mut system: S) -> bool {
        if self.systems.contains::<S>() || self.lent_systems.contains(&TypeId::of::<S>()) {
            log::warn!("System {} is already registered", system.name());
            return false;
        }
        system.on_added(self);
        self.systems.add(system)
    }

    /// Unregister a system and run its `on_removed` hook
    ///
    /// Called from inside a frame, the removal is deferred until the frame
    /// ends and `None` is returned.
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let type_id = TypeId::of::<S>();
        if !self.systems.contains::<S>() && self.lent_systems.contains(&type_id) {
            log::debug!(
                "Deferring removal of {} to the end of the frame",
                std::any::type_name::<S>()
            );
            self.pending_system_ops.push(PendingSystemOp::Remove(type_id));
            return None;
        }
        let mut system = self.systems.remove::<S>()?;
        system.on_removed(self);
        Some(system)
    }

    /// Borrow a system by type
    pub fn system<S: System>(&self) -> Option<&S> {
        self.systems.get::<S>()
    }

    /// Mutably borrow a system by type
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Enable or disable a system by type
    ///
    /// Called from inside a frame, the change applies once the frame ends.
    pub fn set_system_enabled<S: System>(&mut self, enabled: bool) -> bool {
        let type_id = TypeId::of::<S>();
        if !self.systems.contains::<S>() && self.lent_systems.contains(&type_id) {
            self.pending_system_ops.push(PendingSystemOp::SetEnabled(type_id, enabled));
            return true;
        }
        self.systems.set_enabled::<S>(enabled)
    }

    /// The system manager
    pub fn systems(&self) -> &SystemManager {
        &self.systems
    }

    /// Mutable access to the system manager
    pub fn systems_mut(&mut self) -> &mut SystemManager {
        &mut self.systems
    }

    /// Run one frame of every enabled system
    ///
    /// The system manager is lent out of the world for the duration of the
    /// frame so systems can receive `&mut World`. Systems added during the
    /// frame are merged back afterwards, then enable, disable and remove
    /// requests made during the frame are applied in order. While the frame
    /// runs, lookups of other systems through the world find nothing.
    pub fn update(&mut self, delta_time: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        self.lent_systems = systems.type_ids();
        systems.update(self, delta_time);
        self.lent_systems.clear();

        let added = std::mem::replace(&mut self.systems, systems);
        self.systems.absorb(added);
        self.apply_pending_system_ops();
    }

    fn apply_pending_system_ops(&mut self) {
        for op in std::mem::take(&mut self.pending_system_ops) {
            match op {
                PendingSystemOp::SetEnabled(type_id, enabled) => {
                    self.systems.set_enabled_by_id(type_id, enabled);
                }
                PendingSystemOp::Remove(type_id) => {
                    if let Some(mut system) = self.systems.remove_by_id(type_id) {
                        system.on_removed(self);
                    }
                }
            }
        }
    }
}
