//! System trait and the priority-ordered system manager
//!
//! Systems are open trait objects. The manager keeps them sorted by
//! ascending priority (stable, so equal priorities keep insertion order) and
//! drives the three per-frame phases: `update`, then zero or more
//! `fixed_update` calls on its own accumulator, then `late_update`.

use std::any::{Any, TypeId};
use std::fmt;

use super::{ComponentKind, World};
use crate::core::config::SchedulerConfig;
use crate::foundation::time::FixedTimestep;

/// Dynamic-typing bridge for system trait objects
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Convert a boxed value into a boxed `Any`
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Per-frame behaviour unit
///
/// Every hook receives the whole world. Lower `priority` runs first.
pub trait System: AsAny {
    /// Human readable name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Initial scheduling priority
    fn priority(&self) -> i32 {
        0
    }

    /// Component kinds an entity must carry to be processed by this system
    fn required_components(&self) -> &[ComponentKind] {
        &[]
    }

    /// Called once when the system is added to a world
    fn on_added(&mut self, _world: &mut World) {}

    /// Called once after the system is removed from a world
    fn on_removed(&mut self, _world: &mut World) {}

    /// Called once per frame
    fn update(&mut self, _world: &mut World, _delta_time: f32) {}

    /// Called zero or more times per frame with the scheduler's fixed step
    fn fixed_update(&mut self, _world: &mut World, _fixed_delta: f32) {}

    /// Called once per frame after every `update` and `fixed_update`
    fn late_update(&mut self, _world: &mut World, _delta_time: f32) {}
}

struct SystemSlot {
    system: Box<dyn System>,
    type_id: TypeId,
    priority: i32,
    enabled: bool,
}

/// Owner and scheduler of a world's systems
pub struct SystemManager {
    slots: Vec<SystemSlot>,
    fixed_step: FixedTimestep,
}

impl Default for SystemManager {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl fmt::Debug for SystemManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemManager")
            .field("systems", &self.names())
            .field("fixed_step", &self.fixed_step)
            .finish()
    }
}

impl SystemManager {
    /// Create an empty manager
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            slots: Vec::new(),
            fixed_step: FixedTimestep::new(config.fixed_time_step, config.max_delta_time),
        }
    }

    /// Insert a system; a second system of the same type is rejected
    pub fn add<S: System>(&mut self, system: S) -> bool {
        self.insert(Box::new(system), TypeId::of::<S>())
    }

    fn insert(&mut self, system: Box<dyn System>, type_id: TypeId) -> bool {
        if self.slots.iter().any(|slot| slot.type_id == type_id) {
            log::warn!("System {} is already registered", system.name());
            return false;
        }
        log::debug!("Adding system {} (priority {})", system.name(), system.priority());
        self.slots.push(SystemSlot {
            priority: system.priority(),
            system,
            type_id,
            enabled: true,
        });
        self.sort();
        true
    }

    fn sort(&mut self) {
        self.slots.sort_by_key(|slot| slot.priority);
    }

    fn position<S: System>(&self) -> Option<usize> {
        let type_id = TypeId::of::<S>();
        self.slots.iter().position(|slot| slot.type_id == type_id)
    }

    /// Take a system out of the manager
    pub fn remove<S: System>(&mut self) -> Option<S> {
        let system = self.remove_by_id(TypeId::of::<S>())?;
        AsAny::into_any(system).downcast::<S>().ok().map(|system| *system)
    }

    pub(crate) fn remove_by_id(&mut self, type_id: TypeId) -> Option<Box<dyn System>> {
        let index = self.slots.iter().position(|slot| slot.type_id == type_id)?;
        let slot = self.slots.remove(index);
        log::debug!("Removing system {}", slot.system.name());
        Some(slot.system)
    }

    /// Whether a system of type `S` is registered
    pub fn contains<S: System>(&self) -> bool {
        self.position::<S>().is_some()
    }

    /// Borrow a system by type
    pub fn get<S: System>(&self) -> Option<&S> {
        let slot = &self.slots[self.position::<S>()?];
        AsAny::as_any(&*slot.system).downcast_ref::<S>()
    }

    /// Mutably borrow a system by type
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let index = self.position::<S>()?;
        AsAny::as_any_mut(&mut *self.slots[index].system).downcast_mut::<S>()
    }

    /// Enable or disable a system; takes effect on the next phase
    pub fn set_enabled<S: System>(&mut self, enabled: bool) -> bool {
        self.set_enabled_by_id(TypeId::of::<S>(), enabled)
    }

    pub(crate) fn set_enabled_by_id(&mut self, type_id: TypeId, enabled: bool) -> bool {
        match self.slots.iter_mut().find(|slot| slot.type_id == type_id) {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub(crate) fn type_ids(&self) -> Vec<TypeId> {
        self.slots.iter().map(|slot| slot.type_id).collect()
    }

    /// Whether a system is registered and enabled
    pub fn is_enabled<S: System>(&self) -> bool {
        self.position::<S>()
            .is_some_and(|index| self.slots[index].enabled)
    }

    /// Change a system's priority and re-sort
    pub fn set_priority<S: System>(&mut self, priority: i32) -> bool {
        let Some(index) = self.position::<S>() else {
            return false;
        };
        self.slots[index].priority = priority;
        self.sort();
        true
    }

    /// System names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.system.name()).collect()
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no system is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Accumulator driving `fixed_update`
    pub fn fixed_timestep(&self) -> &FixedTimestep {
        &self.fixed_step
    }

    /// Run one frame: `update`, due `fixed_update` steps, then `late_update`
    pub fn update(&mut self, world: &mut World, delta_time: f32) {
        for slot in self.slots.iter_mut().filter(|slot| slot.enabled) {
            slot.system.update(world, delta_time);
        }

        let steps = self.fixed_step.advance(delta_time);
        let fixed_delta = self.fixed_step.step();
        for _ in 0..steps {
            for slot in self.slots.iter_mut().filter(|slot| slot.enabled) {
                slot.system.fixed_update(world, fixed_delta);
            }
        }

        for slot in self.slots.iter_mut().filter(|slot| slot.enabled) {
            slot.system.late_update(world, delta_time);
        }
    }

    /// Move every system of `other` into this manager
    pub(crate) fn absorb(&mut self, other: Self) {
        for slot in other.slots {
            self.insert(slot.system, slot.type_id);
        }
    }
}
