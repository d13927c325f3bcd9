//! Entity implementation

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::ComponentStore;

/// Entity identifier
///
/// Ids are handed out monotonically by a [`World`](super::World) and never
/// reused, so a stale handle simply stops resolving once its entity is
/// destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create a new entity with the given ID
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id)
    }
}

/// Per-entity state held in the world arena
///
/// The record exclusively owns the entity's components and its list of
/// child handles; the parent handle is a plain back-reference.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub(crate) name: String,
    pub(crate) active: bool,
    pub(crate) parent: Option<Entity>,
    pub(crate) children: Vec<Entity>,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) components: ComponentStore,
}

impl EntityRecord {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            active: true,
            parent: None,
            children: Vec::new(),
            tags: BTreeSet::new(),
            components: ComponentStore::default(),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entity takes part in simulation
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Parent handle, if any
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Child handles in attachment order
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// Tag set
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Attached components
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }
}
