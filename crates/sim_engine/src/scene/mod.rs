//! Scene snapshots
//!
//! A [`SceneDocument`] is the persisted form of a world's entities: names,
//! flags, tags, hierarchy and every component as a flat field map. Systems
//! are runtime objects and are not part of a document.
//!
//! ```toml
//! [[entities]]
//! id = 0
//! name = "ball"
//! active = true
//! tags = ["player"]
//!
//! [[entities.components]]
//! kind = "Transform"
//!
//! [entities.components.data]
//! "position.y" = 2.0
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::ecs::{ComponentData, ComponentError, ComponentRegistry, Entity, World, WorldError};

/// Errors raised while restoring or persisting a scene
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Reading or writing the document failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A component could not be rebuilt
    #[error("component error: {0}")]
    Component(#[from] ComponentError),

    /// The hierarchy could not be rebuilt
    #[error("hierarchy error: {0}")]
    World(#[from] WorldError),

    /// Two entities share an id
    #[error("duplicate entity id {0}")]
    DuplicateEntity(u32),

    /// An entity names a parent that is not in the document
    #[error("entity {entity} references missing parent {parent}")]
    DanglingParent {
        /// Document id of the child
        entity: u32,
        /// Missing parent id
        parent: u32,
    },
}

/// One component in a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDocument {
    /// Stable type name
    pub kind: String,
    /// Serialized fields
    #[serde(default)]
    pub data: ComponentData,
}

/// One entity in a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    /// Id at capture time; only meaningful inside the document
    pub id: u32,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Active flag
    #[serde(default = "default_active")]
    pub active: bool,
    /// Document id of the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attached components
    #[serde(default)]
    pub components: Vec<ComponentDocument>,
}

fn default_active() -> bool {
    true
}

/// Persisted form of a world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Entities, parents before children
    #[serde(default)]
    pub entities: Vec<EntityDocument>,
}

impl Config for SceneDocument {}

impl SceneDocument {
    /// Snapshot every live entity of `world`
    ///
    /// Entities are listed root by root, each followed by its subtree, so
    /// restoring reproduces the original child order.
    pub fn capture(world: &World) -> Self {
        let mut entities = Vec::with_capacity(world.entity_count());
        for &root in world.roots() {
            for entity in std::iter::once(root).chain(world.descendants(root)) {
                if let Some(document) = Self::capture_entity(world, entity) {
                    entities.push(document);
                }
            }
        }
        Self { entities }
    }

    fn capture_entity(world: &World, entity: Entity) -> Option<EntityDocument> {
        let record = world.entity(entity)?;
        Some(EntityDocument {
            id: entity.id(),
            name: record.name().to_owned(),
            active: record.is_active(),
            parent: record.parent().map(|parent| parent.id()),
            tags: record.tags().iter().cloned().collect(),
            components: record
                .components()
                .to_any()
                .iter()
                .map(|component| ComponentDocument {
                    kind: component.kind().type_name().to_owned(),
                    data: component.serialize(),
                })
                .collect(),
        })
    }

    /// Build a fresh world from this document
    pub fn restore(&self, registry: &ComponentRegistry) -> Result<World, SceneError> {
        let mut world = World::new();
        self.restore_into(&mut world, registry)?;
        Ok(world)
    }

    /// Add this document's entities to `world`
    ///
    /// Entities receive new ids; the returned map goes from document id to
    /// the created entity. On error the entities created so far stay in the
    /// world.
    pub fn restore_into(
        &self,
        world: &mut World,
        registry: &ComponentRegistry,
    ) -> Result<HashMap<u32, Entity>, SceneError> {
        let mut created = HashMap::with_capacity(self.entities.len());

        for document in &self.entities {
            if created.contains_key(&document.id) {
                return Err(SceneError::DuplicateEntity(document.id));
            }
            let entity = world.create_entity(document.name.clone());
            created.insert(document.id, entity);
            world.set_active(entity, document.active);
            for tag in &document.tags {
                world.add_tag(entity, tag);
            }
            for component in &document.components {
                let component = registry.create(&component.kind, &component.data)?;
                world.attach_any(entity, component);
            }
        }

        for document in &self.entities {
            let Some(parent_id) = document.parent else {
                continue;
            };
            let parent = created.get(&parent_id).copied().ok_or(SceneError::DanglingParent {
                entity: document.id,
                parent: parent_id,
            })?;
            if let Some(&child) = created.get(&document.id) {
                world.set_parent(child, Some(parent))?;
            }
        }

        log::debug!("Restored {} entities", created.len());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Collider, RigidBody, Transform};
    use crate::ecs::Component;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn sample_world() -> World {
        let mut world = World::new();
        let root = world.create_entity("rig");
        world.add_component(root, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        world.add_tag(root, "player");

        let ball = world.create_entity("ball");
        world.add_component(ball, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
        world.add_component(
            ball,
            RigidBody::dynamic(2.5)
                .with_velocity(Vec3::new(0.5, 0.0, 0.0))
                .with_collider(Collider::sphere(0.5).as_trigger()),
        );
        world.set_parent(ball, Some(root)).expect("valid parent");

        let marker = world.create_entity("marker");
        world.set_active(marker, false);
        world
    }

    fn assert_same_scene(restored: &World) {
        let root = restored.first_by_name("rig").expect("root");
        let ball = restored.first_by_name("ball").expect("ball");
        let marker = restored.first_by_name("marker").expect("marker");

        assert_eq!(restored.entity_count(), 3);
        assert_eq!(restored.roots(), &[root, marker]);
        assert_eq!(restored.children(root), &[ball]);
        assert!(restored.has_tag(root, "player"));
        assert!(!restored.is_active(marker));

        let body = restored.get_component::<RigidBody>(ball).expect("body");
        assert_eq!(body.mass(), 2.5);
        assert_relative_eq!(body.velocity(), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(body.primary_collider(), Some(&Collider::sphere(0.5).as_trigger()));
        assert_eq!(body.owner(), Some(ball));
        assert_relative_eq!(
            restored.world_position(ball).expect("transform"),
            Vec3::new(1.0, 3.0, 3.0)
        );
    }

    #[test]
    fn test_capture_restore_in_memory() {
        let document = SceneDocument::capture(&sample_world());
        assert_eq!(document.entities.len(), 3);
        assert_eq!(document.entities[1].parent, Some(document.entities[0].id));

        let restored = document.restore(&ComponentRegistry::with_builtins()).expect("restore");
        assert_same_scene(&restored);
        assert_eq!(SceneDocument::capture(&restored), document);
    }

    #[test]
    fn test_file_roundtrip_in_both_formats() {
        let document = SceneDocument::capture(&sample_world());
        let registry = ComponentRegistry::with_builtins();

        for extension in ["toml", "ron"] {
            let path = std::env::temp_dir().join(format!("sim_engine_scene_test.{extension}"));
            document.save_to_file(&path).expect("save");
            let loaded = SceneDocument::load_from_file(&path).expect("load");
            let _ = std::fs::remove_file(&path);

            assert_eq!(loaded, document, "{extension} roundtrip");
            assert_same_scene(&loaded.restore(&registry).expect("restore"));
        }
    }

    #[test]
    fn test_unknown_component_kind_fails() {
        let document = SceneDocument {
            entities: vec![EntityDocument {
                id: 7,
                name: "odd".to_owned(),
                active: true,
                parent: None,
                tags: Vec::new(),
                components: vec![ComponentDocument {
                    kind: "MeshRenderer".to_owned(),
                    data: ComponentData::new(),
                }],
            }],
        };
        assert!(matches!(
            document.restore(&ComponentRegistry::with_builtins()),
            Err(SceneError::Component(ComponentError::UnknownComponent(_)))
        ));
    }

    #[test]
    fn test_structural_errors() {
        let entity = |id, parent| EntityDocument {
            id,
            name: String::new(),
            active: true,
            parent,
            tags: Vec::new(),
            components: Vec::new(),
        };
        let registry = ComponentRegistry::with_builtins();

        let dangling = SceneDocument {
            entities: vec![entity(1, Some(9))],
        };
        assert!(matches!(
            dangling.restore(&registry),
            Err(SceneError::DanglingParent { entity: 1, parent: 9 })
        ));

        let duplicate = SceneDocument {
            entities: vec![entity(1, None), entity(1, None)],
        };
        assert!(matches!(
            duplicate.restore(&registry),
            Err(SceneError::DuplicateEntity(1))
        ));

        let cycle = SceneDocument {
            entities: vec![entity(1, Some(2)), entity(2, Some(1))],
        };
        assert!(matches!(
            cycle.restore(&registry),
            Err(SceneError::World(WorldError::HierarchyCycle { .. }))
        ));
    }

    #[test]
    fn test_restore_into_existing_world_remaps_ids() {
        let document = SceneDocument::capture(&sample_world());
        let mut world = World::new();
        world.create_entity("existing");

        let created = document
            .restore_into(&mut world, &ComponentRegistry::with_builtins())
            .expect("restore");
        assert_eq!(world.entity_count(), 4);
        let first = document.entities[0].id;
        assert_eq!(world.name(created[&first]), Some("rig"));
        assert_ne!(created[&first].id(), first);
    }
}
