//! # Sim Engine
//!
//! An entity-component simulation runtime: an ECS registry with a
//! hierarchical transform model and a fixed-timestep rigid-body physics
//! system.
//!
//! ## Features
//!
//! - **ECS Architecture**: arena-backed entities, typed components, prioritized systems
//! - **Transforms**: parent/child hierarchy with lazily cached local matrices
//! - **Rigid Bodies**: force, impulse and acceleration modes with per-axis constraints
//! - **Physics**: fixed-step integration, sphere/box contacts, impulse response, raycasts
//! - **Persistence**: flat component data and TOML/RON scene snapshots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sim_engine::prelude::*;
//!
//! let mut world = World::new();
//! let ball = world.create_entity("ball");
//! world.add_component(ball, Transform::from_position(Vec3::new(0.0, 5.0, 0.0)));
//! world.add_component(ball, RigidBody::dynamic(1.0).with_collider(Collider::sphere(0.5)));
//!
//! let mut physics = PhysicsSystem::new(PhysicsConfig::default());
//! physics.on_collision(|info| log::info!("{} hit {}", info.entity_a, info.entity_b));
//! world.add_system(physics);
//!
//! for _ in 0..60 {
//!     world.update(1.0 / 60.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod core;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{SchedulerConfig, SimulationConfig},
        ecs::{
            components::{BodyConstraints, BodyType, Collider, ColliderShape, ForceMode, RigidBody, Transform},
            Component, ComponentKind, ComponentRegistry, Entity, System, World, WorldError,
        },
        events::SubscriptionId,
        foundation::{
            math::{Mat4, Quat, Vec3},
            time::{FixedTimestep, Stopwatch},
        },
        physics::{CollisionInfo, PhysicsConfig, PhysicsSystem, RaycastHit},
        scene::{SceneDocument, SceneError},
    };
}
