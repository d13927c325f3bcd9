//! Rigid-body physics
//!
//! A fixed-step integrator with naive all-pairs collision detection,
//! positional correction and impulse response, plus raycasting against
//! sphere colliders.

pub mod collision;
pub mod config;
pub mod physics_system;


pub use collision::{Aabb, BoundingSphere, Collider, ColliderShape, Contact, Ray, WorldSpaceShape};
pub use config::PhysicsConfig;
pub use physics_system::{CollisionInfo, PhysicsSystem, RaycastHit};
