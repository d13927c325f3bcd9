//! Collision geometry and narrow-phase tests
//!
//! Collider descriptors are stored in the owning body's local frame and are
//! placed in world space only for the duration of a test.
//!
//! - [`primitives`] - rays, bounding spheres, axis-aligned boxes
//! - [`shape`] - collider descriptors, world-space shapes, contact generation

pub mod primitives;
pub mod shape;

pub use primitives::{Aabb, BoundingSphere, Ray};
pub use shape::{Collider, ColliderShape, Contact, WorldSpaceShape};
