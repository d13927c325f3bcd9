//! ECS Components module
//!
//! The closed set of components the runtime ships with.

pub mod transform;
pub mod rigid_body;

pub use transform::Transform;
pub use rigid_body::{BodyConstraints, BodyType, ForceMode, RigidBody};
pub use crate::physics::collision::{Collider, ColliderShape};
