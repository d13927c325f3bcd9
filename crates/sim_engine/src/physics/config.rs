//! Physics configuration

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::Vec3;
use crate::foundation::time::{DEFAULT_FIXED_TIME_STEP, DEFAULT_MAX_DELTA_TIME};

/// Default restitution applied to every collision response
pub const DEFAULT_RESTITUTION: f32 = 0.3;

/// Settings owned by the physics system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration in world units per second squared
    pub gravity: Vec3,
    /// Size of one physics step in seconds
    pub fixed_time_step: f32,
    /// Largest frame delta banked per update
    pub max_delta_time: f32,
    /// Coefficient of restitution for collision response
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_time_step: DEFAULT_FIXED_TIME_STEP,
            max_delta_time: DEFAULT_MAX_DELTA_TIME,
            restitution: DEFAULT_RESTITUTION,
        }
    }
}

impl PhysicsConfig {
    /// Configuration without gravity
    pub fn zero_gravity() -> Self {
        Self {
            gravity: Vec3::zeros(),
            ..Self::default()
        }
    }
}

impl Config for PhysicsConfig {}
