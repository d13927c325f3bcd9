//! # Simulation Configuration
//!
//! File-level aggregate of the settings the runtime reads at startup. Each
//! section is owned by the subsystem it configures: the scheduler section by
//! the `SystemManager`, the physics section by the `PhysicsSystem`.
//!
//! ```toml
//! [scheduler]
//! fixed_time_step = 0.016666668
//! max_delta_time = 0.25
//!
//! [physics]
//! gravity = [0.0, -9.81, 0.0]
//! fixed_time_step = 0.016666668
//! max_delta_time = 0.25
//! restitution = 0.3
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::foundation::time::{DEFAULT_FIXED_TIME_STEP, DEFAULT_MAX_DELTA_TIME};
use crate::physics::PhysicsConfig;

/// Settings for the system scheduler's own fixed-update loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Interval of `System::fixed_update` calls in seconds
    pub fixed_time_step: f32,
    /// Largest frame delta accepted per tick
    pub max_delta_time: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_time_step: DEFAULT_FIXED_TIME_STEP,
            max_delta_time: DEFAULT_MAX_DELTA_TIME,
        }
    }
}

impl Config for SchedulerConfig {}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// System scheduler settings
    pub scheduler: SchedulerConfig,
    /// Physics settings
    pub physics: PhysicsConfig,
}

impl Config for SimulationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [physics]
            gravity = [0.0, 0.0, 0.0]
            "#,
        )
        .expect("valid toml");

        assert_relative_eq!(config.physics.gravity, Vec3::zeros());
        assert_relative_eq!(config.physics.restitution, 0.3);
        assert_eq!(config.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn test_roundtrip_through_files() {
        let mut config = SimulationConfig::default();
        config.scheduler.fixed_time_step = 0.02;
        config.physics.restitution = 0.5;

        for name in ["sim_engine_config_test.toml", "sim_engine_config_test.ron"] {
            let path = std::env::temp_dir().join(name);
            config.save_to_file(&path).expect("save");
            let loaded = SimulationConfig::load_from_file(&path).expect("load");
            assert_eq!(loaded, config);
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let path = std::env::temp_dir().join("sim_engine_does_not_exist.ron");
        let _ = std::fs::remove_file(&path);
        assert_eq!(SimulationConfig::load_or_default(&path), SimulationConfig::default());
    }
}
