//! Rigid-body component
//!
//! Per-entity physical state: body type, mass and damping, velocity, the
//! per-step force and torque accumulators, and the attached colliders.
//! [`RigidBody::fixed_update`] is the semi-implicit Euler integrator the
//! physics system runs once per fixed step.

use bitflags::bitflags;

use super::transform::Transform;
use crate::ecs::component::{Component, ComponentBase};
use crate::ecs::data::ComponentData;
use crate::ecs::ComponentError;
use crate::foundation::math::Vec3;
use crate::physics::collision::Collider;

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyType {
    /// Integrated and pushed by collisions
    #[default]
    Dynamic,
    /// Immovable, zero mass
    Static,
    /// Integrated like a dynamic body
    Kinematic,
}

impl BodyType {
    /// Lowercase name used in component data
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic",
            Self::Static => "static",
            Self::Kinematic => "kinematic",
        }
    }

    /// Parse a lowercase name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dynamic" => Some(Self::Dynamic),
            "static" => Some(Self::Static),
            "kinematic" => Some(Self::Kinematic),
            _ => None,
        }
    }
}

/// Interpretation of a vector passed to [`RigidBody::add_force`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceMode {
    /// Accumulated and applied over the next step
    Force,
    /// Divided by mass and added to velocity immediately
    Impulse,
    /// Multiplied by mass and accumulated
    Acceleration,
}

bitflags! {
    /// Per-axis freeze constraints
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BodyConstraints: u32 {
        /// Lock linear motion along X
        const FREEZE_POSITION_X = 1 << 0;
        /// Lock linear motion along Y
        const FREEZE_POSITION_Y = 1 << 1;
        /// Lock linear motion along Z
        const FREEZE_POSITION_Z = 1 << 2;
        /// Lock rotation around X
        const FREEZE_ROTATION_X = 1 << 3;
        /// Lock rotation around Y
        const FREEZE_ROTATION_Y = 1 << 4;
        /// Lock rotation around Z
        const FREEZE_ROTATION_Z = 1 << 5;
        /// Lock all linear axes
        const FREEZE_POSITION = Self::FREEZE_POSITION_X.bits()
            | Self::FREEZE_POSITION_Y.bits()
            | Self::FREEZE_POSITION_Z.bits();
        /// Lock all rotational axes
        const FREEZE_ROTATION = Self::FREEZE_ROTATION_X.bits()
            | Self::FREEZE_ROTATION_Y.bits()
            | Self::FREEZE_ROTATION_Z.bits();
    }
}

impl BodyConstraints {
    const POSITION_AXES: [Self; 3] = [
        Self::FREEZE_POSITION_X,
        Self::FREEZE_POSITION_Y,
        Self::FREEZE_POSITION_Z,
    ];
    const ROTATION_AXES: [Self; 3] = [
        Self::FREEZE_ROTATION_X,
        Self::FREEZE_ROTATION_Y,
        Self::FREEZE_ROTATION_Z,
    ];

    fn zero_locked(self, vector: &mut Vec3, axes: [Self; 3]) {
        for (axis, flag) in axes.into_iter().enumerate() {
            if self.contains(flag) {
                vector[axis] = 0.0;
            }
        }
    }
}

/// Rigid-body dynamics component
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub(crate) base: ComponentBase,
    body_type: BodyType,
    mass: f32,
    drag: f32,
    angular_drag: f32,
    use_gravity: bool,
    freeze_rotation: bool,
    freeze_position: bool,
    constraints: BodyConstraints,
    velocity: Vec3,
    angular_velocity: Vec3,
    force: Vec3,
    torque: Vec3,
    colliders: Vec<Collider>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            base: ComponentBase::default(),
            body_type: BodyType::Dynamic,
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            use_gravity: true,
            freeze_rotation: false,
            freeze_position: false,
            constraints: BodyConstraints::empty(),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            torque: Vec3::zeros(),
            colliders: Vec::new(),
        }
    }
}

impl RigidBody {
    /// Dynamic body with the given mass
    pub fn dynamic(mass: f32) -> Self {
        let mut body = Self::default();
        body.set_mass(mass);
        body
    }

    /// Static body
    pub fn fixed() -> Self {
        Self::default().with_body_type(BodyType::Static)
    }

    /// Kinematic body with the given mass
    pub fn kinematic(mass: f32) -> Self {
        Self::dynamic(mass).with_body_type(BodyType::Kinematic)
    }

    /// Builder pattern: Set body type
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.set_body_type(body_type);
        self
    }

    /// Builder pattern: Attach a collider
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    /// Builder pattern: Set initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.set_velocity(velocity);
        self
    }

    /// Builder pattern: Enable or disable gravity
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Builder pattern: Set linear and angular drag
    pub fn with_drag(mut self, drag: f32, angular_drag: f32) -> Self {
        self.set_drag(drag);
        self.set_angular_drag(angular_drag);
        self
    }

    /// Builder pattern: Set per-axis constraints
    pub fn with_constraints(mut self, constraints: BodyConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Whether the body is static
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Change the body type
    ///
    /// Becoming static zeroes mass, velocities and accumulators. Leaving the
    /// static state restores a unit mass.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        if body_type == BodyType::Static {
            self.mass = 0.0;
            self.velocity = Vec3::zeros();
            self.angular_velocity = Vec3::zeros();
            self.clear_accumulators();
        } else if self.is_static() {
            self.mass = 1.0;
        }
        self.body_type = body_type;
    }

    /// Mass (always 0 for static bodies)
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set mass; ignored for static bodies and for non-positive values
    pub fn set_mass(&mut self, mass: f32) {
        if self.is_static() {
            log::warn!("Ignoring mass {mass} for a static body");
            return;
        }
        if !(mass.is_finite() && mass > 0.0) {
            log::warn!("Ignoring invalid mass {mass}, keeping {}", self.mass);
            return;
        }
        self.mass = mass;
    }

    /// Linear drag coefficient
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Set linear drag (clamped to be non-negative)
    pub fn set_drag(&mut self, drag: f32) {
        self.drag = drag.max(0.0);
    }

    /// Angular drag coefficient
    pub fn angular_drag(&self) -> f32 {
        self.angular_drag
    }

    /// Set angular drag (clamped to be non-negative)
    pub fn set_angular_drag(&mut self, angular_drag: f32) {
        self.angular_drag = angular_drag.max(0.0);
    }

    /// Whether gravity is applied
    pub fn use_gravity(&self) -> bool {
        self.use_gravity
    }

    /// Enable or disable gravity
    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.use_gravity = use_gravity;
    }

    /// Whether rotation is frozen entirely
    pub fn freeze_rotation(&self) -> bool {
        self.freeze_rotation
    }

    /// Freeze or release rotation
    pub fn set_freeze_rotation(&mut self, freeze: bool) {
        self.freeze_rotation = freeze;
        if freeze {
            self.angular_velocity = Vec3::zeros();
            self.torque = Vec3::zeros();
        }
    }

    /// Whether translation is frozen entirely
    pub fn freeze_position(&self) -> bool {
        self.freeze_position
    }

    /// Freeze or release translation
    pub fn set_freeze_position(&mut self, freeze: bool) {
        self.freeze_position = freeze;
    }

    /// Per-axis constraints
    pub fn constraints(&self) -> BodyConstraints {
        self.constraints
    }

    /// Replace the per-axis constraints
    pub fn set_constraints(&mut self, constraints: BodyConstraints) {
        self.constraints = constraints;
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Set linear velocity; ignored for static bodies
    pub fn set_velocity(&mut self, velocity: Vec3) {
        if !self.is_static() {
            self.velocity = velocity;
        }
    }

    /// Angular velocity in radians per second (Euler rates)
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Set angular velocity; ignored for static bodies
    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        if !self.is_static() {
            self.angular_velocity = angular_velocity;
        }
    }

    /// Force accumulated for the current step
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated for the current step
    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    /// Apply a force according to `mode`; no-op for static bodies
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        if self.is_static() {
            return;
        }
        match mode {
            ForceMode::Force => self.force += force,
            ForceMode::Impulse => self.velocity += force / self.mass,
            ForceMode::Acceleration => self.force += force * self.mass,
        }
    }

    /// Apply a torque according to `mode`; no-op for static bodies or frozen rotation
    pub fn add_torque(&mut self, torque: Vec3, mode: ForceMode) {
        if self.is_static() || self.freeze_rotation {
            return;
        }
        match mode {
            ForceMode::Force => self.torque += torque,
            ForceMode::Impulse => self.angular_velocity += torque / self.mass,
            ForceMode::Acceleration => self.torque += torque * self.mass,
        }
    }

    /// Apply a force at a world-space point
    ///
    /// The force acts on the body as in [`add_force`](Self::add_force); the
    /// lever arm from `body_position` to `point` also produces a torque unless
    /// rotation is frozen.
    pub fn add_force_at_position(
        &mut self,
        force: Vec3,
        point: Vec3,
        body_position: Vec3,
        mode: ForceMode,
    ) {
        if self.is_static() {
            return;
        }
        self.add_force(force, mode);
        let torque = (point - body_position).cross(&force);
        self.add_torque(torque, mode);
    }

    /// Reset the per-step force and torque accumulators
    pub fn clear_accumulators(&mut self) {
        self.force = Vec3::zeros();
        self.torque = Vec3::zeros();
    }

    /// Attached colliders
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// First collider, the one the narrow phase tests
    pub fn primary_collider(&self) -> Option<&Collider> {
        self.colliders.first()
    }

    /// Attach a collider
    pub fn add_collider(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Detach the collider at `index`
    pub fn remove_collider(&mut self, index: usize) -> Option<Collider> {
        (index < self.colliders.len()).then(|| self.colliders.remove(index))
    }

    /// Detach every collider
    pub fn clear_colliders(&mut self) {
        self.colliders.clear();
    }

    /// Advance the body by one fixed step
    ///
    /// Static and disabled bodies are left untouched.
    pub fn fixed_update(&mut self, transform: &mut Transform, gravity: &Vec3, dt: f32) {
        if self.is_static() || !self.is_enabled() || self.mass <= 0.0 {
            return;
        }

        if self.use_gravity {
            self.force += gravity * self.mass;
        }

        let acceleration = self.force / self.mass;
        self.velocity += acceleration * dt;
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.constraints
            .zero_locked(&mut self.velocity, BodyConstraints::POSITION_AXES);

        if !self.freeze_position {
            transform.translate(self.velocity * dt);
        }

        if !self.freeze_rotation {
            self.angular_velocity += self.torque * dt;
            self.angular_velocity *= (1.0 - self.angular_drag * dt).max(0.0);
            self.constraints
                .zero_locked(&mut self.angular_velocity, BodyConstraints::ROTATION_AXES);
            if self.angular_velocity != Vec3::zeros() {
                transform.rotate(self.angular_velocity * dt);
            }
        }

        self.clear_accumulators();
    }

    pub(crate) fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new();
        self.base.write(&mut data);
        data.set("body_type", self.body_type.as_str());
        data.set("mass", self.mass);
        data.set("drag", self.drag);
        data.set("angular_drag", self.angular_drag);
        data.set("use_gravity", self.use_gravity);
        data.set("freeze_rotation", self.freeze_rotation);
        data.set("freeze_position", self.freeze_position);
        data.set("constraints", self.constraints.bits());
        data.set_vec3("velocity", &self.velocity);
        data.set_vec3("angular_velocity", &self.angular_velocity);

        data.set("colliders.count", u32::try_from(self.colliders.len()).unwrap_or(u32::MAX));
        for (index, collider) in self.colliders.iter().enumerate() {
            collider.write(&mut data, &format!("colliders.{index}"));
        }
        data
    }

    pub(crate) fn apply_data(&mut self, data: &ComponentData) -> Result<(), ComponentError> {
        self.base.read(data)?;

        if let Some(name) = data.text("body_type")? {
            let body_type = BodyType::parse(name).ok_or_else(|| ComponentError::InvalidValue {
                field: "body_type".to_owned(),
                value: name.to_owned(),
            })?;
            self.set_body_type(body_type);
        }

        let mut mass = self.mass;
        data.read_f32("mass", &mut mass)?;
        if !self.is_static() && mass != self.mass {
            self.set_mass(mass);
        }

        let mut drag = self.drag;
        data.read_f32("drag", &mut drag)?;
        self.set_drag(drag);
        let mut angular_drag = self.angular_drag;
        data.read_f32("angular_drag", &mut angular_drag)?;
        self.set_angular_drag(angular_drag);

        data.read_bool("use_gravity", &mut self.use_gravity)?;
        data.read_bool("freeze_position", &mut self.freeze_position)?;
        let mut freeze_rotation = self.freeze_rotation;
        data.read_bool("freeze_rotation", &mut freeze_rotation)?;

        if let Some(bits) = data.int("constraints")? {
            let bits = u32::try_from(bits).map_err(|_| ComponentError::InvalidValue {
                field: "constraints".to_owned(),
                value: bits.to_string(),
            })?;
            self.constraints = BodyConstraints::from_bits_truncate(bits);
        }

        let mut velocity = self.velocity;
        data.read_vec3("velocity", &mut velocity)?;
        self.set_velocity(velocity);
        let mut angular_velocity = self.angular_velocity;
        data.read_vec3("angular_velocity", &mut angular_velocity)?;
        self.set_angular_velocity(angular_velocity);
        self.set_freeze_rotation(freeze_rotation);

        if let Some(count) = data.int("colliders.count")? {
            let authored = data
                .iter()
                .filter(|(key, _)| key.starts_with("colliders.") && key.ends_with(".shape"))
                .count();
            let count = usize::try_from(count)
                .ok()
                .filter(|count| *count <= authored)
                .ok_or_else(|| ComponentError::InvalidValue {
                    field: "colliders.count".to_owned(),
                    value: count.to_string(),
                })?;
            self.colliders = (0..count)
                .map(|index| Collider::read(data, &format!("colliders.{index}")))
                .collect::<Result<_, _>>()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn gravity() -> Vec3 {
        Vec3::new(0.0, -9.81, 0.0)
    }

    #[test]
    fn test_force_modes() {
        let mut body = RigidBody::dynamic(2.0);

        body.add_force(Vec3::new(4.0, 0.0, 0.0), ForceMode::Force);
        assert_relative_eq!(body.accumulated_force(), Vec3::new(4.0, 0.0, 0.0));

        body.add_force(Vec3::new(0.0, 1.0, 0.0), ForceMode::Acceleration);
        assert_relative_eq!(body.accumulated_force(), Vec3::new(4.0, 2.0, 0.0));

        body.add_force(Vec3::new(0.0, 0.0, 4.0), ForceMode::Impulse);
        assert_relative_eq!(body.velocity(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_static_body_ignores_everything() {
        let mut body = RigidBody::fixed();
        assert_eq!(body.mass(), 0.0);

        body.set_mass(5.0);
        body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        body.add_force(Vec3::new(1.0, 0.0, 0.0), ForceMode::Impulse);
        body.add_force_at_position(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::zeros(),
            ForceMode::Force,
        );

        let mut transform = Transform::identity();
        for _ in 0..100 {
            body.fixed_update(&mut transform, &gravity(), DT);
        }
        assert_eq!(body.mass(), 0.0);
        assert_eq!(body.velocity(), Vec3::zeros());
        assert_eq!(body.angular_velocity(), Vec3::zeros());
        assert_eq!(transform.position(), Vec3::zeros());
    }

    #[test]
    fn test_invalid_mass_is_rejected() {
        let mut body = RigidBody::dynamic(3.0);
        body.set_mass(0.0);
        body.set_mass(-1.0);
        body.set_mass(f32::NAN);
        assert_eq!(body.mass(), 3.0);
    }

    #[test]
    fn test_leaving_static_restores_unit_mass() {
        let mut body = RigidBody::fixed();
        body.set_body_type(BodyType::Kinematic);
        assert_eq!(body.mass(), 1.0);
        assert!(!body.is_static());
    }

    #[test]
    fn test_force_at_position_produces_torque() {
        let mut body = RigidBody::dynamic(1.0);
        body.add_force_at_position(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            ForceMode::Force,
        );
        assert_relative_eq!(body.accumulated_force(), Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(body.accumulated_torque(), Vec3::new(0.0, -1.0, 0.0));

        let mut frozen = RigidBody::dynamic(1.0);
        frozen.set_freeze_rotation(true);
        frozen.add_force_at_position(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            ForceMode::Force,
        );
        assert_eq!(frozen.accumulated_torque(), Vec3::zeros());
    }

    #[test]
    fn test_gravity_integration_is_semi_implicit() {
        let mut body = RigidBody::dynamic(2.0);
        let mut transform = Transform::identity();

        body.fixed_update(&mut transform, &gravity(), DT);

        let expected_velocity = gravity() * DT;
        assert_relative_eq!(body.velocity(), expected_velocity, epsilon = 1e-6);
        assert_relative_eq!(transform.position(), expected_velocity * DT, epsilon = 1e-7);
        assert_eq!(body.accumulated_force(), Vec3::zeros());
    }

    #[test]
    fn test_drag_damps_velocity() {
        let mut body = RigidBody::dynamic(1.0)
            .with_gravity(false)
            .with_drag(6.0, 0.0)
            .with_velocity(Vec3::new(10.0, 0.0, 0.0));
        let mut transform = Transform::identity();

        body.fixed_update(&mut transform, &gravity(), 0.1);
        assert_relative_eq!(body.velocity(), Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-5);

        // Damping factor never goes negative
        body.set_drag(100.0);
        body.fixed_update(&mut transform, &gravity(), 0.1);
        assert_eq!(body.velocity(), Vec3::zeros());
    }

    #[test]
    fn test_position_constraints() {
        let mut body = RigidBody::dynamic(1.0)
            .with_constraints(BodyConstraints::FREEZE_POSITION_Y)
            .with_velocity(Vec3::new(1.0, 1.0, 0.0));
        let mut transform = Transform::identity();

        body.fixed_update(&mut transform, &gravity(), 0.5);
        assert_relative_eq!(body.velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(transform.position(), Vec3::new(0.5, 0.0, 0.0));

        body.set_freeze_position(true);
        body.fixed_update(&mut transform, &gravity(), 0.5);
        assert_relative_eq!(transform.position(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_angular_integration_and_constraints() {
        let mut body = RigidBody::dynamic(1.0)
            .with_gravity(false)
            .with_drag(0.0, 0.0)
            .with_constraints(BodyConstraints::FREEZE_ROTATION_X);
        body.add_torque(Vec3::new(3.0, 2.0, 0.0), ForceMode::Force);
        let mut transform = Transform::identity();

        body.fixed_update(&mut transform, &gravity(), 0.25);
        assert_relative_eq!(body.angular_velocity(), Vec3::new(0.0, 0.5, 0.0));
        assert_relative_eq!(transform.euler_angles(), Vec3::new(0.0, 0.125, 0.0), epsilon = 1e-6);
        assert_eq!(body.accumulated_torque(), Vec3::zeros());
    }

    #[test]
    fn test_disabled_body_does_not_integrate() {
        let mut body = RigidBody::dynamic(1.0).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        body.set_enabled(false);
        let mut transform = Transform::identity();
        body.fixed_update(&mut transform, &gravity(), DT);
        assert_eq!(transform.position(), Vec3::zeros());
    }

    #[test]
    fn test_collider_management() {
        let mut body = RigidBody::dynamic(1.0).with_collider(Collider::sphere(1.0));
        body.add_collider(Collider::cuboid(Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(body.colliders().len(), 2);
        assert_eq!(body.primary_collider(), Some(&Collider::sphere(1.0)));

        assert!(body.remove_collider(5).is_none());
        assert_eq!(body.remove_collider(0), Some(Collider::sphere(1.0)));
        body.clear_colliders();
        assert!(body.primary_collider().is_none());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut source = RigidBody::kinematic(4.0)
            .with_drag(0.5, 0.2)
            .with_gravity(false)
            .with_constraints(BodyConstraints::FREEZE_ROTATION | BodyConstraints::FREEZE_POSITION_Z)
            .with_velocity(Vec3::new(1.0, -2.0, 0.5))
            .with_collider(Collider::sphere(0.5).as_trigger())
            .with_collider(Collider::cuboid(Vec3::new(1.0, 2.0, 1.0)));
        source.set_freeze_position(true);

        let mut restored = RigidBody::default();
        restored.deserialize(&source.serialize()).expect("valid data");
        assert_eq!(restored, source);
    }

    #[test]
    fn test_collider_count_must_match_authored_shapes() {
        let mut data = ComponentData::new();
        data.set("colliders.count", 3_i64);
        let mut body = RigidBody::dynamic(1.0).with_collider(Collider::sphere(2.0));
        assert_eq!(
            body.deserialize(&data),
            Err(ComponentError::InvalidValue {
                field: "colliders.count".to_owned(),
                value: "3".to_owned(),
            })
        );
        assert_eq!(body.colliders(), &[Collider::sphere(2.0)]);

        data.set("colliders.0.shape", "box");
        data.set("colliders.2.shape", "box");
        data.set("colliders.count", 2_i64);
        assert_eq!(
            body.deserialize(&data),
            Err(ComponentError::MissingField("colliders.1.shape".to_owned()))
        );

        data.set("colliders.count", i64::MAX);
        assert!(body.deserialize(&data).is_err());
    }

    #[test]
    fn test_unknown_body_type_is_rejected() {
        let mut data = ComponentData::new();
        data.set("body_type", "ghost");
        let mut body = RigidBody::default();
        assert!(matches!(
            body.deserialize(&data),
            Err(ComponentError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_static_data_keeps_invariant() {
        let mut data = ComponentData::new();
        data.set("body_type", "static");
        data.set("mass", 5.0_f32);
        data.set_vec3("velocity", &Vec3::new(1.0, 1.0, 1.0));

        let mut body = RigidBody::default();
        body.deserialize(&data).expect("valid data");
        assert!(body.is_static());
        assert_eq!(body.mass(), 0.0);
        assert_eq!(body.velocity(), Vec3::zeros());
    }
}
