//! Transform component for the ECS system
//!
//! Local position, rotation and scale of an entity, plus a lazily rebuilt
//! local matrix. Rotation is stored as a quaternion and mirrored as Euler
//! angles for editing; both are updated by every rotation mutator.

use std::cell::Cell;

use crate::ecs::component::ComponentBase;
use crate::ecs::data::ComponentData;
use crate::ecs::ComponentError;
use crate::foundation::math::{axes, utils, Mat4, Quat, Unit, Vec3};

/// ECS Transform component
///
/// All coordinates follow Y-up right-handed conventions; `forward` is -Z.
/// Mutators only flag the cached local matrix as stale, the matrix is rebuilt
/// on the next read.
#[derive(Debug, Clone)]
pub struct Transform {
    pub(crate) base: ComponentBase,
    position: Vec3,
    rotation: Quat,
    euler: Vec3,
    scale: Vec3,
    local_matrix: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            base: ComponentBase::default(),
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            euler: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            local_matrix: Cell::new(Mat4::identity()),
            dirty: Cell::new(true),
        }
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.rotation == other.rotation
            && self.scale == other.scale
    }
}

impl Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self::default().with_position(position)
    }

    /// Create from full transform specification
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self::default()
            .with_position(position)
            .with_rotation(rotation)
            .with_scale(scale)
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation_from_quaternion(rotation);
        self
    }

    /// Builder pattern: Set rotation from Euler angles (radians)
    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.set_rotation(euler);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local rotation as Euler angles in radians
    pub fn euler_angles(&self) -> Vec3 {
        self.euler
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Whether the cached local matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Set local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.mark_dirty();
    }

    /// Set rotation from Euler angles in radians
    pub fn set_rotation(&mut self, euler: Vec3) {
        self.euler = euler;
        self.rotation = utils::quat_from_euler(&euler);
        self.mark_dirty();
    }

    /// Set rotation from a quaternion
    pub fn set_rotation_from_quaternion(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.euler = utils::euler_from_quat(&rotation);
        self.mark_dirty();
    }

    /// Set local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Move by a world-space delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.mark_dirty();
    }

    /// Move by a delta expressed in the transform's own orientation
    pub fn translate_local(&mut self, delta: Vec3) {
        self.position += self.rotation * delta;
        self.mark_dirty();
    }

    /// Add an Euler-angle delta (radians)
    pub fn rotate(&mut self, euler_delta: Vec3) {
        self.set_rotation(self.euler + euler_delta);
    }

    /// Rotate by `angle` radians around `axis`, applied before the current rotation
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        let Some(axis) = Unit::try_new(axis, crate::foundation::math::constants::EPSILON) else {
            return;
        };
        self.set_rotation_from_quaternion(Quat::from_axis_angle(&axis, angle) * self.rotation);
    }

    /// Orient so that `forward` points at `target`
    ///
    /// Uses +Y as the up hint, or +Z when looking straight up or down. Does
    /// nothing when `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(direction) = utils::try_normalize(&(target - self.position)) else {
            return;
        };
        let up = if direction.cross(&axes::up()).norm() < 1e-4 {
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            axes::up()
        };
        self.set_rotation_from_quaternion(Quat::look_at_rh(&direction, &up).inverse());
    }

    /// Unit forward vector (-Z rotated by the current rotation)
    pub fn forward(&self) -> Vec3 {
        self.rotation * axes::forward()
    }

    /// Unit right vector (+X rotated by the current rotation)
    pub fn right(&self) -> Vec3 {
        self.rotation * axes::right()
    }

    /// Unit up vector (+Y rotated by the current rotation)
    pub fn up(&self) -> Vec3 {
        self.rotation * axes::up()
    }

    /// Local TRS matrix, rebuilt only if a mutator ran since the last read
    pub fn local_matrix(&self) -> Mat4 {
        if self.dirty.get() {
            self.local_matrix
                .set(utils::compose_trs(&self.position, &self.rotation, &self.scale));
            self.dirty.set(false);
        }
        self.local_matrix.get()
    }

    /// World matrix given the parent's world matrix, if any
    pub fn world_matrix(&self, parent_world: Option<&Mat4>) -> Mat4 {
        match parent_world {
            Some(parent) => parent * self.local_matrix(),
            None => self.local_matrix(),
        }
    }

    fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub(crate) fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new();
        self.base.write(&mut data);
        data.set_vec3("position", &self.position);
        data.set_quat("rotation", &self.rotation);
        data.set_vec3("scale", &self.scale);
        data
    }

    pub(crate) fn apply_data(&mut self, data: &ComponentData) -> Result<(), ComponentError> {
        self.base.read(data)?;
        let mut position = self.position;
        data.read_vec3("position", &mut position)?;
        let mut scale = self.scale;
        data.read_vec3("scale", &mut scale)?;
        let rotation = data.quat("rotation")?;

        self.set_position(position);
        self.set_scale(scale);
        if let Some(rotation) = rotation {
            self.set_rotation_from_quaternion(rotation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use crate::foundation::math::constants::{HALF_PI, PI};
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_transform_identity() {
        let transform = Transform::identity();

        assert_eq!(transform.position(), Vec3::zeros());
        assert_relative_eq!(transform.rotation(), Quat::identity(), epsilon = EPSILON);
        assert_eq!(transform.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.local_matrix(), Mat4::identity());
    }

    #[test]
    fn test_mutators_mark_dirty_and_reads_clear_it() {
        let mut transform = Transform::identity();
        let _ = transform.local_matrix();
        assert!(!transform.is_dirty());

        transform.set_position(Vec3::new(1.0, 0.0, 0.0));
        assert!(transform.is_dirty());
        transform.translate(Vec3::new(0.0, 1.0, 0.0));
        transform.rotate(Vec3::new(0.0, 0.1, 0.0));
        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));
        assert!(transform.is_dirty());

        let first = transform.local_matrix();
        assert!(!transform.is_dirty());
        assert_eq!(transform.local_matrix(), first);
    }

    #[test]
    fn test_translate_local_uses_orientation() {
        let mut transform = Transform::identity()
            .with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI));

        transform.translate_local(Vec3::new(1.0, 0.0, 0.0));
        // +X rotated 90 degrees around Y is -Z
        assert_relative_eq!(transform.position(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);

        transform.translate(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(transform.position(), Vec3::new(1.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_euler_and_quaternion_stay_in_sync() {
        let mut transform = Transform::identity();
        transform.rotate(Vec3::new(0.0, HALF_PI, 0.0));
        assert_relative_eq!(
            transform.rotation(),
            Quat::from_euler_angles(0.0, HALF_PI, 0.0),
            epsilon = EPSILON
        );

        transform.set_rotation_from_quaternion(Quat::from_axis_angle(&Vec3::z_axis(), 0.5));
        assert_relative_eq!(transform.euler_angles(), Vec3::new(0.0, 0.0, 0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_on_axis_premultiplies() {
        let mut transform = Transform::identity()
            .with_rotation(Quat::from_axis_angle(&Vec3::x_axis(), HALF_PI));
        transform.rotate_on_axis(Vec3::new(0.0, 2.0, 0.0), HALF_PI);

        let expected = Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI)
            * Quat::from_axis_angle(&Vec3::x_axis(), HALF_PI);
        assert_relative_eq!(transform.rotation(), expected, epsilon = EPSILON);

        let before = transform.rotation();
        transform.rotate_on_axis(Vec3::zeros(), PI);
        assert_eq!(transform.rotation(), before);
    }

    #[test]
    fn test_direction_vectors() {
        let transform = Transform::identity()
            .with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI));

        assert_relative_eq!(transform.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(transform.right(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(transform.up(), Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_look_at() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 5.0));
        transform.look_at(Vec3::zeros());
        assert_relative_eq!(transform.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);

        transform.look_at(Vec3::new(3.0, 0.0, 5.0));
        assert_relative_eq!(transform.forward(), Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);

        transform.look_at(Vec3::new(0.0, 10.0, 5.0));
        assert_relative_eq!(transform.forward(), Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);

        let before = transform.rotation();
        transform.look_at(transform.position());
        assert_eq!(transform.rotation(), before);
    }

    #[test]
    fn test_world_matrix_composes_with_parent() {
        let parent = Transform::from_trs(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let child = Transform::from_position(Vec3::new(0.0, 0.0, 1.0));

        let world = child.world_matrix(Some(&parent.local_matrix()));
        let origin = world.transform_point(&Point3::origin());
        // Child (0,0,1) rotated 90 degrees around Y and translated by (1,0,0)
        assert_relative_eq!(origin.coords, Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
        assert_eq!(child.world_matrix(None), child.local_matrix());
    }

    #[test]
    fn test_serialize_roundtrip_preserves_state() {
        let mut source = Transform::from_trs(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Unit::new_normalize(Vec3::new(1.0, 1.0, 1.0)), 0.5),
            Vec3::new(2.0, 1.5, 0.8),
        );
        source.set_enabled(false);

        let mut restored = Transform::default();
        restored.deserialize(&source.serialize()).expect("valid data");

        assert_relative_eq!(restored.position(), source.position(), epsilon = EPSILON);
        assert_relative_eq!(restored.scale(), source.scale(), epsilon = EPSILON);
        assert_relative_eq!(restored.rotation(), source.rotation(), epsilon = EPSILON);
        assert!(!restored.is_enabled());
        assert!(restored.is_dirty());
    }

    #[test]
    fn test_partial_data_keeps_other_fields() {
        let mut transform = Transform::from_position(Vec3::new(5.0, 5.0, 5.0));
        let mut data = ComponentData::new();
        data.set("position.y", 1.0_f32);
        transform.deserialize(&data).expect("valid data");
        assert_relative_eq!(transform.position(), Vec3::new(5.0, 1.0, 5.0));
    }
}
