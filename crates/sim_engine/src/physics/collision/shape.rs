//! Collider descriptors and narrow-phase contact generation
//!
//! A [`Collider`] stores its geometry relative to the owning body. During a
//! test it is placed at the body's world position as a [`WorldSpaceShape`];
//! rotation and scale of the body are not applied to collider geometry.

use super::primitives::{Aabb, BoundingSphere, Ray};
use crate::ecs::data::ComponentData;
use crate::ecs::ComponentError;
use crate::foundation::math::{constants, Vec3};

/// Collision shape stored in the owning body's local frame
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Box with full edge lengths `size`
    Box {
        /// Edge lengths along X, Y, Z
        size: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius in world units
        radius: f32,
    },
    /// Capsule (described only; never collides)
    Capsule {
        /// Radius of the end caps
        radius: f32,
        /// Total height
        height: f32,
    },
    /// Triangle mesh (described only; never collides)
    Mesh,
}

impl ColliderShape {
    /// Stable lowercase name used in component data
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Capsule { .. } => "capsule",
            Self::Mesh => "mesh",
        }
    }
}

/// Collider attached to a rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Geometry
    pub shape: ColliderShape,
    /// Offset of the shape center from the body position
    pub offset: Vec3,
    /// Report overlaps without physical response
    pub is_trigger: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self::sphere(0.5)
    }
}

impl Collider {
    fn with_shape(shape: ColliderShape) -> Self {
        Self {
            shape,
            offset: Vec3::zeros(),
            is_trigger: false,
        }
    }

    /// Sphere collider
    pub fn sphere(radius: f32) -> Self {
        Self::with_shape(ColliderShape::Sphere { radius })
    }

    /// Box collider with full edge lengths `size`
    pub fn cuboid(size: Vec3) -> Self {
        Self::with_shape(ColliderShape::Box { size })
    }

    /// Capsule collider
    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::with_shape(ColliderShape::Capsule { radius, height })
    }

    /// Mesh collider
    pub fn mesh() -> Self {
        Self::with_shape(ColliderShape::Mesh)
    }

    /// Builder pattern: Set local offset
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Builder pattern: Mark as trigger
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Place the shape at `body_position`
    pub fn to_world_space(&self, body_position: Vec3) -> WorldSpaceShape {
        let center = body_position + self.offset;
        match &self.shape {
            ColliderShape::Sphere { radius } => {
                WorldSpaceShape::Sphere(BoundingSphere::new(center, *radius))
            }
            ColliderShape::Box { size } => {
                WorldSpaceShape::Box(Aabb::from_center_extents(center, size * 0.5))
            }
            ColliderShape::Capsule { .. } | ColliderShape::Mesh => WorldSpaceShape::Unsupported,
        }
    }

    pub(crate) fn write(&self, data: &mut ComponentData, prefix: &str) {
        data.set(format!("{prefix}.shape"), self.shape.name());
        match &self.shape {
            ColliderShape::Box { size } => data.set_vec3(&format!("{prefix}.size"), size),
            ColliderShape::Sphere { radius } => data.set(format!("{prefix}.radius"), *radius),
            ColliderShape::Capsule { radius, height } => {
                data.set(format!("{prefix}.radius"), *radius);
                data.set(format!("{prefix}.height"), *height);
            }
            ColliderShape::Mesh => {}
        }
        data.set_vec3(&format!("{prefix}.offset"), &self.offset);
        data.set(format!("{prefix}.is_trigger"), self.is_trigger);
    }

    pub(crate) fn read(data: &ComponentData, prefix: &str) -> Result<Self, ComponentError> {
        let shape_key = format!("{prefix}.shape");
        let mut size = Vec3::new(1.0, 1.0, 1.0);
        data.read_vec3(&format!("{prefix}.size"), &mut size)?;
        let mut radius = 0.5;
        data.read_f32(&format!("{prefix}.radius"), &mut radius)?;
        let mut height = 2.0;
        data.read_f32(&format!("{prefix}.height"), &mut height)?;

        let Some(shape_name) = data.text(&shape_key)? else {
            return Err(ComponentError::MissingField(shape_key));
        };
        let shape = match shape_name {
            "box" => ColliderShape::Box { size },
            "sphere" => ColliderShape::Sphere { radius },
            "capsule" => ColliderShape::Capsule { radius, height },
            "mesh" => ColliderShape::Mesh,
            other => {
                return Err(ComponentError::InvalidValue {
                    field: shape_key,
                    value: other.to_owned(),
                })
            }
        };

        let mut collider = Self::with_shape(shape);
        data.read_vec3(&format!("{prefix}.offset"), &mut collider.offset)?;
        data.read_bool(&format!("{prefix}.is_trigger"), &mut collider.is_trigger)?;
        Ok(collider)
    }
}

/// Contact between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec3,
    /// Penetration depth along `normal`
    pub depth: f32,
}

impl Contact {
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Collider placed in world space for the narrow phase and raycasts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldSpaceShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space axis-aligned box
    Box(Aabb),
    /// A shape the narrow phase does not handle
    Unsupported,
}

impl WorldSpaceShape {
    /// Contact with `other`, normal oriented from `self` toward `other`
    ///
    /// Pairs involving an unsupported shape never collide.
    pub fn contact(&self, other: &Self) -> Option<Contact> {
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => sphere_sphere(a, b),
            (Self::Box(a), Self::Box(b)) => box_box(a, b),
            (Self::Sphere(sphere), Self::Box(aabb)) => sphere_box(sphere, aabb),
            (Self::Box(aabb), Self::Sphere(sphere)) => {
                sphere_box(sphere, aabb).map(Contact::flipped)
            }
            _ => None,
        }
    }

    /// Normal reported to collision observers for a contact from [`contact`](Self::contact)
    ///
    /// Sphere pairs keep the `self`→`other` direction. Box pairs point toward
    /// `self`. Sphere–box pairs point from the box surface toward the sphere
    /// centre, whichever side the sphere is on.
    pub fn reported_normal(&self, other: &Self, contact: &Contact) -> Vec3 {
        match (self, other) {
            (Self::Box(_) | Self::Sphere(_), Self::Box(_)) => -contact.normal,
            _ => contact.normal,
        }
    }

    /// Test ray intersection, returning `(distance, hit_point, normal)`
    ///
    /// Only spheres are raycast; boxes and unsupported shapes report no hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        match self {
            Self::Sphere(sphere) => sphere.intersect_ray(ray),
            // TODO: slab test against the box once box raycasts are wanted
            Self::Box(_) | Self::Unsupported => None,
        }
    }
}

/// Sphere against sphere; the contact point lies on `a`'s surface
pub fn sphere_sphere(a: &BoundingSphere, b: &BoundingSphere) -> Option<Contact> {
    let delta = b.center - a.center;
    let distance = delta.magnitude();
    let radius_sum = a.radius + b.radius;
    if distance >= radius_sum {
        return None;
    }

    // Coincident centers have no direction; separate along +Y
    let normal = if distance > constants::EPSILON {
        delta / distance
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };

    Some(Contact {
        point: a.center + normal * a.radius,
        normal,
        depth: radius_sum - distance,
    })
}

/// Axis-aligned box against box; the axis of least overlap is the normal
pub fn box_box(a: &Aabb, b: &Aabb) -> Option<Contact> {
    let mut best_axis = 0;
    let mut best_overlap = f32::MAX;
    for axis in 0..3 {
        let overlap = a.max[axis].min(b.max[axis]) - a.min[axis].max(b.min[axis]);
        if overlap <= 0.0 {
            return None;
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
    }

    let (center_a, center_b) = (a.center(), b.center());
    let mut normal = Vec3::zeros();
    normal[best_axis] = if center_b[best_axis] >= center_a[best_axis] {
        1.0
    } else {
        -1.0
    };

    Some(Contact {
        point: (center_a + center_b) * 0.5,
        normal,
        depth: best_overlap,
    })
}

/// Sphere against axis-aligned box; normal points from the sphere into the box
pub fn sphere_box(sphere: &BoundingSphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let offset = sphere.center - closest;
    let distance = offset.magnitude();
    if distance >= sphere.radius {
        return None;
    }

    if distance > constants::EPSILON {
        return Some(Contact {
            point: closest,
            normal: -offset / distance,
            depth: sphere.radius - distance,
        });
    }

    // Center inside the box: push out through the nearest face
    let mut best_axis = 0;
    let mut best_gap = f32::MAX;
    let mut best_outward = 1.0;
    for axis in 0..3 {
        let to_min = sphere.center[axis] - aabb.min[axis];
        let to_max = aabb.max[axis] - sphere.center[axis];
        if to_min < best_gap {
            best_gap = to_min;
            best_axis = axis;
            best_outward = -1.0;
        }
        if to_max < best_gap {
            best_gap = to_max;
            best_axis = axis;
            best_outward = 1.0;
        }
    }

    let mut outward = Vec3::zeros();
    outward[best_axis] = best_outward;
    let mut point = sphere.center;
    point[best_axis] = if best_outward > 0.0 {
        aabb.max[best_axis]
    } else {
        aabb.min[best_axis]
    };

    Some(Contact {
        point,
        normal: -outward,
        depth: sphere.radius + best_gap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sphere_at(x: f32, radius: f32) -> WorldSpaceShape {
        Collider::sphere(radius).to_world_space(Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_sphere_sphere_contact() {
        let contact = sphere_at(0.0, 0.5).contact(&sphere_at(0.8, 0.5)).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(contact.depth, 0.2, epsilon = 1e-5);
        assert_relative_eq!(contact.point, Vec3::new(0.5, 0.0, 0.0));

        assert!(sphere_at(0.0, 0.5).contact(&sphere_at(1.0, 0.5)).is_none());
    }

    #[test]
    fn test_sphere_sphere_symmetry() {
        let a = Collider::sphere(0.7).to_world_space(Vec3::new(0.1, 0.4, -0.2));
        let b = Collider::sphere(0.6).to_world_space(Vec3::new(0.9, -0.1, 0.5));
        let ab = a.contact(&b).expect("overlap");
        let ba = b.contact(&a).expect("overlap");
        assert_relative_eq!(ab.normal, -ba.normal, epsilon = 1e-6);
        assert_relative_eq!(ab.depth, ba.depth, epsilon = 1e-6);
    }

    #[test]
    fn test_coincident_spheres_separate_vertically() {
        let contact = sphere_at(0.0, 0.5).contact(&sphere_at(0.0, 0.5)).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(contact.depth, 1.0);
    }

    #[test]
    fn test_box_box_uses_least_overlap_axis() {
        let a = Collider::cuboid(Vec3::new(2.0, 2.0, 2.0)).to_world_space(Vec3::zeros());
        let b = Collider::cuboid(Vec3::new(2.0, 2.0, 2.0)).to_world_space(Vec3::new(0.2, -1.5, 0.1));

        let contact = a.contact(&b).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(contact.depth, 0.5, epsilon = 1e-5);
        assert_relative_eq!(contact.point, Vec3::new(0.1, -0.75, 0.05), epsilon = 1e-5);

        let reverse = b.contact(&a).expect("overlap");
        assert_relative_eq!(reverse.normal, Vec3::new(0.0, 1.0, 0.0));

        let apart = Collider::cuboid(Vec3::new(2.0, 2.0, 2.0)).to_world_space(Vec3::new(2.0, 0.0, 0.0));
        assert!(a.contact(&apart).is_none());
    }

    #[test]
    fn test_sphere_box_contact_from_both_sides() {
        let ground = Collider::cuboid(Vec3::new(10.0, 1.0, 10.0)).to_world_space(Vec3::zeros());
        let ball = Collider::sphere(0.5).to_world_space(Vec3::new(1.0, 0.8, 0.0));

        let contact = ball.contact(&ground).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(contact.depth, 0.2, epsilon = 1e-5);
        assert_relative_eq!(contact.point, Vec3::new(1.0, 0.5, 0.0));

        let reverse = ground.contact(&ball).expect("overlap");
        assert_relative_eq!(reverse.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(reverse.depth, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_reported_normal_orientation() {
        let cube = |x: f32, y: f32| {
            Collider::cuboid(Vec3::new(2.0, 2.0, 2.0)).to_world_space(Vec3::new(x, y, 0.0))
        };

        let (a, b) = (cube(0.0, 0.0), cube(1.5, 0.0));
        let contact = a.contact(&b).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(a.reported_normal(&b, &contact), Vec3::new(-1.0, 0.0, 0.0));

        let ball = Collider::sphere(0.5).to_world_space(Vec3::new(0.0, 5.0, 0.0));
        let ceiling = cube(0.0, 6.2);
        let contact = ball.contact(&ceiling).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(
            ball.reported_normal(&ceiling, &contact),
            Vec3::new(0.0, -1.0, 0.0),
            epsilon = 1e-6
        );

        let contact = ceiling.contact(&ball).expect("overlap");
        assert_relative_eq!(
            ceiling.reported_normal(&ball, &contact),
            Vec3::new(0.0, -1.0, 0.0),
            epsilon = 1e-6
        );

        let (left, right) = (sphere_at(0.0, 0.5), sphere_at(0.8, 0.5));
        let contact = left.contact(&right).expect("overlap");
        assert_relative_eq!(left.reported_normal(&right, &contact), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_sphere_center_inside_box() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.9), 0.25);
        let contact = sphere_box(&sphere, &aabb).expect("overlap");
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(contact.depth, 0.35, epsilon = 1e-5);
        assert_relative_eq!(contact.point, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_unsupported_shapes_never_collide() {
        let capsule = Collider::capsule(0.5, 2.0).to_world_space(Vec3::zeros());
        let mesh = Collider::mesh().to_world_space(Vec3::zeros());
        assert!(capsule.contact(&sphere_at(0.0, 1.0)).is_none());
        assert!(sphere_at(0.0, 1.0).contact(&mesh).is_none());
        assert!(capsule.contact(&mesh).is_none());
    }

    #[test]
    fn test_offset_moves_world_shape() {
        let shape = Collider::sphere(1.0)
            .with_offset(Vec3::new(0.0, 2.0, 0.0))
            .to_world_space(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            shape,
            WorldSpaceShape::Sphere(BoundingSphere::new(Vec3::new(1.0, 2.0, 0.0), 1.0))
        );
    }

    #[test]
    fn test_only_spheres_are_raycast() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).expect("ray");
        assert!(sphere_at(0.0, 1.0).intersect_ray(&ray).is_some());
        let cube = Collider::cuboid(Vec3::new(2.0, 2.0, 2.0)).to_world_space(Vec3::zeros());
        assert!(cube.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_collider_data_roundtrip() {
        let colliders = [
            Collider::cuboid(Vec3::new(1.0, 2.0, 3.0)).with_offset(Vec3::new(0.5, 0.0, 0.0)),
            Collider::sphere(0.75).as_trigger(),
            Collider::capsule(0.3, 1.8),
            Collider::mesh(),
        ];
        let mut data = ComponentData::new();
        for (index, collider) in colliders.iter().enumerate() {
            collider.write(&mut data, &format!("colliders.{index}"));
        }
        for (index, collider) in colliders.iter().enumerate() {
            let restored = Collider::read(&data, &format!("colliders.{index}")).expect("valid");
            assert_eq!(&restored, collider);
        }
    }

    #[test]
    fn test_missing_shape_is_rejected() {
        let mut data = ComponentData::new();
        data.set("c.radius", 2.0_f32);
        assert_eq!(
            Collider::read(&data, "c"),
            Err(ComponentError::MissingField("c.shape".to_owned()))
        );
    }

    #[test]
    fn test_unknown_shape_name_is_rejected() {
        let mut data = ComponentData::new();
        data.set("c.shape", "torus");
        assert_eq!(
            Collider::read(&data, "c"),
            Err(ComponentError::InvalidValue {
                field: "c.shape".to_owned(),
                value: "torus".to_owned(),
            })
        );
    }
}
