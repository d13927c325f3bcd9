//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the few helpers the simulation needs
//! (TRS composition and Euler/quaternion conversion).

pub use nalgebra::{Matrix3, Matrix4, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Tolerance below which lengths and divisors are treated as zero
    pub const EPSILON: f32 = 1e-6;
}

/// Canonical axes of the simulation's right-handed, Y-up frame
pub mod axes {
    use super::Vec3;

    /// Local right direction (+X)
    pub fn right() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    /// Local up direction (+Y)
    pub fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    /// Local forward direction (-Z)
    pub fn forward() -> Vec3 {
        Vec3::new(0.0, 0.0, -1.0)
    }
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat4, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Build a rotation from Euler angles in radians (x = roll, y = pitch, z = yaw)
    pub fn quat_from_euler(euler: &Vec3) -> Quat {
        Quat::from_euler_angles(euler.x, euler.y, euler.z)
    }

    /// Extract Euler angles in radians from a rotation
    pub fn euler_from_quat(rotation: &Quat) -> Vec3 {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Vec3::new(roll, pitch, yaw)
    }

    /// Compose a translation * rotation * scale matrix
    pub fn compose_trs(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
        Mat4::new_translation(position)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(scale)
    }

    /// Translation column of an affine matrix
    pub fn translation_of(matrix: &Mat4) -> Vec3 {
        Vec3::new(matrix.m14, matrix.m24, matrix.m34)
    }

    /// Normalize a vector, returning `None` when it is too short to carry a direction
    pub fn try_normalize(vector: &Vec3) -> Option<Vec3> {
        vector.try_normalize(constants::EPSILON)
    }
}
