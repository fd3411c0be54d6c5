//! Rigid 3D poses between reference frames

use nalgebra::{Isometry3, Matrix3, Matrix4, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::point::{Point3d, Vector3d};

/// A rigid transformation (rotation + translation) between two frames.
///
/// Poses follow the `aMb` naming of the control loop: a pose `cMo` maps
/// coordinates expressed in the object frame to the camera frame. Poses
/// compose by multiplication, `cMf = cMo * oMf`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub isometry: Isometry3<f64>,
}

impl Pose {
    /// Create an identity pose
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    /// Create a pure translation
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            isometry: Isometry3::translation(tx, ty, tz),
        }
    }

    /// Create a pure rotation from a rotation vector (axis times angle, radians)
    pub fn rotation(rx: f64, ry: f64, rz: f64) -> Self {
        Self::from_parts(0.0, 0.0, 0.0, rx, ry, rz)
    }

    /// Create a pose from a translation and a rotation vector (axis times angle, radians)
    pub fn from_parts(tx: f64, ty: f64, tz: f64, rx: f64, ry: f64, rz: f64) -> Self {
        let rotation = UnitQuaternion::from_scaled_axis(Vector3d::new(rx, ry, rz));
        Self {
            isometry: Isometry3::from_parts(Translation3::new(tx, ty, tz), rotation),
        }
    }

    /// Half-turn about the z axis, used to move between the pinhole and the
    /// rasterizer camera conventions
    pub fn half_turn_z() -> Self {
        Self::rotation(0.0, 0.0, std::f64::consts::PI)
    }

    /// Translation component
    pub fn translation_vector(&self) -> Vector3d {
        self.isometry.translation.vector
    }

    /// Rotation block as a 3x3 matrix
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.isometry.rotation.to_rotation_matrix().into_inner()
    }

    /// Full 4x4 homogeneous matrix
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        self.isometry.to_homogeneous()
    }

    /// Compose this pose with another
    pub fn compose(self, other: Self) -> Self {
        Self {
            isometry: self.isometry * other.isometry,
        }
    }

    /// Get the inverse pose. Rigid transforms are always invertible.
    pub fn inverse(self) -> Self {
        Self {
            isometry: self.isometry.inverse(),
        }
    }

    /// Apply the pose to a point
    pub fn transform_point(&self, point: &Point3d) -> Point3d {
        self.isometry.transform_point(point)
    }

    /// Check if this is approximately the identity transformation
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.to_homogeneous() - Matrix4::identity()).norm() < epsilon
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Pose {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Isometry3<f64>> for Pose {
    fn from(isometry: Isometry3<f64>) -> Self {
        Self { isometry }
    }
}
