//! View descriptors for the wireframe rasterizer
//!
//! A [`ViewDescriptor`] is the frustum description the rasterizer
//! collaborator consumes: center of projection, view reference point,
//! view-plane normal, up vector, window half-extents, depth range and
//! projection kind. Descriptors are derived from a pose every frame and are
//! never stored between frames.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use wireview_core::{Point3d, Pose, Vector3d};

/// Default depth range of the view volume
pub const DEFAULT_DEPTH: (f64, f64) = (0.0, 100.0);

/// Projection used by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

/// Pixel aspect override of a view.
///
/// `(1, 1)` means square pixels; the window is then sized from the image
/// aspect ratio alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelScale {
    pub x: f64,
    pub y: f64,
}

impl PixelScale {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both scales differ from one
    pub fn is_non_unit(&self) -> bool {
        self.x != 1.0 && self.y != 1.0
    }
}

impl Default for PixelScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Window half-extents `(u, v)` for an image of `width` x `height` pixels
pub fn window_half_extents(width: u32, height: u32, scale: PixelScale) -> (f64, f64) {
    let (w, h) = (width as f64, height as f64);
    if scale.is_non_unit() {
        (w / (2.0 * scale.x), h / (2.0 * scale.y))
    } else {
        let size = w.min(h);
        (w / size, h / size)
    }
}

/// Camera and frustum parameters for one rendered subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDescriptor {
    /// Center of projection
    pub cop: Point3d,
    /// View reference point, one unit along the normal from the cop
    pub vrp: Point3d,
    /// View-plane normal
    pub vpn: Vector3d,
    /// Up vector
    pub vup: Vector3d,
    /// Window half-extents `(u, v)`
    pub window: (f64, f64),
    /// Near and far depth
    pub depth: (f64, f64),
    pub projection: ProjectionKind,
}

impl ViewDescriptor {
    /// Build the descriptor seen from `pose`.
    ///
    /// `pose` maps scene coordinates into the viewing camera frame. Its
    /// inverse gives the camera placement in the scene: the translation is
    /// the center of projection, the camera z axis the view-plane normal and
    /// the camera y axis the up vector.
    pub fn compose(pose: Pose, width: u32, height: u32, scale: PixelScale) -> Self {
        let placement = pose.inverse();
        let rotation = placement.rotation_matrix();
        let cop = Point3d::from(placement.translation_vector());
        let vpn: Vector3d = rotation.column(2).into_owned();
        let vup: Vector3d = rotation.column(1).into_owned();

        Self {
            cop,
            vrp: cop + vpn,
            vpn,
            vup,
            window: window_half_extents(width, height, scale),
            depth: DEFAULT_DEPTH,
            projection: ProjectionKind::Perspective,
        }
    }

    /// Same view with another projection kind
    pub fn with_projection(self, projection: ProjectionKind) -> Self {
        Self { projection, ..self }
    }

    /// Same view with another depth range
    pub fn with_depth(self, near: f64, far: f64) -> Self {
        Self {
            depth: (near, far),
            ..self
        }
    }

    /// Recover the pose mapping scene coordinates into the view frame
    pub fn view_pose(&self) -> Pose {
        let x_axis = self.vup.cross(&self.vpn);
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            x_axis, self.vup, self.vpn,
        ]));
        let placement = Pose::from(nalgebra::Isometry3::from_parts(
            self.cop.coords.into(),
            UnitQuaternion::from_rotation_matrix(&rotation),
        ));
        placement.inverse()
    }
}
