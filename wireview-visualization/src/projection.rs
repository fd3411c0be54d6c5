//! Pinhole projection of camera positions into the external view

use wireview_core::{ImagePoint, Point3d, Pose};

use crate::camera::PixelScale;
use crate::trajectory::{SampleProjector, TrajectorySample};

const MIN_DEPTH: f64 = 1e-12;

/// Intrinsic parameters of the external observer camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub px: f64,
    pub py: f64,
    pub u0: f64,
    pub v0: f64,
}

impl CameraIntrinsics {
    /// Intrinsics for an image of `width` x `height` pixels.
    ///
    /// Non-unit pixel scales are used as focal lengths; otherwise the focal
    /// length is half the smaller image dimension. The principal point is
    /// the image center.
    pub fn for_image(width: u32, height: u32, scale: PixelScale) -> Self {
        let (w, h) = (width as f64, height as f64);
        let (px, py) = if scale.is_non_unit() {
            (scale.x, scale.y)
        } else {
            let size = w.min(h) / 2.0;
            (size, size)
        };
        Self {
            px,
            py,
            u0: w / 2.0,
            v0: h / 2.0,
        }
    }

    /// Project a point given in camera coordinates; `None` on the camera plane
    pub fn project(&self, point: &Point3d) -> Option<ImagePoint> {
        if point.z.abs() < MIN_DEPTH {
            return None;
        }
        let x = point.x / point.z;
        let y = point.y / point.z;
        Some(ImagePoint::new(y * self.py + self.v0, x * self.px + self.u0))
    }
}

/// Project the center of the tracked camera into an external view.
///
/// `c_m_f` places the world in the external camera frame, `f_m_o` the object
/// in the world and `c_m_o` the object in the tracked camera frame.
pub fn project_camera_center(
    intrinsics: &CameraIntrinsics,
    c_m_f: &Pose,
    f_m_o: &Pose,
    c_m_o: &Pose,
) -> Option<ImagePoint> {
    let center = (*c_m_f * *f_m_o * c_m_o.inverse()).transform_point(&Point3d::origin());
    intrinsics.project(&center)
}

/// Projects trajectory samples through a fixed external camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalProjector {
    pub intrinsics: CameraIntrinsics,
    /// World placement in the external camera frame
    pub c_m_f: Pose,
}

impl SampleProjector for ExternalProjector {
    fn project(&self, sample: &TrajectorySample) -> Option<ImagePoint> {
        project_camera_center(
            &self.intrinsics,
            &self.c_m_f,
            &sample.object_pose,
            &sample.camera_pose,
        )
    }
}
