//! Core traits for wireview

use crate::{mesh::Mesh, point::Point3d};

/// Trait for drawable objects with a spatial extent
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3d, Point3d);

    /// Get the center point of the object
    fn center(&self) -> Point3d {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

impl Drawable for Mesh {
    fn bounding_box(&self) -> (Point3d, Point3d) {
        let Some(first) = self.points.first() else {
            return (Point3d::origin(), Point3d::origin());
        };

        let mut min = *first;
        let mut max = *first;

        for point in &self.points {
            min = min.inf(point);
            max = max.sup(point);
        }

        (min, max)
    }
}
