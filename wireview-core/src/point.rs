//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A sub-pixel location in an image.
///
/// `i` is the row (vertical) coordinate and `j` the column (horizontal) one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImagePoint {
    pub i: f64,
    pub j: f64,
}

impl ImagePoint {
    /// Create a new image point from a row and a column
    pub fn new(i: f64, j: f64) -> Self {
        Self { i, j }
    }
}

impl std::ops::Sub for ImagePoint {
    type Output = (f64, f64);

    /// Row and column offsets from `rhs` to `self`
    fn sub(self, rhs: Self) -> Self::Output {
        (self.i - rhs.i, self.j - rhs.j)
    }
}
