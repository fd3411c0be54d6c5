//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A polygonal face: ordered indices into the mesh point list
pub type Face = Vec<usize>;

/// A wireframe mesh with points and polygonal faces.
///
/// Faces may have any number of vertices. One and two vertex faces are
/// drawn as points and segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub points: Vec<Point3d>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from points and faces
    pub fn from_points_and_faces(points: Vec<Point3d>, faces: Vec<Face>) -> Self {
        Self { points, faces }
    }

    /// Get the number of points
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.faces.is_empty()
    }

    /// Add a point to the mesh
    pub fn add_point(&mut self, point: Point3d) -> usize {
        let index = self.points.len();
        self.points.push(point);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Multiply every point coordinate by `factor`
    pub fn scale(&mut self, factor: f64) {
        for point in &mut self.points {
            point.coords *= factor;
        }
    }

    /// Check that every face only references existing points
    pub fn validate(&self) -> Result<()> {
        let count = self.points.len();
        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&index| index >= count) {
                return Err(Error::InvalidData(format!(
                    "face {} references point {} but the mesh has {} points",
                    face_index, bad, count
                )));
            }
        }
        Ok(())
    }
}
