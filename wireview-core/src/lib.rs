//! Core data structures and traits for wireview
//!
//! This crate provides the value types shared by the scene store and the
//! renderer: rigid poses, polygonal meshes, image points, colours and
//! render-target images.

pub mod point;
pub mod pose;
pub mod mesh;
pub mod image;
pub mod traits;
pub mod error;

pub use point::*;
pub use pose::*;
pub use mesh::*;
pub use image::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3, Matrix4, Isometry3};
