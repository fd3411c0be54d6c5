//! Wireframe views of a camera servoing scene
//!
//! This crate renders the scene loaded by `wireview-io` from two points of
//! view:
//! - the internal view, seen by the tracked camera
//! - the external view, seen by an observer steered with the mouse, with the
//!   recent trajectory of the tracked camera drawn over it
//!
//! Clipping and rasterization of meshes and the pixel-level drawing are
//! left to the [`Rasterizer`] and [`DisplaySurface`] implementations given
//! by the caller.

pub mod camera;
pub mod config;
pub mod navigator;
pub mod projection;
pub mod renderer;
pub mod trajectory;

pub use camera::*;
pub use config::*;
pub use navigator::*;
pub use projection::*;
pub use renderer::*;
pub use trajectory::*;
