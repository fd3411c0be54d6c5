//! Scene loading for wireview
//!
//! This crate owns the meshes of a simulated scene (current object,
//! desired object and camera proxy) and routes scene files to the reader
//! collaborator registered for their format.

pub mod presets;
pub mod registry;
pub mod scene;

pub use presets::{CullingMode, DesiredObject, DesiredSource, SceneObject, SceneSelection, SceneSource};
pub use registry::{FormatRegistry, MeshReader, ModelFormat};
pub use scene::{SceneSlot, SceneStore};
