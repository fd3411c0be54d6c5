//! Scene store: loads and owns the meshes drawn by the simulator

use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use wireview_core::{Drawable, Error, Mesh, Result};

use crate::presets::{CullingMode, SceneSelection};
use crate::registry::{FormatRegistry, ModelFormat};

/// The meshes a scene is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSlot {
    /// The object at its current pose
    Object,
    /// The object at its desired pose
    DesiredObject,
    /// Proxy mesh drawn at the camera pose in the external view
    Camera,
}

/// Owns up to three loaded meshes and dispatches file loading by format
pub struct SceneStore {
    registry: FormatRegistry,
    object: Option<Mesh>,
    desired: Option<Mesh>,
    camera: Option<Mesh>,
    culling: CullingMode,
    desired_is_tool: bool,
}

impl SceneStore {
    /// Create an empty store reading files through `registry`
    pub fn new(registry: FormatRegistry) -> Self {
        Self {
            registry,
            object: None,
            desired: None,
            camera: None,
            culling: CullingMode::Back,
            desired_is_tool: false,
        }
    }

    /// Load a mesh from `path`, scaling every point by `scale`.
    ///
    /// The format is chosen from the extension before the file is opened.
    pub fn load(&self, path: impl AsRef<Path>, scale: f64) -> Result<Mesh> {
        let path = path.as_ref();
        let format = ModelFormat::detect(path)
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))?;
        let reader = self.registry.reader(format).inspect_err(|e| {
            warn!("cannot load {}: {}", path.display(), e);
        })?;
        debug!("loading {} as {} with '{}'", path.display(), format, reader.format_name());

        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut source = BufReader::new(file);
        let mut mesh = reader.read_mesh(&mut source, path)?;
        mesh.validate()?;

        if scale != 1.0 {
            mesh.scale(scale);
        }

        let (min, max) = mesh.bounding_box();
        info!(
            "loaded {}: {} points, {} faces, extent [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
            path.display(),
            mesh.point_count(),
            mesh.face_count(),
            min.x, min.y, min.z,
            max.x, max.y, max.z
        );
        Ok(mesh)
    }

    /// Load a mesh into a slot. On failure the slot keeps its previous mesh.
    pub fn load_into(&mut self, slot: SceneSlot, path: impl AsRef<Path>, scale: f64) -> Result<()> {
        let mesh = self.load(path, scale)?;
        *self.slot_mut(slot) = Some(mesh);
        Ok(())
    }

    /// Load every mesh of a scene selection.
    ///
    /// All files are read before any slot changes, so a failure leaves the
    /// store exactly as it was.
    pub fn init(&mut self, selection: &SceneSelection, camera_factor: f64) -> Result<()> {
        let (camera_path, camera_scale) = selection.camera_path(camera_factor);
        let camera = self.load(&camera_path, camera_scale)?;
        let object = self.load(selection.object_path(), 1.0)?;
        let desired = match selection.desired_path() {
            Some(path) => Some(self.load(path, 1.0)?),
            None => None,
        };

        self.camera = Some(camera);
        self.object = Some(object);
        self.desired = desired;
        self.culling = selection.culling_mode();
        self.desired_is_tool = selection.desired_is_tool();
        info!(
            "scene initialized (desired object: {}, culling: {:?})",
            self.desired.is_some(),
            self.culling
        );
        Ok(())
    }

    /// Get the mesh in a slot
    pub fn mesh(&self, slot: SceneSlot) -> Option<&Mesh> {
        match slot {
            SceneSlot::Object => self.object.as_ref(),
            SceneSlot::DesiredObject => self.desired.as_ref(),
            SceneSlot::Camera => self.camera.as_ref(),
        }
    }

    /// A scene is initialized once the current object is loaded
    pub fn is_initialized(&self) -> bool {
        self.object.is_some()
    }

    /// Face culling for the loaded scene
    pub fn culling_mode(&self) -> CullingMode {
        self.culling
    }

    /// Whether the desired object is a camera-like tool drawn at the desired camera pose
    pub fn desired_is_tool(&self) -> bool {
        self.desired_is_tool
    }

    fn slot_mut(&mut self, slot: SceneSlot) -> &mut Option<Mesh> {
        match slot {
            SceneSlot::Object => &mut self.object,
            SceneSlot::DesiredObject => &mut self.desired,
            SceneSlot::Camera => &mut self.camera,
        }
    }
}
