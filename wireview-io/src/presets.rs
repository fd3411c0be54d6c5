//! Named scene presets and scene selection

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Preset scenes for the object at its current pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneObject {
    ThreePoints,
    Cube,
    Plate,
    SmallPlate,
    Rectangle,
    #[serde(rename = "square_10cm")]
    Square10Cm,
    Diamond,
    Trapezoid,
    ThreeLines,
    Road,
    Tire,
    Pipe,
    Circle,
    Sphere,
    Cylinder,
    Plane,
}

impl SceneObject {
    /// File name of the preset inside the scenes directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SceneObject::ThreePoints => "3pts.bnd",
            SceneObject::Cube => "cube.bnd",
            SceneObject::Plate => "plate.bnd",
            SceneObject::SmallPlate => "plate_6cm.bnd",
            SceneObject::Rectangle => "rectangle.bnd",
            SceneObject::Square10Cm => "square10cm.bnd",
            SceneObject::Diamond => "diamond.bnd",
            SceneObject::Trapezoid => "trapezoid.bnd",
            SceneObject::ThreeLines => "line.bnd",
            SceneObject::Road => "road.bnd",
            SceneObject::Tire => "circles2.bnd",
            SceneObject::Pipe => "pipe.bnd",
            SceneObject::Circle => "circle.bnd",
            SceneObject::Sphere => "sphere.bnd",
            SceneObject::Cylinder => "cylinder.bnd",
            SceneObject::Plane => "plan.bnd",
        }
    }

    /// Face culling used when drawing this preset
    pub fn culling_mode(&self) -> CullingMode {
        match self {
            SceneObject::Pipe => CullingMode::Inside,
            _ => CullingMode::Back,
        }
    }
}

/// Preset scenes for the object at its desired pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredObject {
    /// Same model as the current object
    Standard,
    Circle,
    /// A camera-like tool, drawn at the desired camera pose
    Tool,
}

impl DesiredObject {
    /// File name of the preset, `None` when the current object's model is reused
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            DesiredObject::Standard => None,
            DesiredObject::Circle => Some("cercle_sq2.bnd"),
            DesiredObject::Tool => Some("tool.bnd"),
        }
    }
}

/// Which faces the rasterizer keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullingMode {
    /// Drop faces turned away from the viewer
    #[default]
    Back,
    /// The viewer is inside the object; drop faces turned towards it
    Inside,
}

/// Where the current object's model comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneSource {
    Preset(SceneObject),
    File(PathBuf),
}

/// Where the desired object's model comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredSource {
    Preset(DesiredObject),
    File(PathBuf),
}

/// Complete scene selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSelection {
    /// Directory holding the preset files and the camera proxy models
    pub scenes_dir: PathBuf,
    pub object: SceneSource,
    pub desired: Option<DesiredSource>,
}

impl Default for SceneSelection {
    fn default() -> Self {
        Self {
            scenes_dir: PathBuf::from("scenes"),
            object: SceneSource::Preset(SceneObject::Cube),
            desired: None,
        }
    }
}

impl SceneSelection {
    /// Path of the current object's model
    pub fn object_path(&self) -> PathBuf {
        match &self.object {
            SceneSource::Preset(preset) => self.scenes_dir.join(preset.file_name()),
            SceneSource::File(path) => path.clone(),
        }
    }

    /// Path of the desired object's model, if one is selected
    pub fn desired_path(&self) -> Option<PathBuf> {
        match self.desired.as_ref()? {
            DesiredSource::Preset(preset) => Some(match preset.file_name() {
                Some(file) => self.scenes_dir.join(file),
                None => self.object_path(),
            }),
            DesiredSource::File(path) => Some(path.clone()),
        }
    }

    /// Whether the desired object is drawn as a camera-like tool
    pub fn desired_is_tool(&self) -> bool {
        matches!(self.desired, Some(DesiredSource::Preset(DesiredObject::Tool)))
    }

    /// Path and scale of the camera proxy model.
    ///
    /// The tool model stands in for the camera when the desired object is
    /// the tool; it is never rescaled.
    pub fn camera_path(&self, camera_factor: f64) -> (PathBuf, f64) {
        if self.desired_is_tool() {
            (self.scenes_dir.join("tool.bnd"), 1.0)
        } else {
            (self.scenes_dir.join("camera.bnd"), camera_factor)
        }
    }

    /// Face culling for the selected object
    pub fn culling_mode(&self) -> CullingMode {
        match &self.object {
            SceneSource::Preset(preset) => preset.culling_mode(),
            SceneSource::File(_) => CullingMode::Back,
        }
    }

    /// Select a preset object in `scenes_dir`
    pub fn preset(scenes_dir: impl AsRef<Path>, object: SceneObject) -> Self {
        Self {
            scenes_dir: scenes_dir.as_ref().to_path_buf(),
            object: SceneSource::Preset(object),
            desired: None,
        }
    }

    /// Use a model file for the current object
    pub fn file(scenes_dir: impl AsRef<Path>, object: impl AsRef<Path>) -> Self {
        Self {
            scenes_dir: scenes_dir.as_ref().to_path_buf(),
            object: SceneSource::File(object.as_ref().to_path_buf()),
            desired: None,
        }
    }

    /// Set the desired object
    pub fn with_desired(mut self, desired: DesiredSource) -> Self {
        self.desired = Some(desired);
        self
    }
}
