//! Simulator configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use wireview_core::{Color, Error, Result};
use wireview_io::SceneSelection;

use crate::camera::PixelScale;
use crate::trajectory::{TrajectoryStyle, DEFAULT_TRAJECTORY_CAPACITY};

/// Trajectory display options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Maximum number of retained samples
    pub capacity: usize,
    pub style: TrajectoryStyle,
    /// Draw the trajectory in the navigated external view
    pub visible: bool,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TRAJECTORY_CAPACITY,
            style: TrajectoryStyle::Line,
            visible: true,
        }
    }
}

/// Display colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub camera: Color,
    pub trajectory: Color,
    pub current_object: Color,
    pub desired_object: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            camera: Color::GREEN,
            trajectory: Color::GREEN,
            current_object: Color::BLUE,
            desired_object: Color::RED,
        }
    }
}

/// Configuration of a [`WireframeSimulator`](crate::WireframeSimulator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub scene: SceneSelection,
    /// Scale applied to the camera proxy model
    pub camera_factor: f64,
    pub internal_pixel_scale: PixelScale,
    pub external_pixel_scale: PixelScale,
    pub trajectory: TrajectoryConfig,
    pub colors: ColorScheme,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            scene: SceneSelection::default(),
            camera_factor: 1.0,
            internal_pixel_scale: PixelScale::default(),
            external_pixel_scale: PixelScale::default(),
            trajectory: TrajectoryConfig::default(),
            colors: ColorScheme::default(),
        }
    }
}

impl SimulatorConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&json).map_err(|e| match e {
            Error::Config(message) => Error::Config(format!("{}: {}", path.display(), message)),
            other => other,
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
