//! Mouse navigation of the external viewpoint
//!
//! The [`Navigator`] turns one non-blocking poll of the pointer per frame
//! into an incremental pose. Button 1 orbits, button 2 zooms along the
//! viewing axis and button 3 pans. The first button pressed owns the drag
//! until it is released; presses of other buttons in the meantime are
//! discarded when the drag ends.

use log::debug;
use wireview_core::{ImagePoint, Pose};

/// Translation per pixel of pointer motion while zooming
pub const ZOOM_GAIN: f64 = 0.01;

/// Translation per pixel of pointer motion while panning
pub const PAN_GAIN: f64 = 0.01;

/// Pointer buttons understood by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Orbit
    Button1,
    /// Zoom
    Button2,
    /// Pan
    Button3,
}

/// Non-blocking pointer input of a display surface.
///
/// Every method returns immediately, whether or not an event is pending.
pub trait PointerSource {
    /// Next buffered button press, if any
    fn poll_click(&mut self) -> Option<MouseButton>;

    /// Next buffered button release, if any
    fn poll_click_release(&mut self) -> Option<MouseButton>;

    /// Current pointer location in image coordinates
    fn pointer_position(&mut self) -> ImagePoint;
}

/// Navigation mode, one drag at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Idle,
    Orbiting,
    Zooming,
    Panning,
}

impl NavigationState {
    fn entered_by(button: MouseButton) -> Self {
        match button {
            MouseButton::Button1 => Self::Orbiting,
            MouseButton::Button2 => Self::Zooming,
            MouseButton::Button3 => Self::Panning,
        }
    }

    /// Button holding the drag, `None` when idle
    pub fn button(&self) -> Option<MouseButton> {
        match self {
            Self::Idle => None,
            Self::Orbiting => Some(MouseButton::Button1),
            Self::Zooming => Some(MouseButton::Button2),
            Self::Panning => Some(MouseButton::Button3),
        }
    }
}

/// Outcome of one navigation poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationStep {
    /// Incremental motion of the external viewpoint
    pub delta: Pose,
    /// The delta moves the viewpoint along its depth axis
    pub viewpoint_changed: bool,
}

impl NavigationStep {
    fn from_delta(delta: Pose) -> Self {
        Self {
            viewpoint_changed: delta.translation_vector().z != 0.0,
            delta,
        }
    }

    fn still() -> Self {
        Self::from_delta(Pose::identity())
    }
}

/// Per-frame pointer state machine producing viewpoint deltas
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: NavigationState,
    origin: Option<ImagePoint>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Pointer position recorded on the previous frame of the current drag
    pub fn origin(&self) -> Option<ImagePoint> {
        self.origin
    }

    /// Poll the pointer once and return the motion of this frame.
    ///
    /// `width` and `height` are the dimensions of the external view; the
    /// orbit gain is one full turn per `min(width, height)` pixels.
    pub fn poll(&mut self, pointer: &mut dyn PointerSource, width: u32, height: u32) -> NavigationStep {
        match self.state.button() {
            None => {
                // A release left over from a drag that ended elsewhere
                let _ = pointer.poll_click_release();
                if let Some(button) = pointer.poll_click() {
                    self.state = NavigationState::entered_by(button);
                    self.origin = None;
                    debug!("navigation: {:?} -> {:?}", NavigationState::Idle, self.state);
                }
            }
            Some(held) => {
                if pointer.poll_click_release() == Some(held) {
                    debug!("navigation: {:?} -> {:?}", self.state, NavigationState::Idle);
                    self.state = NavigationState::Idle;
                    self.origin = None;
                    while pointer.poll_click().is_some() {}
                }
            }
        }

        if self.state == NavigationState::Idle {
            return NavigationStep::still();
        }

        let position = pointer.pointer_position();
        let previous = self.origin.replace(position);
        let Some(previous) = previous else {
            return NavigationStep::still();
        };

        let (di, dj) = position - previous;
        let delta = match self.state {
            NavigationState::Orbiting => {
                let size = width.min(height).max(1) as f64;
                let angle_i = di * 360.0 / size;
                let angle_j = dj * 360.0 / size;
                Pose::rotation(-angle_i.to_radians(), angle_j.to_radians(), 0.0)
            }
            NavigationState::Zooming => Pose::translation(0.0, 0.0, di * ZOOM_GAIN),
            NavigationState::Panning => Pose::translation(dj * PAN_GAIN, di * PAN_GAIN, 0.0),
            NavigationState::Idle => Pose::identity(),
        };
        NavigationStep::from_delta(delta)
    }
}

/// The navigable external camera.
///
/// The pose is kept in the rasterizer convention, a half-turn about z away
/// from the pinhole convention used by callers. Zoom moves a pivot along
/// the viewing axis; orbit and pan act about that pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalViewpoint {
    cam_mf: Pose,
    pivot: Pose,
    changed: bool,
}

impl ExternalViewpoint {
    /// Viewpoint placed at `cam_mf`, given in caller convention
    pub fn new(cam_mf: Pose) -> Self {
        let mut viewpoint = Self {
            cam_mf: Pose::identity(),
            pivot: Pose::identity(),
            changed: false,
        };
        viewpoint.set(cam_mf);
        viewpoint
    }

    /// Move the viewpoint to `cam_mf` (caller convention) and flag the change
    pub fn set(&mut self, cam_mf: Pose) {
        self.cam_mf = Pose::half_turn_z() * cam_mf;
        self.pivot = Pose::translation(0.0, 0.0, self.cam_mf.translation_vector().z);
        self.changed = true;
    }

    /// Apply a navigation delta
    pub fn apply(&mut self, delta: &Pose) {
        if delta.translation_vector().z != 0.0 {
            self.pivot = self.pivot * *delta;
        }
        let pivot_to_camera = self.pivot.inverse() * self.cam_mf;
        self.cam_mf = self.pivot * *delta * pivot_to_camera;
    }

    /// World placement in the rasterizer convention
    pub fn raster_pose(&self) -> Pose {
        self.cam_mf
    }

    /// World placement in caller convention
    pub fn pose(&self) -> Pose {
        Pose::half_turn_z() * self.cam_mf
    }

    /// Zoom pivot
    pub fn pivot(&self) -> Pose {
        self.pivot
    }

    /// Whether the viewpoint was set since the last call, clearing the flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl Default for ExternalViewpoint {
    fn default() -> Self {
        Self::new(Pose::identity())
    }
}
