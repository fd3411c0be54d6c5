//! Wireframe rendering of the internal and external views
//!
//! [`WireframeSimulator`] composes the view descriptors of every frame,
//! hands meshes to a [`Rasterizer`] and draws the returned polygons through
//! a [`DisplaySurface`]. The navigated external view also steers its
//! viewpoint from pointer input and overlays the camera trajectory.
//!
//! Poses are given and returned in the pinhole convention. The rasterizer
//! works a half-turn about z away from it; the conversion happens here.

use log::{debug, info};
use wireview_core::{Color, Error, Image, ImagePoint, Mesh, Pixel, Pose, Result};
use wireview_io::{CullingMode, FormatRegistry, SceneSelection, SceneSlot, SceneStore};

use crate::camera::{PixelScale, ViewDescriptor};
use crate::config::{ColorScheme, SimulatorConfig};
use crate::navigator::{ExternalViewpoint, NavigationStep, Navigator, PointerSource};
use crate::projection::{project_camera_center, CameraIntrinsics, ExternalProjector};
use crate::trajectory::{TrajectoryCache, TrajectoryStyle};

/// Screen-space polygon returned by the rasterizer, already clipped
pub type Polygon = Vec<ImagePoint>;

/// Rendering state passed along with every rasterization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    pub culling: CullingMode,
}

/// Clipping and projection of a mesh into screen space
pub trait Rasterizer {
    /// Project the visible faces of `mesh`, placed in the scene by `model`,
    /// into a `width` x `height` image seen through `view`.
    fn rasterize(
        &mut self,
        mesh: &Mesh,
        model: &Pose,
        view: &ViewDescriptor,
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Vec<Polygon>;
}

/// Primitive drawing on a render target
pub trait DisplaySurface<P: Pixel> {
    fn draw_line(&mut self, target: &mut Image<P>, from: ImagePoint, to: ImagePoint, color: Color);

    fn draw_point(&mut self, target: &mut Image<P>, at: ImagePoint, color: Color);
}

/// Which scene meshes are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub object: bool,
    pub desired_object: bool,
    pub camera: bool,
}

/// Debug view of a camera servoing on a wireframe object
pub struct WireframeSimulator<R: Rasterizer> {
    rasterizer: R,
    scene: SceneStore,
    visibility: Visibility,
    c_m_o: Pose,
    cd_m_o: Pose,
    f_m_o: Pose,
    viewpoint: ExternalViewpoint,
    navigator: Navigator,
    trajectory: TrajectoryCache,
    config: SimulatorConfig,
}

impl<R: Rasterizer> WireframeSimulator<R> {
    /// Create a simulator without a scene; load one with [`Self::init_scene`]
    pub fn new(config: SimulatorConfig, registry: FormatRegistry, rasterizer: R) -> Self {
        Self {
            rasterizer,
            scene: SceneStore::new(registry),
            visibility: Visibility::default(),
            c_m_o: Pose::identity(),
            cd_m_o: Pose::identity(),
            f_m_o: Pose::identity(),
            viewpoint: ExternalViewpoint::default(),
            navigator: Navigator::new(),
            trajectory: TrajectoryCache::new(config.trajectory.capacity),
            config,
        }
    }

    /// Load the scene named in the configuration
    pub fn init_configured_scene(&mut self) -> Result<()> {
        let selection = self.config.scene.clone();
        self.init_scene(&selection)
    }

    /// Load the camera proxy, the object and the optional desired object.
    ///
    /// On failure the previous scene is kept as it was.
    pub fn init_scene(&mut self, selection: &SceneSelection) -> Result<()> {
        self.scene.init(selection, self.config.camera_factor)?;
        self.config.scene = selection.clone();
        self.visibility = Visibility {
            object: true,
            desired_object: self.scene.mesh(SceneSlot::DesiredObject).is_some(),
            camera: true,
        };
        info!(
            "simulator scene ready: {}",
            selection.object_path().display()
        );
        Ok(())
    }

    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// Set the pose of the camera relative to the object (`cMo`)
    pub fn set_camera_position_rel_object(&mut self, c_m_o: Pose) {
        self.c_m_o = c_m_o;
    }

    pub fn camera_position_rel_object(&self) -> Pose {
        self.c_m_o
    }

    /// Set the desired pose of the camera relative to the object (`cdMo`)
    pub fn set_desired_camera_position(&mut self, cd_m_o: Pose) {
        self.cd_m_o = cd_m_o;
    }

    pub fn desired_camera_position(&self) -> Pose {
        self.cd_m_o
    }

    /// Set the pose of the object in the world frame (`fMo`)
    pub fn set_object_position_rel_world(&mut self, f_m_o: Pose) {
        self.f_m_o = f_m_o;
    }

    pub fn object_position_rel_world(&self) -> Pose {
        self.f_m_o
    }

    /// Place the external camera (`camMf`); the trajectory is reprojected on
    /// the next external frame
    pub fn set_external_camera_position(&mut self, cam_m_f: Pose) {
        self.viewpoint.set(cam_m_f);
    }

    pub fn external_camera_position(&self) -> Pose {
        self.viewpoint.pose()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn set_internal_pixel_scale(&mut self, scale: PixelScale) {
        self.config.internal_pixel_scale = scale;
    }

    pub fn set_external_pixel_scale(&mut self, scale: PixelScale) {
        self.config.external_pixel_scale = scale;
    }

    pub fn set_colors(&mut self, colors: ColorScheme) {
        self.config.colors = colors;
    }

    pub fn set_trajectory_style(&mut self, style: TrajectoryStyle) {
        self.config.trajectory.style = style;
    }

    pub fn set_trajectory_visible(&mut self, visible: bool) {
        self.config.trajectory.visible = visible;
    }

    /// Limit the number of retained trajectory samples, dropping the oldest
    pub fn set_trajectory_capacity(&mut self, capacity: usize) {
        self.config.trajectory.capacity = capacity;
        self.trajectory.set_capacity(capacity);
    }

    pub fn reset_trajectory(&mut self) {
        self.trajectory.clear();
    }

    pub fn trajectory(&self) -> &TrajectoryCache {
        &self.trajectory
    }

    /// Draw the scene as seen by the tracked camera
    pub fn render_internal<P, D>(&mut self, target: &mut Image<P>, display: &mut D) -> Result<()>
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        self.ensure_initialized()?;
        let (width, height) = (target.width(), target.height());
        let scale = self.config.internal_pixel_scale;
        let colors = self.config.colors;

        if self.visibility.object {
            let view = ViewDescriptor::compose(to_raster(self.c_m_o), width, height, scale);
            self.draw_slot(SceneSlot::Object, &Pose::identity(), &view, colors.current_object, target, display);
        }

        if self.visibility.desired_object {
            let cd_m_o = to_raster(self.cd_m_o);
            let view = ViewDescriptor::compose(cd_m_o, width, height, scale);
            let model = if self.scene.desired_is_tool() {
                cd_m_o.inverse()
            } else {
                Pose::identity()
            };
            self.draw_slot(SceneSlot::DesiredObject, &model, &view, colors.desired_object, target, display);
        }
        Ok(())
    }

    /// Draw the navigated external view.
    ///
    /// Polls the pointer once, moves the external viewpoint, draws the
    /// object and the camera proxy, then records and draws the camera
    /// trajectory when it is visible.
    pub fn render_external<P, D>(&mut self, target: &mut Image<P>, display: &mut D) -> Result<NavigationStep>
    where
        P: Pixel,
        D: DisplaySurface<P> + PointerSource,
    {
        self.ensure_initialized()?;
        let (width, height) = (target.width(), target.height());

        let step = self.navigator.poll(&mut *display, width, height);
        self.viewpoint.apply(&step.delta);

        self.draw_external_scene(self.viewpoint.raster_pose(), target, display);

        if self.config.trajectory.visible {
            let external_changed = self.viewpoint.take_changed();
            let projector = ExternalProjector {
                intrinsics: CameraIntrinsics::for_image(width, height, self.config.external_pixel_scale),
                c_m_f: self.viewpoint.pose(),
            };
            self.trajectory.observe(
                self.c_m_o,
                self.f_m_o,
                step.viewpoint_changed,
                external_changed,
                &projector,
            );
            let projections: Vec<Option<ImagePoint>> = self.trajectory.projections().collect();
            self.draw_trajectory(&projections, target, display);
        }
        Ok(step)
    }

    /// Draw the external view from a fixed viewpoint (`camMf`), without
    /// navigation or trajectory
    pub fn render_external_from<P, D>(
        &mut self,
        target: &mut Image<P>,
        display: &mut D,
        cam_m_f: Pose,
    ) -> Result<()>
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        self.ensure_initialized()?;
        self.draw_external_scene(to_raster(cam_m_f), target, display);
        Ok(())
    }

    /// Draw `mesh` as seen by a camera at `c_m_object` from it
    pub fn project_object_internal<P, D>(
        &mut self,
        target: &mut Image<P>,
        display: &mut D,
        mesh: &Mesh,
        c_m_object: Pose,
    ) -> Result<()>
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        self.ensure_initialized()?;
        let view = ViewDescriptor::compose(
            to_raster(c_m_object),
            target.width(),
            target.height(),
            self.config.internal_pixel_scale,
        );
        let color = self.config.colors.current_object;
        self.draw_mesh(mesh, &Pose::identity(), &view, color, target, display);
        Ok(())
    }

    /// Draw `mesh`, placed at `f_m_object` in the world, from the external
    /// viewpoint `cam_m_f`. Nothing is drawn while the object is hidden.
    pub fn project_object_external<P, D>(
        &mut self,
        target: &mut Image<P>,
        display: &mut D,
        mesh: &Mesh,
        f_m_object: Pose,
        cam_m_f: Pose,
    ) -> Result<()>
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        self.ensure_initialized()?;
        if !self.visibility.object {
            return Ok(());
        }
        let view = ViewDescriptor::compose(
            to_raster(cam_m_f),
            target.width(),
            target.height(),
            self.config.external_pixel_scale,
        );
        let color = self.config.colors.current_object;
        self.draw_mesh(mesh, &f_m_object, &view, color, target, display);
        Ok(())
    }

    /// Draw a recorded trajectory seen from `c_m_f`.
    ///
    /// Each camera pose is paired with the object pose of the same frame.
    pub fn display_trajectory<P, D>(
        &self,
        target: &mut Image<P>,
        display: &mut D,
        camera_poses: &[Pose],
        object_poses: &[Pose],
        c_m_f: Pose,
    ) -> Result<()>
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        if camera_poses.len() != object_poses.len() {
            return Err(Error::DimensionMismatch {
                cameras: camera_poses.len(),
                objects: object_poses.len(),
            });
        }

        let intrinsics = CameraIntrinsics::for_image(
            target.width(),
            target.height(),
            self.config.external_pixel_scale,
        );
        let projections: Vec<Option<ImagePoint>> = camera_poses
            .iter()
            .zip(object_poses)
            .map(|(c_m_o, f_m_o)| project_camera_center(&intrinsics, &c_m_f, f_m_o, c_m_o))
            .collect();
        self.draw_trajectory(&projections, target, display);
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.scene.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized("the scene has to be initialized".to_string()))
        }
    }

    fn draw_external_scene<P, D>(&mut self, raster_cam_m_f: Pose, target: &mut Image<P>, display: &mut D)
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        let view = ViewDescriptor::compose(
            raster_cam_m_f,
            target.width(),
            target.height(),
            self.config.external_pixel_scale,
        );
        let colors = self.config.colors;

        if self.visibility.object {
            let model = self.f_m_o;
            self.draw_slot(SceneSlot::Object, &model, &view, colors.current_object, target, display);
        }
        if self.visibility.camera {
            let model = self.f_m_o * to_raster(self.c_m_o).inverse();
            self.draw_slot(SceneSlot::Camera, &model, &view, colors.camera, target, display);
        }
    }

    fn draw_slot<P, D>(
        &mut self,
        slot: SceneSlot,
        model: &Pose,
        view: &ViewDescriptor,
        color: Color,
        target: &mut Image<P>,
        display: &mut D,
    ) where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        let Some(mesh) = self.scene.mesh(slot) else {
            return;
        };
        let context = RenderContext {
            culling: self.scene.culling_mode(),
        };
        let polygons = self
            .rasterizer
            .rasterize(mesh, model, view, &context, target.width(), target.height());
        debug!("{:?}: {} polygons", slot, polygons.len());
        draw_polygons(display, target, &polygons, color);
    }

    fn draw_mesh<P, D>(
        &mut self,
        mesh: &Mesh,
        model: &Pose,
        view: &ViewDescriptor,
        color: Color,
        target: &mut Image<P>,
        display: &mut D,
    ) where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        let context = RenderContext {
            culling: self.scene.culling_mode(),
        };
        let polygons = self
            .rasterizer
            .rasterize(mesh, model, view, &context, target.width(), target.height());
        draw_polygons(display, target, &polygons, color);
    }

    fn draw_trajectory<P, D>(&self, projections: &[Option<ImagePoint>], target: &mut Image<P>, display: &mut D)
    where
        P: Pixel,
        D: DisplaySurface<P> + ?Sized,
    {
        let color = self.config.colors.trajectory;
        match self.config.trajectory.style {
            TrajectoryStyle::Line => {
                for pair in projections.windows(2) {
                    if let [Some(from), Some(to)] = pair {
                        display.draw_line(target, *from, *to, color);
                    }
                }
            }
            TrajectoryStyle::Point => {
                for point in projections.iter().flatten() {
                    display.draw_point(target, *point, color);
                }
            }
        }
    }
}

impl<R: Rasterizer> std::fmt::Debug for WireframeSimulator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireframeSimulator")
            .field("initialized", &self.scene.is_initialized())
            .field("visibility", &self.visibility)
            .field("navigation", &self.navigator.state())
            .field("trajectory_len", &self.trajectory.len())
            .finish()
    }
}

/// Move a pose from the pinhole convention to the rasterizer one
fn to_raster(pose: Pose) -> Pose {
    Pose::half_turn_z() * pose
}

/// Draw polygon outlines; single vertices become points
pub fn draw_polygons<P, D>(display: &mut D, target: &mut Image<P>, polygons: &[Polygon], color: Color)
where
    P: Pixel,
    D: DisplaySurface<P> + ?Sized,
{
    for polygon in polygons {
        match polygon.as_slice() {
            [] => {}
            [vertex] => display.draw_point(target, *vertex, color),
            vertices => {
                for edge in vertices.windows(2) {
                    display.draw_line(target, edge[0], edge[1], color);
                }
                if let [first, .., last] = vertices {
                    if vertices.len() > 2 {
                        display.draw_line(target, *last, *first, color);
                    }
                }
            }
        }
    }
}
