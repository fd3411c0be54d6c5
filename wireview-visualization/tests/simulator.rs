//! Integration tests for the wireframe simulator
//!
//! The reader, rasterizer and display collaborators are replaced by
//! recording mocks; scene files are written to a temporary directory.

use std::collections::VecDeque;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use approx::assert_relative_eq;
use wireview_core::{Color, ColorImage, Error, GrayImage, Image, ImagePoint, Mesh, Pixel, Point3d, Pose, Result};
use wireview_io::{CullingMode, DesiredObject, DesiredSource, FormatRegistry, MeshReader, SceneObject, SceneSelection, SceneSlot};
use wireview_visualization::*;

/// Reads "x y z" lines into a mesh with a single face through every point
struct PointListReader;

impl MeshReader for PointListReader {
    fn read_mesh(&self, source: &mut dyn BufRead, path: &Path) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        for line in source.lines() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let coords: Vec<f64> = line
                .split_whitespace()
                .filter_map(|v| v.parse().ok())
                .collect();
            if let &[x, y, z] = coords.as_slice() {
                mesh.add_point(Point3d::new(x, y, z));
            }
        }
        mesh.add_face((0..mesh.point_count()).collect());
        Ok(mesh)
    }

    fn format_name(&self) -> &'static str {
        "bnd"
    }
}

#[derive(Debug, Clone)]
struct RasterCall {
    points: usize,
    model: Pose,
    view: ViewDescriptor,
    culling: CullingMode,
}

/// Returns one triangle per call and remembers what it was asked to draw
#[derive(Default)]
struct RecordingRasterizer {
    calls: Vec<RasterCall>,
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(
        &mut self,
        mesh: &Mesh,
        model: &Pose,
        view: &ViewDescriptor,
        context: &RenderContext,
        _width: u32,
        _height: u32,
    ) -> Vec<Polygon> {
        self.calls.push(RasterCall {
            points: mesh.point_count(),
            model: *model,
            view: *view,
            culling: context.culling,
        });
        vec![vec![
            ImagePoint::new(0.0, 0.0),
            ImagePoint::new(0.0, 10.0),
            ImagePoint::new(10.0, 10.0),
        ]]
    }
}

/// Display recording primitives and replaying pointer events
#[derive(Default)]
struct ScriptedDisplay {
    lines: Vec<(ImagePoint, ImagePoint, Color)>,
    points: Vec<(ImagePoint, Color)>,
    clicks: VecDeque<MouseButton>,
    releases: VecDeque<MouseButton>,
    position: ImagePoint,
}

impl ScriptedDisplay {
    fn lines_of(&self, color: Color) -> usize {
        self.lines.iter().filter(|(_, _, c)| *c == color).count()
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.points.clear();
    }
}

impl<P: Pixel> DisplaySurface<P> for ScriptedDisplay {
    fn draw_line(&mut self, _target: &mut Image<P>, from: ImagePoint, to: ImagePoint, color: Color) {
        self.lines.push((from, to, color));
    }

    fn draw_point(&mut self, _target: &mut Image<P>, at: ImagePoint, color: Color) {
        self.points.push((at, color));
    }
}

impl PointerSource for ScriptedDisplay {
    fn poll_click(&mut self) -> Option<MouseButton> {
        self.clicks.pop_front()
    }

    fn poll_click_release(&mut self) -> Option<MouseButton> {
        self.releases.pop_front()
    }

    fn pointer_position(&mut self) -> ImagePoint {
        self.position
    }
}

fn write_scenes(dir: &Path) {
    fs::write(dir.join("camera.bnd"), "0 0 0\n0.1 0 0\n0 0.1 0\n").unwrap();
    fs::write(dir.join("cube.bnd"), "0 0 0\n1 0 0\n1 1 0\n0 1 0\n").unwrap();
    fs::write(dir.join("pipe.bnd"), "1 0 0\n0 1 0\n").unwrap();
    fs::write(dir.join("tool.bnd"), "0 0 0\n0 0 0.2\n").unwrap();
}

fn simulator(config: SimulatorConfig) -> WireframeSimulator<RecordingRasterizer> {
    let registry = FormatRegistry::with_native(Box::new(PointListReader));
    WireframeSimulator::new(config, registry, RecordingRasterizer::default())
}

fn raster(pose: Pose) -> Pose {
    Pose::half_turn_z() * pose
}

fn assert_same_view(actual: &ViewDescriptor, expected: &ViewDescriptor) {
    assert!((actual.cop - expected.cop).norm() < 1e-9);
    assert!((actual.vpn - expected.vpn).norm() < 1e-9);
    assert!((actual.vup - expected.vup).norm() < 1e-9);
    assert_relative_eq!(actual.window.0, expected.window.0);
    assert_relative_eq!(actual.window.1, expected.window.1);
    assert_eq!(actual.projection, expected.projection);
}

fn initialized(dir: &Path, desired: Option<DesiredObject>) -> WireframeSimulator<RecordingRasterizer> {
    let mut sim = simulator(SimulatorConfig::default());
    let mut selection = SceneSelection::preset(dir, SceneObject::Cube);
    if let Some(desired) = desired {
        selection = selection.with_desired(DesiredSource::Preset(desired));
    }
    sim.init_scene(&selection).unwrap();
    sim.set_camera_position_rel_object(Pose::translation(0.0, 0.0, 1.0));
    sim.set_external_camera_position(Pose::translation(0.0, 0.0, 2.0));
    sim
}

#[test]
fn test_render_before_init_fails() {
    let mut sim = simulator(SimulatorConfig::default());
    let mut image = ColorImage::new(320, 240);
    let mut display = ScriptedDisplay::default();

    assert!(matches!(sim.render_internal(&mut image, &mut display), Err(Error::NotInitialized(_))));
    assert!(matches!(sim.render_external(&mut image, &mut display), Err(Error::NotInitialized(_))));
    assert!(matches!(
        sim.render_external_from(&mut image, &mut display, Pose::identity()),
        Err(Error::NotInitialized(_))
    ));
    assert!(matches!(
        sim.project_object_internal(&mut image, &mut display, &Mesh::new(), Pose::identity()),
        Err(Error::NotInitialized(_))
    ));
    assert!(sim.rasterizer().calls.is_empty());
    assert!(display.lines.is_empty());
    assert!(sim.trajectory().is_empty());
}

#[test]
fn test_failed_init_keeps_scene_unset() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("camera.bnd"), "0 0 0\n").unwrap();
    let mut sim = simulator(SimulatorConfig::default());

    let err = sim
        .init_scene(&SceneSelection::preset(dir.path(), SceneObject::Sphere))
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(!sim.scene().is_initialized());
    assert_eq!(sim.visibility(), Visibility::default());
}

#[test]
fn test_internal_view() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), Some(DesiredObject::Standard));
    let cd_m_o = Pose::from_parts(0.1, 0.0, 0.8, 0.0, 0.2, 0.0);
    sim.set_desired_camera_position(cd_m_o);

    assert_eq!(
        sim.visibility(),
        Visibility { object: true, desired_object: true, camera: true }
    );

    let mut image = ColorImage::new(640, 480);
    let mut display = ScriptedDisplay::default();
    sim.render_internal(&mut image, &mut display).unwrap();

    let calls = &sim.rasterizer().calls;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].points, 4);
    assert_eq!(calls[0].model, Pose::identity());
    assert_eq!(
        calls[0].view,
        ViewDescriptor::compose(raster(Pose::translation(0.0, 0.0, 1.0)), 640, 480, PixelScale::default())
    );
    assert_eq!(calls[1].model, Pose::identity());
    assert_eq!(calls[1].view, ViewDescriptor::compose(raster(cd_m_o), 640, 480, PixelScale::default()));
    assert_eq!(calls[0].culling, CullingMode::Back);

    // One closed triangle per drawn mesh
    assert_eq!(display.lines_of(Color::BLUE), 3);
    assert_eq!(display.lines_of(Color::RED), 3);
}

#[test]
fn test_internal_view_on_gray_target() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);

    let mut image = GrayImage::new(640, 480);
    let mut display = ScriptedDisplay::default();
    sim.render_internal(&mut image, &mut display).unwrap();

    let calls = &sim.rasterizer().calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].view,
        ViewDescriptor::compose(raster(Pose::translation(0.0, 0.0, 1.0)), 640, 480, PixelScale::default())
    );
}

#[test]
fn test_tool_desired_object() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), Some(DesiredObject::Tool));
    let cd_m_o = Pose::translation(0.0, 0.1, 0.5);
    sim.set_desired_camera_position(cd_m_o);

    assert!(sim.scene().desired_is_tool());
    assert_eq!(sim.scene().mesh(SceneSlot::Camera).unwrap().point_count(), 2);

    let mut image = ColorImage::new(320, 320);
    let mut display = ScriptedDisplay::default();
    sim.render_internal(&mut image, &mut display).unwrap();

    let desired = &sim.rasterizer().calls[1];
    assert!((desired.model * raster(cd_m_o)).is_identity(1e-12));
}

#[test]
fn test_pipe_is_seen_from_inside() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = simulator(SimulatorConfig::default());
    sim.init_scene(&SceneSelection::preset(dir.path(), SceneObject::Pipe)).unwrap();

    let mut image = ColorImage::new(100, 100);
    sim.render_internal(&mut image, &mut ScriptedDisplay::default()).unwrap();
    assert_eq!(sim.rasterizer().calls[0].culling, CullingMode::Inside);
}

#[test]
fn test_external_view_records_trajectory() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    let mut image = ColorImage::new(400, 400);
    let mut display = ScriptedDisplay::default();

    for n in 0..3 {
        sim.set_camera_position_rel_object(Pose::translation(0.1 * n as f64, 0.0, 1.0));
        sim.render_external(&mut image, &mut display).unwrap();
    }

    assert_eq!(sim.trajectory().len(), 3);
    // Object and camera proxy each cost one closed triangle per frame
    assert_eq!(display.lines_of(Color::BLUE), 9);
    // Camera proxy triangles plus a trail growing by one segment per frame
    assert_eq!(display.lines_of(Color::GREEN), 9 + 1 + 2);

    let calls = &sim.rasterizer().calls;
    let external = sim.external_camera_position();
    let view = ViewDescriptor::compose(raster(external), 400, 400, PixelScale::default());
    assert_same_view(&calls[0].view, &view);
    assert_eq!(calls[0].model, Pose::identity());
    let proxy_model = raster(Pose::translation(0.0, 0.0, 1.0)).inverse();
    assert!((calls[1].model * proxy_model.inverse()).is_identity(1e-12));

    // The tracked camera sits 1 m behind the object, 1 m in front of the observer
    let last = sim.trajectory().projections().last().unwrap().unwrap();
    assert_relative_eq!(last.j, -0.2 * 200.0 + 200.0, epsilon = 1e-9);
    assert_relative_eq!(last.i, 200.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_reprojects_trajectory() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    let mut image = ColorImage::new(400, 400);
    let mut display = ScriptedDisplay::default();

    for n in 0..4 {
        sim.set_camera_position_rel_object(Pose::translation(0.05 * n as f64, 0.0, 1.0));
        sim.render_external(&mut image, &mut display).unwrap();
    }
    let before: Vec<ImagePoint> = sim.trajectory().projections().flatten().collect();

    display.clicks.push_back(MouseButton::Button2);
    display.position = ImagePoint::new(100.0, 100.0);
    sim.render_external(&mut image, &mut display).unwrap();
    assert_eq!(sim.navigator().state(), NavigationState::Zooming);

    display.position = ImagePoint::new(150.0, 100.0);
    let step = sim.render_external(&mut image, &mut display).unwrap();
    assert!(step.viewpoint_changed);
    assert_relative_eq!(step.delta.translation_vector().z, 0.5, epsilon = 1e-12);
    assert_relative_eq!(sim.external_camera_position().translation_vector().z, 2.5, epsilon = 1e-9);

    let after: Vec<ImagePoint> = sim.trajectory().projections().flatten().collect();
    assert_eq!(after.len(), 6);

    let intrinsics = CameraIntrinsics::for_image(400, 400, PixelScale::default());
    let external = sim.external_camera_position();
    for (sample, projected) in sim.trajectory().samples().zip(&after) {
        let expected =
            project_camera_center(&intrinsics, &external, &sample.object_pose, &sample.camera_pose).unwrap();
        assert_relative_eq!(projected.j, expected.j, epsilon = 1e-9);
        assert_relative_eq!(projected.i, expected.i, epsilon = 1e-9);
    }
    // Farther observer, shorter trail
    assert!((after[3].j - after[0].j).abs() < (before[3].j - before[0].j).abs());

    display.releases.push_back(MouseButton::Button2);
    sim.render_external(&mut image, &mut display).unwrap();
    assert_eq!(sim.navigator().state(), NavigationState::Idle);
}

#[test]
fn test_hidden_trajectory_still_navigates() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    sim.set_trajectory_visible(false);
    let mut image = ColorImage::new(200, 200);
    let mut display = ScriptedDisplay::default();

    display.clicks.push_back(MouseButton::Button3);
    sim.render_external(&mut image, &mut display).unwrap();
    display.position = ImagePoint::new(0.0, 10.0);
    sim.render_external(&mut image, &mut display).unwrap();

    assert!(sim.trajectory().is_empty());
    assert_ne!(sim.external_camera_position(), Pose::translation(0.0, 0.0, 2.0));
    assert_eq!(display.lines_of(Color::GREEN), 6);
}

#[test]
fn test_point_style_trajectory() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    sim.set_trajectory_style(TrajectoryStyle::Point);
    let mut image = ColorImage::new(200, 200);
    let mut display = ScriptedDisplay::default();

    sim.render_external(&mut image, &mut display).unwrap();
    display.clear();
    sim.render_external(&mut image, &mut display).unwrap();
    assert_eq!(display.points.len(), 2);
    assert!(display.points.iter().all(|(_, c)| *c == Color::GREEN));
}

#[test]
fn test_fixed_external_view_leaves_trajectory_alone() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    let mut image = ColorImage::new(200, 100);
    let mut display = ScriptedDisplay::default();
    display.clicks.push_back(MouseButton::Button1);

    let cam_m_f = Pose::from_parts(0.0, 0.0, 3.0, 0.1, 0.0, 0.0);
    sim.render_external_from(&mut image, &mut display, cam_m_f).unwrap();

    assert!(sim.trajectory().is_empty());
    assert_eq!(sim.navigator().state(), NavigationState::Idle);
    assert_eq!(display.clicks.len(), 1);
    assert_eq!(
        sim.rasterizer().calls[0].view,
        ViewDescriptor::compose(raster(cam_m_f), 200, 100, PixelScale::default())
    );
}

#[test]
fn test_project_arbitrary_objects() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    let mut image = ColorImage::new(200, 200);
    let mut display = ScriptedDisplay::default();
    let marker = Mesh::from_points_and_faces(vec![Point3d::origin()], vec![vec![0]]);

    let c_m_marker = Pose::translation(0.0, 0.0, 0.7);
    sim.project_object_internal(&mut image, &mut display, &marker, c_m_marker).unwrap();
    let f_m_marker = Pose::translation(0.3, 0.0, 0.0);
    let cam_m_f = Pose::translation(0.0, 0.0, 4.0);
    sim.project_object_external(&mut image, &mut display, &marker, f_m_marker, cam_m_f).unwrap();

    let calls = &sim.rasterizer().calls;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].points, 1);
    assert_eq!(calls[0].view, ViewDescriptor::compose(raster(c_m_marker), 200, 200, PixelScale::default()));
    assert_eq!(calls[1].model, f_m_marker);
    assert_eq!(calls[1].view, ViewDescriptor::compose(raster(cam_m_f), 200, 200, PixelScale::default()));
    assert_eq!(display.lines_of(Color::BLUE), 6);
}

#[test]
fn test_hidden_object_not_projected_externally() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut sim = initialized(dir.path(), None);
    sim.set_visibility(Visibility {
        object: false,
        ..sim.visibility()
    });
    let mut image = ColorImage::new(200, 200);
    let mut display = ScriptedDisplay::default();
    let marker = Mesh::from_points_and_faces(vec![Point3d::origin()], vec![vec![0]]);

    let cam_m_f = Pose::translation(0.0, 0.0, 4.0);
    sim.project_object_external(&mut image, &mut display, &marker, Pose::identity(), cam_m_f).unwrap();
    assert!(sim.rasterizer().calls.is_empty());

    sim.project_object_internal(&mut image, &mut display, &marker, Pose::translation(0.0, 0.0, 0.7)).unwrap();
    assert_eq!(sim.rasterizer().calls.len(), 1);
}

#[test]
fn test_display_trajectory() {
    let sim = simulator(SimulatorConfig::default());
    let mut image = ColorImage::new(400, 400);
    let mut display = ScriptedDisplay::default();
    let cameras: Vec<Pose> = (0..5).map(|n| Pose::translation(0.01 * n as f64, 0.0, 1.0)).collect();
    let objects = vec![Pose::identity(); 5];
    let c_m_f = Pose::translation(0.0, 0.0, 2.0);

    let err = sim
        .display_trajectory(&mut image, &mut display, &cameras, &objects[..4], c_m_f)
        .unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { cameras: 5, objects: 4 }));
    assert!(display.lines.is_empty());
    assert!(display.points.is_empty());

    sim.display_trajectory(&mut image, &mut display, &cameras, &objects, c_m_f).unwrap();
    assert_eq!(display.lines_of(Color::GREEN), 4);
    let (first, _, _) = display.lines[0];
    assert_relative_eq!(first.j, 200.0, epsilon = 1e-9);
}

#[test]
fn test_trajectory_capacity_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    write_scenes(dir.path());
    let mut config = SimulatorConfig::default();
    config.trajectory.capacity = 4;
    let mut sim = simulator(config);
    sim.init_scene(&SceneSelection::preset(dir.path(), SceneObject::Cube)).unwrap();
    sim.set_camera_position_rel_object(Pose::translation(0.0, 0.0, 1.0));
    let mut image = ColorImage::new(200, 200);
    let mut display = ScriptedDisplay::default();

    for _ in 0..6 {
        sim.render_external(&mut image, &mut display).unwrap();
    }
    assert_eq!(sim.trajectory().len(), 4);

    sim.set_trajectory_capacity(2);
    assert_eq!(sim.trajectory().len(), 2);
    assert_eq!(sim.config().trajectory.capacity, 2);

    sim.reset_trajectory();
    assert!(sim.trajectory().is_empty());
}
