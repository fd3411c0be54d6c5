//! Headless replay of a servoing run
//!
//! This demo drives the wireframe simulator without a window:
//! - a tiny text reader stands in for the scene file parser
//! - a pinhole rasterizer and a line drawer render into in-memory images
//! - a scripted pointer orbits, then zooms the external view
//!
//! Run with `RUST_LOG=debug` to follow navigation and trajectory rebuilds.

use std::collections::VecDeque;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use wireview_core::{Color, ColorImage, Error, GrayImage, Image, ImagePoint, Mesh, Pixel, Point3d, Pose};
use wireview_io::{FormatRegistry, MeshReader};
use wireview_visualization::{
    DisplaySurface, MouseButton, PointerSource, Polygon, Rasterizer, RenderContext, SimulatorConfig,
    ViewDescriptor, WireframeSimulator,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "trajectory_replay")]
#[command(about = "Replay a camera approaching an object and log the wireframe views", long_about = None)]
struct Cli {
    /// JSON simulator configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write the demo scene files to
    #[arg(long, default_value = "target/wireview-scenes")]
    scenes: PathBuf,

    /// Number of frames to replay
    #[arg(long, default_value_t = 60)]
    frames: usize,

    #[arg(long, default_value_t = 480)]
    width: u32,

    #[arg(long, default_value_t = 360)]
    height: u32,
}

/// Reads `v x y z` and `f i j k ...` lines
struct TextMeshReader;

impl MeshReader for TextMeshReader {
    fn read_mesh(&self, source: &mut dyn BufRead, path: &Path) -> wireview_core::Result<Mesh> {
        let mut mesh = Mesh::new();
        for line in source.lines() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("v") => {
                    let coords: Vec<f64> = fields
                        .map(str::parse)
                        .collect::<std::result::Result<_, _>>()
                        .map_err(|e| Error::InvalidData(format!("{}: {}", path.display(), e)))?;
                    if let &[x, y, z] = coords.as_slice() {
                        mesh.add_point(Point3d::new(x, y, z));
                    }
                }
                Some("f") => {
                    let face = fields
                        .map(str::parse)
                        .collect::<std::result::Result<_, _>>()
                        .map_err(|e| Error::InvalidData(format!("{}: {}", path.display(), e)))?;
                    mesh.add_face(face);
                }
                _ => {}
            }
        }
        Ok(mesh)
    }

    fn format_name(&self) -> &'static str {
        "bnd (text)"
    }
}

/// Pinhole projection without clipping; faces behind the viewer are dropped
struct PinholeRasterizer;

impl Rasterizer for PinholeRasterizer {
    fn rasterize(
        &mut self,
        mesh: &Mesh,
        model: &Pose,
        view: &ViewDescriptor,
        _context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Vec<Polygon> {
        let to_view = view.view_pose() * *model;
        let (w, h) = (width as f64, height as f64);
        mesh.faces
            .iter()
            .filter_map(|face| {
                face.iter()
                    .map(|&index| {
                        let p = to_view.transform_point(&mesh.points[index]);
                        (p.z > view.depth.0).then(|| {
                            ImagePoint::new(
                                (p.y / p.z / view.window.1 + 1.0) * h / 2.0,
                                (p.x / p.z / view.window.0 + 1.0) * w / 2.0,
                            )
                        })
                    })
                    .collect::<Option<Polygon>>()
            })
            .collect()
    }
}

/// Draws into the target and replays a scripted pointer
#[derive(Default)]
struct ReplayDisplay {
    clicks: VecDeque<(usize, MouseButton)>,
    releases: VecDeque<(usize, MouseButton)>,
    path: Vec<ImagePoint>,
    frame: usize,
    segments: usize,
}

impl ReplayDisplay {
    fn scripted(frames: usize) -> Self {
        let third = frames / 3;
        let mut display = Self::default();
        display.clicks.push_back((third, MouseButton::Button1));
        display.releases.push_back((2 * third - 1, MouseButton::Button1));
        display.clicks.push_back((2 * third, MouseButton::Button2));
        display.releases.push_back((frames.saturating_sub(2), MouseButton::Button2));
        display.path = (0..frames)
            .map(|n| ImagePoint::new(100.0 + 2.0 * n as f64, 200.0 + n as f64))
            .collect();
        display
    }

    fn advance(&mut self) {
        self.frame += 1;
    }
}

fn plot<P: Pixel>(target: &mut Image<P>, at: ImagePoint, color: Color) {
    if at.i >= 0.0 && at.j >= 0.0 {
        target.set(at.i as u32, at.j as u32, P::from_color(color));
    }
}

impl<P: Pixel> DisplaySurface<P> for ReplayDisplay {
    fn draw_line(&mut self, target: &mut Image<P>, from: ImagePoint, to: ImagePoint, color: Color) {
        let (di, dj) = to - from;
        let steps = di.abs().max(dj.abs()).ceil().clamp(1.0, 4096.0) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            plot(target, ImagePoint::new(from.i + t * di, from.j + t * dj), color);
        }
        self.segments += 1;
    }

    fn draw_point(&mut self, target: &mut Image<P>, at: ImagePoint, color: Color) {
        plot(target, at, color);
        self.segments += 1;
    }
}

impl PointerSource for ReplayDisplay {
    fn poll_click(&mut self) -> Option<MouseButton> {
        let (frame, _) = *self.clicks.front()?;
        if frame <= self.frame {
            self.clicks.pop_front().map(|(_, button)| button)
        } else {
            None
        }
    }

    fn poll_click_release(&mut self) -> Option<MouseButton> {
        let (frame, _) = *self.releases.front()?;
        if frame <= self.frame {
            self.releases.pop_front().map(|(_, button)| button)
        } else {
            None
        }
    }

    fn pointer_position(&mut self) -> ImagePoint {
        self.path
            .get(self.frame)
            .or_else(|| self.path.last())
            .copied()
            .unwrap_or_default()
    }
}

const CUBE: &str = "\
v -0.1 -0.1 -0.1
v 0.1 -0.1 -0.1
v 0.1 0.1 -0.1
v -0.1 0.1 -0.1
v -0.1 -0.1 0.1
v 0.1 -0.1 0.1
v 0.1 0.1 0.1
v -0.1 0.1 0.1
f 0 1 2 3
f 4 5 6 7
f 0 1 5 4
f 2 3 7 6
f 0 3 7 4
f 1 2 6 5
";

const CAMERA: &str = "\
v 0 0 0
v -0.05 -0.05 0.1
v 0.05 -0.05 0.1
v 0.05 0.05 0.1
v -0.05 0.05 0.1
f 0 1 2
f 0 2 3
f 0 3 4
f 0 4 1
";

fn write_scenes(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(dir.join("cube.bnd"), CUBE)?;
    fs::write(dir.join("camera.bnd"), CAMERA)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::from_path(path)?,
        None => SimulatorConfig::default(),
    };
    config.scene.scenes_dir = cli.scenes.clone();
    write_scenes(&cli.scenes)?;

    let registry = FormatRegistry::with_native(Box::new(TextMeshReader));
    let mut sim = WireframeSimulator::new(config, registry, PinholeRasterizer);
    sim.init_configured_scene()?;
    sim.set_external_camera_position(Pose::from_parts(0.0, 0.0, 2.5, 0.0, 0.0, 0.0));
    sim.set_desired_camera_position(Pose::translation(0.0, 0.0, 0.5));

    let mut internal = GrayImage::new(cli.width, cli.height);
    let mut external = ColorImage::new(cli.width, cli.height);
    let mut display = ReplayDisplay::scripted(cli.frames);

    for n in 0..cli.frames {
        // Spiral in from 1.5 m to 0.5 m in front of the object
        let t = n as f64 / cli.frames.max(1) as f64;
        let angle = 2.0 * std::f64::consts::PI * t;
        let c_m_o = Pose::from_parts(0.2 * angle.cos() * (1.0 - t), 0.2 * angle.sin() * (1.0 - t), 1.5 - t, 0.0, 0.0, 0.3 * t);
        sim.set_camera_position_rel_object(c_m_o);

        sim.render_internal(&mut internal, &mut display)?;
        let step = sim.render_external(&mut external, &mut display)?;
        if step.viewpoint_changed {
            info!("frame {}: external view zoomed, trajectory reprojected", n);
        }
        display.advance();
    }

    let drawn = external.pixels().iter().filter(|p| p.a != 0).count();
    info!(
        "{} frames, {} primitives drawn, {} trajectory samples, {} lit external pixels",
        cli.frames,
        display.segments,
        sim.trajectory().len(),
        drawn
    );
    info!("external camera ended at {:?}", sim.external_camera_position().translation_vector());
    Ok(())
}
