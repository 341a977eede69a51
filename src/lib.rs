//! # scanline
//!
//! ```text
//!                 .:::::::.
//!            .:::::::::::::::.           +z (into the screen)
//!        ###::::::::::::::::::::         ^
//!        #######:::::::::::::::%%%       |    near plane
//!        ############::::::%%%%%%%    ---+----------------
//!        ################%%%%%%%%%      /|\
//!         ###############%%%%%%%%      / | \   frustum
//!           #############%%%%%%       /  |  \
//!              ##########%%%%        /   |   \
//!                 #######%%            camera
//! ```
//!
//! ## Software triangle rasterizer
//!
//! `scanline` is a `no_std` compatible renderer that turns a scene of triangle meshes into a
//! color buffer and a depth buffer without any graphics API. A frame is produced in stages:
//!
//! - Every instance is moved into camera space with `camera_inverse * instance_transform`.
//! - Its triangles are clipped against the five planes of the view frustum. Clipping works on a
//!   per-instance copy of the vertices, so the shared model catalog is never modified.
//! - Triangles facing away from the camera are culled.
//! - Surviving triangles are projected and filled row by row, interpolating inverse depth and
//!   shading intensity, with a per-pixel depth test.
//!
//! Entrypoint to rendering is the [`Renderer`] struct. The finished [`FrameBuffer`] exposes its
//! pixels as B, G, R, A bytes for an image encoder of your choice.
//!
//! ## Example
//!
//! ```
//! use scanline::{
//!     canvas::Canvas, color::Rgba, framebuffer::FrameBuffer, material::Unlit, math::Point3d,
//!     scene::{Camera, Instance, Model, Scene, Transform},
//!     Renderer,
//! };
//!
//! let mut scene = Scene::new(Camera::new(Point3d::new(0.0, 0.0, -5.0), Point3d::zeros()));
//! scene.add_model(Model::cube("cube", [Rgba::WHITE; 6]));
//! scene.add_instance(Instance::new("cube", Transform::default()));
//!
//! let mut fb = FrameBuffer::new(Canvas::with_size(128, 128)).unwrap();
//! let stats = Renderer::default().render(&scene, &Unlit, &mut fb).unwrap();
//!
//! assert_eq!(stats.triangles_drawn, 2);
//! assert_eq!(fb.pixel(0, 0), Rgba::WHITE);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod canvas;
pub mod clip;
pub mod color;
mod error;
pub mod framebuffer;
pub mod material;
pub mod math;
pub mod preview;
pub mod raster;
pub mod scene;

pub use error::Error;

use clip::{ClipArena, ClippingPlane};
use color::Rgba;
use framebuffer::FrameBuffer;
use material::{Material, Unlit};
use raster::ScreenVertex;
use scene::Scene;

/// How surviving triangles are put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawMode {
    /// Depth-tested, shaded fill.
    #[default]
    Filled,
    /// Triangle outlines in the triangle's own color. No depth test.
    Wireframe,
    /// Filled, then outlined in the given color on top, ignoring depth.
    Outlined(Rgba),
}

/// Counters collected during one [`Renderer::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub instances: usize,
    /// Instances that clipping removed entirely.
    pub hidden_instances: usize,
    /// Triangles in the models before clipping.
    pub triangles_submitted: usize,
    /// Triangles left after clipping, including the ones created by splits.
    pub triangles_after_clip: usize,
    pub triangles_culled: usize,
    pub triangles_drawn: usize,
    /// Intersection vertices created while clipping.
    pub vertices_added: usize,
}

/// Draws scenes into frame buffers.
///
/// The renderer keeps a scratch arena that holds the clipped geometry of the instance being
/// drawn. It is reused between instances and frames, so keep one `Renderer` around rather than
/// creating a new one per frame.
#[derive(Debug, Default)]
pub struct Renderer {
    pub mode: DrawMode,
    arena: ClipArena,
}

impl Renderer {
    pub fn new(mode: DrawMode) -> Self {
        Self {
            mode,
            arena: ClipArena::default(),
        }
    }

    /// Draws every instance of `scene` into `fb`.
    ///
    /// The scene is validated first. If an instance names a missing model or a triangle indexes
    /// a missing vertex, nothing is drawn and the error is returned. The buffer is not cleared,
    /// so several scenes may be layered into the same frame.
    pub fn render(
        &mut self,
        scene: &Scene,
        material: &dyn Material,
        fb: &mut FrameBuffer,
    ) -> Result<RenderStats, Error> {
        if let Err(e) = scene.validate() {
            log::warn!("refusing to render scene: {e}");
            return Err(e);
        }

        let canvas = *fb.canvas();
        let planes = ClippingPlane::frustum(&canvas);
        let to_camera = scene.camera.inverse_matrix();
        let mut stats = RenderStats::default();

        for instance in &scene.instances {
            let model = scene.model(instance.model())?;
            stats.instances += 1;
            stats.triangles_submitted += model.triangles.len();

            self.arena.load(model, &(to_camera * instance.matrix()));
            let visible = self.arena.clip(&planes);
            stats.vertices_added += self.arena.added_vertices();

            if !visible {
                log::debug!("instance of `{}` is outside the view", model.name);
                stats.hidden_instances += 1;
                continue;
            }

            let vertices = self.arena.vertices();
            let triangles = self.arena.triangles();
            stats.triangles_after_clip += triangles.len();

            let mut culled = 0;
            for t in triangles {
                let [a, b, c] = t.indices().map(|i| vertices[i]);
                if !raster::is_front_facing(&a, &b, &c) {
                    culled += 1;
                    continue;
                }

                let projected = ScreenVertex::project_triangle(&canvas, material, [a, b, c]);
                match self.mode {
                    DrawMode::Filled => raster::draw_filled_triangle(fb, projected, t.color),
                    DrawMode::Wireframe => raster::draw_wireframe_triangle(fb, projected, t.color),
                    DrawMode::Outlined(outline) => {
                        raster::draw_filled_triangle(fb, projected, t.color);
                        raster::draw_wireframe_triangle(fb, projected, outline);
                    }
                }
                stats.triangles_drawn += 1;
            }

            log::debug!(
                "instance of `{}`: {} triangles after clipping, {} culled",
                model.name,
                triangles.len(),
                culled
            );
            stats.triangles_culled += culled;
        }

        log::debug!("{stats:?}");

        Ok(stats)
    }
}

/// Renders `scene` unlit and filled into `fb`.
pub fn render_scene(scene: &Scene, fb: &mut FrameBuffer) -> Result<RenderStats, Error> {
    Renderer::default().render(scene, &Unlit, fb)
}
