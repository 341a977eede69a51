//! Color and depth stores.

use crate::{canvas::Canvas, color::Rgba, Error};
use alloc::{vec, vec::Vec};

/// Depth of a pixel nothing has been drawn to.
///
/// The depth store holds inverse depth `1/z`, so zero stands for infinitely far away.
pub const FAR: f64 = 0.0;

/// A color buffer and a depth buffer of the same dimensions.
///
/// All coordinates taken by this type are canvas coordinates (origin in the middle, `+y` up).
/// Writes outside the surface land on the nearest edge pixel, see [`Canvas::to_raster`].
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    canvas: Canvas,
    /// B, G, R, A per pixel, row-major from the top-left corner.
    color: Vec<u8>,
    depth: Vec<f64>,
}

impl FrameBuffer {
    pub fn new(canvas: Canvas) -> Result<Self, Error> {
        canvas.validate()?;
        let len = canvas.width * canvas.height;
        Ok(Self {
            canvas,
            color: vec![0; len * 4],
            depth: vec![FAR; len],
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn width(&self) -> usize {
        self.canvas.width
    }

    pub fn height(&self) -> usize {
        self.canvas.height
    }

    /// Fills the color buffer with `color` and resets every depth to [`FAR`].
    pub fn clear(&mut self, color: Rgba) {
        let bytes = color.to_bgra();
        for px in self.color.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.depth.fill(FAR);
    }

    fn index(&self, x: i32, y: i32) -> usize {
        let (rx, ry) = self.canvas.to_raster(x, y);
        ry * self.canvas.width + rx
    }

    /// Writes a color without reading or updating the depth buffer.
    ///
    /// Used for overlays such as wireframes. The stored depth is left as it was, so later
    /// depth-tested writes behave as if this call never happened.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let idx = self.index(x, y);
        self.color[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bgra());
    }

    /// Writes a color if `inv_z` is strictly nearer than what the pixel holds.
    ///
    /// Returns whether the pixel was written. Depth and color are updated together.
    pub fn put_pixel_depth(&mut self, x: i32, y: i32, inv_z: f64, color: Rgba) -> bool {
        let idx = self.index(x, y);
        if inv_z > self.depth[idx] {
            self.depth[idx] = inv_z;
            self.color[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bgra());
            true
        } else {
            false
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        let idx = self.index(x, y) * 4;
        Rgba::from_bgra([
            self.color[idx],
            self.color[idx + 1],
            self.color[idx + 2],
            self.color[idx + 3],
        ])
    }

    /// Inverse depth stored for a pixel, [`FAR`] if nothing was drawn there.
    pub fn depth(&self, x: i32, y: i32) -> f64 {
        self.depth[self.index(x, y)]
    }

    /// Number of pixels that passed at least one depth test since the last clear.
    pub fn covered_pixels(&self) -> usize {
        self.depth.iter().filter(|d| **d > FAR).count()
    }

    /// Color bytes ready for an image encoder: top-left origin, 4 bytes per pixel in B, G, R, A
    /// order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.color
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.color
    }

    /// Raw inverse depth values, row-major from the top-left corner.
    pub fn depth_buffer(&self) -> &[f64] {
        &self.depth
    }
}
