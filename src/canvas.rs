//! Canvas configuration and the mappings between viewport, canvas and raster coordinates.
//!
//! Three coordinate systems are involved:
//!
//! - Viewport: the rectangle of size `viewport_width x viewport_height` at distance `distance` in
//!   front of the camera, in camera-space units.
//! - Canvas: integer pixel coordinates with the origin in the middle and `+y` pointing up.
//! - Raster: row-major storage coordinates with the origin at the top-left corner.

use crate::{math::Point3d, Error};

/// Output surface and view volume parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Canvas {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Distance from the camera to the projection plane.
    pub distance: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            viewport_width: 1.0,
            viewport_height: 1.0,
            distance: 1.0,
        }
    }
}

impl Canvas {
    /// Canvas of the given pixel size with a unit viewport at distance 1.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidCanvas("pixel dimensions must be non-zero"));
        }
        // Written so that NaN fails too.
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(Error::InvalidCanvas("viewport dimensions must be positive"));
        }
        if !(self.distance > 0.0) {
            return Err(Error::InvalidCanvas("projection distance must be positive"));
        }
        Ok(())
    }

    /// Point on the projection plane that the canvas pixel `(x, y)` looks through.
    pub fn canvas_to_viewport(&self, x: i32, y: i32) -> Point3d {
        Point3d::new(
            x as f64 * self.viewport_width / self.width as f64,
            y as f64 * self.viewport_height / self.height as f64,
            self.distance,
        )
    }

    /// Viewport position to canvas pixel, truncating toward zero.
    pub fn viewport_to_canvas(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x * self.width as f64 / self.viewport_width) as i32,
            (y * self.height as f64 / self.viewport_height) as i32,
        )
    }

    /// Perspective projection of a camera-space point onto the canvas.
    ///
    /// `p.z` must be positive. The near clipping plane guarantees this for every vertex that
    /// survives clipping.
    pub fn project(&self, p: &Point3d) -> (i32, i32) {
        self.viewport_to_canvas(
            p.x * self.distance / p.z,
            p.y * self.distance / p.z,
        )
    }

    /// Clamps a canvas coordinate to the nearest pixel that exists, each axis on its own.
    pub fn clamp_point(&self, x: i32, y: i32) -> (i32, i32) {
        let w = self.width as i64;
        let h = self.height as i64;
        let x = (x as i64).clamp(-(w / 2), w - 1 - w / 2);
        let y = (y as i64).clamp(h / 2 - h, h / 2 - 1);
        (x as i32, y as i32)
    }

    /// Canvas coordinate to raster (column, row).
    ///
    /// Coordinates outside the surface are clamped to the nearest edge, each axis against its own
    /// bound.
    pub fn to_raster(&self, x: i32, y: i32) -> (usize, usize) {
        let w = self.width as i64;
        let h = self.height as i64;
        let rx = x as i64 + w / 2;
        let ry = -(y as i64) + h / 2 - 1;
        (rx.clamp(0, w - 1) as usize, ry.clamp(0, h - 1) as usize)
    }
}
