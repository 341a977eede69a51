//! Scanline triangle filling and line drawing.
//!
//! Everything here works on canvas coordinates and draws into a [`FrameBuffer`]. Triangles are
//! filled by interpolating edge positions and per-vertex attributes over integer rows, then
//! interpolating the attributes again across each row.

use crate::{
    canvas::Canvas,
    color::Rgba,
    framebuffer::FrameBuffer,
    material::Material,
    math::{self, Point3d},
};
use alloc::vec::Vec;

/// Samples the linear function through `(i0, d0)` and `(i1, d1)` at every integer `i0..=i1`.
///
/// Equal indices give the single sample `d0`. An empty list is returned when `i1 < i0`.
pub fn interpolate(i0: i32, d0: f64, i1: i32, d1: f64) -> Vec<f64> {
    if i0 == i1 {
        return alloc::vec![d0];
    }
    let span = (i1 - i0) as f64;
    (i0..=i1)
        .map(|i| d0 + (d1 - d0) * (i - i0) as f64 / span)
        .collect()
}

/// A projected vertex with the attributes interpolated across a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    /// `1/z` of the camera-space vertex.
    pub inv_z: f64,
    pub intensity: f64,
}

impl ScreenVertex {
    /// Projects a camera-space point. `p.z` must be positive.
    pub fn project(canvas: &Canvas, p: &Point3d, intensity: f64) -> Self {
        let (x, y) = canvas.project(p);
        Self {
            x,
            y,
            inv_z: 1.0 / p.z,
            intensity,
        }
    }

    /// Projects all three vertices of a camera-space triangle, shading them with `material`.
    pub fn project_triangle(
        canvas: &Canvas,
        material: &dyn Material,
        [a, b, c]: [Point3d; 3],
    ) -> [Self; 3] {
        let normal = math::face_normal(&a, &b, &c);
        let len = normal.norm();
        let normal = if len > 0.0 { normal / len } else { normal };
        [a, b, c].map(|p| Self::project(canvas, &p, material.intensity(&p, &normal)))
    }
}

/// Back-face test on camera-space vertices.
///
/// A triangle faces the camera when its normal, taken in winding order, points towards the
/// origin. Edge-on triangles are treated as facing away.
pub fn is_front_facing(a: &Point3d, b: &Point3d, c: &Point3d) -> bool {
    math::face_normal(a, b, c).dot(&-a) > 0.0
}

/// Fills a triangle through the depth test, attenuating `color` by the interpolated intensity.
pub fn draw_filled_triangle(fb: &mut FrameBuffer, vertices: [ScreenVertex; 3], color: Rgba) {
    let mut v = vertices;
    v.sort_by_key(|p| p.y);
    let [p0, p1, p2] = v;

    let edge = |a: &ScreenVertex, b: &ScreenVertex| {
        (
            interpolate(a.y, a.x as f64, b.y, b.x as f64),
            interpolate(a.y, a.inv_z, b.y, b.inv_z),
            interpolate(a.y, a.intensity, b.y, b.intensity),
        )
    };

    let (x01, z01, h01) = edge(&p0, &p1);
    let (x12, z12, h12) = edge(&p1, &p2);
    let (x02, z02, h02) = edge(&p0, &p2);

    // The short edges share the sample at p1.y.
    let join = |mut a: Vec<f64>, b: Vec<f64>| {
        a.pop();
        a.extend(b);
        a
    };
    let x012 = join(x01, x12);
    let z012 = join(z01, z12);
    let h012 = join(h01, h12);

    // Both series cover p0.y..=p2.y. Which one is on the left is decided once, in the middle.
    let m = x012.len() / 2;
    let ((x_left, z_left, h_left), (x_right, z_right, h_right)) = if x02[m] < x012[m] {
        ((x02, z02, h02), (x012, z012, h012))
    } else {
        ((x012, z012, h012), (x02, z02, h02))
    };

    for (row, y) in (p0.y..=p2.y).enumerate() {
        let xl = x_left[row] as i32;
        let xr = x_right[row] as i32;

        let z_segment = interpolate(xl, z_left[row], xr, z_right[row]);
        let h_segment = interpolate(xl, h_left[row], xr, h_right[row]);

        for (x, (inv_z, h)) in (xl..=xr).zip(z_segment.into_iter().zip(h_segment)) {
            fb.put_pixel_depth(x, y, inv_z, color.scale(h));
        }
    }
}

/// Draws a line without depth testing.
///
/// Steps along the longer axis one pixel at a time and interpolates the other coordinate. Both
/// endpoints are first clamped to the canvas, so off-canvas input runs along the border.
pub fn draw_line(fb: &mut FrameBuffer, p0: (i32, i32), p1: (i32, i32), color: Rgba) {
    let canvas = fb.canvas();
    let (x0, y0) = canvas.clamp_point(p0.0, p0.1);
    let (x1, y1) = canvas.clamp_point(p1.0, p1.1);

    if (x1 - x0).abs() > (y1 - y0).abs() {
        let ((x0, y0), (x1, y1)) = if x0 > x1 {
            ((x1, y1), (x0, y0))
        } else {
            ((x0, y0), (x1, y1))
        };
        let ys = interpolate(x0, y0 as f64, x1, y1 as f64);
        for (x, y) in (x0..=x1).zip(ys) {
            fb.put_pixel(x, y as i32, color);
        }
    } else {
        let ((x0, y0), (x1, y1)) = if y0 > y1 {
            ((x1, y1), (x0, y0))
        } else {
            ((x0, y0), (x1, y1))
        };
        let xs = interpolate(y0, x0 as f64, y1, x1 as f64);
        for (y, x) in (y0..=y1).zip(xs) {
            fb.put_pixel(x as i32, y, color);
        }
    }
}

/// Outlines a triangle without depth testing.
pub fn draw_wireframe_triangle(fb: &mut FrameBuffer, vertices: [ScreenVertex; 3], color: Rgba) {
    let [a, b, c] = vertices.map(|v| (v.x, v.y));
    draw_line(fb, a, b, color);
    draw_line(fb, b, c, color);
    draw_line(fb, c, a, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FAR;
    use proptest::prelude::*;

    const GREEN: Rgba = Rgba::opaque(0, 255, 0);

    fn fb(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer::new(Canvas::with_size(w, h)).unwrap()
    }

    fn sv(x: i32, y: i32, inv_z: f64) -> ScreenVertex {
        ScreenVertex {
            x,
            y,
            inv_z,
            intensity: 1.0,
        }
    }

    #[test]
    fn interpolate_samples() {
        assert_eq!(interpolate(0, 0.0, 4, 8.0), [0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(interpolate(3, 1.5, 3, 100.0), [1.5]);
        assert_eq!(interpolate(-2, 4.0, 0, 0.0), [4.0, 2.0, 0.0]);
        assert!(interpolate(2, 0.0, 1, 1.0).is_empty());
    }

    #[test]
    fn fills_interior_and_leaves_outside() {
        let mut fb = fb(64, 64);
        draw_filled_triangle(
            &mut fb,
            [sv(-20, -20, 0.5), sv(20, -20, 0.5), sv(0, 20, 0.5)],
            GREEN,
        );
        assert_eq!(fb.pixel(0, 0), GREEN);
        assert_eq!(fb.pixel(0, -20), GREEN);
        assert_eq!(fb.pixel(-19, -20), GREEN);
        assert_eq!(fb.pixel(0, 20), GREEN);
        assert_eq!(fb.pixel(-15, 15), Rgba::TRANSPARENT);
        assert_eq!(fb.pixel(25, 0), Rgba::TRANSPARENT);
        assert_eq!(fb.depth(0, 0), 0.5);
        assert_eq!(fb.depth(-15, 15), FAR);
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let verts = [sv(-10, -5, 0.2), sv(12, 0, 0.3), sv(1, 14, 0.4)];
        let mut a = fb(40, 40);
        draw_filled_triangle(&mut a, verts, GREEN);
        let mut b = fb(40, 40);
        draw_filled_triangle(&mut b, [verts[2], verts[0], verts[1]], GREEN);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.depth_buffer(), b.depth_buffer());
    }

    #[test]
    fn flat_triangle_fills_one_row() {
        let mut fb = fb(16, 16);
        draw_filled_triangle(&mut fb, [sv(-3, 2, 1.0), sv(3, 2, 1.0), sv(0, 2, 1.0)], GREEN);
        assert_eq!(fb.covered_pixels(), 7);
    }

    #[test]
    fn depth_is_interpolated_across_rows() {
        let mut fb = fb(64, 64);
        draw_filled_triangle(
            &mut fb,
            [sv(-20, -20, 0.2), sv(20, -20, 0.2), sv(0, 20, 0.6)],
            GREEN,
        );
        let low = fb.depth(0, -10);
        let high = fb.depth(0, 10);
        assert!(low < high);
        assert!(fb.depth(0, -20) >= 0.2 - 1e-12 && fb.depth(0, 20) <= 0.6 + 1e-12);
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let near = [sv(-10, -10, 0.5), sv(10, -10, 0.5), sv(0, 10, 0.5)];
        let far = [sv(-10, -10, 0.1), sv(10, -10, 0.1), sv(0, 10, 0.1)];
        let red = Rgba::opaque(255, 0, 0);

        let mut a = fb(32, 32);
        draw_filled_triangle(&mut a, near, GREEN);
        draw_filled_triangle(&mut a, far, red);
        let mut b = fb(32, 32);
        draw_filled_triangle(&mut b, far, red);
        draw_filled_triangle(&mut b, near, GREEN);

        assert_eq!(a.pixel(0, 0), GREEN);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn intensity_attenuates_color() {
        let mut fb = fb(16, 16);
        let mut verts = [sv(-5, -5, 1.0), sv(5, -5, 1.0), sv(0, 5, 1.0)];
        for v in &mut verts {
            v.intensity = 0.5;
        }
        draw_filled_triangle(&mut fb, verts, Rgba::new(200, 100, 50, 255));
        assert_eq!(fb.pixel(0, 0), Rgba::new(100, 50, 25, 127));
    }

    #[test]
    fn lines_cover_both_endpoints() {
        let mut fb = fb(32, 32);
        draw_line(&mut fb, (5, -3), (-6, 2), GREEN);
        draw_line(&mut fb, (0, 10), (1, -10), GREEN);
        for (x, y) in [(5, -3), (-6, 2), (0, 10), (1, -10)] {
            assert_eq!(fb.pixel(x, y), GREEN);
        }
        // Lines never touch depth.
        assert_eq!(fb.covered_pixels(), 0);
    }

    #[test]
    fn extreme_line_endpoints_clamp_to_canvas() {
        let mut fb = fb(16, 8);
        draw_line(&mut fb, (i32::MIN, i32::MAX), (i32::MAX, i32::MIN), GREEN);
        // Clamped to the top-left and bottom-right corners.
        assert_eq!(fb.pixel(-8, 3), GREEN);
        assert_eq!(fb.pixel(7, -4), GREEN);
        draw_line(&mut fb, (i32::MAX, 0), (i32::MAX, 2), Rgba::WHITE);
        assert_eq!(fb.pixel(7, 1), Rgba::WHITE);
    }

    #[test]
    fn wireframe_outlines_only() {
        let mut fb = fb(64, 64);
        draw_wireframe_triangle(&mut fb, [sv(-20, -20, 1.0), sv(20, -20, 1.0), sv(0, 20, 1.0)], GREEN);
        assert_eq!(fb.pixel(0, -20), GREEN);
        assert_eq!(fb.pixel(0, 20), GREEN);
        assert_eq!(fb.pixel(0, 0), Rgba::TRANSPARENT);
    }

    #[test]
    fn front_facing_points_at_origin() {
        let a = Point3d::new(-1.0, -1.0, 5.0);
        let b = Point3d::new(0.0, 1.0, 5.0);
        let c = Point3d::new(1.0, -1.0, 5.0);
        // Normal of a -> b -> c is -z, towards the camera.
        assert!(is_front_facing(&a, &b, &c));
        assert!(!is_front_facing(&a, &c, &b));
    }

    fn coord() -> impl Strategy<Value = f64> {
        -10.0..10.0f64
    }

    fn point() -> impl Strategy<Value = Point3d> {
        (coord(), coord(), coord()).prop_map(|(x, y, z)| Point3d::new(x, y, z))
    }

    proptest! {
        #[test]
        fn reversing_winding_flips_culling(a in point(), b in point(), c in point()) {
            let facing = math::face_normal(&a, &b, &c).dot(&-a);
            prop_assume!(facing.abs() > 1e-6);
            prop_assert_ne!(is_front_facing(&a, &b, &c), is_front_facing(&a, &c, &b));
            prop_assert_ne!(is_front_facing(&a, &b, &c), is_front_facing(&b, &a, &c));
        }

        #[test]
        fn interpolation_hits_endpoints(i0 in -50i32..50, len in 0i32..50, d0 in -5.0..5.0f64, d1 in -5.0..5.0f64) {
            let s = interpolate(i0, d0, i0 + len, d1);
            prop_assert_eq!(s.len(), len as usize + 1);
            prop_assert_eq!(s[0], d0);
            if len > 0 {
                prop_assert!((s[len as usize] - d1).abs() < 1e-9);
            }
        }
    }
}
