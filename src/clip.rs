//! View frustum clipping.
//!
//! Each instance is clipped in camera space against the five planes of the view volume. The
//! instance's vertices live in a [`ClipArena`], a per-instance copy that only ever grows while
//! clipping: splitting a triangle appends the two intersection points as new vertices and never
//! touches existing ones. Triangles stay plain index triples into that arena.

use crate::{
    canvas::Canvas,
    color::Rgba,
    math::{self, Matrix4, Point3d},
    scene::{Model, Triangle},
};
use alloc::vec::Vec;

/// Plane given by a unit normal and an offset.
///
/// Points with a positive signed distance are inside, i.e. on the side the normal points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingPlane {
    pub normal: Point3d,
    pub offset: f64,
}

impl ClippingPlane {
    /// Plane through `point` with the given (not necessarily unit) normal.
    pub fn new(normal: Point3d, point: &Point3d) -> Self {
        let normal = normal.normalize();
        Self {
            offset: -normal.dot(point),
            normal,
        }
    }

    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        self.normal.dot(p) + self.offset
    }

    /// The view volume of `canvas`, in clipping order: left, right, top, bottom, near.
    ///
    /// The side planes pass through the camera and the edges of the viewport; the near plane is
    /// the projection plane itself, so nothing closer than `distance` survives.
    pub fn frustum(canvas: &Canvas) -> [ClippingPlane; 5] {
        let d = canvas.distance;
        let hw = canvas.viewport_width / 2.0;
        let hh = canvas.viewport_height / 2.0;
        let apex = Point3d::zeros();

        [
            Self::new(Point3d::new(d, 0.0, hw), &apex),
            Self::new(Point3d::new(-d, 0.0, hw), &apex),
            Self::new(Point3d::new(0.0, -d, hh), &apex),
            Self::new(Point3d::new(0.0, d, hh), &apex),
            Self::new(Point3d::new(0.0, 0.0, 1.0), &Point3d::new(0.0, 0.0, d)),
        ]
    }
}

/// Mutable per-instance copy of a model's geometry.
///
/// The buffers are reused between instances; [`ClipArena::load`] discards whatever the previous
/// instance left behind.
#[derive(Debug, Default)]
pub struct ClipArena {
    vertices: Vec<Point3d>,
    triangles: Vec<Triangle>,
    loaded_vertices: usize,
    /// Signed distances of `vertices` to the plane being processed.
    distances: Vec<f64>,
    /// Triangle list being built for the plane being processed.
    output: Vec<Triangle>,
}

impl ClipArena {
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.distances.clear();
        self.output.clear();
        self.loaded_vertices = 0;
    }

    /// Replaces the contents with `model` transformed by `m`.
    pub fn load(&mut self, model: &Model, m: &Matrix4) {
        self.reset();
        self.vertices
            .extend(model.vertices.iter().map(|v| math::transform_point(m, v)));
        self.triangles.extend_from_slice(&model.triangles);
        self.loaded_vertices = self.vertices.len();
    }

    /// Builds an arena directly from already transformed geometry.
    pub fn from_parts(vertices: Vec<Point3d>, triangles: Vec<Triangle>) -> Self {
        Self {
            loaded_vertices: vertices.len(),
            vertices,
            triangles,
            ..Default::default()
        }
    }

    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of intersection vertices appended since the last load.
    pub fn added_vertices(&self) -> usize {
        self.vertices.len() - self.loaded_vertices
    }

    /// Clips against every plane in order.
    ///
    /// Returns `false` as soon as no triangle is left, without looking at the remaining planes.
    pub fn clip(&mut self, planes: &[ClippingPlane]) -> bool {
        for (i, plane) in planes.iter().enumerate() {
            let left = self.clip_plane(plane);
            log::trace!("plane {i}: {left} triangles left");
            if left == 0 {
                return false;
            }
        }
        true
    }

    /// Clips every triangle against a single plane and returns how many triangles remain.
    ///
    /// Triangles fully inside are kept untouched and triangles fully outside are dropped. A
    /// triangle with one vertex inside becomes one smaller triangle, one with two vertices inside
    /// becomes a quad split into two triangles. The winding of the output always matches the
    /// input.
    pub fn clip_plane(&mut self, plane: &ClippingPlane) -> usize {
        self.distances.clear();
        self.distances
            .extend(self.vertices.iter().map(|v| plane.signed_distance(v)));
        self.output.clear();

        for i in 0..self.triangles.len() {
            let tri = self.triangles[i];

            // Sort by descending distance. Every swap reverses the winding, so remember whether
            // the final order is an odd permutation of the original.
            let mut idx = tri.indices();
            let mut dist = idx.map(|v| self.distances[v]);
            let mut odd = false;
            for (x, y) in [(0, 1), (0, 2), (1, 2)] {
                if dist[x] < dist[y] {
                    dist.swap(x, y);
                    idx.swap(x, y);
                    odd = !odd;
                }
            }

            let [a, b, c] = idx;
            let [d0, d1, d2] = dist;

            if d2 >= 0.0 {
                self.output.push(tri);
            } else if d0 <= 0.0 {
                continue;
            } else if d1 <= 0.0 {
                let b2 = self.push_intersection(a, b);
                let c2 = self.push_intersection(a, c);
                self.push_output([a, b2, c2], odd, tri.color);
            } else {
                let a2 = self.push_intersection(a, c);
                let b2 = self.push_intersection(b, c);
                self.push_output([a, b, a2], odd, tri.color);
                self.push_output([a2, b, b2], odd, tri.color);
            }
        }

        core::mem::swap(&mut self.triangles, &mut self.output);
        self.triangles.len()
    }

    /// Appends the point where the edge `inside -> outside` crosses the plane.
    fn push_intersection(&mut self, inside: usize, outside: usize) -> usize {
        let (di, dout) = (self.distances[inside], self.distances[outside]);
        debug_assert!(
            di > 0.0 && dout <= 0.0,
            "edge does not cross the plane ({di}, {dout})"
        );

        let t = di / (di - dout);
        let (p, q) = (self.vertices[inside], self.vertices[outside]);
        self.vertices.push(p + (q - p) * t);
        self.vertices.len() - 1
    }

    fn push_output(&mut self, mut idx: [usize; 3], odd: bool, color: Rgba) {
        if odd {
            idx.swap(0, 1);
        }
        let [a, b, c] = idx;
        self.output.push(Triangle::new(a, b, c, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);

    fn plane_z0() -> ClippingPlane {
        ClippingPlane::new(Point3d::new(0.0, 0.0, 1.0), &Point3d::zeros())
    }

    fn arena(points: [[f64; 3]; 3]) -> ClipArena {
        ClipArena::from_parts(
            points.iter().map(|[x, y, z]| Point3d::new(*x, *y, *z)).collect(),
            vec![Triangle::new(0, 1, 2, RED)],
        )
    }

    fn normal_of(arena: &ClipArena, t: &Triangle) -> Point3d {
        let [a, b, c] = t.indices().map(|i| arena.vertices()[i]);
        math::face_normal(&a, &b, &c)
    }

    #[test]
    fn fully_inside_is_unchanged() {
        let mut a = arena([[0.0, 0.0, 1.0], [1.0, 0.0, 2.0], [0.0, 1.0, 0.0]]);
        let before = a.triangles().to_vec();
        assert_eq!(a.clip_plane(&plane_z0()), 1);
        assert_eq!(a.triangles(), &before[..]);
        assert_eq!(a.added_vertices(), 0);
    }

    #[test]
    fn fully_outside_is_dropped() {
        let mut a = arena([[0.0, 0.0, -1.0], [1.0, 0.0, -2.0], [0.0, 1.0, 0.0]]);
        assert_eq!(a.clip_plane(&plane_z0()), 0);
        assert!(a.triangles().is_empty());
    }

    #[test]
    fn one_inside_gives_one_triangle() {
        let mut a = arena([[0.0, 0.0, -1.0], [2.0, 0.0, 1.0], [0.0, 2.0, -1.0]]);
        let n = normal_of(&a, &a.triangles()[0]);
        assert_eq!(a.clip_plane(&plane_z0()), 1);
        assert_eq!(a.added_vertices(), 2);

        let t = a.triangles()[0];
        assert_eq!(t.color, RED);
        assert!(normal_of(&a, &t).dot(&n) > 0.0);
        for i in t.indices() {
            assert!(a.vertices()[i].z >= -1e-12);
        }
        // The new vertices sit halfway along the edges.
        assert!(t.indices().contains(&3) && t.indices().contains(&4));
        assert!((a.vertices()[3] - Point3d::new(1.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((a.vertices()[4] - Point3d::new(1.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn two_inside_gives_two_triangles() {
        let mut a = arena([[0.0, 0.0, 1.0], [2.0, 0.0, 1.0], [0.0, 2.0, -1.0]]);
        let n = normal_of(&a, &a.triangles()[0]);
        assert_eq!(a.clip_plane(&plane_z0()), 2);
        assert_eq!(a.added_vertices(), 2);
        for t in a.triangles() {
            assert!(normal_of(&a, t).dot(&n) > 0.0);
        }
    }

    #[test]
    fn empty_after_first_plane_skips_the_rest() {
        let canvas = Canvas::default();
        // Far to the left of the left plane, and also behind the near plane.
        let mut a = arena([[-50.0, 0.0, 0.5], [-60.0, 0.0, 0.5], [-50.0, 1.0, 0.5]]);
        assert!(!a.clip(&ClippingPlane::frustum(&canvas)));
        assert!(a.triangles().is_empty());
        assert_eq!(a.added_vertices(), 0);
    }

    #[test]
    fn frustum_contains_viewport_interior() {
        let canvas = Canvas {
            viewport_width: 2.0,
            viewport_height: 1.0,
            distance: 1.5,
            ..Default::default()
        };
        let planes = ClippingPlane::frustum(&canvas);

        let inside = Point3d::new(0.9, -0.4, 3.0);
        assert!(planes.iter().all(|p| p.signed_distance(&inside) > 0.0));

        let corner = Point3d::new(1.0, 0.5, 1.5);
        for p in &planes[..4] {
            assert!(p.signed_distance(&corner) >= -1e-12);
        }
        assert!(planes[0].signed_distance(&Point3d::new(-1.0, 0.0, 1.5)).abs() < 1e-12);
        assert!(planes[1].signed_distance(&Point3d::new(1.0, 0.0, 1.5)).abs() < 1e-12);
        assert!(planes[2].signed_distance(&Point3d::new(0.0, 0.5, 1.5)).abs() < 1e-12);
        assert!(planes[3].signed_distance(&Point3d::new(0.0, -0.5, 1.5)).abs() < 1e-12);

        let behind = Point3d::new(0.0, 0.0, -1.0);
        assert!(planes[4].signed_distance(&behind) < 0.0);
        assert!(planes[4].signed_distance(&Point3d::new(0.0, 0.0, 1.5)).abs() < 1e-12);
    }

    #[test]
    fn load_copies_and_resets() {
        let model = Model::cube("cube", [RED; 6]);
        let mut a = ClipArena::default();
        a.load(&model, &math::translation_matrix(&Point3d::new(0.0, 0.0, 0.25)));
        assert_eq!(a.vertices().len(), 8);
        a.clip_plane(&plane_z0());
        assert!(a.added_vertices() > 0);

        a.load(&model, &Matrix4::identity());
        assert_eq!(a.added_vertices(), 0);
        assert_eq!(a.triangles(), &model.triangles[..]);
        assert_eq!(model.vertices.len(), 8);
    }

    fn coord() -> impl Strategy<Value = f64> {
        -10.0..10.0f64
    }

    fn point() -> impl Strategy<Value = Point3d> {
        (coord(), coord(), coord()).prop_map(|(x, y, z)| Point3d::new(x, y, z))
    }

    proptest! {
        #[test]
        fn clipping_preserves_winding_and_side(
            a in point(),
            b in point(),
            c in point(),
            n in point(),
            offset in coord(),
        ) {
            prop_assume!(n.norm() > 1e-3);
            let n_in = math::face_normal(&a, &b, &c);
            prop_assume!(n_in.norm() > 1e-3);

            let plane = ClippingPlane { normal: n.normalize(), offset };
            let mut arena = ClipArena::from_parts(vec![a, b, c], vec![Triangle::new(0, 1, 2, RED)]);
            let inside = [a, b, c].iter().filter(|p| plane.signed_distance(p) > 0.0).count();
            let all_inside = [a, b, c].iter().all(|p| plane.signed_distance(p) >= 0.0);

            let left = arena.clip_plane(&plane);

            let expected = match inside {
                _ if all_inside => 1,
                0 => 0,
                1 => 1,
                _ => 2,
            };
            prop_assert_eq!(left, expected);
            prop_assert_eq!(arena.added_vertices(), if all_inside || inside == 0 { 0 } else { 2 });

            for t in arena.triangles() {
                let n_out = normal_of(&arena, t);
                prop_assert!(n_out.dot(&n_in) >= -1e-9 * n_in.norm());
                for i in t.indices() {
                    prop_assert!(plane.signed_distance(&arena.vertices()[i]) >= -1e-9);
                }
            }
        }
    }
}
