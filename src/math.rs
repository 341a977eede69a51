//! Homogeneous matrix builders and small vector helpers.
//!
//! Points are column vectors, so a matrix `M` applies to a point as `M * p`, and `A * B` applies
//! `B` first. Object transforms are composed as `T * R * S`.

use nalgebra as na;

pub type Point3d = na::Vector3<f64>;
pub type Matrix4 = na::Matrix4<f64>;

/// Mirror a direction about a normal.
pub trait Reflect {
    /// Returns `2 * (self . n) * n - self`.
    fn reflect(&self, n: &Self) -> Self;
}

impl Reflect for Point3d {
    fn reflect(&self, n: &Self) -> Self {
        n * (2.0 * self.dot(n)) - self
    }
}

pub fn scale_matrix(scale: &Point3d) -> Matrix4 {
    Matrix4::new_nonuniform_scaling(scale)
}

pub fn translation_matrix(translation: &Point3d) -> Matrix4 {
    Matrix4::new_translation(translation)
}

/// Builds the rotation `Rx * Ry * Rz` from Euler angles given in degrees.
///
/// The order is fixed. Rotating about X first and Z last gives a different matrix, so every
/// caller goes through this function.
///
/// X and Y rotate counter-clockwise when looking down the axis towards the origin. Z turns the
/// other way: a positive angle carries `+x` towards `-y`. Scene files are authored against that
/// convention.
pub fn rotation_matrix(degrees: &Point3d) -> Matrix4 {
    let (sx, cx) = sin_cos(degrees.x);
    let (sy, cy) = sin_cos(degrees.y);
    let (sz, cz) = sin_cos(degrees.z);

    #[rustfmt::skip]
    let rx = na::matrix![
        1.0, 0.0, 0.0, 0.0;
        0.0, cx,  -sx, 0.0;
        0.0, sx,  cx,  0.0;
        0.0, 0.0, 0.0, 1.0
    ];

    #[rustfmt::skip]
    let ry = na::matrix![
        cy,  0.0, sy,  0.0;
        0.0, 1.0, 0.0, 0.0;
        -sy, 0.0, cy,  0.0;
        0.0, 0.0, 0.0, 1.0
    ];

    #[rustfmt::skip]
    let rz = na::matrix![
        cz,  sz,  0.0, 0.0;
        -sz, cz,  0.0, 0.0;
        0.0, 0.0, 1.0, 0.0;
        0.0, 0.0, 0.0, 1.0
    ];

    rx * ry * rz
}

fn sin_cos(degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (libm::sin(rad), libm::cos(rad))
}

/// General 4x4 inverse. Returns `None` for singular matrices.
pub fn inverse(m: &Matrix4) -> Option<Matrix4> {
    m.try_inverse()
}

/// Applies a homogeneous transform to a point, dividing by the resulting `w`.
pub fn transform_point(m: &Matrix4, p: &Point3d) -> Point3d {
    m.transform_point(&na::Point3::from(*p)).coords
}

/// Unnormalized normal of the triangle `a -> b -> c`.
///
/// Swapping any two vertices flips its sign.
pub fn face_normal(a: &Point3d, b: &Point3d, c: &Point3d) -> Point3d {
    (b - a).cross(&(c - a))
}
