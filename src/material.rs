use crate::math::Point3d;

/// Defines how bright a triangle is at each of its vertices.
///
/// The rasterizer interpolates the returned intensity across the triangle and multiplies the
/// triangle's flat color with it. Both arguments are in camera space, so the camera is at the
/// origin.
pub trait Material {
    /// Intensity at `vertex` of a triangle whose unit face normal is `normal`.
    fn intensity(&self, vertex: &Point3d, normal: &Point3d) -> f64;
}

/// Draws every triangle with its color unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlit;

impl Material for Unlit {
    fn intensity(&self, _: &Point3d, _: &Point3d) -> f64 {
        1.0
    }
}

/// Where the light of a [`Diffuse`] material comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Light {
    /// Point light at the camera position.
    Headlight,
    /// Parallel light travelling along the given camera-space direction.
    Directional(Point3d),
}

/// Lambertian shading with an ambient term.
///
/// Intensity is `ambient + strength * max(0, n . l)` with `l` the unit vector towards the light.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diffuse {
    pub ambient: f64,
    pub strength: f64,
    pub light: Light,
}

impl Default for Diffuse {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            strength: 0.8,
            light: Light::Headlight,
        }
    }
}

impl Material for Diffuse {
    fn intensity(&self, vertex: &Point3d, normal: &Point3d) -> f64 {
        let to_light = match self.light {
            Light::Headlight => -vertex,
            Light::Directional(dir) => -dir,
        };
        let len = to_light.norm();
        if len == 0.0 {
            return self.ambient;
        }
        let n_dot_l = normal.dot(&to_light) / len;
        self.ambient + self.strength * n_dot_l.max(0.0)
    }
}
