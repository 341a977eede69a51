//! Scene graph: model catalog, placed instances and the camera.

use crate::{
    color::Rgba,
    math::{self, Matrix4, Point3d},
    Error,
};
use alloc::{collections::BTreeMap, string::String, vec::Vec};

/// Three indices into a vertex list plus a flat fill color.
///
/// The order `a -> b -> c` is the winding order, which decides whether the triangle faces the
/// camera. See [`raster::is_front_facing`](crate::raster::is_front_facing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub color: Rgba,
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize, color: Rgba) -> Self {
        Self { a, b, c, color }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// Named triangle mesh.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    pub name: String,
    pub vertices: Vec<Point3d>,
    pub triangles: Vec<Triangle>,
}

impl Model {
    pub fn new(name: impl Into<String>, vertices: Vec<Point3d>, triangles: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            vertices,
            triangles,
        }
    }

    /// Axis aligned cube with edge length 1 centered at the origin.
    ///
    /// Every face is wound so that its normal points outwards. `colors` gives the face colors in
    /// the order +z, +x, -z, -x, +y, -y.
    pub fn cube(name: impl Into<String>, colors: [Rgba; 6]) -> Self {
        const V: [[f64; 3]; 8] = [
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
        ];
        const FACES: [[[usize; 3]; 2]; 6] = [
            [[0, 1, 2], [0, 2, 3]],
            [[4, 0, 3], [4, 3, 7]],
            [[5, 4, 7], [5, 7, 6]],
            [[1, 5, 6], [1, 6, 2]],
            [[4, 5, 1], [4, 1, 0]],
            [[2, 6, 7], [2, 7, 3]],
        ];

        let vertices = V.iter().map(|[x, y, z]| Point3d::new(*x, *y, *z)).collect();
        let triangles = FACES
            .into_iter()
            .zip(colors)
            .flat_map(|(face, color)| face.map(|[a, b, c]| Triangle::new(a, b, c, color)))
            .collect();

        Self::new(name, vertices, triangles)
    }

    fn validate(&self) -> Result<(), Error> {
        let len = self.vertices.len();
        for (i, t) in self.triangles.iter().enumerate() {
            if let Some(index) = t.indices().into_iter().find(|idx| *idx >= len) {
                return Err(Error::VertexIndex {
                    model: self.name.clone(),
                    triangle: i,
                    index,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// Scale, rotation (Euler degrees, applied as `Rx * Ry * Rz`) and translation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Transform {
    pub scale: Point3d,
    pub rotation: Point3d,
    pub translation: Point3d,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Point3d::new(1.0, 1.0, 1.0),
            rotation: Point3d::zeros(),
            translation: Point3d::zeros(),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Point3d) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Composes `T * R * S`.
    pub fn matrix(&self) -> Matrix4 {
        math::translation_matrix(&self.translation)
            * math::rotation_matrix(&self.rotation)
            * math::scale_matrix(&self.scale)
    }
}

/// A model placed in the world.
///
/// The transform matrix is computed once on construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "InstanceDesc", into = "InstanceDesc"))]
pub struct Instance {
    model: String,
    transform: Transform,
    matrix: Matrix4,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct InstanceDesc {
    model: String,
    #[serde(default)]
    transform: Transform,
}

#[cfg(feature = "serde")]
impl From<InstanceDesc> for Instance {
    fn from(d: InstanceDesc) -> Self {
        Instance::new(d.model, d.transform)
    }
}

#[cfg(feature = "serde")]
impl From<Instance> for InstanceDesc {
    fn from(i: Instance) -> Self {
        InstanceDesc {
            model: i.model,
            transform: i.transform,
        }
    }
}

impl Instance {
    pub fn new(model: impl Into<String>, transform: Transform) -> Self {
        Self {
            model: model.into(),
            matrix: transform.matrix(),
            transform,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Model space to world space.
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }
}

/// Viewer placement.
///
/// In camera space the camera sits at the origin looking down `+z`, with `+y` up and `+x` to the
/// right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Camera {
    pub position: Point3d,
    /// Euler angles in degrees.
    pub rotation: Point3d,
}

impl Camera {
    pub fn new(position: Point3d, rotation: Point3d) -> Self {
        Self { position, rotation }
    }

    /// Placement matrix `T * R`.
    pub fn matrix(&self) -> Matrix4 {
        math::translation_matrix(&self.position) * math::rotation_matrix(&self.rotation)
    }

    /// World space to camera space.
    ///
    /// Computed as `R^T * T(-position)`, the exact inverse of [`Camera::matrix`] for a rigid
    /// placement.
    pub fn inverse_matrix(&self) -> Matrix4 {
        math::rotation_matrix(&self.rotation).transpose()
            * math::translation_matrix(&-self.position)
    }
}

/// Everything a render pass reads: the model catalog, the instances and the camera.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Scene {
    pub models: BTreeMap<String, Model>,
    pub instances: Vec<Instance>,
    pub camera: Camera,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// Adds a model to the catalog, returning the one it replaced.
    pub fn add_model(&mut self, model: Model) -> Option<Model> {
        self.models.insert(model.name.clone(), model)
    }

    pub fn add_instance(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn model(&self, name: &str) -> Result<&Model, Error> {
        self.models
            .get(name)
            .ok_or_else(|| Error::UnknownModel(name.into()))
    }

    /// Checks that every instance names a known model and that every triangle indexes a vertex
    /// that exists.
    pub fn validate(&self) -> Result<(), Error> {
        for model in self.models.values() {
            model.validate()?;
        }
        for instance in &self.instances {
            self.model(instance.model())?;
        }
        Ok(())
    }
}
