//! Error type shared by scene construction and rendering.

use alloc::string::String;

/// Errors reported by the public API.
///
/// Rendering itself never fails halfway through a frame. Anything that could make a render
/// invalid is detected by [`Scene::validate`](crate::scene::Scene::validate) before the first
/// pixel is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An instance refers to a model that is not in the catalog.
    #[error("instance refers to unknown model `{0}`")]
    UnknownModel(String),
    /// A triangle of the named model indexes past the end of its vertex list.
    #[error("model `{model}` has triangle {triangle} referencing vertex {index}, but only {len} vertices exist")]
    VertexIndex {
        model: String,
        triangle: usize,
        index: usize,
        len: usize,
    },
    /// A named color could not be resolved.
    #[error("unknown color name `{0}`")]
    UnknownColor(String),
    /// Canvas dimensions, viewport size and projection distance must all be positive.
    #[error("invalid canvas: {0}")]
    InvalidCanvas(&'static str),
}
