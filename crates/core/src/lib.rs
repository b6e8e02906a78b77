//! figtree-core decodes scene-snapshot containers — a versioned binary
//! envelope carrying a self-describing schema chunk and a data chunk —
//! into normalized scene trees for downstream tooling.
//!
//! The pipeline: [`container`] splits and decompresses chunks, [`schema`]
//! compiles the schema chunk into a decoder, [`scene`] runs it over the
//! data chunk, [`tree`] reconstructs the node forest, [`registry`]
//! pre-assigns component ids, and [`mapper`] converts nodes into the
//! [`figtree_protocol`] model. [`document`] ties it together.

pub mod container;
pub mod document;
pub mod geometry;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod scene;
pub mod schema;
pub mod tree;

use thiserror::Error;

pub use document::{Conversion, ConvertedPage, SceneDocument, SceneFile, decode_scene};

/// Umbrella error for the whole decode path. Only structural failures
/// that make the file uninterpretable surface here; anything local to one
/// node is degraded and recorded as a warning instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("container: {0}")]
    Container(#[from] container::ContainerError),
    #[error("schema: {0}")]
    Schema(#[from] schema::SchemaError),
    #[error("scene data: {0}")]
    Scene(#[from] scene::SceneError),
    #[error("tree: {0}")]
    Tree(#[from] tree::TreeError),
}
