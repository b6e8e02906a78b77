pub mod blob;
pub mod change;
pub mod guid;

pub use blob::BlobStore;
pub use change::{
    FontName, GeometryRef, ImageRef, Matrix, NodeChange, Paint, ParentIndex, StyleOverride,
    SymbolData, TextData, Vector, VectorData, WireColor, WireEffect, WireGradientStop, WireNumber,
};
pub use guid::Guid;
