//! Error types for meshgeom-rs.

use thiserror::Error;

/// The main error type for meshgeom-rs operations.
///
/// Every variant describes a caller bug. Data-shape conditions such as an
/// empty vertex set or a zero-area triangle are absorbed by the algorithms
/// and never surface here.
#[derive(Error, Debug)]
pub enum MeshGeomError {
    /// Vertices must have 2, 3 or 4 components.
    #[error("invalid vertex component count {0} - expected 2, 3 or 4")]
    InvalidComponentCount(usize),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An index byte buffer is not a whole number of indices.
    #[error("index buffer of {len} bytes is not a multiple of the {width}-byte index width")]
    MisalignedIndexBuffer { len: usize, width: usize },

    /// Implicit indices `first..first + count` run past `u32::MAX`.
    #[error("implicit index range starting at {first} with {count} indices overflows u32")]
    IndexRangeOverflow { first: u32, count: u32 },

    /// A triangle referenced a vertex that does not exist.
    #[error("vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// Smooth normals were requested before any draw command was defined.
    #[error("mesh '{0}' has no draw commands - add one before synthesizing normals")]
    NoDrawCommands(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for meshgeom-rs operations.
pub type Result<T> = std::result::Result<T, MeshGeomError>;
