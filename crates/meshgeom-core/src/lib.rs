//! Core abstractions for meshgeom-rs.
//!
//! This crate provides the shared types used throughout meshgeom-rs:
//! - [`VertexSlice`] - a validated view over flat vertex component buffers
//! - [`DrawCommand`] and the [`TriangleSource`] trait for triangle enumeration
//! - [`NormalOptions`] for configuring normal synthesis
//! - The [`MeshGeomError`] type shared by every crate

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod draw;
pub mod error;
pub mod options;
pub mod vertex;

pub use draw::{DrawCommand, IndexData, IndexFormat, PrimitiveTopology, TriangleSource};
pub use error::{MeshGeomError, Result};
pub use options::NormalOptions;
pub use vertex::VertexSlice;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
