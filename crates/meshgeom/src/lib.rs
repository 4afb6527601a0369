//! meshgeom-rs: geometry processing for triangle meshes.
//!
//! Computes the flat, per-mesh descriptors a renderer needs but should not
//! compute every frame:
//!
//! - [`BoundingBox`] and [`BoundingSphere`] (Ritter's algorithm)
//! - a conservative view-volume test, [`overlaps_view_volume`]
//! - angle-weighted smooth normals that agree across duplicated vertices
//!
//! # Quick Start
//!
//! ```
//! use meshgeom::*;
//!
//! fn main() -> Result<()> {
//!     let mut mesh = Mesh::from_positions(
//!         "triangle",
//!         &[Vec3::ZERO, Vec3::X, Vec3::Y],
//!     );
//!     mesh.add_draw_command(DrawCommand::triangle_list(&[0, 1, 2]));
//!
//!     mesh.compute_smooth_normals(&NormalOptions::default())?;
//!     assert!(mesh.bounding_box().is_valid());
//!     Ok(())
//! }
//! ```
//!
//! Vertex data can also be handed over as flat buffers with 2, 3 or 4
//! components per vertex through [`VertexSlice`] and the free functions
//! [`compute_bounding_box`], [`compute_bounding_sphere`] and
//! [`synthesize_smooth_normals`].

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod mesh;

pub use mesh::Mesh;

// Re-export core types
pub use meshgeom_core::{
    draw::{DrawCommand, IndexData, IndexFormat, PrimitiveTopology, TriangleSource},
    error::{MeshGeomError, Result},
    options::NormalOptions,
    vertex::VertexSlice,
    Mat4, Vec2, Vec3, Vec4,
};

// Re-export bounding volumes
pub use meshgeom_bounds::{
    compute_bounding_box, compute_bounding_sphere, overlaps_view_volume, BoundingBox,
    BoundingBoxUniforms, BoundingSphere, BoundingSphereUniforms, ViewVolume,
};

// Re-export normal synthesis
pub use meshgeom_normals::{
    synthesize_smooth_normals, DuplicateGroups, SmoothNormalSynthesizer, SmoothNormals,
};

/// Installs an `env_logger` backend for the `log` output of this crate.
///
/// Honors `RUST_LOG`. Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("meshgeom-rs logging initialized");
    }
}
