//! Bounding volumes for meshgeom-rs.
//!
//! - [`BoundingBox`] - axis-aligned boxes with grow and transform operations
//! - [`BoundingSphere`] - enclosing spheres built with Ritter's algorithm
//! - [`overlaps_view_volume`] - conservative box-versus-frustum test
//!
//! All volumes are flat per-mesh descriptors; there is no hierarchy.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// `w == 0.0` guards the perspective divide
#![allow(clippy::float_cmp)]

pub mod bounding_box;
pub mod bounding_sphere;
pub mod view_volume;

pub use bounding_box::{compute_bounding_box, BoundingBox, BoundingBoxUniforms, BOX_EDGES};
pub use bounding_sphere::{compute_bounding_sphere, BoundingSphere, BoundingSphereUniforms};
pub use view_volume::{overlaps_view_volume, ViewVolume};
