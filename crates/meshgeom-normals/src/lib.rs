//! Smooth normal synthesis for meshgeom-rs.
//!
//! [`SmoothNormalSynthesizer`] turns vertex positions plus the triangles of
//! one or more draw commands into one unit normal per vertex. Face normals
//! are weighted by the interior angle at each corner, and vertices that sit
//! at the same position are given a single shared normal (see
//! [`DuplicateGroups`]).
//!
//! This is meant to run once per mesh edit, not per frame: the duplicate
//! search sorts every vertex.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod duplicates;
pub mod smooth_normals;

pub use duplicates::DuplicateGroups;
pub use smooth_normals::{synthesize_smooth_normals, SmoothNormalSynthesizer, SmoothNormals};
