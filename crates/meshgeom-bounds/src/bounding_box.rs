//! Axis-aligned bounding boxes.

use glam::{Mat4, Vec3};
use meshgeom_core::{Result, VertexSlice};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// A box is valid when `min <= max` on every axis. [`BoundingBox::INVALID`]
/// marks "no geometry accumulated yet" and is what an empty vertex set
/// produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Componentwise minimum corner.
    pub min: Vec3,
    /// Componentwise maximum corner.
    pub max: Vec3,
}

/// Corner index pairs of the 12 box edges, indexing into [`BoundingBox::vertices`].
pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

impl BoundingBox {
    /// The empty box. Growing it by any valid box yields that box.
    pub const INVALID: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Creates a box from two corners, sorting their components.
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates the tightest box around `points`, or [`Self::INVALID`] if empty.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bbox = Self::INVALID;
        for &p in points {
            bbox.grow_point(p);
        }
        bbox
    }

    /// Creates the tightest box around every vertex of `vertices`.
    pub fn from_vertices(vertices: &VertexSlice<'_>) -> Self {
        let mut bbox = Self::INVALID;
        for p in vertices.positions() {
            bbox.grow_point(p);
        }
        bbox
    }

    /// Returns true if `min <= max` on every axis.
    ///
    /// A single point (`min == max`) is a valid box.
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half the extent along each axis.
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Extent along the longest axis.
    pub fn largest_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Returns true if `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Expands the box to enclose `other`. Invalid boxes are ignored.
    pub fn grow(&mut self, other: &BoundingBox) {
        if !other.is_valid() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Expands the box to enclose `point`.
    pub fn grow_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Replaces the box with the bounds of its 8 corners transformed by `matrix`.
    ///
    /// Each corner is divided by its `w` unless `w` is zero. This is exact for
    /// affine transforms and conservative but not tight for projective ones.
    pub fn transform(&mut self, matrix: &Mat4) {
        if !self.is_valid() {
            return;
        }
        let mut result = Self::INVALID;
        for corner in self.vertices() {
            let clip = *matrix * corner.extend(1.0);
            let p = if clip.w == 0.0 {
                clip.truncate()
            } else {
                clip.truncate() / clip.w
            };
            result.grow_point(p);
        }
        *self = result;
    }

    /// Returns a transformed copy. See [`Self::transform`].
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut out = *self;
        out.transform(matrix);
        out
    }

    /// Returns the 8 corners.
    ///
    /// Bits 0, 1 and 2 of a corner's index select `max` over `min` on x, y and z.
    pub fn vertices(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Returns the 12 edges as index pairs into [`Self::vertices`].
    pub fn edges(&self) -> [[usize; 2]; 12] {
        BOX_EDGES
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::INVALID
    }
}

/// GPU-compatible bounding box uniforms for wireframe overlays.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoundingBoxUniforms {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Whether the box is valid (1.0) or empty (0.0).
    pub valid: f32,
    /// Maximum corner.
    pub max: [f32; 3],
    /// Padding for alignment.
    pub _padding: f32,
}

impl From<&BoundingBox> for BoundingBoxUniforms {
    fn from(bbox: &BoundingBox) -> Self {
        if bbox.is_valid() {
            Self {
                min: bbox.min.to_array(),
                valid: 1.0,
                max: bbox.max.to_array(),
                _padding: 0.0,
            }
        } else {
            bytemuck::Zeroable::zeroed()
        }
    }
}

/// Computes the bounding box of a flat vertex buffer.
///
/// Returns [`BoundingBox::INVALID`] when `vertex_count` is zero.
pub fn compute_bounding_box(
    vertices: &[f32],
    components_per_vertex: usize,
    vertex_count: usize,
) -> Result<BoundingBox> {
    let view = VertexSlice::with_count(vertices, components_per_vertex, vertex_count)?;
    Ok(BoundingBox::from_vertices(&view))
}
