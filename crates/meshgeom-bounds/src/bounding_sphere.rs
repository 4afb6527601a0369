//! Enclosing bounding spheres built with Ritter's algorithm.

use glam::{Mat4, Vec3};
use meshgeom_core::{Result, VertexSlice};
use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;

/// A bounding sphere. Valid when `radius >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius of the sphere. Negative marks the empty sphere.
    pub radius: f32,
}

impl BoundingSphere {
    /// The empty sphere. Growing it by any valid sphere yields that sphere.
    pub const INVALID: Self = Self {
        center: Vec3::ZERO,
        radius: -1.0,
    };

    /// Creates a sphere from a center and radius.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Builds an enclosing sphere for `vertices` with Ritter's algorithm.
    ///
    /// The sphere is seeded from the bounding box (its center and half its
    /// largest dimension), then every vertex outside the current sphere pulls
    /// the sphere toward itself just far enough to touch it. The result
    /// depends on vertex order and is not minimal.
    pub fn from_vertices(vertices: &VertexSlice<'_>) -> Self {
        let bbox = BoundingBox::from_vertices(vertices);
        if !bbox.is_valid() {
            return Self::INVALID;
        }

        let mut center = bbox.center();
        let mut radius = bbox.largest_dimension() * 0.5;
        let mut radius_sq = radius * radius;
        let mut adjustments = 0usize;

        for p in vertices.positions() {
            let dist_sq = (p - center).length_squared();
            if dist_sq > radius_sq {
                let dist = dist_sq.sqrt();
                let new_radius = (radius + dist) * 0.5;
                // Shift so the far side of the old sphere stays on the boundary
                center += (p - center) * ((dist - new_radius) / dist);
                radius = new_radius;
                radius_sq = radius * radius;
                adjustments += 1;
            }
        }

        log::trace!(
            "ritter sphere over {} vertices: {} adjustments, radius {}",
            vertices.len(),
            adjustments,
            radius
        );
        Self { center, radius }
    }

    /// Creates the sphere circumscribing a box, or [`Self::INVALID`] for an invalid box.
    pub fn from_bounding_box(bbox: &BoundingBox) -> Self {
        if !bbox.is_valid() {
            return Self::INVALID;
        }
        Self {
            center: bbox.center(),
            radius: bbox.half_extents().length(),
        }
    }

    /// Returns true if `radius >= 0`.
    pub fn is_valid(&self) -> bool {
        self.radius >= 0.0
    }

    /// Returns true if `point` lies inside or on the sphere.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.is_valid() && (point - self.center).length_squared() <= self.radius * self.radius
    }

    /// Returns true if `other` lies entirely inside this sphere.
    pub fn contains_sphere(&self, other: &BoundingSphere) -> bool {
        if !other.is_valid() {
            return true;
        }
        self.is_valid() && self.radius >= (other.center - self.center).length() + other.radius
    }

    /// Expands the sphere to enclose `other`.
    ///
    /// No-op when `other` is invalid or already contained; adopts `other` when
    /// it contains this sphere. Otherwise the new sphere passes through the two
    /// extreme points along the center-to-center axis. `a.grow(b)` and
    /// `b.grow(a)` enclose the same points but may differ in the last bits.
    ///
    /// Coincident centers keep the larger sphere.
    pub fn grow(&mut self, other: &BoundingSphere) {
        if !other.is_valid() {
            return;
        }
        if !self.is_valid() {
            *self = *other;
            return;
        }

        let offset = other.center - self.center;
        let dist = offset.length();

        if self.radius >= dist + other.radius {
            return;
        }
        if other.radius >= dist + self.radius {
            *self = *other;
            return;
        }
        if dist <= f32::EPSILON {
            if other.radius > self.radius {
                *self = *other;
            }
            return;
        }

        let axis = offset / dist;
        let near = self.center - axis * self.radius;
        let far = other.center + axis * other.radius;
        let center = (near + far) * 0.5;

        // Measure from the rounded center so both inputs stay strictly inside,
        // which also makes repeated growth by the same sphere a no-op.
        let radius = ((self.center - center).length() + self.radius)
            .max((other.center - center).length() + other.radius);

        self.center = center;
        self.radius = radius;
    }

    /// Transforms the sphere by `matrix`.
    ///
    /// The center is mapped as a point. The radius is scaled by the longest
    /// of the three basis vectors in the linear part, which over-estimates
    /// under non-uniform scale.
    pub fn transform(&mut self, matrix: &Mat4) {
        if !self.is_valid() {
            return;
        }
        let scale = matrix
            .x_axis
            .truncate()
            .length()
            .max(matrix.y_axis.truncate().length())
            .max(matrix.z_axis.truncate().length());
        self.center = matrix.transform_point3(self.center);
        self.radius *= scale;
    }

    /// Returns a transformed copy. See [`Self::transform`].
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut out = *self;
        out.transform(matrix);
        out
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::INVALID
    }
}

/// GPU-compatible bounding sphere uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoundingSphereUniforms {
    /// Center of the sphere.
    pub center: [f32; 3],
    /// Radius, negative when empty.
    pub radius: f32,
}

impl From<&BoundingSphere> for BoundingSphereUniforms {
    fn from(sphere: &BoundingSphere) -> Self {
        Self {
            center: sphere.center.to_array(),
            radius: sphere.radius,
        }
    }
}

/// Computes a Ritter bounding sphere of a flat vertex buffer.
///
/// Returns [`BoundingSphere::INVALID`] when `vertex_count` is zero.
pub fn compute_bounding_sphere(
    vertices: &[f32],
    components_per_vertex: usize,
    vertex_count: usize,
) -> Result<BoundingSphere> {
    let view = VertexSlice::with_count(vertices, components_per_vertex, vertex_count)?;
    Ok(BoundingSphere::from_vertices(&view))
}
