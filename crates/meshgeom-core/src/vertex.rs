//! Borrowed views over flat vertex component buffers.

use glam::Vec3;

use crate::error::{MeshGeomError, Result};

/// A validated, read-only view over a densely packed vertex buffer.
///
/// The buffer stores `components` floats per vertex. Two-component vertices
/// are lifted to `z = 0`; a fourth component is assumed to be already
/// homogeneous-divided and is ignored when a position is read.
#[derive(Debug, Clone, Copy)]
pub struct VertexSlice<'a> {
    data: &'a [f32],
    components: usize,
}

impl<'a> VertexSlice<'a> {
    /// Creates a view, inferring the vertex count from the buffer length.
    pub fn new(data: &'a [f32], components: usize) -> Result<Self> {
        check_components(components)?;
        if data.len() % components != 0 {
            return Err(MeshGeomError::SizeMismatch {
                expected: data.len() - data.len() % components,
                actual: data.len(),
            });
        }
        Ok(Self { data, components })
    }

    /// Creates a view over exactly `count` vertices.
    pub fn with_count(data: &'a [f32], components: usize, count: usize) -> Result<Self> {
        check_components(components)?;
        let Some(expected) = components.checked_mul(count) else {
            return Err(MeshGeomError::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            });
        };
        if data.len() != expected {
            return Err(MeshGeomError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, components })
    }

    /// Returns the number of vertices in the view.
    pub fn len(&self) -> usize {
        self.data.len() / self.components
    }

    /// Returns true if the view holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of floats per vertex.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Returns the underlying flat buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns every raw component of vertex `index`.
    pub fn raw(&self, index: usize) -> &'a [f32] {
        let start = index * self.components;
        &self.data[start..start + self.components]
    }

    /// Returns the position of vertex `index`.
    pub fn position(&self, index: usize) -> Vec3 {
        let raw = self.raw(index);
        match raw {
            [x, y] => Vec3::new(*x, *y, 0.0),
            [x, y, z, ..] => Vec3::new(*x, *y, *z),
            _ => unreachable!("component count is validated on construction"),
        }
    }

    /// Iterates over all vertex positions in buffer order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + 'a {
        let components = self.components;
        self.data.chunks_exact(components).map(|raw| match raw {
            [x, y] => Vec3::new(*x, *y, 0.0),
            [x, y, z, ..] => Vec3::new(*x, *y, *z),
            _ => unreachable!("component count is validated on construction"),
        })
    }
}

fn check_components(components: usize) -> Result<()> {
    if (2..=4).contains(&components) {
        Ok(())
    } else {
        Err(MeshGeomError::InvalidComponentCount(components))
    }
}
