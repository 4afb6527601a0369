//! Draw commands and triangle enumeration.
//!
//! A [`DrawCommand`] pairs a primitive topology with index data and knows how
//! to decode itself into triangles. Consumers that only need triangles depend
//! on the [`TriangleSource`] trait, so other index representations can be
//! plugged in without going through byte buffers.

use serde::{Deserialize, Serialize};

use crate::error::{MeshGeomError, Result};

/// Anything that can enumerate the triangles it represents.
pub trait TriangleSource {
    /// Calls `f` once per triangle, in draw order.
    fn for_each_triangle(&self, f: &mut dyn FnMut([u32; 3]));

    /// Collects all triangles into a vector.
    fn triangles(&self) -> Vec<[u32; 3]> {
        let mut out = Vec::new();
        self.for_each_triangle(&mut |tri| out.push(tri));
        out
    }
}

impl<T: TriangleSource + ?Sized> TriangleSource for &T {
    fn for_each_triangle(&self, f: &mut dyn FnMut([u32; 3])) {
        (**self).for_each_triangle(f);
    }
}

impl TriangleSource for Vec<[u32; 3]> {
    fn for_each_triangle(&self, f: &mut dyn FnMut([u32; 3])) {
        for &tri in self {
            f(tri);
        }
    }
}

/// How a stream of indices is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PrimitiveTopology {
    /// Isolated points. Produces no triangles.
    PointList,
    /// Independent line segments. Produces no triangles.
    LineList,
    /// Connected line segments. Produces no triangles.
    LineStrip,
    /// Every three indices form a triangle.
    #[default]
    TriangleList,
    /// Each index after the second forms a triangle with the previous two.
    TriangleStrip,
    /// Each index after the second forms a triangle with the previous one and the first.
    TriangleFan,
}

impl PrimitiveTopology {
    /// Returns true if this topology produces triangles.
    pub fn is_triangles(self) -> bool {
        matches!(
            self,
            Self::TriangleList | Self::TriangleStrip | Self::TriangleFan
        )
    }
}

/// Width of a single index in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexFormat {
    /// 8-bit indices.
    U8,
    /// 16-bit indices.
    U16,
    /// 32-bit indices.
    U32,
}

impl IndexFormat {
    /// Returns the size of one index in bytes.
    pub fn byte_width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Returns the largest index value representable in this format.
    pub fn max_value(self) -> u32 {
        match self {
            Self::U8 => u32::from(u8::MAX),
            Self::U16 => u32::from(u16::MAX),
            Self::U32 => u32::MAX,
        }
    }
}

/// Index data referenced by a draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexData {
    /// Implicit indices `first..first + count`.
    NonIndexed { first: u32, count: u32 },
    /// An opaque index buffer in native byte order.
    Indexed { bytes: Vec<u8>, format: IndexFormat },
}

impl IndexData {
    /// Returns the number of indices.
    pub fn len(&self) -> usize {
        match self {
            // Implicit indices stop at u32::MAX
            #[allow(clippy::cast_possible_truncation)]
            Self::NonIndexed { first, count } => {
                u64::from(*count).min(u64::from(u32::MAX - first) + 1) as usize
            }
            Self::Indexed { bytes, format } => bytes.len() / format.byte_width(),
        }
    }

    /// Returns true if there are no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the index at position `i`.
    fn get(&self, i: usize) -> u32 {
        match self {
            #[allow(clippy::cast_possible_truncation)]
            Self::NonIndexed { first, .. } => first.saturating_add(i as u32),
            Self::Indexed { bytes, format } => {
                let width = format.byte_width();
                let chunk = &bytes[i * width..(i + 1) * width];
                match format {
                    IndexFormat::U8 => u32::from(chunk[0]),
                    IndexFormat::U16 => u32::from(bytemuck::pod_read_unaligned::<u16>(chunk)),
                    IndexFormat::U32 => bytemuck::pod_read_unaligned::<u32>(chunk),
                }
            }
        }
    }
}

/// A primitive topology with its index data and optional restart index.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    topology: PrimitiveTopology,
    indices: IndexData,
    restart_index: Option<u32>,
}

impl DrawCommand {
    /// Creates a draw command from already-built index data.
    pub fn new(topology: PrimitiveTopology, indices: IndexData) -> Self {
        Self {
            topology,
            indices,
            restart_index: None,
        }
    }

    /// Creates a draw command over implicit indices `first..first + count`.
    ///
    /// Fails if the range does not fit in 32-bit indices.
    pub fn non_indexed(topology: PrimitiveTopology, first: u32, count: u32) -> Result<Self> {
        if count > 0 && first.checked_add(count - 1).is_none() {
            return Err(MeshGeomError::IndexRangeOverflow { first, count });
        }
        Ok(Self::new(topology, IndexData::NonIndexed { first, count }))
    }

    /// Creates a draw command from a raw index buffer.
    pub fn from_bytes(
        topology: PrimitiveTopology,
        bytes: Vec<u8>,
        format: IndexFormat,
    ) -> Result<Self> {
        let width = format.byte_width();
        if bytes.len() % width != 0 {
            return Err(MeshGeomError::MisalignedIndexBuffer {
                len: bytes.len(),
                width,
            });
        }
        Ok(Self::new(topology, IndexData::Indexed { bytes, format }))
    }

    /// Creates a draw command from 8-bit indices.
    pub fn indexed_u8(topology: PrimitiveTopology, indices: &[u8]) -> Self {
        Self::new(
            topology,
            IndexData::Indexed {
                bytes: indices.to_vec(),
                format: IndexFormat::U8,
            },
        )
    }

    /// Creates a draw command from 16-bit indices.
    pub fn indexed_u16(topology: PrimitiveTopology, indices: &[u16]) -> Self {
        Self::new(
            topology,
            IndexData::Indexed {
                bytes: bytemuck::cast_slice(indices).to_vec(),
                format: IndexFormat::U16,
            },
        )
    }

    /// Creates a draw command from 32-bit indices.
    pub fn indexed_u32(topology: PrimitiveTopology, indices: &[u32]) -> Self {
        Self::new(
            topology,
            IndexData::Indexed {
                bytes: bytemuck::cast_slice(indices).to_vec(),
                format: IndexFormat::U32,
            },
        )
    }

    /// Shorthand for a 32-bit indexed triangle list.
    pub fn triangle_list(indices: &[u32]) -> Self {
        Self::indexed_u32(PrimitiveTopology::TriangleList, indices)
    }

    /// Sets the primitive restart index.
    ///
    /// Only indexed draws honour it; implicit indices never restart.
    #[must_use]
    pub fn with_restart_index(mut self, restart_index: u32) -> Self {
        if let IndexData::Indexed { format, .. } = &self.indices {
            if restart_index > format.max_value() {
                log::warn!(
                    "restart index {restart_index} can never match a {format:?} index buffer"
                );
            }
        }
        self.restart_index = Some(restart_index);
        self
    }

    /// Returns the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Returns the index data.
    pub fn indices(&self) -> &IndexData {
        &self.indices
    }

    /// Returns the primitive restart index, if any.
    pub fn restart_index(&self) -> Option<u32> {
        self.restart_index
    }

    /// Returns the number of triangles this command produces.
    pub fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.for_each_triangle(&mut |_| count += 1);
        count
    }

    fn is_restart(&self, index: u32) -> bool {
        matches!(self.indices, IndexData::Indexed { .. }) && self.restart_index == Some(index)
    }
}

impl TriangleSource for DrawCommand {
    fn for_each_triangle(&self, f: &mut dyn FnMut([u32; 3])) {
        if !self.topology.is_triangles() {
            return;
        }

        let mut run = Vec::new();
        for i in 0..self.indices.len() {
            let index = self.indices.get(i);
            if self.is_restart(index) {
                emit_run(self.topology, &run, f);
                run.clear();
            } else {
                run.push(index);
            }
        }
        emit_run(self.topology, &run, f);
    }
}

/// Assembles one restart-free run of indices into triangles.
fn emit_run(topology: PrimitiveTopology, run: &[u32], f: &mut dyn FnMut([u32; 3])) {
    match topology {
        PrimitiveTopology::TriangleList => {
            for tri in run.chunks_exact(3) {
                f([tri[0], tri[1], tri[2]]);
            }
        }
        PrimitiveTopology::TriangleStrip => {
            for i in 0..run.len().saturating_sub(2) {
                // Odd triangles swap their first two corners to keep winding consistent
                if i % 2 == 0 {
                    f([run[i], run[i + 1], run[i + 2]]);
                } else {
                    f([run[i + 1], run[i], run[i + 2]]);
                }
            }
        }
        PrimitiveTopology::TriangleFan => {
            for i in 1..run.len().saturating_sub(1) {
                f([run[0], run[i], run[i + 1]]);
            }
        }
        PrimitiveTopology::PointList | PrimitiveTopology::LineList | PrimitiveTopology::LineStrip => {}
    }
}
