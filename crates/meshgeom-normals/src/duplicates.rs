//! Detection of vertices that share a position.
//!
//! Vertices are never reordered. Instead an index permutation is sorted
//! lexicographically on the raw components and scanned for runs of
//! neighbours closer than the duplicate epsilon.

use std::cmp::Ordering;
use std::ops::Range;

use glam::Vec3;
use meshgeom_core::VertexSlice;

/// Groups of vertex indices that share a position.
#[derive(Debug, Clone, Default)]
pub struct DuplicateGroups {
    order: Vec<usize>,
    runs: Vec<Range<usize>>,
}

impl DuplicateGroups {
    /// Finds every maximal run of two or more vertices whose consecutive
    /// members (in sorted order) are closer than `epsilon` squared distance.
    pub fn find(vertices: &VertexSlice<'_>, epsilon: f32) -> Self {
        let mut order: Vec<usize> = (0..vertices.len()).collect();
        order.sort_by(|&a, &b| compare_raw(vertices.raw(a), vertices.raw(b)));

        let mut runs = Vec::new();
        let mut start = 0;
        for i in 1..=order.len() {
            let continues = i < order.len()
                && vertices
                    .position(order[i - 1])
                    .distance_squared(vertices.position(order[i]))
                    < epsilon;
            if !continues {
                if i - start >= 2 {
                    runs.push(start..i);
                }
                start = i;
            }
        }

        Self { order, runs }
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns true if no vertex shares its position.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Iterates over the groups as slices of vertex indices.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.runs.iter().map(|run| &self.order[run.clone()])
    }

    /// Replaces every group member's value with the sum over its group.
    pub fn merge_sums(&self, values: &mut [Vec3]) {
        for group in self.iter() {
            let sum: Vec3 = group.iter().map(|&i| values[i]).sum();
            for &i in group {
                values[i] = sum;
            }
            log::trace!("merged {} coincident vertices", group.len());
        }
    }
}

/// Lexicographic order on raw vertex components.
///
/// `-0.0` and `+0.0` compare equal so coincident vertices stay adjacent.
fn compare_raw(a: &[f32], b: &[f32]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x + 0.0).total_cmp(&(y + 0.0)))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
