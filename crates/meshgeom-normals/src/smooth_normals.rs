//! Angle-weighted smooth vertex normals.
//!
//! Every non-degenerate triangle adds its unit face normal to each of its
//! corners, scaled by the interior angle at that corner. Vertices that share
//! a position (texture seams, hard-edge layouts) then pool their sums so they
//! end up with one normal. Counter-clockwise winding gives the right-handed
//! normal.
//!
//! A vertex touched by no usable triangle gets `Vec3::ZERO`.

use glam::Vec3;
use meshgeom_core::{MeshGeomError, NormalOptions, Result, TriangleSource, VertexSlice};

use crate::duplicates::DuplicateGroups;

/// Output of a normal synthesis run.
#[derive(Debug, Clone, Default)]
pub struct SmoothNormals {
    /// One normal per input vertex, unit length or zero.
    pub normals: Vec<Vec3>,
    /// Triangles that contributed.
    pub triangles: usize,
    /// Triangles skipped for having (almost) no area.
    pub degenerate_triangles: usize,
    /// Groups of coincident vertices that were merged.
    pub duplicate_groups: usize,
    /// Vertices left with a zero normal.
    pub unreferenced: usize,
}

/// Computes smooth normals from vertex positions and draw commands.
#[derive(Debug, Clone)]
pub struct SmoothNormalSynthesizer {
    options: NormalOptions,
    label: String,
}

impl Default for SmoothNormalSynthesizer {
    fn default() -> Self {
        Self::new(NormalOptions::default())
    }
}

impl SmoothNormalSynthesizer {
    /// Creates a synthesizer with the given options.
    pub fn new(options: NormalOptions) -> Self {
        Self {
            options,
            label: "<unnamed>".to_string(),
        }
    }

    /// Names the mesh being processed, for logs and errors.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the options in use.
    pub fn options(&self) -> &NormalOptions {
        &self.options
    }

    /// Runs the synthesis.
    ///
    /// Fails with [`MeshGeomError::NoDrawCommands`] when `draw_commands` is
    /// empty and with [`MeshGeomError::IndexOutOfRange`] when a triangle
    /// references a missing vertex.
    pub fn run<D: TriangleSource>(
        &self,
        vertices: &VertexSlice<'_>,
        draw_commands: &[D],
    ) -> Result<SmoothNormals> {
        if draw_commands.is_empty() {
            return Err(MeshGeomError::NoDrawCommands(self.label.clone()));
        }

        let mut result = SmoothNormals {
            normals: vec![Vec3::ZERO; vertices.len()],
            ..SmoothNormals::default()
        };

        for command in draw_commands {
            self.accumulate(vertices, command, &mut result)?;
        }

        if self.options.coalesce_duplicates {
            let groups = DuplicateGroups::find(vertices, self.options.duplicate_epsilon);
            groups.merge_sums(&mut result.normals);
            result.duplicate_groups = groups.len();
        }

        for normal in &mut result.normals {
            *normal = normal.normalize_or_zero();
            if *normal == Vec3::ZERO {
                result.unreferenced += 1;
            }
        }

        log::debug!(
            "smooth normals for '{}': {} vertices, {} triangles, {} degenerate, {} duplicate groups, {} unreferenced",
            self.label,
            vertices.len(),
            result.triangles,
            result.degenerate_triangles,
            result.duplicate_groups,
            result.unreferenced
        );

        Ok(result)
    }

    /// Adds the angle-weighted face normals of one draw command.
    fn accumulate<D: TriangleSource>(
        &self,
        vertices: &VertexSlice<'_>,
        command: &D,
        result: &mut SmoothNormals,
    ) -> Result<()> {
        let vertex_count = vertices.len();
        let mut error = None;

        command.for_each_triangle(&mut |tri| {
            if error.is_some() {
                return;
            }
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                error = Some(MeshGeomError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
                return;
            }

            let corners = tri.map(|i| vertices.position(i as usize));
            let Some((face_normal, angles)) =
                weighted_face_normal(corners, self.options.degenerate_threshold)
            else {
                result.degenerate_triangles += 1;
                return;
            };

            for (&index, angle) in tri.iter().zip(angles) {
                result.normals[index as usize] += face_normal * angle;
            }
            result.triangles += 1;
        });

        error.map_or(Ok(()), Err)
    }
}

/// Returns the unit face normal and the interior angle at each corner, or
/// `None` if the unnormalized normal is shorter than `threshold`.
fn weighted_face_normal(corners: [Vec3; 3], threshold: f32) -> Option<(Vec3, [f32; 3])> {
    let [a, b, c] = corners;
    let normal = (b - a).cross(c - a);
    let length = normal.length();
    if length < threshold || !length.is_finite() {
        return None;
    }

    let angles = [
        corner_angle(a, b, c),
        corner_angle(b, c, a),
        corner_angle(c, a, b),
    ];
    Some((normal / length, angles))
}

/// Interior angle at `apex` between the edges toward `p` and `q`.
fn corner_angle(apex: Vec3, p: Vec3, q: Vec3) -> f32 {
    let u = (p - apex).normalize_or_zero();
    let v = (q - apex).normalize_or_zero();
    u.dot(v).clamp(-1.0, 1.0).acos()
}

/// Computes smooth normals, discarding the run statistics.
pub fn synthesize_smooth_normals<D: TriangleSource>(
    vertices: &VertexSlice<'_>,
    draw_commands: &[D],
    options: &NormalOptions,
) -> Result<Vec<Vec3>> {
    SmoothNormalSynthesizer::new(*options)
        .run(vertices, draw_commands)
        .map(|out| out.normals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshgeom_core::{DrawCommand, PrimitiveTopology};
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn run(data: &[f32], components: usize, commands: &[DrawCommand]) -> SmoothNormals {
        let view = VertexSlice::new(data, components).unwrap();
        SmoothNormalSynthesizer::default().run(&view, commands).unwrap()
    }

    /// 24-vertex unit cube: 4 vertices per face, 2 triangles per face, CCW from outside.
    fn hard_edge_cube() -> (Vec<f32>, Vec<u32>) {
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for (normal, u, v) in faces {
            let base = u32::try_from(positions.len() / 3).unwrap();
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + u * su + v * sv) * 0.5;
                positions.extend_from_slice(&p.to_array());
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        (positions, indices)
    }

    #[test]
    fn test_single_triangle_points_up() {
        let data = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let out = run(&data, 3, &[DrawCommand::triangle_list(&[0, 1, 2])]);
        for n in &out.normals {
            assert!((*n - Vec3::Z).length() < 1e-6, "{n:?}");
        }
        assert_eq!(out.triangles, 1);
        assert_eq!(out.unreferenced, 0);
    }

    #[test]
    fn test_clockwise_winding_flips_normal() {
        let data = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let out = run(&data, 3, &[DrawCommand::triangle_list(&[0, 2, 1])]);
        assert!((out.normals[0] - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_two_component_vertices() {
        let data = [0.0, 0.0, 2.0, 0.0, 0.0, 2.0];
        let out = run(&data, 2, &[DrawCommand::triangle_list(&[0, 1, 2])]);
        assert!((out.normals[2] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_angle_weighting() {
        // Vertex 0 sees a 90 degree corner facing +Z and a 45 degree corner facing +Y
        #[rustfmt::skip]
        let data = [
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 1.0,
        ];
        let out = run(&data, 3, &[DrawCommand::triangle_list(&[0, 1, 2, 0, 3, 1])]);
        let expected = (Vec3::Z * FRAC_PI_2 + Vec3::Y * FRAC_PI_4).normalize();
        assert!((out.normals[0] - expected).length() < 1e-5, "{:?}", out.normals[0]);
    }

    #[test]
    fn test_degenerate_triangle_is_skipped() {
        #[rustfmt::skip]
        let data = [
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            2.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
        ];
        let out = run(&data, 3, &[DrawCommand::triangle_list(&[0, 1, 2, 0, 1, 3])]);
        assert_eq!(out.degenerate_triangles, 1);
        assert_eq!(out.triangles, 1);
        // Vertex 2 is only in the collinear triangle
        assert_eq!(out.normals[2], Vec3::ZERO);
        assert_eq!(out.unreferenced, 1);
        assert!((out.normals[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_repeated_index_triangle_is_finite() {
        let data = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let out = run(&data, 3, &[DrawCommand::triangle_list(&[0, 0, 1, 0, 1, 2])]);
        assert!(out.normals.iter().all(|n| n.is_finite()));
        assert_eq!(out.degenerate_triangles, 1);
    }

    #[test]
    fn test_signed_zero_copies_share_normal() {
        // Vertices 0 and 3 coincide but differ in the sign of x
        #[rustfmt::skip]
        let data = [
            -0.0, 0.0, 0.0,
            -0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
            1.0, 0.0, 1.0,
        ];
        let out = run(&data, 3, &[DrawCommand::triangle_list(&[0, 2, 1, 3, 4, 5])]);
        assert_eq!(out.duplicate_groups, 1);
        assert_eq!(out.normals[0].to_array(), out.normals[3].to_array());
        assert!(out.normals[0].is_normalized());
    }

    #[test]
    fn test_cube_corners_share_diagonal_normal() {
        let (positions, indices) = hard_edge_cube();
        let out = run(&positions, 3, &[DrawCommand::triangle_list(&indices)]);
        assert_eq!(out.normals.len(), 24);
        assert_eq!(out.duplicate_groups, 8);

        let view = VertexSlice::new(&positions, 3).unwrap();
        for i in 0..24 {
            let p = view.position(i);
            let expected = p.signum().normalize();
            assert!((out.normals[i] - expected).length() < 1e-5, "{i}: {:?}", out.normals[i]);
            for j in 0..24 {
                if view.position(j) == p {
                    assert_eq!(out.normals[i].to_array(), out.normals[j].to_array());
                }
            }
        }
    }

    #[test]
    fn test_cube_without_coalescing_keeps_face_normals() {
        let (positions, indices) = hard_edge_cube();
        let view = VertexSlice::new(&positions, 3).unwrap();
        let options = NormalOptions::default().with_coalesce_duplicates(false);
        let normals =
            synthesize_smooth_normals(&view, &[DrawCommand::triangle_list(&indices)], &options)
                .unwrap();
        // First four vertices belong to the +X face
        for n in &normals[..4] {
            assert!((*n - Vec3::X).length() < 1e-6);
        }
    }

    #[test]
    fn test_strip_matches_list() {
        #[rustfmt::skip]
        let data = [
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            1.0, 1.0, 0.0,
        ];
        let strip = DrawCommand::indexed_u16(PrimitiveTopology::TriangleStrip, &[0, 1, 2, 3]);
        let out = run(&data, 3, &[strip]);
        for n in &out.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_no_draw_commands_is_error() {
        let data = [0.0; 9];
        let view = VertexSlice::new(&data, 3).unwrap();
        let commands: [DrawCommand; 0] = [];
        let err = SmoothNormalSynthesizer::default()
            .with_label("empty")
            .run(&view, &commands);
        assert!(matches!(err, Err(MeshGeomError::NoDrawCommands(name)) if name == "empty"));
    }

    #[test]
    fn test_line_only_commands_leave_zero_normals() {
        let data = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let out = run(&data, 3, &[DrawCommand::non_indexed(PrimitiveTopology::LineList, 0, 2).unwrap()]);
        assert_eq!(out.normals, vec![Vec3::ZERO; 2]);
        assert_eq!(out.unreferenced, 2);
    }

    #[test]
    fn test_index_out_of_range_is_error() {
        let data = [0.0; 9];
        let view = VertexSlice::new(&data, 3).unwrap();
        let err = SmoothNormalSynthesizer::default().run(&view, &[DrawCommand::triangle_list(&[0, 1, 7])]);
        assert!(matches!(
            err,
            Err(MeshGeomError::IndexOutOfRange {
                index: 7,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn test_dyn_sources_accepted() {
        let data = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let view = VertexSlice::new(&data, 3).unwrap();
        let tris: Vec<[u32; 3]> = vec![[0, 1, 2]];
        let sources: [&dyn TriangleSource; 1] = [&tris];
        let normals = synthesize_smooth_normals(&view, &sources, &NormalOptions::default()).unwrap();
        assert!((normals[1] - Vec3::Z).length() < 1e-6);
    }

    fn arb_mesh() -> impl Strategy<Value = (Vec<f32>, Vec<u32>)> {
        // Coordinates on a coarse grid so coincident and collinear vertices are common;
        // random sign flips also produce -0.0
        let coord = (-3i8..3, any::<bool>());
        prop::collection::vec(prop::array::uniform3(coord), 3..24).prop_flat_map(|points| {
            let n = u32::try_from(points.len()).unwrap();
            let flat: Vec<f32> = points
                .iter()
                .flatten()
                .map(|&(c, flip)| if flip { -f32::from(c) } else { f32::from(c) })
                .collect();
            (Just(flat), prop::collection::vec(0..n, 3..60))
        })
    }

    proptest! {
        #[test]
        fn prop_normals_finite_and_unit_or_zero((positions, indices) in arb_mesh()) {
            let view = VertexSlice::new(&positions, 3).unwrap();
            let out = SmoothNormalSynthesizer::default()
                .run(&view, &[DrawCommand::triangle_list(&indices)])
                .unwrap();
            for n in &out.normals {
                prop_assert!(n.is_finite());
                let len = n.length();
                prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-4, "length {}", len);
            }
        }

        #[test]
        fn prop_duplicates_bit_identical((positions, indices) in arb_mesh()) {
            let view = VertexSlice::new(&positions, 3).unwrap();
            let out = SmoothNormalSynthesizer::default()
                .run(&view, &[DrawCommand::triangle_list(&indices)])
                .unwrap();
            for i in 0..view.len() {
                for j in 0..view.len() {
                    if view.position(i) == view.position(j) {
                        prop_assert_eq!(out.normals[i].to_array(), out.normals[j].to_array());
                    }
                }
            }
        }
    }
}
