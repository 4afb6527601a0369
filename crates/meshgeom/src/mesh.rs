//! A mesh value owning vertex data, draw commands and a normal attribute.

use glam::{Mat4, Vec3};
use meshgeom_bounds::{overlaps_view_volume, BoundingBox, BoundingSphere};
use meshgeom_core::{DrawCommand, MeshGeomError, NormalOptions, Result, VertexSlice};
use meshgeom_normals::{SmoothNormalSynthesizer, SmoothNormals};

/// A mesh: flat vertex positions, the draw commands that index them and an
/// optional per-vertex normal attribute.
///
/// Bounding volumes are computed on demand and not cached. Replacing the
/// vertices drops any normals computed for the old ones.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<f32>,
    components: usize,
    draw_commands: Vec<DrawCommand>,
    normals: Option<Vec<Vec3>>,
}

impl Mesh {
    /// Creates a mesh from a flat buffer with `components` floats per vertex.
    pub fn new(name: impl Into<String>, vertices: Vec<f32>, components: usize) -> Result<Self> {
        VertexSlice::new(&vertices, components)?;
        Ok(Self {
            name: name.into(),
            vertices,
            components,
            draw_commands: Vec::new(),
            normals: None,
        })
    }

    /// Creates a three-component mesh from positions.
    pub fn from_positions(name: impl Into<String>, positions: &[Vec3]) -> Self {
        let vertices: Vec<f32> = positions.iter().flat_map(|p| p.to_array()).collect();
        // Three floats per position is always a whole number of vertices
        debug_assert!(VertexSlice::new(&vertices, 3).is_ok());
        Self {
            name: name.into(),
            vertices,
            components: 3,
            draw_commands: Vec::new(),
            normals: None,
        }
    }

    /// Returns the name of this mesh.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of floats per vertex.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.components
    }

    /// Returns a view over the vertex buffer.
    ///
    /// `new`, `from_positions` and `set_vertices` are the only writers of
    /// the buffer and each leaves it a whole number of 2, 3 or 4-component
    /// vertices.
    pub fn vertex_slice(&self) -> VertexSlice<'_> {
        VertexSlice::new(&self.vertices, self.components)
            .expect("vertex buffer is validated whenever it is replaced")
    }

    /// Replaces the vertex buffer. Existing normals are discarded.
    pub fn set_vertices(&mut self, vertices: Vec<f32>, components: usize) -> Result<()> {
        VertexSlice::new(&vertices, components)?;
        self.vertices = vertices;
        self.components = components;
        self.normals = None;
        Ok(())
    }

    /// Appends a draw command.
    pub fn add_draw_command(&mut self, command: DrawCommand) -> &mut Self {
        self.draw_commands.push(command);
        self
    }

    /// Returns the draw commands.
    pub fn draw_commands(&self) -> &[DrawCommand] {
        &self.draw_commands
    }

    /// Removes all draw commands.
    pub fn clear_draw_commands(&mut self) {
        self.draw_commands.clear();
    }

    /// Returns the total number of triangles across all draw commands.
    pub fn triangle_count(&self) -> usize {
        self.draw_commands.iter().map(DrawCommand::triangle_count).sum()
    }

    /// Axis-aligned bounding box in model space.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertex_slice())
    }

    /// Bounding box after applying `transform` to every corner.
    pub fn world_bounding_box(&self, transform: &Mat4) -> BoundingBox {
        self.bounding_box().transformed(transform)
    }

    /// Ritter bounding sphere in model space.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_vertices(&self.vertex_slice())
    }

    /// Returns true if the mesh's box may overlap the view volume of `model_view_projection`.
    pub fn is_visible(&self, model_view_projection: &Mat4) -> bool {
        overlaps_view_volume(&self.bounding_box(), model_view_projection)
    }

    /// Returns the normal attribute, if any.
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    /// Sets the normal attribute. Must have one entry per vertex.
    pub fn set_normals(&mut self, normals: Vec<Vec3>) -> Result<()> {
        if normals.len() != self.vertex_count() {
            return Err(MeshGeomError::SizeMismatch {
                expected: self.vertex_count(),
                actual: normals.len(),
            });
        }
        self.normals = Some(normals);
        Ok(())
    }

    /// Synthesizes smooth normals and stores them as the normal attribute.
    ///
    /// Fails when the mesh has no draw commands yet.
    pub fn compute_smooth_normals(&mut self, options: &NormalOptions) -> Result<SmoothNormals> {
        let result = SmoothNormalSynthesizer::new(*options)
            .with_label(self.name.clone())
            .run(&self.vertex_slice(), &self.draw_commands)?;
        if result.unreferenced > 0 {
            log::warn!(
                "mesh '{}': {} vertices have no usable triangle and got a zero normal",
                self.name,
                result.unreferenced
            );
        }
        self.normals = Some(result.normals.clone());
        Ok(result)
    }
}
