//! # Mesh Data Structure
//!
//! Triangle mesh with per-corner shading normals, a material table, and an
//! owned rigid transformation.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::material::{Material, MaterialId, MaterialStore};

// =============================================================================
// TRIANGLE
// =============================================================================

/// One triangle: three vertex indices, three per-corner normal indices, and
/// a material id into the owning mesh's material table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// Vertex indices, counter-clockwise when viewed from outside.
    pub vertices: [u32; 3],
    /// Normal indices, one per corner, aligned with `vertices`.
    pub normals: [u32; 3],
    /// Material id in the owning mesh's table.
    pub material: MaterialId,
}

// =============================================================================
// MESH
// =============================================================================

/// A triangle mesh with vertices, per-corner normals, triangles, and a
/// material table.
///
/// The mesh owns a rigid transformation placing it in the world; local
/// coordinates are stored and world-space data is produced on demand by
/// [`Mesh::world_vertices`] / [`Mesh::world_normals`]. Winding determines
/// the outward side and is never reordered by this type.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use modeler::{Material, Mesh};
///
/// let mut mesh = Mesh::new();
/// let material = mesh.add_material(Material::default());
/// let v0 = mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// let v1 = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// let v2 = mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// let n = mesh.add_normal(DVec3::new(0.0, 0.0, 1.0));
/// mesh.add_triangle([v0, v1, v2], [n, n, n], material);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    /// Rigid placement of the mesh in the world.
    transformation: DMat4,
    /// Vertex positions in local coordinates.
    vertices: Vec<DVec3>,
    /// Normal pool in local coordinates; triangles index per corner.
    normals: Vec<DVec3>,
    /// Triangles referencing vertices, normals, and materials.
    triangles: Vec<Triangle>,
    /// Material table addressed by the triangles.
    materials: MaterialStore,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Creates an empty mesh under the identity transformation.
    pub fn new() -> Self {
        Self::with_transformation(DMat4::IDENTITY)
    }

    /// Creates an empty mesh with the given placement.
    pub fn with_transformation(transformation: DMat4) -> Self {
        Self {
            transformation,
            vertices: Vec::new(),
            normals: Vec::new(),
            triangles: Vec::new(),
            materials: MaterialStore::new(),
        }
    }

    // =========================================================================
    // BUILDING
    // =========================================================================

    /// Adds a vertex position and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a shading normal and returns its index.
    pub fn add_normal(&mut self, normal: DVec3) -> u32 {
        let index = self.normals.len() as u32;
        self.normals.push(normal);
        index
    }

    /// Adds a material to the mesh's table and returns its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.add(material)
    }

    /// Adds a triangle by vertex indices, normal indices, and material id.
    pub fn add_triangle(&mut self, vertices: [u32; 3], normals: [u32; 3], material: MaterialId) {
        self.triangles.push(Triangle {
            vertices,
            normals,
            material,
        });
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// The mesh's placement in the world.
    #[inline]
    pub fn transformation(&self) -> DMat4 {
        self.transformation
    }

    /// Replaces the mesh's placement.
    pub fn set_transformation(&mut self, transformation: DMat4) {
        self.transformation = transformation;
    }

    /// Vertex position by index (local coordinates).
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Normal by index (local coordinates).
    #[inline]
    pub fn normal(&self, index: u32) -> DVec3 {
        self.normals[index as usize]
    }

    /// Triangle by index.
    #[inline]
    pub fn triangle(&self, index: usize) -> &Triangle {
        &self.triangles[index]
    }

    /// All vertices (local coordinates).
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// All normals (local coordinates).
    #[inline]
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// All triangles.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The material table.
    #[inline]
    pub fn materials(&self) -> &MaterialStore {
        &self.materials
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of normals in the pool.
    #[inline]
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    // =========================================================================
    // WORLD-SPACE ENUMERATION
    // =========================================================================

    /// Vertex positions with the mesh's transformation applied.
    pub fn world_vertices(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.vertices
            .iter()
            .map(move |&v| self.transformation.transform_point3(v))
    }

    /// Shading normals rotated into world space and renormalized.
    pub fn world_normals(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.normals
            .iter()
            .map(move |&n| self.transformation.transform_vector3(n).normalize_or_zero())
    }
}

// =============================================================================
// TESTS
// =============================================================================
