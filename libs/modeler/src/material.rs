//! # Materials
//!
//! Surface appearance records and the per-mesh material table.

use config::constants::DEFAULT_COLOR;
use serde::{Deserialize, Serialize};

// =============================================================================
// MATERIAL ID
// =============================================================================

/// Identifier of a material inside one mesh's material table.
///
/// Ids are only meaningful for the table that produced them; moving a
/// triangle between meshes requires remapping its material id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Returns the id as a table index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// MATERIAL
// =============================================================================

/// Surface appearance assigned to triangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Linear RGBA color in `[0, 1]`.
    pub color: [f32; 4],
}

impl Material {
    /// Creates a material with the given color.
    pub fn new(color: [f32; 4]) -> Self {
        Self { color }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
        }
    }
}

// =============================================================================
// MATERIAL STORE
// =============================================================================

/// Ordered material table owned by a mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a material and returns its id.
    pub fn add(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    /// Returns the material for an id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this table.
    #[inline]
    pub fn get(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    /// Number of materials in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns true if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterates materials in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
