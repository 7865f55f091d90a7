//! # Exact Mesh
//!
//! Triangle mesh over rational coordinates, scoped to one boolean call.
//!
//! Vertices are deduplicated exactly: two equal rational points always
//! receive the same index, so refined faces of both operands share vertices
//! along the intersection curve by construction. Faces removed during
//! corefinement are tombstoned; face ids stay stable and are never reused,
//! which lets the provenance store key on `(MeshKey, FaceId)`.

use std::collections::HashMap;

use crate::exact::ExactPoint;
use crate::provenance::MeshKey;

/// Stable face identifier within one [`ExactMesh`].
pub(crate) type FaceId = u32;

/// Exact-arithmetic mesh used by the corefinement kernel.
#[derive(Debug)]
pub(crate) struct ExactMesh {
    key: MeshKey,
    vertices: Vec<ExactPoint>,
    lookup: HashMap<ExactPoint, u32>,
    faces: Vec<Option<[u32; 3]>>,
}

impl ExactMesh {
    /// Creates an empty mesh with the given identity.
    pub fn new(key: MeshKey) -> Self {
        Self {
            key,
            vertices: Vec::new(),
            lookup: HashMap::new(),
            faces: Vec::new(),
        }
    }

    /// Which mesh of the current call this is.
    #[inline]
    pub fn key(&self) -> MeshKey {
        self.key
    }

    /// Adds a vertex, reusing the index of an exactly equal existing point.
    pub fn add_vertex(&mut self, point: ExactPoint) -> u32 {
        if let Some(&index) = self.lookup.get(&point) {
            return index;
        }
        let index = self.vertices.len() as u32;
        self.lookup.insert(point.clone(), index);
        self.vertices.push(point);
        index
    }

    /// Adds a face; the id is stable for the mesh's lifetime.
    pub fn add_face(&mut self, corners: [u32; 3]) -> FaceId {
        let id = self.faces.len() as FaceId;
        self.faces.push(Some(corners));
        id
    }

    /// Tombstones a face (its id is never reused).
    pub fn remove_face(&mut self, face: FaceId) {
        self.faces[face as usize] = None;
    }

    /// Corner indices of a live face.
    #[inline]
    pub fn face(&self, face: FaceId) -> Option<[u32; 3]> {
        self.faces.get(face as usize).copied().flatten()
    }

    /// Iterates live faces in id order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, [u32; 3])> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(id, corners)| corners.map(|c| (id as FaceId, c)))
    }

    /// Number of live faces.
    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    /// Vertex by index.
    #[inline]
    pub fn vertex(&self, index: u32) -> &ExactPoint {
        &self.vertices[index as usize]
    }

    /// All vertices in index order.
    #[inline]
    pub fn vertices(&self) -> &[ExactPoint] {
        &self.vertices
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
