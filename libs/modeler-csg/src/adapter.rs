//! # Exact Mesh Adapter
//!
//! Converts between the plain mesh representation and the kernel's exact
//! meshes: world-space promotion plus provenance tagging on import, rounding
//! plus attribute reconstruction on export.

use modeler::Mesh;
use tracing::debug;

use crate::error::{CsgError, Result};
use crate::exact::mesh::ExactMesh;
use crate::exact::ExactPoint;
use crate::provenance::{
    FaceProvenance, MeshKey, OperandRegistry, OperandSlot, Orientation, ProvenanceTracker,
};
use crate::reconstruct::AttributeReconstructor;

// =============================================================================
// IMPORT
// =============================================================================

/// Imports an operand into exact arithmetic, tagging every face with its
/// provenance.
///
/// The mesh's transformation is baked in: the exact mesh is in world space.
/// Vertex winding is preserved exactly as given, since winding determines
/// the outward side for the kernel.
pub(crate) fn import_mesh(
    mesh: &Mesh,
    slot: OperandSlot,
    key: MeshKey,
    orientation: Orientation,
    tracker: &mut ProvenanceTracker,
) -> Result<ExactMesh> {
    let mut exact = ExactMesh::new(key);

    let mut indices = Vec::with_capacity(mesh.vertex_count());
    for world in mesh.world_vertices() {
        let point = ExactPoint::from_dvec3(world)
            .ok_or_else(|| CsgError::invalid_operand("non-finite vertex coordinate"))?;
        indices.push(exact.add_vertex(point));
    }

    for (triangle_index, triangle) in mesh.triangles().iter().enumerate() {
        let face = exact.add_face([
            indices[triangle.vertices[0] as usize],
            indices[triangle.vertices[1] as usize],
            indices[triangle.vertices[2] as usize],
        ]);
        tracker.tag(
            key,
            face,
            FaceProvenance {
                slot,
                triangle: triangle_index as u32,
                orientation,
            },
        );
    }

    debug!(
        ?key,
        vertices = exact.vertex_count(),
        faces = exact.face_count(),
        "imported operand"
    );
    Ok(exact)
}

// =============================================================================
// EXPORT
// =============================================================================

/// Exports the kernel's result mesh, resolving provenance into interpolated
/// normals and remapped materials.
///
/// Invariant checks here are *not* downgraded to operational failures: a
/// face without provenance or a topologically degenerate face means the
/// propagation protocol is broken, not that the input was bad.
pub(crate) fn export_mesh(
    exact: &ExactMesh,
    tracker: &ProvenanceTracker,
    registry: &OperandRegistry<'_>,
) -> Result<Mesh> {
    let mut output = Mesh::new();
    for vertex in exact.vertices() {
        output.add_vertex(vertex.to_dvec3());
    }

    let mut reconstructor = AttributeReconstructor::new(registry);
    for (face, corners) in exact.faces() {
        if corners[0] == corners[1] || corners[1] == corners[2] || corners[2] == corners[0] {
            return Err(CsgError::invariant(format!(
                "result face {face} is not a triangle"
            )));
        }
        let provenance = tracker.resolve(exact.key(), face).ok_or_else(|| {
            CsgError::invariant(format!("result face {face} has no provenance"))
        })?;

        let positions = [
            output.vertex(corners[0]),
            output.vertex(corners[1]),
            output.vertex(corners[2]),
        ];
        let (normals, material) = reconstructor.reconstruct(&mut output, &provenance, positions)?;
        output.add_triangle(corners, normals, material);
    }

    debug!(
        triangles = output.triangle_count(),
        materials = output.materials().len(),
        "exported result"
    );
    Ok(output)
}

// =============================================================================
// TESTS
// =============================================================================
