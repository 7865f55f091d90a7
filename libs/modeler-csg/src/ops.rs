//! # Boolean Operation Entry Points
//!
//! Public mesh- and shape-level boolean operations.
//!
//! Every entry point runs one complete pipeline under the rounding guard:
//! import (provenance tagging) → corefinement kernel → export (attribute
//! reconstruction). All per-call state — exact meshes, the provenance
//! store, world-space caches — is created inside the call and torn down
//! before it returns, so independent calls are safe to run in parallel.

use std::sync::Arc;

use glam::DMat4;
use modeler::{Mesh, MeshShape, Shape, ShapePtr};
use tracing::debug;

use crate::adapter::{export_mesh, import_mesh};
use crate::error::{CsgError, Result};
use crate::guard::with_rounding_guard;
use crate::kernel::{self, BooleanOperation};
use crate::provenance::{MeshKey, OperandRegistry, OperandSlot, Orientation, ProvenanceTracker};

// =============================================================================
// MESH OPERATIONS
// =============================================================================

/// Runs one pairwise boolean operation.
fn boolean_operation(a: &Mesh, b: &Mesh, operation: BooleanOperation) -> Result<Mesh> {
    debug!(
        %operation,
        a_triangles = a.triangle_count(),
        b_triangles = b.triangle_count(),
        "boolean operation"
    );

    with_rounding_guard(&operation.to_string(), || {
        let registry = OperandRegistry::new(vec![a, b]);
        let mut tracker = ProvenanceTracker::new();

        // For difference, the subtracted operand is logically flipped; the
        // flag travels with every face's provenance so reconstruction can
        // negate its interpolated normals.
        let orientation_b = if operation == BooleanOperation::Difference {
            Orientation::Reversed
        } else {
            Orientation::Original
        };

        let mut exact_a = import_mesh(
            a,
            OperandSlot(0),
            MeshKey::OperandA,
            Orientation::Original,
            &mut tracker,
        )?;
        let mut exact_b =
            import_mesh(b, OperandSlot(1), MeshKey::OperandB, orientation_b, &mut tracker)?;

        let result = kernel::execute(operation, &mut exact_a, &mut exact_b, &mut tracker)?;
        export_mesh(&result, &tracker, &registry)
    })
}

/// Computes `a - b`.
///
/// Meshes enter in their own transformations; the result is in world space
/// under the identity transformation.
pub fn mesh_difference(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    boolean_operation(a, b, BooleanOperation::Difference)
}

/// Computes `a ∩ b`.
pub fn mesh_intersection(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    boolean_operation(a, b, BooleanOperation::Intersection)
}

/// Computes `a ∪ b`.
pub fn mesh_union(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    boolean_operation(a, b, BooleanOperation::Union)
}

/// Unions an ordered list of meshes by left-fold pairwise union.
///
/// An empty list is a failure (there is no identity solid); a single mesh
/// is returned unchanged without running the kernel. The first failing
/// pairwise union aborts the fold.
pub fn mesh_union_all(meshes: &[Mesh]) -> Result<Mesh> {
    let Some((first, rest)) = meshes.split_first() else {
        return Err(CsgError::EmptyOperandList);
    };
    let mut result = first.clone();
    for mesh in rest {
        result = mesh_union(&result, mesh)?;
    }
    Ok(result)
}

// =============================================================================
// SHAPE OPERATIONS
// =============================================================================

/// Generates both operand meshes, runs the mesh operation, and wraps the
/// result as a mesh shape under the identity transformation.
fn shape_boolean_operation(
    a: &dyn Shape,
    b: &dyn Shape,
    operation: BooleanOperation,
) -> Result<ShapePtr> {
    let result = boolean_operation(&a.generate_mesh(), &b.generate_mesh(), operation)?;
    Ok(Arc::new(MeshShape::new(DMat4::IDENTITY, result)))
}

/// Computes `a - b` on shapes.
pub fn shape_difference(a: &dyn Shape, b: &dyn Shape) -> Result<ShapePtr> {
    shape_boolean_operation(a, b, BooleanOperation::Difference)
}

/// Computes `a ∩ b` on shapes.
pub fn shape_intersection(a: &dyn Shape, b: &dyn Shape) -> Result<ShapePtr> {
    shape_boolean_operation(a, b, BooleanOperation::Intersection)
}

/// Computes `a ∪ b` on shapes.
pub fn shape_union(a: &dyn Shape, b: &dyn Shape) -> Result<ShapePtr> {
    shape_boolean_operation(a, b, BooleanOperation::Union)
}

/// Unions an ordered list of shapes; see [`mesh_union_all`].
pub fn shape_union_all(shapes: &[ShapePtr]) -> Result<ShapePtr> {
    let meshes: Vec<Mesh> = shapes.iter().map(|shape| shape.generate_mesh()).collect();
    let result = mesh_union_all(&meshes)?;
    Ok(Arc::new(MeshShape::new(DMat4::IDENTITY, result)))
}
