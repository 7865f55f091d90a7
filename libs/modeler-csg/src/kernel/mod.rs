//! # Corefinement Kernel
//!
//! Executes one boolean operation on two exact meshes.
//!
//! ## Pipeline
//!
//! ```text
//! corefine (split faces along the intersection, observer hooks fire)
//!       ↓
//! classify (each face: inside / outside / on-boundary vs. the other solid)
//!       ↓
//! select + copy (per-operation keep rules; copies fire observer hooks)
//! ```
//!
//! The kernel never returns a partially built mesh: any classification
//! failure aborts the whole operation.

pub(crate) mod classify;
pub(crate) mod corefine;
mod refine;


use std::fmt;

use glam::DVec3;
use tracing::debug;

use crate::error::{CsgError, Result};
use crate::exact::mesh::{ExactMesh, FaceId};
use crate::exact::ExactPoint;
use crate::provenance::{CorefinementObserver, MeshKey};
use classify::{classify_face, ClassifierTarget, FaceLocation};

// =============================================================================
// OPERATION
// =============================================================================

/// The boolean operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperation {
    /// `A - B`.
    Difference,
    /// `A ∩ B`.
    Intersection,
    /// `A ∪ B`.
    Union,
}

impl fmt::Display for BooleanOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Difference => "difference",
            Self::Intersection => "intersection",
            Self::Union => "union",
        };
        f.write_str(name)
    }
}

// =============================================================================
// BOUNDING BOXES
// =============================================================================

/// Conservative double-precision box around exact points.
///
/// Inflated so that no exact test is ever skipped because of the rounding
/// in the box itself.
#[derive(Debug, Clone)]
pub(crate) struct Aabb {
    min: [f64; 3],
    max: [f64; 3],
}

impl Aabb {
    /// Builds an inflated box around the given points.
    pub fn from_points<'a>(points: impl Iterator<Item = &'a ExactPoint>) -> Self {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for point in points {
            let approx = point.to_dvec3();
            for (axis, value) in [approx.x, approx.y, approx.z].into_iter().enumerate() {
                min[axis] = min[axis].min(value);
                max[axis] = max[axis].max(value);
            }
        }
        let spread = min
            .iter()
            .chain(max.iter())
            .fold(1.0f64, |acc, v| acc.max(v.abs()));
        let margin = config::constants::BBOX_INFLATION * spread;
        for axis in 0..3 {
            min[axis] -= margin;
            max[axis] += margin;
        }
        Self { min, max }
    }

    /// True if the boxes share any volume.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    /// True if the box contains the point.
    pub fn contains(&self, point: DVec3) -> bool {
        let coords = [point.x, point.y, point.z];
        (0..3).all(|axis| self.min[axis] <= coords[axis] && coords[axis] <= self.max[axis])
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Runs one boolean operation over corefined operands, assembling the
/// result mesh face by face.
pub(crate) fn execute<O: CorefinementObserver>(
    operation: BooleanOperation,
    a: &mut ExactMesh,
    b: &mut ExactMesh,
    observer: &mut O,
) -> Result<ExactMesh> {
    corefine::corefine(a, b, observer);
    debug!(
        a_faces = a.face_count(),
        b_faces = b.face_count(),
        %operation,
        "corefined operands"
    );

    let target_a = ClassifierTarget::new(a);
    let target_b = ClassifierTarget::new(b);
    let mut result = ExactMesh::new(MeshKey::Result);

    for (face, corners) in a.faces() {
        let points = [a.vertex(corners[0]), a.vertex(corners[1]), a.vertex(corners[2])];
        let location = classify_face(points, &target_b)
            .map_err(|failure| CsgError::operation_failed(operation.to_string(), failure.0))?;
        if keep_from_first(operation, location) {
            copy_face(a, face, corners, &mut result, observer, false);
        }
    }

    let reverse_second = operation == BooleanOperation::Difference;
    for (face, corners) in b.faces() {
        let points = [b.vertex(corners[0]), b.vertex(corners[1]), b.vertex(corners[2])];
        let location = classify_face(points, &target_a)
            .map_err(|failure| CsgError::operation_failed(operation.to_string(), failure.0))?;
        if keep_from_second(operation, location) {
            copy_face(b, face, corners, &mut result, observer, reverse_second);
        }
    }

    debug!(result_faces = result.face_count(), "selected result faces");
    Ok(result)
}

/// Keep rule for faces of the first operand.
///
/// Boundary faces are kept from the first operand only, which makes
/// self-union and self-intersection the identity and self-difference empty.
fn keep_from_first(operation: BooleanOperation, location: FaceLocation) -> bool {
    match operation {
        BooleanOperation::Union => matches!(
            location,
            FaceLocation::Outside | FaceLocation::BoundarySame
        ),
        BooleanOperation::Intersection => matches!(
            location,
            FaceLocation::Inside | FaceLocation::BoundarySame
        ),
        BooleanOperation::Difference => matches!(
            location,
            FaceLocation::Outside | FaceLocation::BoundaryOpposite
        ),
    }
}

/// Keep rule for faces of the second operand. Difference emits these with
/// reversed winding (they become the walls of the carved cavity).
fn keep_from_second(operation: BooleanOperation, location: FaceLocation) -> bool {
    match operation {
        BooleanOperation::Union => location == FaceLocation::Outside,
        BooleanOperation::Intersection | BooleanOperation::Difference => {
            location == FaceLocation::Inside
        }
    }
}

/// Copies one face into the destination mesh and reports the copy.
fn copy_face<O: CorefinementObserver>(
    source: &ExactMesh,
    face: FaceId,
    corners: [u32; 3],
    destination: &mut ExactMesh,
    observer: &mut O,
    reverse: bool,
) {
    let mut mapped = corners.map(|c| destination.add_vertex(source.vertex(c).clone()));
    if reverse {
        mapped.swap(1, 2);
    }
    let target = destination.add_face(mapped);
    observer.after_face_copy((source.key(), face), (destination.key(), target));
}
