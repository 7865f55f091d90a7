//! # Face Classification
//!
//! Locates corefined faces relative to the other operand: inside, outside,
//! or on its boundary (with agreeing or opposing orientation).
//!
//! After corefinement no face straddles the other surface, so one interior
//! point — the exact centroid — decides the whole face. Boundary membership
//! is detected exactly; interior/exterior uses exact ray parity, retrying
//! with a different ray direction whenever the ray grazes an edge, a
//! vertex, or a coplanar face.

use std::cmp::Ordering;

use tracing::trace;

use crate::exact::mesh::ExactMesh;
use crate::exact::predicates::{dominant_axis, orient3d, point_in_triangle_2d, project, triangle_normal};
use crate::exact::{sign, ExactPlane, ExactPoint, ExactVector};
use crate::kernel::Aabb;

// =============================================================================
// RESULTS
// =============================================================================

/// Location of a face relative to the other operand's solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FaceLocation {
    /// Strictly inside the other solid.
    Inside,
    /// Strictly outside the other solid.
    Outside,
    /// On the other surface, outward normals agreeing.
    BoundarySame,
    /// On the other surface, outward normals opposing.
    BoundaryOpposite,
}

/// Why a face could not be classified (operational, input-dependent).
#[derive(Debug)]
pub(crate) struct ClassificationFailure(pub String);

// =============================================================================
// CLASSIFIER TARGET
// =============================================================================

/// One operand prepared for point-location queries.
pub(crate) struct ClassifierTarget {
    faces: Vec<TargetFace>,
}

struct TargetFace {
    points: [ExactPoint; 3],
    plane: ExactPlane,
    bbox: Aabb,
}

impl ClassifierTarget {
    /// Prepares the live faces of a mesh for classification queries.
    pub fn new(mesh: &ExactMesh) -> Self {
        let faces = mesh
            .faces()
            .filter_map(|(_, corners)| {
                let points = [
                    mesh.vertex(corners[0]).clone(),
                    mesh.vertex(corners[1]).clone(),
                    mesh.vertex(corners[2]).clone(),
                ];
                let plane = ExactPlane::from_triangle(&points[0], &points[1], &points[2])?;
                let bbox = Aabb::from_points(points.iter());
                Some(TargetFace {
                    points,
                    plane,
                    bbox,
                })
            })
            .collect();
        Self { faces }
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Candidate ray directions. Deliberately non-axis-aligned and pairwise
/// non-parallel; a direction is abandoned as soon as any exact degeneracy
/// is detected, so correctness never depends on the choice.
const RAY_DIRECTIONS: [[i64; 3]; 8] = [
    [3, 5, 7],
    [7, -3, 5],
    [-5, 7, 3],
    [11, 13, -17],
    [1, -9, 4],
    [-7, 1, 11],
    [13, -2, 9],
    [5, 11, -2],
];

/// Classifies a corefined face (given by its corner points) against the
/// prepared other operand.
pub(crate) fn classify_face(
    points: [&ExactPoint; 3],
    target: &ClassifierTarget,
) -> Result<FaceLocation, ClassificationFailure> {
    let centroid = ExactPoint::centroid(points[0], points[1], points[2]);
    let approx = centroid.to_dvec3();

    // Exact boundary membership first: a centroid on the other surface
    // decides the face by normal agreement.
    for face in &target.faces {
        if !face.bbox.contains(approx) {
            continue;
        }
        if face.plane.side(&centroid) != Ordering::Equal {
            continue;
        }
        let axis = dominant_axis(&face.plane.normal);
        if !point_in_triangle_2d(
            &project(&centroid, axis),
            &project(&face.points[0], axis),
            &project(&face.points[1], axis),
            &project(&face.points[2], axis),
        ) {
            continue;
        }

        let normal = triangle_normal(points[0], points[1], points[2]);
        return match sign(&normal.dot(&face.plane.normal)) {
            Ordering::Greater => Ok(FaceLocation::BoundarySame),
            Ordering::Less => Ok(FaceLocation::BoundaryOpposite),
            Ordering::Equal => Err(ClassificationFailure(
                "degenerate face lying on the other surface".to_string(),
            )),
        };
    }

    // Interior/exterior by exact ray parity.
    'directions: for candidate in RAY_DIRECTIONS {
        let direction = ExactVector::from_ints(candidate[0], candidate[1], candidate[2]);
        let tip = centroid.add(&direction);
        let mut crossings = 0usize;
        for face in &target.faces {
            match ray_face_crossing(&centroid, &tip, face) {
                Crossing::Hit => crossings += 1,
                Crossing::Miss => {}
                Crossing::Degenerate => {
                    trace!(?candidate, "ray grazed the target; retrying");
                    continue 'directions;
                }
            }
        }
        return Ok(if crossings % 2 == 1 {
            FaceLocation::Inside
        } else {
            FaceLocation::Outside
        });
    }

    Err(ClassificationFailure(
        "point classification exhausted all candidate ray directions".to_string(),
    ))
}

enum Crossing {
    Hit,
    Miss,
    Degenerate,
}

/// Exact crossing test of the open ray `origin + t * (tip - origin)`,
/// `t > 0`, against one target face.
fn ray_face_crossing(origin: &ExactPoint, tip: &ExactPoint, face: &TargetFace) -> Crossing {
    let at_origin = face.plane.eval(origin);
    let at_tip = face.plane.eval(tip);

    if sign(&at_origin) == Ordering::Equal {
        if sign(&at_tip) == Ordering::Equal {
            // Ray runs inside the face's plane; parity cannot be trusted.
            return Crossing::Degenerate;
        }
        // The line meets this plane only at the origin itself (t = 0), and
        // the origin is known not to lie on the face.
        return Crossing::Miss;
    }

    let denominator = &at_origin - &at_tip;
    if sign(&denominator) == Ordering::Equal {
        // Parallel to the plane, strictly off it.
        return Crossing::Miss;
    }
    let t = &at_origin / &denominator;
    if sign(&t) != Ordering::Greater {
        return Crossing::Miss;
    }

    let s0 = orient3d(origin, tip, &face.points[0], &face.points[1]);
    let s1 = orient3d(origin, tip, &face.points[1], &face.points[2]);
    let s2 = orient3d(origin, tip, &face.points[2], &face.points[0]);
    if s0 == Ordering::Equal || s1 == Ordering::Equal || s2 == Ordering::Equal {
        // Grazing an edge or vertex.
        return Crossing::Degenerate;
    }
    if s0 == s1 && s1 == s2 {
        Crossing::Hit
    } else {
        Crossing::Miss
    }
}
