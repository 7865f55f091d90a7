//! # Corefinement
//!
//! Refines both operands along their mutual intersection so every face of
//! either mesh lies entirely inside, outside, or on the other solid.
//!
//! For every intersecting face pair the exact intersection — a point, a
//! segment, or (for coplanar pairs) the clipped edges of the partner — is
//! inserted into *both* faces. Because the same rational points are inserted
//! on both sides, the refined surfaces share vertices along the whole
//! intersection curve, which is what keeps boolean results watertight.

use std::collections::BTreeMap;

use tracing::debug;

use crate::exact::mesh::{ExactMesh, FaceId};
use crate::exact::predicates::{
    clip_segment_to_triangle_2d, dominant_axis, point_in_triangle_2d, project,
    triangles_intersect,
};
use crate::exact::{sign, ExactPlane, ExactPoint, Scalar};
use crate::kernel::refine::FaceRefiner;
use crate::kernel::Aabb;
use crate::provenance::CorefinementObserver;

// =============================================================================
// CONSTRAINTS
// =============================================================================

/// One piece of intersection geometry to insert into a face.
#[derive(Debug)]
enum Constraint {
    Point(ExactPoint),
    Segment(ExactPoint, ExactPoint),
}

/// Snapshot of one face taken before any refinement.
struct FaceData {
    id: FaceId,
    points: [ExactPoint; 3],
    bbox: Aabb,
}

fn snapshot(mesh: &ExactMesh) -> Vec<FaceData> {
    mesh.faces()
        .map(|(id, corners)| {
            let points = [
                mesh.vertex(corners[0]).clone(),
                mesh.vertex(corners[1]).clone(),
                mesh.vertex(corners[2]).clone(),
            ];
            let bbox = Aabb::from_points(points.iter());
            FaceData { id, points, bbox }
        })
        .collect()
}

// =============================================================================
// COREFINEMENT
// =============================================================================

/// Refines `a` and `b` in place along their intersection, reporting every
/// split to the observer.
pub(crate) fn corefine<O: CorefinementObserver>(
    a: &mut ExactMesh,
    b: &mut ExactMesh,
    observer: &mut O,
) {
    let a_faces = snapshot(a);
    let b_faces = snapshot(b);

    let mut a_constraints: BTreeMap<FaceId, Vec<Constraint>> = BTreeMap::new();
    let mut b_constraints: BTreeMap<FaceId, Vec<Constraint>> = BTreeMap::new();

    for fa in &a_faces {
        for fb in &b_faces {
            if !fa.bbox.overlaps(&fb.bbox) {
                continue;
            }
            let ta = [&fa.points[0], &fa.points[1], &fa.points[2]];
            let tb = [&fb.points[0], &fb.points[1], &fb.points[2]];
            if !triangles_intersect(ta, tb) {
                continue;
            }
            collect_pair_constraints(fa, fb, &mut a_constraints, &mut b_constraints);
        }
    }

    debug!(
        a_cut_faces = a_constraints.len(),
        b_cut_faces = b_constraints.len(),
        "collected corefinement constraints"
    );

    apply_constraints(a, a_constraints, observer);
    apply_constraints(b, b_constraints, observer);
}

/// Computes the exact intersection of one face pair and records it as
/// constraints for both faces.
fn collect_pair_constraints(
    fa: &FaceData,
    fb: &FaceData,
    a_constraints: &mut BTreeMap<FaceId, Vec<Constraint>>,
    b_constraints: &mut BTreeMap<FaceId, Vec<Constraint>>,
) {
    let Some(plane_b) = ExactPlane::from_triangle(&fb.points[0], &fb.points[1], &fb.points[2])
    else {
        return;
    };

    let coplanar = fa
        .points
        .iter()
        .all(|p| plane_b.side(p) == std::cmp::Ordering::Equal);
    if coplanar {
        // Coplanar overlap: each face is refined along the other's edges,
        // clipped to itself.
        let axis = dominant_axis(&plane_b.normal);
        for (p, q) in edges(&fb.points) {
            if let Some(constraint) = clip_edge(p, q, &fa.points, axis) {
                a_constraints.entry(fa.id).or_default().push(constraint);
            }
        }
        for (p, q) in edges(&fa.points) {
            if let Some(constraint) = clip_edge(p, q, &fb.points, axis) {
                b_constraints.entry(fb.id).or_default().push(constraint);
            }
        }
        return;
    }

    let Some(plane_a) = ExactPlane::from_triangle(&fa.points[0], &fa.points[1], &fa.points[2])
    else {
        return;
    };

    // General position: every point of surface-surface contact is either an
    // edge of A piercing B or an edge of B piercing A. All such points are
    // collinear (they lie on the planes' intersection line).
    let mut points: Vec<ExactPoint> = Vec::new();
    for (p, q) in edges(&fa.points) {
        edge_triangle_points(p, q, &plane_b, &fb.points, &mut points);
    }
    for (p, q) in edges(&fb.points) {
        edge_triangle_points(p, q, &plane_a, &fa.points, &mut points);
    }
    dedup_points(&mut points);

    let constraint = match points.len() {
        0 => return,
        1 => Constraint::Point(points.pop().unwrap()),
        _ => match extremes(&points) {
            Some((start, end)) => Constraint::Segment(start, end),
            None => Constraint::Point(points.pop().unwrap()),
        },
    };

    push_clone(a_constraints, fa.id, &constraint);
    push_clone(b_constraints, fb.id, &constraint);
}

fn push_clone(
    constraints: &mut BTreeMap<FaceId, Vec<Constraint>>,
    face: FaceId,
    constraint: &Constraint,
) {
    let cloned = match constraint {
        Constraint::Point(p) => Constraint::Point(p.clone()),
        Constraint::Segment(p, q) => Constraint::Segment(p.clone(), q.clone()),
    };
    constraints.entry(face).or_default().push(cloned);
}

fn edges(points: &[ExactPoint; 3]) -> [(&ExactPoint, &ExactPoint); 3] {
    [
        (&points[0], &points[1]),
        (&points[1], &points[2]),
        (&points[2], &points[0]),
    ]
}

/// Clips the in-plane edge `(p, q)` to a coplanar triangle, as a constraint.
fn clip_edge(
    p: &ExactPoint,
    q: &ExactPoint,
    triangle: &[ExactPoint; 3],
    axis: usize,
) -> Option<Constraint> {
    let p2 = project(p, axis);
    let q2 = project(q, axis);
    let t0 = project(&triangle[0], axis);
    let t1 = project(&triangle[1], axis);
    let t2 = project(&triangle[2], axis);
    let (enter, exit) = clip_segment_to_triangle_2d(&p2, &q2, &t0, &t1, &t2)?;
    let start = p.lerp(q, &enter);
    if enter == exit {
        return Some(Constraint::Point(start));
    }
    let end = p.lerp(q, &exit);
    Some(Constraint::Segment(start, end))
}

/// Appends the points where segment `(p, q)` meets the closed triangle.
fn edge_triangle_points(
    p: &ExactPoint,
    q: &ExactPoint,
    plane: &ExactPlane,
    triangle: &[ExactPoint; 3],
    out: &mut Vec<ExactPoint>,
) {
    use std::cmp::Ordering::*;

    let ep = plane.eval(p);
    let eq = plane.eval(q);
    let axis = dominant_axis(&plane.normal);
    let in_triangle = |point: &ExactPoint| {
        point_in_triangle_2d(
            &project(point, axis),
            &project(&triangle[0], axis),
            &project(&triangle[1], axis),
            &project(&triangle[2], axis),
        )
    };

    match (sign(&ep), sign(&eq)) {
        (Greater, Greater) | (Less, Less) => {}
        (Equal, Equal) => {
            // Edge lies in the triangle's plane: clip it in 2D.
            if let Some(constraint) = clip_edge(p, q, triangle, axis) {
                match constraint {
                    Constraint::Point(point) => out.push(point),
                    Constraint::Segment(start, end) => {
                        out.push(start);
                        out.push(end);
                    }
                }
            }
        }
        (Equal, _) => {
            if in_triangle(p) {
                out.push(p.clone());
            }
        }
        (_, Equal) => {
            if in_triangle(q) {
                out.push(q.clone());
            }
        }
        _ => {
            // Proper crossing of the supporting plane.
            let t = &ep / (&ep - &eq);
            let crossing = p.lerp(q, &t);
            if in_triangle(&crossing) {
                out.push(crossing);
            }
        }
    }
}

fn dedup_points(points: &mut Vec<ExactPoint>) {
    let mut unique: Vec<ExactPoint> = Vec::with_capacity(points.len());
    for point in points.drain(..) {
        if !unique.contains(&point) {
            unique.push(point);
        }
    }
    *points = unique;
}

/// Endpoints of the collinear point set, or `None` if all points coincide.
fn extremes(points: &[ExactPoint]) -> Option<(ExactPoint, ExactPoint)> {
    let origin = &points[0];
    let direction = points.iter().find_map(|p| {
        let d = p.sub(origin);
        (!d.is_zero()).then_some(d)
    })?;

    let mut low = (Scalar::from_integer(0.into()), 0usize);
    let mut high = low.clone();
    for (index, point) in points.iter().enumerate() {
        let param = direction.dot(&point.sub(origin));
        if param < low.0 {
            low = (param.clone(), index);
        }
        if param > high.0 {
            high = (param, index);
        }
    }
    Some((points[low.1].clone(), points[high.1].clone()))
}

// =============================================================================
// APPLYING CONSTRAINTS
// =============================================================================

/// Refines each constrained face, replacing it by its fragments and firing
/// the observer's split hooks.
fn apply_constraints<O: CorefinementObserver>(
    mesh: &mut ExactMesh,
    constraints: BTreeMap<FaceId, Vec<Constraint>>,
    observer: &mut O,
) {
    for (face_id, face_constraints) in constraints {
        let Some(corners) = mesh.face(face_id) else {
            continue;
        };
        let points = [
            mesh.vertex(corners[0]).clone(),
            mesh.vertex(corners[1]).clone(),
            mesh.vertex(corners[2]).clone(),
        ];
        let Some(mut refiner) = FaceRefiner::new(&points[0], &points[1], &points[2]) else {
            continue;
        };
        for constraint in &face_constraints {
            match constraint {
                Constraint::Point(p) => {
                    refiner.insert_point(p);
                }
                Constraint::Segment(p, q) => refiner.insert_segment(p, q),
            }
        }
        if !refiner.was_refined() {
            continue;
        }

        observer.before_subface_creations(mesh.key(), face_id);
        mesh.remove_face(face_id);
        for fragment in refiner.fragments().collect::<Vec<_>>() {
            let mapped = fragment.map(|index| mesh.add_vertex(refiner.point(index).clone()));
            let subface = mesh.add_face(mapped);
            observer.after_subface_created(mesh.key(), subface);
        }
    }
}
