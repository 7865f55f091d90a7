//! # Face Refinement
//!
//! Incremental constrained re-triangulation of a single face.
//!
//! A refiner starts from one triangle and inserts intersection vertices and
//! segments computed by the corefinement pass. Insertions are resolved with
//! exact 2D predicates in the face's plane (projected along the dominant
//! normal axis), so a constraint endpoint that lies on a boundary edge
//! splits that edge exactly — which is what keeps the refined surfaces of
//! the two operands stitched together vertex-for-vertex.

use std::cmp::Ordering;

use crate::exact::predicates::{cross2, dominant_axis, orient2d, project, triangle_normal};
use crate::exact::{ExactPoint, Scalar};

// =============================================================================
// REFINER
// =============================================================================

/// Constrained triangulation of one face.
#[derive(Debug)]
pub(crate) struct FaceRefiner {
    axis: usize,
    winding: Ordering,
    points3: Vec<ExactPoint>,
    points2: Vec<[Scalar; 2]>,
    triangles: Vec<Option<[usize; 3]>>,
}

/// Where a query point landed during location.
enum Location {
    Vertex(usize),
    Edge(usize, usize),
    Interior(usize),
    Outside,
}

impl FaceRefiner {
    /// Starts a refinement of the triangle `(a, b, c)`.
    ///
    /// Returns `None` for a degenerate triangle.
    pub fn new(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> Option<Self> {
        let normal = triangle_normal(a, b, c);
        if normal.is_zero() {
            return None;
        }
        let axis = dominant_axis(&normal);
        let points2 = vec![project(a, axis), project(b, axis), project(c, axis)];
        let winding = orient2d(&points2[0], &points2[1], &points2[2]);
        if winding == Ordering::Equal {
            return None;
        }
        Some(Self {
            axis,
            winding,
            points3: vec![a.clone(), b.clone(), c.clone()],
            points2,
            triangles: vec![Some([0, 1, 2])],
        })
    }

    /// True once any insertion actually subdivided the face.
    pub fn was_refined(&self) -> bool {
        self.points3.len() > 3
    }

    /// Live fragments as vertex-index triples.
    pub fn fragments(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.triangles.iter().filter_map(|t| *t)
    }

    /// 3D coordinates of a refinement vertex.
    pub fn point(&self, index: usize) -> &ExactPoint {
        &self.points3[index]
    }

    // =========================================================================
    // INSERTION
    // =========================================================================

    /// Inserts a vertex, splitting the containing triangle or edge.
    ///
    /// Returns the vertex index, or `None` when the point lies outside the
    /// face (a constraint clipped to this face never does).
    pub fn insert_point(&mut self, point: &ExactPoint) -> Option<usize> {
        let p2 = project(point, self.axis);
        if let Some(existing) = self.points2.iter().position(|q2| *q2 == p2) {
            return Some(existing);
        }

        let location = self.locate(&p2);
        let index = self.points3.len();
        match location {
            Location::Vertex(v) => return Some(v),
            Location::Outside => {
                debug_assert!(false, "constraint point outside the face");
                return None;
            }
            Location::Interior(triangle) => {
                self.points3.push(point.clone());
                self.points2.push(p2);
                let [c0, c1, c2] = self.triangles[triangle].take().unwrap();
                self.triangles.push(Some([c0, c1, index]));
                self.triangles.push(Some([c1, c2, index]));
                self.triangles.push(Some([c2, c0, index]));
            }
            Location::Edge(triangle, edge) => {
                self.points3.push(point.clone());
                self.points2.push(p2);
                let corners = self.triangles[triangle].unwrap();
                let u = corners[edge];
                let v = corners[(edge + 1) % 3];
                // Split every live triangle sharing the edge, so interior
                // edges stay matched on both sides.
                for id in 0..self.triangles.len() {
                    self.split_edge_of(id, u, v, index);
                }
            }
        }
        Some(index)
    }

    /// Inserts a constraint segment, subdividing every triangulation edge
    /// that properly crosses it until the segment is covered by edges.
    pub fn insert_segment(&mut self, p: &ExactPoint, q: &ExactPoint) {
        let (Some(start), Some(end)) = (self.insert_point(p), self.insert_point(q)) else {
            return;
        };
        if start == end {
            return;
        }
        let p2 = self.points2[start].clone();
        let q2 = self.points2[end].clone();
        let p3 = self.points3[start].clone();
        let q3 = self.points3[end].clone();

        // Each crossing becomes a vertex; new edges never cross the
        // constraint line, so this terminates.
        while let Some(crossing) = self.find_crossing(&p2, &q2) {
            let t = crossing;
            let point = p3.lerp(&q3, &t);
            self.insert_point(&point);
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Locates a 2D point in the triangulation. The point is known not to
    /// coincide with an existing vertex.
    fn locate(&self, p2: &[Scalar; 2]) -> Location {
        for (id, corners) in self.triangles.iter().enumerate() {
            let Some([c0, c1, c2]) = *corners else {
                continue;
            };
            let s0 = orient2d(&self.points2[c0], &self.points2[c1], p2);
            let s1 = orient2d(&self.points2[c1], &self.points2[c2], p2);
            let s2 = orient2d(&self.points2[c2], &self.points2[c0], p2);
            let against = |s: Ordering| s != Ordering::Equal && s != self.winding;
            if against(s0) || against(s1) || against(s2) {
                continue;
            }
            let zeros = [s0, s1, s2]
                .iter()
                .filter(|s| **s == Ordering::Equal)
                .count();
            return match zeros {
                0 => Location::Interior(id),
                1 => {
                    let edge = [s0, s1, s2]
                        .iter()
                        .position(|s| *s == Ordering::Equal)
                        .unwrap();
                    Location::Edge(id, edge)
                }
                // Two zero orientations pin the point to a vertex; vertex
                // equality was ruled out before locating.
                _ => Location::Vertex(if s0 == Ordering::Equal && s2 == Ordering::Equal {
                    c0
                } else if s0 == Ordering::Equal {
                    c1
                } else {
                    c2
                }),
            };
        }
        Location::Outside
    }

    /// Splits triangle `id` at vertex `n` on its edge `{u, v}`, if present.
    fn split_edge_of(&mut self, id: usize, u: usize, v: usize, n: usize) {
        let Some(corners) = self.triangles[id] else {
            return;
        };
        for k in 0..3 {
            let first = corners[k];
            let second = corners[(k + 1) % 3];
            if (first == u && second == v) || (first == v && second == u) {
                let opposite = corners[(k + 2) % 3];
                self.triangles[id] = None;
                self.triangles.push(Some([first, n, opposite]));
                self.triangles.push(Some([n, second, opposite]));
                return;
            }
        }
    }

    /// Finds a triangulation edge properly crossing the open constraint
    /// segment; returns the crossing parameter along the constraint.
    fn find_crossing(&self, p2: &[Scalar; 2], q2: &[Scalar; 2]) -> Option<Scalar> {
        let opposite = |a: Ordering, b: Ordering| {
            (a == Ordering::Greater && b == Ordering::Less)
                || (a == Ordering::Less && b == Ordering::Greater)
        };
        for corners in self.triangles.iter().flatten() {
            for k in 0..3 {
                let u2 = &self.points2[corners[k]];
                let v2 = &self.points2[corners[(k + 1) % 3]];
                if !opposite(orient2d(p2, q2, u2), orient2d(p2, q2, v2)) {
                    continue;
                }
                if !opposite(orient2d(u2, v2, p2), orient2d(u2, v2, q2)) {
                    continue;
                }
                let to_u = [&u2[0] - &p2[0], &u2[1] - &p2[1]];
                let edge = [&v2[0] - &u2[0], &v2[1] - &u2[1]];
                let span = [&q2[0] - &p2[0], &q2[1] - &p2[1]];
                return Some(cross2(&to_u, &edge) / cross2(&span, &edge));
            }
        }
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn point(x: f64, y: f64, z: f64) -> ExactPoint {
        ExactPoint::from_dvec3(DVec3::new(x, y, z)).unwrap()
    }

    fn unit_refiner() -> FaceRefiner {
        FaceRefiner::new(
            &point(0.0, 0.0, 0.0),
            &point(1.0, 0.0, 0.0),
            &point(0.0, 1.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_untouched_face_is_not_refined() {
        let refiner = unit_refiner();
        assert!(!refiner.was_refined());
        assert_eq!(refiner.fragments().count(), 1);
    }

    #[test]
    fn test_existing_vertex_is_reused() {
        let mut refiner = unit_refiner();
        assert_eq!(refiner.insert_point(&point(1.0, 0.0, 0.0)), Some(1));
        assert!(!refiner.was_refined());
    }

    #[test]
    fn test_interior_point_splits_into_three() {
        let mut refiner = unit_refiner();
        refiner.insert_point(&point(0.25, 0.25, 0.0));
        assert!(refiner.was_refined());
        assert_eq!(refiner.fragments().count(), 3);
    }

    #[test]
    fn test_boundary_point_splits_edge() {
        let mut refiner = unit_refiner();
        refiner.insert_point(&point(0.5, 0.0, 0.0));
        assert_eq!(refiner.fragments().count(), 2);
    }

    #[test]
    fn test_segment_across_face() {
        // Cut from one edge to another: fragments must tile the face and
        // the cut endpoints must be vertices.
        let mut refiner = unit_refiner();
        refiner.insert_segment(&point(0.5, 0.0, 0.0), &point(0.0, 0.5, 0.0));
        assert!(refiner.was_refined());
        assert!(refiner.fragments().count() >= 3);

        // Total 2D area is conserved by the subdivision.
        let mut doubled_area = Scalar::from_integer(0.into());
        for [a, b, c] in refiner.fragments() {
            let pa = refiner.point(a).to_dvec3();
            let pb = refiner.point(b).to_dvec3();
            let pc = refiner.point(c).to_dvec3();
            let cross = (pb - pa).cross(pc - pa).z;
            assert!(cross > 0.0, "fragment winding must be preserved");
            doubled_area = doubled_area
                + Scalar::from_float(cross).unwrap();
        }
        assert_eq!(doubled_area, Scalar::from_integer(1.into()));
    }

    #[test]
    fn test_segment_through_interior() {
        let mut refiner = unit_refiner();
        // Constraint ending strictly inside the face.
        refiner.insert_segment(&point(0.5, 0.25, 0.0), &point(0.25, 0.5, 0.0));
        assert!(refiner.was_refined());
        // All fragments keep positive winding.
        for [a, b, c] in refiner.fragments() {
            let pa = refiner.point(a).to_dvec3();
            let pb = refiner.point(b).to_dvec3();
            let pc = refiner.point(c).to_dvec3();
            assert!((pb - pa).cross(pc - pa).z > 0.0);
        }
    }
}
