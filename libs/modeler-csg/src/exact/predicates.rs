//! # Exact Predicates
//!
//! Orientation, containment, and intersection tests over rational
//! coordinates. Every function here is exact: answers are combinatorial
//! facts about the input, never tolerance judgements.

use std::cmp::Ordering;

use super::{sign, ExactPlane, ExactPoint, ExactVector, Scalar};

// =============================================================================
// 3D ORIENTATION
// =============================================================================

/// Orientation of `d` relative to the plane through `a`, `b`, `c`.
///
/// `Greater` when `d` is on the side the right-handed normal of `(a, b, c)`
/// points to, `Equal` when coplanar.
pub(crate) fn orient3d(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint, d: &ExactPoint) -> Ordering {
    let det = b.sub(a).cross(&c.sub(a)).dot(&d.sub(a));
    sign(&det)
}

/// Unnormalized triangle normal `(b - a) × (c - a)`.
pub(crate) fn triangle_normal(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> ExactVector {
    b.sub(a).cross(&c.sub(a))
}

// =============================================================================
// 2D PROJECTION
// =============================================================================

/// Index of the normal component with the largest magnitude. Dropping that
/// axis projects the normal's plane injectively onto 2D.
pub(crate) fn dominant_axis(normal: &ExactVector) -> usize {
    use num_traits::Signed;
    let ax = normal.x.abs();
    let ay = normal.y.abs();
    let az = normal.z.abs();
    if ax >= ay && ax >= az {
        0
    } else if ay >= az {
        1
    } else {
        2
    }
}

/// Projects a point to 2D by dropping the given axis.
pub(crate) fn project(point: &ExactPoint, axis: usize) -> [Scalar; 2] {
    match axis {
        0 => [point.y.clone(), point.z.clone()],
        1 => [point.x.clone(), point.z.clone()],
        _ => [point.x.clone(), point.y.clone()],
    }
}

/// 2D cross product `a × b`.
pub(crate) fn cross2(a: &[Scalar; 2], b: &[Scalar; 2]) -> Scalar {
    &a[0] * &b[1] - &a[1] * &b[0]
}

fn sub2(a: &[Scalar; 2], b: &[Scalar; 2]) -> [Scalar; 2] {
    [&a[0] - &b[0], &a[1] - &b[1]]
}

/// Orientation of `c` relative to the directed line `a → b`.
pub(crate) fn orient2d(a: &[Scalar; 2], b: &[Scalar; 2], c: &[Scalar; 2]) -> Ordering {
    let det = cross2(&sub2(b, a), &sub2(c, a));
    sign(&det)
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// True if `p` lies in the closed 2D triangle `(a, b, c)`.
///
/// Valid for non-degenerate triangles of either winding.
pub(crate) fn point_in_triangle_2d(
    p: &[Scalar; 2],
    a: &[Scalar; 2],
    b: &[Scalar; 2],
    c: &[Scalar; 2],
) -> bool {
    let s1 = orient2d(a, b, p);
    let s2 = orient2d(b, c, p);
    let s3 = orient2d(c, a, p);
    let has_greater = [s1, s2, s3].contains(&Ordering::Greater);
    let has_less = [s1, s2, s3].contains(&Ordering::Less);
    !(has_greater && has_less)
}

/// True if `p` lies on the closed triangle `(a, b, c)` in 3D.
///
/// False for degenerate triangles.
pub(crate) fn point_on_triangle(
    p: &ExactPoint,
    a: &ExactPoint,
    b: &ExactPoint,
    c: &ExactPoint,
) -> bool {
    let plane = match ExactPlane::from_triangle(a, b, c) {
        Some(plane) => plane,
        None => return false,
    };
    if plane.side(p) != Ordering::Equal {
        return false;
    }
    let axis = dominant_axis(&plane.normal);
    point_in_triangle_2d(
        &project(p, axis),
        &project(a, axis),
        &project(b, axis),
        &project(c, axis),
    )
}

// =============================================================================
// SEGMENT TESTS
// =============================================================================

/// True if `r` (known collinear with `s → t`) lies on the closed segment.
fn on_segment_2d(s: &[Scalar; 2], t: &[Scalar; 2], r: &[Scalar; 2]) -> bool {
    for axis in 0..2 {
        let (low, high) = if s[axis] <= t[axis] {
            (&s[axis], &t[axis])
        } else {
            (&t[axis], &s[axis])
        };
        if &r[axis] < low || &r[axis] > high {
            return false;
        }
    }
    true
}

/// Closed intersection test for 2D segments `(p, q)` and `(u, v)`.
pub(crate) fn segments_intersect_2d(
    p: &[Scalar; 2],
    q: &[Scalar; 2],
    u: &[Scalar; 2],
    v: &[Scalar; 2],
) -> bool {
    let d1 = orient2d(u, v, p);
    let d2 = orient2d(u, v, q);
    let d3 = orient2d(p, q, u);
    let d4 = orient2d(p, q, v);

    let opposite = |a: Ordering, b: Ordering| {
        (a == Ordering::Greater && b == Ordering::Less)
            || (a == Ordering::Less && b == Ordering::Greater)
    };
    if opposite(d1, d2) && opposite(d3, d4) {
        return true;
    }

    (d1 == Ordering::Equal && on_segment_2d(u, v, p))
        || (d2 == Ordering::Equal && on_segment_2d(u, v, q))
        || (d3 == Ordering::Equal && on_segment_2d(p, q, u))
        || (d4 == Ordering::Equal && on_segment_2d(p, q, v))
}

/// Closed intersection test for a 3D segment against a triangle.
pub(crate) fn segment_triangle_intersects(
    p: &ExactPoint,
    q: &ExactPoint,
    a: &ExactPoint,
    b: &ExactPoint,
    c: &ExactPoint,
) -> bool {
    let plane = match ExactPlane::from_triangle(a, b, c) {
        Some(plane) => plane,
        None => return false,
    };
    let sp = plane.side(p);
    let sq = plane.side(q);

    match (sp, sq) {
        (Ordering::Greater, Ordering::Greater) | (Ordering::Less, Ordering::Less) => false,
        (Ordering::Equal, Ordering::Equal) => {
            // Segment lies in the triangle's plane: 2D overlap test.
            let axis = dominant_axis(&plane.normal);
            let p2 = project(p, axis);
            let q2 = project(q, axis);
            let a2 = project(a, axis);
            let b2 = project(b, axis);
            let c2 = project(c, axis);
            if point_in_triangle_2d(&p2, &a2, &b2, &c2)
                || point_in_triangle_2d(&q2, &a2, &b2, &c2)
            {
                return true;
            }
            segments_intersect_2d(&p2, &q2, &a2, &b2)
                || segments_intersect_2d(&p2, &q2, &b2, &c2)
                || segments_intersect_2d(&p2, &q2, &c2, &a2)
        }
        (Ordering::Equal, _) => point_on_triangle(p, a, b, c),
        (_, Ordering::Equal) => point_on_triangle(q, a, b, c),
        _ => {
            // Proper plane crossing: the crossing point lies in the closed
            // triangle iff the line `p → q` does not separate its edges.
            let s1 = orient3d(p, q, a, b);
            let s2 = orient3d(p, q, b, c);
            let s3 = orient3d(p, q, c, a);
            let has_greater = [s1, s2, s3].contains(&Ordering::Greater);
            let has_less = [s1, s2, s3].contains(&Ordering::Less);
            !(has_greater && has_less)
        }
    }
}

/// Closed intersection test for two 3D triangles.
pub(crate) fn triangles_intersect(t1: [&ExactPoint; 3], t2: [&ExactPoint; 3]) -> bool {
    fn edges<'a>(t: [&'a ExactPoint; 3]) -> [(&'a ExactPoint, &'a ExactPoint); 3] {
        [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
    }
    for (p, q) in edges(t1) {
        if segment_triangle_intersects(p, q, t2[0], t2[1], t2[2]) {
            return true;
        }
    }
    for (p, q) in edges(t2) {
        if segment_triangle_intersects(p, q, t1[0], t1[1], t1[2]) {
            return true;
        }
    }
    false
}

// =============================================================================
// SEGMENT CLIPPING
// =============================================================================

/// Clips segment `(p, q)` (2D) to a closed non-degenerate triangle.
///
/// Returns the parameter interval `(t0, t1)` of the retained portion along
/// `p + t (q - p)`, `0 <= t0 <= t1 <= 1`, or `None` when nothing remains.
pub(crate) fn clip_segment_to_triangle_2d(
    p: &[Scalar; 2],
    q: &[Scalar; 2],
    a: &[Scalar; 2],
    b: &[Scalar; 2],
    c: &[Scalar; 2],
) -> Option<(Scalar, Scalar)> {
    use num_traits::{One, Zero};

    let winding = orient2d(a, b, c);
    if winding == Ordering::Equal {
        return None;
    }

    let mut t0 = Scalar::zero();
    let mut t1 = Scalar::one();
    for (u, v) in [(a, b), (b, c), (c, a)] {
        // Inward-signed edge function values at both endpoints.
        let mut ep = cross2(&sub2(v, u), &sub2(p, u));
        let mut eq = cross2(&sub2(v, u), &sub2(q, u));
        if winding == Ordering::Less {
            ep = -ep;
            eq = -eq;
        }

        let sp = sign(&ep);
        let sq = sign(&eq);
        if sp == Ordering::Less && sq == Ordering::Less {
            return None;
        }
        if sp == Ordering::Less {
            // Entering through this edge.
            let t = &ep / (&ep - &eq);
            if t > t0 {
                t0 = t;
            }
        } else if sq == Ordering::Less {
            // Exiting through this edge.
            let t = &ep / (&ep - &eq);
            if t < t1 {
                t1 = t;
            }
        }
    }

    if t0 > t1 {
        None
    } else {
        Some((t0, t1))
    }
}

// =============================================================================
// TESTS
// =============================================================================
