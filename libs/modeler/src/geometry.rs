//! # Geometry Utilities
//!
//! Pure geometric helpers shared by shape generation, attribute
//! reconstruction, and tests.

use glam::DVec3;

use crate::mesh::Mesh;

// =============================================================================
// TRIANGLE HELPERS
// =============================================================================

/// Unit normal of a triangle, or zero for a degenerate triangle.
#[inline]
pub fn triangle_normal(v0: DVec3, v1: DVec3, v2: DVec3) -> DVec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

/// Barycentric coordinates `(u, v, w)` of `point` with respect to the
/// triangle `(a, b, c)`, evaluated on the triangle's plane.
///
/// The dot-product form ignores the component of `point - a` along the
/// triangle normal, so an off-plane query point is implicitly projected
/// onto the plane first. Returns `None` for a degenerate triangle.
pub fn barycentric_coordinates(a: DVec3, b: DVec3, c: DVec3, point: DVec3) -> Option<(f64, f64, f64)> {
    let e0 = b - a;
    let e1 = c - a;
    let e2 = point - a;

    let d00 = e0.dot(e0);
    let d01 = e0.dot(e1);
    let d11 = e1.dot(e1);
    let d20 = e2.dot(e0);
    let d21 = e2.dot(e1);

    let denom = d00 * d11 - d01 * d01;
    if denom == 0.0 {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Some((1.0 - v - w, v, w))
}

/// Barycentric interpolation of the corner values `(n0, n1, n2)` at `point`.
///
/// Falls back to `n0` when the triangle is degenerate. The result is not
/// renormalized; callers interpolating unit normals normalize afterwards.
pub fn barycentric_interpolation(
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    n0: DVec3,
    n1: DVec3,
    n2: DVec3,
    point: DVec3,
) -> DVec3 {
    match barycentric_coordinates(v0, v1, v2, point) {
        Some((u, v, w)) => n0 * u + n1 * v + n2 * w,
        None => n0,
    }
}

// =============================================================================
// MESH MEASURES
// =============================================================================

/// Signed volume enclosed by a closed mesh, in world space.
///
/// Sums signed tetrahedron volumes against the origin (divergence theorem).
/// Positive for consistently outward-wound closed surfaces.
pub fn signed_volume(mesh: &Mesh) -> f64 {
    let world: Vec<DVec3> = mesh.world_vertices().collect();
    let mut volume = 0.0;
    for triangle in mesh.triangles() {
        let v0 = world[triangle.vertices[0] as usize];
        let v1 = world[triangle.vertices[1] as usize];
        let v2 = world[triangle.vertices[2] as usize];
        volume += v0.dot(v1.cross(v2)) / 6.0;
    }
    volume
}

// =============================================================================
// TESTS
// =============================================================================
