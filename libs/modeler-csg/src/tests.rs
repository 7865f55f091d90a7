//! # Boolean Pipeline Tests
//!
//! End-to-end tests of the public entry points.
//!
//! ## Test Categories
//!
//! - **Volume tests**: cube scenarios with known enclosed volumes
//! - **Topology tests**: results are closed edge-manifold meshes
//! - **Attribute tests**: materials and shading normals track provenance
//! - **Reducer tests**: N-ary union semantics

use std::collections::HashMap;

use approx::assert_relative_eq;
use glam::{DMat4, DVec3};
use modeler::geometry::{signed_volume, triangle_normal};
use modeler::{BoxShape, CylinderShape, Material, Mesh, Shape, ShapePtr};

use crate::error::CsgError;
use crate::{
    mesh_difference, mesh_intersection, mesh_union, mesh_union_all, shape_union, shape_union_all,
};

// =============================================================================
// HELPERS
// =============================================================================

fn cube_at(offset: DVec3, material: Material) -> Mesh {
    BoxShape::new(material, DMat4::from_translation(offset), 1.0, 1.0, 1.0).generate_mesh()
}

fn unit_cube() -> Mesh {
    cube_at(DVec3::ZERO, Material::default())
}

/// Checks that every directed edge is matched by its reverse exactly once
/// (each undirected edge borders exactly two consistently wound triangles).
fn is_closed_manifold(mesh: &Mesh) -> bool {
    let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
    for triangle in mesh.triangles() {
        for corner in 0..3 {
            let a = triangle.vertices[corner];
            let b = triangle.vertices[(corner + 1) % 3];
            if a == b {
                return false;
            }
            *directed.entry((a, b)).or_insert(0) += 1;
        }
    }
    directed.iter().all(|(&(a, b), &count)| {
        count == 1 && directed.get(&(b, a)) == Some(&1)
    })
}

/// World-space bounding box over the triangles of a mesh.
fn bounding_box(mesh: &Mesh) -> (DVec3, DVec3) {
    let world: Vec<DVec3> = mesh.world_vertices().collect();
    let mut min = DVec3::splat(f64::MAX);
    let mut max = DVec3::splat(f64::MIN);
    for triangle in mesh.triangles() {
        for &vertex in &triangle.vertices {
            min = min.min(world[vertex as usize]);
            max = max.max(world[vertex as usize]);
        }
    }
    (min, max)
}

// =============================================================================
// CUBE SCENARIOS
// =============================================================================

/// Two unit cubes overlapping by half along X: `[0,1]³` and
/// `[0.5,1.5]×[0,1]×[0,1]`.
fn overlapping_cubes() -> (Mesh, Mesh) {
    (
        unit_cube(),
        cube_at(DVec3::new(0.5, 0.0, 0.0), Material::default()),
    )
}

#[test]
fn test_union_overlapping_cubes() {
    let (a, b) = overlapping_cubes();
    let result = mesh_union(&a, &b).unwrap();

    assert!(is_closed_manifold(&result));
    assert_relative_eq!(signed_volume(&result), 1.5, epsilon = 1e-9);
}

#[test]
fn test_intersection_overlapping_cubes() {
    let (a, b) = overlapping_cubes();
    let result = mesh_intersection(&a, &b).unwrap();

    assert!(is_closed_manifold(&result));
    assert_relative_eq!(signed_volume(&result), 0.5, epsilon = 1e-9);

    let (min, max) = bounding_box(&result);
    assert_relative_eq!(min.x, 0.5, epsilon = 1e-9);
    assert_relative_eq!(max.x, 1.0, epsilon = 1e-9);
    assert_relative_eq!(min.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(max.z, 1.0, epsilon = 1e-9);
}

#[test]
fn test_difference_overlapping_cubes() {
    let (a, b) = overlapping_cubes();
    let result = mesh_difference(&a, &b).unwrap();

    assert!(is_closed_manifold(&result));
    assert_relative_eq!(signed_volume(&result), 0.5, epsilon = 1e-9);

    let (min, max) = bounding_box(&result);
    assert_relative_eq!(min.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 0.5, epsilon = 1e-9);
}

#[test]
fn test_self_difference_is_empty() {
    let a = unit_cube();
    let b = unit_cube();
    let result = mesh_difference(&a, &b).unwrap();
    assert_eq!(result.triangle_count(), 0);
}

#[test]
fn test_disjoint_union_concatenates_without_subdivision() {
    let a = unit_cube();
    let b = cube_at(DVec3::new(3.0, 0.0, 0.0), Material::default());
    let result = mesh_union(&a, &b).unwrap();

    assert_eq!(
        result.triangle_count(),
        a.triangle_count() + b.triangle_count()
    );
    assert_relative_eq!(signed_volume(&result), 2.0, epsilon = 1e-9);
}

#[test]
fn test_contained_operand() {
    let outer = unit_cube();
    let inner = BoxShape::new(
        Material::default(),
        DMat4::from_translation(DVec3::new(0.25, 0.25, 0.25)),
        0.5,
        0.5,
        0.5,
    )
    .generate_mesh();

    let union = mesh_union(&outer, &inner).unwrap();
    assert_relative_eq!(signed_volume(&union), 1.0, epsilon = 1e-9);

    let intersection = mesh_intersection(&outer, &inner).unwrap();
    assert_relative_eq!(signed_volume(&intersection), 0.125, epsilon = 1e-9);

    // Carving the inner cube leaves a closed cavity.
    let difference = mesh_difference(&outer, &inner).unwrap();
    assert!(is_closed_manifold(&difference));
    assert_relative_eq!(signed_volume(&difference), 0.875, epsilon = 1e-9);
}

#[test]
fn test_glued_cubes_union_removes_shared_wall() {
    let a = unit_cube();
    let b = cube_at(DVec3::new(1.0, 0.0, 0.0), Material::default());

    let union = mesh_union(&a, &b).unwrap();
    assert!(is_closed_manifold(&union));
    assert_relative_eq!(signed_volume(&union), 2.0, epsilon = 1e-9);

    // Subtracting the touching neighbour changes nothing.
    let difference = mesh_difference(&a, &b).unwrap();
    assert_relative_eq!(signed_volume(&difference), 1.0, epsilon = 1e-9);
    assert!(is_closed_manifold(&difference));
}

// =============================================================================
// GENERAL POSITION
// =============================================================================

/// Inclusion-exclusion holds for any operand pair:
/// `V(A∪B) + V(A∩B) = V(A) + V(B)` and `V(A−B) = V(A) − V(A∩B)`.
fn check_inclusion_exclusion(a: &Mesh, b: &Mesh) {
    let union = mesh_union(a, b).unwrap();
    let intersection = mesh_intersection(a, b).unwrap();
    let difference = mesh_difference(a, b).unwrap();

    assert!(is_closed_manifold(&union));
    assert!(is_closed_manifold(&intersection));
    assert!(is_closed_manifold(&difference));

    let va = signed_volume(a);
    let vb = signed_volume(b);
    assert_relative_eq!(
        signed_volume(&union) + signed_volume(&intersection),
        va + vb,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        signed_volume(&difference),
        va - signed_volume(&intersection),
        epsilon = 1e-9
    );
}

#[test]
fn test_rotated_cube_pair() {
    let a = unit_cube();
    let transformation = DMat4::from_translation(DVec3::new(0.3, 0.2, 0.25))
        * DMat4::from_rotation_z(std::f64::consts::FRAC_PI_4);
    let b = BoxShape::new(Material::default(), transformation, 1.0, 1.0, 1.0).generate_mesh();

    check_inclusion_exclusion(&a, &b);
}

#[test]
fn test_cylinder_through_cube() {
    let a = unit_cube();
    let b = CylinderShape::new(
        Material::default(),
        DMat4::from_translation(DVec3::new(0.5, 0.5, -0.5)),
        0.25,
        2.0,
        8,
        false,
    )
    .generate_mesh();

    check_inclusion_exclusion(&a, &b);
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

#[test]
fn test_difference_materials_track_provenance() {
    let red = Material::new([1.0, 0.0, 0.0, 1.0]);
    let blue = Material::new([0.0, 0.0, 1.0, 1.0]);
    let a = cube_at(DVec3::ZERO, red);
    let b = cube_at(DVec3::new(0.5, 0.0, 0.0), blue);

    let result = mesh_difference(&a, &b).unwrap();
    assert_eq!(result.materials().len(), 2);

    let world: Vec<DVec3> = result.world_vertices().collect();
    for triangle in result.triangles() {
        let on_cavity_wall = triangle
            .vertices
            .iter()
            .all(|&v| (world[v as usize].x - 0.5).abs() < 1e-9);
        let color = result.materials().get(triangle.material).color;
        if on_cavity_wall {
            // The wall comes from the subtracted blue cube.
            assert_eq!(color[2], 1.0, "cavity wall must keep B's material");
        } else {
            assert_eq!(color[0], 1.0, "outer faces must keep A's material");
        }
    }
}

#[test]
fn test_union_keeps_flat_normals() {
    let (a, b) = overlapping_cubes();
    let result = mesh_union(&a, &b).unwrap();

    let world: Vec<DVec3> = result.world_vertices().collect();
    for triangle in result.triangles() {
        let geometric = triangle_normal(
            world[triangle.vertices[0] as usize],
            world[triangle.vertices[1] as usize],
            world[triangle.vertices[2] as usize],
        );
        for &normal_index in &triangle.normals {
            let shading = result.normal(normal_index);
            assert_relative_eq!(shading.length(), 1.0, epsilon = 1e-9);
            // Flat axis-aligned source faces reproduce their face normal
            // exactly, split or not.
            assert_relative_eq!(shading.dot(geometric), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_difference_wall_normals_are_flipped_outward() {
    let (a, b) = overlapping_cubes();
    let result = mesh_difference(&a, &b).unwrap();

    let world: Vec<DVec3> = result.world_vertices().collect();
    let mut wall_triangles = 0;
    for triangle in result.triangles() {
        let on_wall = triangle
            .vertices
            .iter()
            .all(|&v| (world[v as usize].x - 0.5).abs() < 1e-9);
        if !on_wall {
            continue;
        }
        wall_triangles += 1;
        // B's face at x = 0.5 points toward -X; the reversed copy serving
        // as the cavity wall must shade toward +X.
        for &normal_index in &triangle.normals {
            assert_relative_eq!(result.normal(normal_index).x, 1.0, epsilon = 1e-9);
        }
    }
    assert!(wall_triangles >= 2, "difference must produce the wall");
}

// =============================================================================
// N-ARY UNION
// =============================================================================

#[test]
fn test_union_all_empty_list_fails() {
    let result = mesh_union_all(&[]);
    match result {
        Err(error) => {
            assert!(matches!(error, CsgError::EmptyOperandList));
            assert!(error.is_operational());
        }
        Ok(_) => panic!("empty union must fail"),
    }
}

#[test]
fn test_union_all_single_mesh_is_unchanged() {
    let a = unit_cube();
    let result = mesh_union_all(std::slice::from_ref(&a)).unwrap();
    assert_eq!(result.triangle_count(), a.triangle_count());
    assert_relative_eq!(signed_volume(&result), 1.0, epsilon = 1e-9);
}

#[test]
fn test_union_all_matches_explicit_fold() {
    let a = unit_cube();
    let b = cube_at(DVec3::new(0.5, 0.0, 0.0), Material::default());
    let c = cube_at(DVec3::new(1.0, 0.0, 0.0), Material::default());

    let reduced = mesh_union_all(&[a.clone(), b.clone(), c.clone()]).unwrap();
    let folded = mesh_union(&mesh_union(&a, &b).unwrap(), &c).unwrap();

    assert_relative_eq!(signed_volume(&reduced), 2.0, epsilon = 1e-9);
    assert_relative_eq!(
        signed_volume(&reduced),
        signed_volume(&folded),
        epsilon = 1e-9
    );
}

// =============================================================================
// SHAPE ENTRY POINTS
// =============================================================================

#[test]
fn test_shape_union_wraps_result() {
    let a = BoxShape::new(Material::default(), DMat4::IDENTITY, 1.0, 1.0, 1.0);
    let b = BoxShape::new(
        Material::default(),
        DMat4::from_translation(DVec3::new(0.5, 0.0, 0.0)),
        1.0,
        1.0,
        1.0,
    );

    let shape = shape_union(&a, &b).unwrap();
    let mesh = shape.generate_mesh();
    assert_relative_eq!(signed_volume(&mesh), 1.5, epsilon = 1e-9);
    // The result shape sits under the identity transformation.
    assert_eq!(shape.transformation(), DMat4::IDENTITY);
}

#[test]
fn test_shape_union_all() {
    let shapes: Vec<ShapePtr> = (0..3)
        .map(|i| {
            BoxShape::new(
                Material::default(),
                DMat4::from_translation(DVec3::new(i as f64 * 0.5, 0.0, 0.0)),
                1.0,
                1.0,
                1.0,
            )
            .clone_shape()
        })
        .collect();

    let union = shape_union_all(&shapes).unwrap();
    assert_relative_eq!(signed_volume(&union.generate_mesh()), 2.0, epsilon = 1e-9);

    assert!(shape_union_all(&[]).is_err());
}

// =============================================================================
// FAILURE MODES
// =============================================================================

#[test]
fn test_non_finite_operand_is_operational_failure() {
    let mut broken = Mesh::new();
    let material = broken.add_material(Material::default());
    let v0 = broken.add_vertex(DVec3::new(f64::NAN, 0.0, 0.0));
    let v1 = broken.add_vertex(DVec3::new(1.0, 0.0, 0.0));
    let v2 = broken.add_vertex(DVec3::new(0.0, 1.0, 0.0));
    let n = broken.add_normal(DVec3::Z);
    broken.add_triangle([v0, v1, v2], [n, n, n], material);

    let error = mesh_union(&unit_cube(), &broken).unwrap_err();
    assert!(error.is_operational());
}
