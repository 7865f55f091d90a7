//! Sphere shape.

use config::constants::MIN_SEGMENTATION;
use glam::{DMat4, DVec3};

use crate::geometry::triangle_normal;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::shapes::{Shape, ShapePtr};

/// Sphere centered at the local origin, tessellated as a latitude/longitude
/// grid with `segmentation` bands in both directions.
///
/// Smooth spheres use radial per-vertex normals; faceted spheres use flat
/// per-triangle normals.
#[derive(Debug, Clone)]
pub struct SphereShape {
    material: Material,
    transformation: DMat4,
    radius: f64,
    segmentation: u32,
    smooth: bool,
}

impl SphereShape {
    /// Creates a sphere.
    pub fn new(
        material: Material,
        transformation: DMat4,
        radius: f64,
        segmentation: u32,
        smooth: bool,
    ) -> Self {
        Self {
            material,
            transformation,
            radius,
            segmentation,
            smooth,
        }
    }

    /// Adds a triangle with either shared radial normals or one flat normal.
    fn emit(&self, mesh: &mut Mesh, vertices: [u32; 3], material: crate::material::MaterialId) {
        if self.smooth {
            // Radial normals are stored at the same index as their vertex.
            mesh.add_triangle(vertices, vertices, material);
        } else {
            let flat = mesh.add_normal(triangle_normal(
                mesh.vertex(vertices[0]),
                mesh.vertex(vertices[1]),
                mesh.vertex(vertices[2]),
            ));
            mesh.add_triangle(vertices, [flat; 3], material);
        }
    }
}

impl Shape for SphereShape {
    fn transformation(&self) -> DMat4 {
        self.transformation
    }

    fn check(&self) -> bool {
        self.radius > 0.0 && self.segmentation >= MIN_SEGMENTATION
    }

    fn generate_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_transformation(self.transformation);
        let material = mesh.add_material(self.material.clone());

        let rings = self.segmentation;
        let segments = self.segmentation;
        let phi_step = std::f64::consts::PI / rings as f64;
        let theta_step = std::f64::consts::TAU / segments as f64;

        let add_point = |mesh: &mut Mesh, position: DVec3| -> u32 {
            let index = mesh.add_vertex(position);
            if self.smooth {
                let normal_index = mesh.add_normal(position / self.radius);
                debug_assert_eq!(normal_index, index);
            }
            index
        };

        let north = add_point(&mut mesh, DVec3::new(0.0, 0.0, self.radius));
        let mut ring_start = Vec::with_capacity(rings as usize - 1);
        for ring in 1..rings {
            let phi = ring as f64 * phi_step;
            let (ring_sin, ring_cos) = phi.sin_cos();
            ring_start.push(mesh.vertex_count() as u32);
            for segment in 0..segments {
                let theta = segment as f64 * theta_step;
                let (sin, cos) = theta.sin_cos();
                add_point(
                    &mut mesh,
                    DVec3::new(
                        self.radius * ring_sin * cos,
                        self.radius * ring_sin * sin,
                        self.radius * ring_cos,
                    ),
                );
            }
        }
        let south = add_point(&mut mesh, DVec3::new(0.0, 0.0, -self.radius));

        let at = |ring: usize, segment: u32| ring_start[ring] + segment % segments;

        // Polar caps.
        for segment in 0..segments {
            self.emit(
                &mut mesh,
                [north, at(0, segment), at(0, segment + 1)],
                material,
            );
            self.emit(
                &mut mesh,
                [
                    south,
                    at(rings as usize - 2, segment + 1),
                    at(rings as usize - 2, segment),
                ],
                material,
            );
        }

        // Quad bands between consecutive rings.
        for ring in 0..rings as usize - 2 {
            for segment in 0..segments {
                let upper_curr = at(ring, segment);
                let upper_next = at(ring, segment + 1);
                let lower_curr = at(ring + 1, segment);
                let lower_next = at(ring + 1, segment + 1);
                self.emit(&mut mesh, [lower_curr, lower_next, upper_next], material);
                self.emit(&mut mesh, [lower_curr, upper_next, upper_curr], material);
            }
        }

        mesh
    }

    fn clone_shape(&self) -> ShapePtr {
        std::sync::Arc::new(self.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_volume;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_counts() {
        let segmentation = 8;
        let shape = SphereShape::new(
            Material::default(),
            DMat4::IDENTITY,
            1.0,
            segmentation,
            true,
        );
        assert!(shape.check());

        let mesh = shape.generate_mesh();
        let rings = segmentation as usize - 1;
        assert_eq!(mesh.vertex_count(), 2 + rings * segmentation as usize);
        // 2 polar fans + 2 triangles per interior quad.
        assert_eq!(
            mesh.triangle_count(),
            2 * segmentation as usize + 2 * (rings - 1) * segmentation as usize
        );
    }

    #[test]
    fn test_sphere_volume_approaches_exact() {
        let shape = SphereShape::new(Material::default(), DMat4::IDENTITY, 1.0, 32, true);
        let mesh = shape.generate_mesh();
        let exact = 4.0 / 3.0 * std::f64::consts::PI;
        let volume = signed_volume(&mesh);
        // Inscribed tessellation stays just below the analytic volume.
        assert!(volume > 0.97 * exact && volume < exact);
    }

    #[test]
    fn test_smooth_normals_are_radial() {
        let shape = SphereShape::new(Material::default(), DMat4::IDENTITY, 2.0, 8, true);
        let mesh = shape.generate_mesh();
        for (index, normal) in mesh.normals().iter().enumerate() {
            let expected = mesh.vertex(index as u32) / 2.0;
            assert_relative_eq!(normal.x, expected.x, epsilon = 1e-12);
            assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-12);
        }
    }
}
