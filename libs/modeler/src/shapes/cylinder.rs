//! Cylinder shape.

use config::constants::MIN_SEGMENTATION;
use glam::{DMat4, DVec3};

use crate::geometry::triangle_normal;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::shapes::{Shape, ShapePtr};

/// Cylinder with its axis along local Z, base at `z = 0`.
///
/// Smooth cylinders share radial normals between the two rings so the side
/// surface shades continuously; faceted cylinders use one flat normal per
/// side quad.
#[derive(Debug, Clone)]
pub struct CylinderShape {
    material: Material,
    transformation: DMat4,
    radius: f64,
    height: f64,
    segmentation: u32,
    smooth: bool,
}

impl CylinderShape {
    /// Creates a cylinder.
    pub fn new(
        material: Material,
        transformation: DMat4,
        radius: f64,
        height: f64,
        segmentation: u32,
        smooth: bool,
    ) -> Self {
        Self {
            material,
            transformation,
            radius,
            height,
            segmentation,
            smooth,
        }
    }
}

impl Shape for CylinderShape {
    fn transformation(&self) -> DMat4 {
        self.transformation
    }

    fn check(&self) -> bool {
        self.radius > 0.0 && self.height > 0.0 && self.segmentation >= MIN_SEGMENTATION
    }

    fn generate_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_transformation(self.transformation);
        let material = mesh.add_material(self.material.clone());

        let segments = self.segmentation;
        let step_angle = std::f64::consts::TAU / segments as f64;

        // Ring vertices: bottom ring then top ring, same angular order.
        for i in 0..segments {
            let theta = i as f64 * step_angle;
            let (sin, cos) = theta.sin_cos();
            mesh.add_vertex(DVec3::new(self.radius * cos, self.radius * sin, 0.0));
        }
        for i in 0..segments {
            let theta = i as f64 * step_angle;
            let (sin, cos) = theta.sin_cos();
            mesh.add_vertex(DVec3::new(
                self.radius * cos,
                self.radius * sin,
                self.height,
            ));
        }
        let bottom = |i: u32| i % segments;
        let top = |i: u32| segments + i % segments;

        // Side surface.
        if self.smooth {
            let radial_start = mesh.normal_count() as u32;
            for i in 0..segments {
                let theta = i as f64 * step_angle;
                let (sin, cos) = theta.sin_cos();
                mesh.add_normal(DVec3::new(cos, sin, 0.0));
            }
            let radial = |i: u32| radial_start + i % segments;
            for i in 0..segments {
                let j = i + 1;
                mesh.add_triangle(
                    [bottom(i), bottom(j), top(j)],
                    [radial(i), radial(j), radial(j)],
                    material,
                );
                mesh.add_triangle(
                    [bottom(i), top(j), top(i)],
                    [radial(i), radial(j), radial(i)],
                    material,
                );
            }
        } else {
            for i in 0..segments {
                let j = i + 1;
                let flat = mesh.add_normal(triangle_normal(
                    mesh.vertex(bottom(i)),
                    mesh.vertex(bottom(j)),
                    mesh.vertex(top(j)),
                ));
                mesh.add_triangle([bottom(i), bottom(j), top(j)], [flat; 3], material);
                mesh.add_triangle([bottom(i), top(j), top(i)], [flat; 3], material);
            }
        }

        // Caps, fanned from the first ring vertex.
        let down = mesh.add_normal(DVec3::new(0.0, 0.0, -1.0));
        let up = mesh.add_normal(DVec3::new(0.0, 0.0, 1.0));
        for i in 1..segments - 1 {
            mesh.add_triangle([bottom(0), bottom(i + 1), bottom(i)], [down; 3], material);
            mesh.add_triangle([top(0), top(i), top(i + 1)], [up; 3], material);
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
