//! Axis-aligned box shape.

use glam::{DMat4, DVec3};

use crate::material::Material;
use crate::mesh::Mesh;
use crate::shapes::{Shape, ShapePtr};

/// Axis-aligned box spanning `[0, x] × [0, y] × [0, z]` in local coordinates.
#[derive(Debug, Clone)]
pub struct BoxShape {
    material: Material,
    transformation: DMat4,
    x_size: f64,
    y_size: f64,
    z_size: f64,
}

impl BoxShape {
    /// Creates a box with the given edge lengths.
    pub fn new(
        material: Material,
        transformation: DMat4,
        x_size: f64,
        y_size: f64,
        z_size: f64,
    ) -> Self {
        Self {
            material,
            transformation,
            x_size,
            y_size,
            z_size,
        }
    }
}

impl Shape for BoxShape {
    fn transformation(&self) -> DMat4 {
        self.transformation
    }

    fn check(&self) -> bool {
        self.x_size > 0.0 && self.y_size > 0.0 && self.z_size > 0.0
    }

    fn generate_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_transformation(self.transformation);
        let material = mesh.add_material(self.material.clone());

        let (x, y, z) = (self.x_size, self.y_size, self.z_size);
        let corners = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(x, 0.0, 0.0),
            DVec3::new(x, y, 0.0),
            DVec3::new(0.0, y, 0.0),
            DVec3::new(0.0, 0.0, z),
            DVec3::new(x, 0.0, z),
            DVec3::new(x, y, z),
            DVec3::new(0.0, y, z),
        ];
        for corner in corners {
            mesh.add_vertex(corner);
        }

        let bottom = mesh.add_normal(DVec3::new(0.0, 0.0, -1.0));
        let top = mesh.add_normal(DVec3::new(0.0, 0.0, 1.0));
        let front = mesh.add_normal(DVec3::new(0.0, -1.0, 0.0));
        let back = mesh.add_normal(DVec3::new(0.0, 1.0, 0.0));
        let left = mesh.add_normal(DVec3::new(-1.0, 0.0, 0.0));
        let right = mesh.add_normal(DVec3::new(1.0, 0.0, 0.0));

        // Two triangles per face, outward winding.
        let faces = [
            ([0, 3, 2], bottom),
            ([0, 2, 1], bottom),
            ([4, 5, 6], top),
            ([4, 6, 7], top),
            ([0, 1, 5], front),
            ([0, 5, 4], front),
            ([3, 7, 6], back),
            ([3, 6, 2], back),
            ([0, 4, 7], left),
            ([0, 7, 3], left),
            ([1, 2, 6], right),
            ([1, 6, 5], right),
        ];
        for (vertices, normal) in faces {
            mesh.add_triangle(vertices, [normal; 3], material);
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
