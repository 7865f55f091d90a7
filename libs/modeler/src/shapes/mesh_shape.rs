//! Shape wrapping a prebuilt mesh.

use glam::DMat4;

use crate::mesh::Mesh;
use crate::shapes::{Shape, ShapePtr};

/// A shape whose geometry is an existing mesh rather than a formula.
///
/// Boolean results are wrapped in this shape (under the identity
/// transformation) so they can feed into further operations.
#[derive(Debug, Clone)]
pub struct MeshShape {
    transformation: DMat4,
    mesh: Mesh,
}

impl MeshShape {
    /// Creates a mesh shape.
    pub fn new(transformation: DMat4, mesh: Mesh) -> Self {
        Self {
            transformation,
            mesh,
        }
    }

    /// The wrapped mesh, untransformed.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

impl Shape for MeshShape {
    fn transformation(&self) -> DMat4 {
        self.transformation
    }

    fn check(&self) -> bool {
        !self.mesh.is_empty()
    }

    fn generate_mesh(&self) -> Mesh {
        let mut mesh = self.mesh.clone();
        // Compose the shape's placement on top of whatever placement the
        // stored mesh already carries.
        mesh.set_transformation(self.transformation * self.mesh.transformation());
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
    use crate::material::Material;
    use crate::shapes::BoxShape;
    use glam::DVec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_shape_roundtrip() {
        let cube = BoxShape::new(Material::default(), DMat4::IDENTITY, 1.0, 1.0, 1.0);
        let shape = MeshShape::new(DMat4::IDENTITY, cube.generate_mesh());
        assert!(shape.check());
        assert_eq!(shape.generate_mesh().triangle_count(), 12);
    }

    #[test]
    fn test_mesh_shape_composes_transformations() {
        let offset = DMat4::from_translation(DVec3::new(1.0, 0.0, 0.0));
        let cube = BoxShape::new(Material::default(), offset, 1.0, 1.0, 1.0);
        let shape = MeshShape::new(offset, cube.generate_mesh());

        // Both placements apply: local origin ends up at x = 2.
        let world: Vec<DVec3> = shape.generate_mesh().world_vertices().collect();
        assert_relative_eq!(world[0].x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mesh_shape_fails_check() {
        let shape = MeshShape::new(DMat4::IDENTITY, Mesh::new());
        assert!(!shape.check());
    }
}
