//! # Shapes
//!
//! Solid shapes that generate triangle meshes.
//!
//! A shape owns its material and placement; [`Shape::generate_mesh`] emits a
//! mesh in local coordinates carrying the shape's transformation, so the
//! consumer decides when to bake world space.

use std::sync::Arc;

use glam::DMat4;

use crate::mesh::Mesh;

mod cuboid;
mod cylinder;
mod mesh_shape;
mod sphere;

pub use cuboid::BoxShape;
pub use cylinder::CylinderShape;
pub use mesh_shape::MeshShape;
pub use sphere::SphereShape;

/// Shared handle to a solid shape.
pub type ShapePtr = Arc<dyn Shape + Send + Sync>;

/// A solid shape that can generate its triangle mesh.
pub trait Shape {
    /// Placement of the shape in the world.
    fn transformation(&self) -> DMat4;

    /// Validates the shape's parameters.
    fn check(&self) -> bool;

    /// Generates the shape's triangle mesh.
    ///
    /// The mesh is closed, consistently outward-wound, and carries the
    /// shape's transformation.
    fn generate_mesh(&self) -> Mesh;

    /// Clones the shape behind a shared handle.
    fn clone_shape(&self) -> ShapePtr;
}
