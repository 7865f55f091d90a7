//! # Modeler
//!
//! Mesh data model and procedural shapes for the modeler pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Shape (box, cylinder, sphere, mesh)
//!       ↓ generate_mesh()
//! Mesh (vertices, per-corner normals, triangles, materials, transformation)
//!       ↓
//! modeler-csg boolean engine / renderer
//! ```
//!
//! All geometry uses `f64` (`glam::DVec3` / `glam::DMat4`). A mesh owns its
//! rigid transformation; consumers that need world-space data enumerate it
//! through [`Mesh::world_vertices`] and [`Mesh::world_normals`].

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod shapes;

pub use material::{Material, MaterialId, MaterialStore};
pub use mesh::{Mesh, Triangle};
pub use shapes::{BoxShape, CylinderShape, MeshShape, Shape, ShapePtr, SphereShape};
