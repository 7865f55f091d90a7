//! # Modeler CSG
//!
//! Provenance-preserving boolean operations on closed triangle meshes.
//!
//! ## Architecture
//!
//! ```text
//! Mesh operands (modeler)
//!       ↓ adapter: world-space promotion + provenance tagging
//! ExactMesh (rational coordinates)
//!       ↓ kernel: corefine → classify → select, observer hooks firing
//! ExactMesh result (every face tagged with its source triangle)
//!       ↓ adapter: rounding + attribute reconstruction
//! Mesh result (interpolated normals, deduplicated materials)
//! ```
//!
//! The kernel computes in exact rational arithmetic; per-face provenance
//! survives every split and copy the algorithm performs, so each output
//! triangle knows the input triangle it descends from. Reconstruction uses
//! that record to interpolate shading normals barycentrically and to remap
//! material ids into the result's own table.
//!
//! All failures surface as [`CsgError`] values — operational failures for
//! inputs the kernel cannot resolve, and a distinct invariant-violation
//! variant when the engine itself misbehaves. Nothing panics across this
//! boundary.
//!
//! ## Example
//!
//! ```rust
//! use glam::DMat4;
//! use modeler::{BoxShape, Material, Shape};
//! use modeler_csg::mesh_union;
//!
//! let a = BoxShape::new(Material::default(), DMat4::IDENTITY, 1.0, 1.0, 1.0);
//! let b = BoxShape::new(
//!     Material::default(),
//!     DMat4::from_translation(glam::DVec3::new(0.5, 0.0, 0.0)),
//!     1.0,
//!     1.0,
//!     1.0,
//! );
//! let result = mesh_union(&a.generate_mesh(), &b.generate_mesh()).unwrap();
//! assert!(!result.is_empty());
//! ```

mod adapter;
pub mod error;
mod exact;
mod guard;
mod kernel;
pub mod ops;
mod provenance;
mod reconstruct;

#[cfg(test)]
mod tests;

pub use error::{CsgError, Result};
pub use kernel::BooleanOperation;
pub use ops::{
    mesh_difference, mesh_intersection, mesh_union, mesh_union_all, shape_difference,
    shape_intersection, shape_union, shape_union_all,
};
