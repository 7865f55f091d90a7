//! # Attribute Reconstruction
//!
//! Produces shading normals and material ids for result triangles from
//! their provenance.
//!
//! Corefinement introduces vertices in the *interior* of source faces, so
//! normals cannot simply be copied: each result corner gets the barycentric
//! interpolation of the source triangle's corner normals at its position
//! (projected onto the source plane), renormalized, and negated for faces
//! inherited from a reversed operand.
//!
//! World-space vertex/normal lookups and material remaps are cached per
//! operand slot for the duration of one export pass.

use std::collections::HashMap;

use config::constants::NORMAL_LENGTH_EPSILON;
use glam::DVec3;
use modeler::geometry::{barycentric_interpolation, triangle_normal};
use modeler::{MaterialId, Mesh};

use crate::error::{CsgError, Result};
use crate::provenance::{FaceProvenance, OperandRegistry, Orientation};

// =============================================================================
// RECONSTRUCTOR
// =============================================================================

/// Per-export-pass reconstruction state.
pub(crate) struct AttributeReconstructor<'a> {
    registry: &'a OperandRegistry<'a>,
    /// World-space vertex positions, filled on first access per slot.
    world_vertices: Vec<Option<Vec<DVec3>>>,
    /// World-space shading normals, filled on first access per slot.
    world_normals: Vec<Option<Vec<DVec3>>>,
    /// Source material id -> output material id, per slot.
    material_remap: Vec<HashMap<MaterialId, MaterialId>>,
}

impl<'a> AttributeReconstructor<'a> {
    /// Creates a reconstructor over the call's operand registry.
    pub fn new(registry: &'a OperandRegistry<'a>) -> Self {
        let operands = registry.len();
        Self {
            registry,
            world_vertices: vec![None; operands],
            world_normals: vec![None; operands],
            material_remap: vec![HashMap::new(); operands],
        }
    }

    /// Computes the normal indices and material id for one result triangle.
    ///
    /// `positions` are the triangle's (possibly new) corner positions in
    /// world space, in winding order.
    pub fn reconstruct(
        &mut self,
        output: &mut Mesh,
        provenance: &FaceProvenance,
        positions: [DVec3; 3],
    ) -> Result<([u32; 3], MaterialId)> {
        let source = self.registry.get(provenance.slot);
        let triangle = *source
            .triangles()
            .get(provenance.triangle as usize)
            .ok_or_else(|| {
                CsgError::invariant(format!(
                    "provenance references missing triangle {}",
                    provenance.triangle
                ))
            })?;

        let slot = provenance.slot.0 as usize;
        if self.world_vertices[slot].is_none() {
            self.world_vertices[slot] = Some(source.world_vertices().collect());
        }
        if self.world_normals[slot].is_none() {
            self.world_normals[slot] = Some(source.world_normals().collect());
        }
        let vertices = self.world_vertices[slot].as_ref().unwrap();
        let normals = self.world_normals[slot].as_ref().unwrap();
        let sv = [
            vertices[triangle.vertices[0] as usize],
            vertices[triangle.vertices[1] as usize],
            vertices[triangle.vertices[2] as usize],
        ];
        let sn = [
            normals[triangle.normals[0] as usize],
            normals[triangle.normals[1] as usize],
            normals[triangle.normals[2] as usize],
        ];

        let mut ids = [0u32; 3];
        for (corner, position) in positions.into_iter().enumerate() {
            let interpolated =
                barycentric_interpolation(sv[0], sv[1], sv[2], sn[0], sn[1], sn[2], position);
            let length = interpolated.length();
            let mut normal = if length > NORMAL_LENGTH_EPSILON {
                interpolated / length
            } else {
                triangle_normal(sv[0], sv[1], sv[2])
            };
            if provenance.orientation == Orientation::Reversed {
                normal = -normal;
            }
            ids[corner] = output.add_normal(normal);
        }

        let material = self.remap_material(output, slot, source, triangle.material);
        Ok((ids, material))
    }

    /// Copies a source material into the output table once, reusing the
    /// mapping afterwards.
    fn remap_material(
        &mut self,
        output: &mut Mesh,
        slot: usize,
        source: &Mesh,
        old: MaterialId,
    ) -> MaterialId {
        if let Some(&mapped) = self.material_remap[slot].get(&old) {
            return mapped;
        }
        let mapped = output.add_material(source.materials().get(old).clone());
        self.material_remap[slot].insert(old, mapped);
        mapped
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::OperandSlot;
    use approx::assert_relative_eq;
    use glam::DMat4;
    use modeler::Material;

    /// One triangle in the XY plane with distinct corner normals.
    fn source_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        let material = mesh.add_material(Material::new([1.0, 0.0, 0.0, 1.0]));
        let v0 = mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        let n0 = mesh.add_normal(DVec3::new(-1.0, 0.0, 1.0).normalize());
        let n1 = mesh.add_normal(DVec3::new(1.0, 0.0, 1.0).normalize());
        let n2 = mesh.add_normal(DVec3::new(0.0, 1.0, 1.0).normalize());
        mesh.add_triangle([v0, v1, v2], [n0, n1, n2], material);
        mesh
    }

    fn provenance(orientation: Orientation) -> FaceProvenance {
        FaceProvenance {
            slot: OperandSlot(0),
            triangle: 0,
            orientation,
        }
    }

    #[test]
    fn test_corner_normals_reproduce_exactly() {
        let source = source_mesh();
        let registry = OperandRegistry::new(vec![&source]);
        let mut reconstructor = AttributeReconstructor::new(&registry);
        let mut output = Mesh::new();

        let positions = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let (ids, _) = reconstructor
            .reconstruct(&mut output, &provenance(Orientation::Original), positions)
            .unwrap();

        for (corner, id) in ids.into_iter().enumerate() {
            let expected = source.normal(source.triangle(0).normals[corner]);
            let actual = output.normal(id);
            assert_relative_eq!((actual - expected).length(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interior_point_interpolates_and_normalizes() {
        let source = source_mesh();
        let registry = OperandRegistry::new(vec![&source]);
        let mut reconstructor = AttributeReconstructor::new(&registry);
        let mut output = Mesh::new();

        // The centroid mixes all three corner normals.
        let centroid = DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        let (ids, _) = reconstructor
            .reconstruct(
                &mut output,
                &provenance(Orientation::Original),
                [centroid; 3],
            )
            .unwrap();

        let normal = output.normal(ids[0]);
        assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-12);
        assert!(normal.z > 0.0);
        assert!(normal.y > 0.0);
    }

    #[test]
    fn test_reversed_orientation_negates() {
        let source = source_mesh();
        let registry = OperandRegistry::new(vec![&source]);
        let mut reconstructor = AttributeReconstructor::new(&registry);
        let mut output = Mesh::new();

        let position = DVec3::new(0.25, 0.25, 0.0);
        let (original_ids, _) = reconstructor
            .reconstruct(
                &mut output,
                &provenance(Orientation::Original),
                [position; 3],
            )
            .unwrap();
        let (reversed_ids, _) = reconstructor
            .reconstruct(
                &mut output,
                &provenance(Orientation::Reversed),
                [position; 3],
            )
            .unwrap();

        let original = output.normal(original_ids[0]);
        let reversed = output.normal(reversed_ids[0]);
        assert_relative_eq!((original + reversed).length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_materials_deduplicated_across_faces() {
        let source = source_mesh();
        let registry = OperandRegistry::new(vec![&source]);
        let mut reconstructor = AttributeReconstructor::new(&registry);
        let mut output = Mesh::new();

        let positions = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let (_, first) = reconstructor
            .reconstruct(&mut output, &provenance(Orientation::Original), positions)
            .unwrap();
        let (_, second) = reconstructor
            .reconstruct(&mut output, &provenance(Orientation::Original), positions)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(output.materials().len(), 1);
        assert_eq!(output.materials().get(first).color[0], 1.0);
    }

    #[test]
    fn test_transformed_source_uses_world_space() {
        let mut source = source_mesh();
        source.set_transformation(DMat4::from_rotation_x(std::f64::consts::FRAC_PI_2));
        let registry = OperandRegistry::new(vec![&source]);
        let mut reconstructor = AttributeReconstructor::new(&registry);
        let mut output = Mesh::new();

        // A +90° rotation about X maps +Y to +Z and +Z to -Y: the triangle
        // now lies in the XZ plane and its normals gain a -Y component.
        let position = DVec3::new(1.0 / 3.0, 0.0, 1.0 / 3.0);
        let (ids, _) = reconstructor
            .reconstruct(
                &mut output,
                &provenance(Orientation::Original),
                [position; 3],
            )
            .unwrap();
        let normal = output.normal(ids[0]);
        assert!(normal.y < 0.0);
    }
}
