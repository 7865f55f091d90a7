//! # Face Provenance
//!
//! Tracks which input triangle every kernel face descends from, across the
//! splits and copies the corefinement algorithm performs.
//!
//! ## Protocol
//!
//! The kernel drives a three-callback observer while it runs:
//!
//! 1. `before_subface_creations` — a face is about to be split; its tag is
//!    captured.
//! 2. `after_subface_created` — a fragment of that face was created; it
//!    inherits the captured tag.
//! 3. `after_face_copy` — a face (split or not) was copied into another
//!    mesh; the tag is copied with it.
//!
//! Tags are keyed by `(MeshKey, FaceId)` — stable identities, not
//! addresses — and reference source meshes through a call-scoped operand
//! registry, so nothing here can outlive the boolean call that created it.

use std::collections::HashMap;

use modeler::Mesh;

use crate::exact::mesh::FaceId;

// =============================================================================
// IDENTITIES
// =============================================================================

/// Identity of one exact mesh within a single boolean call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MeshKey {
    /// First operand.
    OperandA,
    /// Second operand.
    OperandB,
    /// The mesh the kernel assembles.
    Result,
}

/// Index into the call-scoped operand registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OperandSlot(pub u32);

/// Whether a face's shading normals should be used as-is or negated.
///
/// The subtracted operand of a difference is imported `Reversed`: its
/// geometry is untouched, but reconstruction flips the interpolated normals
/// of every face inherited from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    Original,
    Reversed,
}

/// Provenance of one kernel face: the operand triangle it descends from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FaceProvenance {
    /// Which operand contributed the face.
    pub slot: OperandSlot,
    /// Triangle index in that operand's mesh.
    pub triangle: u32,
    /// Normal orientation to apply during reconstruction.
    pub orientation: Orientation,
}

// =============================================================================
// OPERAND REGISTRY
// =============================================================================

/// Borrowed source meshes of one boolean call, addressed by slot.
///
/// Holding the meshes by reference scopes every [`FaceProvenance`] to the
/// call: the registry cannot outlive the operands it points at.
#[derive(Debug)]
pub(crate) struct OperandRegistry<'a> {
    meshes: Vec<&'a Mesh>,
}

impl<'a> OperandRegistry<'a> {
    /// Registers the call's operands in slot order.
    pub fn new(meshes: Vec<&'a Mesh>) -> Self {
        Self { meshes }
    }

    /// Mesh for a slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not belong to this registry.
    pub fn get(&self, slot: OperandSlot) -> &'a Mesh {
        self.meshes[slot.0 as usize]
    }

    /// Number of registered operands.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Events the corefinement algorithm reports while it runs.
///
/// Fragment identities only exist during execution, so provenance cannot be
/// attached after the fact; the kernel calls these hooks synchronously on
/// every code path that creates or copies a face.
pub(crate) trait CorefinementObserver {
    /// A face is about to be replaced by subfaces.
    fn before_subface_creations(&mut self, mesh: MeshKey, face: FaceId);

    /// A subface of the face announced above was created.
    fn after_subface_created(&mut self, mesh: MeshKey, face: FaceId);

    /// A face was copied from one mesh into another.
    fn after_face_copy(&mut self, source: (MeshKey, FaceId), target: (MeshKey, FaceId));
}

// =============================================================================
// PROVENANCE TRACKER
// =============================================================================

/// Observer implementation that maintains the face tag store.
#[derive(Debug, Default)]
pub(crate) struct ProvenanceTracker {
    tags: HashMap<(MeshKey, FaceId), FaceProvenance>,
    /// Tag captured by `before_subface_creations`, pending assignment.
    capture: Option<FaceProvenance>,
}

impl ProvenanceTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a face (used while importing operands).
    pub fn tag(&mut self, mesh: MeshKey, face: FaceId, provenance: FaceProvenance) {
        self.tags.insert((mesh, face), provenance);
    }

    /// Resolves a face's tag, if it has one.
    pub fn resolve(&self, mesh: MeshKey, face: FaceId) -> Option<FaceProvenance> {
        self.tags.get(&(mesh, face)).copied()
    }
}

impl CorefinementObserver for ProvenanceTracker {
    fn before_subface_creations(&mut self, mesh: MeshKey, face: FaceId) {
        self.capture = self.tags.get(&(mesh, face)).copied();
        debug_assert!(
            self.capture.is_some(),
            "splitting a face that was never tagged"
        );
    }

    fn after_subface_created(&mut self, mesh: MeshKey, face: FaceId) {
        // A missing capture leaves the subface untagged; export reports that
        // as an invariant violation instead of guessing here.
        if let Some(tag) = self.capture {
            self.tags.insert((mesh, face), tag);
        }
    }

    fn after_face_copy(&mut self, source: (MeshKey, FaceId), target: (MeshKey, FaceId)) {
        if let Some(tag) = self.tags.get(&source).copied() {
            self.tags.insert(target, tag);
        } else {
            debug_assert!(false, "copying a face that was never tagged");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(slot: u32, triangle: u32) -> FaceProvenance {
        FaceProvenance {
            slot: OperandSlot(slot),
            triangle,
            orientation: Orientation::Original,
        }
    }

    #[test]
    fn test_split_propagates_captured_tag() {
        let mut tracker = ProvenanceTracker::new();
        tracker.tag(MeshKey::OperandA, 0, tag(0, 7));

        tracker.before_subface_creations(MeshKey::OperandA, 0);
        tracker.after_subface_created(MeshKey::OperandA, 5);
        tracker.after_subface_created(MeshKey::OperandA, 6);

        assert_eq!(tracker.resolve(MeshKey::OperandA, 5), Some(tag(0, 7)));
        assert_eq!(tracker.resolve(MeshKey::OperandA, 6), Some(tag(0, 7)));
    }

    #[test]
    fn test_copy_propagates_tag_across_meshes() {
        let mut tracker = ProvenanceTracker::new();
        tracker.tag(MeshKey::OperandB, 3, tag(1, 11));

        tracker.after_face_copy((MeshKey::OperandB, 3), (MeshKey::Result, 0));
        assert_eq!(tracker.resolve(MeshKey::Result, 0), Some(tag(1, 11)));
    }

    #[test]
    fn test_multi_level_split_keeps_provenance() {
        // Split a face, then split one of its fragments again: both levels
        // must resolve to the original triangle.
        let mut tracker = ProvenanceTracker::new();
        tracker.tag(MeshKey::OperandA, 0, tag(0, 2));

        tracker.before_subface_creations(MeshKey::OperandA, 0);
        tracker.after_subface_created(MeshKey::OperandA, 1);
        tracker.after_subface_created(MeshKey::OperandA, 2);

        tracker.before_subface_creations(MeshKey::OperandA, 2);
        tracker.after_subface_created(MeshKey::OperandA, 3);
        tracker.after_subface_created(MeshKey::OperandA, 4);

        assert_eq!(tracker.resolve(MeshKey::OperandA, 4), Some(tag(0, 2)));
    }

    #[test]
    fn test_unknown_face_resolves_to_none() {
        let tracker = ProvenanceTracker::new();
        assert_eq!(tracker.resolve(MeshKey::Result, 42), None);
    }
}
