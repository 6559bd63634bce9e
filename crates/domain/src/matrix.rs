//! Permission matrix: the in-memory projection of role/permission grants.
//!
//! The matrix is derived state. It is rebuilt from a flat list of
//! [`RolePermissionEntry`] values and flattened back into one before
//! persistence; the stored entry list stays the source of truth. A missing
//! key is equivalent to `granted = false` everywhere, including the change
//! diff.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::access::{PermissionId, RoleId, RolePermissionEntry};

/// Mapping from role to permission to granted flag.
///
/// Values are treated as persistent data: mutating operations return a new
/// matrix and leave the receiver untouched, so an "original" snapshot and a
/// working copy can never alias each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    cells: BTreeMap<RoleId, BTreeMap<PermissionId, bool>>,
}

impl PermissionMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a flat entry list into a matrix.
    ///
    /// Later entries overwrite earlier ones for the same (role, permission)
    /// pair. Roles without entries are absent, never present as empty maps.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = RolePermissionEntry>) -> Self {
        let mut cells: BTreeMap<RoleId, BTreeMap<PermissionId, bool>> = BTreeMap::new();

        for entry in entries {
            cells
                .entry(entry.role_id)
                .or_default()
                .insert(entry.permission_id, entry.granted);
        }

        Self { cells }
    }

    /// Returns whether the role holds the permission. Absent keys read as
    /// not granted.
    #[must_use]
    pub fn is_granted(&self, role_id: RoleId, permission_id: PermissionId) -> bool {
        self.cells
            .get(&role_id)
            .and_then(|row| row.get(&permission_id))
            .copied()
            .unwrap_or(false)
    }

    /// Returns a new matrix with one cell set, leaving the receiver
    /// unchanged.
    #[must_use]
    pub fn with_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        granted: bool,
    ) -> Self {
        let mut next = self.clone();
        next.cells
            .entry(role_id)
            .or_default()
            .insert(permission_id, granted);
        next
    }

    /// Returns a new matrix in which the destination role's entire entry
    /// set is replaced by the source role's.
    ///
    /// This is a full overwrite, not a union: anything the destination held
    /// that the source lacks is gone afterwards. A source role without
    /// entries leaves the destination without entries.
    #[must_use]
    pub fn with_role_replaced(&self, source: RoleId, destination: RoleId) -> Self {
        let mut next = self.clone();
        match next.cells.get(&source).cloned() {
            Some(row) => {
                next.cells.insert(destination, row);
            }
            None => {
                next.cells.remove(&destination);
            }
        }
        next
    }

    /// Projects one role's entries back into the flat list shape used by
    /// save requests. Order is unspecified; an unknown role yields an empty
    /// list rather than an error.
    #[must_use]
    pub fn role_entries(&self, role_id: RoleId) -> Vec<RolePermissionEntry> {
        self.cells
            .get(&role_id)
            .map(|row| {
                row.iter()
                    .map(|(permission_id, granted)| RolePermissionEntry {
                        role_id,
                        permission_id: *permission_id,
                        granted: *granted,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns whether the role's grants differ between the two matrices.
    ///
    /// Compares the union of permission ids appearing under the role in
    /// either matrix, treating a missing key as `false`.
    #[must_use]
    pub fn differs_for_role(&self, other: &Self, role_id: RoleId) -> bool {
        let empty = BTreeMap::new();
        let left = self.cells.get(&role_id).unwrap_or(&empty);
        let right = other.cells.get(&role_id).unwrap_or(&empty);

        left.keys()
            .chain(right.keys())
            .any(|permission_id| {
                left.get(permission_id).copied().unwrap_or(false)
                    != right.get(permission_id).copied().unwrap_or(false)
            })
    }

    /// Returns the roles that have at least one entry.
    pub fn roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.cells.keys().copied()
    }

    /// Returns whether the matrix has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An editing session over a matrix: the saved snapshot plus a working
/// copy.
///
/// Edits touch only the working copy. A successful save swaps the snapshot
/// to the working copy; a failed save leaves both untouched, so in-progress
/// edits survive and the user can retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixDraft {
    original: PermissionMatrix,
    working: PermissionMatrix,
}

impl MatrixDraft {
    /// Opens a draft over a freshly loaded snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: PermissionMatrix) -> Self {
        Self {
            original: snapshot.clone(),
            working: snapshot,
        }
    }

    /// Returns the saved snapshot.
    #[must_use]
    pub fn original(&self) -> &PermissionMatrix {
        &self.original
    }

    /// Returns the working copy.
    #[must_use]
    pub fn working(&self) -> &PermissionMatrix {
        &self.working
    }

    /// Sets one cell in the working copy.
    pub fn update(&mut self, role_id: RoleId, permission_id: PermissionId, granted: bool) {
        self.working = self.working.with_permission(role_id, permission_id, granted);
    }

    /// Replaces the destination role's working entries with the source
    /// role's (see [`PermissionMatrix::with_role_replaced`]).
    pub fn replace_role(&mut self, source: RoleId, destination: RoleId) {
        self.working = self.working.with_role_replaced(source, destination);
    }

    /// Returns whether the role has unsaved changes.
    #[must_use]
    pub fn has_changes(&self, role_id: RoleId) -> bool {
        self.original.differs_for_role(&self.working, role_id)
    }

    /// Projects the role's working entries for a save request.
    #[must_use]
    pub fn extract(&self, role_id: RoleId) -> Vec<RolePermissionEntry> {
        self.working.role_entries(role_id)
    }

    /// Discards unsaved edits, restoring the working copy from the
    /// snapshot.
    pub fn reset(&mut self) {
        self.working = self.original.clone();
    }

    /// Promotes the working copy to the new snapshot after a successful
    /// save.
    pub fn mark_saved(&mut self) {
        self.original = self.working.clone();
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use uuid::Uuid;

    use super::{MatrixDraft, PermissionMatrix};
    use crate::access::{PermissionId, RoleId, RolePermissionEntry};

    fn role(n: u128) -> RoleId {
        RoleId::from_uuid(Uuid::from_u128(n))
    }

    fn permission(n: u128) -> PermissionId {
        PermissionId::from_uuid(Uuid::from_u128(n))
    }

    fn entry(role_id: RoleId, permission_id: PermissionId, granted: bool) -> RolePermissionEntry {
        RolePermissionEntry {
            role_id,
            permission_id,
            granted,
        }
    }

    /// Seed from the reference scenario: a read-only admin role with both
    /// grants and an editor holding view only.
    fn seed_matrix() -> (PermissionMatrix, RoleId, RoleId, PermissionId, PermissionId) {
        let admin = role(1);
        let editor = role(2);
        let view = permission(10);
        let edit = permission(11);

        let matrix = PermissionMatrix::from_entries([
            entry(admin, view, true),
            entry(admin, edit, true),
            entry(editor, view, true),
            entry(editor, edit, false),
        ]);

        (matrix, admin, editor, view, edit)
    }

    #[test]
    fn empty_input_yields_empty_matrix() {
        let matrix = PermissionMatrix::from_entries([]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.roles().count(), 0);
    }

    #[test]
    fn builder_applies_last_write_wins() {
        let (role_id, permission_id) = (role(1), permission(10));
        let matrix = PermissionMatrix::from_entries([
            entry(role_id, permission_id, true),
            entry(role_id, permission_id, false),
            entry(role_id, permission_id, true),
        ]);

        assert!(matrix.is_granted(role_id, permission_id));
        assert_eq!(matrix.role_entries(role_id).len(), 1);
    }

    #[test]
    fn absent_role_and_absent_permission_read_as_not_granted() {
        let (matrix, _, editor, view, _) = seed_matrix();

        assert!(!matrix.is_granted(role(99), view));
        assert!(!matrix.is_granted(editor, permission(99)));
    }

    #[test]
    fn extract_unknown_role_yields_empty_list() {
        let (matrix, ..) = seed_matrix();
        assert!(matrix.role_entries(role(99)).is_empty());
    }

    #[test]
    fn update_does_not_mutate_receiver() {
        let (matrix, _, editor, _, edit) = seed_matrix();
        let before = matrix.clone();

        let updated = matrix.with_permission(editor, edit, true);

        assert_eq!(matrix, before);
        assert!(updated.is_granted(editor, edit));
        assert!(!matrix.is_granted(editor, edit));
    }

    #[test]
    fn diff_is_reflexive() {
        let (matrix, admin, editor, ..) = seed_matrix();

        assert!(!matrix.differs_for_role(&matrix, admin));
        assert!(!matrix.differs_for_role(&matrix, editor));
        assert!(!matrix.differs_for_role(&matrix, role(99)));
    }

    #[test]
    fn diff_treats_missing_and_explicit_false_as_equal() {
        let (role_id, permission_id) = (role(1), permission(10));
        let explicit = PermissionMatrix::from_entries([entry(role_id, permission_id, false)]);
        let absent = PermissionMatrix::new();

        assert!(!explicit.differs_for_role(&absent, role_id));
        assert!(!absent.differs_for_role(&explicit, role_id));
    }

    #[test]
    fn update_to_new_value_is_a_change() {
        let (matrix, _, editor, _, edit) = seed_matrix();
        let updated = matrix.with_permission(editor, edit, true);

        assert!(matrix.differs_for_role(&updated, editor));
    }

    #[test]
    fn replace_role_is_overwrite_not_union() {
        let source = role(1);
        let destination = role(2);
        let kept = permission(10);
        let revoked = permission(11);

        let matrix = PermissionMatrix::from_entries([
            entry(source, kept, true),
            entry(destination, revoked, true),
        ]);

        let copied = matrix.with_role_replaced(source, destination);

        assert!(copied.is_granted(destination, kept));
        assert!(!copied.is_granted(destination, revoked));
        assert_eq!(
            copied.role_entries(destination).len(),
            copied.role_entries(source).len()
        );
    }

    #[test]
    fn replace_from_empty_source_clears_destination() {
        let destination = role(2);
        let matrix = PermissionMatrix::from_entries([entry(destination, permission(10), true)]);

        let cleared = matrix.with_role_replaced(role(1), destination);

        assert!(cleared.role_entries(destination).is_empty());
    }

    #[test]
    fn reference_scenario_edit_then_extract() {
        let (matrix, admin, editor, view, edit) = seed_matrix();
        let mut draft = MatrixDraft::from_snapshot(matrix);

        assert!(!draft.has_changes(editor));

        draft.update(editor, edit, true);

        assert!(draft.has_changes(editor));
        assert!(!draft.has_changes(admin));

        let mut extracted = draft.extract(editor);
        extracted.sort_by_key(|entry| entry.permission_id);
        assert_eq!(
            extracted,
            vec![entry(editor, view, true), entry(editor, edit, true)]
        );
    }

    #[test]
    fn draft_reset_restores_snapshot() {
        let (matrix, _, editor, _, edit) = seed_matrix();
        let mut draft = MatrixDraft::from_snapshot(matrix.clone());

        draft.update(editor, edit, true);
        draft.reset();

        assert!(!draft.has_changes(editor));
        assert_eq!(draft.working(), &matrix);
    }

    #[test]
    fn draft_mark_saved_swaps_snapshot() {
        let (matrix, _, editor, _, edit) = seed_matrix();
        let mut draft = MatrixDraft::from_snapshot(matrix);

        draft.update(editor, edit, true);
        draft.mark_saved();

        assert!(!draft.has_changes(editor));
        assert!(draft.original().is_granted(editor, edit));
    }

    prop_compose! {
        fn arb_entry()(role_index in 0u128..4, permission_index in 0u128..6, granted in any::<bool>())
            -> RolePermissionEntry
        {
            entry(role(role_index), permission(100 + permission_index), granted)
        }
    }

    proptest! {
        /// Extraction returns exactly the last-seen granted value for every
        /// (role, permission) pair in the input.
        #[test]
        fn extract_reports_last_write(entries in prop::collection::vec(arb_entry(), 0..64)) {
            let matrix = PermissionMatrix::from_entries(entries.clone());

            for role_index in 0u128..4 {
                let role_id = role(role_index);
                for extracted in matrix.role_entries(role_id) {
                    let last = entries
                        .iter()
                        .rev()
                        .find(|candidate| {
                            candidate.role_id == role_id
                                && candidate.permission_id == extracted.permission_id
                        })
                        .map(|candidate| candidate.granted);
                    prop_assert_eq!(last, Some(extracted.granted));
                }
            }
        }

        /// Every pair present in the input shows up in the extraction.
        #[test]
        fn extract_covers_all_input_pairs(entries in prop::collection::vec(arb_entry(), 0..64)) {
            let matrix = PermissionMatrix::from_entries(entries.clone());

            for source in &entries {
                let present = matrix
                    .role_entries(source.role_id)
                    .iter()
                    .any(|extracted| extracted.permission_id == source.permission_id);
                prop_assert!(present);
            }
        }

        /// A matrix never differs from itself for any role.
        #[test]
        fn diff_reflexivity(entries in prop::collection::vec(arb_entry(), 0..64)) {
            let matrix = PermissionMatrix::from_entries(entries);

            for role_index in 0u128..5 {
                prop_assert!(!matrix.differs_for_role(&matrix, role(role_index)));
            }
        }

        /// Setting a cell to a value it does not already hold always
        /// registers as a change, and never mutates the receiver.
        #[test]
        fn update_then_diff(
            entries in prop::collection::vec(arb_entry(), 0..64),
            role_index in 0u128..4,
            permission_index in 0u128..6,
            granted in any::<bool>(),
        ) {
            let matrix = PermissionMatrix::from_entries(entries);
            let before = matrix.clone();
            let role_id = role(role_index);
            let permission_id = permission(100 + permission_index);

            let updated = matrix.with_permission(role_id, permission_id, granted);

            prop_assert_eq!(&matrix, &before);
            let changed = matrix.is_granted(role_id, permission_id) != granted;
            prop_assert_eq!(matrix.differs_for_role(&updated, role_id), changed);
        }

        /// After a copy, the destination extraction equals the source
        /// extraction cell for cell.
        #[test]
        fn copy_makes_destination_equal_source(
            entries in prop::collection::vec(arb_entry(), 0..64),
            source_index in 0u128..4,
            destination_index in 0u128..4,
        ) {
            let matrix = PermissionMatrix::from_entries(entries);
            let source = role(source_index);
            let destination = role(destination_index);

            let copied = matrix.with_role_replaced(source, destination);

            let source_cells: Vec<_> = copied
                .role_entries(source)
                .into_iter()
                .map(|entry| (entry.permission_id, entry.granted))
                .collect();
            let destination_cells: Vec<_> = copied
                .role_entries(destination)
                .into_iter()
                .map(|entry| (entry.permission_id, entry.granted))
                .collect();
            prop_assert_eq!(source_cells, destination_cells);
        }
    }
}
