//! Physique resolution for validated atom selections.
//!
//! # Responsibility
//! - Index canonical composites by their sorted constituent tuple.
//! - Turn selected atom ids into the persisted physique fields.
//!
//! # Invariants
//! - Lookup keys are unique; duplicates are rejected when the index is built.
//! - `resolve` is pure: the same selection and lookup always yield the same
//!   resolution.
//! - An empty lookup degrades to the mixed fallback path.

use crate::model::annotation::PhysiqueResolution;
use crate::model::physique::{PhysiqueComposite, PhysiqueId, PhysiqueKind};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeLookupError {
    /// Two composites share the same constituent tuple.
    DuplicateKey {
        key: Vec<PhysiqueId>,
        existing: PhysiqueId,
        duplicate: PhysiqueId,
    },
}

impl Display for CompositeLookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey {
                key,
                existing,
                duplicate,
            } => write!(
                f,
                "composites {existing} and {duplicate} share constituent tuple {key:?}"
            ),
        }
    }
}

impl Error for CompositeLookupError {}

/// Read-only map from sorted atom tuple to canonical composite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeLookup {
    by_key: BTreeMap<Vec<PhysiqueId>, PhysiqueComposite>,
}

impl CompositeLookup {
    /// Builds the index from reference rows. `Single` rows are skipped since
    /// one-atom selections never consult the lookup.
    pub fn build(
        rows: impl IntoIterator<Item = PhysiqueComposite>,
    ) -> Result<Self, CompositeLookupError> {
        let mut by_key: BTreeMap<Vec<PhysiqueId>, PhysiqueComposite> = BTreeMap::new();
        for row in rows {
            if row.kind != PhysiqueKind::Mixed {
                continue;
            }
            let key = sorted_key(row.atom_ids.iter().copied());
            if let Some(existing) = by_key.get(&key) {
                return Err(CompositeLookupError::DuplicateKey {
                    key,
                    existing: existing.id,
                    duplicate: row.id,
                });
            }
            by_key.insert(key, row);
        }
        Ok(Self { by_key })
    }

    pub fn get(&self, key: &[PhysiqueId]) -> Option<&PhysiqueComposite> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Computes the persisted physique fields for a selection.
///
/// Input is expected to be validated (one to six atoms). The function is total
/// anyway: an empty selection resolves to a mixed record with empty lists.
pub fn resolve(
    selected_atom_ids: impl IntoIterator<Item = PhysiqueId>,
    lookup: &CompositeLookup,
) -> PhysiqueResolution {
    let key = sorted_key(selected_atom_ids);

    if key.len() == 1 {
        return PhysiqueResolution {
            physique_type: PhysiqueKind::Single,
            physique_ids: vec![key[0]],
            single_physique_ids: key,
        };
    }

    let physique_ids = match lookup.get(&key) {
        Some(composite) => vec![composite.id],
        // No canonical name for this mixture: the atom tuple is the identifier.
        None => key.clone(),
    };

    PhysiqueResolution {
        physique_type: PhysiqueKind::Mixed,
        single_physique_ids: key,
        physique_ids,
    }
}

fn sorted_key(ids: impl IntoIterator<Item = PhysiqueId>) -> Vec<PhysiqueId> {
    let mut key = ids.into_iter().collect::<Vec<_>>();
    key.sort_unstable();
    key.dedup();
    key
}

#[cfg(test)]
mod tests {
    use super::{resolve, CompositeLookup, CompositeLookupError};
    use crate::model::physique::{PhysiqueComposite, PhysiqueKind};

    fn lookup() -> CompositeLookup {
        CompositeLookup::build([
            PhysiqueComposite::single(2, "qi-stagnation"),
            PhysiqueComposite::single(4, "blood-stasis"),
            PhysiqueComposite::mixed(17, "qi-stagnation with blood-stasis", [4, 2]),
            PhysiqueComposite::mixed(20, "qi-yang deficiency with phlegm", [3, 5, 7]),
        ])
        .unwrap()
    }

    #[test]
    fn single_atom_resolves_to_itself_regardless_of_table() {
        for table in [lookup(), CompositeLookup::default()] {
            let resolution = resolve([3], &table);
            assert_eq!(resolution.physique_type, PhysiqueKind::Single);
            assert_eq!(resolution.physique_ids, vec![3]);
            assert_eq!(resolution.single_physique_ids, vec![3]);
        }
    }

    #[test]
    fn matching_tuple_resolves_to_composite_id() {
        let resolution = resolve([4, 2], &lookup());
        assert_eq!(resolution.physique_type, PhysiqueKind::Mixed);
        assert_eq!(resolution.physique_ids, vec![17]);
        assert_eq!(resolution.single_physique_ids, vec![2, 4]);
        assert!(!resolution.is_uncatalogued_mix());
    }

    #[test]
    fn unmatched_tuple_falls_back_to_sorted_atoms() {
        let resolution = resolve([8, 2], &lookup());
        assert_eq!(resolution.physique_type, PhysiqueKind::Mixed);
        assert_eq!(resolution.physique_ids, vec![2, 8]);
        assert_eq!(resolution.single_physique_ids, vec![2, 8]);
        assert!(resolution.is_uncatalogued_mix());
    }

    #[test]
    fn subset_of_composite_does_not_match() {
        let resolution = resolve([3, 5], &lookup());
        assert_eq!(resolution.physique_ids, vec![3, 5]);
    }

    #[test]
    fn empty_table_takes_fallback_path() {
        let resolution = resolve([7, 3, 5], &CompositeLookup::default());
        assert_eq!(resolution.physique_type, PhysiqueKind::Mixed);
        assert_eq!(resolution.physique_ids, vec![3, 5, 7]);
    }

    #[test]
    fn resolution_is_idempotent() {
        let table = lookup();
        assert_eq!(resolve([2, 4], &table), resolve([2, 4], &table));
        assert_eq!(resolve([2, 8], &table), resolve([8, 2], &table));
    }

    #[test]
    fn build_rejects_duplicate_constituent_tuples() {
        let err = CompositeLookup::build([
            PhysiqueComposite::mixed(17, "first", [2, 4]),
            PhysiqueComposite::mixed(30, "second", [4, 2]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CompositeLookupError::DuplicateKey {
                key: vec![2, 4],
                existing: 17,
                duplicate: 30,
            }
        );
    }

    #[test]
    fn build_skips_single_rows() {
        assert_eq!(lookup().len(), 2);
    }
}
