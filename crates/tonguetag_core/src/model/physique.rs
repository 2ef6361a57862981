//! Physique (constitution type) reference model.
//!
//! # Responsibility
//! - Define atomic constitution types and their canonical named mixtures.
//! - Provide the single/mixed discriminator stored on tagging records.
//!
//! # Invariants
//! - `PhysiqueComposite::atom_ids` is sorted ascending and deduplicated.
//! - A `Single` row lists exactly its own id as its only atom.
//! - A `Mixed` row lists at least two atoms.

use serde::{Deserialize, Serialize};

/// Stable identifier shared by atom and composite rows of the `physiques` table.
pub type PhysiqueId = i64;

/// Whether a physique row (or a resolved selection) is one atom or a mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysiqueKind {
    Single,
    Mixed,
}

impl PhysiqueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "single" => Some(Self::Single),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// One indivisible constitution type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysiqueAtom {
    pub id: PhysiqueId,
    pub label: String,
}

/// One row of the physique reference table.
///
/// Atoms are stored as `Single` rows whose atom list is their own id, so one
/// id space covers both atoms and canonical mixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysiqueComposite {
    pub id: PhysiqueId,
    pub label: String,
    pub kind: PhysiqueKind,
    /// Constituent atom ids, sorted ascending.
    pub atom_ids: Vec<PhysiqueId>,
}

impl PhysiqueComposite {
    /// Builds a `Single` row for one atom.
    pub fn single(id: PhysiqueId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            kind: PhysiqueKind::Single,
            atom_ids: vec![id],
        }
    }

    /// Builds a `Mixed` row; constituent ids are sorted and deduplicated.
    pub fn mixed(
        id: PhysiqueId,
        label: impl Into<String>,
        atom_ids: impl IntoIterator<Item = PhysiqueId>,
    ) -> Self {
        let mut atom_ids = atom_ids.into_iter().collect::<Vec<_>>();
        atom_ids.sort_unstable();
        atom_ids.dedup();
        Self {
            id,
            label: label.into(),
            kind: PhysiqueKind::Mixed,
            atom_ids,
        }
    }

    /// Returns the atom view of a `Single` row.
    pub fn as_atom(&self) -> Option<PhysiqueAtom> {
        match self.kind {
            PhysiqueKind::Single => Some(PhysiqueAtom {
                id: self.id,
                label: self.label.clone(),
            }),
            PhysiqueKind::Mixed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PhysiqueComposite, PhysiqueKind};

    #[test]
    fn mixed_sorts_and_dedups_constituents() {
        let composite = PhysiqueComposite::mixed(20, "qi-yang deficiency with phlegm", [7, 3, 5, 3]);
        assert_eq!(composite.atom_ids, vec![3, 5, 7]);
        assert_eq!(composite.kind, PhysiqueKind::Mixed);
        assert!(composite.as_atom().is_none());
    }

    #[test]
    fn single_row_lists_itself() {
        let single = PhysiqueComposite::single(3, "qi-deficiency");
        assert_eq!(single.atom_ids, vec![3]);
        assert_eq!(single.as_atom().map(|atom| atom.id), Some(3));
    }

    #[test]
    fn kind_parses_storage_values() {
        assert_eq!(PhysiqueKind::parse("single"), Some(PhysiqueKind::Single));
        assert_eq!(PhysiqueKind::parse("mixed"), Some(PhysiqueKind::Mixed));
        assert_eq!(PhysiqueKind::parse("MIXED"), None);
    }
}
