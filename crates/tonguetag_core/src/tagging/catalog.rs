//! Read-only reference catalog for one tagging deployment.
//!
//! # Responsibility
//! - Hold tongue features, physique rows and the composite lookup together.
//! - Check that a selection only names known ids in the right category.
//!
//! # Invariants
//! - Built once from reference rows; never mutated afterwards.
//! - `Single` rows list exactly their own id.
//! - `Mixed` rows list two or more known atoms.

use crate::model::annotation::TagSelection;
use crate::model::feature::{FeatureCategory, FeatureId, TongueFeature};
use crate::model::physique::{PhysiqueAtom, PhysiqueComposite, PhysiqueId, PhysiqueKind};
use crate::tagging::resolver::{CompositeLookup, CompositeLookupError};
use crate::tagging::validator::TagViolation;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integrity failures found while assembling the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateFeatureId(FeatureId),
    DuplicatePhysiqueId(PhysiqueId),
    /// A `Single` row whose atom list is not `[id]`.
    MalformedSingle(PhysiqueId),
    /// A `Mixed` row with fewer than two atoms.
    TooFewConstituents(PhysiqueId),
    /// A `Mixed` row naming an id that is not a `Single` row.
    UnknownConstituent {
        composite: PhysiqueId,
        atom: PhysiqueId,
    },
    Lookup(CompositeLookupError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateFeatureId(id) => write!(f, "duplicate tongue feature id {id}"),
            Self::DuplicatePhysiqueId(id) => write!(f, "duplicate physique id {id}"),
            Self::MalformedSingle(id) => {
                write!(f, "single physique {id} must list exactly its own id")
            }
            Self::TooFewConstituents(id) => {
                write!(f, "mixed physique {id} must list at least two atoms")
            }
            Self::UnknownConstituent { composite, atom } => {
                write!(f, "mixed physique {composite} lists unknown atom {atom}")
            }
            Self::Lookup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lookup(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompositeLookupError> for CatalogError {
    fn from(value: CompositeLookupError) -> Self {
        Self::Lookup(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    features: BTreeMap<FeatureId, TongueFeature>,
    physiques: BTreeMap<PhysiqueId, PhysiqueComposite>,
    lookup: CompositeLookup,
}

impl ReferenceCatalog {
    pub fn build(
        features: Vec<TongueFeature>,
        physiques: Vec<PhysiqueComposite>,
    ) -> Result<Self, CatalogError> {
        let mut feature_map = BTreeMap::new();
        for feature in features {
            let id = feature.id;
            if feature_map.insert(id, feature).is_some() {
                return Err(CatalogError::DuplicateFeatureId(id));
            }
        }

        let mut physique_map = BTreeMap::new();
        for physique in physiques {
            let id = physique.id;
            if physique_map.insert(id, physique).is_some() {
                return Err(CatalogError::DuplicatePhysiqueId(id));
            }
        }

        for row in physique_map.values() {
            match row.kind {
                PhysiqueKind::Single => {
                    if row.atom_ids != [row.id] {
                        return Err(CatalogError::MalformedSingle(row.id));
                    }
                }
                PhysiqueKind::Mixed => {
                    if row.atom_ids.len() < 2 {
                        return Err(CatalogError::TooFewConstituents(row.id));
                    }
                    for atom in &row.atom_ids {
                        let is_atom = physique_map
                            .get(atom)
                            .is_some_and(|candidate| candidate.kind == PhysiqueKind::Single);
                        if !is_atom {
                            return Err(CatalogError::UnknownConstituent {
                                composite: row.id,
                                atom: *atom,
                            });
                        }
                    }
                }
            }
        }

        let lookup = CompositeLookup::build(physique_map.values().cloned())?;
        Ok(Self {
            features: feature_map,
            physiques: physique_map,
            lookup,
        })
    }

    pub fn lookup(&self) -> &CompositeLookup {
        &self.lookup
    }

    pub fn feature(&self, id: FeatureId) -> Option<&TongueFeature> {
        self.features.get(&id)
    }

    /// Features of one category in ascending id order.
    pub fn features_in(&self, category: FeatureCategory) -> Vec<&TongueFeature> {
        self.features
            .values()
            .filter(|feature| feature.category == category)
            .collect()
    }

    pub fn physique(&self, id: PhysiqueId) -> Option<&PhysiqueComposite> {
        self.physiques.get(&id)
    }

    /// Selectable atoms in ascending id order.
    pub fn atoms(&self) -> Vec<PhysiqueAtom> {
        self.physiques
            .values()
            .filter_map(PhysiqueComposite::as_atom)
            .collect()
    }

    /// Canonical mixtures in ascending id order.
    pub fn composites(&self) -> Vec<&PhysiqueComposite> {
        self.physiques
            .values()
            .filter(|row| row.kind == PhysiqueKind::Mixed)
            .collect()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Reports ids that are unknown or used outside their category.
    pub fn check_selection(&self, selection: &TagSelection) -> Vec<TagViolation> {
        let mut violations = Vec::new();

        let single_select = selection.single_select_values();
        let shapes = selection
            .tongue_shapes
            .iter()
            .map(|id| (FeatureCategory::TongueShape, *id));
        for (category, feature_id) in single_select.into_iter().chain(shapes) {
            if !self.has_feature_in(category, feature_id) {
                violations.push(TagViolation::UnknownFeature {
                    category,
                    feature_id,
                });
            }
        }

        for physique_id in &selection.physique_atoms {
            let is_atom = self
                .physique(*physique_id)
                .is_some_and(|row| row.kind == PhysiqueKind::Single);
            if !is_atom {
                violations.push(TagViolation::UnknownPhysiqueAtom {
                    physique_id: *physique_id,
                });
            }
        }

        violations
    }

    fn has_feature_in(&self, category: FeatureCategory, id: FeatureId) -> bool {
        self.feature(id)
            .is_some_and(|feature| feature.category == category)
    }
}
