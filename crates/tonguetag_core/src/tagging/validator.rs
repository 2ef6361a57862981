//! Structural and clinical-exclusivity checks for a tag selection.
//!
//! # Responsibility
//! - Reject selections that break duplicate, exclusion or cardinality rules.
//! - Report every violation found in one pass, in rule order.
//!
//! # Invariants
//! - Validation has no side effects.
//! - A selection with zero violations is safe to hand to the resolver.

use crate::model::annotation::TagSelection;
use crate::model::feature::{FeatureCategory, FeatureId};
use crate::model::physique::PhysiqueId;
use crate::tagging::rules::{
    ExclusionRule, MAX_PHYSIQUE_SELECTION, PHYSIQUE_BALANCED, PHYSIQUE_EXCLUSIONS,
    TONGUE_SHAPE_EXCLUSIONS,
};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse grouping of violations, mirroring the user-facing error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    DuplicateFeature,
    MutualExclusion,
    Cardinality,
    UnknownReference,
}

/// One broken rule on a submitted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagViolation {
    /// The same value appears in more than one single-select slot.
    DuplicateFeature { feature_id: FeatureId },
    /// Two excluded tongue shapes are both selected.
    TongueShapeExclusion(ExclusionRule),
    /// Two excluded physique atoms are both selected.
    PhysiqueExclusion(ExclusionRule),
    /// The balanced atom is selected together with another atom.
    BalancedNotExclusive,
    /// Atom count is zero or above the maximum.
    PhysiqueCardinality { selected: usize },
    /// Feature id is unknown or belongs to another category.
    UnknownFeature {
        category: FeatureCategory,
        feature_id: FeatureId,
    },
    /// Physique id is unknown or is not an atom.
    UnknownPhysiqueAtom { physique_id: PhysiqueId },
}

impl TagViolation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::DuplicateFeature { .. } => ViolationKind::DuplicateFeature,
            Self::TongueShapeExclusion(_)
            | Self::PhysiqueExclusion(_)
            | Self::BalancedNotExclusive => ViolationKind::MutualExclusion,
            Self::PhysiqueCardinality { .. } => ViolationKind::Cardinality,
            Self::UnknownFeature { .. } | Self::UnknownPhysiqueAtom { .. } => {
                ViolationKind::UnknownReference
            }
        }
    }
}

impl Display for TagViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateFeature { feature_id } => write!(
                f,
                "duplicate tongue features not allowed (feature {feature_id} selected more than once)"
            ),
            Self::TongueShapeExclusion(rule) => write!(f, "tongue shape: {}", rule.description),
            Self::PhysiqueExclusion(rule) => write!(f, "physique: {}", rule.description),
            Self::BalancedNotExclusive => write!(
                f,
                "physique: balanced constitution cannot be selected with other constitutions"
            ),
            Self::PhysiqueCardinality { selected: 0 } => {
                write!(f, "physique: select at least one constitution")
            }
            Self::PhysiqueCardinality { selected } => write!(
                f,
                "physique: too many constitutions selected ({selected} > {MAX_PHYSIQUE_SELECTION})"
            ),
            Self::UnknownFeature {
                category,
                feature_id,
            } => write!(f, "{}: unknown feature {feature_id}", category.label()),
            Self::UnknownPhysiqueAtom { physique_id } => {
                write!(f, "physique: unknown constitution {physique_id}")
            }
        }
    }
}

/// All violations found on one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<TagViolation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<TagViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[TagViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|violation| violation.kind() == kind)
    }

    /// User-facing messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// `Ok(())` when nothing was found, otherwise the report itself.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl Error for ValidationReport {}

/// Validates one selection against the fixed rule set.
pub fn validate(selection: &TagSelection) -> Result<(), ValidationReport> {
    ValidationReport::new(collect_violations(selection)).into_result()
}

/// Runs every rule and returns violations in rule order.
pub fn collect_violations(selection: &TagSelection) -> Vec<TagViolation> {
    let mut violations = Vec::new();

    // Values are compared across categories, not within one.
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for (_, feature_id) in selection.single_select_values() {
        if !seen.insert(feature_id) && reported.insert(feature_id) {
            violations.push(TagViolation::DuplicateFeature { feature_id });
        }
    }

    for rule in TONGUE_SHAPE_EXCLUSIONS {
        if rule.is_violated_by(&selection.tongue_shapes) {
            violations.push(TagViolation::TongueShapeExclusion(rule));
        }
    }

    let atoms = &selection.physique_atoms;
    for rule in PHYSIQUE_EXCLUSIONS {
        if rule.is_violated_by(atoms) {
            violations.push(TagViolation::PhysiqueExclusion(rule));
        }
    }

    if atoms.contains(&PHYSIQUE_BALANCED) && atoms.len() > 1 {
        violations.push(TagViolation::BalancedNotExclusive);
    }

    if atoms.is_empty() || atoms.len() > MAX_PHYSIQUE_SELECTION {
        violations.push(TagViolation::PhysiqueCardinality {
            selected: atoms.len(),
        });
    }

    violations
}
