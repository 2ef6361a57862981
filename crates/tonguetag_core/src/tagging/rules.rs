//! Fixed clinical rule constants for tag validation.
//!
//! Identifiers here match the seeded reference data shipped in
//! `db/migrations/0002_reference_seed.sql`. Other modules refer to these
//! names instead of raw ids.

use crate::model::feature::FeatureId;
use crate::model::physique::PhysiqueId;
use std::collections::BTreeSet;

pub const TONGUE_SHAPE_FAT: FeatureId = 20;
pub const TONGUE_SHAPE_THIN: FeatureId = 21;
pub const TONGUE_SHAPE_OLD: FeatureId = 22;
pub const TONGUE_SHAPE_TENDER: FeatureId = 23;

pub const PHYSIQUE_BALANCED: PhysiqueId = 1;
pub const PHYSIQUE_QI_STAGNATION: PhysiqueId = 2;
pub const PHYSIQUE_QI_DEFICIENCY: PhysiqueId = 3;
pub const PHYSIQUE_BLOOD_STASIS: PhysiqueId = 4;
pub const PHYSIQUE_YANG_DEFICIENCY: PhysiqueId = 5;
pub const PHYSIQUE_YIN_DEFICIENCY: PhysiqueId = 6;
pub const PHYSIQUE_PHLEGM_DAMPNESS: PhysiqueId = 7;
pub const PHYSIQUE_DAMP_HEAT: PhysiqueId = 8;
pub const PHYSIQUE_EXCESS_HEAT: PhysiqueId = 9;

/// Maximum number of physique atoms on one annotation.
pub const MAX_PHYSIQUE_SELECTION: usize = 6;

/// Two identifiers that must not be selected together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionRule {
    pub first: i64,
    pub second: i64,
    /// User-facing explanation, e.g. `fat and thin are mutually exclusive`.
    pub description: &'static str,
}

impl ExclusionRule {
    pub fn is_violated_by(&self, selected: &BTreeSet<i64>) -> bool {
        selected.contains(&self.first) && selected.contains(&self.second)
    }
}

pub const TONGUE_SHAPE_EXCLUSIONS: [ExclusionRule; 2] = [
    ExclusionRule {
        first: TONGUE_SHAPE_FAT,
        second: TONGUE_SHAPE_THIN,
        description: "fat and thin are mutually exclusive",
    },
    ExclusionRule {
        first: TONGUE_SHAPE_OLD,
        second: TONGUE_SHAPE_TENDER,
        description: "old and tender are mutually exclusive",
    },
];

pub const PHYSIQUE_EXCLUSIONS: [ExclusionRule; 4] = [
    ExclusionRule {
        first: PHYSIQUE_YANG_DEFICIENCY,
        second: PHYSIQUE_EXCESS_HEAT,
        description: "yang-deficiency and excess-heat are mutually exclusive",
    },
    ExclusionRule {
        first: PHYSIQUE_YIN_DEFICIENCY,
        second: PHYSIQUE_PHLEGM_DAMPNESS,
        description: "yin-deficiency and phlegm-dampness are mutually exclusive",
    },
    ExclusionRule {
        first: PHYSIQUE_QI_DEFICIENCY,
        second: PHYSIQUE_QI_STAGNATION,
        description: "qi-deficiency and qi-stagnation are mutually exclusive",
    },
    ExclusionRule {
        first: PHYSIQUE_YANG_DEFICIENCY,
        second: PHYSIQUE_YIN_DEFICIENCY,
        description: "yang-deficiency and yin-deficiency are mutually exclusive",
    },
];

#[cfg(test)]
mod tests {
    use super::{ExclusionRule, PHYSIQUE_EXCLUSIONS, TONGUE_SHAPE_EXCLUSIONS};
    use std::collections::BTreeSet;

    #[test]
    fn rule_requires_both_members() {
        let rule = TONGUE_SHAPE_EXCLUSIONS[0];
        let only_fat: BTreeSet<i64> = [rule.first].into_iter().collect();
        let both: BTreeSet<i64> = [rule.first, rule.second, 99].into_iter().collect();
        assert!(!rule.is_violated_by(&only_fat));
        assert!(rule.is_violated_by(&both));
    }

    #[test]
    fn no_rule_pairs_an_id_with_itself() {
        let all: Vec<ExclusionRule> = TONGUE_SHAPE_EXCLUSIONS
            .iter()
            .chain(PHYSIQUE_EXCLUSIONS.iter())
            .copied()
            .collect();
        assert!(all.iter().all(|rule| rule.first != rule.second));
    }
}
