//! Tagging input and the persisted annotation record.
//!
//! # Responsibility
//! - Define the typed selection submitted by the tagging form.
//! - Define the derived physique fields and the stored annotation shape.
//!
//! # Invariants
//! - One `TaggedAnnotation` exists per picture at most.
//! - `single_physique_ids` is always the sorted selected atom tuple.
//! - `physique_ids` is never empty for a stored annotation.

use crate::model::feature::{FeatureCategory, FeatureId, SINGLE_SELECT_CATEGORIES};
use crate::model::physique::{PhysiqueId, PhysiqueKind};
use crate::model::picture::PictureId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Store-assigned annotation identifier.
pub type AnnotationId = i64;

/// Candidate tag set for one photograph, as submitted by the form layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSelection {
    pub tongue_color: FeatureId,
    pub moss_color: FeatureId,
    pub moss_quality: FeatureId,
    pub body_fluid: FeatureId,
    pub sublingual_collaterals: FeatureId,
    /// Optional, multi-select.
    pub tongue_shapes: BTreeSet<FeatureId>,
    /// Required, one to six atoms.
    pub physique_atoms: BTreeSet<PhysiqueId>,
}

impl TagSelection {
    /// Returns the five single-select picks paired with their category.
    ///
    /// Order follows `SINGLE_SELECT_CATEGORIES`.
    pub fn single_select_values(&self) -> [(FeatureCategory, FeatureId); 5] {
        let [tc, mc, mq, bf, sc] = SINGLE_SELECT_CATEGORIES;
        [
            (tc, self.tongue_color),
            (mc, self.moss_color),
            (mq, self.moss_quality),
            (bf, self.body_fluid),
            (sc, self.sublingual_collaterals),
        ]
    }
}

/// Derived physique fields persisted with an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysiqueResolution {
    pub physique_type: PhysiqueKind,
    /// Sorted selected atom ids, stored verbatim.
    pub single_physique_ids: Vec<PhysiqueId>,
    /// Single atom id, matched composite id, or the raw sorted atom ids.
    pub physique_ids: Vec<PhysiqueId>,
}

impl PhysiqueResolution {
    /// True when a mixed selection matched no canonical composite and the
    /// raw atom ids stand in as the identifier list.
    pub fn is_uncatalogued_mix(&self) -> bool {
        self.physique_type == PhysiqueKind::Mixed && self.physique_ids.len() > 1
    }
}

/// Write model for one annotation: selection plus derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnotation {
    pub picture_id: PictureId,
    pub tongue_color: FeatureId,
    pub moss_color: FeatureId,
    pub moss_quality: FeatureId,
    pub body_fluid: FeatureId,
    pub sublingual_collaterals: FeatureId,
    pub tongue_shape_ids: Vec<FeatureId>,
    pub physique: PhysiqueResolution,
}

impl NewAnnotation {
    pub fn new(picture_id: PictureId, selection: &TagSelection, physique: PhysiqueResolution) -> Self {
        Self {
            picture_id,
            tongue_color: selection.tongue_color,
            moss_color: selection.moss_color,
            moss_quality: selection.moss_quality,
            body_fluid: selection.body_fluid,
            sublingual_collaterals: selection.sublingual_collaterals,
            tongue_shape_ids: selection.tongue_shapes.iter().copied().collect(),
            physique,
        }
    }
}

/// Stored tagging record for one photograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedAnnotation {
    pub id: AnnotationId,
    pub picture_id: PictureId,
    pub tongue_color: FeatureId,
    pub moss_color: FeatureId,
    pub moss_quality: FeatureId,
    pub body_fluid: FeatureId,
    pub sublingual_collaterals: FeatureId,
    pub tongue_shape_ids: Vec<FeatureId>,
    pub physique_type: PhysiqueKind,
    pub single_physique_ids: Vec<PhysiqueId>,
    pub physique_ids: Vec<PhysiqueId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{NewAnnotation, PhysiqueResolution, TagSelection};
    use crate::model::feature::FeatureCategory;
    use crate::model::physique::PhysiqueKind;

    #[test]
    fn single_select_values_follow_category_order() {
        let selection = TagSelection {
            tongue_color: 2,
            moss_color: 6,
            moss_quality: 9,
            body_fluid: 13,
            sublingual_collaterals: 16,
            ..TagSelection::default()
        };
        let values = selection.single_select_values();
        assert_eq!(values[0], (FeatureCategory::TongueColor, 2));
        assert_eq!(values[3], (FeatureCategory::BodyFluid, 13));
        assert_eq!(values[4], (FeatureCategory::SublingualCollaterals, 16));
    }

    #[test]
    fn new_annotation_copies_shapes_in_ascending_order() {
        let selection = TagSelection {
            tongue_shapes: [25, 20].into_iter().collect(),
            physique_atoms: [3].into_iter().collect(),
            ..TagSelection::default()
        };
        let resolution = PhysiqueResolution {
            physique_type: PhysiqueKind::Single,
            single_physique_ids: vec![3],
            physique_ids: vec![3],
        };
        let annotation = NewAnnotation::new(7, &selection, resolution);
        assert_eq!(annotation.tongue_shape_ids, vec![20, 25]);
        assert!(!annotation.physique.is_uncatalogued_mix());
    }

    #[test]
    fn resolution_wire_shape_uses_snake_case_kind() {
        let resolution = PhysiqueResolution {
            physique_type: PhysiqueKind::Mixed,
            single_physique_ids: vec![2, 8],
            physique_ids: vec![2, 8],
        };
        let value = serde_json::to_value(&resolution).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "physique_type": "mixed",
                "single_physique_ids": [2, 8],
                "physique_ids": [2, 8]
            })
        );
    }
}
