use std::collections::BTreeSet;
use tonguetag_core::db::open_db_in_memory;
use tonguetag_core::tagging::rules::{
    PHYSIQUE_BALANCED, PHYSIQUE_BLOOD_STASIS, PHYSIQUE_DAMP_HEAT, PHYSIQUE_EXCESS_HEAT,
    PHYSIQUE_PHLEGM_DAMPNESS, PHYSIQUE_QI_DEFICIENCY, PHYSIQUE_QI_STAGNATION,
    PHYSIQUE_YANG_DEFICIENCY, PHYSIQUE_YIN_DEFICIENCY, TONGUE_SHAPE_FAT, TONGUE_SHAPE_OLD,
    TONGUE_SHAPE_TENDER, TONGUE_SHAPE_THIN,
};
use tonguetag_core::{
    FeatureCategory, PhysiqueKind, ReferenceCatalog, ReferenceRepository,
    SqliteReferenceRepository,
};

fn seeded_catalog() -> ReferenceCatalog {
    let conn = open_db_in_memory().unwrap();
    SqliteReferenceRepository::new(&conn).load_catalog().unwrap()
}

#[test]
fn seeded_catalog_has_expected_shape() {
    let catalog = seeded_catalog();

    assert_eq!(catalog.atoms().len(), 9);
    assert_eq!(catalog.composites().len(), 11);
    assert_eq!(catalog.feature_count(), 25);
    assert_eq!(catalog.features_in(FeatureCategory::TongueShape).len(), 7);
    assert_eq!(catalog.features_in(FeatureCategory::TongueColor).len(), 5);
    assert_eq!(catalog.lookup().len(), 11);
}

#[test]
fn every_composite_maps_back_through_lookup() {
    let catalog = seeded_catalog();

    for composite in catalog.composites() {
        assert_eq!(composite.kind, PhysiqueKind::Mixed);
        assert!(composite.atom_ids.len() >= 2);
        let found = catalog.lookup().get(&composite.atom_ids).unwrap();
        assert_eq!(found.id, composite.id);
    }
    assert_eq!(catalog.lookup().get(&[2, 4]).unwrap().id, 17);
    assert_eq!(catalog.lookup().get(&[3, 5, 7]).unwrap().id, 20);
    assert!(catalog.lookup().get(&[2, 8]).is_none());
}

#[test]
fn rule_constants_match_seeded_ids() {
    let catalog = seeded_catalog();

    let atom_ids: BTreeSet<i64> = catalog.atoms().iter().map(|atom| atom.id).collect();
    let expected: BTreeSet<i64> = [
        PHYSIQUE_BALANCED,
        PHYSIQUE_QI_STAGNATION,
        PHYSIQUE_QI_DEFICIENCY,
        PHYSIQUE_BLOOD_STASIS,
        PHYSIQUE_YANG_DEFICIENCY,
        PHYSIQUE_YIN_DEFICIENCY,
        PHYSIQUE_PHLEGM_DAMPNESS,
        PHYSIQUE_DAMP_HEAT,
        PHYSIQUE_EXCESS_HEAT,
    ]
    .into_iter()
    .collect();
    assert_eq!(atom_ids, expected);

    for shape_id in [
        TONGUE_SHAPE_FAT,
        TONGUE_SHAPE_THIN,
        TONGUE_SHAPE_OLD,
        TONGUE_SHAPE_TENDER,
    ] {
        let feature = catalog.feature(shape_id).unwrap();
        assert_eq!(feature.category, FeatureCategory::TongueShape);
    }
}

#[test]
fn physique_rows_keep_their_kind() {
    let catalog = seeded_catalog();

    let balanced = catalog.physique(PHYSIQUE_BALANCED).unwrap();
    assert_eq!(balanced.kind, PhysiqueKind::Single);
    assert_eq!(balanced.atom_ids, vec![PHYSIQUE_BALANCED]);

    let mixed = catalog.physique(17).unwrap();
    assert_eq!(mixed.kind, PhysiqueKind::Mixed);
    assert!(mixed.as_atom().is_none());
}
