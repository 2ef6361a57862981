//! Reference data repository (tongue features and physiques).
//!
//! # Responsibility
//! - Read seeded reference rows from `tongue_features` and `physiques`.
//! - Assemble the read-only `ReferenceCatalog` used by tagging.
//!
//! # Invariants
//! - Reference tables are read-only at runtime; no write API exists.
//! - Unknown category or kind values are reported as invalid data.

use crate::model::feature::{FeatureCategory, TongueFeature};
use crate::model::physique::{PhysiqueComposite, PhysiqueKind};
use crate::repo::{decode_ids, RepoError, RepoResult};
use crate::tagging::catalog::ReferenceCatalog;
use log::{error, info};
use rusqlite::{Connection, Row};

pub trait ReferenceRepository {
    /// All tongue features ordered by id.
    fn list_features(&self) -> RepoResult<Vec<TongueFeature>>;
    /// All physique rows (atoms and composites) ordered by id.
    fn list_physiques(&self) -> RepoResult<Vec<PhysiqueComposite>>;

    /// Loads and integrity-checks the full catalog.
    fn load_catalog(&self) -> RepoResult<ReferenceCatalog> {
        let features = self.list_features()?;
        let physiques = self.list_physiques()?;
        match ReferenceCatalog::build(features, physiques) {
            Ok(catalog) => {
                info!(
                    "event=catalog_load module=repo status=ok features={} atoms={} composites={}",
                    catalog.feature_count(),
                    catalog.atoms().len(),
                    catalog.composites().len()
                );
                Ok(catalog)
            }
            Err(err) => {
                error!(
                    "event=catalog_load module=repo status=error error_code=catalog_integrity error={}",
                    err
                );
                Err(RepoError::InvalidData(err.to_string()))
            }
        }
    }
}

/// SQLite-backed reference repository.
pub struct SqliteReferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReferenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReferenceRepository for SqliteReferenceRepository<'_> {
    fn list_features(&self) -> RepoResult<Vec<TongueFeature>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, category, label FROM tongue_features ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut features = Vec::new();
        while let Some(row) = rows.next()? {
            features.push(parse_feature_row(row)?);
        }
        Ok(features)
    }

    fn list_physiques(&self) -> RepoResult<Vec<PhysiqueComposite>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label, kind, atom_ids FROM physiques ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut physiques = Vec::new();
        while let Some(row) = rows.next()? {
            physiques.push(parse_physique_row(row)?);
        }
        Ok(physiques)
    }
}

fn parse_feature_row(row: &Row<'_>) -> RepoResult<TongueFeature> {
    let code: String = row.get("category")?;
    let category = FeatureCategory::from_code(&code).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{code}` in tongue_features.category"
        ))
    })?;
    Ok(TongueFeature {
        id: row.get("id")?,
        category,
        label: row.get("label")?,
    })
}

fn parse_physique_row(row: &Row<'_>) -> RepoResult<PhysiqueComposite> {
    let kind_text: String = row.get("kind")?;
    let kind = PhysiqueKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in physiques.kind"))
    })?;
    let atom_text: String = row.get("atom_ids")?;
    let mut atom_ids = decode_ids("physiques.atom_ids", &atom_text)?;
    atom_ids.sort_unstable();
    atom_ids.dedup();

    Ok(PhysiqueComposite {
        id: row.get("id")?,
        label: row.get("label")?,
        kind,
        atom_ids,
    })
}
