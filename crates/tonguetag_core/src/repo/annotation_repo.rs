//! Tagged annotation repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist one fully derived annotation per picture.
//! - Read annotations back with decoded id lists.
//!
//! # Invariants
//! - Creation checks picture existence and uniqueness inside the same
//!   immediate transaction as the insert.
//! - Annotations have no update or delete path.

use crate::model::annotation::{NewAnnotation, TaggedAnnotation};
use crate::model::physique::PhysiqueKind;
use crate::model::picture::PictureId;
use crate::repo::{decode_ids, encode_ids, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const ANNOTATIONS_DEFAULT_LIMIT: u32 = 20;
const ANNOTATIONS_LIMIT_MAX: u32 = 100;

const ANNOTATION_SELECT_SQL: &str = "SELECT
    id,
    picture_id,
    tongue_color,
    moss_color,
    moss_quality,
    body_fluid,
    sublingual_collaterals,
    tongue_shape_ids,
    physique_type,
    single_physique_ids,
    physique_ids,
    created_at
FROM tagged_annotations";

/// Query options for listing annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationListQuery {
    /// Optional single/mixed filter.
    pub physique_type: Option<PhysiqueKind>,
    /// Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait AnnotationRepository {
    /// Inserts one annotation and returns the stored row.
    fn create_annotation(&mut self, annotation: &NewAnnotation) -> RepoResult<TaggedAnnotation>;
    fn get_by_picture(&self, picture_id: PictureId) -> RepoResult<Option<TaggedAnnotation>>;
    /// Lists annotations newest first.
    fn list_annotations(&self, query: &AnnotationListQuery) -> RepoResult<Vec<TaggedAnnotation>>;
}

/// SQLite-backed annotation repository.
pub struct SqliteAnnotationRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAnnotationRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl AnnotationRepository for SqliteAnnotationRepository<'_> {
    fn create_annotation(&mut self, annotation: &NewAnnotation) -> RepoResult<TaggedAnnotation> {
        let tongue_shape_ids = encode_ids(&annotation.tongue_shape_ids)?;
        let single_physique_ids = encode_ids(&annotation.physique.single_physique_ids)?;
        let physique_ids = encode_ids(&annotation.physique.physique_ids)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !picture_exists_in_tx(&tx, annotation.picture_id)? {
            return Err(RepoError::PictureNotFound(annotation.picture_id));
        }
        if annotation_exists_in_tx(&tx, annotation.picture_id)? {
            return Err(RepoError::AlreadyAnnotated(annotation.picture_id));
        }

        tx.execute(
            "INSERT INTO tagged_annotations (
                picture_id,
                tongue_color,
                moss_color,
                moss_quality,
                body_fluid,
                sublingual_collaterals,
                tongue_shape_ids,
                physique_type,
                single_physique_ids,
                physique_ids
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                annotation.picture_id,
                annotation.tongue_color,
                annotation.moss_color,
                annotation.moss_quality,
                annotation.body_fluid,
                annotation.sublingual_collaterals,
                tongue_shape_ids,
                annotation.physique.physique_type.as_str(),
                single_physique_ids,
                physique_ids,
            ],
        )?;
        let stored = select_one_in_tx(&tx, annotation.picture_id)?.ok_or_else(|| {
            RepoError::InvalidData("inserted annotation missing in read-back".to_string())
        })?;

        tx.commit()?;
        Ok(stored)
    }

    fn get_by_picture(&self, picture_id: PictureId) -> RepoResult<Option<TaggedAnnotation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ANNOTATION_SELECT_SQL} WHERE picture_id = ?1;"))?;
        let mut rows = stmt.query([picture_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_annotation_row(row)?));
        }
        Ok(None)
    }

    fn list_annotations(&self, query: &AnnotationListQuery) -> RepoResult<Vec<TaggedAnnotation>> {
        let mut sql = format!("{ANNOTATION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.physique_type {
            sql.push_str(" AND physique_type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_annotation_limit(
            query.limit,
        ))));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut annotations = Vec::new();
        while let Some(row) = rows.next()? {
            annotations.push(parse_annotation_row(row)?);
        }
        Ok(annotations)
    }
}

/// Normalizes list limit according to the annotation listing contract.
pub fn normalize_annotation_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => ANNOTATIONS_DEFAULT_LIMIT,
        Some(value) if value > ANNOTATIONS_LIMIT_MAX => ANNOTATIONS_LIMIT_MAX,
        Some(value) => value,
    }
}

fn select_one_in_tx(
    tx: &Transaction<'_>,
    picture_id: PictureId,
) -> RepoResult<Option<TaggedAnnotation>> {
    let mut stmt = tx.prepare(&format!("{ANNOTATION_SELECT_SQL} WHERE picture_id = ?1;"))?;
    let mut rows = stmt.query([picture_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_annotation_row(row)?));
    }
    Ok(None)
}

fn picture_exists_in_tx(tx: &Transaction<'_>, picture_id: PictureId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM pictures WHERE id = ?1);",
        [picture_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn annotation_exists_in_tx(tx: &Transaction<'_>, picture_id: PictureId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM tagged_annotations WHERE picture_id = ?1);",
        [picture_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_annotation_row(row: &Row<'_>) -> RepoResult<TaggedAnnotation> {
    let type_text: String = row.get("physique_type")?;
    let physique_type = PhysiqueKind::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid physique type `{type_text}` in tagged_annotations.physique_type"
        ))
    })?;

    let tongue_shape_ids = decode_ids(
        "tagged_annotations.tongue_shape_ids",
        &row.get::<_, String>("tongue_shape_ids")?,
    )?;
    let single_physique_ids = decode_ids(
        "tagged_annotations.single_physique_ids",
        &row.get::<_, String>("single_physique_ids")?,
    )?;
    let physique_ids = decode_ids(
        "tagged_annotations.physique_ids",
        &row.get::<_, String>("physique_ids")?,
    )?;
    if physique_ids.is_empty() {
        return Err(RepoError::InvalidData(
            "empty tagged_annotations.physique_ids".to_string(),
        ));
    }

    Ok(TaggedAnnotation {
        id: row.get("id")?,
        picture_id: row.get("picture_id")?,
        tongue_color: row.get("tongue_color")?,
        moss_color: row.get("moss_color")?,
        moss_quality: row.get("moss_quality")?,
        body_fluid: row.get("body_fluid")?,
        sublingual_collaterals: row.get("sublingual_collaterals")?,
        tongue_shape_ids,
        physique_type,
        single_physique_ids,
        physique_ids,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::normalize_annotation_limit;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_annotation_limit(None), 20);
        assert_eq!(normalize_annotation_limit(Some(0)), 20);
        assert_eq!(normalize_annotation_limit(Some(7)), 7);
        assert_eq!(normalize_annotation_limit(Some(1_000)), 100);
    }
}
