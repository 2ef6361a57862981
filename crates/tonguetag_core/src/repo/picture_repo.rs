//! Picture repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Register uploaded tongue photographs in batches.
//! - Answer which pictures of a batch still wait for annotation.
//!
//! # Invariants
//! - A batch is inserted in one transaction; partial batches never exist.
//! - Pending order is ascending picture id, i.e. upload order.

use crate::model::picture::{BatchId, Picture, PictureBatch, PictureId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use uuid::Uuid;

const PICTURE_SELECT_SQL: &str = "SELECT id, path, batch_uuid, created_at FROM pictures";

pub trait PictureRepository {
    /// Inserts all paths under `batch_id` and returns ids in input order.
    fn insert_batch(&mut self, batch_id: BatchId, paths: &[String]) -> RepoResult<PictureBatch>;
    fn get_picture(&self, id: PictureId) -> RepoResult<Option<Picture>>;
    /// All pictures of a batch in upload order.
    fn list_batch(&self, batch_id: BatchId) -> RepoResult<Vec<Picture>>;
    /// Pictures of a batch that have no annotation yet, in upload order.
    fn pending_in_batch(&self, batch_id: BatchId) -> RepoResult<Vec<Picture>>;
}

/// SQLite-backed picture repository.
pub struct SqlitePictureRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePictureRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PictureRepository for SqlitePictureRepository<'_> {
    fn insert_batch(&mut self, batch_id: BatchId, paths: &[String]) -> RepoResult<PictureBatch> {
        let batch_text = batch_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut picture_ids = Vec::with_capacity(paths.len());
        for path in paths {
            tx.execute(
                "INSERT INTO pictures (path, batch_uuid) VALUES (?1, ?2);",
                params![path.as_str(), batch_text.as_str()],
            )?;
            picture_ids.push(tx.last_insert_rowid());
        }

        tx.commit()?;
        Ok(PictureBatch {
            batch_id,
            picture_ids,
        })
    }

    fn get_picture(&self, id: PictureId) -> RepoResult<Option<Picture>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PICTURE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_picture_row(row)?));
        }
        Ok(None)
    }

    fn list_batch(&self, batch_id: BatchId) -> RepoResult<Vec<Picture>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PICTURE_SELECT_SQL} WHERE batch_uuid = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([batch_id.to_string()])?;
        let mut pictures = Vec::new();
        while let Some(row) = rows.next()? {
            pictures.push(parse_picture_row(row)?);
        }
        Ok(pictures)
    }

    fn pending_in_batch(&self, batch_id: BatchId) -> RepoResult<Vec<Picture>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PICTURE_SELECT_SQL}
             WHERE batch_uuid = ?1
               AND NOT EXISTS (
                    SELECT 1 FROM tagged_annotations ta WHERE ta.picture_id = pictures.id
               )
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([batch_id.to_string()])?;
        let mut pictures = Vec::new();
        while let Some(row) = rows.next()? {
            pictures.push(parse_picture_row(row)?);
        }
        Ok(pictures)
    }
}

fn parse_picture_row(row: &Row<'_>) -> RepoResult<Picture> {
    let batch_text: String = row.get("batch_uuid")?;
    let batch_id = Uuid::parse_str(&batch_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{batch_text}` in pictures.batch_uuid"
        ))
    })?;
    Ok(Picture {
        id: row.get("id")?,
        path: row.get("path")?,
        batch_id,
        created_at: row.get("created_at")?,
    })
}
