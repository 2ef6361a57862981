//! Tongue photograph records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned picture identifier.
pub type PictureId = i64;

/// Identifier of one upload batch. Pictures of a batch are annotated in order.
pub type BatchId = Uuid;

/// One registered tongue photograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: PictureId,
    /// Storage path relative to the media root, e.g. `tongue/p001.jpg`.
    pub path: String,
    pub batch_id: BatchId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Result of registering one upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureBatch {
    pub batch_id: BatchId,
    /// Picture ids in upload order.
    pub picture_ids: Vec<PictureId>,
}
