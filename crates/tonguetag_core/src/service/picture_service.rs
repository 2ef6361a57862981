//! Picture registration use-case service.
//!
//! # Responsibility
//! - Validate uploaded file names and register them as one batch.
//! - Open the annotation queue for a registered batch.
//!
//! # Invariants
//! - Only image file names without path components are accepted.
//! - A batch is registered whole or not at all.

use crate::model::picture::{BatchId, Picture, PictureBatch, PictureId};
use crate::repo::picture_repo::PictureRepository;
use crate::repo::RepoError;
use crate::service::queue::AnnotationQueue;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage prefix for tongue photographs, relative to the media root.
pub const PICTURE_STORAGE_PREFIX: &str = "tongue/";

static IMAGE_FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^/\\]+\.(?i:jpe?g|png|bmp|gif|webp)$").expect("valid image name regex")
});

#[derive(Debug)]
pub enum PictureServiceError {
    /// No files were submitted.
    EmptyBatch,
    /// File name is blank, has path components or is not an image.
    InvalidFileName(String),
    /// No picture was ever registered under this batch id.
    BatchNotFound(BatchId),
    Repo(RepoError),
}

impl Display for PictureServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "no pictures to register"),
            Self::InvalidFileName(name) => write!(f, "not an image file name: `{name}`"),
            Self::BatchNotFound(id) => write!(f, "upload batch not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PictureServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PictureServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct PictureService<R: PictureRepository> {
    repo: R,
}

impl<R: PictureRepository> PictureService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers uploaded file names as one new batch.
    ///
    /// Names are trimmed and stored as `tongue/<name>`.
    pub fn register_uploads(
        &mut self,
        file_names: &[String],
    ) -> Result<PictureBatch, PictureServiceError> {
        if file_names.is_empty() {
            return Err(PictureServiceError::EmptyBatch);
        }

        let mut paths = Vec::with_capacity(file_names.len());
        for name in file_names {
            paths.push(storage_path(name)?);
        }

        let batch = self.repo.insert_batch(Uuid::new_v4(), &paths)?;
        info!(
            "event=picture_register module=service status=ok batch_id={} count={}",
            batch.batch_id,
            batch.picture_ids.len()
        );
        Ok(batch)
    }

    pub fn get_picture(&self, id: PictureId) -> Result<Option<Picture>, PictureServiceError> {
        Ok(self.repo.get_picture(id)?)
    }

    /// Builds the queue of not-yet-annotated pictures of a batch.
    pub fn open_queue(&self, batch_id: BatchId) -> Result<AnnotationQueue, PictureServiceError> {
        if self.repo.list_batch(batch_id)?.is_empty() {
            warn!(
                "event=queue_open module=service status=error error_code=batch_not_found batch_id={}",
                batch_id
            );
            return Err(PictureServiceError::BatchNotFound(batch_id));
        }

        let pending = self.repo.pending_in_batch(batch_id)?;
        Ok(AnnotationQueue::new(
            batch_id,
            pending.into_iter().map(|picture| picture.id),
        ))
    }
}

/// Validates one uploaded file name and returns its storage path.
pub fn storage_path(file_name: &str) -> Result<String, PictureServiceError> {
    let trimmed = file_name.trim();
    if !IMAGE_FILE_NAME_RE.is_match(trimmed) {
        return Err(PictureServiceError::InvalidFileName(file_name.to_string()));
    }
    Ok(format!("{PICTURE_STORAGE_PREFIX}{trimmed}"))
}
