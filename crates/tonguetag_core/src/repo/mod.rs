//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL and column encoding from tagging logic and services.
//!
//! # Invariants
//! - Id-list columns are JSON arrays of integers.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Annotation writes are all-or-nothing.

use crate::db::DbError;
use crate::model::picture::PictureId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod annotation_repo;
pub mod picture_repo;
pub mod reference_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by reference, picture and annotation storage.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    PictureNotFound(PictureId),
    AlreadyAnnotated(PictureId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::PictureNotFound(id) => write!(f, "picture not found: {id}"),
            Self::AlreadyAnnotated(id) => write!(f, "picture already annotated: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn encode_ids(ids: &[i64]) -> RepoResult<String> {
    serde_json::to_string(ids)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode id list: {err}")))
}

pub(crate) fn decode_ids(column: &str, value: &str) -> RepoResult<Vec<i64>> {
    serde_json::from_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid id list `{value}` in {column}"))
    })
}
