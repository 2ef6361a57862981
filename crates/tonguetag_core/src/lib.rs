//! Core domain logic for tongue photograph tagging.
//! This crate is the single source of truth for tagging rules and physique
//! resolution.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tagging;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::annotation::{
    AnnotationId, NewAnnotation, PhysiqueResolution, TagSelection, TaggedAnnotation,
};
pub use model::feature::{FeatureCategory, FeatureId, TongueFeature};
pub use model::physique::{PhysiqueAtom, PhysiqueComposite, PhysiqueId, PhysiqueKind};
pub use model::picture::{BatchId, Picture, PictureBatch, PictureId};
pub use repo::annotation_repo::{
    AnnotationListQuery, AnnotationRepository, SqliteAnnotationRepository,
};
pub use repo::picture_repo::{PictureRepository, SqlitePictureRepository};
pub use repo::reference_repo::{ReferenceRepository, SqliteReferenceRepository};
pub use repo::{RepoError, RepoResult};
pub use service::picture_service::{PictureService, PictureServiceError};
pub use service::queue::{AnnotationQueue, QueueStep};
pub use service::tagging_service::{
    AnnotationsListResult, QueueSubmission, TaggingService, TaggingServiceError,
};
pub use tagging::catalog::{CatalogError, ReferenceCatalog};
pub use tagging::resolver::{resolve, CompositeLookup, CompositeLookupError};
pub use tagging::validator::{validate, TagViolation, ValidationReport, ViolationKind};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
