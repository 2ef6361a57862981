//! Tagging use-case service.
//!
//! # Responsibility
//! - Run catalog and rule checks on a submitted selection.
//! - Resolve physique fields and persist the annotation in one write.
//! - Drive the per-batch annotation queue.
//!
//! # Invariants
//! - A rejected selection writes nothing and never advances the queue.
//! - The resolver only sees selections with zero violations.
//! - Annotation creation goes through `AnnotationRepository` only.

use crate::model::annotation::{NewAnnotation, PhysiqueResolution, TagSelection, TaggedAnnotation};
use crate::model::physique::PhysiqueKind;
use crate::model::picture::{BatchId, PictureId};
use crate::repo::annotation_repo::{
    normalize_annotation_limit, AnnotationListQuery, AnnotationRepository,
};
use crate::repo::RepoError;
use crate::service::queue::{AnnotationQueue, QueueStep};
use crate::tagging::catalog::ReferenceCatalog;
use crate::tagging::resolver::resolve;
use crate::tagging::validator::{collect_violations, ValidationReport};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TaggingServiceError {
    /// Selection broke one or more rules; every violation is listed.
    Rejected(ValidationReport),
    PictureNotFound(PictureId),
    AlreadyAnnotated(PictureId),
    /// The queue has no picture left to annotate.
    QueueFinished(BatchId),
    /// The queue head was annotated elsewhere and has been dropped.
    QueueHeadAnnotated {
        picture_id: PictureId,
        next: QueueStep,
    },
    Repo(RepoError),
}

impl Display for TaggingServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(report) => write!(f, "selection rejected: {report}"),
            Self::PictureNotFound(id) => write!(f, "picture not found: {id}"),
            Self::AlreadyAnnotated(id) => write!(f, "picture already annotated: {id}"),
            Self::QueueFinished(batch_id) => {
                write!(f, "no pictures left to annotate in batch {batch_id}")
            }
            Self::QueueHeadAnnotated { picture_id, .. } => {
                write!(f, "picture already annotated, skipped in queue: {picture_id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaggingServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(report) => Some(report),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaggingServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PictureNotFound(id) => Self::PictureNotFound(id),
            RepoError::AlreadyAnnotated(id) => Self::AlreadyAnnotated(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationReport> for TaggingServiceError {
    fn from(value: ValidationReport) -> Self {
        Self::Rejected(value)
    }
}

/// Saved annotation plus where the queue goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSubmission {
    pub annotation: TaggedAnnotation,
    pub next: QueueStep,
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationsListResult {
    pub items: Vec<TaggedAnnotation>,
    pub applied_limit: u32,
}

pub struct TaggingService<R: AnnotationRepository> {
    repo: R,
    catalog: ReferenceCatalog,
}

impl<R: AnnotationRepository> TaggingService<R> {
    pub fn new(repo: R, catalog: ReferenceCatalog) -> Self {
        Self { repo, catalog }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Checks a selection and returns the physique fields it would store.
    ///
    /// Catalog violations come first, then rule violations in rule order.
    pub fn review(&self, selection: &TagSelection) -> Result<PhysiqueResolution, ValidationReport> {
        let mut violations = self.catalog.check_selection(selection);
        violations.extend(collect_violations(selection));
        ValidationReport::new(violations).into_result()?;

        Ok(resolve(
            selection.physique_atoms.iter().copied(),
            self.catalog.lookup(),
        ))
    }

    /// Validates, resolves and stores the annotation for one picture.
    pub fn submit(
        &mut self,
        picture_id: PictureId,
        selection: &TagSelection,
    ) -> Result<TaggedAnnotation, TaggingServiceError> {
        let resolution = match self.review(selection) {
            Ok(resolution) => resolution,
            Err(report) => {
                warn!(
                    "event=annotation_create module=service status=rejected picture_id={} violations={}",
                    picture_id,
                    report.violations().len()
                );
                return Err(report.into());
            }
        };

        let new_annotation = NewAnnotation::new(picture_id, selection, resolution);
        match self.repo.create_annotation(&new_annotation) {
            Ok(stored) => {
                info!(
                    "event=annotation_create module=service status=ok picture_id={} physique_type={} uncatalogued_mix={}",
                    picture_id,
                    stored.physique_type.as_str(),
                    new_annotation.physique.is_uncatalogued_mix()
                );
                Ok(stored)
            }
            Err(err) => {
                error!(
                    "event=annotation_create module=service status=error picture_id={} error={}",
                    picture_id, err
                );
                Err(err.into())
            }
        }
    }

    /// Annotates the queue head; the queue advances only on success.
    ///
    /// A head that was annotated outside this queue is dropped and reported
    /// as `QueueHeadAnnotated`; the selection is not applied to the next
    /// picture.
    pub fn submit_next(
        &mut self,
        queue: &mut AnnotationQueue,
        selection: &TagSelection,
    ) -> Result<QueueSubmission, TaggingServiceError> {
        let picture_id = queue
            .current()
            .ok_or(TaggingServiceError::QueueFinished(queue.batch_id()))?;
        let annotation = match self.submit(picture_id, selection) {
            Ok(annotation) => annotation,
            Err(TaggingServiceError::AlreadyAnnotated(id)) if id == picture_id => {
                let next = queue.advance();
                warn!(
                    "event=queue_skip module=service status=ok batch_id={} picture_id={} remaining={}",
                    queue.batch_id(),
                    picture_id,
                    queue.remaining()
                );
                return Err(TaggingServiceError::QueueHeadAnnotated { picture_id, next });
            }
            Err(err) => return Err(err),
        };
        let next = queue.advance();
        Ok(QueueSubmission { annotation, next })
    }

    pub fn get_annotation(
        &self,
        picture_id: PictureId,
    ) -> Result<Option<TaggedAnnotation>, TaggingServiceError> {
        Ok(self.repo.get_by_picture(picture_id)?)
    }

    /// Lists stored annotations newest first with optional type filter.
    pub fn list_annotations(
        &self,
        physique_type: Option<PhysiqueKind>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<AnnotationsListResult, TaggingServiceError> {
        let applied_limit = normalize_annotation_limit(limit);
        let query = AnnotationListQuery {
            physique_type,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_annotations(&query)?;
        Ok(AnnotationsListResult {
            items,
            applied_limit,
        })
    }
}
