//! Annotation queue for one upload batch.
//!
//! The queue holds the pictures of a batch that still need tagging, in upload
//! order. It only advances after a successful save.

use crate::model::picture::{BatchId, PictureId};
use std::collections::VecDeque;

/// What the caller should show after the queue head was annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStep {
    /// Annotate this picture next.
    Next(PictureId),
    /// Every picture of the batch is annotated; return to upload.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationQueue {
    batch_id: BatchId,
    pending: VecDeque<PictureId>,
}

impl AnnotationQueue {
    pub fn new(batch_id: BatchId, pending: impl IntoIterator<Item = PictureId>) -> Self {
        Self {
            batch_id,
            pending: pending.into_iter().collect(),
        }
    }

    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    /// Picture currently waiting for annotation.
    pub fn current(&self) -> Option<PictureId> {
        self.pending.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops the head and reports the following step.
    pub fn advance(&mut self) -> QueueStep {
        self.pending.pop_front();
        match self.current() {
            Some(next) => QueueStep::Next(next),
            None => QueueStep::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnotationQueue, QueueStep};
    use uuid::Uuid;

    #[test]
    fn advance_walks_pictures_in_order_then_finishes() {
        let mut queue = AnnotationQueue::new(Uuid::new_v4(), [4, 5]);
        assert_eq!(queue.current(), Some(4));
        assert_eq!(queue.advance(), QueueStep::Next(5));
        assert_eq!(queue.remaining(), 1);
        assert_eq!(queue.advance(), QueueStep::Finished);
        assert!(queue.is_finished());
        assert_eq!(queue.advance(), QueueStep::Finished);
    }
}
