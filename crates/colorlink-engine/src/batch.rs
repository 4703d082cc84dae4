//! Scoped batch update
//!
//! [`BatchUpdate`] starts a batch when created and finishes it when dropped,
//! so every exit path of a pass resumes relayout. A caller that is about to
//! discard the document calls [`BatchUpdate::abandon`] instead.

use crate::document::TextDocument;

/// Active batch update on a document
#[must_use = "dropping the guard finishes the batch immediately"]
pub struct BatchUpdate<'a, D: TextDocument + ?Sized> {
    document: &'a D,
    finish_on_drop: bool,
}

impl<'a, D: TextDocument + ?Sized> BatchUpdate<'a, D> {
    /// Start a batch update
    pub fn begin(document: &'a D) -> Self {
        document.start_batch_update();
        tracing::trace!("batch update started");
        Self {
            document,
            finish_on_drop: true,
        }
    }

    /// Document under batch update
    #[inline]
    #[must_use]
    pub fn document(&self) -> &'a D {
        self.document
    }

    /// Finish the batch now
    pub fn finish(self) {
        drop(self);
    }

    /// Leave the batch open. Only valid when the document is discarded right
    /// after (exported and closed).
    pub fn abandon(mut self) {
        self.finish_on_drop = false;
        tracing::debug!("batch update abandoned, document will be discarded");
    }
}

impl<D: TextDocument + ?Sized> Drop for BatchUpdate<'_, D> {
    fn drop(&mut self) {
        if self.finish_on_drop {
            self.document.finish_batch_update();
            tracing::trace!("batch update finished");
        }
    }
}

impl<D: TextDocument + ?Sized> std::fmt::Debug for BatchUpdate<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchUpdate")
            .field("finish_on_drop", &self.finish_on_drop)
            .finish_non_exhaustive()
    }
}
