//! Head removal of decorated buffers.

use crate::{container::Buffer, Result};

use super::Observed;

impl<T, C: Buffer<T>> Observed<T, C> {
    /// The element [`remove_next`](Self::remove_next) would remove.
    pub fn peek_next(&self) -> Option<&T> {
        self.inner.peek_next()
    }

    /// Removes and returns the next element; `None` if the buffer is empty or the removal was
    /// vetoed.
    ///
    /// Removing from an empty buffer raises the pre event only.
    pub fn remove_next(&mut self) -> Result<Option<T>> {
        if !self.handler.pre_remove_next(self.inner.len())? {
            return Ok(None);
        }
        let removed = self.inner.remove_next();
        self.handler
            .post_remove_next(self.inner.len(), removed.as_ref())?;
        Ok(removed)
    }
}
