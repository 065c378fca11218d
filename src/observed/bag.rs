//! Counted operations of decorated bags.

use crate::{container::Bag, Result};

use super::Observed;

impl<T: Clone, C: Bag<T>> Observed<T, C> {
    /// Number of occurrences of `value`.
    pub fn count(&self, value: &T) -> usize {
        self.inner.count(value)
    }

    /// Adds `copies` occurrences of `value` and returns the bag's own result.
    ///
    /// Bags do not report additions reliably, so the post event always reports
    /// `modified = true`, whatever the bag returned.
    pub fn add_copies(&mut self, value: T, copies: u32) -> Result<bool> {
        if !self
            .handler
            .pre_add_ncopies(self.inner.len(), &value, copies)?
        {
            return Ok(false);
        }
        let reported = self.inner.add_copies(value.clone(), copies);
        self.handler
            .post_add_ncopies(self.inner.len(), &value, copies, true)?;
        Ok(reported)
    }

    /// Removes up to `copies` occurrences of `value` and returns the bag's own result.
    ///
    /// As with [`add_copies`](Self::add_copies), the post event always reports
    /// `modified = true`.
    pub fn remove_copies(&mut self, value: &T, copies: u32) -> Result<bool> {
        if !self
            .handler
            .pre_remove_ncopies(self.inner.len(), value, copies)?
        {
            return Ok(false);
        }
        let reported = self.inner.remove_copies(value, copies);
        self.handler
            .post_remove_ncopies(self.inner.len(), value, copies, true)?;
        Ok(reported)
    }
}
