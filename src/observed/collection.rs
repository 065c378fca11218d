//! Operations of every decorated container.

use crate::{container::Collection, observed::ObservedIter, Result};

use super::Observed;

impl<T: Clone, C: Collection<T>> Observed<T, C> {
    /// Adds `value`. Returns whether the container changed; `false` if vetoed.
    pub fn add(&mut self, value: T) -> Result<bool> {
        if !self.handler.pre_add(self.inner.len(), &value)? {
            return Ok(false);
        }
        let modified = self.inner.add(value.clone());
        self.handler.post_add(self.inner.len(), &value, modified)?;
        Ok(modified)
    }

    /// Adds every element of `values`. Returns whether the container changed.
    pub fn add_all(&mut self, values: Vec<T>) -> Result<bool> {
        if !self.handler.pre_add_all(self.inner.len(), &values)? {
            return Ok(false);
        }
        let modified = self.inner.add_all(values.clone());
        self.handler
            .post_add_all(self.inner.len(), &values, modified)?;
        Ok(modified)
    }

    /// A removing iterator over every element.
    pub fn iter(&mut self) -> ObservedIter<'_, T> {
        let size = self.inner.len();
        ObservedIter::new(self.inner.cursor(), &self.handler, size)
    }
}

impl<T, C: Collection<T>> Observed<T, C> {
    /// Removes one occurrence of `value`. Returns whether an element was removed.
    ///
    /// Removing an absent element raises the pre event only.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        if !self.handler.pre_remove(self.inner.len(), value)? {
            return Ok(false);
        }
        let removed = self.inner.remove_value(value);
        self.handler
            .post_remove(self.inner.len(), value, removed.as_ref())?;
        Ok(removed.is_some())
    }

    /// Removes every element equal to one in `values`. Returns whether the container changed.
    pub fn remove_all(&mut self, values: &[T]) -> Result<bool>
    where
        T: PartialEq,
    {
        if !self.handler.pre_remove_all(self.inner.len(), values)? {
            return Ok(false);
        }
        let modified = self
            .inner
            .retain_values(&mut |element| !values.contains(element));
        self.handler
            .post_remove_all(self.inner.len(), values, modified)?;
        Ok(modified)
    }

    /// Removes every element not equal to one in `values`. Returns whether the container
    /// changed.
    pub fn retain_all(&mut self, values: &[T]) -> Result<bool>
    where
        T: PartialEq,
    {
        if !self.handler.pre_retain_all(self.inner.len(), values)? {
            return Ok(false);
        }
        let modified = self
            .inner
            .retain_values(&mut |element| values.contains(element));
        self.handler
            .post_retain_all(self.inner.len(), values, modified)?;
        Ok(modified)
    }

    /// Removes every element. Returns whether the container changed; clearing an empty
    /// container still raises both events.
    pub fn clear(&mut self) -> Result<bool> {
        let size = self.inner.len();
        if !self.handler.pre_clear(size)? {
            return Ok(false);
        }
        self.inner.clear();
        let modified = size > 0;
        self.handler.post_clear(self.inner.len(), modified)?;
        Ok(modified)
    }
}
