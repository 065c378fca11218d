//! Range views of decorated lists.

use std::{fmt, rc::Rc};

use crate::{
    container::List,
    handler::Handler,
    identity::{ContainerId, SameInstance},
    observed::ObservedListIter,
    Error, Result,
};

use super::list::Window;

/// A view of a contiguous range of a decorated list.
///
/// The view borrows the list mutably and covers the elements between its first `start` and
/// its last `tail` elements, so the view grows and shrinks with the modifications made through
/// it. Its handler is a range-view handler: events reach the root hooks with indices in root
/// coordinates, `view` set to [`id`](Self::id) and `view_offset` set to the view's start.
///
/// Unindexed additions append at the end of the view and raise `Add`.
pub struct ObservedSubList<'a, T, C> {
    list: &'a mut C,
    handler: Rc<Handler<T>>,
    id: ContainerId,
    start: usize,
    tail: usize,
}

impl<'a, T, C: List<T>> ObservedSubList<'a, T, C> {
    /// Creates the `from..to` view of the `(start, tail)` window served by `parent`.
    pub(super) fn new(
        list: &'a mut C,
        parent: &Rc<Handler<T>>,
        (start, tail): (usize, usize),
        from: usize,
        to: usize,
    ) -> Result<Self> {
        let len = list.len() - start - tail;
        if to > len {
            return Err(Error::IndexOutOfBounds { index: to, len });
        }
        let handler = parent.make_range_view_handler(from, to)?;
        let id = ContainerId::next();
        handler.bind(id, C::CAPABILITIES)?;

        Ok(ObservedSubList {
            list,
            handler,
            id,
            start: start + from,
            tail: tail + (len - to),
        })
    }

    fn window(&mut self) -> Window<'_, T, C> {
        Window {
            list: &mut *self.list,
            handler: &self.handler,
            start: self.start,
            tail: self.tail,
        }
    }

    /// The identity reported as `view` by events raised through this view.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The view handler.
    pub fn handler(&self) -> &Rc<Handler<T>> {
        &self.handler
    }

    /// Start of the view in root coordinates.
    pub fn offset(&self) -> usize {
        self.start
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.list.len() - self.start - self.tail
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index` of the view.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        self.list.get(self.start + index)
    }

    /// The elements of the view, in order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        (self.start..self.start + self.len()).filter_map(|position| self.list.get(position))
    }

    fn position_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        (0..self.len()).find(|&index| self.list.get(self.start + index) == Some(value))
    }

    /// Whether the view contains `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.position_of(value).is_some()
    }

    /// Appends `value` to the end of the view. Returns `false` if vetoed.
    pub fn add(&mut self, value: T) -> Result<bool> {
        let size = self.list.len();
        if !self.handler.pre_add(size, &value)? {
            return Ok(false);
        }

        let position = size - self.tail;
        self.list.insert_at(position, value);
        if let Some(added) = self.list.get(position) {
            self.handler.post_add(self.list.len(), added, true)?;
        }
        Ok(true)
    }

    /// Appends every element of `values` to the end of the view. Returns whether the list
    /// changed.
    pub fn add_all(&mut self, values: Vec<T>) -> Result<bool>
    where
        T: Clone,
    {
        let size = self.list.len();
        if !self.handler.pre_add_all(size, &values)? {
            return Ok(false);
        }

        let modified = self.list.insert_all_at(size - self.tail, values.clone());
        self.handler
            .post_add_all(self.list.len(), &values, modified)?;
        Ok(modified)
    }

    /// Removes the first occurrence of `value` inside the view.
    pub fn remove(&mut self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        if !self.handler.pre_remove(self.list.len(), value)? {
            return Ok(false);
        }

        let removed = self
            .position_of(value)
            .map(|index| self.list.remove_at(self.start + index));
        self.handler
            .post_remove(self.list.len(), value, removed.as_ref())?;
        Ok(removed.is_some())
    }

    fn retain_in_view(&mut self, mut keep: impl FnMut(&T) -> bool) -> bool {
        let mut modified = false;
        for index in (0..self.len()).rev() {
            let position = self.start + index;
            if self.list.get(position).is_some_and(|element| !keep(element)) {
                self.list.remove_at(position);
                modified = true;
            }
        }
        modified
    }

    /// Removes every element of the view equal to one in `values`.
    pub fn remove_all(&mut self, values: &[T]) -> Result<bool>
    where
        T: PartialEq,
    {
        if !self.handler.pre_remove_all(self.list.len(), values)? {
            return Ok(false);
        }
        let modified = self.retain_in_view(|element| !values.contains(element));
        self.handler
            .post_remove_all(self.list.len(), values, modified)?;
        Ok(modified)
    }

    /// Removes every element of the view not equal to one in `values`.
    pub fn retain_all(&mut self, values: &[T]) -> Result<bool>
    where
        T: PartialEq,
    {
        if !self.handler.pre_retain_all(self.list.len(), values)? {
            return Ok(false);
        }
        let modified = self.retain_in_view(|element| values.contains(element));
        self.handler
            .post_retain_all(self.list.len(), values, modified)?;
        Ok(modified)
    }

    /// Removes every element of the view from the list.
    pub fn clear(&mut self) -> Result<bool> {
        let len = self.len();
        if !self.handler.pre_clear(self.list.len())? {
            return Ok(false);
        }
        self.list.remove_range(self.start, self.start + len);
        self.handler.post_clear(self.list.len(), len > 0)?;
        Ok(len > 0)
    }

    /// Inserts `value` at `index` of the view. Returns `false` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index > len()`, before any hook runs.
    pub fn add_at(&mut self, index: usize, value: T) -> Result<bool> {
        self.window().add_at(index, value)
    }

    /// Inserts `values` at `index` of the view. Returns whether the list changed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index > len()`, before any hook runs.
    pub fn add_all_at(&mut self, index: usize, values: Vec<T>) -> Result<bool>
    where
        T: Clone,
    {
        self.window().add_all_at(index, values)
    }

    /// Removes and returns the element at `index` of the view; `None` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index >= len()`, before any hook runs.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<T>> {
        self.window().remove_at(index)
    }

    /// Replaces the element at `index` of the view; `None` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index >= len()`, before any hook runs.
    pub fn set(&mut self, index: usize, value: T) -> Result<Option<T>>
    where
        T: SameInstance,
    {
        self.window().set(index, value)
    }

    /// A list iterator over the view.
    pub fn list_iter(&mut self) -> ObservedListIter<'_, T, C> {
        ObservedListIter::new(&mut *self.list, &self.handler, self.start, self.tail)
    }

    /// A view of the elements in `from..to` of this view.
    ///
    /// # Errors
    ///
    /// Same as [`Observed::sub_list`](super::Observed::sub_list).
    pub fn sub_list(&mut self, from: usize, to: usize) -> Result<ObservedSubList<'_, T, C>> {
        ObservedSubList::new(
            &mut *self.list,
            &self.handler,
            (self.start, self.tail),
            from,
            to,
        )
    }
}

impl<T, C: List<T>> fmt::Debug for ObservedSubList<'_, T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedSubList")
            .field("id", &self.id)
            .field("offset", &self.start)
            .field("values", &self.values().collect::<Vec<_>>())
            .finish()
    }
}
