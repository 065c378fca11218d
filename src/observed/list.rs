//! Positional operations of decorated lists and sub-lists.

use crate::{
    container::List,
    handler::Handler,
    identity::SameInstance,
    observed::{ObservedListIter, ObservedSubList},
    Error, Result,
};

use super::Observed;

/// A `start..len - tail` window of a list, driving one handler.
///
/// Indices taken and reported are relative to the window; the handler translates them into root
/// coordinates.
pub(super) struct Window<'a, T, C> {
    pub(super) list: &'a mut C,
    pub(super) handler: &'a Handler<T>,
    pub(super) start: usize,
    pub(super) tail: usize,
}

impl<T, C: List<T>> Window<'_, T, C> {
    pub(super) fn len(&self) -> usize {
        self.list.len() - self.start - self.tail
    }

    fn check(&self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    /// Insertion points range over `0..=len`.
    fn check_insert(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    pub(super) fn add_at(&mut self, index: usize, value: T) -> Result<bool> {
        self.check_insert(index)?;
        if !self
            .handler
            .pre_add_indexed(self.list.len(), index, &value)?
        {
            return Ok(false);
        }

        let position = self.start + index;
        self.list.insert_at(position, value);
        if let Some(added) = self.list.get(position) {
            self.handler
                .post_add_indexed(self.list.len(), index, added)?;
        }
        Ok(true)
    }

    pub(super) fn add_all_at(&mut self, index: usize, values: Vec<T>) -> Result<bool>
    where
        T: Clone,
    {
        self.check_insert(index)?;
        if !self
            .handler
            .pre_add_all_indexed(self.list.len(), index, &values)?
        {
            return Ok(false);
        }

        let modified = self
            .list
            .insert_all_at(self.start + index, values.clone());
        self.handler
            .post_add_all_indexed(self.list.len(), index, &values, modified)?;
        Ok(modified)
    }

    pub(super) fn remove_at(&mut self, index: usize) -> Result<Option<T>> {
        self.check(index, self.len())?;
        if !self.handler.pre_remove_indexed(self.list.len(), index)? {
            return Ok(None);
        }

        let previous = self.list.remove_at(self.start + index);
        self.handler
            .post_remove_indexed(self.list.len(), index, &previous)?;
        Ok(Some(previous))
    }

    pub(super) fn set(&mut self, index: usize, value: T) -> Result<Option<T>>
    where
        T: SameInstance,
    {
        self.check(index, self.len())?;
        let size = self.list.len();
        if !self.handler.pre_set_indexed(size, index, &value)? {
            return Ok(None);
        }

        let position = self.start + index;
        let previous = self.list.set_at(position, value);
        if let Some(current) = self.list.get(position) {
            self.handler
                .post_set_indexed(size, index, current, &previous)?;
        }
        Ok(Some(previous))
    }
}

impl<T, C: List<T>> Observed<T, C> {
    fn window(&mut self) -> Window<'_, T, C> {
        Window {
            list: &mut self.inner,
            handler: &self.handler,
            start: 0,
            tail: 0,
        }
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index)
    }

    /// Inserts `value` at `index`. Returns `false` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index > len()`, before any hook runs.
    pub fn add_at(&mut self, index: usize, value: T) -> Result<bool> {
        self.window().add_at(index, value)
    }

    /// Inserts `values` at `index`, preserving their order. Returns whether the list changed.
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

    /// Removes and returns the element at `index`; `None` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index >= len()`, before any hook runs.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<T>> {
        self.window().remove_at(index)
    }

    /// Replaces the element at `index` and returns the previous one; `None` if vetoed.
    ///
    /// The post event reports `modified` by instance identity, see [`SameInstance`].
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

    /// A list iterator over every element.
    pub fn list_iter(&mut self) -> ObservedListIter<'_, T, C> {
        ObservedListIter::new(&mut self.inner, &self.handler, 0, 0)
    }

    /// A view of the elements in `from..to`.
    ///
    /// Modifications through the view are applied to this list and reported to its listeners
    /// in this list's coordinates.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfBounds`] if `to > len()`
    /// - [`Error::InvalidArgument`] if `from > to`
    /// - [`Error::ViewDepthExceeded`] if the configuration forbids views
    pub fn sub_list(&mut self, from: usize, to: usize) -> Result<ObservedSubList<'_, T, C>> {
        ObservedSubList::new(&mut self.inner, &self.handler, (0, 0), from, to)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        event::{EventFlags, EventKind, Phase},
        handler::Handler,
        observed::Observed,
        test::RecordingHooks,
        Error,
    };

    fn recorded(
        values: Vec<i32>,
        veto: EventFlags,
    ) -> (Observed<i32, Vec<i32>>, Rc<RecordingHooks<i32>>) {
        let hooks = Rc::new(RecordingHooks::vetoing(veto));
        let list = Observed::with_handler(values, Handler::with_hooks(hooks.clone())).unwrap();
        (list, hooks)
    }

    #[test]
    fn test_indexed_operations() {
        let (mut list, hooks) = recorded(vec![1, 2, 3], EventFlags::empty());
        assert!(list.add_at(1, 7).unwrap());
        assert_eq!(list.remove_at(0).unwrap(), Some(1));
        assert_eq!(list.set(2, 8).unwrap(), Some(3));
        assert!(list.add_all_at(3, vec![4, 5]).unwrap());
        assert_eq!(list.inner(), &vec![7, 2, 8, 4, 5]);
        assert_eq!(list.get(1), Some(&2));

        let posts = hooks.post_events();
        assert_eq!(posts[0].kind, EventKind::AddIndexed);
        assert_eq!(posts[0].index, Some(1));
        assert_eq!(posts[0].modified, Some(true));
        assert_eq!(posts[1].kind, EventKind::RemoveIndexed);
        assert_eq!(posts[1].previous, Some(1));
        assert_eq!((posts[1].pre_size, posts[1].post_size), (4, Some(3)));
        assert_eq!(posts[2].kind, EventKind::SetIndexed);
        assert_eq!(posts[2].subject, Some(8));
        assert_eq!(posts[2].previous, Some(3));
        assert_eq!((posts[2].pre_size, posts[2].post_size), (3, Some(3)));
        assert_eq!(posts[3].kind, EventKind::AddAllIndexed);
        assert_eq!(posts[3].batch, Some(vec![4, 5]));
        assert_eq!(posts[3].index, Some(3));
    }

    #[test]
    fn test_pre_indexed_events_have_no_previous() {
        let (mut list, hooks) = recorded(vec![1, 2], EventFlags::empty());
        list.remove_at(1).unwrap();
        list.set(0, 5).unwrap();
        let pres: Vec<_> = hooks
            .events()
            .into_iter()
            .filter(|event| event.phase == Phase::Pre)
            .collect();
        assert_eq!(pres.len(), 2);
        assert!(pres.iter().all(|event| event.previous.is_none()));
    }

    #[test]
    fn test_out_of_bounds_runs_no_hooks() {
        let (mut list, hooks) = recorded(vec![1, 2, 3], EventFlags::empty());
        assert!(matches!(
            list.remove_at(7),
            Err(Error::IndexOutOfBounds { index: 7, len: 3 })
        ));
        assert!(matches!(
            list.add_at(4, 0),
            Err(Error::IndexOutOfBounds { index: 4, len: 3 })
        ));
        assert!(matches!(
            list.set(3, 0),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        ));
        assert!(list.add_at(3, 4).unwrap());
        assert_eq!(hooks.events().len(), 2);
    }

    #[test]
    fn test_vetoed_indexed_operations() {
        let (mut list, hooks) = recorded(vec![1, 2], EventFlags::CHANGE_GROUP);
        assert!(!list.add_at(0, 9).unwrap());
        assert_eq!(list.remove_at(0).unwrap(), None);
        assert_eq!(list.set(0, 9).unwrap(), None);
        assert!(!list.add_all_at(0, vec![9]).unwrap());
        assert_eq!(list.inner(), &vec![1, 2]);
        assert!(hooks.post_events().is_empty());
    }

    #[test]
    fn test_set_of_shared_handle() {
        let hooks = Rc::new(RecordingHooks::<Rc<String>>::default());
        let first = Rc::new(String::from("a"));
        let mut list =
            Observed::with_handler(vec![Rc::clone(&first)], Handler::with_hooks(hooks.clone()))
                .unwrap();
        list.set(0, Rc::clone(&first)).unwrap();
        list.set(0, Rc::new(String::from("a"))).unwrap();
        let posts = hooks.post_events();
        assert_eq!(posts[0].modified, Some(false));
        assert_eq!(posts[1].modified, Some(true));
    }
}
