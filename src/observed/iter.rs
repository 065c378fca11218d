//! Removing iterators over decorated containers.
//!
//! Both iterators lend their elements (`next` returns a reference valid until the next call),
//! so they do not implement [`Iterator`]. Removal through them raises `RemoveIterated`
//! events; [`ObservedListIter`] additionally raises `SetIterated` and `AddIterated`.

use crate::{
    container::{List, RemovingCursor},
    handler::Handler,
    identity::SameInstance,
    Error, Result,
};

/// A removing iterator over a decorated container, owning the container's cursor.
///
/// Indices reported in events count the elements produced so far, minus the ones removed.
pub struct ObservedIter<'a, T> {
    cursor: Box<dyn RemovingCursor<T> + 'a>,
    handler: &'a Handler<T>,
    /// Size of the root container, kept up to date across removals.
    size: usize,
    next_index: usize,
    current: Option<(usize, T)>,
}

impl<'a, T: Clone> ObservedIter<'a, T> {
    pub(crate) fn new(
        cursor: Box<dyn RemovingCursor<T> + 'a>,
        handler: &'a Handler<T>,
        size: usize,
    ) -> Self {
        ObservedIter {
            cursor,
            handler,
            size,
            next_index: 0,
            current: None,
        }
    }

    /// Advances to the next element.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        let value = self.cursor.next()?.clone();
        let index = self.next_index;
        self.next_index += 1;
        self.current = Some((index, value));
        self.current.as_ref().map(|(_, value)| value)
    }

    /// Index of the element last produced by [`next`](Self::next), if it has not been removed.
    pub fn index(&self) -> Option<usize> {
        self.current.as_ref().map(|(index, _)| *index)
    }

    /// Removes the element last produced by [`next`](Self::next).
    ///
    /// Returns `false` if the removal was vetoed; the element can then still be removed by a
    /// later call.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if `next` has not produced an element since the last
    /// removal.
    pub fn remove(&mut self) -> Result<bool> {
        let Some((index, value)) = &self.current else {
            return Err(Error::NoCurrentElement);
        };
        let index = *index;
        if !self
            .handler
            .pre_remove_iterated(self.size, index, value)?
        {
            return Ok(false);
        }

        let removed = self.cursor.remove().ok_or(Error::NoCurrentElement)?;
        self.current = None;
        self.size -= 1;
        self.next_index = index;
        self.handler
            .post_remove_iterated(self.size, index, &removed)?;
        Ok(true)
    }
}

/// A list iterator over a decorated list or sub-list, supporting removal, replacement and
/// insertion at the cursor.
pub struct ObservedListIter<'a, T, C> {
    list: &'a mut C,
    handler: &'a Handler<T>,
    /// Window of the iterated (sub-)list in root coordinates.
    start: usize,
    tail: usize,
    cursor: usize,
    last: Option<usize>,
}

impl<'a, T, C: List<T>> ObservedListIter<'a, T, C> {
    pub(crate) fn new(list: &'a mut C, handler: &'a Handler<T>, start: usize, tail: usize) -> Self {
        ObservedListIter {
            list,
            handler,
            start,
            tail,
            cursor: 0,
            last: None,
        }
    }

    fn window_len(&self) -> usize {
        self.list.len() - self.start - self.tail
    }

    fn last_index(&self) -> Result<usize> {
        self.last.ok_or(Error::NoCurrentElement)
    }

    /// Whether [`next`](Self::next) would produce an element.
    pub fn has_next(&self) -> bool {
        self.cursor < self.window_len()
    }

    /// Index of the element the next call to [`next`](Self::next) produces.
    pub fn next_index(&self) -> usize {
        self.cursor
    }

    /// Advances to the next element.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        if !self.has_next() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        self.last = Some(index);
        self.list.get(self.start + index)
    }

    /// Whether [`previous`](Self::previous) would produce an element.
    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    /// Index of the element the next call to [`previous`](Self::previous) produces.
    pub fn previous_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Steps back to the previous element.
    pub fn previous(&mut self) -> Option<&T> {
        let index = self.previous_index()?;
        self.cursor = index;
        self.last = Some(index);
        self.list.get(self.start + index)
    }

    /// Removes the element last produced by [`next`](Self::next) or
    /// [`previous`](Self::previous). Returns `false` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if there is no such element.
    pub fn remove(&mut self) -> Result<bool> {
        let index = self.last_index()?;
        let size = self.list.len();
        let value = self
            .list
            .get(self.start + index)
            .ok_or(Error::NoCurrentElement)?;
        if !self.handler.pre_remove_iterated(size, index, value)? {
            return Ok(false);
        }

        let removed = self.list.remove_at(self.start + index);
        self.cursor = index;
        self.last = None;
        self.handler
            .post_remove_iterated(self.list.len(), index, &removed)?;
        Ok(true)
    }

    /// Replaces the element last produced by [`next`](Self::next) or
    /// [`previous`](Self::previous). Returns `false` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if there is no such element.
    pub fn set(&mut self, value: T) -> Result<bool>
    where
        T: SameInstance,
    {
        let index = self.last_index()?;
        let size = self.list.len();
        if !self.handler.pre_set_iterated(size, index, &value)? {
            return Ok(false);
        }

        let position = self.start + index;
        let previous = self.list.set_at(position, value);
        if let Some(current) = self.list.get(position) {
            self.handler
                .post_set_iterated(size, index, current, &previous)?;
        }
        Ok(true)
    }

    /// Inserts `value` before the element the next call to [`next`](Self::next) would produce.
    /// Returns `false` if vetoed.
    pub fn add(&mut self, value: T) -> Result<bool> {
        let index = self.cursor;
        if !self
            .handler
            .pre_add_iterated(self.list.len(), index, &value)?
        {
            return Ok(false);
        }

        let position = self.start + index;
        self.list.insert_at(position, value);
        self.cursor += 1;
        self.last = None;
        if let Some(added) = self.list.get(position) {
            self.handler
                .post_add_iterated(self.list.len(), index, added)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, rc::Rc};

    use crate::{
        event::{EventFlags, EventKind, Phase},
        handler::Handler,
        observed::Observed,
        test::RecordingHooks,
        Error,
    };

    fn recorded_vec(
        values: Vec<i32>,
        veto: EventFlags,
    ) -> (Observed<i32, Vec<i32>>, Rc<RecordingHooks<i32>>) {
        let hooks = Rc::new(RecordingHooks::vetoing(veto));
        let list = Observed::with_handler(values, Handler::with_hooks(hooks.clone())).unwrap();
        (list, hooks)
    }

    #[test]
    fn test_iter_removes_with_running_index() {
        let (mut list, hooks) = recorded_vec(vec![1, 2, 3, 4], EventFlags::empty());
        let mut iter = list.iter();
        assert!(matches!(iter.remove(), Err(Error::NoCurrentElement)));
        while let Some(&value) = iter.next() {
            if value % 2 == 0 {
                assert!(iter.remove().unwrap());
                assert!(matches!(iter.remove(), Err(Error::NoCurrentElement)));
            }
        }
        drop(iter);
        assert_eq!(list.inner(), &vec![1, 3]);

        let posts = hooks.post_events();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].kind, EventKind::RemoveIterated);
        assert_eq!(posts[0].index, Some(1));
        assert_eq!(posts[0].previous, Some(2));
        assert_eq!((posts[0].pre_size, posts[0].post_size), (4, Some(3)));
        // Index 1 was removed, so 4 sat at index 2 when it went.
        assert_eq!(posts[1].index, Some(2));
        assert_eq!((posts[1].pre_size, posts[1].post_size), (3, Some(2)));
    }

    #[test]
    fn test_iter_over_sorted_set() {
        let hooks = Rc::new(RecordingHooks::<i32>::default());
        let mut set =
            Observed::with_handler(BTreeSet::from([5, 6, 7]), Handler::with_hooks(hooks.clone()))
                .unwrap();
        let mut iter = set.iter();
        assert_eq!(iter.next(), Some(&5));
        assert_eq!(iter.next(), Some(&6));
        assert_eq!(iter.index(), Some(1));
        assert!(iter.remove().unwrap());
        assert_eq!(iter.index(), None);
        assert_eq!(iter.next(), Some(&7));
        assert_eq!(iter.index(), Some(1));
        assert_eq!(iter.next(), None);
        drop(iter);
        assert_eq!(set.inner(), &BTreeSet::from([5, 7]));
    }

    #[test]
    fn test_vetoed_iterated_removal() {
        let (mut list, hooks) = recorded_vec(vec![1, 2], EventFlags::REMOVE_GROUP);
        let mut iter = list.iter();
        iter.next();
        assert!(!iter.remove().unwrap());
        drop(iter);
        assert_eq!(list.len(), 2);
        assert!(hooks.post_events().is_empty());
    }

    #[test]
    fn test_list_iter_set_add_remove() {
        let (mut list, hooks) = recorded_vec(vec![1, 2, 3], EventFlags::empty());
        let mut iter = list.list_iter();
        assert!(matches!(iter.set(0), Err(Error::NoCurrentElement)));
        assert_eq!(iter.next(), Some(&1));
        assert!(iter.set(10).unwrap());
        assert!(iter.add(15).unwrap());
        assert!(matches!(iter.remove(), Err(Error::NoCurrentElement)));
        assert_eq!(iter.next_index(), 2);
        assert_eq!(iter.next(), Some(&2));
        assert!(iter.remove().unwrap());
        assert!(iter.has_next());
        assert_eq!(iter.next(), Some(&3));
        assert!(!iter.has_next());
        assert_eq!(list.inner(), &vec![10, 15, 3]);

        let posts = hooks.post_events();
        let kinds: Vec<_> = posts.iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::SetIterated,
                EventKind::AddIterated,
                EventKind::RemoveIterated
            ]
        );
        assert_eq!(posts[0].previous, Some(1));
        assert_eq!(posts[0].modified, Some(true));
        assert_eq!(posts[1].index, Some(1));
        assert_eq!(posts[1].modified, Some(true));
        assert_eq!(posts[2].index, Some(2));
        assert_eq!(posts[2].previous, Some(2));
        assert!(hooks
            .events()
            .iter()
            .filter(|event| event.phase == Phase::Pre)
            .all(|event| event.post_size.is_none()));
    }

    #[test]
    fn test_list_iter_walks_backwards() {
        let (mut list, hooks) = recorded_vec(vec![1, 2, 3, 4], EventFlags::empty());
        {
            let mut iter = list.list_iter();
            assert!(!iter.has_previous());
            assert_eq!(iter.previous_index(), None);
            assert_eq!(iter.previous(), None);
            while iter.next().is_some() {}
            assert_eq!(iter.previous_index(), Some(3));

            assert_eq!(iter.previous(), Some(&4));
            assert_eq!(iter.previous(), Some(&3));
            assert!(iter.set(30).unwrap());
            assert_eq!(iter.previous(), Some(&2));
            assert!(iter.remove().unwrap());
            assert_eq!(iter.next_index(), 1);
            assert_eq!(iter.previous(), Some(&1));
            assert!(!iter.has_previous());
            assert_eq!(iter.next(), Some(&1));
            assert_eq!(iter.next(), Some(&30));
        }
        assert_eq!(list.inner(), &vec![1, 30, 4]);

        let posts = hooks.post_events();
        assert_eq!(posts[0].kind, EventKind::SetIterated);
        assert_eq!((posts[0].index, posts[0].previous), (Some(2), Some(3)));
        assert_eq!(posts[1].kind, EventKind::RemoveIterated);
        assert_eq!((posts[1].index, posts[1].previous), (Some(1), Some(2)));
    }

    #[test]
    fn test_list_iter_veto() {
        let (mut list, hooks) = recorded_vec(vec![1], EventFlags::SET_GROUP);
        let mut iter = list.list_iter();
        iter.next();
        assert!(!iter.set(9).unwrap());
        assert!(iter.add(2).unwrap());
        assert_eq!(list.inner(), &vec![1, 2]);
        assert_eq!(hooks.post_events().len(), 1);
    }
}
