//! Collaborator implementations for the standard library containers.

use std::{
    collections::{BTreeSet, HashSet, VecDeque},
    hash::Hash,
    ops::Bound,
};

use crate::container::{Buffer, Capabilities, Collection, List, RemovingCursor, SortedSet};

/// Removing cursor over any container addressed by position.
struct IndexCursor<'a, C: ?Sized> {
    container: &'a mut C,
    next: usize,
    current: Option<usize>,
}

impl<'a, C: ?Sized> IndexCursor<'a, C> {
    fn new(container: &'a mut C) -> Self {
        IndexCursor {
            container,
            next: 0,
            current: None,
        }
    }
}

impl<T> RemovingCursor<T> for IndexCursor<'_, Vec<T>> {
    fn next(&mut self) -> Option<&T> {
        let index = self.next;
        let value = self.container.as_slice().get(index)?;
        self.current = Some(index);
        self.next += 1;
        Some(value)
    }

    fn remove(&mut self) -> Option<T> {
        let index = self.current.take()?;
        self.next -= 1;
        Some(Vec::remove(self.container, index))
    }
}

impl<T> RemovingCursor<T> for IndexCursor<'_, VecDeque<T>> {
    fn next(&mut self) -> Option<&T> {
        let index = self.next;
        let value = VecDeque::get(self.container, index)?;
        self.current = Some(index);
        self.next += 1;
        Some(value)
    }

    fn remove(&mut self) -> Option<T> {
        let index = self.current.take()?;
        self.next -= 1;
        VecDeque::remove(self.container, index)
    }
}

impl<T: PartialEq> Collection<T> for Vec<T> {
    const CAPABILITIES: Capabilities = Capabilities::COLLECTION.union(Capabilities::LIST);

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }

    fn add(&mut self, value: T) -> bool {
        self.push(value);
        true
    }

    fn add_all(&mut self, values: Vec<T>) -> bool {
        let changed = !values.is_empty();
        self.extend(values);
        changed
    }

    fn remove_value(&mut self, value: &T) -> Option<T> {
        let index = self.iter().position(|candidate| candidate == value)?;
        Some(Vec::remove(self, index))
    }

    fn retain_values(&mut self, keep: &mut dyn FnMut(&T) -> bool) -> bool {
        let before = Vec::len(self);
        self.retain(|value| keep(value));
        Vec::len(self) != before
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn cursor(&mut self) -> Box<dyn RemovingCursor<T> + '_> {
        Box::new(IndexCursor::new(self))
    }
}

impl<T: PartialEq> List<T> for Vec<T> {
    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn insert_at(&mut self, index: usize, value: T) {
        Vec::insert(self, index, value);
    }

    fn insert_all_at(&mut self, index: usize, values: Vec<T>) -> bool {
        let changed = !values.is_empty();
        self.splice(index..index, values);
        changed
    }

    fn remove_at(&mut self, index: usize) -> T {
        Vec::remove(self, index)
    }

    fn set_at(&mut self, index: usize, value: T) -> T {
        std::mem::replace(&mut self[index], value)
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        self.drain(from..to);
    }
}

impl<T: PartialEq> Collection<T> for VecDeque<T> {
    const CAPABILITIES: Capabilities = Capabilities::COLLECTION.union(Capabilities::BUFFER);

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        VecDeque::contains(self, value)
    }

    fn add(&mut self, value: T) -> bool {
        self.push_back(value);
        true
    }

    fn remove_value(&mut self, value: &T) -> Option<T> {
        let index = self.iter().position(|candidate| candidate == value)?;
        VecDeque::remove(self, index)
    }

    fn retain_values(&mut self, keep: &mut dyn FnMut(&T) -> bool) -> bool {
        let before = VecDeque::len(self);
        self.retain(|value| keep(value));
        VecDeque::len(self) != before
    }

    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    fn cursor(&mut self) -> Box<dyn RemovingCursor<T> + '_> {
        Box::new(IndexCursor::new(self))
    }
}

impl<T: PartialEq> Buffer<T> for VecDeque<T> {
    fn peek_next(&self) -> Option<&T> {
        self.front()
    }

    fn remove_next(&mut self) -> Option<T> {
        self.pop_front()
    }
}

/// Removing cursor over a snapshot of a hash set's elements.
struct HashSetCursor<'a, T> {
    set: &'a mut HashSet<T>,
    snapshot: Vec<T>,
    next: usize,
    current: Option<usize>,
}

impl<T: Hash + Eq> RemovingCursor<T> for HashSetCursor<'_, T> {
    fn next(&mut self) -> Option<&T> {
        let index = self.next;
        let value = self.snapshot.get(index)?;
        self.current = Some(index);
        self.next += 1;
        Some(value)
    }

    fn remove(&mut self) -> Option<T> {
        let index = self.current.take()?;
        self.set.take(&self.snapshot[index])
    }
}

impl<T: Hash + Eq + Clone> Collection<T> for HashSet<T> {
    const CAPABILITIES: Capabilities = Capabilities::COLLECTION.union(Capabilities::SET);

    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }

    fn add(&mut self, value: T) -> bool {
        self.insert(value)
    }

    fn remove_value(&mut self, value: &T) -> Option<T> {
        self.take(value)
    }

    fn retain_values(&mut self, keep: &mut dyn FnMut(&T) -> bool) -> bool {
        let before = HashSet::len(self);
        self.retain(|value| keep(value));
        HashSet::len(self) != before
    }

    fn clear(&mut self) {
        HashSet::clear(self);
    }

    fn cursor(&mut self) -> Box<dyn RemovingCursor<T> + '_> {
        let snapshot = self.iter().cloned().collect();
        Box::new(HashSetCursor {
            set: self,
            snapshot,
            next: 0,
            current: None,
        })
    }
}

/// Whether `BTreeSet::range` accepts `(lower, upper)` without panicking.
fn is_valid_range<T: Ord>(lower: Bound<&T>, upper: Bound<&T>) -> bool {
    match (lower, upper) {
        (Bound::Excluded(start), Bound::Excluded(end)) => start < end,
        (
            Bound::Included(start) | Bound::Excluded(start),
            Bound::Included(end) | Bound::Excluded(end),
        ) => start <= end,
        _ => true,
    }
}

fn as_ref_bound<T>(bound: &Bound<T>) -> Bound<&T> {
    match bound {
        Bound::Included(value) => Bound::Included(value),
        Bound::Excluded(value) => Bound::Excluded(value),
        Bound::Unbounded => Bound::Unbounded,
    }
}

/// Removing cursor over a bounded range of a B-tree set, resuming after the last produced
/// element so removals never invalidate it.
struct BTreeCursor<'a, T> {
    set: &'a mut BTreeSet<T>,
    lower: Bound<T>,
    upper: Bound<T>,
    last: Option<T>,
    removable: bool,
}

impl<T: Ord + Clone> RemovingCursor<T> for BTreeCursor<'_, T> {
    fn next(&mut self) -> Option<&T> {
        let start = match &self.last {
            Some(last) => Bound::Excluded(last),
            None => as_ref_bound(&self.lower),
        };
        let end = as_ref_bound(&self.upper);
        let next = if is_valid_range(start, end) {
            self.set.range((start, end)).next().cloned()
        } else {
            None
        };
        let value = next?;
        self.last = Some(value);
        self.removable = true;
        self.last.as_ref()
    }

    fn remove(&mut self) -> Option<T> {
        if !self.removable {
            return None;
        }
        self.removable = false;
        let last = self.last.as_ref()?;
        self.set.take(last)
    }
}

impl<T: Ord + Clone> Collection<T> for BTreeSet<T> {
    const CAPABILITIES: Capabilities = Capabilities::COLLECTION
        .union(Capabilities::SET)
        .union(Capabilities::SORTED_SET);

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        BTreeSet::contains(self, value)
    }

    fn add(&mut self, value: T) -> bool {
        self.insert(value)
    }

    fn remove_value(&mut self, value: &T) -> Option<T> {
        self.take(value)
    }

    fn retain_values(&mut self, keep: &mut dyn FnMut(&T) -> bool) -> bool {
        let before = BTreeSet::len(self);
        self.retain(|value| keep(value));
        BTreeSet::len(self) != before
    }

    fn clear(&mut self) {
        BTreeSet::clear(self);
    }

    fn cursor(&mut self) -> Box<dyn RemovingCursor<T> + '_> {
        self.range_cursor(Bound::Unbounded, Bound::Unbounded)
    }
}

impl<T: Ord + Clone> SortedSet<T> for BTreeSet<T> {
    fn first(&self) -> Option<&T> {
        BTreeSet::first(self)
    }

    fn last(&self) -> Option<&T> {
        BTreeSet::last(self)
    }

    fn range_values(&self, lower: Bound<&T>, upper: Bound<&T>) -> Vec<&T> {
        if !is_valid_range(lower, upper) {
            return Vec::new();
        }
        self.range((lower, upper)).collect()
    }

    fn range_len(&self, lower: Bound<&T>, upper: Bound<&T>) -> usize {
        if !is_valid_range(lower, upper) {
            return 0;
        }
        self.range((lower, upper)).count()
    }

    fn range_cursor(
        &mut self,
        lower: Bound<T>,
        upper: Bound<T>,
    ) -> Box<dyn RemovingCursor<T> + '_> {
        Box::new(BTreeCursor {
            set: self,
            lower,
            upper,
            last: None,
            removable: false,
        })
    }
}
