//! The boundary to the containers being decorated.
//!
//! `modscope` does not implement containers. It decorates any type implementing the
//! collaborator traits below, chosen by the capabilities the container offers:
//!
//! - [`Collection`] - add/remove by value, batch operations, clear, removing iteration
//! - [`List`] - positional access on top of [`Collection`]
//! - [`Bag`] - counted multiset operations
//! - [`Buffer`] - removal of the next element in the container's own order
//! - [`SortedSet`] - ordered access and bounded ranges
//!
//! Adapters for the standard library containers are provided: `Vec` (list), `VecDeque`
//! (buffer), `HashSet` (set) and `BTreeSet` (sorted set).
//!
//! Every collaborator declares its [`Capabilities`]; decorated containers pass them to their
//! handler when binding it, which in turn determines the kinds the handler can raise.

mod std_impls;

use std::ops::Bound;

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    /// The capability set of a decorated container
    pub struct Capabilities: u32 {
        /// Add/remove by value, batch operations, clear and removing iteration
        const COLLECTION = 0x0001;
        /// Unique elements
        const SET = 0x0002;
        /// Positional access
        const LIST = 0x0004;
        /// Counted elements
        const BAG = 0x0008;
        /// Removal of the next element
        const BUFFER = 0x0010;
        /// Ordered elements with bounded ranges
        const SORTED_SET = 0x0020;
    }
}

/// A forward cursor that can remove the element it last produced.
///
/// Unlike [`Iterator`], `next` lends the element: the reference is only valid until the cursor
/// is advanced or asked to remove.
pub trait RemovingCursor<T> {
    /// Advances to the next element.
    fn next(&mut self) -> Option<&T>;

    /// Removes the element last produced by `next` and returns it.
    ///
    /// Returns `None` if `next` has not produced an element since the last removal.
    fn remove(&mut self) -> Option<T>;
}

/// The base capability of every decorated container.
pub trait Collection<T> {
    /// The capabilities of this container type.
    const CAPABILITIES: Capabilities;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the container is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` is contained.
    fn contains(&self, value: &T) -> bool;

    /// Adds `value`. Returns whether the container changed.
    fn add(&mut self, value: T) -> bool;

    /// Adds every element of `values`. Returns whether the container changed.
    fn add_all(&mut self, values: Vec<T>) -> bool {
        values
            .into_iter()
            .fold(false, |changed, value| self.add(value) || changed)
    }

    /// Removes one occurrence of `value` and returns the removed element.
    fn remove_value(&mut self, value: &T) -> Option<T>;

    /// Keeps only the elements for which `keep` returns true. Returns whether any was removed.
    fn retain_values(&mut self, keep: &mut dyn FnMut(&T) -> bool) -> bool;

    /// Removes every element.
    fn clear(&mut self);

    /// A removing cursor over every element.
    fn cursor(&mut self) -> Box<dyn RemovingCursor<T> + '_>;
}

/// Positional access.
///
/// Index arguments are validated by the decorator before these methods are called:
/// `index <= len()` for insertions, `index < len()` otherwise.
pub trait List<T>: Collection<T> {
    /// The element at `index`.
    fn get(&self, index: usize) -> Option<&T>;

    /// Inserts `value` at `index`, shifting later elements.
    fn insert_at(&mut self, index: usize, value: T);

    /// Inserts `values` at `index`, preserving their order. Returns whether the list changed.
    fn insert_all_at(&mut self, index: usize, values: Vec<T>) -> bool {
        let changed = !values.is_empty();
        for (position, value) in values.into_iter().enumerate() {
            self.insert_at(index + position, value);
        }
        changed
    }

    /// Removes and returns the element at `index`.
    fn remove_at(&mut self, index: usize) -> T;

    /// Replaces the element at `index` and returns the previous one.
    fn set_at(&mut self, index: usize, value: T) -> T;

    /// Removes every element in `from..to`.
    fn remove_range(&mut self, from: usize, to: usize) {
        for index in (from..to).rev() {
            self.remove_at(index);
        }
    }
}

/// A multiset counting occurrences of equal elements.
pub trait Bag<T>: Collection<T> {
    /// Number of occurrences of `value`.
    fn count(&self, value: &T) -> usize;

    /// Adds `copies` occurrences of `value`.
    ///
    /// The returned flag is implementation-defined. Many bags report `true` unconditionally,
    /// which is why decorators do not rely on it.
    fn add_copies(&mut self, value: T, copies: u32) -> bool;

    /// Removes up to `copies` occurrences of `value`. Returns whether any was removed.
    fn remove_copies(&mut self, value: &T, copies: u32) -> bool;
}

/// A container with a well-defined next element to remove (FIFO queue, priority queue, ...).
pub trait Buffer<T>: Collection<T> {
    /// The next element without removing it.
    fn peek_next(&self) -> Option<&T>;

    /// Removes and returns the next element.
    fn remove_next(&mut self) -> Option<T>;
}

/// A set ordered by `T: Ord`, supporting bounded ranges.
pub trait SortedSet<T: Ord>: Collection<T> {
    /// The smallest element.
    fn first(&self) -> Option<&T>;

    /// The largest element.
    fn last(&self) -> Option<&T>;

    /// The elements inside `(lower, upper)`, in ascending order.
    fn range_values(&self, lower: Bound<&T>, upper: Bound<&T>) -> Vec<&T>;

    /// Number of elements inside `(lower, upper)`.
    fn range_len(&self, lower: Bound<&T>, upper: Bound<&T>) -> usize {
        self.range_values(lower, upper).len()
    }

    /// A removing cursor over the elements inside `(lower, upper)`.
    fn range_cursor(
        &mut self,
        lower: Bound<T>,
        upper: Bound<T>,
    ) -> Box<dyn RemovingCursor<T> + '_>;
}
