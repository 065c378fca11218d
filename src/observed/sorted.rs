//! Ordered access and bounded views of decorated sorted sets.

use std::{
    fmt,
    ops::{Bound, RangeBounds},
    rc::Rc,
};

use crate::{
    container::SortedSet,
    handler::Handler,
    identity::ContainerId,
    observed::ObservedIter,
    Error, Result,
};

use super::Observed;

type Range<T> = (Bound<T>, Bound<T>);

/// The tighter of two lower bounds.
fn tighter_lower<T: Ord>(a: Bound<T>, b: Bound<T>) -> Bound<T> {
    let keep_a = match (&a, &b) {
        (_, Bound::Unbounded) => true,
        (Bound::Unbounded, _) => false,
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x > y || (x == y && matches!(a, Bound::Excluded(_)))
        }
    };
    if keep_a {
        a
    } else {
        b
    }
}

/// The tighter of two upper bounds.
fn tighter_upper<T: Ord>(a: Bound<T>, b: Bound<T>) -> Bound<T> {
    let keep_a = match (&a, &b) {
        (_, Bound::Unbounded) => true,
        (Bound::Unbounded, _) => false,
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x < y || (x == y && matches!(a, Bound::Excluded(_)))
        }
    };
    if keep_a {
        a
    } else {
        b
    }
}

impl<T: Ord + Clone, C: SortedSet<T>> Observed<T, C> {
    /// The smallest element.
    pub fn first(&self) -> Option<&T> {
        self.inner.first()
    }

    /// The largest element.
    pub fn last(&self) -> Option<&T> {
        self.inner.last()
    }

    /// A view of the elements within `(lower, upper)`.
    ///
    /// # Errors
    ///
    /// [`Error::ViewDepthExceeded`] if the configuration forbids views.
    pub fn range(
        &mut self,
        lower: Bound<T>,
        upper: Bound<T>,
    ) -> Result<ObservedSortedView<'_, T, C>> {
        ObservedSortedView::new(
            &mut self.inner,
            &self.handler,
            (Bound::Unbounded, Bound::Unbounded),
            (lower, upper),
        )
    }

    /// A view of the elements in `from..to`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `from > to`
    /// - [`Error::ViewDepthExceeded`] if the configuration forbids views
    pub fn sub_set(&mut self, from: T, to: T) -> Result<ObservedSortedView<'_, T, C>> {
        if from > to {
            return Err(invalid_argument!("sub-set start is after its end"));
        }
        self.range(Bound::Included(from), Bound::Excluded(to))
    }

    /// A view of the elements strictly less than `to`.
    ///
    /// # Errors
    ///
    /// [`Error::ViewDepthExceeded`] if the configuration forbids views.
    pub fn head_set(&mut self, to: T) -> Result<ObservedSortedView<'_, T, C>> {
        self.range(Bound::Unbounded, Bound::Excluded(to))
    }

    /// A view of the elements greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// [`Error::ViewDepthExceeded`] if the configuration forbids views.
    pub fn tail_set(&mut self, from: T) -> Result<ObservedSortedView<'_, T, C>> {
        self.range(Bound::Included(from), Bound::Unbounded)
    }
}

/// A bounded view of a decorated sorted set.
///
/// The view holds a keyed-view handler: its events reach the root hooks stamped with the view's
/// identity, and carry no index translation. Elements outside the bounds are invisible to the
/// view; adding one fails with [`Error::KeyOutOfRange`].
pub struct ObservedSortedView<'a, T, C> {
    set: &'a mut C,
    handler: Rc<Handler<T>>,
    id: ContainerId,
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<'a, T: Ord + Clone, C: SortedSet<T>> ObservedSortedView<'a, T, C> {
    /// Creates the view of `requested` within `parent_range`, served by a child of `parent`.
    fn new(
        set: &'a mut C,
        parent: &Rc<Handler<T>>,
        parent_range: Range<T>,
        requested: Range<T>,
    ) -> Result<Self> {
        let handler = parent.make_keyed_view_handler()?;
        let id = ContainerId::next();
        handler.bind(id, C::CAPABILITIES)?;

        Ok(ObservedSortedView {
            set,
            handler,
            id,
            lower: tighter_lower(parent_range.0, requested.0),
            upper: tighter_upper(parent_range.1, requested.1),
        })
    }

    fn bounds(&self) -> (Bound<&T>, Bound<&T>) {
        (self.lower.as_ref(), self.upper.as_ref())
    }

    /// The identity reported as `view` by events raised through this view.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The view handler.
    pub fn handler(&self) -> &Rc<Handler<T>> {
        &self.handler
    }

    /// Whether `value` lies within the bounds of the view.
    pub fn in_range(&self, value: &T) -> bool {
        self.bounds().contains(value)
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        let (lower, upper) = self.bounds();
        self.set.range_len(lower, upper)
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the view contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.in_range(value) && self.set.contains(value)
    }

    /// The elements of the view in ascending order.
    pub fn values(&self) -> Vec<&T> {
        let (lower, upper) = self.bounds();
        self.set.range_values(lower, upper)
    }

    /// The smallest element of the view.
    pub fn first(&self) -> Option<&T> {
        self.values().first().copied()
    }

    /// The largest element of the view.
    pub fn last(&self) -> Option<&T> {
        self.values().last().copied()
    }

    fn check_range(&self, value: &T) -> Result<()> {
        if self.in_range(value) {
            Ok(())
        } else {
            Err(Error::KeyOutOfRange)
        }
    }

    /// Adds `value`. Returns whether the set changed; `false` if vetoed.
    ///
    /// # Errors
    ///
    /// [`Error::KeyOutOfRange`] if `value` lies outside the view, before any hook runs.
    pub fn add(&mut self, value: T) -> Result<bool> {
        self.check_range(&value)?;
        if !self.handler.pre_add(self.set.len(), &value)? {
            return Ok(false);
        }
        let modified = self.set.add(value.clone());
        self.handler.post_add(self.set.len(), &value, modified)?;
        Ok(modified)
    }

    /// Adds every element of `values`. Returns whether the set changed.
    ///
    /// # Errors
    ///
    /// [`Error::KeyOutOfRange`] if any value lies outside the view, before any hook runs.
    pub fn add_all(&mut self, values: Vec<T>) -> Result<bool> {
        values
            .iter()
            .try_for_each(|value| self.check_range(value))?;
        if !self.handler.pre_add_all(self.set.len(), &values)? {
            return Ok(false);
        }
        let modified = self.set.add_all(values.clone());
        self.handler
            .post_add_all(self.set.len(), &values, modified)?;
        Ok(modified)
    }

    /// Removes `value`. Values outside the view are absent from it: the pre event fires, the
    /// set is left untouched and no post event follows.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        if !self.handler.pre_remove(self.set.len(), value)? {
            return Ok(false);
        }
        let removed = if self.in_range(value) {
            self.set.remove_value(value)
        } else {
            None
        };
        self.handler
            .post_remove(self.set.len(), value, removed.as_ref())?;
        Ok(removed.is_some())
    }

    fn retain_in_view(&mut self, mut keep: impl FnMut(&T) -> bool) -> bool {
        let mut cursor = self
            .set
            .range_cursor(self.lower.clone(), self.upper.clone());
        let mut modified = false;
        while let Some(element) = cursor.next() {
            if !keep(element) {
                modified |= cursor.remove().is_some();
            }
        }
        modified
    }

    /// Removes every element of the view equal to one in `values`.
    pub fn remove_all(&mut self, values: &[T]) -> Result<bool> {
        if !self.handler.pre_remove_all(self.set.len(), values)? {
            return Ok(false);
        }
        let modified = self.retain_in_view(|element| !values.contains(element));
        self.handler
            .post_remove_all(self.set.len(), values, modified)?;
        Ok(modified)
    }

    /// Removes every element of the view not equal to one in `values`.
    pub fn retain_all(&mut self, values: &[T]) -> Result<bool> {
        if !self.handler.pre_retain_all(self.set.len(), values)? {
            return Ok(false);
        }
        let modified = self.retain_in_view(|element| values.contains(element));
        self.handler
            .post_retain_all(self.set.len(), values, modified)?;
        Ok(modified)
    }

    /// Removes every element of the view from the set.
    pub fn clear(&mut self) -> Result<bool> {
        if !self.handler.pre_clear(self.set.len())? {
            return Ok(false);
        }
        let modified = self.retain_in_view(|_| false);
        self.handler.post_clear(self.set.len(), modified)?;
        Ok(modified)
    }

    /// A removing iterator over the view, in ascending order.
    pub fn iter(&mut self) -> ObservedIter<'_, T> {
        let size = self.set.len();
        let cursor = self
            .set
            .range_cursor(self.lower.clone(), self.upper.clone());
        ObservedIter::new(cursor, &self.handler, size)
    }

    /// A view of the elements of this view within `(lower, upper)`.
    ///
    /// The resulting bounds are the intersection of both ranges.
    ///
    /// # Errors
    ///
    /// [`Error::ViewDepthExceeded`] if the view would nest too deeply.
    pub fn range(
        &mut self,
        lower: Bound<T>,
        upper: Bound<T>,
    ) -> Result<ObservedSortedView<'_, T, C>> {
        ObservedSortedView::new(
            &mut *self.set,
            &self.handler,
            (self.lower.clone(), self.upper.clone()),
            (lower, upper),
        )
    }

    /// A view of the elements of this view in `from..to`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `from > to`
    /// - [`Error::ViewDepthExceeded`] if the view would nest too deeply
    pub fn sub_set(&mut self, from: T, to: T) -> Result<ObservedSortedView<'_, T, C>> {
        if from > to {
            return Err(invalid_argument!("sub-set start is after its end"));
        }
        self.range(Bound::Included(from), Bound::Excluded(to))
    }

    /// A view of the elements of this view strictly less than `to`.
    ///
    /// # Errors
    ///
    /// [`Error::ViewDepthExceeded`] if the view would nest too deeply.
    pub fn head_set(&mut self, to: T) -> Result<ObservedSortedView<'_, T, C>> {
        self.range(Bound::Unbounded, Bound::Excluded(to))
    }

    /// A view of the elements of this view greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// [`Error::ViewDepthExceeded`] if the view would nest too deeply.
    pub fn tail_set(&mut self, from: T) -> Result<ObservedSortedView<'_, T, C>> {
        self.range(Bound::Included(from), Bound::Unbounded)
    }
}

impl<T: Ord + Clone + fmt::Debug, C: SortedSet<T>> fmt::Debug for ObservedSortedView<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedSortedView")
            .field("id", &self.id)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("values", &self.values())
            .finish()
    }
}
