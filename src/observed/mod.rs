//! Decorated containers.
//!
//! [`Observed`] wraps a container implementing the [`crate::container`] collaborator traits
//! and routes every mutation through its root [`Handler`]. Which operations are available
//! depends on the capabilities of the wrapped container: a `Vec` gains the list operations,
//! a `VecDeque` gains `remove_next`, a `BTreeSet` gains sorted views, and so on.
//!
//! Every mutating operation follows the same steps:
//!
//! 1. validate arguments (out-of-range indices fail before any hook runs)
//! 2. `pre_*` on the handler; a veto returns the unchanged result
//! 3. perform the mutation on the wrapped container
//! 4. `post_*` on the handler with the genuine outcome
//! 5. return the outcome
//!
//! # Views
//!
//! [`Observed::sub_list`] and the sorted-set views borrow the decorated container mutably and
//! get a view handler of their own. Events raised through a view reach the root hooks in root
//! coordinates, stamped with the view's identity.
//!
//! # Examples
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use modscope::{EventKind, Observed, StandardListener};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&log);
//! let listener = StandardListener::<i32>::post(move |event| {
//!     sink.borrow_mut().push((event.kind(), event.index()));
//! });
//!
//! let mut list = Observed::decorate(vec![1, 2, 3, 4, 5], Some(&listener.into_listener()))?;
//! list.sub_list(1, 4)?.add_at(0, 9)?;
//! assert_eq!(list.inner(), &vec![1, 9, 2, 3, 4, 5]);
//! assert_eq!(*log.borrow(), vec![(EventKind::AddIndexed, Some(1))]);
//! # Ok::<(), modscope::Error>(())
//! ```

mod bag;
mod buffer;
mod collection;
mod iter;
mod list;
mod sorted;
mod sublist;

use std::{fmt, rc::Rc};

use crate::{
    config::ObservationConfig,
    container::Collection,
    factory::{HandlerFactoryRegistry, Listener},
    handler::Handler,
    identity::ContainerId,
    Result,
};

pub use iter::{ObservedIter, ObservedListIter};
pub use sorted::ObservedSortedView;
pub use sublist::ObservedSubList;

/// A container whose modifications are observed through a root [`Handler`].
pub struct Observed<T, C> {
    inner: C,
    handler: Rc<Handler<T>>,
    id: ContainerId,
}

impl<T: 'static, C: Collection<T>> Observed<T, C> {
    /// Decorates `inner`, resolving `listener` through the global registry for `T`.
    ///
    /// Without a listener the container gets a handler backed by
    /// [`StandardHooks`](crate::StandardHooks), ready for listener registration.
    ///
    /// # Errors
    ///
    /// [`Error::UnrecognizedListener`](crate::Error::UnrecognizedListener) if no registered
    /// factory understands `listener`.
    pub fn decorate(inner: C, listener: Option<&Listener>) -> Result<Self> {
        Self::decorate_with(
            &HandlerFactoryRegistry::global(),
            inner,
            listener,
            ObservationConfig::default(),
        )
    }

    /// Decorates `inner`, resolving `listener` through `registry` with `config`.
    ///
    /// # Errors
    ///
    /// [`Error::UnrecognizedListener`](crate::Error::UnrecognizedListener) if no factory of
    /// `registry` understands `listener`.
    pub fn decorate_with(
        registry: &HandlerFactoryRegistry<T>,
        inner: C,
        listener: Option<&Listener>,
        config: ObservationConfig,
    ) -> Result<Self> {
        let id = ContainerId::next();
        let handler = registry.resolve(id, listener, config)?;
        Self::bind(inner, handler, id)
    }
}

impl<T, C: Collection<T>> Observed<T, C> {
    /// Decorates `inner` with a prebuilt, unbound root handler.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyBound`](crate::Error::AlreadyBound) if `handler` already serves another
    /// container.
    pub fn with_handler(inner: C, handler: Handler<T>) -> Result<Self> {
        Self::bind(inner, handler, ContainerId::next())
    }

    fn bind(inner: C, handler: Handler<T>, id: ContainerId) -> Result<Self> {
        handler.bind(id, C::CAPABILITIES)?;
        Ok(Observed {
            inner,
            handler: Rc::new(handler),
            id,
        })
    }

    /// The wrapped container.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Removes the decoration and returns the wrapped container.
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// The root handler.
    pub fn handler(&self) -> &Rc<Handler<T>> {
        &self.handler
    }

    /// The identity reported as `observed` by every event of this container.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether `value` is contained.
    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }
}

impl<T, C: fmt::Debug> fmt::Debug for Observed<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
