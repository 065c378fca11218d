//! The modification protocol engine.
//!
//! A [`Handler`] sits between a decorated container and the parties interested in its
//! modifications. For every mutating operation the decorator calls a `pre_*` method before
//! touching the underlying container and the matching `post_*` method afterwards:
//!
//! ```text
//! caller ── op ──> Observed ── pre_op ──> Handler ── decide ──> hooks
//!                     │  (vetoed: return unchanged)
//!                     ├── real mutation on the wrapped container
//!                     └── post_op(genuine outcome) ──> Handler ── notify ──> hooks
//! ```
//!
//! # Root and view handlers
//!
//! Every decorated container owns a *root* handler holding the [`ModificationHooks`]. Views of
//! that container (`sub_list`, `sub_set`, ...) get a *view* handler instead, created through
//! [`Handler::make_range_view_handler`] or [`Handler::make_keyed_view_handler`]. A view handler
//! stores no listeners. It adds its offset to indices, stamps its own identity into the event
//! and forwards to the root, so application listeners only ever run at the root.
//!
//! View handlers reference their root weakly. A view never keeps the root alive.
//!
//! # Binding
//!
//! A handler is created unbound and bound exactly once to the container it serves. Raising
//! events before binding fails with [`Error::NotBound`]; binding twice fails with
//! [`Error::AlreadyBound`].

mod hooks;
mod view;

use std::{
    cell::{Cell, OnceCell},
    fmt,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};

use crate::{
    config::ObservationConfig,
    container::Capabilities,
    event::{Draft, EventFlags, EventKind, ModificationEvent},
    identity::{ContainerId, SameInstance},
    listener::StandardHooks,
    Error, Result,
};

pub use hooks::{AcceptAll, ModificationHooks, PostListener, PreListener};
use view::ViewState;

/// The container a handler has been bound to.
#[derive(Clone, Copy, Debug)]
struct Binding {
    container: ContainerId,
    capabilities: Capabilities,
}

struct RootState<T> {
    hooks: Rc<dyn ModificationHooks<T>>,
    /// Root size captured by the last pre-phase event, reported again by the post phase.
    pre_size: Cell<usize>,
}

enum HandlerKind<T> {
    Root(RootState<T>),
    RangeView(ViewState<T>),
    KeyedView(ViewState<T>),
}

/// The per-container protocol engine; see the [module documentation](self).
pub struct Handler<T> {
    kind: HandlerKind<T>,
    binding: OnceCell<Binding>,
    depth: usize,
    config: ObservationConfig,
}

impl<T: 'static> Handler<T> {
    /// Creates an unbound root handler whose hooks accept everything and support no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(Rc::new(AcceptAll))
    }

    /// Creates an unbound root handler backed by a fresh [`StandardHooks`].
    #[must_use]
    pub fn standard() -> Self {
        Self::standard_with_config(ObservationConfig::default())
    }

    /// Creates an unbound root handler backed by a fresh [`StandardHooks`] using `config`.
    #[must_use]
    pub fn standard_with_config(config: ObservationConfig) -> Self {
        Self::with_config(Rc::new(StandardHooks::with_config(config)), config)
    }
}

impl<T: 'static> Default for Handler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Handler<T> {
    /// Creates an unbound root handler with the given hooks and the default configuration.
    #[must_use]
    pub fn with_hooks(hooks: Rc<dyn ModificationHooks<T>>) -> Self {
        Self::with_config(hooks, ObservationConfig::default())
    }

    /// Creates an unbound root handler with the given hooks and configuration.
    #[must_use]
    pub fn with_config(hooks: Rc<dyn ModificationHooks<T>>, config: ObservationConfig) -> Self {
        Handler {
            kind: HandlerKind::Root(RootState {
                hooks,
                pre_size: Cell::new(0),
            }),
            binding: OnceCell::new(),
            depth: 0,
            config,
        }
    }

    /// Binds this handler to the container it serves.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyBound`] if the handler was bound before
    /// - [`Error::InvalidArgument`] if `capabilities` is empty
    pub fn bind(&self, container: ContainerId, capabilities: Capabilities) -> Result<()> {
        if capabilities.is_empty() {
            return Err(invalid_argument!(
                "container {} exposes no capabilities",
                container
            ));
        }
        self.binding
            .set(Binding {
                container,
                capabilities,
            })
            .map_err(|_| Error::AlreadyBound)?;

        debug!(
            %container,
            ?capabilities,
            view = self.is_view(),
            offset = self.view_offset(),
            "handler bound"
        );
        Ok(())
    }

    /// Whether [`bind`](Self::bind) has been called.
    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    fn binding(&self) -> Result<Binding> {
        self.binding.get().copied().ok_or(Error::NotBound)
    }

    /// The container (or view) this handler is bound to.
    pub fn container(&self) -> Option<ContainerId> {
        self.binding.get().map(|binding| binding.container)
    }

    /// The capabilities of the bound container.
    pub fn capabilities(&self) -> Capabilities {
        self.binding
            .get()
            .map_or(Capabilities::empty(), |binding| binding.capabilities)
    }

    /// The kinds the bound container is able to raise.
    pub fn supported_kinds(&self) -> EventFlags {
        EventFlags::for_capabilities(self.capabilities())
    }

    /// Whether this is a root handler.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, HandlerKind::Root(_))
    }

    /// Whether this handler serves a view.
    pub fn is_view(&self) -> bool {
        !self.is_root()
    }

    /// Start of the served view in root coordinates; `0` for root and keyed-view handlers.
    pub fn view_offset(&self) -> usize {
        match &self.kind {
            HandlerKind::Root(_) | HandlerKind::KeyedView(_) => 0,
            HandlerKind::RangeView(view) => view.offset,
        }
    }

    /// Nesting depth below the root; `0` for a root handler.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The configuration shared by the root and all of its views.
    pub fn config(&self) -> &ObservationConfig {
        &self.config
    }

    /// The root handler, or `None` for a view whose root has been dropped.
    ///
    /// For a root handler this is `self`.
    pub fn root(self: &Rc<Self>) -> Option<Rc<Handler<T>>> {
        match &self.kind {
            HandlerKind::Root(_) => Some(Rc::clone(self)),
            HandlerKind::RangeView(view) | HandlerKind::KeyedView(view) => view.root.upgrade(),
        }
    }

    /// The hooks of the root handler.
    ///
    /// # Errors
    ///
    /// [`Error::RootDetached`] when called on a view whose root has been dropped.
    pub fn hooks(&self) -> Result<Rc<dyn ModificationHooks<T>>> {
        match &self.kind {
            HandlerKind::Root(root) => Ok(Rc::clone(&root.hooks)),
            HandlerKind::RangeView(view) | HandlerKind::KeyedView(view) => {
                view.upgrade()?.hooks()
            }
        }
    }

    fn root_weak(self: &Rc<Self>) -> Weak<Handler<T>> {
        match &self.kind {
            HandlerKind::Root(_) => Rc::downgrade(self),
            HandlerKind::RangeView(view) | HandlerKind::KeyedView(view) => view.root.clone(),
        }
    }

    fn child_depth(&self) -> Result<usize> {
        let depth = self.depth + 1;
        if depth > self.config.max_view_depth {
            return Err(Error::ViewDepthExceeded(self.config.max_view_depth));
        }
        Ok(depth)
    }

    /// Creates the (unbound) handler of a range view spanning `from..to` of the container this
    /// handler serves.
    ///
    /// The new handler forwards to this handler's root with offset `from + self.view_offset()`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotBound`] if this handler is not bound
    /// - [`Error::InvalidArgument`] if `from > to`
    /// - [`Error::ViewDepthExceeded`] if the view would exceed the configured nesting depth
    pub fn make_range_view_handler(self: &Rc<Self>, from: usize, to: usize) -> Result<Rc<Self>> {
        self.binding()?;
        if from > to {
            return Err(invalid_argument!("view start {} is after view end {}", from, to));
        }
        let depth = self.child_depth()?;
        let offset = from + self.view_offset();

        debug!(from, to, offset, depth, "range view handler created");
        Ok(Rc::new(Handler {
            kind: HandlerKind::RangeView(ViewState {
                root: self.root_weak(),
                offset,
            }),
            binding: OnceCell::new(),
            depth,
            config: self.config,
        }))
    }

    /// Creates the (unbound) handler of a keyed view, such as a sorted sub-set, of the container
    /// this handler serves. Keyed views have no index space and forward with offset `0`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotBound`] if this handler is not bound
    /// - [`Error::ViewDepthExceeded`] if the view would exceed the configured nesting depth
    pub fn make_keyed_view_handler(self: &Rc<Self>) -> Result<Rc<Self>> {
        self.binding()?;
        let depth = self.child_depth()?;

        debug!(depth, "keyed view handler created");
        Ok(Rc::new(Handler {
            kind: HandlerKind::KeyedView(ViewState {
                root: self.root_weak(),
                offset: 0,
            }),
            binding: OnceCell::new(),
            depth,
            config: self.config,
        }))
    }

    /// Registers a pre-listener with the root hooks.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the root hooks do not manage listeners.
    pub fn add_pre_listener(&self, listener: PreListener<T>, mask: EventFlags) -> Result<()> {
        self.hooks()?.add_pre_listener(listener, mask)
    }

    /// Unregisters a pre-listener from the root hooks.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the root hooks do not manage listeners.
    pub fn remove_pre_listener(&self, listener: &PreListener<T>) -> Result<bool> {
        self.hooks()?.remove_pre_listener(listener)
    }

    /// The pre-listeners registered with the root hooks.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the root hooks do not manage listeners.
    pub fn pre_listeners(&self) -> Result<Vec<PreListener<T>>> {
        self.hooks()?.pre_listeners()
    }

    /// Registers a post-listener with the root hooks.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the root hooks do not manage listeners.
    pub fn add_post_listener(&self, listener: PostListener<T>, mask: EventFlags) -> Result<()> {
        self.hooks()?.add_post_listener(listener, mask)
    }

    /// Unregisters a post-listener from the root hooks.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the root hooks do not manage listeners.
    pub fn remove_post_listener(&self, listener: &PostListener<T>) -> Result<bool> {
        self.hooks()?.remove_post_listener(listener)
    }

    /// The post-listeners registered with the root hooks.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the root hooks do not manage listeners.
    pub fn post_listeners(&self) -> Result<Vec<PostListener<T>>> {
        self.hooks()?.post_listeners()
    }

    // Dispatch. Every pre_*/post_* below funnels through these two entry points.

    fn decide<'a>(&'a self, draft: Draft<'a, T>, size: usize) -> Result<bool> {
        let binding = self.binding()?;
        match &self.kind {
            HandlerKind::Root(root) => {
                root.pre_size.set(size);
                let event = ModificationEvent::pre(binding.container, self, draft, size);
                trace!(event = %event, "dispatching");
                let accepted = root.hooks.decide(&event);
                if !accepted {
                    debug!(kind = %event.kind(), container = %binding.container, "modification vetoed");
                }
                Ok(accepted)
            }
            HandlerKind::RangeView(view) | HandlerKind::KeyedView(view) => {
                view.forward_decide(binding.container, draft, size)
            }
        }
    }

    fn notify<'a>(&'a self, draft: Draft<'a, T>, size: usize, modified: bool) -> Result<()> {
        let binding = self.binding()?;
        match &self.kind {
            HandlerKind::Root(root) => {
                let event = ModificationEvent::post(
                    binding.container,
                    self,
                    draft,
                    root.pre_size.get(),
                    size,
                    modified,
                );
                trace!(event = %event, "dispatching");
                root.hooks.notify(&event);
                Ok(())
            }
            HandlerKind::RangeView(view) | HandlerKind::KeyedView(view) => {
                view.forward_notify(binding.container, draft, size, modified)
            }
        }
    }

    /// Index in root coordinates.
    fn at(&self, index: usize) -> usize {
        index + self.view_offset()
    }

    // Add family

    /// Before adding `value`.
    pub fn pre_add(&self, size: usize, value: &T) -> Result<bool> {
        self.decide(Draft::new(EventKind::Add).subject(value), size)
    }

    /// After adding `value`; `modified` is the wrapped container's genuine result.
    pub fn post_add(&self, size: usize, value: &T, modified: bool) -> Result<()> {
        self.notify(Draft::new(EventKind::Add).subject(value), size, modified)
    }

    /// Before inserting `value` at `index`.
    pub fn pre_add_indexed(&self, size: usize, index: usize, value: &T) -> Result<bool> {
        let draft = Draft::new(EventKind::AddIndexed)
            .index(self.at(index))
            .subject(value);
        self.decide(draft, size)
    }

    /// After inserting `value` at `index`. An insertion always modifies the container.
    pub fn post_add_indexed(&self, size: usize, index: usize, value: &T) -> Result<()> {
        let draft = Draft::new(EventKind::AddIndexed)
            .index(self.at(index))
            .subject(value);
        self.notify(draft, size, true)
    }

    /// Before adding `copies` copies of `value`.
    pub fn pre_add_ncopies(&self, size: usize, value: &T, copies: u32) -> Result<bool> {
        let draft = Draft::new(EventKind::AddNCopies)
            .subject(value)
            .repeat(copies);
        self.decide(draft, size)
    }

    /// After adding `copies` copies of `value`.
    pub fn post_add_ncopies(
        &self,
        size: usize,
        value: &T,
        copies: u32,
        modified: bool,
    ) -> Result<()> {
        let draft = Draft::new(EventKind::AddNCopies)
            .subject(value)
            .repeat(copies);
        self.notify(draft, size, modified)
    }

    /// Before inserting `value` through an iterator positioned at `index`.
    pub fn pre_add_iterated(&self, size: usize, index: usize, value: &T) -> Result<bool> {
        let draft = Draft::new(EventKind::AddIterated)
            .index(self.at(index))
            .subject(value);
        self.decide(draft, size)
    }

    /// After inserting `value` through an iterator at `index`.
    pub fn post_add_iterated(&self, size: usize, index: usize, value: &T) -> Result<()> {
        let draft = Draft::new(EventKind::AddIterated)
            .index(self.at(index))
            .subject(value);
        self.notify(draft, size, true)
    }

    /// Before adding every element of `values`.
    pub fn pre_add_all(&self, size: usize, values: &[T]) -> Result<bool> {
        self.decide(Draft::new(EventKind::AddAll).batch(values), size)
    }

    /// After adding every element of `values`.
    pub fn post_add_all(&self, size: usize, values: &[T], modified: bool) -> Result<()> {
        self.notify(Draft::new(EventKind::AddAll).batch(values), size, modified)
    }

    /// Before inserting `values` at `index`.
    pub fn pre_add_all_indexed(&self, size: usize, index: usize, values: &[T]) -> Result<bool> {
        let draft = Draft::new(EventKind::AddAllIndexed)
            .index(self.at(index))
            .batch(values);
        self.decide(draft, size)
    }

    /// After inserting `values` at `index`.
    pub fn post_add_all_indexed(
        &self,
        size: usize,
        index: usize,
        values: &[T],
        modified: bool,
    ) -> Result<()> {
        let draft = Draft::new(EventKind::AddAllIndexed)
            .index(self.at(index))
            .batch(values);
        self.notify(draft, size, modified)
    }

    // Remove family

    /// Before removing `value`. The pre phase never knows whether `value` is present.
    pub fn pre_remove(&self, size: usize, value: &T) -> Result<bool> {
        self.decide(Draft::new(EventKind::Remove).subject(value), size)
    }

    /// After removing `value`; `removed` is the element the container actually gave up.
    ///
    /// When nothing was removed no post event is raised.
    pub fn post_remove(&self, size: usize, value: &T, removed: Option<&T>) -> Result<()> {
        let Some(removed) = removed else {
            trace!(kind = %EventKind::Remove, "element absent, no post event");
            return Ok(());
        };
        let draft = Draft::new(EventKind::Remove)
            .subject(value)
            .previous(Some(removed));
        self.notify(draft, size, true)
    }

    /// Before removing the element at `index`. The element itself is not looked up.
    pub fn pre_remove_indexed(&self, size: usize, index: usize) -> Result<bool> {
        self.decide(
            Draft::new(EventKind::RemoveIndexed).index(self.at(index)),
            size,
        )
    }

    /// After removing `previous` from `index`.
    pub fn post_remove_indexed(&self, size: usize, index: usize, previous: &T) -> Result<()> {
        let draft = Draft::new(EventKind::RemoveIndexed)
            .index(self.at(index))
            .previous(Some(previous));
        self.notify(draft, size, true)
    }

    /// Before removing `copies` copies of `value`.
    pub fn pre_remove_ncopies(&self, size: usize, value: &T, copies: u32) -> Result<bool> {
        let draft = Draft::new(EventKind::RemoveNCopies)
            .subject(value)
            .repeat(copies);
        self.decide(draft, size)
    }

    /// After removing `copies` copies of `value`.
    pub fn post_remove_ncopies(
        &self,
        size: usize,
        value: &T,
        copies: u32,
        modified: bool,
    ) -> Result<()> {
        let draft = Draft::new(EventKind::RemoveNCopies)
            .subject(value)
            .repeat(copies);
        self.notify(draft, size, modified)
    }

    /// Before removing the element an iterator last produced, `value`, at `index`.
    pub fn pre_remove_iterated(&self, size: usize, index: usize, value: &T) -> Result<bool> {
        let draft = Draft::new(EventKind::RemoveIterated)
            .index(self.at(index))
            .subject(value);
        self.decide(draft, size)
    }

    /// After removing `value` through an iterator at `index`.
    pub fn post_remove_iterated(&self, size: usize, index: usize, value: &T) -> Result<()> {
        let draft = Draft::new(EventKind::RemoveIterated)
            .index(self.at(index))
            .subject(value)
            .previous(Some(value));
        self.notify(draft, size, true)
    }

    /// Before removing every element contained in `values`.
    pub fn pre_remove_all(&self, size: usize, values: &[T]) -> Result<bool> {
        self.decide(Draft::new(EventKind::RemoveAll).batch(values), size)
    }

    /// After removing every element contained in `values`.
    pub fn post_remove_all(&self, size: usize, values: &[T], modified: bool) -> Result<()> {
        self.notify(Draft::new(EventKind::RemoveAll).batch(values), size, modified)
    }

    /// Before removing every element not contained in `values`.
    pub fn pre_retain_all(&self, size: usize, values: &[T]) -> Result<bool> {
        self.decide(Draft::new(EventKind::RetainAll).batch(values), size)
    }

    /// After removing every element not contained in `values`.
    pub fn post_retain_all(&self, size: usize, values: &[T], modified: bool) -> Result<()> {
        self.notify(Draft::new(EventKind::RetainAll).batch(values), size, modified)
    }

    /// Before removing every element.
    pub fn pre_clear(&self, size: usize) -> Result<bool> {
        self.decide(Draft::new(EventKind::Clear), size)
    }

    /// After removing every element; `modified` is false when the container was already empty.
    pub fn post_clear(&self, size: usize, modified: bool) -> Result<()> {
        self.notify(Draft::new(EventKind::Clear), size, modified)
    }

    /// Before removing the head of a buffer. The head is not looked up.
    pub fn pre_remove_next(&self, size: usize) -> Result<bool> {
        self.decide(Draft::new(EventKind::RemoveNext), size)
    }

    /// After removing the head of a buffer.
    ///
    /// When the buffer was empty no post event is raised.
    pub fn post_remove_next(&self, size: usize, removed: Option<&T>) -> Result<()> {
        let Some(removed) = removed else {
            trace!(kind = %EventKind::RemoveNext, "buffer empty, no post event");
            return Ok(());
        };
        let draft = Draft::new(EventKind::RemoveNext).previous(Some(removed));
        self.notify(draft, size, true)
    }

    // Set family

    /// Before replacing the element at `index` with `value`. The current element is not
    /// looked up.
    pub fn pre_set_indexed(&self, size: usize, index: usize, value: &T) -> Result<bool> {
        let draft = Draft::new(EventKind::SetIndexed)
            .index(self.at(index))
            .subject(value);
        self.decide(draft, size)
    }

    /// Before replacing the element an iterator last produced, at `index`, with `value`.
    pub fn pre_set_iterated(&self, size: usize, index: usize, value: &T) -> Result<bool> {
        let draft = Draft::new(EventKind::SetIterated)
            .index(self.at(index))
            .subject(value);
        self.decide(draft, size)
    }
}

impl<T: SameInstance> Handler<T> {
    /// After replacing `previous` at `index` with `value`.
    ///
    /// `modified` is decided by instance identity, not equality; see [`SameInstance`].
    pub fn post_set_indexed(
        &self,
        size: usize,
        index: usize,
        value: &T,
        previous: &T,
    ) -> Result<()> {
        let draft = Draft::new(EventKind::SetIndexed)
            .index(self.at(index))
            .subject(value)
            .previous(Some(previous));
        self.notify(draft, size, !value.same_instance(previous))
    }

    /// After replacing `previous` with `value` through an iterator at `index`.
    ///
    /// `modified` is decided by instance identity, not equality; see [`SameInstance`].
    pub fn post_set_iterated(
        &self,
        size: usize,
        index: usize,
        value: &T,
        previous: &T,
    ) -> Result<()> {
        let draft = Draft::new(EventKind::SetIterated)
            .index(self.at(index))
            .subject(value)
            .previous(Some(previous));
        self.notify(draft, size, !value.same_instance(previous))
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            HandlerKind::Root(_) => "Root",
            HandlerKind::RangeView(_) => "RangeView",
            HandlerKind::KeyedView(_) => "KeyedView",
        };
        f.debug_struct("Handler")
            .field("kind", &kind)
            .field("container", &self.container())
            .field("view_offset", &self.view_offset())
            .field("depth", &self.depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        listener::{post_listener, pre_listener},
        test::RecordingHooks,
    };

    fn bound_root(hooks: &Rc<RecordingHooks<i32>>) -> Rc<Handler<i32>> {
        let handler = Rc::new(Handler::with_hooks(hooks.clone()));
        handler
            .bind(ContainerId::next(), Capabilities::COLLECTION | Capabilities::LIST)
            .unwrap();
        handler
    }

    #[test]
    fn test_bind_once() {
        let handler: Handler<i32> = Handler::new();
        assert!(!handler.is_bound());
        handler
            .bind(ContainerId::next(), Capabilities::COLLECTION)
            .unwrap();
        assert!(handler.is_bound());
        assert!(matches!(
            handler.bind(ContainerId::next(), Capabilities::COLLECTION),
            Err(Error::AlreadyBound)
        ));
    }

    #[test]
    fn test_bind_rejects_empty_capabilities() {
        let handler: Handler<i32> = Handler::new();
        assert!(matches!(
            handler.bind(ContainerId::next(), Capabilities::empty()),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(!handler.is_bound());
    }

    #[test]
    fn test_supported_kinds_follow_capabilities() {
        use std::collections::{BTreeSet, VecDeque};

        use crate::container::Collection;

        fn bound<C: Collection<i32>>() -> Handler<i32> {
            let handler = Handler::new();
            handler.bind(ContainerId::next(), C::CAPABILITIES).unwrap();
            handler
        }

        assert_eq!(Handler::<i32>::new().supported_kinds(), EventFlags::empty());

        let list = bound::<Vec<i32>>().supported_kinds();
        assert_eq!(list, EventFlags::FROM_LIST);
        assert!(list.matches(EventKind::SetIterated));
        assert!(!list.matches(EventKind::RemoveNext));

        let set = bound::<BTreeSet<i32>>().supported_kinds();
        assert_eq!(set, EventFlags::FROM_SORTED_SET);
        assert!(!set.matches(EventKind::AddIndexed));

        let buffer = bound::<VecDeque<i32>>().supported_kinds();
        assert_eq!(buffer, EventFlags::FROM_BUFFER);
        assert!(buffer.matches(EventKind::RemoveNext));
        assert!(!buffer.matches(EventKind::AddNCopies));
    }

    #[test]
    fn test_unbound_handler_refuses_events() {
        let handler: Handler<i32> = Handler::new();
        assert!(matches!(handler.pre_add(0, &1), Err(Error::NotBound)));
        assert!(matches!(handler.post_clear(0, true), Err(Error::NotBound)));
    }

    #[test]
    fn test_add_events() {
        let hooks = Rc::new(RecordingHooks::default());
        let handler = bound_root(&hooks);

        assert!(handler.pre_add(0, &6).unwrap());
        handler.post_add(1, &6, true).unwrap();

        let events = hooks.events();
        assert_eq!(events.len(), 2);
        let (pre, post) = (&events[0], &events[1]);
        assert_eq!(pre.kind, EventKind::Add);
        assert_eq!(pre.index, None);
        assert_eq!(pre.subject, Some(6));
        assert_eq!(pre.repeat, 1);
        assert_eq!(pre.pre_size, 0);
        assert_eq!(pre.post_size, None);
        assert_eq!(pre.modified, None);
        assert_eq!(post.modified, Some(true));
        assert_eq!(post.post_size, Some(1));
        assert_eq!(post.pre_size, 0);
    }

    #[test]
    fn test_veto_is_returned() {
        let hooks = Rc::new(RecordingHooks::vetoing(EventFlags::REMOVE_GROUP));
        let handler = bound_root(&hooks);
        assert!(!handler.pre_remove(3, &1).unwrap());
        assert!(handler.pre_add(3, &1).unwrap());
    }

    #[test]
    fn test_remove_without_element_raises_no_post_event() {
        let hooks = Rc::new(RecordingHooks::default());
        let handler = bound_root(&hooks);
        assert!(handler.pre_remove(2, &9).unwrap());
        handler.post_remove(2, &9, None).unwrap();
        let events = hooks.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].previous, None);
    }

    #[test]
    fn test_indexed_pre_hooks_skip_previous() {
        let hooks = Rc::new(RecordingHooks::default());
        let handler = bound_root(&hooks);
        handler.pre_remove_indexed(3, 1).unwrap();
        handler.post_remove_indexed(2, 1, &7).unwrap();
        handler.pre_set_indexed(2, 0, &4).unwrap();
        handler.post_set_indexed(2, 0, &4, &3).unwrap();

        let events = hooks.events();
        assert_eq!(events[0].previous, None);
        assert_eq!(events[1].previous, Some(7));
        assert_eq!(events[2].previous, None);
        assert_eq!(events[3].previous, Some(3));
        assert_eq!(events[3].modified, Some(true));
    }

    #[test]
    fn test_set_compares_instances() {
        let hooks: Rc<RecordingHooks<Rc<&str>>> = Rc::new(RecordingHooks::default());
        let handler = Rc::new(Handler::with_hooks(hooks.clone()));
        handler
            .bind(ContainerId::next(), Capabilities::COLLECTION | Capabilities::LIST)
            .unwrap();

        let a = Rc::new("a");
        let equal = Rc::new("a");
        handler.post_set_indexed(1, 0, &a, &Rc::clone(&a)).unwrap();
        handler.post_set_indexed(1, 0, &a, &equal).unwrap();
        let events = hooks.events();
        assert_eq!(events[0].modified, Some(false));
        assert_eq!(events[1].modified, Some(true));
    }

    #[test]
    fn test_ncopies_and_batches() {
        let hooks = Rc::new(RecordingHooks::default());
        let handler = bound_root(&hooks);
        handler.pre_add_ncopies(0, &5, 3).unwrap();
        handler.pre_add_all(0, &[1, 2]).unwrap();
        let events = hooks.events();
        assert_eq!(events[0].repeat, 3);
        assert_eq!(events[1].batch, Some(vec![1, 2]));
        assert_eq!(events[1].repeat, 1);
        assert_eq!(events[1].subject, None);
    }

    #[test]
    fn test_range_view_translates_and_forwards() {
        let hooks = Rc::new(RecordingHooks::default());
        let root = bound_root(&hooks);
        let view = root.make_range_view_handler(2, 5).unwrap();
        let view_id = ContainerId::next();
        view.bind(view_id, root.capabilities()).unwrap();

        assert!(view.is_view());
        assert_eq!(view.view_offset(), 2);
        assert_eq!(view.depth(), 1);

        view.pre_add_indexed(10, 1, &42).unwrap();
        let events = hooks.events();
        assert_eq!(events[0].index, Some(3));
        assert_eq!(events[0].view, Some(view_id));
        assert_eq!(events[0].view_offset, Some(2));
        assert_eq!(events[0].observed, root.container().unwrap());

        let nested = view.make_range_view_handler(1, 2).unwrap();
        nested.bind(ContainerId::next(), root.capabilities()).unwrap();
        assert_eq!(nested.view_offset(), 3);
        nested.pre_remove_indexed(10, 0).unwrap();
        assert_eq!(hooks.events()[1].index, Some(3));
        assert_eq!(hooks.events()[1].view_offset, Some(3));
    }

    #[test]
    fn test_keyed_view_forwards_identity_only() {
        let hooks = Rc::new(RecordingHooks::default());
        let root = bound_root(&hooks);
        let view = root.make_keyed_view_handler().unwrap();
        let view_id = ContainerId::next();
        view.bind(view_id, Capabilities::COLLECTION | Capabilities::SORTED_SET)
            .unwrap();
        view.pre_add(4, &1).unwrap();
        let events = hooks.events();
        assert_eq!(events[0].view, Some(view_id));
        assert_eq!(events[0].view_offset, Some(0));
        assert_eq!(events[0].index, None);
    }

    #[test]
    fn test_view_factories_validate() {
        let hooks = Rc::new(RecordingHooks::default());
        let root = bound_root(&hooks);
        assert!(matches!(
            root.make_range_view_handler(3, 1),
            Err(Error::InvalidArgument { .. })
        ));

        let unbound: Rc<Handler<i32>> = Rc::new(Handler::new());
        assert!(matches!(
            unbound.make_keyed_view_handler(),
            Err(Error::NotBound)
        ));

        let flat = Rc::new(Handler::<i32>::with_config(
            Rc::new(AcceptAll),
            ObservationConfig::minimal(),
        ));
        flat.bind(ContainerId::next(), Capabilities::COLLECTION)
            .unwrap();
        assert!(matches!(
            flat.make_keyed_view_handler(),
            Err(Error::ViewDepthExceeded(0))
        ));
    }

    #[test]
    fn test_view_outliving_root() {
        let hooks = Rc::new(RecordingHooks::default());
        let root = bound_root(&hooks);
        let view = root.make_range_view_handler(0, 1).unwrap();
        view.bind(ContainerId::next(), root.capabilities()).unwrap();
        drop(root);
        assert!(matches!(view.pre_add(0, &1), Err(Error::RootDetached)));
        assert!(view.root().is_none());
    }

    #[test]
    fn test_listener_registration_defaults_to_unsupported() {
        let handler: Handler<i32> = Handler::new();
        let listener: PreListener<i32> = pre_listener(|_| true);
        assert!(matches!(
            handler.add_pre_listener(listener.clone(), EventFlags::CHANGE_GROUP),
            Err(Error::NotSupported("add_pre_listener"))
        ));
        assert!(matches!(
            handler.remove_pre_listener(&listener),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(handler.post_listeners(), Err(Error::NotSupported(_))));
    }

    #[test]
    fn test_view_registration_reaches_root() {
        let root = Rc::new(Handler::<i32>::standard());
        root.bind(ContainerId::next(), Capabilities::COLLECTION | Capabilities::LIST)
            .unwrap();
        let view = root.make_range_view_handler(0, 0).unwrap();
        view.bind(ContainerId::next(), root.capabilities()).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        view.add_post_listener(
            post_listener(move |event| sink.borrow_mut().push(event.kind())),
            EventFlags::CHANGE_GROUP,
        )
        .unwrap();
        assert_eq!(root.post_listeners().unwrap().len(), 1);

        root.pre_clear(0).unwrap();
        root.post_clear(0, false).unwrap();
        assert_eq!(*seen.borrow(), vec![EventKind::Clear]);
    }

    #[test]
    fn test_event_display() {
        let root = Rc::new(Handler::<i32>::standard());
        root.bind(ContainerId::next(), Capabilities::COLLECTION)
            .unwrap();
        let rendered = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&rendered);
        root.add_post_listener(
            post_listener(move |event| *sink.borrow_mut() = event.to_string()),
            EventFlags::CHANGE_GROUP,
        )
        .unwrap();
        root.pre_add_ncopies(2, &1, 3).unwrap();
        root.post_add_ncopies(5, &1, 3, true).unwrap();
        let text = rendered.borrow();
        assert!(text.starts_with("AddNCopies post"), "{text}");
        assert!(text.ends_with("x3 size=2->5 modified=true"), "{text}");
    }
}
