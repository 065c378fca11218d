//! The decision/notification extension point of a root handler.

use std::rc::Rc;

use crate::{
    event::{EventFlags, ModificationEvent},
    Error, Result,
};

/// A listener consulted before a modification. Returning `false` vetoes it.
pub type PreListener<T> = Rc<dyn Fn(&ModificationEvent<'_, T>) -> bool>;

/// A listener informed after a modification.
pub type PostListener<T> = Rc<dyn Fn(&ModificationEvent<'_, T>)>;

/// What a root handler does with the events it builds.
///
/// Only root handlers own hooks; view handlers forward every event to the hooks of their root.
/// Every method has a default, so an implementation only overrides what it cares about:
///
/// - [`decide`](Self::decide) accepts everything
/// - [`notify`](Self::notify) does nothing
/// - listener registration returns [`Error::NotSupported`]
///
/// Listener registration is optional on purpose. Hooks that implement a fixed policy (an
/// audit log, a read-only guard) have no listeners to manage. [`crate::StandardHooks`] is the
/// implementation that supports listeners.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use modscope::{Handler, ModificationEvent, ModificationHooks, Observed};
///
/// struct NoShrinking;
///
/// impl ModificationHooks<i32> for NoShrinking {
///     fn decide(&self, event: &ModificationEvent<'_, i32>) -> bool {
///         event.kind().size_effect() != modscope::event::SizeEffect::Shrinks
///     }
/// }
///
/// let handler = Handler::with_hooks(Rc::new(NoShrinking));
/// let mut list = Observed::with_handler(vec![1, 2, 3], handler)?;
/// assert!(!list.remove(&2)?);
/// assert!(list.add(4)?);
/// assert_eq!(list.inner(), &vec![1, 2, 3, 4]);
/// # Ok::<(), modscope::Error>(())
/// ```
pub trait ModificationHooks<T> {
    /// Decides whether the modification described by a pre-phase event may proceed.
    fn decide(&self, _event: &ModificationEvent<'_, T>) -> bool {
        true
    }

    /// Receives the post-phase event of a completed modification.
    fn notify(&self, _event: &ModificationEvent<'_, T>) {}

    /// Registers a listener consulted before modifications whose kind is in `mask`.
    fn add_pre_listener(&self, _listener: PreListener<T>, _mask: EventFlags) -> Result<()> {
        Err(Error::NotSupported("add_pre_listener"))
    }

    /// Unregisters a pre-listener by identity. Returns whether it was registered.
    fn remove_pre_listener(&self, _listener: &PreListener<T>) -> Result<bool> {
        Err(Error::NotSupported("remove_pre_listener"))
    }

    /// A snapshot of the registered pre-listeners.
    fn pre_listeners(&self) -> Result<Vec<PreListener<T>>> {
        Err(Error::NotSupported("pre_listeners"))
    }

    /// Registers a listener informed after modifications whose kind is in `mask`.
    fn add_post_listener(&self, _listener: PostListener<T>, _mask: EventFlags) -> Result<()> {
        Err(Error::NotSupported("add_post_listener"))
    }

    /// Unregisters a post-listener by identity. Returns whether it was registered.
    fn remove_post_listener(&self, _listener: &PostListener<T>) -> Result<bool> {
        Err(Error::NotSupported("remove_post_listener"))
    }

    /// A snapshot of the registered post-listeners.
    fn post_listeners(&self) -> Result<Vec<PostListener<T>>> {
        Err(Error::NotSupported("post_listeners"))
    }
}

/// Hooks that accept every modification and ignore every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl<T> ModificationHooks<T> for AcceptAll {}
