//! Listener-managing hooks and the standard listener shape.
//!
//! [`StandardHooks`] is the [`ModificationHooks`] implementation used by default for every
//! decorated container. It keeps two ordered lists of listeners, each paired with the
//! [`EventFlags`] mask of the kinds it wants to see:
//!
//! - pre-listeners decide; the modification proceeds only if every matching pre-listener
//!   accepts it
//! - post-listeners are informed of every completed modification matching their mask
//!
//! Listener lists are snapshotted before each dispatch, so a listener may register or
//! unregister listeners (including itself) while being called. Changes apply from the next
//! event on.
//!
//! [`StandardListener`] is the listener *value* understood by the standard handler factory:
//! pass one to [`crate::Observed::decorate`] to get a container whose root hooks already carry
//! that listener.
//!
//! # Examples
//!
//! ```rust
//! use modscope::{event::EventFlags, Observed, StandardListener};
//!
//! let guard = StandardListener::<i32>::pre(|event| event.subject() != Some(&13))
//!     .with_mask(EventFlags::ADD_GROUP);
//! let mut numbers = Observed::decorate(Vec::new(), Some(&guard.into_listener()))?;
//!
//! assert!(numbers.add(12)?);
//! assert!(!numbers.add(13)?);
//! assert_eq!(numbers.inner(), &vec![12]);
//! # Ok::<(), modscope::Error>(())
//! ```

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::debug;

use crate::{
    config::ObservationConfig,
    event::{EventFlags, ModificationEvent},
    factory::Listener,
    handler::{ModificationHooks, PostListener, PreListener},
    Result,
};

/// Wraps a closure as a [`PreListener`].
pub fn pre_listener<T, F>(listener: F) -> PreListener<T>
where
    F: Fn(&ModificationEvent<'_, T>) -> bool + 'static,
{
    Rc::new(listener)
}

/// Wraps a closure as a [`PostListener`].
pub fn post_listener<T, F>(listener: F) -> PostListener<T>
where
    F: Fn(&ModificationEvent<'_, T>) + 'static,
{
    Rc::new(listener)
}

struct Registered<L> {
    listener: L,
    mask: EventFlags,
}

impl<L: Clone> Clone for Registered<L> {
    fn clone(&self) -> Self {
        Registered {
            listener: self.listener.clone(),
            mask: self.mask,
        }
    }
}

/// Root hooks holding masked pre- and post-listeners.
pub struct StandardHooks<T> {
    pre: RefCell<Vec<Registered<PreListener<T>>>>,
    post: RefCell<Vec<Registered<PostListener<T>>>>,
    config: ObservationConfig,
}

impl<T> StandardHooks<T> {
    /// Creates hooks without listeners using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ObservationConfig::default())
    }

    /// Creates hooks without listeners.
    #[must_use]
    pub fn with_config(config: ObservationConfig) -> Self {
        StandardHooks {
            pre: RefCell::new(Vec::new()),
            post: RefCell::new(Vec::new()),
            config,
        }
    }

    /// Creates hooks already carrying the listeners of `listener`.
    #[must_use]
    pub fn with_listener(config: ObservationConfig, listener: &StandardListener<T>) -> Self {
        let hooks = Self::with_config(config);
        let mask = listener.mask.unwrap_or(config.default_listener_mask);
        if let Some(pre) = &listener.pre {
            hooks.push_pre(Rc::clone(pre), mask);
        }
        if let Some(post) = &listener.post {
            hooks.push_post(Rc::clone(post), mask);
        }
        hooks
    }

    fn push_pre(&self, listener: PreListener<T>, mask: EventFlags) {
        let mut pre = self.pre.borrow_mut();
        pre.push(Registered { listener, mask });
        debug!(count = pre.len(), ?mask, "pre-listener registered");
    }

    fn push_post(&self, listener: PostListener<T>, mask: EventFlags) {
        let mut post = self.post.borrow_mut();
        post.push(Registered { listener, mask });
        debug!(count = post.len(), ?mask, "post-listener registered");
    }

    /// Registers a pre-listener for the configured default mask.
    pub fn subscribe_pre(&self, listener: PreListener<T>) {
        self.push_pre(listener, self.config.default_listener_mask);
    }

    /// Registers a post-listener for the configured default mask.
    pub fn subscribe_post(&self, listener: PostListener<T>) {
        self.push_post(listener, self.config.default_listener_mask);
    }

    /// The configuration these hooks were created with.
    pub fn config(&self) -> &ObservationConfig {
        &self.config
    }
}

impl<T> Default for StandardHooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ModificationHooks<T> for StandardHooks<T> {
    fn decide(&self, event: &ModificationEvent<'_, T>) -> bool {
        let snapshot = self.pre.borrow().clone();
        let mut accepted = true;
        for registered in snapshot.iter().filter(|r| event.matches(r.mask)) {
            if !(registered.listener)(event) {
                accepted = false;
                if self.config.short_circuit_veto {
                    break;
                }
            }
        }
        accepted
    }

    fn notify(&self, event: &ModificationEvent<'_, T>) {
        let snapshot = self.post.borrow().clone();
        for registered in snapshot.iter().filter(|r| event.matches(r.mask)) {
            (registered.listener)(event);
        }
    }

    fn add_pre_listener(&self, listener: PreListener<T>, mask: EventFlags) -> Result<()> {
        self.push_pre(listener, mask);
        Ok(())
    }

    fn remove_pre_listener(&self, listener: &PreListener<T>) -> Result<bool> {
        let mut pre = self.pre.borrow_mut();
        let before = pre.len();
        pre.retain(|registered| !Rc::ptr_eq(&registered.listener, listener));
        Ok(pre.len() != before)
    }

    fn pre_listeners(&self) -> Result<Vec<PreListener<T>>> {
        Ok(self
            .pre
            .borrow()
            .iter()
            .map(|registered| Rc::clone(&registered.listener))
            .collect())
    }

    fn add_post_listener(&self, listener: PostListener<T>, mask: EventFlags) -> Result<()> {
        self.push_post(listener, mask);
        Ok(())
    }

    fn remove_post_listener(&self, listener: &PostListener<T>) -> Result<bool> {
        let mut post = self.post.borrow_mut();
        let before = post.len();
        post.retain(|registered| !Rc::ptr_eq(&registered.listener, listener));
        Ok(post.len() != before)
    }

    fn post_listeners(&self) -> Result<Vec<PostListener<T>>> {
        Ok(self
            .post
            .borrow()
            .iter()
            .map(|registered| Rc::clone(&registered.listener))
            .collect())
    }
}

impl<T> fmt::Debug for StandardHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardHooks")
            .field("pre_listeners", &self.pre.borrow().len())
            .field("post_listeners", &self.post.borrow().len())
            .field("config", &self.config)
            .finish()
    }
}

/// The standard listener value: an optional pre-listener, an optional post-listener and the
/// mask both are registered with.
///
/// Without an explicit mask the root configuration's
/// [`default_listener_mask`](ObservationConfig::default_listener_mask) applies.
pub struct StandardListener<T> {
    pre: Option<PreListener<T>>,
    post: Option<PostListener<T>>,
    mask: Option<EventFlags>,
}

impl<T: 'static> StandardListener<T> {
    /// A listener that only decides.
    pub fn pre<F>(listener: F) -> Self
    where
        F: Fn(&ModificationEvent<'_, T>) -> bool + 'static,
    {
        StandardListener {
            pre: Some(pre_listener(listener)),
            post: None,
            mask: None,
        }
    }

    /// A listener that is only informed.
    pub fn post<F>(listener: F) -> Self
    where
        F: Fn(&ModificationEvent<'_, T>) + 'static,
    {
        StandardListener {
            pre: None,
            post: Some(post_listener(listener)),
            mask: None,
        }
    }

    /// A listener with both phases.
    pub fn both(pre: PreListener<T>, post: PostListener<T>) -> Self {
        StandardListener {
            pre: Some(pre),
            post: Some(post),
            mask: None,
        }
    }

    /// Restricts both listeners to the kinds in `mask`.
    #[must_use]
    pub fn with_mask(mut self, mask: EventFlags) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Wraps this value for handler-factory resolution.
    pub fn into_listener(self) -> Listener {
        Listener::new(self)
    }
}

impl<T> Clone for StandardListener<T> {
    fn clone(&self) -> Self {
        StandardListener {
            pre: self.pre.clone(),
            post: self.post.clone(),
            mask: self.mask,
        }
    }
}
