//! Resolution of listener values to handlers.
//!
//! Decorating a container takes an optional, opaque *listener value*. What that value means
//! is decided entirely by the registered [`HandlerFactory`] implementations: the registry asks
//! each factory, latest registered first, to turn the value into root hooks, and the first
//! factory that answers wins.
//!
//! # Resolution rules
//!
//! - no listener: the default handler (backed by [`StandardHooks`]) is created without
//!   consulting any factory
//! - a listener some factory recognises: a root handler with that factory's hooks
//! - a listener no factory recognises: [`Error::UnrecognizedListener`] naming its type
//!
//! Every registry starts with two factories: one for [`StandardListener`] values and one for
//! ready-made `Rc<dyn ModificationHooks<T>>` values.
//!
//! # Concurrency
//!
//! The factory list is an immutable snapshot behind an [`ArcSwap`]. Resolution loads the
//! current snapshot and never observes a partially updated list. Registration copies the
//! snapshot, appends and swaps the copy in; two racing registrations may lose one of the
//! factories (last writer wins), so registration belongs in start-up code.
//!
//! # Examples
//!
//! ```rust
//! use std::{rc::Rc, sync::Arc};
//! use modscope::{
//!     ContainerId, HandlerFactory, HandlerFactoryRegistry, Listener, ModificationHooks,
//!     ObservationConfig, StandardHooks,
//! };
//!
//! /// Treats a `&'static str` listener as a label and logs nothing but accepts everything.
//! struct LabelFactory;
//!
//! impl HandlerFactory<u8> for LabelFactory {
//!     fn create_hooks(
//!         &self,
//!         _container: ContainerId,
//!         listener: &Listener,
//!         config: &ObservationConfig,
//!     ) -> Option<Rc<dyn ModificationHooks<u8>>> {
//!         listener.downcast_ref::<&'static str>()?;
//!         Some(Rc::new(StandardHooks::with_config(*config)))
//!     }
//! }
//!
//! let registry = HandlerFactoryRegistry::<u8>::with_standard_factories();
//! registry.register(Arc::new(LabelFactory));
//!
//! let handler = registry.resolve(
//!     ContainerId::next(),
//!     Some(&Listener::new("audit")),
//!     ObservationConfig::default(),
//! )?;
//! assert!(handler.is_root());
//! assert!(registry
//!     .resolve(ContainerId::next(), Some(&Listener::new(7_u64)), ObservationConfig::default())
//!     .is_err());
//! # Ok::<(), modscope::Error>(())
//! ```

use std::{
    any::{Any, TypeId},
    fmt,
    marker::PhantomData,
    rc::Rc,
    sync::{Arc, OnceLock},
};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tracing::debug;

use crate::{
    config::ObservationConfig,
    handler::{Handler, ModificationHooks},
    identity::ContainerId,
    listener::{StandardHooks, StandardListener},
    Error, Result,
};

/// An opaque listener value, interpreted only by handler factories.
pub struct Listener {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl Listener {
    /// Wraps `value`, remembering its type name for error reporting.
    pub fn new<L: Any>(value: L) -> Self {
        Listener {
            value: Box::new(value),
            type_name: std::any::type_name::<L>(),
        }
    }

    /// The type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The wrapped value, if it is an `L`.
    pub fn downcast_ref<L: Any>(&self) -> Option<&L> {
        self.value.downcast_ref::<L>()
    }

    /// Whether the wrapped value is an `L`.
    pub fn is<L: Any>(&self) -> bool {
        self.value.is::<L>()
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Turns listener values into root hooks.
///
/// Factories are shared process-wide and must be `Send + Sync`; the hooks they create belong
/// to a single container and need not be.
pub trait HandlerFactory<T>: Send + Sync {
    /// Creates root hooks for `container` from `listener`, or `None` if the listener is not
    /// understood by this factory.
    fn create_hooks(
        &self,
        container: ContainerId,
        listener: &Listener,
        config: &ObservationConfig,
    ) -> Option<Rc<dyn ModificationHooks<T>>>;
}

/// Recognises [`StandardListener`] values.
pub struct StandardListenerFactory<T>(PhantomData<fn() -> T>);

impl<T> StandardListenerFactory<T> {
    /// Creates the factory.
    #[must_use]
    pub fn new() -> Self {
        StandardListenerFactory(PhantomData)
    }
}

impl<T> Default for StandardListenerFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> HandlerFactory<T> for StandardListenerFactory<T> {
    fn create_hooks(
        &self,
        _container: ContainerId,
        listener: &Listener,
        config: &ObservationConfig,
    ) -> Option<Rc<dyn ModificationHooks<T>>> {
        let listener = listener.downcast_ref::<StandardListener<T>>()?;
        Some(Rc::new(StandardHooks::with_listener(*config, listener)))
    }
}

/// Recognises ready-made `Rc<dyn ModificationHooks<T>>` values and uses them as they are.
pub struct HooksFactory<T>(PhantomData<fn() -> T>);

impl<T> HooksFactory<T> {
    /// Creates the factory.
    #[must_use]
    pub fn new() -> Self {
        HooksFactory(PhantomData)
    }
}

impl<T> Default for HooksFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> HandlerFactory<T> for HooksFactory<T> {
    fn create_hooks(
        &self,
        _container: ContainerId,
        listener: &Listener,
        _config: &ObservationConfig,
    ) -> Option<Rc<dyn ModificationHooks<T>>> {
        listener
            .downcast_ref::<Rc<dyn ModificationHooks<T>>>()
            .map(Rc::clone)
    }
}

type FactoryList<T> = Vec<Arc<dyn HandlerFactory<T>>>;

/// Ordered, copy-on-write list of handler factories.
pub struct HandlerFactoryRegistry<T> {
    factories: ArcSwap<FactoryList<T>>,
}

type GlobalRegistries = DashMap<TypeId, Arc<dyn Any + Send + Sync>>;

fn global_registries() -> &'static GlobalRegistries {
    static REGISTRIES: OnceLock<GlobalRegistries> = OnceLock::new();
    REGISTRIES.get_or_init(DashMap::new)
}

impl<T: 'static> HandlerFactoryRegistry<T> {
    /// Creates a registry without any factory.
    ///
    /// Such a registry resolves `None` listeners only.
    #[must_use]
    pub fn empty() -> Self {
        HandlerFactoryRegistry {
            factories: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Creates a registry seeded with [`HooksFactory`] and [`StandardListenerFactory`].
    #[must_use]
    pub fn with_standard_factories() -> Self {
        let registry = Self::empty();
        registry.register(Arc::new(HooksFactory::<T>::new()));
        registry.register(Arc::new(StandardListenerFactory::<T>::new()));
        registry
    }

    /// The process-wide registry for element type `T`, created with the standard factories on
    /// first use.
    pub fn global() -> Arc<Self> {
        let registry = global_registries()
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(Self::with_standard_factories()))
            .value()
            .clone();
        // Entries are keyed by `TypeId::of::<T>()`, so the downcast cannot fail.
        registry
            .downcast::<Self>()
            .unwrap_or_else(|_| Arc::new(Self::with_standard_factories()))
    }

    /// Appends `factory`; it is consulted before every previously registered factory.
    ///
    /// Not synchronised against concurrent registrations, see the
    /// [module documentation](self).
    pub fn register(&self, factory: Arc<dyn HandlerFactory<T>>) {
        let mut next = FactoryList::clone(&self.factories.load());
        next.push(factory);
        let count = next.len();
        self.factories.store(Arc::new(next));
        debug!(
            element = std::any::type_name::<T>(),
            count, "handler factory registered"
        );
    }

    /// The current snapshot of registered factories, in registration order.
    pub fn factories(&self) -> Arc<FactoryList<T>> {
        self.factories.load_full()
    }

    /// Resolves `listener` to an unbound root handler for `container`.
    ///
    /// # Errors
    ///
    /// [`Error::UnrecognizedListener`] if no factory understands `listener`.
    pub fn resolve(
        &self,
        container: ContainerId,
        listener: Option<&Listener>,
        config: ObservationConfig,
    ) -> Result<Handler<T>> {
        let Some(listener) = listener else {
            return Ok(Handler::standard_with_config(config));
        };

        let snapshot = self.factories.load();
        snapshot
            .iter()
            .rev()
            .find_map(|factory| factory.create_hooks(container, listener, &config))
            .map(|hooks| Handler::with_config(hooks, config))
            .ok_or_else(|| {
                debug!(%container, listener = listener.type_name(), "listener not recognised");
                Error::UnrecognizedListener(listener.type_name())
            })
    }
}

impl<T: 'static> Default for HandlerFactoryRegistry<T> {
    fn default() -> Self {
        Self::with_standard_factories()
    }
}
