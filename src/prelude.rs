//! # modscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the modscope library. Import this module to get quick access to everything needed to
//! decorate a container and listen to its modifications.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all modscope operations
pub use crate::Error;

/// The result type used throughout modscope
pub use crate::Result;

/// Configuration shared by a decorated container and its views
pub use crate::ObservationConfig;

// ================================================================================================
// Decorated Containers
// ================================================================================================

/// The decorator and its views
pub use crate::observed::{
    Observed, ObservedIter, ObservedListIter, ObservedSortedView, ObservedSubList,
};

/// Capability set declared by decorated containers
pub use crate::container::Capabilities;

// ================================================================================================
// Events
// ================================================================================================

/// Kinds, groups and the event record
pub use crate::event::{EventFlags, EventKind, ModificationEvent, Phase};

/// Identities reported by events
pub use crate::identity::{ContainerId, SameInstance};

// ================================================================================================
// Listening
// ================================================================================================

/// Listener values and closures
pub use crate::listener::{post_listener, pre_listener, StandardHooks, StandardListener};

/// Handlers and their extension point
pub use crate::handler::{Handler, ModificationHooks, PostListener, PreListener};

/// Listener resolution
pub use crate::factory::{HandlerFactory, HandlerFactoryRegistry, Listener};
