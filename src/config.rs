//! Configuration for decorated containers and their handlers
//!
//! A configuration is fixed when a root handler is created; every view created below that
//! root inherits it.

use crate::event::EventFlags;

/// Configuration for modification observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationConfig {
    /// Maximum nesting depth of views below a root container (default: 64).
    /// A root container has depth 0; `sub_list` of a `sub_list` has depth 2.
    pub max_view_depth: usize,

    /// Mask applied to listeners registered without an explicit mask
    /// (default: [`EventFlags::CHANGE_GROUP`], every kind)
    pub default_listener_mask: EventFlags,

    /// Stop consulting pre-listeners after the first veto (default: true).
    /// When false, every matching pre-listener sees the event even once it is vetoed.
    pub short_circuit_veto: bool,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            max_view_depth: 64,
            default_listener_mask: EventFlags::CHANGE_GROUP,
            short_circuit_veto: true,
        }
    }
}

impl ObservationConfig {
    /// Creates a configuration that forbids views entirely
    ///
    /// Any `sub_list`/`sub_set` call on a container decorated with this configuration fails
    /// with [`crate::Error::ViewDepthExceeded`].
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            max_view_depth: 0,
            ..Self::default()
        }
    }

    /// Creates a configuration in which every pre-listener is always consulted
    ///
    /// Useful for auditing listeners that must observe every attempted modification,
    /// including the ones another listener vetoes.
    #[must_use]
    pub fn exhaustive() -> Self {
        Self {
            short_circuit_veto: false,
            ..Self::default()
        }
    }

    /// Returns a copy of this configuration with a different default listener mask
    #[must_use]
    pub fn with_default_mask(self, mask: EventFlags) -> Self {
        Self {
            default_listener_mask: mask,
            ..self
        }
    }
}
