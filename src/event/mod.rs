//! Modification events and their classification.
//!
//! # Key Components
//!
//! - [`EventKind`] - The atomic modification kinds, each owning one flag bit
//! - [`EventFlags`] - Bit unions of kinds, including the precomputed filtering groups
//! - [`ModificationEvent`] - The record passed to decision and notification hooks
//!
//! The kind names (`"Add"`, `"AddIndexed"`, ..., `"Unknown"`) are the only serialized form
//! this crate produces; see [`name_of`].

mod kind;
mod record;

pub use kind::{group, name_of, EventFlags, EventKind, SizeEffect, UNKNOWN_KIND_NAME};
pub(crate) use record::Draft;
pub use record::{ModificationEvent, Phase};
