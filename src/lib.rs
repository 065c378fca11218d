// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # modscope
//!
//! Observation of container modifications with veto-capable pre-events and informative
//! post-events.
//!
//! `modscope` decorates ordinary containers (`Vec`, `VecDeque`, `HashSet`, `BTreeSet` or any
//! type implementing the [`container`] traits) so that every mutation is announced before it
//! happens and reported after it happened:
//!
//! - **Pre-events** are decisions. Any listener may veto, in which case the container stays
//!   untouched and the operation returns its "nothing changed" result.
//! - **Post-events** carry the genuine outcome: sizes before and after, whether anything
//!   changed, the element that was replaced or removed.
//! - **Views** (`sub_list`, `sub_set`, `head_set`, `tail_set`) route their events to the
//!   listeners of the container they view, translated into its coordinates.
//! - **Kinds and groups** ([`EventKind`], [`EventFlags`]) let listeners subscribe to exactly the
//!   operations they care about.
//!
//! ## Quick Start
//!
//! ```rust
//! use modscope::prelude::*;
//!
//! // Refuse to store negative numbers, count everything else.
//! let guard = StandardListener::<i32>::pre(|event| event.subject().map_or(true, |v| *v >= 0))
//!     .with_mask(EventFlags::ADD_GROUP | EventFlags::SET_GROUP);
//!
//! let mut list = Observed::decorate(vec![1, 2], Some(&guard.into_listener()))?;
//! assert!(list.add(3)?);
//! assert!(!list.add(-4)?);
//! assert_eq!(list.set(0, -1)?, None);
//! assert_eq!(list.inner(), &vec![1, 2, 3]);
//! # Ok::<(), modscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`observed`] - The decorated containers, their iterators and views
//! - [`handler`] - The per-container protocol engine and the [`ModificationHooks`] extension point
//! - [`listener`] - Listener-managing hooks and the standard listener value
//! - [`factory`] - Resolution of listener values to handlers through a process-wide registry
//! - [`event`] - Event kinds, groups and the event record handed to listeners
//! - [`container`] - The collaborator traits decorated containers implement
//! - [`identity`] - Container identities and element instance identity
//! - [`config`] - Configuration shared by a container and its views
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Threading
//!
//! Decorated containers and their handlers are single-threaded (`!Send`). The handler-factory
//! registries are the only shared state and may be read from any thread.
//!
//! ## Logging
//!
//! `modscope` emits [`tracing`] events: every dispatched event at `TRACE`, vetoes, bindings,
//! view creation and factory registration at `DEBUG`, and views that outlive their container at
//! `WARN`. Install any `tracing` subscriber to see them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use modscope::prelude::*;
///
/// let mut queue = Observed::decorate(std::collections::VecDeque::from([1, 2]), None)?;
/// assert_eq!(queue.remove_next()?, Some(1));
/// # Ok::<(), modscope::Error>(())
/// ```
pub mod prelude;

pub mod config;
pub mod container;
pub mod event;
pub mod factory;
pub mod handler;
pub mod identity;
pub mod listener;
pub mod observed;

/// `modscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `modscope` Error type
///
/// The main error type for all operations in this crate. A vetoed modification is not an error.
pub use error::Error;

pub use config::ObservationConfig;
pub use container::Capabilities;
pub use event::{EventFlags, EventKind, ModificationEvent, Phase};
pub use factory::{HandlerFactory, HandlerFactoryRegistry, Listener};
pub use handler::{AcceptAll, Handler, ModificationHooks, PostListener, PreListener};
pub use identity::{ContainerId, SameInstance};
pub use listener::{post_listener, pre_listener, StandardHooks, StandardListener};
pub use observed::{Observed, ObservedIter, ObservedListIter, ObservedSortedView, ObservedSubList};
