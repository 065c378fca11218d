//! The immutable record handed to decision and notification hooks.

use std::fmt;

use crate::{
    event::{EventFlags, EventKind},
    handler::Handler,
    identity::ContainerId,
};

/// Which side of the mutation an event describes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Raised before the mutation; the decision hook may veto it.
    Pre,
    /// Raised after the mutation with its genuine outcome.
    Post,
}

/// Realised outcome of a mutation, only present on post-phase events.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Outcome {
    post_size: usize,
    modified: bool,
}

/// Operation-specific part of an event, assembled by the handler of the container (or view)
/// the operation was invoked on and completed by the root handler.
pub(crate) struct Draft<'a, T> {
    pub(crate) kind: EventKind,
    pub(crate) index: Option<usize>,
    pub(crate) subject: Option<&'a T>,
    pub(crate) batch: Option<&'a [T]>,
    pub(crate) repeat: u32,
    pub(crate) previous: Option<&'a T>,
    pub(crate) view: Option<(ContainerId, usize)>,
}

impl<'a, T> Draft<'a, T> {
    pub(crate) fn new(kind: EventKind) -> Self {
        Draft {
            kind,
            index: None,
            subject: None,
            batch: None,
            repeat: 1,
            previous: None,
            view: None,
        }
    }

    pub(crate) fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub(crate) fn subject(mut self, subject: &'a T) -> Self {
        self.subject = Some(subject);
        self
    }

    pub(crate) fn batch(mut self, batch: &'a [T]) -> Self {
        self.batch = Some(batch);
        self
    }

    pub(crate) fn repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    pub(crate) fn previous(mut self, previous: Option<&'a T>) -> Self {
        self.previous = previous;
        self
    }
}

/// One modification, as seen by a decision hook (pre phase) or a notification hook (post phase).
///
/// Events borrow their payload from the operation that raised them and only live for the
/// duration of the hook call. Fields that do not apply to an operation are `None`:
///
/// - `index` is only set for indexed and iterated kinds, expressed in the root container's
///   coordinates
/// - `view` and `view_offset` are only set when the operation was invoked on a view
/// - `post_size` and `modified` are only set on post-phase events
///
/// `pre_size` and `post_size` always describe the *root* container, also for events raised
/// through a view.
pub struct ModificationEvent<'a, T> {
    observed: ContainerId,
    handler: &'a Handler<T>,
    phase: Phase,
    kind: EventKind,
    index: Option<usize>,
    subject: Option<&'a T>,
    batch: Option<&'a [T]>,
    repeat: u32,
    previous: Option<&'a T>,
    view: Option<ContainerId>,
    view_offset: Option<usize>,
    pre_size: usize,
    outcome: Option<Outcome>,
}

impl<'a, T> ModificationEvent<'a, T> {
    pub(crate) fn pre(
        observed: ContainerId,
        handler: &'a Handler<T>,
        draft: Draft<'a, T>,
        pre_size: usize,
    ) -> Self {
        ModificationEvent {
            observed,
            handler,
            phase: Phase::Pre,
            kind: draft.kind,
            index: draft.index,
            subject: draft.subject,
            batch: draft.batch,
            repeat: draft.repeat,
            previous: draft.previous,
            view: draft.view.map(|(view, _)| view),
            view_offset: draft.view.map(|(_, offset)| offset),
            pre_size,
            outcome: None,
        }
    }

    pub(crate) fn post(
        observed: ContainerId,
        handler: &'a Handler<T>,
        draft: Draft<'a, T>,
        pre_size: usize,
        post_size: usize,
        modified: bool,
    ) -> Self {
        let mut event = Self::pre(observed, handler, draft, pre_size);
        event.phase = Phase::Post;
        event.outcome = Some(Outcome {
            post_size,
            modified,
        });
        event
    }

    /// The root container being observed.
    pub fn observed(&self) -> ContainerId {
        self.observed
    }

    /// The root handler that built this event.
    pub fn handler(&self) -> &'a Handler<T> {
        self.handler
    }

    /// Whether this event precedes or follows the mutation.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shorthand for `phase() == Phase::Pre`.
    pub fn is_pre(&self) -> bool {
        self.phase == Phase::Pre
    }

    /// The kind of modification.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether this event's kind is part of `mask`.
    pub fn matches(&self, mask: EventFlags) -> bool {
        mask.matches(self.kind)
    }

    /// Index of the modification in root coordinates, for indexed and iterated kinds.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The single element being added, removed or stored.
    pub fn subject(&self) -> Option<&'a T> {
        self.subject
    }

    /// The batch passed to `*_all` operations.
    pub fn subject_batch(&self) -> Option<&'a [T]> {
        self.batch
    }

    /// Number of copies affected; `1` except for n-copies kinds.
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// The element that was removed or replaced. Only known after the mutation.
    pub fn previous(&self) -> Option<&'a T> {
        self.previous
    }

    /// The view the operation was invoked on, if any.
    pub fn view(&self) -> Option<ContainerId> {
        self.view
    }

    /// Whether the operation was invoked on a view.
    pub fn is_view(&self) -> bool {
        self.view.is_some()
    }

    /// Start of the originating view in root coordinates.
    pub fn view_offset(&self) -> Option<usize> {
        self.view_offset
    }

    /// Size of the root container before the mutation.
    pub fn pre_size(&self) -> usize {
        self.pre_size
    }

    /// Size of the root container after the mutation (post phase only).
    pub fn post_size(&self) -> Option<usize> {
        self.outcome.map(|outcome| outcome.post_size)
    }

    /// Whether the mutation changed the container (post phase only).
    pub fn modified(&self) -> Option<bool> {
        self.outcome.map(|outcome| outcome.modified)
    }

    /// `post_size - pre_size` (post phase only).
    #[allow(clippy::cast_possible_wrap)]
    pub fn size_change(&self) -> Option<isize> {
        self.outcome
            .map(|outcome| outcome.post_size as isize - self.pre_size as isize)
    }
}

impl<T> fmt::Display for ModificationEvent<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Pre => "pre",
            Phase::Post => "post",
        };
        write!(f, "{} {} on {}", self.kind, phase, self.observed)?;
        if let Some(index) = self.index {
            write!(f, " at {index}")?;
        }
        if self.repeat != 1 {
            write!(f, " x{}", self.repeat)?;
        }
        if let Some(batch) = self.batch {
            write!(f, " batch={}", batch.len())?;
        }
        if let (Some(view), Some(offset)) = (self.view, self.view_offset) {
            write!(f, " via view {view}+{offset}")?;
        }
        write!(f, " size={}", self.pre_size)?;
        if let Some(outcome) = self.outcome {
            write!(
                f,
                "->{} modified={}",
                outcome.post_size, outcome.modified
            )?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for ModificationEvent<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModificationEvent")
            .field("observed", &self.observed)
            .field("phase", &self.phase)
            .field("kind", &self.kind)
            .field("index", &self.index)
            .field("subject", &self.subject)
            .field("subject_batch", &self.batch)
            .field("repeat", &self.repeat)
            .field("previous", &self.previous)
            .field("view", &self.view)
            .field("view_offset", &self.view_offset)
            .field("pre_size", &self.pre_size)
            .field("post_size", &self.post_size())
            .field("modified", &self.modified())
            .finish()
    }
}
