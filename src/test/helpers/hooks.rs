use std::cell::RefCell;

use crate::{
    event::{EventFlags, EventKind, ModificationEvent, Phase},
    handler::ModificationHooks,
    identity::ContainerId,
};

/// Owned copy of a [`ModificationEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent<T> {
    pub observed: ContainerId,
    pub phase: Phase,
    pub kind: EventKind,
    pub index: Option<usize>,
    pub subject: Option<T>,
    pub batch: Option<Vec<T>>,
    pub repeat: u32,
    pub previous: Option<T>,
    pub view: Option<ContainerId>,
    pub view_offset: Option<usize>,
    pub pre_size: usize,
    pub post_size: Option<usize>,
    pub modified: Option<bool>,
}

impl<T: Clone> RecordedEvent<T> {
    pub fn of(event: &ModificationEvent<'_, T>) -> Self {
        RecordedEvent {
            observed: event.observed(),
            phase: event.phase(),
            kind: event.kind(),
            index: event.index(),
            subject: event.subject().cloned(),
            batch: event.subject_batch().map(<[T]>::to_vec),
            repeat: event.repeat(),
            previous: event.previous().cloned(),
            view: event.view(),
            view_offset: event.view_offset(),
            pre_size: event.pre_size(),
            post_size: event.post_size(),
            modified: event.modified(),
        }
    }
}

/// Hooks recording every event and vetoing the kinds in `veto`.
pub struct RecordingHooks<T> {
    events: RefCell<Vec<RecordedEvent<T>>>,
    veto: EventFlags,
}

impl<T> Default for RecordingHooks<T> {
    fn default() -> Self {
        Self::vetoing(EventFlags::empty())
    }
}

impl<T> RecordingHooks<T> {
    pub fn vetoing(veto: EventFlags) -> Self {
        RecordingHooks {
            events: RefCell::new(Vec::new()),
            veto,
        }
    }
}

impl<T: Clone> RecordingHooks<T> {
    pub fn events(&self) -> Vec<RecordedEvent<T>> {
        self.events.borrow().clone()
    }

    pub fn post_events(&self) -> Vec<RecordedEvent<T>> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.phase == Phase::Post)
            .cloned()
            .collect()
    }
}

impl<T: Clone> ModificationHooks<T> for RecordingHooks<T> {
    fn decide(&self, event: &ModificationEvent<'_, T>) -> bool {
        self.events.borrow_mut().push(RecordedEvent::of(event));
        !event.matches(self.veto)
    }

    fn notify(&self, event: &ModificationEvent<'_, T>) {
        self.events.borrow_mut().push(RecordedEvent::of(event));
    }
}
