//! Forwarding state shared by range-view and keyed-view handlers.

use std::rc::{Rc, Weak};

use tracing::warn;

use crate::{event::Draft, handler::Handler, identity::ContainerId, Error, Result};

/// A view handler's link to its root.
///
/// Holds no listener state: every event is stamped with the view's identity and offset and
/// handed to the root, which builds the event and runs the hooks.
pub(super) struct ViewState<T> {
    pub(super) root: Weak<Handler<T>>,
    pub(super) offset: usize,
}

impl<T> ViewState<T> {
    pub(super) fn upgrade(&self) -> Result<Rc<Handler<T>>> {
        self.root.upgrade().ok_or_else(|| {
            warn!(offset = self.offset, "view used after its root was dropped");
            Error::RootDetached
        })
    }

    pub(super) fn forward_decide(
        &self,
        view: ContainerId,
        mut draft: Draft<'_, T>,
        size: usize,
    ) -> Result<bool> {
        let root = self.upgrade()?;
        draft.view = Some((view, self.offset));
        root.decide(draft, size)
    }

    pub(super) fn forward_notify(
        &self,
        view: ContainerId,
        mut draft: Draft<'_, T>,
        size: usize,
        modified: bool,
    ) -> Result<()> {
        let root = self.upgrade()?;
        draft.view = Some((view, self.offset));
        root.notify(draft, size, modified)
    }
}
