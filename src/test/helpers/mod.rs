//! Helper types for testing
//!
//! - [`RecordingHooks`] records every event it sees as an owned [`RecordedEvent`] and vetoes
//!   the kinds it was told to
//! - [`CountingBag`] is a minimal bag collaborator whose `add_copies` result can be made to lie

mod bag;
mod hooks;

pub use bag::CountingBag;
pub use hooks::{RecordedEvent, RecordingHooks};
