//! Shared fixtures for the unit tests of this crate.

mod helpers;

pub use helpers::*;
