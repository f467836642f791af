//! Match orchestration module
//!
//! Forging, rerolls, export snapshots and share links.

mod engine;
mod share;
mod snapshot;

#[cfg(test)]
mod property_tests;

pub use engine::*;
pub use share::*;
pub use snapshot::*;
