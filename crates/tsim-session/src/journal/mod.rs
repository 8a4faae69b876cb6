//! Chronological record of a run.

pub mod entry;
pub mod log;

pub use entry::{EndReason, JournalEntry};
pub use log::Journal;
