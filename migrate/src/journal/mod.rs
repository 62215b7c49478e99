//! The version journal: the record of which versions are applied.
mod file_journal;
pub mod format;
mod memory_journal;
mod version_journal;

pub use file_journal::*;
pub use memory_journal::*;
pub use version_journal::{Journal, JournalProvider};
