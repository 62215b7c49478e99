//! The driving loop that runs resolved change files and updates the journal.
mod event;
mod migrator;
mod report;
mod stop;

pub use event::*;
pub use migrator::*;
pub use report::*;
pub use stop::*;
