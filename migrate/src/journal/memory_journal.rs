use super::version_journal::JournalState;
use super::JournalProvider;
use crate::errors::MigrateResult;
use crate::file::{AppliedVersionSet, Version};
use parking_lot::Mutex;
use std::sync::Arc;

/// Journal that keeps the applied set in memory only. `flush` is a no-op.
#[derive(Clone, Default)]
pub struct MemoryJournal {
    state: Arc<Mutex<JournalState>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        MemoryJournal::default()
    }

    pub fn with_versions(versions: AppliedVersionSet) -> Self {
        MemoryJournal {
            state: Arc::new(Mutex::new(JournalState::new(versions))),
        }
    }
}

impl JournalProvider for MemoryJournal {
    fn record(&self, version: Version) -> MigrateResult<()> {
        self.state.lock().record(version)
    }

    fn unrecord(&self, version: Version) -> MigrateResult<()> {
        self.state.lock().unrecord(version)
    }

    fn current_versions(&self) -> MigrateResult<AppliedVersionSet> {
        self.state.lock().snapshot()
    }

    fn latest_version(&self) -> MigrateResult<Option<Version>> {
        self.state.lock().latest()
    }

    fn flush(&self) -> MigrateResult<()> {
        self.state.lock().ensure_open()
    }

    fn close(&self) -> MigrateResult<()> {
        self.state.lock().mark_closed();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.lock().is_closed()
    }
}
