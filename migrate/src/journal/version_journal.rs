use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use crate::file::{AppliedVersionSet, Version};
use std::ops::Deref;
use std::sync::Arc;

/// Contract for the authoritative record of applied versions.
///
/// # Purpose
/// A journal owns the [`AppliedVersionSet`] of one target. The driving loop
/// records a version after its forward file succeeds and unrecords it after its
/// reverse file succeeds. Every operation, reads included, runs under one
/// exclusive lock per journal so a snapshot is always consistent.
///
/// # Implementations
/// - [`FileJournal`](crate::journal::FileJournal): durable, one version per line
/// - [`MemoryJournal`](crate::journal::MemoryJournal): non-durable, for
///   executors that track versions elsewhere and for tests
///
/// # Errors
/// Once closed, every operation except `close` fails with `JournalClosed`.
pub trait JournalProvider: Send + Sync {
    /// Adds a version. Recording an already present version is a no-op.
    fn record(&self, version: Version) -> MigrateResult<()>;

    /// Removes a version. Removing an absent version is a no-op.
    fn unrecord(&self, version: Version) -> MigrateResult<()>;

    /// Returns a copy of the applied set taken under the journal lock.
    fn current_versions(&self) -> MigrateResult<AppliedVersionSet>;

    /// Returns the highest applied version, or `None` when nothing is applied.
    ///
    /// `None` is distinct from `Some(Version(0))`, which is a valid version.
    fn latest_version(&self) -> MigrateResult<Option<Version>>;

    /// Persists the full applied set, replacing whatever was stored before.
    fn flush(&self) -> MigrateResult<()>;

    /// Flushes and closes the journal. Closing twice is a no-op.
    fn close(&self) -> MigrateResult<()>;

    fn is_closed(&self) -> bool;
}

/// Cloneable handle to a [`JournalProvider`].
#[derive(Clone)]
pub struct Journal {
    inner: Arc<dyn JournalProvider>,
}

impl Journal {
    pub fn new<T: JournalProvider + 'static>(inner: T) -> Self {
        Journal {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Journal {
    type Target = Arc<dyn JournalProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Applied set plus closed flag, the state every journal guards with its lock.
#[derive(Debug, Default)]
pub(crate) struct JournalState {
    versions: AppliedVersionSet,
    closed: bool,
}

impl JournalState {
    pub(crate) fn new(versions: AppliedVersionSet) -> Self {
        JournalState {
            versions,
            closed: false,
        }
    }

    pub(crate) fn ensure_open(&self) -> MigrateResult<()> {
        if self.closed {
            return Err(MigrateError::new(
                "Journal is already closed",
                ErrorKind::JournalClosed,
            ));
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, version: Version) -> MigrateResult<()> {
        self.ensure_open()?;
        self.versions.insert(version);
        Ok(())
    }

    pub(crate) fn unrecord(&mut self, version: Version) -> MigrateResult<()> {
        self.ensure_open()?;
        self.versions.remove(&version);
        Ok(())
    }

    pub(crate) fn snapshot(&self) -> MigrateResult<AppliedVersionSet> {
        self.ensure_open()?;
        Ok(self.versions.clone())
    }

    pub(crate) fn latest(&self) -> MigrateResult<Option<Version>> {
        self.ensure_open()?;
        Ok(self.versions.last().copied())
    }

    pub(crate) fn versions(&self) -> &AppliedVersionSet {
        &self.versions
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn mark_closed(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_record_is_idempotent() {
        let mut state = JournalState::default();
        state.record(Version::new(7)).unwrap();
        state.record(Version::new(7)).unwrap();
        assert_eq!(state.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_state_unrecord_absent_is_noop() {
        let mut state = JournalState::default();
        state.unrecord(Version::new(7)).unwrap();
        state.unrecord(Version::new(7)).unwrap();
        assert!(state.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_state_latest() {
        let mut state = JournalState::default();
        assert_eq!(state.latest().unwrap(), None);
        state.record(Version::new(0)).unwrap();
        assert_eq!(state.latest().unwrap(), Some(Version::new(0)));
        state.record(Version::new(12)).unwrap();
        assert_eq!(state.latest().unwrap(), Some(Version::new(12)));
    }

    #[test]
    fn test_state_closed_rejects_operations() {
        let mut state = JournalState::default();
        state.mark_closed();
        assert_eq!(state.record(Version::new(1)).unwrap_err().kind(), &ErrorKind::JournalClosed);
        assert_eq!(state.snapshot().unwrap_err().kind(), &ErrorKind::JournalClosed);
        assert_eq!(state.latest().unwrap_err().kind(), &ErrorKind::JournalClosed);
    }
}
