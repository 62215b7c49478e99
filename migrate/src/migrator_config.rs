//! Configuration of a [`Migrator`](crate::migration::Migrator).

use crate::common::{ReadWith, WriteWith, DEFAULT_JOURNAL_FILE};
use crate::common::{atomic, Atomic};
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use crate::executor::Executor;
use crate::migration::MigrationEventListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Settings a migrator is opened with.
///
/// `MigratorConfig` is a cheap, cloneable handle. Every setter fails with
/// `InvalidOperation` once the migrator using the config has been opened.
///
/// | setting | default |
/// |---|---|
/// | source directory | required |
/// | executor | required |
/// | journal path | `<source dir>/.migrate_versions` |
/// | flush after each step | `true` |
#[derive(Clone)]
pub struct MigratorConfig {
    inner: Arc<MigratorConfigInner>,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MigratorConfig {
    pub fn new() -> Self {
        MigratorConfig {
            inner: Arc::new(MigratorConfigInner::new()),
        }
    }

    pub fn source_dir(&self) -> Option<PathBuf> {
        self.inner.source_dir()
    }

    pub fn set_source_dir(&self, dir: impl AsRef<Path>) -> MigrateResult<()> {
        self.inner.set_source_dir(dir.as_ref())
    }

    /// The journal location: the explicit one if set, else
    /// [`DEFAULT_JOURNAL_FILE`] inside the source directory.
    pub fn journal_path(&self) -> Option<PathBuf> {
        self.inner.journal_path()
    }

    pub fn set_journal_path(&self, path: impl AsRef<Path>) -> MigrateResult<()> {
        self.inner.set_journal_path(path.as_ref())
    }

    pub fn executor(&self) -> MigrateResult<Executor> {
        self.inner.executor()
    }

    pub fn set_executor(&self, executor: Executor) -> MigrateResult<()> {
        self.inner.set_executor(executor)
    }

    pub fn flush_each_step(&self) -> bool {
        self.inner.flush_each_step.load(Ordering::Relaxed)
    }

    pub fn set_flush_each_step(&self, flush: bool) -> MigrateResult<()> {
        self.inner.set_flush_each_step(flush)
    }

    pub fn add_listener(&self, listener: MigrationEventListener) -> MigrateResult<()> {
        self.inner.add_listener(listener)
    }

    pub fn listeners(&self) -> Vec<MigrationEventListener> {
        self.inner.listeners.read_with(|it| it.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    /// Checks required settings and freezes the config.
    pub(crate) fn initialize(&self) -> MigrateResult<()> {
        self.inner.initialize()
    }
}

struct MigratorConfigInner {
    configured: AtomicBool,
    source_dir: OnceLock<PathBuf>,
    journal_path: OnceLock<PathBuf>,
    executor: OnceLock<Executor>,
    flush_each_step: AtomicBool,
    listeners: Atomic<Vec<MigrationEventListener>>,
}

impl MigratorConfigInner {
    fn new() -> Self {
        MigratorConfigInner {
            configured: AtomicBool::from(false),
            source_dir: OnceLock::new(),
            journal_path: OnceLock::new(),
            executor: OnceLock::new(),
            flush_each_step: AtomicBool::from(true),
            listeners: atomic(Vec::new()),
        }
    }

    fn ensure_not_configured(&self, what: &str) -> MigrateResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            return Err(MigrateError::new(
                &format!("{} cannot be changed after the migrator is opened", what),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn source_dir(&self) -> Option<PathBuf> {
        self.source_dir.get().cloned()
    }

    fn set_source_dir(&self, dir: &Path) -> MigrateResult<()> {
        self.ensure_not_configured("Source directory")?;
        if dir.as_os_str().is_empty() {
            return Err(MigrateError::new(
                "Source directory cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }
        set_once(&self.source_dir, dir.to_path_buf(), "Source directory")
    }

    fn journal_path(&self) -> Option<PathBuf> {
        match self.journal_path.get() {
            Some(path) => Some(path.clone()),
            None => self.source_dir().map(|dir| dir.join(DEFAULT_JOURNAL_FILE)),
        }
    }

    fn set_journal_path(&self, path: &Path) -> MigrateResult<()> {
        self.ensure_not_configured("Journal path")?;
        if path.as_os_str().is_empty() {
            return Err(MigrateError::new(
                "Journal path cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }
        set_once(&self.journal_path, path.to_path_buf(), "Journal path")
    }

    fn executor(&self) -> MigrateResult<Executor> {
        self.executor.get().cloned().ok_or_else(|| {
            MigrateError::new("No executor is configured", ErrorKind::ExecutorNotFound)
        })
    }

    fn set_executor(&self, executor: Executor) -> MigrateResult<()> {
        self.ensure_not_configured("Executor")?;
        set_once(&self.executor, executor, "Executor")
    }

    fn set_flush_each_step(&self, flush: bool) -> MigrateResult<()> {
        self.ensure_not_configured("Flush policy")?;
        self.flush_each_step.store(flush, Ordering::Relaxed);
        Ok(())
    }

    fn add_listener(&self, listener: MigrationEventListener) -> MigrateResult<()> {
        self.ensure_not_configured("Listeners")?;
        self.listeners.write_with(|it| it.push(listener));
        Ok(())
    }

    fn initialize(&self) -> MigrateResult<()> {
        if self.source_dir.get().is_none() {
            return Err(MigrateError::new(
                "No source directory is configured",
                ErrorKind::InvalidOperation,
            ));
        }
        self.executor()?;
        self.configured.store(true, Ordering::Relaxed);
        Ok(())
    }
}

fn set_once<T>(cell: &OnceLock<T>, value: T, what: &str) -> MigrateResult<()> {
    cell.set(value).map_err(|_| {
        MigrateError::new(
            &format!("{} is already set", what),
            ErrorKind::InvalidOperation,
        )
    })
}
