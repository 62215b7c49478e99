use super::{ExecutionOutcome, ResultPipe};
use crate::errors::MigrateResult;
use crate::file::ChangeFile;
use crate::journal::Journal;
use crate::migrator_config::MigratorConfig;
use std::ops::Deref;
use std::sync::Arc;

/// Backend that applies one change file to a real target.
///
/// # Purpose
/// The core never runs change files itself. It resolves which file to run
/// next, hands it to an executor together with a [`ResultPipe`] and waits for
/// the terminal event before looking at the next file.
///
/// # Contract
/// - `execute` must eventually call exactly one of `succeed` / `fail` on the
///   pipe, from any thread. It may return before doing so.
/// - Timeouts for a single change file are the executor's business.
/// - An executor that keeps its own record of applied versions (a native
///   version table in the target, say) exposes it through
///   `version_tracker`; that journal then replaces the file-backed one.
pub trait ExecutorProvider: Send + Sync {
    /// Name the executor is registered under, also used as URL scheme.
    fn name(&self) -> String;

    /// Extension of the change files this executor runs, without a dot.
    fn filename_extension(&self) -> String;

    fn initialize(&self, _config: &MigratorConfig) -> MigrateResult<()> {
        Ok(())
    }

    fn execute(&self, file: &ChangeFile, pipe: ResultPipe);

    fn version_tracker(&self) -> Option<Journal> {
        None
    }

    fn close(&self) -> MigrateResult<()> {
        Ok(())
    }
}

/// Cloneable handle to an [`ExecutorProvider`].
#[derive(Clone)]
pub struct Executor {
    inner: Arc<dyn ExecutorProvider>,
}

impl Executor {
    pub fn new<T: ExecutorProvider + 'static>(inner: T) -> Self {
        Executor {
            inner: Arc::new(inner),
        }
    }

    /// Runs one change file and blocks until the executor reports its result.
    pub fn run(&self, file: &ChangeFile) -> ExecutionOutcome {
        let (pipe, events) = ResultPipe::channel();
        self.inner.execute(file, pipe);
        ExecutionOutcome::collect(events)
    }
}

impl Deref for Executor {
    type Target = Arc<dyn ExecutorProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
