use super::{ExecutedUnit, MigrationEvent, MigrationEventListener, MoveReport, StopHandle};
use crate::common::{EXCERPT_LINES_AFTER, EXCERPT_LINES_BEFORE, STEP_BACK, STEP_FORWARD};
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use crate::executor::{ExecutionFailure, Executor};
use crate::file::excerpt::{line_column_from_offset, lines_around};
use crate::file::{
    read_change_units, resolve, AppliedVersionSet, ChangeFile, ChangeUnitSet, Direction,
    FilenamePattern, MoveRequest, Version,
};
use crate::journal::{FileJournal, Journal};
use crate::migrator_builder::MigratorBuilder;
use crate::migrator_config::MigratorConfig;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Drives change files through an executor and keeps the journal in step.
///
/// # Moves
/// Every move rescans the source directory, snapshots the applied versions,
/// resolves the change files to run and runs them one at a time. A file is
/// handed to the executor only after the previous one has reported back and,
/// on success, has been recorded (forward) or unrecorded (reverse) in the
/// journal. With `flush_each_step` on, the journal is also flushed before the
/// next file starts.
///
/// A failing file halts the move. The journal keeps every file that succeeded
/// before it and is left untouched for the failing one.
///
/// Moves on one migrator are serialized: a second caller blocks until the
/// running move returns.
///
/// # Example
/// ```rust,ignore
/// let migrator = Migrator::builder()
///     .source_dir("./migrations")
///     .executor(bash_executor)
///     .open()?;
/// let report = migrator.up()?;
/// migrator.close()?;
/// ```
#[derive(Clone)]
pub struct Migrator {
    inner: Arc<MigratorInner>,
}

impl Migrator {
    pub fn builder() -> MigratorBuilder {
        MigratorBuilder::new()
    }

    /// Opens a migrator over an unopened config. The config is frozen from
    /// here on.
    pub fn open(config: MigratorConfig) -> MigrateResult<Migrator> {
        Ok(Migrator {
            inner: Arc::new(MigratorInner::open(config)?),
        })
    }

    /// Applies every pending change unit, oldest first.
    pub fn up(&self) -> MigrateResult<MoveReport> {
        let _guard = self.inner.in_flight.lock();
        self.inner.run_move(MoveRequest::Pending)
    }

    /// Reverts every applied change unit, newest first.
    pub fn down(&self) -> MigrateResult<MoveReport> {
        let _guard = self.inner.in_flight.lock();
        self.inner.run_move(MoveRequest::Applied)
    }

    /// Moves `n` units forward (`n > 0`) or back (`n < 0`). Requests beyond
    /// what is available run what is available.
    pub fn migrate(&self, n: i64) -> MigrateResult<MoveReport> {
        let _guard = self.inner.in_flight.lock();
        self.inner.run_move(MoveRequest::Relative(n))
    }

    /// Reverts the most recent unit, then applies the next pending one.
    pub fn redo(&self) -> MigrateResult<MoveReport> {
        let _guard = self.inner.in_flight.lock();
        let mut report = self.inner.run_move(MoveRequest::Relative(STEP_BACK))?;
        if report.is_empty() || report.cancelled {
            return Ok(report);
        }
        report.extend(self.inner.run_move(MoveRequest::Relative(STEP_FORWARD))?);
        Ok(report)
    }

    /// Reverts everything, then applies everything.
    pub fn reset(&self) -> MigrateResult<MoveReport> {
        let _guard = self.inner.in_flight.lock();
        let mut report = self.inner.run_move(MoveRequest::Applied)?;
        if report.cancelled {
            return Ok(report);
        }
        report.extend(self.inner.run_move(MoveRequest::Pending)?);
        Ok(report)
    }

    /// Latest applied version, `None` if nothing is applied.
    pub fn version(&self) -> MigrateResult<Option<Version>> {
        self.inner.ensure_open()?;
        self.inner.journal.latest_version()
    }

    pub fn versions(&self) -> MigrateResult<AppliedVersionSet> {
        self.inner.ensure_open()?;
        self.inner.journal.current_versions()
    }

    /// Forward files `up` would run, without running them.
    pub fn pending(&self) -> MigrateResult<Vec<ChangeFile>> {
        self.inner.preview(MoveRequest::Pending)
    }

    /// Reverse files `down` would run, without running them.
    pub fn applied(&self) -> MigrateResult<Vec<ChangeFile>> {
        self.inner.preview(MoveRequest::Applied)
    }

    pub fn change_units(&self) -> MigrateResult<ChangeUnitSet> {
        self.inner.ensure_open()?;
        self.inner.scan()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.inner.stop.clone()
    }

    pub fn config(&self) -> &MigratorConfig {
        &self.inner.config
    }

    pub fn executor(&self) -> &Executor {
        &self.inner.executor
    }

    pub fn journal(&self) -> &Journal {
        &self.inner.journal
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Flushes and closes the journal, then closes the executor. Closing
    /// twice is a no-op. If the journal cannot be written the migrator stays
    /// open and `close` can be retried.
    pub fn close(&self) -> MigrateResult<()> {
        let _guard = self.inner.in_flight.lock();
        self.inner.close()
    }
}

struct MigratorInner {
    config: MigratorConfig,
    source_dir: PathBuf,
    executor: Executor,
    journal: Journal,
    pattern: FilenamePattern,
    in_flight: Mutex<()>,
    stop: StopHandle,
    closed: AtomicBool,
}

impl MigratorInner {
    fn open(config: MigratorConfig) -> MigrateResult<MigratorInner> {
        config.initialize()?;

        let source_dir = config.source_dir().ok_or_else(|| {
            MigrateError::new("No source directory is configured", ErrorKind::InvalidOperation)
        })?;
        let executor = config.executor()?;
        executor.initialize(&config).map_err(|e| {
            MigrateError::new_with_cause(
                &format!("Failed to initialize executor '{}'", executor.name()),
                ErrorKind::ExecutorError,
                e,
            )
        })?;

        let pattern = FilenamePattern::new(&executor.filename_extension())?;
        let journal = match executor.version_tracker() {
            Some(tracker) => {
                log::debug!("Executor '{}' tracks versions natively", executor.name());
                tracker
            }
            None => {
                let path = config.journal_path().ok_or_else(|| {
                    MigrateError::new("No journal path is configured", ErrorKind::InvalidOperation)
                })?;
                Journal::new(FileJournal::open(path)?)
            }
        };

        log::info!(
            "Opened migrator over {} with executor '{}'",
            source_dir.display(),
            executor.name()
        );

        Ok(MigratorInner {
            config,
            source_dir,
            executor,
            journal,
            pattern,
            in_flight: Mutex::new(()),
            stop: StopHandle::new(),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> MigrateResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MigrateError::new(
                "Migrator is already closed",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn scan(&self) -> MigrateResult<ChangeUnitSet> {
        read_change_units(&self.source_dir, &self.pattern)
    }

    fn preview(&self, request: MoveRequest) -> MigrateResult<Vec<ChangeFile>> {
        self.ensure_open()?;
        let units = self.scan()?;
        let applied = self.journal.current_versions()?;
        Ok(resolve(&units, &applied, request))
    }

    // caller holds in_flight
    fn run_move(&self, request: MoveRequest) -> MigrateResult<MoveReport> {
        self.ensure_open()?;
        let files = self.preview(request)?;
        let listeners = self.config.listeners();
        let total = files.len();
        let mut report = MoveReport::default();

        log::debug!("Resolved {} change files for {:?}", total, request);

        // an empty move still consumes a pending stop
        if files.is_empty() && self.stop.take() {
            log::info!("Move stopped with nothing to run");
            report.cancelled = true;
            return Ok(report);
        }

        for file in files {
            if self.stop.take() {
                log::info!("Move stopped after {} of {} change files", report.len(), total);
                report.cancelled = true;
                return Ok(report);
            }

            notify(&listeners, MigrationEvent::Started(file.clone()));
            let outcome = self.executor.run(&file);

            if let Some(failure) = outcome.failure {
                let message = failure.error.message().to_string();
                notify(&listeners, MigrationEvent::Failed(file.clone(), message));
                let err = failure_error(&file, failure, report.len(), total);
                log::error!("{}", err);
                return Err(err);
            }

            if let Err(e) = self.update_journal(&file) {
                let err = journal_error(&file, e, report.len(), total);
                log::error!("{}", err);
                return Err(err);
            }

            log::info!("{} {}", direction_verb(file.direction()), file.file_name());
            let event = match file.direction() {
                Direction::Forward => MigrationEvent::Applied(file.clone()),
                Direction::Reverse => MigrationEvent::Reverted(file.clone()),
            };
            notify(&listeners, event);

            report.executed.push(ExecutedUnit {
                version: file.version(),
                direction: file.direction(),
                label: file.label().to_string(),
                output: outcome.output,
            });
        }

        Ok(report)
    }

    fn update_journal(&self, file: &ChangeFile) -> MigrateResult<()> {
        match file.direction() {
            Direction::Forward => self.journal.record(file.version())?,
            Direction::Reverse => self.journal.unrecord(file.version())?,
        }
        if self.config.flush_each_step() {
            self.journal.flush()?;
        }
        Ok(())
    }

    // caller holds in_flight; stays open until the journal is safely closed
    fn close(&self) -> MigrateResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(());
        }

        if !self.journal.is_closed() {
            self.journal.close()?;
        }
        self.closed.store(true, Ordering::SeqCst);

        self.executor.close().map_err(|e| {
            MigrateError::new_with_cause(
                &format!("Failed to close executor '{}'", self.executor.name()),
                ErrorKind::ExecutorError,
                e,
            )
        })
    }
}

fn notify(listeners: &[MigrationEventListener], event: MigrationEvent) {
    for listener in listeners {
        listener.notify(event.clone());
    }
}

fn direction_verb(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "Applied",
        Direction::Reverse => "Reverted",
    }
}

fn journal_error(
    file: &ChangeFile,
    cause: MigrateError,
    completed: usize,
    total: usize,
) -> MigrateError {
    let kind = cause.kind().clone();
    MigrateError::new_with_cause(
        &format!(
            "Change file {} ran but the journal was not updated; {} of {} change files completed before it",
            file.path().display(),
            completed,
            total
        ),
        kind,
        cause,
    )
}

fn failure_error(
    file: &ChangeFile,
    failure: ExecutionFailure,
    completed: usize,
    total: usize,
) -> MigrateError {
    let mut message = format!(
        "Change file {} failed after {} of {} change files completed",
        file.path().display(),
        completed,
        total
    );

    if let Some(offset) = failure.offset {
        if let Ok(content) = file.read_content() {
            let (line, column) = line_column_from_offset(content, offset);
            message.push_str(&format!(
                " (line {}, column {})\n{}",
                line,
                column,
                lines_around(content, line, EXCERPT_LINES_BEFORE, EXCERPT_LINES_AFTER, true)
            ));
        }
    }

    MigrateError::new_with_cause(&message, ErrorKind::ExecutionFailed, failure.error)
}
