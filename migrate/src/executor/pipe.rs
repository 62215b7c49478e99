use crate::errors::{ErrorKind, MigrateError};
use crossbeam::channel::{unbounded, Receiver, Sender};

/// One message travelling from an executor to the driving loop.
#[derive(Debug)]
pub enum ExecutionEvent {
    /// A line of output produced while the change file runs.
    Output(String),
    /// The change file ran to completion.
    Succeeded,
    /// The change file failed. `offset` optionally points at the byte in the
    /// file's content where the failure happened.
    Failed {
        error: MigrateError,
        offset: Option<usize>,
    },
}

/// Single-use channel an executor reports one change file's result through.
///
/// Any number of [`output`](ResultPipe::output) calls may precede exactly one
/// terminal call, [`succeed`](ResultPipe::succeed) or
/// [`fail`](ResultPipe::fail), both of which consume the pipe. A pipe dropped
/// without a terminal call is reported to the driving loop as a failure.
///
/// The pipe is `Send`, so an executor may move it to another thread and
/// report from there.
pub struct ResultPipe {
    sender: Sender<ExecutionEvent>,
}

impl ResultPipe {
    pub(crate) fn channel() -> (ResultPipe, Receiver<ExecutionEvent>) {
        // unbounded: a synchronous executor may emit all its output before
        // the driving loop starts reading
        let (sender, receiver) = unbounded();
        (ResultPipe { sender }, receiver)
    }

    pub fn output(&self, line: impl Into<String>) {
        self.send(ExecutionEvent::Output(line.into()));
    }

    pub fn succeed(self) {
        self.send(ExecutionEvent::Succeeded);
    }

    pub fn fail(self, error: MigrateError) {
        self.send(ExecutionEvent::Failed {
            error,
            offset: None,
        });
    }

    /// Fails the change file, pointing at the byte `offset` of its content.
    pub fn fail_at(self, error: MigrateError, offset: usize) {
        self.send(ExecutionEvent::Failed {
            error,
            offset: Some(offset),
        });
    }

    fn send(&self, event: ExecutionEvent) {
        if self.sender.send(event).is_err() {
            log::debug!("Result pipe receiver is gone, dropping executor event");
        }
    }
}

/// Why a change file failed.
#[derive(Debug, Clone)]
pub struct ExecutionFailure {
    pub error: MigrateError,
    pub offset: Option<usize>,
}

/// Everything an executor reported for one change file.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    pub output: Vec<String>,
    pub failure: Option<ExecutionFailure>,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Drains events until the terminal one. A disconnected channel without a
    /// terminal event counts as a failure.
    pub(crate) fn collect(events: Receiver<ExecutionEvent>) -> ExecutionOutcome {
        let mut outcome = ExecutionOutcome::default();
        loop {
            match events.recv() {
                Ok(ExecutionEvent::Output(line)) => {
                    log::debug!("{}", line);
                    outcome.output.push(line);
                }
                Ok(ExecutionEvent::Succeeded) => return outcome,
                Ok(ExecutionEvent::Failed { error, offset }) => {
                    outcome.failure = Some(ExecutionFailure { error, offset });
                    return outcome;
                }
                Err(_) => {
                    outcome.failure = Some(ExecutionFailure {
                        error: MigrateError::new(
                            "Executor hung up without reporting a result",
                            ErrorKind::ExecutorError,
                        ),
                        offset: None,
                    });
                    return outcome;
                }
            }
        }
    }
}
