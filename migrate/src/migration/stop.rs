use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop request for a running move.
///
/// The driving loop checks the handle before starting each change file. A
/// stop never interrupts a file already in flight, and every file that
/// finished before the stop was noticed is already in the journal.
///
/// The request is consumed by the move that observes it, even one with
/// nothing to run. A stop requested while no move is running cancels the
/// next one.
#[derive(Clone, Default, Debug)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        StopHandle::default()
    }

    pub fn stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub(crate) fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}
