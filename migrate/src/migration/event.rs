use crate::errors::MigrateResult;
use crate::file::ChangeFile;
use std::fmt::Debug;
use std::sync::Arc;

/// Progress of a move, reported once per change file.
#[derive(Debug, Clone)]
pub enum MigrationEvent {
    Started(ChangeFile),
    Applied(ChangeFile),
    Reverted(ChangeFile),
    Failed(ChangeFile, String),
}

impl MigrationEvent {
    pub fn file(&self) -> &ChangeFile {
        match self {
            MigrationEvent::Started(file)
            | MigrationEvent::Applied(file)
            | MigrationEvent::Reverted(file)
            | MigrationEvent::Failed(file, _) => file,
        }
    }
}

pub trait MigrationEventCallback: Send + Sync + Fn(MigrationEvent) -> MigrateResult<()> {}

impl<F> MigrationEventCallback for F where F: Send + Sync + Fn(MigrationEvent) -> MigrateResult<()> {}

/// Callback notified of every [`MigrationEvent`].
///
/// A listener returning an error is logged; the move carries on.
#[derive(Clone)]
pub struct MigrationEventListener {
    on_event: Arc<dyn MigrationEventCallback>,
}

impl MigrationEventListener {
    pub fn new(on_event: impl MigrationEventCallback + 'static) -> Self {
        MigrationEventListener {
            on_event: Arc::new(on_event),
        }
    }

    pub(crate) fn notify(&self, event: MigrationEvent) {
        let file_name = event.file().file_name().to_string();
        if let Err(e) = (self.on_event)(event) {
            log::warn!("Migration event listener failed for {}: {}", file_name, e);
        }
    }
}

impl Debug for MigrationEventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationEventListener").finish()
    }
}
