use crate::errors::{MigrateError, MigrateResult};
use crate::executor::{Executor, ExecutorRegistry};
use crate::migration::{MigrationEventListener, Migrator};
use crate::migrator_config::MigratorConfig;
use std::path::Path;

/// Fluent construction of a [`Migrator`].
///
/// The first setter that fails is remembered and reported by [`open`]; later
/// setters are skipped.
///
/// [`open`]: MigratorBuilder::open
#[derive(Default)]
pub struct MigratorBuilder {
    error: Option<MigrateError>,
    config: MigratorConfig,
}

impl MigratorBuilder {
    pub fn new() -> Self {
        MigratorBuilder {
            error: None,
            config: MigratorConfig::new(),
        }
    }

    fn apply(mut self, f: impl FnOnce(&MigratorConfig) -> MigrateResult<()>) -> Self {
        if self.error.is_none() {
            if let Err(e) = f(&self.config) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn source_dir(self, dir: impl AsRef<Path>) -> Self {
        self.apply(|config| config.set_source_dir(dir))
    }

    pub fn journal_path(self, path: impl AsRef<Path>) -> Self {
        self.apply(|config| config.set_journal_path(path))
    }

    pub fn executor(self, executor: Executor) -> Self {
        self.apply(|config| config.set_executor(executor))
    }

    /// Picks the executor and source directory from a url such as
    /// `bash:./migrations`.
    pub fn url(self, registry: &ExecutorRegistry, url: &str) -> Self {
        self.apply(|config| {
            let (executor, location) = registry.resolve_url(url)?;
            config.set_executor(executor)?;
            config.set_source_dir(location)
        })
    }

    pub fn flush_each_step(self, flush: bool) -> Self {
        self.apply(|config| config.set_flush_each_step(flush))
    }

    pub fn add_listener(self, listener: MigrationEventListener) -> Self {
        self.apply(|config| config.add_listener(listener))
    }

    pub fn open(self) -> MigrateResult<Migrator> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Migrator::open(self.config)
    }
}
