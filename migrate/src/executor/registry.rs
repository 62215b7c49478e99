use super::Executor;
use crate::common::URL_SCHEME_SEPARATOR;
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use itertools::Itertools;
use std::sync::Arc;

/// A bundle of executors an adapter crate contributes.
///
/// Modules are loaded into an [`ExecutorRegistry`] with
/// [`ExecutorRegistry::load_module`], which calls `load` with a registrar.
pub trait ExecutorModule: Send + Sync {
    fn executors(&self) -> MigrateResult<Vec<Executor>>;

    fn load(&self, registrar: &ExecutorRegistrar) -> MigrateResult<()>;
}

/// The registration surface handed to [`ExecutorModule::load`].
pub struct ExecutorRegistrar {
    registry: ExecutorRegistry,
}

impl ExecutorRegistrar {
    fn new(registry: ExecutorRegistry) -> Self {
        ExecutorRegistrar { registry }
    }

    pub fn register_executor(&self, executor: Executor) -> MigrateResult<()> {
        self.registry.register(executor)
    }
}

/// Explicit name to executor registry.
///
/// The application builds one, loads the modules it wants and passes it to
/// whatever needs to pick an executor. Cloning is cheap and clones share the
/// same entries.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    inner: Arc<ExecutorRegistryInner>,
}

#[derive(Default)]
struct ExecutorRegistryInner {
    executors: DashMap<String, Executor>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        ExecutorRegistry::default()
    }

    /// Registers an executor under its name. A second executor with the same
    /// name fails with `PluginError`.
    pub fn register(&self, executor: Executor) -> MigrateResult<()> {
        let name = executor.name();
        match self.inner.executors.entry(name.clone()) {
            Entry::Occupied(_) => Err(MigrateError::new(
                &format!("An executor named '{}' is already registered", name),
                ErrorKind::PluginError,
            )),
            Entry::Vacant(entry) => {
                entry.insert(executor);
                log::debug!("Registered executor '{}'", name);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> MigrateResult<Executor> {
        self.inner
            .executors
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                MigrateError::new(
                    &format!(
                        "No executor named '{}', available: [{}]",
                        name,
                        self.names().join(", ")
                    ),
                    ErrorKind::ExecutorNotFound,
                )
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.executors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .executors
            .iter()
            .map(|entry| entry.key().clone())
            .sorted()
            .collect()
    }

    /// Picks the executor named by the scheme of `url` and returns it together
    /// with the rest of the url, e.g. `bash:./versions` yields the `bash`
    /// executor and `./versions`.
    pub fn resolve_url(&self, url: &str) -> MigrateResult<(Executor, String)> {
        let (scheme, location) = url.split_once(URL_SCHEME_SEPARATOR).ok_or_else(|| {
            MigrateError::new(
                &format!("Url '{}' has no executor scheme", url),
                ErrorKind::InvalidOperation,
            )
        })?;
        if scheme.is_empty() {
            return Err(MigrateError::new(
                &format!("Url '{}' has an empty executor scheme", url),
                ErrorKind::InvalidOperation,
            ));
        }

        let executor = self.get(scheme)?;
        Ok((executor, location.to_string()))
    }

    pub fn load_module(&self, module: Box<dyn ExecutorModule>) -> MigrateResult<()> {
        let registrar = ExecutorRegistrar::new(self.clone());
        module.load(&registrar)
    }

    /// Closes every registered executor. All are attempted; the first error
    /// is returned.
    pub fn close(&self) -> MigrateResult<()> {
        let mut first_error = None;
        for entry in self.inner.executors.iter() {
            if let Err(e) = entry.value().close() {
                log::error!("Error while closing executor '{}': {}", entry.key(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
