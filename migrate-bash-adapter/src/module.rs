use crate::config::BashConfig;
use crate::executor::BashExecutor;
use migrate::errors::MigrateResult;
use migrate::executor::{Executor, ExecutorModule, ExecutorRegistrar};
use std::path::Path;

/// Contributes the bash executor to an executor registry.
///
/// ```rust,ignore
/// let registry = ExecutorRegistry::new();
/// registry.load_module(Box::new(
///     BashModule::with_config().env("DATABASE_URL", url).build(),
/// ))?;
/// ```
pub struct BashModule {
    config: BashConfig,
}

impl BashModule {
    #[inline]
    pub fn with_config() -> BashModuleBuilder {
        BashModuleBuilder::new()
    }

    pub fn executor(&self) -> Executor {
        Executor::new(BashExecutor::new(self.config.clone()))
    }
}

impl ExecutorModule for BashModule {
    fn executors(&self) -> MigrateResult<Vec<Executor>> {
        Ok(vec![self.executor()])
    }

    fn load(&self, registrar: &ExecutorRegistrar) -> MigrateResult<()> {
        registrar.register_executor(self.executor())
    }
}

pub struct BashModuleBuilder {
    config: BashConfig,
}

impl Default for BashModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BashModuleBuilder {
    #[inline]
    pub fn new() -> BashModuleBuilder {
        BashModuleBuilder {
            config: BashConfig::new(),
        }
    }

    #[inline]
    pub fn bash_path(self, bash_path: &str) -> Self {
        self.config.set_bash_path(bash_path);
        self
    }

    #[inline]
    pub fn working_dir(self, dir: impl AsRef<Path>) -> Self {
        self.config.set_working_dir(dir.as_ref());
        self
    }

    #[inline]
    pub fn env(self, key: &str, value: &str) -> Self {
        self.config.set_env(key, value);
        self
    }

    pub fn build(self) -> BashModule {
        BashModule {
            config: self.config,
        }
    }
}
