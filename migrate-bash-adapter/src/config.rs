use migrate::common::{atomic, Atomic, ReadWith, WriteWith};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_BASH: &str = "bash";

/// Settings for the bash executor.
///
/// Built through [`BashModule::with_config`](crate::BashModule::with_config).
/// Clones share the same settings.
#[derive(Clone)]
pub struct BashConfig {
    inner: Arc<BashConfigInner>,
}

impl Default for BashConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BashConfig {
    #[inline]
    pub fn new() -> BashConfig {
        BashConfig {
            inner: Arc::new(BashConfigInner::new()),
        }
    }

    /// The bash binary, `bash` from `PATH` by default.
    #[inline]
    pub fn bash_path(&self) -> String {
        self.inner.bash_path.read_with(|it| it.clone())
    }

    #[inline]
    pub(crate) fn set_bash_path(&self, bash_path: &str) {
        self.inner.bash_path.write_with(|it| *it = bash_path.to_string())
    }

    /// Directory scripts run in. `None` keeps the current directory.
    #[inline]
    pub fn working_dir(&self) -> Option<PathBuf> {
        self.inner.working_dir.read_with(|it| it.clone())
    }

    #[inline]
    pub(crate) fn set_working_dir(&self, dir: &Path) {
        self.inner
            .working_dir
            .write_with(|it| *it = Some(dir.to_path_buf()))
    }

    /// Extra environment passed to every script.
    #[inline]
    pub fn env(&self) -> BTreeMap<String, String> {
        self.inner.env.read_with(|it| it.clone())
    }

    #[inline]
    pub(crate) fn set_env(&self, key: &str, value: &str) {
        self.inner
            .env
            .write_with(|it| it.insert(key.to_string(), value.to_string()));
    }
}

struct BashConfigInner {
    bash_path: Atomic<String>,
    working_dir: Atomic<Option<PathBuf>>,
    env: Atomic<BTreeMap<String, String>>,
}

impl BashConfigInner {
    fn new() -> BashConfigInner {
        BashConfigInner {
            bash_path: atomic(DEFAULT_BASH.to_string()),
            working_dir: atomic(None),
            env: atomic(BTreeMap::new()),
        }
    }
}
