use migrate::errors::MigrateResult;
use migrate::executor::ExecutorRegistry;
use migrate::migration::Migrator;
use migrate_bash_adapter::BashModule;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{env, fs};

/// Name of the file the default change units append their effects to.
pub const EFFECTS_FILE: &str = "effects.log";

/// Runs `test` between `before` and `after`. `after` also runs when the test
/// fails or panics, so scratch directories never leak.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> MigrateResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> MigrateResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> MigrateResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    // the context holds locks, which are not unwind safe; it is only cleaned up afterwards
    let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
        let backtrace = Backtrace::capture();
        test(test_ctx).map_err(|e| (format!("Test failed: {:?}", e), backtrace.to_string()))
    }));
    let after_result = after(ctx);
    let elapsed = start_time.elapsed();

    match result {
        Ok(Ok(())) => {}
        Ok(Err((e, bt))) => {
            eprintln!("\n==================== TEST FAILED (took {:?}) ====================", elapsed);
            if !bt.is_empty() && !bt.contains("disabled") {
                eprintln!("\nBacktrace:\n{}", bt);
            }
            panic!("{}", e);
        }
        Err(panic_err) => std::panic::resume_unwind(panic_err),
    }

    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    dir: PathBuf,
    registry: ExecutorRegistry,
    migrator: Migrator,
}

impl TestContext {
    pub fn new(dir: PathBuf, registry: ExecutorRegistry, migrator: Migrator) -> Self {
        Self {
            dir,
            registry,
            migrator,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn registry(&self) -> ExecutorRegistry {
        self.registry.clone()
    }

    pub fn migrator(&self) -> Migrator {
        self.migrator.clone()
    }

    pub fn journal_file(&self) -> PathBuf {
        self.dir.join(migrate::common::DEFAULT_JOURNAL_FILE)
    }

    /// Lines the change scripts appended to [`EFFECTS_FILE`], in order.
    pub fn effects(&self) -> Vec<String> {
        fs::read_to_string(self.dir.join(EFFECTS_FILE))
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn write_change_file(&self, name: &str, body: &str) {
        write_change_file(&self.dir, name, body)
    }

    /// Applied versions as plain integers, ascending.
    pub fn applied_versions(&self) -> MigrateResult<Vec<u64>> {
        Ok(self.migrator.versions()?.into_iter().map(u64::from).collect())
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(id.to_string())
}

pub fn write_change_file(dir: &Path, name: &str, body: &str) {
    if let Err(e) = fs::write(dir.join(name), body) {
        panic!("Failed to write change file {}: {}", name, e);
    }
}

/// A script that appends `<version> <direction>` to the effects file.
pub fn recording_script() -> String {
    format!(
        "echo \"$MIGRATE_VERSION $MIGRATE_DIRECTION\" >> \"$MIGRATE_SOURCE_DIR/{}\"\necho \"ran $MIGRATE_VERSION $MIGRATE_DIRECTION\"\n",
        EFFECTS_FILE
    )
}

pub fn bash_registry() -> MigrateResult<ExecutorRegistry> {
    let registry = ExecutorRegistry::new();
    registry.load_module(Box::new(BashModule::with_config().build()))?;
    Ok(registry)
}

/// Scratch directory holding three complete bash change units, versions
/// 1, 2 and 3, with a migrator opened over it through a `bash:` url.
pub fn create_test_context() -> MigrateResult<TestContext> {
    let dir = random_path();
    fs::create_dir_all(&dir)?;

    for (version, label) in [(1, "create_users"), (2, "add_email"), (3, "seed")] {
        for direction in ["up", "down"] {
            let name = format!("{}_{}.{}.sh", version, label, direction);
            write_change_file(&dir, &name, &recording_script());
        }
    }

    let registry = bash_registry()?;
    let migrator = Migrator::builder()
        .url(&registry, &format!("bash:{}", dir.display()))
        .open()?;

    Ok(TestContext::new(dir, registry, migrator))
}

/// Empty scratch directory with a migrator opened over it.
pub fn create_empty_test_context() -> MigrateResult<TestContext> {
    let dir = random_path();
    fs::create_dir_all(&dir)?;

    let registry = bash_registry()?;
    let migrator = Migrator::builder()
        .url(&registry, &format!("bash:{}", dir.display()))
        .open()?;

    Ok(TestContext::new(dir, registry, migrator))
}

pub fn cleanup(ctx: TestContext) -> MigrateResult<()> {
    if let Err(e) = ctx.migrator().close() {
        log::warn!("Failed to close migrator: {:?}", e);
    }
    if ctx.dir().exists() {
        fs::remove_dir_all(ctx.dir())?;
    }
    Ok(())
}
