use crate::config::BashConfig;
use crate::error::BashError;
use migrate::errors::MigrateResult;
use migrate::executor::{ExecutorProvider, ResultPipe};
use migrate::file::ChangeFile;
use migrate::migrator_config::MigratorConfig;
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, OnceLock};
use std::thread;

pub const BASH_EXECUTOR: &str = "bash";
pub const BASH_EXTENSION: &str = "sh";

pub const ENV_VERSION: &str = "MIGRATE_VERSION";
pub const ENV_DIRECTION: &str = "MIGRATE_DIRECTION";
pub const ENV_LABEL: &str = "MIGRATE_LABEL";
pub const ENV_SOURCE_DIR: &str = "MIGRATE_SOURCE_DIR";

/// Runs `.sh` change files with `bash <file>`.
///
/// Each stdout line is forwarded to the result pipe as it is produced. A
/// non-zero exit fails the change file with whatever the script wrote to
/// stderr. Scripts see their version, direction and label in
/// `MIGRATE_VERSION`, `MIGRATE_DIRECTION` and `MIGRATE_LABEL`.
///
/// Applied versions are not tracked here; the migrator keeps them in its
/// file journal.
#[derive(Clone)]
pub struct BashExecutor {
    inner: Arc<BashExecutorInner>,
}

impl BashExecutor {
    pub fn new(config: BashConfig) -> BashExecutor {
        BashExecutor {
            inner: Arc::new(BashExecutorInner {
                config,
                source_dir: OnceLock::new(),
            }),
        }
    }

    pub fn config(&self) -> &BashConfig {
        &self.inner.config
    }
}

impl ExecutorProvider for BashExecutor {
    fn name(&self) -> String {
        BASH_EXECUTOR.to_string()
    }

    fn filename_extension(&self) -> String {
        BASH_EXTENSION.to_string()
    }

    fn initialize(&self, config: &MigratorConfig) -> MigrateResult<()> {
        if let Some(dir) = config.source_dir() {
            self.inner.source_dir.get_or_init(|| dir);
        }
        Ok(())
    }

    fn execute(&self, file: &ChangeFile, pipe: ResultPipe) {
        match self.inner.run_script(file, &pipe) {
            Ok(()) => pipe.succeed(),
            Err(e) => {
                log::error!("{}", e);
                pipe.fail(e.into())
            }
        }
    }
}

struct BashExecutorInner {
    config: BashConfig,
    source_dir: OnceLock<PathBuf>,
}

impl BashExecutorInner {
    fn run_script(&self, file: &ChangeFile, pipe: &ResultPipe) -> Result<(), BashError> {
        let bash = self.config.bash_path();
        let script = file.path();
        let script_name = script.display().to_string();

        let mut command = Command::new(&bash);
        command
            .arg(&script)
            .env(ENV_VERSION, file.version().to_string())
            .env(ENV_DIRECTION, file.direction().token())
            .env(ENV_LABEL, file.label())
            .envs(self.config.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = self.source_dir.get() {
            command.env(ENV_SOURCE_DIR, dir);
        }
        if let Some(dir) = self.config.working_dir() {
            command.current_dir(dir);
        }

        log::debug!("Running {} {}", bash, script_name);
        let mut child = command.spawn().map_err(|source| BashError::Spawn {
            bash: bash.clone(),
            script: script_name.clone(),
            source,
        })?;

        // drain stderr on its own thread so a chatty script cannot block on it
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = stderr.read_to_end(&mut buffer);
                String::from_utf8_lossy(&buffer).into_owned()
            })
        });

        let read_error = match child.stdout.take() {
            Some(stdout) => forward_lines(stdout, pipe),
            None => None,
        };

        let status = child.wait().map_err(|e| BashError::Output {
            script: script_name.clone(),
            message: e.to_string(),
        })?;
        let stderr = stderr_reader
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();

        if !status.success() {
            return Err(BashError::ExitStatus {
                script: script_name,
                status: status.to_string(),
                stderr,
            });
        }
        if let Some(message) = read_error {
            return Err(BashError::Output {
                script: script_name,
                message,
            });
        }
        Ok(())
    }
}

/// Sends every stdout line to the pipe, decoding lossily. Reads to EOF even
/// after a read error so the script never sees a closed pipe.
fn forward_lines(stdout: impl Read, pipe: &ResultPipe) -> Option<String> {
    let mut reader = BufReader::new(stdout);
    let mut line = Vec::new();
    let mut read_error = None;

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                if line.ends_with(b"\n") {
                    line.pop();
                    if line.ends_with(b"\r") {
                        line.pop();
                    }
                }
                pipe.output(String::from_utf8_lossy(&line).into_owned());
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                read_error.get_or_insert_with(|| e.to_string());
                let _ = io::copy(&mut reader, &mut io::sink());
                break;
            }
        }
    }
    read_error
}
