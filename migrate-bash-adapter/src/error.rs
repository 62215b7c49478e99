use migrate::errors::{ErrorKind, MigrateError};
use thiserror::Error;

/// Failures specific to running change files through bash.
#[derive(Error, Debug)]
pub enum BashError {
    /// The bash process could not be started
    #[error("Failed to start '{bash}' for {script}: {source}")]
    Spawn {
        bash: String,
        script: String,
        #[source]
        source: std::io::Error,
    },
    /// Reading the script's output failed
    #[error("Failed to read output of {script}: {message}")]
    Output { script: String, message: String },
    /// The script ran but exited unsuccessfully
    #[error("{script} exited with {status}{}", stderr_suffix(.stderr))]
    ExitStatus {
        script: String,
        status: String,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl From<BashError> for MigrateError {
    fn from(err: BashError) -> Self {
        let kind = match &err {
            BashError::ExitStatus { .. } => ErrorKind::ExecutionFailed,
            _ => ErrorKind::Extension("bash".to_string()),
        };
        MigrateError::new(&err.to_string(), kind)
    }
}
