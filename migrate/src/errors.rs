use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for migrate operations.
///
/// Each kind names one category of failure so callers can tell a corrupt
/// change file apart from an unreadable source directory or a failed
/// executor run without matching on message text.
///
/// # Examples
///
/// ```rust,ignore
/// use migrate::errors::{MigrateError, ErrorKind, MigrateResult};
///
/// fn example() -> MigrateResult<()> {
///     Err(MigrateError::new("journal line 3 is not a version", ErrorKind::JournalCorrupt))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Change file errors - raised while parsing file names and pairing units
    /// The version prefix of a change file name is not a valid unsigned integer
    InvalidVersion,
    /// The direction token of a change file name is neither `up` nor `down`
    InvalidDirection,
    /// Two change files share the same version and direction
    DuplicateVersion,
    /// The change file source directory cannot be read
    SourceUnavailable,

    // Journal errors - raised while loading or persisting applied versions
    /// The durable journal contains a line that is not a version
    JournalCorrupt,
    /// The journal could not be written durably
    JournalWriteFailed,
    /// The journal has already been closed
    JournalClosed,

    // Executor errors - raised at the executor boundary
    /// No executor is registered under the requested name
    ExecutorNotFound,
    /// The executor could not be initialized or closed
    ExecutorError,
    /// The executor reported a failed change file
    ExecutionFailed,

    // Driving loop errors
    /// The operation is not valid in the current context
    InvalidOperation,

    // IO errors - raised in file operations
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,
    /// Error decoding file content
    EncodingError,

    // Plugin errors - raised while registering executor modules
    /// Error while loading or registering an executor module
    PluginError,

    /// Error from an extension crate (e.g., "bash")
    Extension(String),

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidVersion => write!(f, "Invalid version"),
            ErrorKind::InvalidDirection => write!(f, "Invalid direction"),
            ErrorKind::DuplicateVersion => write!(f, "Duplicate version"),
            ErrorKind::SourceUnavailable => write!(f, "Source unavailable"),
            ErrorKind::JournalCorrupt => write!(f, "Journal corrupt"),
            ErrorKind::JournalWriteFailed => write!(f, "Journal write failed"),
            ErrorKind::JournalClosed => write!(f, "Journal closed"),
            ErrorKind::ExecutorNotFound => write!(f, "Executor not found"),
            ErrorKind::ExecutorError => write!(f, "Executor error"),
            ErrorKind::ExecutionFailed => write!(f, "Execution failed"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::PluginError => write!(f, "Plugin error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom migrate error type.
///
/// `MigrateError` carries a message, an [`ErrorKind`], an optional cause and the
/// backtrace captured at construction time.
///
/// # Examples
///
/// ```rust,ignore
/// use migrate::errors::{MigrateError, ErrorKind};
///
/// let cause = MigrateError::new("permission denied", ErrorKind::PermissionDenied);
/// let err = MigrateError::new_with_cause(
///     "Cannot read change files",
///     ErrorKind::SourceUnavailable,
///     cause,
/// );
/// ```
#[derive(Clone)]
pub struct MigrateError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MigrateError>>,
    backtrace: Atomic<Backtrace>,
}

impl MigrateError {
    /// Creates a new `MigrateError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MigrateError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `MigrateError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MigrateError) -> Self {
        MigrateError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MigrateError> {
        self.cause.as_deref()
    }
}

impl Display for MigrateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MigrateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for MigrateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for migrate operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        MigrateError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for MigrateError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        MigrateError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<std::num::ParseIntError> for MigrateError {
    fn from(err: std::num::ParseIntError) -> Self {
        MigrateError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidVersion,
        )
    }
}

impl From<String> for MigrateError {
    fn from(msg: String) -> Self {
        MigrateError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MigrateError {
    fn from(msg: &str) -> Self {
        MigrateError::new(msg, ErrorKind::InternalError)
    }
}
