use super::format::{decode_versions, encode_versions};
use super::version_journal::JournalState;
use super::JournalProvider;
use crate::common::JOURNAL_TEMP_EXTENSION;
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use crate::file::{AppliedVersionSet, Version};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable journal backed by a plain text file, one version per line.
///
/// # Durability
/// `flush` never rewrites the journal in place. The full applied set is written
/// to `<journal>.tmp`, synced, renamed over the journal and the parent
/// directory is synced, so a crash mid-write leaves either the old or the new
/// content on disk. If any step fails the flush fails with
/// `JournalWriteFailed` and the old file stays untouched.
///
/// # Loading
/// A missing journal file is a first run and loads as empty. A file that
/// exists but cannot be read is also treated as empty, with a warning.
/// Malformed content fails with `JournalCorrupt`.
#[derive(Clone)]
pub struct FileJournal {
    inner: Arc<FileJournalInner>,
}

struct FileJournalInner {
    path: PathBuf,
    state: Mutex<JournalState>,
}

impl FileJournal {
    pub fn open(path: impl AsRef<Path>) -> MigrateResult<FileJournal> {
        let path = path.as_ref().to_path_buf();
        let versions = load(&path)?;
        log::debug!("Opened journal {} with {} versions", path.display(), versions.len());

        Ok(FileJournal {
            inner: Arc::new(FileJournalInner {
                path,
                state: Mutex::new(JournalState::new(versions)),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl JournalProvider for FileJournal {
    fn record(&self, version: Version) -> MigrateResult<()> {
        self.inner.state.lock().record(version)
    }

    fn unrecord(&self, version: Version) -> MigrateResult<()> {
        self.inner.state.lock().unrecord(version)
    }

    fn current_versions(&self) -> MigrateResult<AppliedVersionSet> {
        self.inner.state.lock().snapshot()
    }

    fn latest_version(&self) -> MigrateResult<Option<Version>> {
        self.inner.state.lock().latest()
    }

    fn flush(&self) -> MigrateResult<()> {
        let state = self.inner.state.lock();
        state.ensure_open()?;
        write_atomically(&self.inner.path, state.versions())
    }

    fn close(&self) -> MigrateResult<()> {
        let mut state = self.inner.state.lock();
        if state.is_closed() {
            return Ok(());
        }
        write_atomically(&self.inner.path, state.versions())?;
        state.mark_closed();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.inner.state.lock().is_closed()
    }
}

fn load(path: &Path) -> MigrateResult<AppliedVersionSet> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppliedVersionSet::new()),
        Err(e) => {
            log::warn!("Journal {} is unreadable, starting empty: {}", path.display(), e);
            return Ok(AppliedVersionSet::new());
        }
    };

    let text = String::from_utf8(bytes).map_err(|e| {
        MigrateError::new_with_cause(
            &format!("Journal {} is not valid UTF-8", path.display()),
            ErrorKind::JournalCorrupt,
            e.into(),
        )
    })?;

    decode_versions(&text).map_err(|e| {
        MigrateError::new_with_cause(
            &format!("Journal {} is corrupt", path.display()),
            ErrorKind::JournalCorrupt,
            e,
        )
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("journal"));
    name.push(".");
    name.push(JOURNAL_TEMP_EXTENSION);
    path.with_file_name(name)
}

fn write_atomically(path: &Path, versions: &AppliedVersionSet) -> MigrateResult<()> {
    let temp = temp_path(path);
    let result = write_and_swap(path, &temp, encode_versions(versions).as_bytes());
    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(MigrateError::new_with_cause(
            &format!("Failed to write journal {}", path.display()),
            ErrorKind::JournalWriteFailed,
            e.into(),
        ));
    }

    log::debug!("Flushed {} versions to journal {}", versions.len(), path.display());
    Ok(())
}

fn write_and_swap(path: &Path, temp: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    fs::rename(temp, path)?;
    sync_parent_dir(path)
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => File::open(".")?.sync_all(),
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
