use super::{Direction, Version};
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One change file on disk.
///
/// Example: `20060102150405_create_users.up.sql`
///
/// A `ChangeFile` is immutable once constructed. Its content is read lazily the
/// first time [`ChangeFile::read_content`] is called and cached afterwards.
#[derive(Clone)]
pub struct ChangeFile {
    dir: PathBuf,
    file_name: String,
    version: Version,
    label: String,
    direction: Direction,
    content: OnceLock<Vec<u8>>,
}

impl ChangeFile {
    pub fn new(
        dir: impl Into<PathBuf>,
        file_name: &str,
        version: Version,
        label: &str,
        direction: Direction,
    ) -> Self {
        ChangeFile {
            dir: dir.into(),
            file_name: file_name.to_string(),
            version,
            label: label.to_string(),
            direction,
            content: OnceLock::new(),
        }
    }

    /// Creates a change file whose content is already known, so no disk read
    /// ever happens for it.
    pub fn with_content(
        dir: impl Into<PathBuf>,
        file_name: &str,
        version: Version,
        label: &str,
        direction: Direction,
        content: Vec<u8>,
    ) -> Self {
        let file = ChangeFile::new(dir, file_name, version, label, direction);
        file.content.get_or_init(|| content);
        file
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the file: its directory joined with its file name.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_content_loaded(&self) -> bool {
        self.content.get().is_some()
    }

    /// Returns the file content, reading it from disk on first use.
    pub fn read_content(&self) -> MigrateResult<&[u8]> {
        if let Some(content) = self.content.get() {
            return Ok(content);
        }

        let path = self.path();
        let bytes = fs::read(&path).map_err(|e| {
            MigrateError::new_with_cause(
                &format!("Failed to read change file {}", path.display()),
                ErrorKind::IOError,
                e.into(),
            )
        })?;
        Ok(self.content.get_or_init(|| bytes))
    }
}

impl Debug for ChangeFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFile")
            .field("dir", &self.dir)
            .field("file_name", &self.file_name)
            .field("version", &self.version)
            .field("label", &self.label)
            .field("direction", &self.direction)
            .field("content_loaded", &self.is_content_loaded())
            .finish()
    }
}

impl PartialEq for ChangeFile {
    fn eq(&self, other: &Self) -> bool {
        self.dir == other.dir
            && self.file_name == other.file_name
            && self.version == other.version
            && self.direction == other.direction
    }
}

impl Eq for ChangeFile {}
