use super::{Direction, Version};
use crate::common::{EXTENSION_PLACEHOLDER, FILENAME_PATTERN_TEMPLATE};
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use regex::Regex;

/// Identity parsed from a change file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub version: Version,
    pub label: String,
    pub direction: Direction,
}

/// Naming convention `<version>_<label>.<up|down>.<extension>` for one executor.
///
/// The extension comes from the executor in use, since different executors
/// run different kinds of scripts.
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    extension: String,
    regex: Regex,
}

impl FilenamePattern {
    pub fn new(extension: &str) -> MigrateResult<FilenamePattern> {
        let pattern =
            FILENAME_PATTERN_TEMPLATE.replace(EXTENSION_PLACEHOLDER, &regex::escape(extension));
        let regex = Regex::new(&pattern).map_err(|e| {
            MigrateError::new(
                &format!("Invalid file name pattern for extension '{}': {}", extension, e),
                ErrorKind::InvalidOperation,
            )
        })?;

        Ok(FilenamePattern {
            extension: extension.to_string(),
            regex,
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns `true` if the file name follows the naming convention, without
    /// validating the captured parts.
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// Parses a file name into its identity.
    ///
    /// Returns `Ok(None)` for names that are not change files at all. A name
    /// that matches the convention but carries a bad version or direction is a
    /// corrupt change file and fails with `InvalidVersion` or `InvalidDirection`.
    pub fn parse(&self, file_name: &str) -> MigrateResult<Option<FileIdentity>> {
        let captures = match self.regex.captures(file_name) {
            Some(captures) => captures,
            None => return Ok(None),
        };

        let version = captures[1].parse::<Version>().map_err(|e| {
            MigrateError::new_with_cause(
                &format!("Unable to parse version in file name '{}'", file_name),
                ErrorKind::InvalidVersion,
                e,
            )
        })?;
        let label = captures[2].to_string();
        let direction = Direction::from_token(&captures[3])?;

        Ok(Some(FileIdentity {
            version,
            label,
            direction,
        }))
    }
}
