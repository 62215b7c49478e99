use super::{ChangeFile, Direction, FilenamePattern, Version};
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use itertools::Itertools;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The forward and reverse change files sharing one version.
///
/// At least one side is always present. A unit with only a forward side has
/// no authored rollback; a unit with only a reverse side cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeUnit {
    version: Version,
    forward: Option<ChangeFile>,
    reverse: Option<ChangeFile>,
}

impl ChangeUnit {
    fn from_file(file: ChangeFile) -> Self {
        let version = file.version();
        match file.direction() {
            Direction::Forward => ChangeUnit {
                version,
                forward: Some(file),
                reverse: None,
            },
            Direction::Reverse => ChangeUnit {
                version,
                forward: None,
                reverse: Some(file),
            },
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn forward(&self) -> Option<&ChangeFile> {
        self.forward.as_ref()
    }

    pub fn reverse(&self) -> Option<&ChangeFile> {
        self.reverse.as_ref()
    }

    pub fn side(&self, direction: Direction) -> Option<&ChangeFile> {
        match direction {
            Direction::Forward => self.forward(),
            Direction::Reverse => self.reverse(),
        }
    }

    fn slot(&mut self, direction: Direction) -> &mut Option<ChangeFile> {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Reverse => &mut self.reverse,
        }
    }
}

/// Change units sorted ascending by version.
///
/// The ordering of this set is the single source of truth for which unit comes
/// before which. It is rebuilt from the source directory on every pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeUnitSet {
    units: Vec<ChangeUnit>,
}

impl ChangeUnitSet {
    /// Groups change files by version in a single pass.
    ///
    /// Fails with `DuplicateVersion` naming both files when two files share
    /// the same version and direction.
    pub fn from_files<I>(files: I) -> MigrateResult<ChangeUnitSet>
    where
        I: IntoIterator<Item = ChangeFile>,
    {
        let mut grouped: BTreeMap<Version, ChangeUnit> = BTreeMap::new();

        for file in files {
            match grouped.entry(file.version()) {
                Entry::Vacant(entry) => {
                    entry.insert(ChangeUnit::from_file(file));
                }
                Entry::Occupied(mut entry) => {
                    let slot = entry.get_mut().slot(file.direction());
                    if let Some(existing) = slot {
                        return Err(MigrateError::new(
                            &format!(
                                "duplicate migration file version {} : {:?} and {:?}",
                                file.version(),
                                existing.file_name(),
                                file.file_name()
                            ),
                            ErrorKind::DuplicateVersion,
                        ));
                    }
                    *slot = Some(file);
                }
            }
        }

        Ok(ChangeUnitSet {
            units: grouped.into_values().collect(),
        })
    }

    pub fn units(&self) -> &[ChangeUnit] {
        &self.units
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChangeUnit> {
        self.units.iter()
    }

    pub fn get(&self, version: Version) -> Option<&ChangeUnit> {
        self.units
            .binary_search_by_key(&version, |unit| unit.version)
            .ok()
            .map(|index| &self.units[index])
    }

    pub fn versions(&self) -> Vec<Version> {
        self.units.iter().map(|unit| unit.version).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Reads every change file in `dir` and pairs them into a [`ChangeUnitSet`].
///
/// Entries whose names do not follow the naming convention are ignored, as are
/// sub-directories and names that are not valid UTF-8. An unreadable directory
/// fails with `SourceUnavailable`; an empty one yields an empty set.
pub fn read_change_units(dir: &Path, pattern: &FilenamePattern) -> MigrateResult<ChangeUnitSet> {
    let entries = fs::read_dir(dir).map_err(|e| source_unavailable(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| source_unavailable(dir, e))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::debug!("Skipping non UTF-8 entry {:?} in {}", name, dir.display()),
        }
    }

    // directory order is platform dependent; sort so errors name files stably
    let mut files = Vec::new();
    for name in names.into_iter().sorted() {
        match pattern.parse(&name)? {
            Some(identity) => files.push(ChangeFile::new(
                dir,
                &name,
                identity.version,
                &identity.label,
                identity.direction,
            )),
            None => log::trace!("Ignoring {} - not a .{} change file", name, pattern.extension()),
        }
    }

    ChangeUnitSet::from_files(files)
}

fn source_unavailable(dir: &Path, err: std::io::Error) -> MigrateError {
    MigrateError::new_with_cause(
        &format!("Unable to read change files from {}", dir.display()),
        ErrorKind::SourceUnavailable,
        err.into(),
    )
}
