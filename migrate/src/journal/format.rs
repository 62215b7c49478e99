use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use crate::file::{AppliedVersionSet, Version};

/// Encodes the applied set as one version per line, ascending, each line
/// terminated by a single `\n`.
pub fn encode_versions(versions: &AppliedVersionSet) -> String {
    let mut out = String::with_capacity(versions.len() * 8);
    for version in versions {
        out.push_str(&version.to_string());
        out.push('\n');
    }
    out
}

/// Decodes journal text into an applied set.
///
/// Lines may appear in any order and may repeat. Surrounding whitespace is
/// trimmed and empty lines are skipped; any other line that is not a
/// non-negative integer fails with `JournalCorrupt` naming its 1-based number.
pub fn decode_versions(text: &str) -> MigrateResult<AppliedVersionSet> {
    let mut versions = AppliedVersionSet::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let version = line.parse::<Version>().map_err(|e| {
            MigrateError::new_with_cause(
                &format!("Journal line {} is not a version: '{}'", index + 1, line),
                ErrorKind::JournalCorrupt,
                e,
            )
        })?;
        versions.insert(version);
    }
    Ok(versions)
}
