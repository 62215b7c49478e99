use crate::common::{FORWARD_TOKEN, REVERSE_TOKEN};
use crate::errors::{ErrorKind, MigrateError, MigrateResult};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identity and ordering key of a change unit.
///
/// Versions are unsigned 64-bit integers parsed from the numeric prefix of a
/// change file name. `0` is a valid version, which is why the latest applied
/// version is reported as `Option<Version>` rather than falling back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Version(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Version(value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Version).map_err(|e| {
            MigrateError::new(
                &format!("Unable to parse version '{}': {}", s, e),
                ErrorKind::InvalidVersion,
            )
        })
    }
}

/// The set of versions currently recorded as applied to a target.
///
/// A `BTreeSet` keeps each version at most once and iterates ascending, which
/// is also the order the durable journal is written in.
pub type AppliedVersionSet = BTreeSet<Version>;

/// Whether a change file applies (`Forward`) or undoes (`Reverse`) its change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Maps the `up`/`down` token of a change file name to a direction.
    pub fn from_token(token: &str) -> MigrateResult<Direction> {
        match token {
            FORWARD_TOKEN => Ok(Direction::Forward),
            REVERSE_TOKEN => Ok(Direction::Reverse),
            other => Err(MigrateError::new(
                &format!("Unable to parse up|down '{}' in file name", other),
                ErrorKind::InvalidDirection,
            )),
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Direction::Forward => FORWARD_TOKEN,
            Direction::Reverse => REVERSE_TOKEN,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
