use crate::file::{Direction, Version};

/// One change file the driving loop ran successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedUnit {
    pub version: Version,
    pub direction: Direction,
    pub label: String,
    pub output: Vec<String>,
}

/// Result of a move: what ran, in order, and whether it was stopped early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub executed: Vec<ExecutedUnit>,
    pub cancelled: bool,
}

impl MoveReport {
    pub fn len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }

    /// `(version, direction)` of every executed unit, in execution order.
    pub fn steps(&self) -> Vec<(Version, Direction)> {
        self.executed
            .iter()
            .map(|unit| (unit.version, unit.direction))
            .collect()
    }

    pub(crate) fn extend(&mut self, other: MoveReport) {
        self.executed.extend(other.executed);
        self.cancelled |= other.cancelled;
    }
}
