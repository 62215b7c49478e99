use super::{AppliedVersionSet, ChangeFile, ChangeUnitSet};

/// A requested move through the change units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    /// Apply every unit not yet applied, oldest first.
    Pending,
    /// Revert every applied unit, newest first.
    Applied,
    /// Travel relatively through the units.
    ///
    /// `+1` applies the next pending unit, `+n` the next `n`; `-1` reverts the
    /// most recent applied unit, `-n` the last `n`. Requests larger than what
    /// is available are clamped; `0` resolves to nothing.
    Relative(i64),
}

/// Computes the change files to execute, in execution order.
///
/// This is a pure function of its inputs: no I/O, no mutation.
pub fn resolve(
    units: &ChangeUnitSet,
    applied: &AppliedVersionSet,
    request: MoveRequest,
) -> Vec<ChangeFile> {
    match request {
        MoveRequest::Pending => pending(units, applied),
        MoveRequest::Applied => applied_reverse(units, applied),
        MoveRequest::Relative(n) => relative(units, applied, n),
    }
}

/// Forward files of units not in `applied`, ascending by version.
/// Units without a forward side cannot be applied and are skipped.
pub fn pending(units: &ChangeUnitSet, applied: &AppliedVersionSet) -> Vec<ChangeFile> {
    units
        .iter()
        .filter(|unit| !applied.contains(&unit.version()))
        .filter_map(|unit| unit.forward().cloned())
        .collect()
}

/// Reverse files of units in `applied`, descending by version.
/// An applied unit without a reverse side has nothing to undo it and is skipped.
pub fn applied_reverse(units: &ChangeUnitSet, applied: &AppliedVersionSet) -> Vec<ChangeFile> {
    units
        .iter()
        .rev()
        .filter(|unit| applied.contains(&unit.version()))
        .filter_map(|unit| unit.reverse().cloned())
        .collect()
}

pub fn relative(units: &ChangeUnitSet, applied: &AppliedVersionSet, n: i64) -> Vec<ChangeFile> {
    let steps = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
    let candidates = if n > 0 {
        pending(units, applied)
    } else if n < 0 {
        applied_reverse(units, applied)
    } else {
        return Vec::new();
    };

    candidates.into_iter().take(steps).collect()
}
