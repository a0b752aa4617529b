//! Program counter for the LCS loop nest.
//!
//! The recurrence is normally written as three loops: one over the boundary
//! rows, one over the boundary columns, and a double loop over the interior.
//! [`ProgramCounter`] flattens that control flow into a phase tag plus four
//! loop counters so that any point in the run can be copied, compared and
//! restored.
//!
//! Each counter holds the last index its loop produced, in table coordinates.
//! `None` means the loop has not produced anything yet. This is uniform across
//! all four counters, including `r`, whose first element is row `-1`.

use std::fmt;

/// Named segment of the loop program.
///
/// Transitions are strictly ordered:
/// `Pre -> RowInit -> ColInit -> ILoop <-> JLoop -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Nothing has run.
    Pre,
    /// Writing the boundary column `Table[r][-1]`.
    RowInit,
    /// Writing the boundary row `Table[-1][c]`.
    ColInit,
    /// Outer loop over `i`.
    ILoop,
    /// Inner loop over `j` for the current `i`.
    JLoop,
    /// Terminal.
    Done,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Pre => "PRE",
            Phase::RowInit => "ROW_INIT",
            Phase::ColInit => "COL_INIT",
            Phase::ILoop => "I_LOOP",
            Phase::JLoop => "J_LOOP",
            Phase::Done => "DONE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position in the loop program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramCounter {
    pub phase: Phase,
    /// Last boundary row written, in `[-1, n]`.
    pub r: Option<isize>,
    /// Last boundary column written, in `[0, m]`.
    pub c: Option<isize>,
    /// Current outer index, in `[0, n - 1]`.
    pub i: Option<isize>,
    /// Last inner index written for the current `i`, in `[0, m - 1]`.
    pub j: Option<isize>,
}

impl ProgramCounter {
    /// Counter before the first step.
    pub const START: ProgramCounter = ProgramCounter {
        phase: Phase::Pre,
        r: None,
        c: None,
        i: None,
        j: None,
    };

    /// Counter with `phase` replaced.
    pub(crate) fn with_phase(self, phase: Phase) -> Self {
        Self { phase, ..self }
    }

    /// Interior cell the inner loop last wrote, if any.
    pub fn current_cell(&self) -> Option<(isize, isize)> {
        match (self.phase, self.i, self.j) {
            (Phase::JLoop, Some(i), Some(j)) => Some((i, j)),
            _ => None,
        }
    }
}

impl Default for ProgramCounter {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for ProgramCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(v: Option<isize>) -> String {
            v.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "{} r={} c={} i={} j={}",
            self.phase,
            show(self.r),
            show(self.c),
            show(self.i),
            show(self.j)
        )
    }
}
