//! Error taxonomy for the stepping engine.
//!
//! Every variant is local to one engine instance. Callers decide whether to
//! surface the failure to the learner or clamp and retry.

use thiserror::Error;

use crate::counter::Phase;
use crate::sequence::Which;

/// Errors reported by [`StepEngine`](crate::engine::StepEngine) and its builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `step_back` was called with nothing left to undo (the engine is at `PRE`).
    #[error("no history to undo: engine is at the initial state")]
    EmptyHistory,

    /// A seek target lies beyond the terminal step index.
    #[error("seek target {target} is past the final step index {max}")]
    SeekPastEnd {
        /// Requested step index.
        target: usize,
        /// Step index at which the engine reaches `DONE`.
        max: usize,
    },

    /// A relative seek would move before step index 0.
    #[error("seeking by {delta} from step {current} would move before the start")]
    SeekBeforeStart {
        /// Step index at the time of the call.
        current: usize,
        /// Requested offset.
        delta: isize,
    },

    /// An input sequence contains a symbol outside the configured alphabet.
    #[error("sequence {which} has unsupported symbol {symbol:?} at position {position}")]
    InvalidSequence {
        /// Which input was rejected.
        which: Which,
        /// Character offset of the offending symbol.
        position: usize,
        /// The offending symbol.
        symbol: char,
    },

    /// An input sequence exceeds the configured length limit.
    #[error("sequence {which} has length {len}, limit is {max}")]
    SequenceTooLong {
        /// Which input was rejected.
        which: Which,
        /// Length of the rejected input.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A table coordinate lies outside `[-1, n] x [-1, m]`.
    #[error("cell ({row}, {col}) is outside the table")]
    CellOutOfRange {
        /// Requested row.
        row: isize,
        /// Requested column.
        col: isize,
    },

    /// `current_value` was called while no inner-loop cell is active.
    #[error("no current cell in phase {phase}")]
    NoCurrentCell {
        /// Phase at the time of the call.
        phase: Phase,
    },

    /// A jump helper was asked for more iterations than its loop has.
    #[error("cannot jump to {requested} iterations of {phase}: limit is {limit}")]
    JumpOutOfRange {
        /// Loop the jump refers to.
        phase: Phase,
        /// Requested iteration count.
        requested: usize,
        /// Largest accepted count.
        limit: usize,
    },

    /// A deserialized table snapshot has the wrong number of cells.
    #[error("snapshot for {n}x{m} inputs carries {cells} cells")]
    MalformedSnapshot {
        /// Declared `|x|`.
        n: usize,
        /// Declared `|y|`.
        m: usize,
        /// Number of cells actually present.
        cells: usize,
    },

    /// A result accessor was called before the engine reached `DONE`.
    #[error("computation not finished: engine is in phase {phase}")]
    NotFinished {
        /// Phase at the time of the call.
        phase: Phase,
    },
}
