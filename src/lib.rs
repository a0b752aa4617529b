//! Reversible stepwise execution of the Longest Common Subsequence recurrence.
//!
//! This crate turns the classic nested-loop LCS table fill into an explicit
//! state machine that a tutoring front end can drive one primitive operation at
//! a time: forward, backward, or straight to any point of the run.
//!
//! ## Core idea
//! 1. The loop nest becomes a [`ProgramCounter`]: a [`Phase`] tag plus the four
//!    loop counters `r`, `c`, `i`, `j`.
//! 2. Each [`StepEngine::step`] performs one transition and pushes its inverse
//!    onto a [`DeltaLog`](delta::DeltaLog).
//! 3. [`StepEngine::step_back`] pops and applies that inverse, and
//!    [`StepEngine::seek`] repeats either operation until it reaches a target
//!    step index.
//!
//! At every step index the table holds exactly the cells a plain run would
//! have written by that point.
//!
//! ## Quick start
//! ```
//! use dp_stepper::{Phase, StepEngine};
//!
//! let mut engine = StepEngine::new("skullandbones", "lullabybabies").unwrap();
//! engine.step_col_init(0).unwrap();
//! assert_eq!(engine.state().phase, Phase::ColInit);
//!
//! engine.run_to_end();
//! assert_eq!(engine.lcs_length(), Ok(7));
//! assert_eq!(engine.traceback().unwrap(), "ullabes");
//!
//! engine.seek(0).unwrap();
//! assert_eq!(engine.state().phase, Phase::Pre);
//! ```
//!
//! ## Features
//! - `tracing`: spans and events for steps, seeks and audits.
//! - `parallel`: run [`audit::audit_seek_consistency`] on the rayon pool.
//! - `serde`: `Serialize`/`Deserialize` for [`SequencePair`], counters,
//!   snapshots and log entries.

pub mod audit;
pub mod builder;
pub mod counter;
pub mod delta;
pub mod engine;
pub mod error;
pub mod reference;
pub mod schedule;
pub mod sequence;
pub mod table;

pub use crate::builder::EngineBuilder;
pub use crate::counter::{Phase, ProgramCounter};
pub use crate::delta::{CellWrite, Delta};
pub use crate::engine::{StepEngine, StepResult};
pub use crate::error::EngineError;
pub use crate::schedule::Schedule;
pub use crate::sequence::{Alphabet, SequencePair};
pub use crate::table::TableSnapshot;
