//! Reversible stepping engine for the LCS recurrence.
//!
//! [`StepEngine`] runs the loop program one transition at a time. Every forward
//! step records its inverse in a [`DeltaLog`], so:
//! 1. [`StepEngine::step_back`] is an exact O(1) undo, not a recomputation;
//! 2. [`StepEngine::seek`] moves to any step index by repeated step/undo;
//! 3. the loop-level jump helpers are thin wrappers around `seek`, using the
//!    closed-form [`Schedule`] to find their target index.
//!
//! At step index `k` the table holds exactly the cells a plain nested-loop run
//! would have written after `k` transitions, and nothing else.

use crate::builder::EngineBuilder;
use crate::counter::{Phase, ProgramCounter};
use crate::delta::{CellWrite, Delta, DeltaLog};
use crate::error::EngineError;
use crate::schedule::Schedule;
use crate::sequence::SequencePair;
use crate::table::{Table, TableSnapshot};

/// Outcome of a single [`StepEngine::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether a transition happened (false only when already `DONE`).
    pub advanced: bool,
    /// Whether the engine is now at `DONE`.
    pub reached_end: bool,
    /// Cell written by this step, if any.
    pub write: Option<CellWrite>,
}

/// Stepwise LCS execution engine.
///
/// Typical usage:
/// ```
/// use dp_stepper::{Phase, StepEngine};
///
/// let mut engine = StepEngine::new("skullandbones", "lullabybabies").unwrap();
/// engine.run_to_end();
/// assert_eq!(engine.state().phase, Phase::Done);
///
/// engine.step_ij_loop(2, 3).unwrap();
/// assert_eq!(engine.state().current_cell(), Some((2, 2)));
///
/// engine.step_back().unwrap();
/// assert_eq!(engine.state().current_cell(), Some((2, 1)));
/// ```
///
/// An engine belongs to one tutoring session. It is `Send` but has no interior
/// synchronisation; callers must not share it mutably across threads.
#[derive(Debug, Clone)]
pub struct StepEngine {
    pair: SequencePair,
    table: Table,
    pc: ProgramCounter,
    log: DeltaLog,
    schedule: Schedule,
}

/// Transition computed from the current state, before it is applied.
struct Transition {
    next: ProgramCounter,
    write: Option<(isize, isize, u32)>,
}

impl StepEngine {
    /// Create an engine for `x` and `y` with the default configuration.
    ///
    /// Empty strings are accepted. See [`EngineBuilder`] for alphabet and
    /// length restrictions.
    pub fn new(x: &str, y: &str) -> Result<Self, EngineError> {
        EngineBuilder::new(x, y).build()
    }

    /// Engine over an already-validated pair, positioned at `PRE`.
    pub(crate) fn from_pair(pair: SequencePair) -> Self {
        let (n, m) = (pair.n(), pair.m());
        // The log grows with the steps actually taken.
        Self {
            table: Table::new(n, m),
            pc: ProgramCounter::START,
            log: DeltaLog::new(),
            schedule: Schedule::new(n, m),
            pair,
        }
    }

    /// Return to `PRE`: clear the table and discard all history.
    ///
    /// This is the only operation that cannot be undone.
    pub fn reset(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from = self.log.len(), "reset");
        self.table.clear();
        self.pc = ProgramCounter::START;
        self.log.clear();
    }

    /// Value the recurrence stores at interior cell `(i, j)`.
    fn recurrence(&self, i: isize, j: isize) -> u32 {
        let xi = self.pair.x()[i as usize];
        let yj = self.pair.y()[j as usize];
        if xi == yj {
            self.filled(i - 1, j - 1) + 1
        } else {
            self.filled(i - 1, j).max(self.filled(i, j - 1))
        }
    }

    fn filled(&self, row: isize, col: isize) -> u32 {
        let v = self.table.value(row, col);
        debug_assert!(v.is_some(), "recurrence read unset cell ({row}, {col})");
        v.unwrap_or(0)
    }

    /// Next transition of the loop program, or `None` at `DONE`.
    fn transition(&self) -> Option<Transition> {
        let pc = self.pc;
        let n = self.pair.n() as isize;
        let m = self.pair.m() as isize;

        let t = match pc.phase {
            Phase::Pre => Transition {
                next: pc.with_phase(Phase::RowInit),
                write: None,
            },
            Phase::RowInit => {
                let r = pc.r.map_or(-1, |r| r + 1);
                if r > n {
                    Transition {
                        next: pc.with_phase(Phase::ColInit),
                        write: None,
                    }
                } else {
                    Transition {
                        next: ProgramCounter { r: Some(r), ..pc },
                        write: Some((r, -1, 0)),
                    }
                }
            }
            Phase::ColInit => {
                let c = pc.c.map_or(0, |c| c + 1);
                if c > m {
                    Transition {
                        next: pc.with_phase(Phase::ILoop),
                        write: None,
                    }
                } else {
                    Transition {
                        next: ProgramCounter { c: Some(c), ..pc },
                        write: Some((-1, c, 0)),
                    }
                }
            }
            Phase::ILoop => {
                let i = pc.i.map_or(0, |i| i + 1);
                if i > n - 1 {
                    Transition {
                        next: pc.with_phase(Phase::Done),
                        write: None,
                    }
                } else {
                    Transition {
                        next: ProgramCounter {
                            phase: Phase::JLoop,
                            i: Some(i),
                            j: None,
                            ..pc
                        },
                        write: None,
                    }
                }
            }
            Phase::JLoop => {
                let j = pc.j.map_or(0, |j| j + 1);
                if j > m - 1 {
                    Transition {
                        next: pc.with_phase(Phase::ILoop),
                        write: None,
                    }
                } else {
                    // `i` is always set while the inner loop runs.
                    let i = pc.i.unwrap_or(0);
                    Transition {
                        next: ProgramCounter { j: Some(j), ..pc },
                        write: Some((i, j, self.recurrence(i, j))),
                    }
                }
            }
            Phase::Done => return None,
        };
        Some(t)
    }

    /// Advance by one transition.
    ///
    /// At `DONE` this is a no-op reporting `advanced = false`.
    pub fn step(&mut self) -> StepResult {
        let Some(Transition { next, write }) = self.transition() else {
            return StepResult {
                advanced: false,
                reached_end: true,
                write: None,
            };
        };

        let write = write.map(|(row, col, value)| CellWrite {
            row,
            col,
            previous: self.table.replace(row, col, Some(value)),
            value,
        });
        debug_assert!(
            write.map_or(true, |w| w.previous.is_none()),
            "cell written twice in one pass"
        );
        self.log.push(Delta {
            previous_counter: self.pc,
            write,
        });
        self.pc = next;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            step = self.log.len(),
            phase = %next.phase,
            cell = ?write.map(|w| (w.row, w.col, w.value)),
            "step"
        );

        StepResult {
            advanced: true,
            reached_end: next.phase == Phase::Done,
            write,
        }
    }

    /// Undo the most recent step.
    ///
    /// # Errors
    /// [`EngineError::EmptyHistory`] at `PRE`.
    pub fn step_back(&mut self) -> Result<(), EngineError> {
        let delta = self.log.pop().ok_or(EngineError::EmptyHistory)?;
        if let Some(w) = delta.write {
            self.table.replace(w.row, w.col, w.previous);
        }
        self.pc = delta.previous_counter;

        #[cfg(feature = "tracing")]
        tracing::trace!(step = self.log.len(), phase = %self.pc.phase, "step_back");

        Ok(())
    }

    /// Move to logical step index `target`.
    ///
    /// The target is checked before anything moves, so a failed seek leaves
    /// the engine where it was.
    ///
    /// # Errors
    /// [`EngineError::SeekPastEnd`] if `target > max_step_index()`.
    pub fn seek(&mut self, target: usize) -> Result<(), EngineError> {
        let max = self.schedule.max_step_index();
        if target > max {
            return Err(EngineError::SeekPastEnd { target, max });
        }
        let current = self.log.len();

        #[cfg(feature = "tracing")]
        tracing::debug!(from = current, to = target, "seek");

        if target > current {
            for _ in current..target {
                if !self.step().advanced {
                    return Err(EngineError::SeekPastEnd { target, max });
                }
            }
        } else {
            for _ in target..current {
                self.step_back()?;
            }
        }
        Ok(())
    }

    /// Move by `delta` steps relative to the current index.
    ///
    /// # Errors
    /// [`EngineError::SeekBeforeStart`] if the result would be negative,
    /// [`EngineError::SeekPastEnd`] if it would pass `DONE`.
    pub fn seek_by(&mut self, delta: isize) -> Result<(), EngineError> {
        let current = self.log.len();
        let target = current
            .checked_add_signed(delta)
            .ok_or(EngineError::SeekBeforeStart { current, delta })?;
        self.seek(target)
    }

    /// Run forward until `DONE`. Returns the number of steps taken.
    pub fn run_to_end(&mut self) -> usize {
        let start = self.log.len();
        while self.step().advanced {}
        self.log.len() - start
    }

    /// Jump to the point where `ROW_INIT` has written `rows` boundary rows.
    ///
    /// `rows` ranges over `0..=n + 2`.
    pub fn step_row_init(&mut self, rows: usize) -> Result<(), EngineError> {
        let target = self
            .schedule
            .row_init_index(rows)
            .ok_or(EngineError::JumpOutOfRange {
                phase: Phase::RowInit,
                requested: rows,
                limit: self.schedule.row_init_limit(),
            })?;
        self.jump(Phase::RowInit, target)
    }

    /// Jump to the point where `COL_INIT` has written `cols` boundary columns.
    ///
    /// `cols` ranges over `0..=m + 1`.
    pub fn step_col_init(&mut self, cols: usize) -> Result<(), EngineError> {
        let target = self
            .schedule
            .col_init_index(cols)
            .ok_or(EngineError::JumpOutOfRange {
                phase: Phase::ColInit,
                requested: cols,
                limit: self.schedule.col_init_limit(),
            })?;
        self.jump(Phase::ColInit, target)
    }

    /// Jump to the point where `outer` full iterations of the `i` loop are
    /// complete and `inner` cells of the following iteration are written.
    ///
    /// `outer` ranges over `0..=n`; `inner` over `0..=m`, and must be `0` when
    /// `outer == n`.
    pub fn step_ij_loop(&mut self, outer: usize, inner: usize) -> Result<(), EngineError> {
        let (n, m) = (self.pair.n(), self.pair.m());
        let target = match self.schedule.ij_index(outer, inner) {
            Some(t) => t,
            None if outer > n => {
                return Err(EngineError::JumpOutOfRange {
                    phase: Phase::ILoop,
                    requested: outer,
                    limit: n,
                })
            }
            None => {
                return Err(EngineError::JumpOutOfRange {
                    phase: Phase::JLoop,
                    requested: inner,
                    limit: if outer == n { 0 } else { m },
                })
            }
        };
        self.jump(Phase::ILoop, target)
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn jump(&mut self, phase: Phase, target: usize) -> Result<(), EngineError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(%phase, target, "jump");
        self.seek(target)
    }

    /// Value of the interior cell the inner loop last wrote.
    ///
    /// # Errors
    /// [`EngineError::NoCurrentCell`] outside `J_LOOP`, or right after entering
    /// it before the first inner write.
    pub fn current_value(&self) -> Result<u32, EngineError> {
        self.pc
            .current_cell()
            .and_then(|(i, j)| self.table.value(i, j))
            .ok_or(EngineError::NoCurrentCell {
                phase: self.pc.phase,
            })
    }

    /// Value at `(row, col)`; `Ok(None)` while the cell is unset.
    pub fn value_at(&self, row: isize, col: isize) -> Result<Option<u32>, EngineError> {
        self.table.get(row, col)
    }

    /// Current phase and loop counters.
    pub fn state(&self) -> ProgramCounter {
        self.pc
    }

    /// Number of forward steps applied since the last reset.
    pub fn logical_step_index(&self) -> usize {
        self.log.len()
    }

    /// Step index of `DONE`.
    pub fn max_step_index(&self) -> usize {
        self.schedule.max_step_index()
    }

    pub fn is_done(&self) -> bool {
        self.pc.phase == Phase::Done
    }

    /// The exercise inputs.
    pub fn sequences(&self) -> &SequencePair {
        &self.pair
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Detached copy of the table.
    pub fn snapshot_table(&self) -> TableSnapshot {
        self.table.snapshot()
    }

    /// Detached copy of the undo log, oldest entry first.
    pub fn history(&self) -> Vec<Delta> {
        self.log.iter().copied().collect()
    }

    pub(crate) fn delta_log(&self) -> &DeltaLog {
        &self.log
    }

    /// LCS length of the full inputs.
    ///
    /// # Errors
    /// [`EngineError::NotFinished`] before `DONE`.
    pub fn lcs_length(&self) -> Result<u32, EngineError> {
        self.require_done()?;
        let (n, m) = (self.pair.n() as isize, self.pair.m() as isize);
        Ok(self.filled(n - 1, m - 1))
    }

    /// One longest common subsequence, read back from the finished table.
    ///
    /// Ties prefer moving up (dropping a symbol of `x`) over moving left.
    ///
    /// # Errors
    /// [`EngineError::NotFinished`] before `DONE`.
    pub fn traceback(&self) -> Result<String, EngineError> {
        self.require_done()?;
        let (x, y) = (self.pair.x(), self.pair.y());
        let mut i = x.len() as isize - 1;
        let mut j = y.len() as isize - 1;
        let mut rev = Vec::new();
        while i >= 0 && j >= 0 {
            if x[i as usize] == y[j as usize] {
                rev.push(x[i as usize]);
                i -= 1;
                j -= 1;
            } else if self.filled(i - 1, j) >= self.filled(i, j - 1) {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        Ok(rev.into_iter().rev().collect())
    }

    fn require_done(&self) -> Result<(), EngineError> {
        if self.is_done() {
            Ok(())
        } else {
            Err(EngineError::NotFinished {
                phase: self.pc.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_enters_row_init_without_writing() {
        let mut e = StepEngine::new("ab", "b").unwrap();
        assert_eq!(e.state(), ProgramCounter::START);
        let res = e.step();
        assert!(res.advanced);
        assert!(!res.reached_end);
        assert_eq!(res.write, None);
        assert_eq!(e.state().phase, Phase::RowInit);
        assert_eq!(e.state().r, None);
        assert_eq!(e.snapshot_table().filled(), 0);
    }

    #[test]
    fn row_init_writes_boundary_column_top_down() {
        let mut e = StepEngine::new("ab", "b").unwrap();
        e.step();
        for expected_row in -1..=2isize {
            let w = e.step().write.unwrap();
            assert_eq!((w.row, w.col, w.value, w.previous), (expected_row, -1, 0, None));
        }
        let res = e.step();
        assert_eq!(res.write, None);
        assert_eq!(e.state().phase, Phase::ColInit);
    }

    #[test]
    fn step_matches_schedule_everywhere() {
        let mut e = StepEngine::new("abc", "cb").unwrap();
        let schedule = *e.schedule();
        loop {
            let idx = e.logical_step_index();
            assert_eq!(Some(e.state()), schedule.counter_at(idx), "index {idx}");
            if !e.step().advanced {
                break;
            }
        }
        assert_eq!(e.logical_step_index(), e.max_step_index());
    }

    #[test]
    fn current_value_tracks_inner_loop() {
        let mut e = StepEngine::new("ab", "ab").unwrap();
        assert_eq!(
            e.current_value(),
            Err(EngineError::NoCurrentCell { phase: Phase::Pre })
        );
        e.step_ij_loop(0, 0).unwrap();
        assert_eq!(e.state().phase, Phase::JLoop);
        assert!(e.current_value().is_err());
        e.step();
        assert_eq!(e.current_value(), Ok(1));
        e.step();
        assert_eq!(e.current_value(), Ok(1));
        e.step_ij_loop(1, 2).unwrap();
        assert_eq!(e.current_value(), Ok(2));
    }

    #[test]
    fn step_back_restores_cell_and_counter() {
        let mut e = StepEngine::new("xy", "yx").unwrap();
        e.step_ij_loop(1, 1).unwrap();
        let before = (e.state(), e.snapshot_table());
        let w = e.step().write.unwrap();
        assert_eq!(e.value_at(w.row, w.col).unwrap(), Some(w.value));
        e.step_back().unwrap();
        assert_eq!((e.state(), e.snapshot_table()), before);
        assert_eq!(e.value_at(w.row, w.col).unwrap(), None);
    }

    #[test]
    fn step_back_at_pre_fails() {
        let mut e = StepEngine::new("a", "a").unwrap();
        assert_eq!(e.step_back(), Err(EngineError::EmptyHistory));
        e.step();
        assert_eq!(e.step_back(), Ok(()));
        assert_eq!(e.step_back(), Err(EngineError::EmptyHistory));
    }

    #[test]
    fn failed_seek_does_not_move() {
        let mut e = StepEngine::new("ab", "cd").unwrap();
        e.seek(5).unwrap();
        let max = e.max_step_index();
        assert_eq!(
            e.seek(max + 1),
            Err(EngineError::SeekPastEnd {
                target: max + 1,
                max
            })
        );
        assert_eq!(e.logical_step_index(), 5);
        assert_eq!(
            e.seek_by(-6),
            Err(EngineError::SeekBeforeStart {
                current: 5,
                delta: -6
            })
        );
        assert_eq!(e.logical_step_index(), 5);
        e.seek_by(-5).unwrap();
        assert_eq!(e.state(), ProgramCounter::START);
    }

    #[test]
    fn jump_helpers_reject_out_of_range() {
        let mut e = StepEngine::new("abc", "de").unwrap();
        assert_eq!(
            e.step_row_init(6),
            Err(EngineError::JumpOutOfRange {
                phase: Phase::RowInit,
                requested: 6,
                limit: 5
            })
        );
        assert_eq!(
            e.step_col_init(4),
            Err(EngineError::JumpOutOfRange {
                phase: Phase::ColInit,
                requested: 4,
                limit: 3
            })
        );
        assert_eq!(
            e.step_ij_loop(4, 0),
            Err(EngineError::JumpOutOfRange {
                phase: Phase::ILoop,
                requested: 4,
                limit: 3
            })
        );
        assert_eq!(
            e.step_ij_loop(1, 3),
            Err(EngineError::JumpOutOfRange {
                phase: Phase::JLoop,
                requested: 3,
                limit: 2
            })
        );
        assert_eq!(
            e.step_ij_loop(3, 1),
            Err(EngineError::JumpOutOfRange {
                phase: Phase::JLoop,
                requested: 1,
                limit: 0
            })
        );
        assert_eq!(e.logical_step_index(), 0);
    }

    #[test]
    fn results_need_done() {
        let mut e = StepEngine::new("ab", "b").unwrap();
        assert_eq!(
            e.traceback(),
            Err(EngineError::NotFinished { phase: Phase::Pre })
        );
        e.run_to_end();
        assert_eq!(e.lcs_length(), Ok(1));
        assert_eq!(e.traceback().as_deref(), Ok("b"));
    }

    #[test]
    fn reset_discards_history() {
        let mut e = StepEngine::new("abc", "abc").unwrap();
        e.run_to_end();
        e.reset();
        assert_eq!(e.logical_step_index(), 0);
        assert_eq!(e.state(), ProgramCounter::START);
        assert_eq!(e.snapshot_table().filled(), 0);
        assert!(e.history().is_empty());
        assert_eq!(e.step_back(), Err(EngineError::EmptyHistory));
    }

    #[test]
    fn max_length_inputs_build_without_reserving_history() {
        let x = "A".repeat(crate::builder::DEFAULT_MAX_LEN);
        let mut e = StepEngine::new(&x, &x).unwrap();
        assert_eq!(e.max_step_index(), 16_793_607);
        assert_eq!(e.delta_log().capacity(), 0);

        e.seek(100).unwrap();
        assert_eq!(e.logical_step_index(), 100);
        assert!(e.delta_log().capacity() < 1 << 10);
    }

    #[test]
    fn history_mirrors_steps() {
        let mut e = StepEngine::new("a", "a").unwrap();
        e.seek(4).unwrap();
        let h = e.history();
        assert_eq!(h.len(), 4);
        assert_eq!(h[0].previous_counter, ProgramCounter::START);
        assert!(h[0].write.is_none());
        assert_eq!(h[1].write.map(|w| (w.row, w.col)), Some((-1, -1)));
        assert_eq!(h[3].write.map(|w| (w.row, w.col)), Some((1, -1)));
    }
}
