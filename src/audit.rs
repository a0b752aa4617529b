//! Exhaustive consistency audit for one exercise.
//!
//! For every step index `t` in `[0, max_step_index]` the audit checks that an
//! engine which ran to `DONE` and then seeked back to `t` is indistinguishable
//! from a fresh engine stepped forward `t` times, and that both agree with the
//! closed-form [`Schedule`](crate::schedule::Schedule). The finished table is
//! then compared cell by cell with the [`reference`](crate::reference) DP.
//!
//! With the `parallel` feature the per-index checks run on the rayon pool; each
//! check builds its own engines, so nothing is shared between workers.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;

use crate::counter::ProgramCounter;
use crate::engine::StepEngine;
use crate::error::EngineError;
use crate::reference::lcs_table;
use crate::sequence::SequencePair;

/// Summary of a passing audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    pub targets_checked: usize,
    pub max_step_index: usize,
    /// Cell writes recorded in the undo log of the finished run.
    pub cells_written: usize,
    pub lcs_length: u32,
}

/// First discrepancy found by an audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditFailure {
    #[error("counter mismatch at step {index}: expected {expected}, found {found}")]
    Counter {
        index: usize,
        expected: ProgramCounter,
        found: ProgramCounter,
    },
    #[error("table mismatch at step {index}: seek left {seek_filled} cells, replay {replay_filled}")]
    Table {
        index: usize,
        seek_filled: usize,
        replay_filled: usize,
    },
    #[error("cell ({row}, {col}) holds {found:?}, reference says {expected}")]
    Value {
        row: isize,
        col: isize,
        expected: u32,
        found: Option<u32>,
    },
    #[error("finished run logged {found} cell writes, schedule expects {expected}")]
    WriteCount { expected: usize, found: usize },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn check_target(pair: &SequencePair, target: usize) -> Result<(), AuditFailure> {
    let mut replay = StepEngine::from_pair(pair.clone());
    for _ in 0..target {
        replay.step();
    }

    let mut seeker = StepEngine::from_pair(pair.clone());
    seeker.run_to_end();
    seeker.seek(target)?;

    let expected = seeker
        .schedule()
        .counter_at(target)
        .ok_or(EngineError::SeekPastEnd {
            target,
            max: seeker.max_step_index(),
        })?;
    for found in [replay.state(), seeker.state()] {
        if found != expected {
            return Err(AuditFailure::Counter {
                index: target,
                expected,
                found,
            });
        }
    }

    let (a, b) = (seeker.snapshot_table(), replay.snapshot_table());
    if a != b {
        return Err(AuditFailure::Table {
            index: target,
            seek_filled: a.filled(),
            replay_filled: b.filled(),
        });
    }
    Ok(())
}

fn check_final(pair: &SequencePair) -> Result<(usize, u32), AuditFailure> {
    let mut engine = StepEngine::from_pair(pair.clone());
    engine.run_to_end();

    let expected = engine.schedule().total_writes();
    let found = engine.delta_log().writes();
    if found != expected {
        return Err(AuditFailure::WriteCount { expected, found });
    }

    let dp = lcs_table(pair.x(), pair.y());
    let (n, m) = (pair.n() as isize, pair.m() as isize);

    for row in -1..=n {
        for col in -1..=m {
            let expected = if row < 0 || col < 0 {
                Some(0)
            } else if row < n && col < m {
                Some(dp[row as usize + 1][col as usize + 1])
            } else {
                // Row n and column m are only written on the boundary.
                None
            };
            let found = engine.value_at(row, col)?;
            if let Some(expected) = expected {
                if found != Some(expected) {
                    return Err(AuditFailure::Value {
                        row,
                        col,
                        expected,
                        found,
                    });
                }
            }
        }
    }
    Ok((found, engine.lcs_length()?))
}

/// Audit every step index of the exercise `pair`.
///
/// Cost is quadratic in the number of steps; intended for tests, probes and
/// exercise authoring, not for per-request use.
pub fn audit_seek_consistency(pair: &SequencePair) -> Result<AuditReport, AuditFailure> {
    #[cfg(feature = "tracing")]
    let span = tracing::info_span!("audit_seek_consistency", n = pair.n(), m = pair.m());
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let max = StepEngine::from_pair(pair.clone()).max_step_index();

    #[cfg(feature = "parallel")]
    let checked = (0..=max)
        .into_par_iter()
        .try_for_each(|t| check_target(pair, t));
    #[cfg(not(feature = "parallel"))]
    let checked = (0..=max).try_for_each(|t| check_target(pair, t));
    checked?;

    let (cells_written, lcs_length) = check_final(pair)?;

    #[cfg(feature = "tracing")]
    tracing::info!(targets = max + 1, lcs_length, "audit passed");

    Ok(AuditReport {
        targets_checked: max + 1,
        max_step_index: max,
        cells_written,
        lcs_length,
    })
}
