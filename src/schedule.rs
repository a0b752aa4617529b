//! Closed-form layout of the step timeline.
//!
//! For inputs of length `n` and `m` the loop program always takes the same
//! sequence of transitions, so the step index at which any loop reaches a
//! given iteration, and the program counter at any step index, can be computed
//! without running the engine.
//!
//! Layout (one index per transition):
//!
//! | index | state |
//! |---|---|
//! | `0` | `PRE` |
//! | `1 + k`, `k <= n + 2` | `ROW_INIT`, `k` boundary rows written |
//! | `n + 4 + k`, `k <= m + 1` | `COL_INIT`, `k` boundary columns written |
//! | `n + m + 6` | `I_LOOP` entered |
//! | `n + m + 7 + i(m + 2) + j` | outer iteration `i` with `j` inner cells written |
//! | `n + m + 6 + n(m + 2)` | every outer iteration complete |
//! | `nm + 3n + m + 7` | `DONE` |

use crate::counter::{Phase, ProgramCounter};

/// Step-index arithmetic for one pair of input lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    n: usize,
    m: usize,
}

impl Schedule {
    pub fn new(n: usize, m: usize) -> Self {
        Self { n, m }
    }

    /// Number of rows `ROW_INIT` writes (`-1..=n`).
    #[inline]
    pub fn row_init_limit(&self) -> usize {
        self.n + 2
    }

    /// Number of columns `COL_INIT` writes (`0..=m`).
    #[inline]
    pub fn col_init_limit(&self) -> usize {
        self.m + 1
    }

    #[inline]
    fn col_start(&self) -> usize {
        self.n + 4
    }

    #[inline]
    fn loop_start(&self) -> usize {
        self.n + self.m + 6
    }

    #[inline]
    fn outer_len(&self) -> usize {
        self.m + 2
    }

    /// Step index at which the engine reaches `DONE`.
    pub fn max_step_index(&self) -> usize {
        self.loop_start() + self.n * self.outer_len() + 1
    }

    /// Total number of cells written by a full run.
    pub fn total_writes(&self) -> usize {
        self.row_init_limit() + self.col_init_limit() + self.n * self.m
    }

    /// Index at which `ROW_INIT` has written `k` rows.
    pub fn row_init_index(&self, k: usize) -> Option<usize> {
        (k <= self.row_init_limit()).then_some(1 + k)
    }

    /// Index at which `COL_INIT` has written `k` columns.
    pub fn col_init_index(&self, k: usize) -> Option<usize> {
        (k <= self.col_init_limit()).then(|| self.col_start() + k)
    }

    /// Index at which `i` outer iterations are complete and `j` inner cells of
    /// the next one are written.
    ///
    /// Valid for `i < n, j <= m`, and for `(n, 0)` (all outer iterations done,
    /// one step before `DONE`).
    pub fn ij_index(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.n && j <= self.m {
            Some(self.loop_start() + i * self.outer_len() + 1 + j)
        } else if i == self.n && j == 0 {
            Some(self.loop_start() + self.n * self.outer_len())
        } else {
            None
        }
    }

    /// Program counter the engine holds at `index`, or `None` past the end.
    pub fn counter_at(&self, index: usize) -> Option<ProgramCounter> {
        let n = self.n as isize;
        let m = self.m as isize;
        let last_j = (self.m > 0).then(|| m - 1);
        let max = self.max_step_index();

        if index > max {
            return None;
        }
        if index == 0 {
            return Some(ProgramCounter::START);
        }
        if index < self.col_start() {
            let k = (index - 1) as isize;
            return Some(ProgramCounter {
                phase: Phase::RowInit,
                r: (k > 0).then(|| k - 2),
                ..ProgramCounter::START
            });
        }
        let boundary_done = ProgramCounter {
            r: Some(n),
            ..ProgramCounter::START
        };
        if index < self.loop_start() {
            let k = (index - self.col_start()) as isize;
            return Some(ProgramCounter {
                phase: Phase::ColInit,
                c: (k > 0).then(|| k - 1),
                ..boundary_done
            });
        }
        let loops = ProgramCounter {
            c: Some(m),
            ..boundary_done
        };
        if index == max {
            return Some(ProgramCounter {
                phase: Phase::Done,
                i: (self.n > 0).then(|| n - 1),
                j: if self.n > 0 { last_j } else { None },
                ..loops
            });
        }
        let offset = index - self.loop_start();
        if offset == 0 {
            return Some(loops.with_phase(Phase::ILoop));
        }
        let outer = ((offset - 1) / self.outer_len()) as isize;
        let within = (offset - 1) % self.outer_len();
        let pc = if within == 0 {
            ProgramCounter {
                phase: Phase::JLoop,
                i: Some(outer),
                ..loops
            }
        } else if within <= self.m {
            ProgramCounter {
                phase: Phase::JLoop,
                i: Some(outer),
                j: Some(within as isize - 1),
                ..loops
            }
        } else {
            ProgramCounter {
                phase: Phase::ILoop,
                i: Some(outer),
                j: last_j,
                ..loops
            }
        };
        Some(pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_index_closed_form() {
        for n in 0..6 {
            for m in 0..6 {
                let s = Schedule::new(n, m);
                assert_eq!(s.max_step_index(), n * m + 3 * n + m + 7, "n={n} m={m}");
            }
        }
        // x = "", y = "abc"
        assert_eq!(Schedule::new(0, 3).max_step_index(), 10);
    }

    #[test]
    fn phase_boundaries() {
        let s = Schedule::new(2, 3);
        assert_eq!(s.counter_at(0).unwrap().phase, Phase::Pre);
        assert_eq!(s.counter_at(1).unwrap(), ProgramCounter {
            phase: Phase::RowInit,
            ..ProgramCounter::START
        });
        // rows -1, 0, 1, 2 written at 2..=5
        assert_eq!(s.counter_at(2).unwrap().r, Some(-1));
        assert_eq!(s.counter_at(5).unwrap().r, Some(2));
        assert_eq!(s.counter_at(5).unwrap().phase, Phase::RowInit);
        assert_eq!(s.counter_at(6).unwrap().phase, Phase::ColInit);
        assert_eq!(s.counter_at(6).unwrap().c, None);
        assert_eq!(s.counter_at(10).unwrap().c, Some(3));
        assert_eq!(s.counter_at(11).unwrap().phase, Phase::ILoop);
        assert_eq!(s.counter_at(11).unwrap().i, None);

        let enter = s.counter_at(12).unwrap();
        assert_eq!((enter.phase, enter.i, enter.j), (Phase::JLoop, Some(0), None));
        assert_eq!(s.counter_at(15).unwrap().current_cell(), Some((0, 2)));
        let back = s.counter_at(16).unwrap();
        assert_eq!((back.phase, back.i, back.j), (Phase::ILoop, Some(0), Some(2)));
        assert_eq!(s.counter_at(17).unwrap().i, Some(1));
        assert_eq!(s.counter_at(s.max_step_index()).unwrap().phase, Phase::Done);
        assert!(s.counter_at(s.max_step_index() + 1).is_none());
    }

    #[test]
    fn jump_indices_agree_with_decode() {
        let s = Schedule::new(3, 2);
        for k in 0..=s.row_init_limit() {
            let pc = s.counter_at(s.row_init_index(k).unwrap()).unwrap();
            assert_eq!(pc.phase, Phase::RowInit);
            assert_eq!(pc.r, (k > 0).then(|| k as isize - 2));
        }
        assert!(s.row_init_index(s.row_init_limit() + 1).is_none());

        for k in 0..=s.col_init_limit() {
            let pc = s.counter_at(s.col_init_index(k).unwrap()).unwrap();
            assert_eq!(pc.phase, Phase::ColInit);
            assert_eq!(pc.c, (k > 0).then(|| k as isize - 1));
        }
        assert!(s.col_init_index(s.col_init_limit() + 1).is_none());

        for i in 0..3 {
            for j in 0..=2 {
                let pc = s.counter_at(s.ij_index(i, j).unwrap()).unwrap();
                assert_eq!(pc.phase, Phase::JLoop);
                assert_eq!(pc.i, Some(i as isize));
                assert_eq!(pc.j, (j > 0).then(|| j as isize - 1));
            }
        }
        let finished = s.ij_index(3, 0).unwrap();
        assert_eq!(finished + 1, s.max_step_index());
        assert!(s.ij_index(3, 1).is_none());
        assert!(s.ij_index(0, 3).is_none());
    }

    #[test]
    fn empty_inputs() {
        let s = Schedule::new(0, 0);
        assert_eq!(s.max_step_index(), 7);
        assert_eq!(s.total_writes(), 3);
        assert_eq!(s.ij_index(0, 0), Some(6));
        let done = s.counter_at(7).unwrap();
        assert_eq!((done.phase, done.i, done.j), (Phase::Done, None, None));
    }
}
