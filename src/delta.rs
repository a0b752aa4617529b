//! Undo log.
//!
//! Every forward step pushes one [`Delta`] holding what the step replaced: the
//! previous program counter and, when the step wrote a cell, that cell's
//! previous contents. Undo pops the newest entry and puts both back, so the log
//! length is always the logical step index.

use crate::counter::ProgramCounter;

/// A single cell write performed by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellWrite {
    pub row: isize,
    pub col: isize,
    /// Contents before the write (`None` = unset).
    pub previous: Option<u32>,
    /// Value written.
    pub value: u32,
}

/// Inverse of one forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    pub previous_counter: ProgramCounter,
    /// `None` for pure phase transitions.
    pub write: Option<CellWrite>,
}

/// LIFO stack of [`Delta`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaLog {
    entries: Vec<Delta>,
}

impl DeltaLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, delta: Delta) {
        self.entries.push(delta);
    }

    pub(crate) fn pop(&mut self) -> Option<Delta> {
        self.entries.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Delta> {
        self.entries.iter()
    }

    /// Number of entries that wrote a cell.
    pub fn writes(&self) -> usize {
        self.entries.iter().filter(|d| d.write.is_some()).count()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

impl<'a> IntoIterator for &'a DeltaLog {
    type Item = &'a Delta;
    type IntoIter = std::slice::Iter<'a, Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Phase;

    fn transition(phase: Phase) -> Delta {
        Delta {
            previous_counter: ProgramCounter {
                phase,
                ..ProgramCounter::START
            },
            write: None,
        }
    }

    #[test]
    fn pops_in_reverse_push_order() {
        let mut log = DeltaLog::new();
        log.push(transition(Phase::Pre));
        log.push(Delta {
            previous_counter: ProgramCounter::START.with_phase(Phase::RowInit),
            write: Some(CellWrite {
                row: -1,
                col: -1,
                previous: None,
                value: 0,
            }),
        });
        assert_eq!(log.len(), 2);
        assert_eq!(log.writes(), 1);

        let top = log.pop().unwrap();
        assert_eq!(top.previous_counter.phase, Phase::RowInit);
        assert_eq!(log.pop().unwrap().previous_counter.phase, Phase::Pre);
        assert!(log.pop().is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn iter_is_oldest_first() {
        let mut log = DeltaLog::new();
        for phase in [Phase::Pre, Phase::RowInit, Phase::ColInit] {
            log.push(transition(phase));
        }
        let phases: Vec<_> = log.iter().map(|d| d.previous_counter.phase).collect();
        assert_eq!(phases, vec![Phase::Pre, Phase::RowInit, Phase::ColInit]);
        assert_eq!(log.writes(), 0);
        log.clear();
        assert_eq!((&log).into_iter().count(), 0);
    }
}
