//! Recurrence table with a boundary row and column.
//!
//! Rows are addressed in `[-1, n]` and columns in `[-1, m]`. The backing store
//! is a flat row-major vector of `(n + 2) * (m + 2)` cells, and coordinates are
//! shifted by `+1` on both axes (`[-1, -1]` lives at offset 0).
//!
//! A cell is `None` until the engine writes it. Within one forward pass a cell
//! is written at most once.

use crate::error::EngineError;

/// Flat offset of `(row, col)` in an `(n + 2) x (m + 2)` grid, or `None` when
/// the coordinate is outside `[-1, n] x [-1, m]`.
#[inline]
fn cell_index(n: usize, m: usize, row: isize, col: isize) -> Option<usize> {
    let r = usize::try_from(row.checked_add(1)?).ok()?;
    let c = usize::try_from(col.checked_add(1)?).ok()?;
    (r <= n + 1 && c <= m + 1).then(|| r * (m + 2) + c)
}

/// Grid of recurrence values owned by one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    n: usize,
    m: usize,
    cells: Vec<Option<u32>>,
}

impl Table {
    /// Allocate an all-unset table for inputs of length `n` and `m`.
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            cells: vec![None; (n + 2) * (m + 2)],
        }
    }

    /// `|x|`; the largest row index.
    pub fn n(&self) -> usize {
        self.n
    }

    /// `|y|`; the largest column index.
    pub fn m(&self) -> usize {
        self.m
    }

    #[inline]
    fn flat(&self, row: isize, col: isize) -> usize {
        debug_assert!(self.offset(row, col).is_ok(), "({row}, {col}) out of range");
        (row + 1) as usize * (self.m + 2) + (col + 1) as usize
    }

    #[inline]
    fn offset(&self, row: isize, col: isize) -> Result<usize, EngineError> {
        cell_index(self.n, self.m, row, col).ok_or(EngineError::CellOutOfRange { row, col })
    }

    /// Value at `(row, col)`; `Ok(None)` if the cell is still unset.
    pub fn get(&self, row: isize, col: isize) -> Result<Option<u32>, EngineError> {
        Ok(self.cells[self.offset(row, col)?])
    }

    /// Unchecked read for coordinates the loop program guarantees in range.
    #[inline]
    pub(crate) fn value(&self, row: isize, col: isize) -> Option<u32> {
        self.cells[self.flat(row, col)]
    }

    /// Overwrite `(row, col)` and return what it held before.
    ///
    /// Coordinates must be in range; the engine only writes cells its loop
    /// program visits.
    #[inline]
    pub(crate) fn replace(&mut self, row: isize, col: isize, value: Option<u32>) -> Option<u32> {
        let idx = self.flat(row, col);
        std::mem::replace(&mut self.cells[idx], value)
    }

    /// Mark every cell unset.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of cells holding a value.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Deep, immutable copy for rendering or comparison.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            n: self.n,
            m: self.m,
            cells: self.cells.clone(),
        }
    }
}

/// Detached copy of a [`Table`].
///
/// Deserialization rejects a cell vector whose length does not match `n` and
/// `m`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SnapshotParts")
)]
pub struct TableSnapshot {
    n: usize,
    m: usize,
    cells: Vec<Option<u32>>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SnapshotParts {
    n: usize,
    m: usize,
    cells: Vec<Option<u32>>,
}

#[cfg(feature = "serde")]
impl TryFrom<SnapshotParts> for TableSnapshot {
    type Error = EngineError;

    fn try_from(parts: SnapshotParts) -> Result<Self, Self::Error> {
        let SnapshotParts { n, m, cells } = parts;
        let expected = n
            .checked_add(2)
            .zip(m.checked_add(2))
            .and_then(|(rows, cols)| rows.checked_mul(cols));
        if expected != Some(cells.len()) {
            return Err(EngineError::MalformedSnapshot {
                n,
                m,
                cells: cells.len(),
            });
        }
        Ok(Self { n, m, cells })
    }
}

impl TableSnapshot {
    /// `|x|`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// `|y|`.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Value at `(row, col)`, or `None` if unset or out of range.
    pub fn get(&self, row: isize, col: isize) -> Option<u32> {
        let idx = cell_index(self.n, self.m, row, col)?;
        self.cells.get(idx).copied().flatten()
    }

    /// Row `row` (in `[-1, n]`) from column `-1` through `m`.
    pub fn row(&self, row: isize) -> Option<&[Option<u32>]> {
        let start = cell_index(self.n, self.m, row, -1)?;
        self.cells.get(start..start + self.m + 2)
    }

    /// Number of cells holding a value.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
