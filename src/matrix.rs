//! Fixed-size matrix of atomic 32-bit counters.
//!
//! Single-cell operations are atomic and lose no updates under concurrent
//! writers. Whole-matrix operations (`add_all`, `zero_all`) walk the cells one
//! by one and give no cross-cell atomicity: a reader running alongside them
//! may see some cells before and some after the bulk update.
use crate::error::SketchError;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicU32, Ordering};
use log::warn;

/// Row-major `depth x width` matrix of `AtomicU32` counters.
pub(crate) struct CounterMatrix {
    cells: Box<[AtomicU32]>,
    width: usize,
    depth: usize,
}

impl CounterMatrix {
    /// Allocates a zeroed matrix.
    ///
    /// Fails with [`SketchError::InvalidDimensions`] if either dimension is
    /// zero, if `width * depth` overflows, or if the cells cannot be allocated.
    pub(crate) fn new(width: usize, depth: usize) -> Result<Self, SketchError> {
        let invalid = SketchError::InvalidDimensions { width, depth };
        check_with!(width > 0 && depth > 0, invalid);

        let len = width.checked_mul(depth).ok_or(invalid)?;
        let mut cells: Vec<AtomicU32> = Vec::new();
        if cells.try_reserve_exact(len).is_err() {
            warn!("cannot allocate {} counters for a {}x{} sketch", len, width, depth);
            return Err(invalid);
        }
        cells.extend((0..len).map(|_| AtomicU32::new(0)));

        Ok(Self {
            cells: cells.into_boxed_slice(),
            width,
            depth,
        })
    }

    #[inline]
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    #[inline(always)]
    fn cell(&self, row: usize, col: usize) -> &AtomicU32 {
        check!(row < self.depth && col < self.width, "cell out of range");
        &self.cells[row * self.width + col]
    }

    /// Adds 1 to the cell, wrapping on overflow.
    #[inline]
    pub(crate) fn increment(&self, row: usize, col: usize) {
        self.add(row, col, 1);
    }

    /// Adds `n` to the cell, wrapping on overflow.
    #[inline]
    pub(crate) fn add(&self, row: usize, col: usize, n: u32) {
        self.cell(row, col).fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn read(&self, row: usize, col: usize) -> u32 {
        self.cell(row, col).load(Ordering::Relaxed)
    }

    /// Adds every cell of `other` into the same position of `self`.
    /// Callers check that the dimensions match.
    pub(crate) fn add_all(&self, other: &CounterMatrix) {
        check!(
            self.width == other.width && self.depth == other.depth,
            "add_all on matrices of different shapes"
        );
        self.cells
            .iter()
            .zip(other.cells.iter())
            .for_each(|(dst, src)| {
                let v = src.load(Ordering::Relaxed);
                if v > 0 {
                    dst.fetch_add(v, Ordering::Relaxed);
                }
            });
    }

    pub(crate) fn zero_all(&self) {
        self.cells
            .iter()
            .for_each(|c| c.store(0, Ordering::Relaxed));
    }

    /// Returns the counters of one row, read cell by cell.
    pub(crate) fn row(&self, row: usize) -> impl Iterator<Item = u32> + '_ {
        check!(row < self.depth, "row out of range");
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
    }
}

/// Prints the matrix as a list of rows.
impl Debug for CounterMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        struct RowView<'a>(&'a CounterMatrix, usize);

        impl Debug for RowView<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
                f.debug_list().entries(self.0.row(self.1)).finish()
            }
        }

        f.debug_list()
            .entries((0..self.depth).map(|i| RowView(self, i)))
            .finish()
    }
}
