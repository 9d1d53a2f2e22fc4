//! Board module - the 15x10 stack of settled cells
//!
//! Flat row-major storage; `Point { row, col }` addresses a cell with row 0
//! at the top.

use arrayvec::ArrayVec;

use super::shapes::Cells;
use crate::types::Point;

pub const BOARD_ROWS: usize = 15;
pub const BOARD_COLS: usize = 10;

const BOARD_SIZE: usize = BOARD_ROWS * BOARD_COLS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [bool; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [false; BOARD_SIZE],
        }
    }

    #[inline]
    fn index(p: Point) -> Option<usize> {
        if p.row < 0 || p.row >= BOARD_ROWS as i32 || p.col < 0 || p.col >= BOARD_COLS as i32 {
            return None;
        }
        Some(p.row as usize * BOARD_COLS + p.col as usize)
    }

    /// Inside the board and empty.
    pub fn is_free(&self, p: Point) -> bool {
        matches!(Self::index(p), Some(i) if !self.cells[i])
    }

    pub fn is_filled(&self, p: Point) -> bool {
        matches!(Self::index(p), Some(i) if self.cells[i])
    }

    /// Set a cell; false when out of bounds.
    pub fn set(&mut self, p: Point, filled: bool) -> bool {
        match Self::index(p) {
            Some(i) => {
                self.cells[i] = filled;
                true
            }
            None => false,
        }
    }

    /// Whether `cells` placed at `origin` lie on free cells only.
    pub fn fits(&self, origin: Point, cells: &Cells) -> bool {
        cells.iter().all(|&c| self.is_free(origin + c))
    }

    /// Settle `cells` at `origin`.
    pub fn lock(&mut self, origin: Point, cells: &Cells) {
        for &c in cells {
            self.set(origin + c, true);
        }
    }

    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * BOARD_COLS;
        &self.cells[start..start + BOARD_COLS]
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        row < BOARD_ROWS && self.row(row).iter().all(|&c| c)
    }

    /// Remove full rows, shifting everything above down and clearing the
    /// freed top rows. Returns the removed row indices, bottom to top.
    ///
    /// One settled shape spans at most four rows, so at most four rows can
    /// be full at once.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared = ArrayVec::new();
        let mut write = BOARD_ROWS;

        for read in (0..BOARD_ROWS).rev() {
            if self.is_row_full(read) && cleared.try_push(read).is_ok() {
                continue;
            }
            write -= 1;
            if write != read {
                self.cells
                    .copy_within(read * BOARD_COLS..(read + 1) * BOARD_COLS, write * BOARD_COLS);
            }
        }

        for cell in &mut self.cells[..write * BOARD_COLS] {
            *cell = false;
        }
        cleared
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
