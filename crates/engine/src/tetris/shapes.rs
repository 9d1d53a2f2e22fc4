//! Shapes module - the seven falling shapes and their rotation
//!
//! Cells are offsets from the shape origin, kept sorted in row-major order.
//! Three families rotate differently:
//! - the square never changes
//! - 3-wide shapes turn a quarter clockwise inside their 3x3 box
//! - the bar toggles between horizontal and vertical

use crate::types::Point;

/// Cells of one shape, relative to its origin.
pub type Cells = [Point; 4];

const fn p(row: i32, col: i32) -> Point {
    Point::new(row, col)
}

const BAR_HORIZONTAL: Cells = [p(0, 0), p(0, 1), p(0, 2), p(0, 3)];
const BAR_VERTICAL: Cells = [p(0, 0), p(1, 0), p(2, 0), p(3, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// 2x2 block.
    Square,
    /// Any shape fitting a 3x3 box.
    Three(Cells),
    Bar { vertical: bool },
}

impl Shape {
    /// Spawn orientations of all seven shapes.
    pub const ALL: [Shape; 7] = [
        Shape::Square,
        Shape::Three([p(0, 2), p(1, 0), p(1, 1), p(1, 2)]), // ..:
        Shape::Three([p(0, 0), p(1, 0), p(1, 1), p(1, 2)]), // :..
        Shape::Three([p(0, 1), p(0, 2), p(1, 0), p(1, 1)]), // .:'
        Shape::Three([p(0, 0), p(0, 1), p(1, 1), p(1, 2)]), // ':.
        Shape::Three([p(0, 1), p(1, 0), p(1, 1), p(1, 2)]), // .:.
        Shape::Bar { vertical: false },
    ];

    pub fn cells(&self) -> Cells {
        match self {
            Shape::Square => [p(0, 0), p(0, 1), p(1, 0), p(1, 1)],
            Shape::Three(cells) => *cells,
            Shape::Bar { vertical: false } => BAR_HORIZONTAL,
            Shape::Bar { vertical: true } => BAR_VERTICAL,
        }
    }

    /// The next orientation.
    pub fn rotated(&self) -> Shape {
        match self {
            Shape::Square => Shape::Square,
            Shape::Three(cells) => {
                let mut turned = cells.map(|c| p(c.col, 2 - c.row));
                turned.sort();
                Shape::Three(turned)
            }
            Shape::Bar { vertical } => Shape::Bar {
                vertical: !vertical,
            },
        }
    }

    /// Width of the preview box.
    pub fn span(&self) -> usize {
        match self {
            Shape::Square => 2,
            Shape::Three(_) => 3,
            Shape::Bar { .. } => 4,
        }
    }

    /// One row of the preview drawing, `filled` for occupied cells.
    pub fn preview_row(&self, row: i32, filled: char, empty: char) -> String {
        if let Shape::Square = self {
            return if row < 2 {
                filled.to_string().repeat(2)
            } else {
                String::new()
            };
        }
        let mut line = vec![empty; self.span()];
        for cell in self.cells().iter().filter(|c| c.row == row) {
            if let Some(slot) = line.get_mut(cell.col as usize) {
                *slot = filled;
            }
        }
        line.into_iter().collect()
    }
}
