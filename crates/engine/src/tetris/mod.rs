//! Falling-shapes game on a 15x10 board.
//!
//! A shape spawns at the top centre and falls one row per step. `Up`
//! rotates, `Down` drops to the bottom, `Left`/`Right` shift. When a shape
//! cannot fall any further it settles; full rows are removed and score
//! `1 << (rows - 1)`. The game is lost when the next shape has no room to
//! spawn.

pub mod board;
pub mod shapes;

use std::io;

use tracing::debug;
use tty_games_core::{Flow, SimpleRng, TickGame};

pub use board::{Board, BOARD_COLS, BOARD_ROWS};
pub use shapes::{Cells, Shape};

use crate::status;
use crate::term::Screen;
use crate::types::{Direction, Key, Outcome, Point};

const WALL: &str = "#";
const BLOCK: char = '@';
const EMPTY: char = ' ';

const DOWN: Point = Point::new(1, 0);
const LEFT: Point = Point::new(0, -1);
const RIGHT: Point = Point::new(0, 1);

const TIPS: [&str; 5] = [
    "    q -> exit",
    "    a -> left",
    "    d -> right",
    "    w -> switch",
    "    s -> down",
];

/// Player intent, produced on the input thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Rotate,
    Drop,
    Left,
    Right,
}

pub struct Tetris {
    board: Board,
    current: Shape,
    next: Shape,
    pos: Point,
    score: u32,
    message: String,
    rng: SimpleRng,
}

impl Tetris {
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            current: Shape::Square,
            next: Shape::Square,
            pos: Self::spawn_point(),
            score: 0,
            message: String::new(),
            rng: SimpleRng::default(),
        }
    }

    /// Fix the falling and the upcoming shape.
    pub fn with_shapes(mut self, current: Shape, next: Shape) -> Self {
        self.current = current;
        self.next = next;
        self
    }

    pub fn spawn_point() -> Point {
        Point::new(0, BOARD_COLS as i32 / 2)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current(&self) -> Shape {
        self.current
    }

    pub fn next_shape(&self) -> Shape {
        self.next
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Random shape in a random orientation.
    fn roll(&mut self) -> Shape {
        let mut shape = self.rng.pick(&Shape::ALL).copied().unwrap_or(Shape::Square);
        for _ in 0..self.rng.next_range(4) {
            shape = shape.rotated();
        }
        shape
    }

    fn shift(&mut self, offset: Point) -> bool {
        let target = self.pos + offset;
        if self.board.fits(target, &self.current.cells()) {
            self.pos = target;
            true
        } else {
            false
        }
    }

    fn rotate(&mut self) {
        let turned = self.current.rotated();
        if self.board.fits(self.pos, &turned.cells()) {
            self.current = turned;
        }
    }

    /// Move down one row; settles the shape once it rests on something.
    /// `Some` when the shape settled.
    fn fall(&mut self) -> Option<Flow> {
        self.shift(DOWN);
        if self.board.fits(self.pos + DOWN, &self.current.cells()) {
            return None;
        }
        Some(self.settle())
    }

    fn drop_down(&mut self) -> Flow {
        for _ in 0..BOARD_ROWS {
            if let Some(flow) = self.fall() {
                return flow;
            }
        }
        Flow::Continue
    }

    fn settle(&mut self) -> Flow {
        self.board.lock(self.pos, &self.current.cells());
        let cleared = self.board.clear_full_rows();
        if !cleared.is_empty() {
            self.score += 1 << (cleared.len() - 1);
            debug!(rows = ?cleared, score = self.score, "rows cleared");
        }

        self.current = self.next;
        self.pos = Self::spawn_point();
        self.next = self.roll();

        if self.board.fits(self.pos, &self.current.cells()) {
            Flow::Continue
        } else {
            Flow::over(Outcome::Lost, "Game over!")
        }
    }

    fn draw_panel(&self, screen: &mut Screen) -> io::Result<()> {
        let col = BOARD_COLS as i32 + 3;
        let at = |row: i32| Point::new(row, col);

        screen.draw_at(at(1), &format!(" Score: {}", self.score))?;
        screen.draw_at(at(2), " Next: ")?;
        for row in 0..4 {
            let preview = self.next.preview_row(row, BLOCK, EMPTY);
            screen.draw_at(at(3 + row), &format!("   {preview}"))?;
        }
        screen.draw_at(at(7), " Tips:")?;
        for (i, tip) in TIPS.iter().enumerate() {
            screen.draw_at(at(8 + i as i32), tip)?;
        }
        screen.draw_at(at(13), &format!(" {}", status(&self.message)))?;
        Ok(())
    }
}

impl Default for Tetris {
    fn default() -> Self {
        Self::new()
    }
}

impl TickGame for Tetris {
    type Action = Move;

    fn init(&mut self, rng: SimpleRng) {
        self.rng = rng;
        self.current = self.roll();
        self.next = self.roll();
        self.pos = Self::spawn_point();
    }

    fn translate(key: &Key) -> Option<Move> {
        key.direction().map(|d| match d {
            Direction::Up => Move::Rotate,
            Direction::Down => Move::Drop,
            Direction::Left => Move::Left,
            Direction::Right => Move::Right,
        })
    }

    fn apply(&mut self, action: Move) -> Flow {
        match action {
            Move::Rotate => self.rotate(),
            Move::Drop => return self.drop_down(),
            Move::Left => {
                self.shift(LEFT);
            }
            Move::Right => {
                self.shift(RIGHT);
            }
        }
        Flow::Continue
    }

    fn step(&mut self) -> Flow {
        self.fall().unwrap_or(Flow::Continue)
    }

    fn set_message(&mut self, message: String) {
        self.message = message;
    }

    fn draw(&self, screen: &mut Screen) -> io::Result<()> {
        let border = WALL.repeat(BOARD_COLS + 2);
        screen.clear()?;
        screen.draw_at(Point::ORIGIN, &border)?;

        for row in 0..BOARD_ROWS {
            let line: String = self
                .board
                .row(row)
                .iter()
                .map(|&c| if c { BLOCK } else { EMPTY })
                .collect();
            screen.draw_at(Point::new(row as i32 + 1, 0), &format!("{WALL}{line}{WALL}"))?;
        }
        screen.draw_at(Point::new(BOARD_ROWS as i32 + 1, 0), &border)?;

        let block = BLOCK.to_string();
        for cell in self.current.cells() {
            screen.draw_at(self.pos + cell + Point::new(1, 1), &block)?;
        }

        self.draw_panel(screen)?;
        screen.cursor(Point::new(BOARD_ROWS as i32 + 1, BOARD_COLS as i32 + 3))
    }
}
