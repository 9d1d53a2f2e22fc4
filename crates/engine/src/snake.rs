//! Snake on a 10x10 board.
//!
//! The head starts in the centre heading left and advances one cell per
//! step. Hitting a wall or the body loses; eating food grows the body by one
//! and places new food on a random free cell; filling the board wins.

use std::collections::VecDeque;
use std::io;

use tracing::debug;
use tty_games_core::{Flow, SimpleRng, TickGame};

use crate::status;
use crate::term::Screen;
use crate::types::{Direction, Key, Outcome, Point};

pub const SNAKE_ROWS: i32 = 10;
pub const SNAKE_COLS: i32 = 10;

const BLANK: &str = " ";
const BODY: &str = "#";
const HEAD: &str = "O";
const WALL: &str = "@";
const FOOD: &str = "o";

const TIPS: [&str; 5] = ["q -> exit", "a -> left", "d -> right", "w -> up", "s -> down"];

pub struct Snake {
    rows: i32,
    cols: i32,
    /// Head first.
    body: VecDeque<Point>,
    heading: Direction,
    food: Option<Point>,
    message: String,
    rng: SimpleRng,
}

impl Snake {
    pub fn new() -> Self {
        Self::with_size(SNAKE_ROWS, SNAKE_COLS)
    }

    pub fn with_size(rows: i32, cols: i32) -> Self {
        let mut body = VecDeque::new();
        body.push_front(Point::new(rows / 2, cols / 2));
        Self {
            rows,
            cols,
            body,
            heading: Direction::Left,
            food: None,
            message: String::new(),
            rng: SimpleRng::default(),
        }
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or(Point::ORIGIN)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    /// Put the food on a given cell.
    pub fn place_food(&mut self, p: Point) {
        self.food = Some(p);
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn area(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.row >= 0 && p.row < self.rows && p.col >= 0 && p.col < self.cols
    }

    fn free_cells(&self) -> Vec<Point> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| Point::new(row, col)))
            .filter(|p| !self.body.contains(p))
            .collect()
    }

    fn roll_food(&mut self) {
        let free = self.free_cells();
        self.food = self.rng.pick(&free).copied();
    }

    fn advance(&mut self) -> Flow {
        let next = self.head() + self.heading.offset();
        if !self.in_bounds(next) || self.body.contains(&next) {
            return Flow::over(Outcome::Lost, "Game over!");
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            debug!(len = self.body.len(), "food eaten");
            if self.body.len() == self.area() {
                self.food = None;
                return Flow::over(Outcome::Won, "Win!");
            }
            self.roll_food();
        } else {
            self.body.pop_back();
        }
        Flow::Continue
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl TickGame for Snake {
    type Action = Direction;

    fn init(&mut self, rng: SimpleRng) {
        self.rng = rng;
        self.roll_food();
    }

    fn translate(key: &Key) -> Option<Direction> {
        key.direction()
    }

    fn apply(&mut self, direction: Direction) -> Flow {
        self.heading = direction;
        Flow::Continue
    }

    fn step(&mut self) -> Flow {
        self.advance()
    }

    fn set_message(&mut self, message: String) {
        self.message = message;
    }

    fn draw(&self, screen: &mut Screen) -> io::Result<()> {
        let width = self.cols as usize;
        screen.clear()?;
        screen.cursor(Point::ORIGIN)?;

        screen.draw(&WALL.repeat(width + 2))?;
        for row in 0..self.rows {
            screen.draw_at(Point::new(row + 1, 0), WALL)?;
            screen.draw(&BLANK.repeat(width))?;
            screen.draw_line(WALL)?;
        }
        screen.draw(&WALL.repeat(width + 2))?;

        let inside = Point::new(1, 1);
        for &p in &self.body {
            screen.draw_at(p + inside, BODY)?;
        }
        screen.draw_at(self.head() + inside, HEAD)?;
        if let Some(food) = self.food {
            screen.draw_at(food + inside, FOOD)?;
        }

        let panel = self.cols + 3;
        screen.draw_at(Point::new(1, panel), &format!("Score: {}", self.body.len()))?;
        screen.draw_at(Point::new(2, panel), "Tips:")?;
        for (i, tip) in TIPS.iter().enumerate() {
            screen.draw_at(Point::new(3 + i as i32, panel + 3), tip)?;
        }
        screen.draw_at(Point::new(8, panel), status(&self.message))?;
        screen.cursor(Point::new(self.rows + 1, self.cols + 2))
    }
}
