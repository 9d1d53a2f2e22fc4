//! Core types module - shared value types and constants
//!
//! Everything here is plain data with no dependencies, shared by the input
//! subsystem, the output primitives, the driver and the game engines.
//!
//! # Key codes
//!
//! A [`Key`] is the decoded form of one terminal read:
//!
//! - a literal byte ([`Key::Char`]),
//! - one of the four arrow keys,
//! - or [`Key::Raw`] carrying bytes that were not decoded (paste bursts,
//!   function keys, unknown escape sequences).
//!
//! # Timing constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 10 | Timer granularity of the tick-driven loop |
//! | `STEP_MS` | 1000 | Interval between autonomous steps (gravity, snake advance) |
//! | `FINAL_PAUSE_MS` | 1000 | Pause after a game-over / win message |
//!
//! # Examples
//!
//! ```
//! use tty_games_types::{Key, Point};
//!
//! let p = Point::new(1, 2) + Point::new(0, 1);
//! assert_eq!(p, Point::new(1, 3));
//! assert!(Point::new(0, 9) < Point::new(1, 0));
//!
//! assert_eq!(Key::Char(b'q').code(), b'q' as i32);
//! assert_eq!(Key::Up.code(), tty_games_types::CODE_UP);
//! ```

use std::borrow::Cow;
use std::ops::{Add, Mul, Sub};

/// Timer granularity of the tick-driven loop in milliseconds.
pub const TICK_MS: u64 = 10;

/// Interval between two autonomous steps in milliseconds.
pub const STEP_MS: u64 = 1000;

/// Pause after a terminal game message, in milliseconds.
pub const FINAL_PAUSE_MS: u64 = 1000;

/// Integer code of [`Key::Up`].
pub const CODE_UP: i32 = 1000;
/// Integer code of [`Key::Down`].
pub const CODE_DOWN: i32 = 1001;
/// Integer code of [`Key::Left`].
pub const CODE_LEFT: i32 = 1002;
/// Integer code of [`Key::Right`].
pub const CODE_RIGHT: i32 = 1003;
/// Integer code of [`Key::Raw`].
pub const CODE_RAW: i32 = 1004;

/// Position on a 2-D grid: `row` grows downwards, `col` grows rightwards.
///
/// Ordering is row-major: rows compare first, then columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, rhs: i32) -> Point {
        Point::new(self.row * rhs, self.col * rhs)
    }
}

/// A decoded key event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single byte as read from the terminal.
    Char(u8),
    Up,
    Down,
    Left,
    Right,
    /// Bytes that did not decode to anything above, exactly as read.
    Raw(Vec<u8>),
}

impl Key {
    /// Integer code: the byte value for [`Key::Char`], otherwise one of the
    /// `CODE_*` constants.
    pub fn code(&self) -> i32 {
        match self {
            Key::Char(b) => *b as i32,
            Key::Up => CODE_UP,
            Key::Down => CODE_DOWN,
            Key::Left => CODE_LEFT,
            Key::Right => CODE_RIGHT,
            Key::Raw(_) => CODE_RAW,
        }
    }

    /// Undecoded bytes; empty for everything except [`Key::Raw`].
    pub fn raw_bytes(&self) -> &[u8] {
        match self {
            Key::Raw(bytes) => bytes,
            _ => &[],
        }
    }

    /// [`Key::raw_bytes`] for display; invalid UTF-8 is replaced.
    pub fn raw_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.raw_bytes())
    }

    /// Direction of an arrow key, treating `w`/`a`/`s`/`d` (either case) as
    /// arrows too.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::Up | Key::Char(b'w') | Key::Char(b'W') => Some(Direction::Up),
            Key::Down | Key::Char(b's') | Key::Char(b'S') => Some(Direction::Down),
            Key::Left | Key::Char(b'a') | Key::Char(b'A') => Some(Direction::Left),
            Key::Right | Key::Char(b'd') | Key::Char(b'D') => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Key::Char(b'q') | Key::Char(b'Q'))
    }
}

/// The four grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset of one step in this direction.
    pub fn offset(self) -> Point {
        match self {
            Direction::Up => Point::new(-1, 0),
            Direction::Down => Point::new(1, 0),
            Direction::Left => Point::new(0, -1),
            Direction::Right => Point::new(0, 1),
        }
    }
}

impl From<Direction> for Key {
    fn from(direction: Direction) -> Key {
        match direction {
            Direction::Up => Key::Up,
            Direction::Down => Key::Down,
            Direction::Left => Key::Left,
            Direction::Right => Key::Right,
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The player pressed the quit key.
    Quit,
    Won,
    Lost,
    /// The game ran out of things to do without a win or loss (e.g. the
    /// driver was interrupted).
    Completed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Quit => "quit",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let p = Point::new(2, 3);
        let q = Point::new(1, -1);
        assert_eq!(p + q, Point::new(3, 2));
        assert_eq!(p - q, Point::new(1, 4));
        assert_eq!(q * 3, Point::new(3, -3));
    }

    #[test]
    fn point_order_is_row_major() {
        let mut points = vec![Point::new(1, 0), Point::new(0, 2), Point::new(0, 1)];
        points.sort();
        assert_eq!(
            points,
            vec![Point::new(0, 1), Point::new(0, 2), Point::new(1, 0)]
        );
    }

    #[test]
    fn key_codes_and_raw_text() {
        assert_eq!(Key::Char(b'a').code(), 97);
        assert_eq!(Key::Char(b'a').raw_text(), "");
        assert_eq!(Key::Left.code(), CODE_LEFT);
        let raw = Key::Raw(b"\x1b[Z".to_vec());
        assert_eq!(raw.code(), CODE_RAW);
        assert_eq!(raw.raw_text(), "\x1b[Z");

        let binary = Key::Raw(vec![0x1b, b'[', 0xff]);
        assert_eq!(binary.raw_bytes(), &[0x1b, b'[', 0xff]);
        assert_eq!(binary.raw_text(), "\x1b[\u{fffd}");
    }

    #[test]
    fn wasd_maps_to_directions() {
        assert_eq!(Key::Char(b'w').direction(), Some(Direction::Up));
        assert_eq!(Key::Char(b'S').direction(), Some(Direction::Down));
        assert_eq!(Key::Left.direction(), Some(Direction::Left));
        assert_eq!(Key::Char(b'x').direction(), None);
        assert_eq!(Direction::Right.offset(), Point::new(0, 1));
    }
}
