//! CSI cursor and clearing sequences.
//!
//! Every function here is a pure string builder. The terminal cursor itself
//! is not modelled; callers order their writes.

use std::fmt;

use crossterm::Command;

use crate::types::Point;

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

/// Clear from the cursor to the end of the screen.
pub const CLEAR_AFTER: &str = "\x1b[0J";
/// Clear from the start of the screen to the cursor.
pub const CLEAR_BEFORE: &str = "\x1b[1J";
/// Clear the entire screen.
pub const CLEAR_ALL: &str = "\x1b[2J";
/// Clear from the cursor to the end of the line.
pub const CLEAR_LINE_AFTER: &str = "\x1b[0K";
/// Clear from the start of the line to the cursor.
pub const CLEAR_LINE_BEFORE: &str = "\x1b[1K";
/// Clear the entire line.
pub const CLEAR_LINE: &str = "\x1b[2K";

pub const SAVE_CURSOR: &str = "\x1b[s";
pub const RESTORE_CURSOR: &str = "\x1b[u";

/// Move to `(row, col)` in the terminal's own 1-based coordinates.
pub fn cursor_pos(row: i32, col: i32) -> String {
    format!("{CSI}{row};{col}H")
}

/// Move to a 0-based [`Point`]; `(0, 0)` is the top-left cell.
pub fn cursor_to(p: Point) -> String {
    cursor_pos(p.row + 1, p.col + 1)
}

pub fn cursor_up(n: u32) -> String {
    format!("{CSI}{n}A")
}

pub fn cursor_down(n: u32) -> String {
    format!("{CSI}{n}B")
}

pub fn cursor_forward(n: u32) -> String {
    format!("{CSI}{n}C")
}

pub fn cursor_back(n: u32) -> String {
    format!("{CSI}{n}D")
}

/// Beginning of the line `n` lines down.
pub fn next_line(n: u32) -> String {
    format!("{CSI}{n}E")
}

/// Beginning of the line `n` lines up.
pub fn prev_line(n: u32) -> String {
    format!("{CSI}{n}F")
}

pub fn scroll_up(n: u32) -> String {
    format!("{CSI}{n}S")
}

pub fn scroll_down(n: u32) -> String {
    format!("{CSI}{n}T")
}

/// Queueable form of [`cursor_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorTo(pub Point);

impl Command for CursorTo {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str(&cursor_to(self.0))
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Err(std::io::Error::other("ANSI terminal required"))
    }
}

/// Queueable clearing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clear {
    After,
    Before,
    All,
    LineAfter,
    LineBefore,
    Line,
}

impl Clear {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clear::After => CLEAR_AFTER,
            Clear::Before => CLEAR_BEFORE,
            Clear::All => CLEAR_ALL,
            Clear::LineAfter => CLEAR_LINE_AFTER,
            Clear::LineBefore => CLEAR_LINE_BEFORE,
            Clear::Line => CLEAR_LINE,
        }
    }
}

impl Command for Clear {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str(self.as_str())
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Err(std::io::Error::other("ANSI terminal required"))
    }
}
