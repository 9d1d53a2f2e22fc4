//! Decoding of a single terminal read into a [`Key`].
//!
//! This is a lookup, not an escape-sequence parser: only the four arrow-key
//! terminators are recognised and everything else degrades to [`Key::Raw`].

use crate::types::{Direction, Key};

/// Prefix shared by CSI sequences (`ESC [`).
pub const ESCAPE_PREFIX: [u8; 2] = [0x1b, b'['];

/// Final bytes of the arrow-key sequences.
pub const ARROW_TABLE: [(u8, Direction); 4] = [
    (b'A', Direction::Up),
    (b'B', Direction::Down),
    (b'C', Direction::Right),
    (b'D', Direction::Left),
];

/// Decode the bytes returned by one successful read.
pub fn decode(bytes: &[u8]) -> Key {
    match bytes {
        [b] => Key::Char(*b),
        [p0, p1, last] if [*p0, *p1] == ESCAPE_PREFIX => ARROW_TABLE
            .iter()
            .find(|(terminator, _)| terminator == last)
            .map(|(_, direction)| Key::from(*direction))
            .unwrap_or_else(|| raw(bytes)),
        _ => raw(bytes),
    }
}

fn raw(bytes: &[u8]) -> Key {
    Key::Raw(bytes.to_vec())
}
