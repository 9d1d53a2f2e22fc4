//! Terminal output primitives.
//!
//! A small escape-code layer for full-redraw terminal games:
//! - [`csi`]: cursor placement, relative moves and clearing
//! - [`sgr`]: text attributes and 8/256/24-bit colors
//! - [`screen`]: an ordered writer built on the two modules above
//!
//! All sequences assume an ANSI/VT100-compatible terminal; there is no
//! capability negotiation and no alternate screen.

pub mod csi;
pub mod screen;
pub mod sgr;

pub use tty_games_types as types;

pub use csi::{Clear, CursorTo};
pub use screen::{Capture, Screen};
pub use sgr::{Color8, ColorType, Rgb, Styled};
