//! Rule engines for the bundled games.
//!
//! - [`g2048`]: tile merging on a 4x4 grid, driven by key events only
//! - [`tetris`]: falling shapes on a 15x10 board, tick-driven
//! - [`snake`]: snake on a 10x10 board, tick-driven
//! - [`push_box`]: box pushing over one or more maps
//!
//! Key-driven games implement [`Game`](tty_games_core::Game) directly;
//! tick-driven ones implement [`TickGame`](tty_games_core::TickGame) and run
//! inside [`TickDriven`](tty_games_core::TickDriven).

pub mod g2048;
pub mod push_box;
pub mod snake;
pub mod tetris;

pub use tty_games_core::{input, term, types};

pub use g2048::G2048;
pub use push_box::{load_maps, BoxMap, Cell, PushBox, PushBoxSequence};
pub use snake::Snake;
pub use tetris::{Board, Shape, Tetris};

/// Status messages are cut to this many characters in side panels.
pub const MESSAGE_WIDTH: usize = 20;

/// `message` limited to [`MESSAGE_WIDTH`] characters.
pub(crate) fn status(message: &str) -> &str {
    match message.char_indices().nth(MESSAGE_WIDTH) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}
