//! tty-games (workspace facade crate).
//!
//! Re-exports the runtime crates under short names and provides [`launch`],
//! the shared entry point of the game binaries.

pub use tty_games_core as core;
pub use tty_games_engine as engine;
pub use tty_games_input as input;
pub use tty_games_term as term;
pub use tty_games_types as types;

pub mod echo;
pub mod launch;

pub use echo::KeyEcho;
pub use launch::{init_logging, launch, launch_with};
