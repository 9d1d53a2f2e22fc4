//! Box pushing: `push-box [MAP_DIR]`.
//!
//! Plays every `*.txt` map in `MAP_DIR` in file-name order, or the built-in
//! maps when no directory is given.

use anyhow::Result;

use tty_games::core::GameError;
use tty_games::engine::PushBoxSequence;

const USAGE: &str = "usage: push-box [MAP_DIR]";

fn sequence(args: &[String]) -> Result<PushBoxSequence, GameError> {
    match args {
        [] => PushBoxSequence::with_default_maps(),
        [dir] => PushBoxSequence::from_dir(dir),
        _ => Err(GameError::InvalidArgs(USAGE.to_string())),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let game = sequence(&args)?;
    tty_games::launch(game)?;
    Ok(())
}
