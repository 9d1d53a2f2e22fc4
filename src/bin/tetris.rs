//! Falling-shapes game (default binary).

use anyhow::Result;

use tty_games::core::TickDriven;
use tty_games::engine::Tetris;

fn main() -> Result<()> {
    tty_games::launch(TickDriven::new(Tetris::new()))?;
    Ok(())
}
