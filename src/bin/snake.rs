use anyhow::Result;

use tty_games::core::TickDriven;
use tty_games::engine::Snake;

fn main() -> Result<()> {
    tty_games::launch(TickDriven::new(Snake::new()))?;
    Ok(())
}
