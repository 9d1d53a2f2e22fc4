//! 2048 on the terminal: w/a/s/d or arrows slide, q quits.

use anyhow::Result;

use tty_games::engine::G2048;

fn main() -> Result<()> {
    tty_games::launch(G2048::new())?;
    Ok(())
}
