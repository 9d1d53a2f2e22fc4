//! Game contract and the generic driver.

use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{GameError, RunError};
use crate::input::{Interrupt, KeySource};
use crate::rng::SimpleRng;
use crate::term::Screen;
use crate::types::{Key, Outcome};

/// Everything a game receives when it starts.
pub struct GameContext {
    pub screen: Screen,
    pub rng: SimpleRng,
    /// Wakes the key reader when the game ends on its own.
    pub interrupt: Interrupt,
    pub config: RuntimeConfig,
}

impl GameContext {
    pub fn new(
        screen: Screen,
        rng: SimpleRng,
        interrupt: Interrupt,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            screen,
            rng,
            interrupt,
            config,
        }
    }
}

/// Lifecycle contract between the driver and a game.
///
/// The driver calls `init` once, then alternates `should_continue` and
/// `handle` until the game stops or input ends, then calls `finish` once.
pub trait Game {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError>;

    /// React to one key event.
    fn handle(&mut self, key: Key);

    fn should_continue(&self) -> bool;

    /// Tear down and report how the game ended.
    fn finish(&mut self) -> Outcome;
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError> {
        (**self).init(ctx)
    }

    fn handle(&mut self, key: Key) {
        (**self).handle(key)
    }

    fn should_continue(&self) -> bool {
        (**self).should_continue()
    }

    fn finish(&mut self) -> Outcome {
        (**self).finish()
    }
}

/// Run `game` to completion, feeding it keys from `keys`.
///
/// An `init` failure is returned without calling `finish`. Once `init`
/// succeeds, `finish` runs exactly once, even when reading input fails.
pub fn run_game<G, S>(game: &mut G, keys: &mut S, ctx: GameContext) -> Result<Outcome, RunError>
where
    G: Game + ?Sized,
    S: KeySource + ?Sized,
{
    game.init(ctx)?;
    info!("game started");

    let result = drive(game, keys);
    let outcome = game.finish();
    info!(outcome = outcome.as_str(), "game finished");
    result.map(|()| outcome)
}

fn drive<G, S>(game: &mut G, keys: &mut S) -> Result<(), RunError>
where
    G: Game + ?Sized,
    S: KeySource + ?Sized,
{
    while game.should_continue() {
        match keys.next_key()? {
            Some(key) => {
                debug!(code = key.code(), "key");
                game.handle(key);
            }
            None => {
                debug!("key source interrupted");
                break;
            }
        }
    }
    Ok(())
}
