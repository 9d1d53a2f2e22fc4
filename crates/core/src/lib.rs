//! Game runtime: the lifecycle contract, the driver and the tick loop.
//!
//! # Module Structure
//!
//! - [`game`]: the [`Game`] contract and [`run_game`], the generic driver
//! - [`tick`]: [`TickDriven`], running a [`TickGame`] on its own loop thread
//! - [`config`]: [`RuntimeConfig`] read from `TTY_GAMES_*` variables
//! - [`rng`]: [`SimpleRng`], the per-game random source
//! - [`error`]: [`GameError`] and [`RunError`]
//!
//! # Example
//!
//! ```
//! use tty_games_core::{run_game, Game, GameContext, GameError, RuntimeConfig, SimpleRng};
//! use tty_games_core::input::{InputError, Interrupt, KeySource};
//! use tty_games_core::term::Screen;
//! use tty_games_core::types::{Key, Outcome};
//!
//! struct Echo(Vec<Key>);
//!
//! impl Game for Echo {
//!     fn init(&mut self, _ctx: GameContext) -> Result<(), GameError> { Ok(()) }
//!     fn handle(&mut self, key: Key) { self.0.push(key) }
//!     fn should_continue(&self) -> bool { self.0.len() < 2 }
//!     fn finish(&mut self) -> Outcome { Outcome::Completed }
//! }
//!
//! struct Arrows;
//!
//! impl KeySource for Arrows {
//!     fn next_key(&mut self) -> Result<Option<Key>, InputError> { Ok(Some(Key::Up)) }
//! }
//!
//! let (screen, _) = Screen::capture();
//! let config = RuntimeConfig::default();
//! let ctx = GameContext::new(screen, SimpleRng::new(7), Interrupt::detached(), config);
//! let mut game = Echo(Vec::new());
//! let outcome = run_game(&mut game, &mut Arrows, ctx).unwrap();
//! assert_eq!(outcome, Outcome::Completed);
//! assert_eq!(game.0, vec![Key::Up, Key::Up]);
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod rng;
pub mod tick;

pub use tty_games_input as input;
pub use tty_games_term as term;
pub use tty_games_types as types;

pub use config::RuntimeConfig;
pub use error::{GameError, RunError};
pub use game::{run_game, Game, GameContext};
pub use rng::SimpleRng;
pub use tick::{run_loop, Delivery, Flow, LoopState, TickDriven, TickGame, Timing};
