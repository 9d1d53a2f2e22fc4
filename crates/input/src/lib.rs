//! Terminal input module (engine-facing).
//!
//! Owns the controlling terminal for the lifetime of a game:
//!
//! - [`session`]: raw-mode acquisition of `/dev/tty` with guaranteed restore
//! - [`reader`]: SIGIO-driven non-blocking reads producing [`Key`]s
//! - [`decode`]: table-driven decoding of one read into a [`Key`]
//! - [`exit_signals`]: terminal restore on SIGTERM, SIGHUP and SIGINT
//!
//! The terminal device is opened directly so redirected stdin does not
//! interfere with key capture.

pub mod decode;
pub mod error;
pub mod exit_signals;
pub mod reader;
pub mod session;

pub use tty_games_types as types;

pub use decode::decode;
pub use error::InputError;
pub use exit_signals::ExitSignals;
pub use reader::{Interrupt, KeyReader};
pub use session::{Restorer, TerminalSession};

use tty_games_types::Key;

/// Source of decoded key events.
///
/// Implemented by [`KeyReader`]; tests drive the game driver with scripted
/// sources instead of a real terminal.
pub trait KeySource {
    /// Block until a key is available. `Ok(None)` means the source was
    /// interrupted and will not produce more keys.
    fn next_key(&mut self) -> Result<Option<Key>, InputError>;
}
