//! Key echo: prints every decoded key until `q`.
//!
//! Backs the `input-test` binary, which checks what a terminal sends for
//! each key.

use tracing::warn;

use crate::core::{Game, GameContext, GameError};
use crate::term::Screen;
use crate::types::{Key, Outcome};

#[derive(Default)]
pub struct KeyEcho {
    screen: Option<Screen>,
    seen: usize,
    quit: bool,
}

impl KeyEcho {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys echoed so far.
    pub fn seen(&self) -> usize {
        self.seen
    }

    fn write(&mut self, line: &str) {
        let Some(screen) = self.screen.as_mut() else {
            return;
        };
        if let Err(e) = screen.draw_line(line).and_then(|()| screen.flush()) {
            warn!(error = %e, "echo failed");
        }
    }
}

/// One echo line: the key, its integer code and any raw text.
pub fn describe(key: &Key) -> String {
    let name = match key {
        Key::Char(b) if b.is_ascii_graphic() || *b == b' ' => format!("'{}'", *b as char),
        Key::Char(b) => format!("{b:#04x}"),
        Key::Up => "up".to_string(),
        Key::Down => "down".to_string(),
        Key::Left => "left".to_string(),
        Key::Right => "right".to_string(),
        Key::Raw(_) => "raw".to_string(),
    };
    format!("{name} code={} raw={:?}", key.code(), key.raw_text())
}

impl Game for KeyEcho {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError> {
        self.screen = Some(ctx.screen);
        self.write("press keys to see their codes, q to exit");
        Ok(())
    }

    fn handle(&mut self, key: Key) {
        self.seen += 1;
        self.write(&describe(&key));
        if key.is_quit() {
            self.quit = true;
        }
    }

    fn should_continue(&self) -> bool {
        !self.quit
    }

    fn finish(&mut self) -> Outcome {
        if self.quit {
            Outcome::Quit
        } else {
            Outcome::Completed
        }
    }
}
