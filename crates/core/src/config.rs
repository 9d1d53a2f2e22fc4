//! Runtime configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TTY_GAMES_SEED` | clock | RNG seed for reproducible games |
//! | `TTY_GAMES_TICK_MS` | 10 | Timer granularity of the tick loop |
//! | `TTY_GAMES_STEP_MS` | 1000 | Interval between autonomous steps |
//! | `TTY_GAMES_PAUSE_MS` | 1000 | Pause after a game-over / win message |
//! | `TTY_GAMES_LOG` | unset | Log file; no logging when unset |
//!
//! Values that fail to parse fall back to their defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::rng::SimpleRng;
use crate::types::{FINAL_PAUSE_MS, STEP_MS, TICK_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub seed: Option<u32>,
    pub tick: Duration,
    pub step: Duration,
    pub pause: Duration,
    pub log_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick: Duration::from_millis(TICK_MS),
            step: Duration::from_millis(STEP_MS),
            pause: Duration::from_millis(FINAL_PAUSE_MS),
            log_path: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        let seed = lookup("TTY_GAMES_SEED").and_then(|s| s.trim().parse().ok());
        let log_path = lookup("TTY_GAMES_LOG")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            seed,
            tick: millis("TTY_GAMES_TICK_MS", defaults.tick),
            step: millis("TTY_GAMES_STEP_MS", defaults.step),
            pause: millis("TTY_GAMES_PAUSE_MS", defaults.pause),
            log_path,
        }
    }

    /// RNG for one game: seeded when configured, clock-based otherwise.
    pub fn rng(&self) -> SimpleRng {
        match self.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_time(),
        }
    }
}
