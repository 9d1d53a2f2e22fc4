use std::io;

use thiserror::Error;

use crate::input::InputError;

/// Failures a game reports from `init`.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid map {origin}: {reason}")]
    InvalidMap { origin: String, reason: String },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("no maps to play")]
    NoMaps,

    #[error("failed to read maps: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start game loop: {0}")]
    Runtime(#[source] io::Error),
}

/// Failures that end a run before the game finishes normally.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("game failed to initialise: {0}")]
    Init(#[from] GameError),

    #[error(transparent)]
    Input(#[from] InputError),
}
