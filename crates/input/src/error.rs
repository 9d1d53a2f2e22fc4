use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("terminal device unavailable: {0}")]
    TerminalUnavailable(#[source] io::Error),

    #[error("failed to configure terminal attributes: {0}")]
    Attribute(#[source] io::Error),

    #[error("terminal is already claimed by another session")]
    TerminalBusy,

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    #[error("failed to read from terminal: {0}")]
    Read(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;
