//! SIGIO-driven key reader.
//!
//! The terminal is switched to non-blocking asynchronous mode; between read
//! attempts the reader sleeps until the kernel signals that input is ready.
//! A wake-up whose read would block simply goes back to sleep.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::iterator::{Handle, Signals};
use tracing::debug;

use crate::decode::decode;
use crate::error::{InputError, Result};
use crate::session::{Restorer, TerminalSession};
use crate::types::Key;
use crate::KeySource;

/// Upper bound of bytes taken by a single read.
pub const READ_BUF_LEN: usize = 128;

/// Wakes a blocked [`KeyReader`] and makes it return `Ok(None)`.
///
/// Interrupting is permanent: the reader produces no further keys.
#[derive(Debug, Clone)]
pub struct Interrupt {
    handle: Option<Handle>,
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// An interrupt not attached to any reader, for sources that never block.
    pub fn detached() -> Self {
        Self {
            handle: None,
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
        if let Some(handle) = &self.handle {
            handle.close();
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Exclusive owner of the raw terminal session while a game runs.
pub struct KeyReader {
    session: TerminalSession,
    signals: Signals,
    interrupt: Interrupt,
    buf: [u8; READ_BUF_LEN],
}

impl KeyReader {
    /// Claim the controlling terminal and start listening for input.
    pub fn open() -> Result<Self> {
        Self::new(TerminalSession::acquire()?)
    }

    pub fn new(session: TerminalSession) -> Result<Self> {
        let signals = Signals::new([libc::SIGIO]).map_err(InputError::Signal)?;
        session.enable_async()?;
        let interrupt = Interrupt {
            handle: Some(signals.handle()),
            flag: Arc::new(AtomicBool::new(false)),
        };
        Ok(Self {
            session,
            signals,
            interrupt,
            buf: [0; READ_BUF_LEN],
        })
    }

    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn restorer(&self) -> Restorer {
        self.session.restorer()
    }

    /// Stop listening and hand the terminal back in its original state.
    pub fn close(self) -> Result<()> {
        let KeyReader {
            session, signals, ..
        } = self;
        signals.handle().close();
        session.release()
    }
}

/// What a single read attempt produced.
#[derive(Debug, PartialEq)]
enum Attempt {
    Key(Key),
    /// End of file: the terminal hung up.
    Closed,
    /// Nothing to read yet; sleep until SIGIO.
    Wait,
    Retry,
}

fn attempt(result: io::Result<usize>, buf: &[u8]) -> Result<Attempt> {
    match result {
        Ok(0) => Ok(Attempt::Closed),
        Ok(n) => Ok(Attempt::Key(decode(&buf[..n]))),
        Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(Attempt::Wait),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(Attempt::Retry),
        Err(err) => Err(InputError::Read(err)),
    }
}

impl KeySource for KeyReader {
    fn next_key(&mut self) -> Result<Option<Key>> {
        loop {
            if self.interrupt.is_interrupted() {
                return Ok(None);
            }

            let result = self.session.read(&mut self.buf);
            match attempt(result, &self.buf)? {
                Attempt::Key(key) => {
                    debug!(?key, "key decoded");
                    return Ok(Some(key));
                }
                Attempt::Closed => {
                    debug!("terminal closed");
                    self.interrupt.interrupt();
                    return Ok(None);
                }
                Attempt::Retry => continue,
                Attempt::Wait => {}
            }

            // Pending signals are kept by signal-hook, so input arriving
            // between the read above and this wait is not missed.
            for _ in self.signals.wait() {}
        }
    }
}
