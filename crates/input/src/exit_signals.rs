//! Termination signals while a game owns the terminal.
//!
//! SIGTERM, SIGHUP and SIGINT would otherwise kill the process with the
//! terminal still in raw mode. A watcher thread restores the original
//! attributes as soon as one arrives and interrupts the reader, so the game
//! is finished and the session released along the normal return path.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use libc::c_int;
use signal_hook::iterator::{Handle, Signals};
use tracing::{debug, warn};

use crate::error::{InputError, Result};
use crate::reader::Interrupt;
use crate::session::Restorer;

/// Signals that end a game early.
pub const EXIT_SIGNALS: [c_int; 3] = [libc::SIGTERM, libc::SIGHUP, libc::SIGINT];

/// Watches [`EXIT_SIGNALS`] until dropped.
pub struct ExitSignals {
    handle: Handle,
    received: Arc<AtomicI32>,
    thread: Option<JoinHandle<()>>,
}

impl ExitSignals {
    pub fn install(restorer: Restorer, interrupt: Interrupt) -> Result<Self> {
        let mut signals = Signals::new(EXIT_SIGNALS).map_err(InputError::Signal)?;
        let handle = signals.handle();
        let received = Arc::new(AtomicI32::new(0));
        let seen = Arc::clone(&received);

        let thread = thread::Builder::new()
            .name("exit-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    warn!(signal, "termination signal, restoring terminal");
                    restorer.restore();
                    // The first signal decides the exit status.
                    let _ = seen.compare_exchange(0, signal, Ordering::SeqCst, Ordering::SeqCst);
                    interrupt.interrupt();
                }
                debug!("exit signal watcher stopped");
            })
            .map_err(InputError::Signal)?;

        Ok(Self {
            handle,
            received,
            thread: Some(thread),
        })
    }

    /// The first termination signal seen, if any.
    pub fn received(&self) -> Option<c_int> {
        match self.received.load(Ordering::SeqCst) {
            0 => None,
            signal => Some(signal),
        }
    }
}

impl Drop for ExitSignals {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
