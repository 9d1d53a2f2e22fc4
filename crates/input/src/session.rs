//! Raw-mode terminal session.
//!
//! A [`TerminalSession`] owns the opened terminal device together with the
//! attributes it found there. Dropping the session restores those attributes
//! and closes the device, so every exit path (normal return, `?` error,
//! panic unwinding) leaves the terminal usable.

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use libc::c_int;
use tracing::{debug, warn};

use crate::error::{InputError, Result};

/// Controlling terminal of the process.
pub const TTY_PATH: &str = "/dev/tty";

/// At most one session per process.
static CLAIMED: AtomicBool = AtomicBool::new(false);

struct Claim;

impl Claim {
    fn take() -> Result<Self> {
        CLAIMED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| Claim)
            .map_err(|_| InputError::TerminalBusy)
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        CLAIMED.store(false, Ordering::SeqCst);
    }
}

fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn get_flags(fd: c_int) -> io::Result<c_int> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(flags)
}

fn set_flags(fd: c_int, flags: c_int) -> io::Result<()> {
    let result = unsafe { libc::fcntl(fd, libc::F_SETFL, flags) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Raw-mode attributes derived from `original`.
///
/// Input bytes pass through untouched (no break / flow-control handling),
/// nothing is echoed, reads are not line buffered, control characters do not
/// raise signals, characters are 8 bits wide, and a read returns as soon as
/// one byte is available.
pub fn make_raw(original: &libc::termios) -> libc::termios {
    let mut raw = *original;
    raw.c_iflag &= !(libc::BRKINT | libc::IXON);
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
    raw.c_cflag &= !(libc::CSIZE | libc::PARENB);
    raw.c_cflag |= libc::CS8;
    raw.c_cc[libc::VMIN] = 1;
    raw.c_cc[libc::VTIME] = 0;
    raw
}

/// The claimed terminal in raw mode.
pub struct TerminalSession {
    tty: File,
    original: libc::termios,
    raw: libc::termios,
    original_flags: c_int,
    restored: bool,
    _claim: Claim,
}

impl TerminalSession {
    /// Open the controlling terminal and switch it into raw mode.
    pub fn acquire() -> Result<Self> {
        Self::acquire_path(TTY_PATH)
    }

    pub fn acquire_path(path: impl AsRef<Path>) -> Result<Self> {
        let claim = Claim::take()?;
        let tty = OpenOptions::new()
            .read(true)
            .open(path.as_ref())
            .map_err(InputError::TerminalUnavailable)?;
        Self::install(tty, claim)
    }

    /// Take over an already opened terminal device (e.g. a pty slave).
    pub fn acquire_file(tty: File) -> Result<Self> {
        let claim = Claim::take()?;
        Self::install(tty, claim)
    }

    fn install(tty: File, claim: Claim) -> Result<Self> {
        let fd = tty.as_raw_fd();
        let original = get_termios(fd).map_err(InputError::Attribute)?;
        let original_flags = get_flags(fd).map_err(InputError::Attribute)?;
        let raw = make_raw(&original);
        set_termios(fd, &raw).map_err(InputError::Attribute)?;
        debug!(fd, "terminal switched to raw mode");

        Ok(Self {
            tty,
            original,
            raw,
            original_flags,
            restored: false,
            _claim: claim,
        })
    }

    /// Switch the device to non-blocking reads and ask for SIGIO on input.
    ///
    /// SIGIO terminates the process by default, so a handler must be
    /// registered before calling this.
    pub fn enable_async(&self) -> Result<()> {
        let fd = self.tty.as_raw_fd();
        let owner = unsafe { libc::fcntl(fd, libc::F_SETOWN, libc::getpid()) };
        if owner < 0 {
            return Err(InputError::Attribute(io::Error::last_os_error()));
        }
        set_flags(fd, self.original_flags | libc::O_ASYNC | libc::O_NONBLOCK)
            .map_err(InputError::Attribute)
    }

    /// One non-blocking read attempt.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.tty).read(buf)
    }

    pub fn raw_fd(&self) -> RawFd {
        self.tty.as_raw_fd()
    }

    /// Attributes installed by [`TerminalSession::acquire`].
    pub fn raw_attributes(&self) -> &libc::termios {
        &self.raw
    }

    /// A handle able to put the original attributes back from a panic hook.
    pub fn restorer(&self) -> Restorer {
        Restorer {
            fd: self.tty.as_raw_fd(),
            original: self.original,
        }
    }

    /// Restore the original attributes and close the device, reporting
    /// failures instead of swallowing them like `Drop` does.
    pub fn release(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        let fd = self.tty.as_raw_fd();
        // Both steps run even when the first fails; the first error wins.
        let attributes = set_termios(fd, &self.original);
        let flags = set_flags(fd, self.original_flags);
        self.restored = true;
        attributes.and(flags).map_err(InputError::Attribute)?;
        debug!(fd, "terminal attributes restored");
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(%err, "failed to restore terminal attributes");
        }
    }
}

/// Copy of the original attributes for out-of-band restoration.
#[derive(Clone, Copy)]
pub struct Restorer {
    fd: RawFd,
    original: libc::termios,
}

impl Restorer {
    /// Best-effort restore; safe to call more than once.
    pub fn restore(&self) {
        let _ = set_termios(self.fd, &self.original);
    }
}
