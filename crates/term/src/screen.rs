//! Screen: ordered escape-code output for full redraws.
//!
//! Draw calls queue their sequences into an internal buffer in call order;
//! [`Screen::flush`] writes the buffer to the underlying stream in one go.
//! There is no frame buffer and no diffing: a redraw clears the screen and
//! writes everything again.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::style::Print;
use crossterm::QueueableCommand;

use crate::csi::{self, Clear, CursorTo};
use crate::sgr::{self, ColorType, Rgb};
use crate::types::Point;

pub struct Screen {
    out: Box<dyn Write + Send>,
    buf: Vec<u8>,
}

impl Screen {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(4 * 1024),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// A screen writing into memory, plus a handle to read what was flushed.
    pub fn capture() -> (Self, Capture) {
        let capture = Capture::default();
        (Self::new(Box::new(capture.clone())), capture)
    }

    /// Clear the whole screen.
    pub fn clear(&mut self) -> io::Result<()> {
        self.buf.queue(Clear::Before)?.queue(Clear::All)?;
        Ok(())
    }

    /// Move the cursor to a 0-based point.
    pub fn cursor(&mut self, p: Point) -> io::Result<()> {
        self.buf.queue(CursorTo(p))?;
        Ok(())
    }

    /// Write raw text (or an escape sequence) at the current position.
    pub fn draw(&mut self, s: &str) -> io::Result<()> {
        self.buf.queue(Print(s))?;
        Ok(())
    }

    pub fn draw_at(&mut self, p: Point, s: &str) -> io::Result<()> {
        self.buf.queue(CursorTo(p))?.queue(Print(s))?;
        Ok(())
    }

    /// Write `s` followed by a line break. Raw mode keeps output
    /// post-processing, so `\n` also returns the carriage.
    pub fn draw_line(&mut self, s: &str) -> io::Result<()> {
        self.buf.queue(Print(s))?.queue(Print("\n"))?;
        Ok(())
    }

    pub fn draw_line_at(&mut self, p: Point, s: &str) -> io::Result<()> {
        self.cursor(p)?;
        self.draw_line(s)
    }

    pub fn draw_sgr(&mut self, content: &str, attrs: &[&str]) -> io::Result<()> {
        self.buf.queue(sgr::Styled {
            text: content,
            attrs,
        })?;
        Ok(())
    }

    pub fn draw_color8(
        &mut self,
        role: ColorType,
        index: impl Into<u8>,
        s: &str,
    ) -> io::Result<()> {
        self.draw_sgr(s, &[&sgr::color8(role, index)])
    }

    pub fn draw_color256(&mut self, role: ColorType, index: u8, s: &str) -> io::Result<()> {
        self.draw_sgr(s, &[&sgr::color256(role, index)])
    }

    pub fn draw_color_rgb(&mut self, role: ColorType, rgb: Rgb, s: &str) -> io::Result<()> {
        self.draw_sgr(s, &[&sgr::color_rgb(role, rgb)])
    }

    pub fn cursor_back(&mut self, n: u32) -> io::Result<()> {
        self.draw(&csi::cursor_back(n))
    }

    pub fn cursor_up(&mut self, n: u32) -> io::Result<()> {
        self.draw(&csi::cursor_up(n))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        self.buf.clear();
        Ok(())
    }
}

/// In-memory sink shared with a [`Screen`] built by [`Screen::capture`].
#[derive(Debug, Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn take(&self) -> String {
        let mut bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        let out = String::from_utf8_lossy(&bytes).into_owned();
        bytes.clear();
        out
    }
}

impl Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        bytes.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
