//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Each frame is encoded into a byte buffer and written with one flush. The
//! renderer keeps the last presented frame and, while the size is unchanged,
//! only sends the runs of cells that differ from it.

use std::io::{self, Write};
use std::mem;

use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal::{self, ClearType},
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen; `None` means the screen content is unknown.
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        queue!(
            self.buf,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        self.flush()?;
        self.shown = None;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Also fine to call when `enter` failed halfway.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        queue!(
            self.buf,
            ResetColor,
            SetAttribute(Attribute::Reset),
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next frame (after a resize the screen is garbage).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Present `fb` and hand back the previous frame's buffer in its place.
    ///
    /// The caller re-renders into the returned buffer, so the two allocations
    /// ping-pong and steady-state frames never allocate.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let shown = self.shown.take();
        match &shown {
            Some(prev) => encode_diff_into(prev, fb, &mut self.buf)?,
            None => encode_full_into(fb, &mut self.buf)?,
        }
        self.flush()?;

        let mut spare = shown.unwrap_or_else(|| FrameBuffer::new(0, 0));
        spare.resize(fb.width(), fb.height());
        self.shown = Some(mem::replace(fb, spare));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a complete repaint of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    queue!(out, terminal::Clear(ClearType::All))?;
    let mut pen = Pen::new(out);
    for y in 0..fb.height() {
        pen.run(fb, 0, y, fb.width())?;
    }
    pen.finish()
}

/// Encode the cells of `next` that differ from `prev`.
///
/// Frames of different sizes cannot be compared and fall back to a full repaint.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }
    let mut pen = Pen::new(out);
    for_each_changed_run(prev, next, |x, y, len| pen.run(next, x, y, len))?;
    pen.finish()
}

/// Writes cells, emitting color and intensity changes only when they differ
/// from what the terminal already has.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn run(&mut self, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        queue!(self.out, cursor::MoveTo(x, y))?;
        for cx in x..x.saturating_add(len) {
            let cell = fb.get(cx, y).unwrap_or_default();
            self.set_style(cell.style)?;
            queue!(self.out, Print(cell.ch))?;
        }
        Ok(())
    }

    fn set_style(&mut self, style: CellStyle) -> Result<()> {
        let prev = self.style.replace(style);
        if prev == Some(style) {
            return Ok(());
        }
        let intensity_changed = prev.map_or(true, |p| p.bold != style.bold || p.dim != style.dim);
        if intensity_changed {
            queue!(self.out, SetAttribute(Attribute::NormalIntensity))?;
            if style.bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }
        }
        queue!(
            self.out,
            SetColors(Colors::new(color(style.fg), color(style.bg)))
        )?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::from((rgb.r, rgb.g, rgb.b))
}

/// Call `f(x, y, len)` for each horizontal run of differing cells.
/// Both frames must have the same size.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    let w = next.width();
    for y in 0..next.height() {
        let mut start = None;
        for x in 0..=w {
            let differs = x < w && prev.get(x, y) != next.get(x, y);
            match (start, differs) {
                (None, true) => start = Some(x),
                (Some(s), false) => {
                    f(s, y, x - s)?;
                    start = None;
                }
                _ => {}
            }
        }
    }
    Ok(())
}
