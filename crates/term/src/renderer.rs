//! TerminalRenderer: flushes framebuffers to the real terminal.
//!
//! Frames are diffed row by row against the previously drawn frame; only
//! changed runs are re-emitted. A size change forces a full redraw.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Last frame written to the terminal
    shown: FrameBuffer,
    /// Whether `shown` reflects the screen contents
    valid: bool,
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
            shown: FrameBuffer::new(0, 0),
            valid: false,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal; safe to call after a failed `enter`.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force the next draw to repaint everything (e.g. after a resize event).
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Draw `fb`, then swap it with the previously shown frame.
    ///
    /// After the call `fb` holds stale contents the caller overwrites on the
    /// next render, so no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let prev = (self.valid && same_size(&self.shown, fb)).then_some(&self.shown);
        encode_frame_into(prev, fb, &mut self.buf)?;
        self.flush_buf()?;

        std::mem::swap(&mut self.shown, fb);
        self.valid = true;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Encode `next` into terminal commands.
///
/// With `prev` only the changed runs are written; without it the screen is
/// cleared and repainted.
pub fn encode_frame_into(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen: Option<CellStyle> = None;

    if prev.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }
    for y in 0..next.height() {
        let row = next.row(y);
        let runs = match prev {
            Some(prev) => changed_runs(prev.row(y), row),
            None => vec![(0, row.len())],
        };
        for (start, end) in runs {
            out.queue(cursor::MoveTo(start as u16, y))?;
            for cell in &row[start..end] {
                write_cell(out, cell, &mut pen)?;
            }
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn write_cell(out: &mut Vec<u8>, cell: &Cell, pen: &mut Option<CellStyle>) -> Result<()> {
    if *pen != Some(cell.style) {
        let style = cell.style;
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(SetForegroundColor(to_color(style.fg)))?;
        out.queue(SetBackgroundColor(to_color(style.bg)))?;
        if style.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        *pen = Some(style);
    }
    out.queue(Print(cell.ch))?;
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Half-open `[start, end)` spans where two equally long rows differ
fn changed_runs(prev: &[Cell], next: &[Cell]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for (x, (a, b)) in prev.iter().zip(next).enumerate() {
        match (a == b, open) {
            (false, None) => open = Some(x),
            (true, Some(start)) => {
                runs.push((start, x));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push((start, next.len()));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let a = FrameBuffer::new(6, 1);
        let mut b = FrameBuffer::new(6, 1);
        for x in 1..=3 {
            b.put_char(x, 0, 'X', CellStyle::default());
        }
        b.put_char(5, 0, 'Y', CellStyle::default());
        assert_eq!(changed_runs(a.row(0), b.row(0)), vec![(1, 4), (5, 6)]);
        assert!(changed_runs(a.row(0), a.row(0)).is_empty());
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let mut a = FrameBuffer::new(4, 2);
        a.put_str(0, 0, "pipe", CellStyle::default());
        let b = a.clone();

        let mut out = Vec::new();
        encode_frame_into(Some(&a), &b, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(!text.contains("pipe"));

        out.clear();
        encode_frame_into(None, &b, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("pipe"));
    }
}
