//! TerminalRenderer: flushes battle frames to a real terminal.
//!
//! A frame is written in full after `enter`, `invalidate`, a resize, or a
//! battle phase change (overlays cover most of the board, so patching them
//! in cell by cell costs more than a repaint). Every other frame only writes
//! the runs of cells that changed since the one before.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::BattlePhase;

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen; `None` forces a full repaint
    shown: Option<FrameBuffer>,
    shown_phase: Option<BattlePhase>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            shown_phase: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen and mouse capture (for enemy selection)
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(event::EnableMouseCapture)?;
        self.flush_buf()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(event::DisableMouseCapture)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next `present` (terminal resize)
    pub fn invalidate(&mut self) {
        self.shown = None;
        self.shown_phase = None;
    }

    /// Bytes written by the last `present`
    pub fn last_frame_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Put `frame` on screen for a battle in `phase`.
    ///
    /// The renderer keeps the frame and hands back the previously shown one
    /// in `frame`, so the caller renders into the old buffer next time and
    /// nothing is cloned.
    pub fn present(&mut self, frame: &mut FrameBuffer, phase: BattlePhase) -> Result<()> {
        let full = needs_full_repaint(self.shown.as_ref(), self.shown_phase, frame, phase);

        self.buf.clear();
        match self.shown.as_ref() {
            Some(shown) if !full => encode_diff_into(shown, frame, &mut self.buf)?,
            _ => encode_full_into(frame, &mut self.buf)?,
        }
        self.flush_buf()?;

        let mut previous = self
            .shown
            .take()
            .unwrap_or_else(|| FrameBuffer::new(frame.width(), frame.height()));
        std::mem::swap(&mut previous, frame);
        self.shown = Some(previous);
        self.shown_phase = Some(phase);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn needs_full_repaint(
    shown: Option<&FrameBuffer>,
    shown_phase: Option<BattlePhase>,
    next: &FrameBuffer,
    phase: BattlePhase,
) -> bool {
    match shown {
        None => true,
        Some(shown) => {
            shown.width() != next.width()
                || shown.height() != next.height()
                || shown_phase != Some(phase)
        }
    }
}

/// Encode a full repaint of `fb` into `out`
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        write_run(out, &mut pen, fb, 0, y, fb.width())?;
    }
    pen.finish(out)
}

/// Encode only the cells of `next` that differ from `prev` into `out`.
///
/// Frames of different sizes are written row by row in full.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for run in ChangedRuns::new(prev, next) {
        write_run(out, &mut pen, next, run.x, run.y, run.len)?;
    }
    pen.finish(out)
}

fn write_run(
    out: &mut Vec<u8>,
    pen: &mut Pen,
    fb: &FrameBuffer,
    x: u16,
    y: u16,
    len: u16,
) -> Result<()> {
    out.queue(cursor::MoveTo(x, y))?;
    for dx in 0..len {
        let cell = fb.get(x + dx, y).unwrap_or_default();
        pen.set(out, cell.style)?;
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

/// Tracks the terminal's current style so only changed parts are re-sent
#[derive(Default)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: bool,
    dim: bool,
}

impl Pen {
    fn set(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        // Resetting attributes also drops colors on most terminals.
        if (self.bold && !style.bold) || (self.dim && !style.dim) {
            out.queue(SetAttribute(Attribute::Reset))?;
            *self = Pen::default();
        }
        if self.fg != Some(style.fg) {
            out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
            self.fg = Some(style.fg);
        }
        if self.bg != Some(style.bg) {
            out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
            self.bg = Some(style.bg);
        }
        if style.bold && !self.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
            self.bold = true;
        }
        if style.dim && !self.dim {
            out.queue(SetAttribute(Attribute::Dim))?;
            self.dim = true;
        }
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    x: u16,
    y: u16,
    len: u16,
}

/// Horizontal runs of cells that differ between two frames, row-major
struct ChangedRuns<'a> {
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    whole_rows: bool,
    x: u16,
    y: u16,
}

impl<'a> ChangedRuns<'a> {
    fn new(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> Self {
        Self {
            prev,
            next,
            whole_rows: prev.width() != next.width() || prev.height() != next.height(),
            x: 0,
            y: 0,
        }
    }

    fn differs(&self, x: u16, y: u16) -> bool {
        self.prev.get(x, y) != self.next.get(x, y)
    }
}

impl Iterator for ChangedRuns<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let (w, h) = (self.next.width(), self.next.height());
        if self.whole_rows {
            if self.y >= h {
                return None;
            }
            self.y += 1;
            return Some(Run {
                x: 0,
                y: self.y - 1,
                len: w,
            });
        }

        while self.y < h {
            while self.x < w && !self.differs(self.x, self.y) {
                self.x += 1;
            }
            if self.x < w {
                let start = self.x;
                while self.x < w && self.differs(self.x, self.y) {
                    self.x += 1;
                }
                return Some(Run {
                    x: start,
                    y: self.y,
                    len: self.x - start,
                });
            }
            self.x = 0;
            self.y += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::{Cell, CellStyle};

    fn text_of(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn runs(a: &FrameBuffer, b: &FrameBuffer) -> Vec<(u16, u16, u16)> {
        ChangedRuns::new(a, b).map(|r| (r.x, r.y, r.len)).collect()
    }

    #[test]
    fn test_full_redraw_prints_every_cell() {
        let mut fb = FrameBuffer::new(3, 2);
        let style = CellStyle::default();
        fb.put_str(0, 0, "HP", style);
        fb.put_str(0, 1, "▶Or", style);

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = text_of(&out);
        assert!(text.contains("HP"));
        assert!(text.contains("▶Or"));
    }

    #[test]
    fn test_diff_skips_unchanged_cells() {
        let style = CellStyle::default();
        let mut a = FrameBuffer::new(8, 1);
        a.put_str(0, 0, "SCORE 40", style);
        let mut b = a.clone();
        b.put_str(6, 0, "90", style);

        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        let text = text_of(&out);
        assert!(text.contains('9'));
        assert!(!text.contains("SCORE"));
        assert_eq!(runs(&a, &b), vec![(6, 0, 1)]);
        assert!(runs(&b, &b).is_empty());
    }

    #[test]
    fn test_changed_runs_split_per_row() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(5, 2);
        let mut b = FrameBuffer::new(5, 2);

        // A falling pair over its ghost, two cells wide each.
        for x in 1..=2 {
            b.set(x, 0, Cell { ch: '█', style });
            b.set(x, 1, Cell { ch: '░', style });
        }
        b.set(4, 1, Cell { ch: '♥', style });
        assert_eq!(runs(&a, &b), vec![(1, 0, 2), (1, 1, 2), (4, 1, 1)]);
    }

    #[test]
    fn test_resized_frame_is_whole_rows() {
        let a = FrameBuffer::new(4, 1);
        let b = FrameBuffer::new(6, 2);
        assert_eq!(runs(&a, &b), vec![(0, 0, 6), (0, 1, 6)]);
    }

    #[test]
    fn test_pen_sends_a_color_once_per_change() {
        let red = CellStyle::new(Rgb::new(255, 0, 0), Rgb::new(0, 0, 0));
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(0, 0, "RRRR", red);

        let mut same = Vec::new();
        encode_full_into(&fb, &mut same).unwrap();

        fb.put_str(0, 0, "RR", red.bold());
        let mut mixed = Vec::new();
        encode_full_into(&fb, &mut mixed).unwrap();

        // Bold on then off adds attribute writes and re-sends the colors.
        assert!(mixed.len() > same.len());
        assert_eq!(text_of(&same).matches("38;2;255;0;0").count(), 1);
        assert_eq!(text_of(&mixed).matches("38;2;255;0;0").count(), 2);
    }

    #[test]
    fn test_phase_change_forces_full_repaint() {
        let shown = FrameBuffer::new(10, 4);
        let next = shown.clone();
        assert!(needs_full_repaint(None, None, &next, BattlePhase::Active));
        assert!(!needs_full_repaint(
            Some(&shown),
            Some(BattlePhase::Active),
            &next,
            BattlePhase::Active
        ));
        assert!(needs_full_repaint(
            Some(&shown),
            Some(BattlePhase::Countdown),
            &next,
            BattlePhase::Active
        ));
        assert!(needs_full_repaint(
            Some(&shown),
            Some(BattlePhase::Active),
            &FrameBuffer::new(12, 4),
            BattlePhase::Active
        ));
    }
}
