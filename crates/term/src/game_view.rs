//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Grid row 0 is the bottom of the pipe, so it is drawn on the last screen
//! row of the frame; the home row (loss threshold) is drawn first, tinted.

use crate::core::BlockView;
use crate::engine::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GamePhase, LossReason, PollutantKind, PowerUpKind};

const PIPE_BG: Rgb = Rgb::new(18, 32, 48);
const HOME_BG: Rgb = Rgb::new(60, 20, 24);
const SELECT_BG: Rgb = Rgb::new(90, 90, 30);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Frontend state that is not part of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudState {
    /// (row, col) under the cursor
    pub cursor: Option<(i8, i8)>,
    pub inventory: Vec<(PowerUpKind, u32)>,
    pub coins: u32,
    /// Last error or notice, shown under the panel
    pub message: Option<String>,
}

/// Screen origin of the pipe frame, shared by the drawing helpers
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Lays out the pipe, the side panel and phase overlays.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 3 columns leave room for the cursor brackets around a glyph.
        Self { cell_w: 3 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        hud: &HudState,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let grid_w = snap.grid.width as u16 * self.cell_w;
        let grid_h = snap.grid.height as u16;
        let panel_w = 26;
        let frame = Frame {
            x: viewport.width.saturating_sub(grid_w + 2 + panel_w) / 2,
            y: viewport.height.saturating_sub(grid_h + 2) / 2,
            w: grid_w + 2,
            h: grid_h + 2,
        };

        fb.draw_box(frame.x, frame.y, frame.w, frame.h, CellStyle::default());
        for row in 0..snap.grid.height as i8 {
            let bg = if row == snap.grid.height as i8 - 1 {
                HOME_BG
            } else {
                PIPE_BG
            };
            let y = self.screen_y(frame, snap, row);
            fb.fill_rect(frame.x + 1, y, grid_w, 1, ' ', CellStyle::default().on(bg));
        }

        for block in &snap.grid.blocks {
            self.draw_block(fb, frame, snap, block);
        }
        if let Some((row, col)) = hud.cursor {
            self.draw_cursor(fb, frame, snap, row, col);
        }

        self.draw_panel(fb, frame, snap, hud, viewport);
        self.draw_overlay(fb, frame, snap);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, hud: &HudState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn screen_y(&self, frame: Frame, snap: &SessionSnapshot, row: i8) -> u16 {
        let flipped = (snap.grid.height as i16 - 1 - row as i16).max(0) as u16;
        frame.y + 1 + flipped
    }

    fn screen_x(&self, frame: Frame, col: i8) -> u16 {
        frame.x + 1 + col.max(0) as u16 * self.cell_w
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, snap: &SessionSnapshot, block: &BlockView) {
        let info = block.kind.info();
        let home = block.row == snap.grid.height as i8 - 1;
        let bg = match (block.selected, home) {
            (true, _) => SELECT_BG,
            (false, true) => HOME_BG,
            (false, false) => PIPE_BG,
        };
        let mut style = CellStyle::plain(Rgb::from_tuple(info.color), bg).bold();
        if block.falling {
            style = style.dim();
        }
        let x = self.screen_x(frame, block.col) + self.cell_w / 2;
        fb.put_char(x, self.screen_y(frame, snap, block.row), info.glyph, style);
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, frame: Frame, snap: &SessionSnapshot, row: i8, col: i8) {
        if self.cell_w < 3 {
            return;
        }
        let style = CellStyle::plain(Rgb::new(255, 255, 255), PIPE_BG).bold();
        let x = self.screen_x(frame, col);
        let y = self.screen_y(frame, snap, row);
        fb.put_char(x, y, '[', style);
        fb.put_char(x + self.cell_w - 1, y, ']', style);
    }

    fn draw_panel(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &SessionSnapshot,
        hud: &HudState,
        viewport: Viewport,
    ) {
        let x = frame.x + frame.w + 2;
        if x >= viewport.width {
            return;
        }
        let label = CellStyle::default().bold();
        let value = CellStyle::default();
        let mut y = frame.y;

        let mut line = |fb: &mut FrameBuffer, name: &str, text: String| {
            let after = fb.put_str(x, y, name, label);
            fb.put_str(after + 1, y, &text, value);
            y += 1;
        };

        line(fb, "LEVEL", snap.level.to_string());
        line(fb, "SCORE", snap.score.to_string());
        line(fb, "TIME ", format!("{}:{:02}", snap.time_left / 60, snap.time_left % 60));
        line(fb, "COMBO", format!("x{}", snap.combo));
        line(fb, "REVIVE", format!("{}/{}", snap.revives_left(), snap.max_revive));
        let flush = match snap.flush_cooldown {
            0 => "ready".to_string(),
            secs => format!("{secs}s"),
        };
        line(fb, "FLUSH", flush);
        line(fb, "WATER", snap.water_quality.as_str().to_string());
        line(fb, "COINS", hud.coins.to_string());

        y += 1;
        for (i, (kind, count)) in hud.inventory.iter().enumerate() {
            let text = format!("{} {:<9} x{}", i + 1, kind.label(), count);
            fb.put_str(x, y, &text, value);
            y += 1;
        }

        y += 1;
        for kind in PollutantKind::ALL {
            let info = kind.info();
            fb.put_char(x, y, info.glyph, CellStyle::plain(Rgb::from_tuple(info.color), BLACK).bold());
            fb.put_str(x + 2, y, info.filter, CellStyle::default().dim());
            y += 1;
        }

        if let Some(msg) = &hud.message {
            fb.put_str(x, y + 1, msg, CellStyle::plain(Rgb::new(250, 200, 90), BLACK));
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, snap: &SessionSnapshot) {
        let title = CellStyle::plain(Rgb::new(255, 255, 255), BLACK).bold();
        let hint = CellStyle::default();
        let mid = frame.y + frame.h / 2;

        match snap.phase {
            GamePhase::Paused => fb.put_str_centered(frame.x, frame.w, mid, "PAUSED", title),
            GamePhase::GameOver => {
                fb.put_str_centered(frame.x, frame.w, mid - 1, "GAME OVER", title);
                let reason = match snap.loss_reason {
                    Some(LossReason::Timeout) => "out of time",
                    Some(LossReason::Pollution) => "pipe polluted",
                    None => "",
                };
                fb.put_str_centered(frame.x, frame.w, mid, reason, hint);
                let next = if snap.revives_left() > 0 {
                    format!("v revive ({}) x end", snap.revives_left())
                } else {
                    "r retry".to_string()
                };
                fb.put_str_centered(frame.x, frame.w, mid + 1, &next, hint);
            }
            GamePhase::Completed => {
                fb.put_str_centered(frame.x, frame.w, mid, "LEVEL CLEAR", title);
                fb.put_str_centered(frame.x, frame.w, mid + 1, "n next level", hint);
            }
            GamePhase::Menu | GamePhase::Playing => {}
        }
    }
}
