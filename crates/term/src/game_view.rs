//! GameView: maps an [`EngineSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{base_shape, EngineSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::PieceKind;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Placement of the framed board inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub start_x: u16,
    pub start_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);

/// Board renderer.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn layout(&self, snap: &EngineSnapshot, viewport: Viewport) -> BoardLayout {
        let frame_w = snap.width.saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = snap.height.saturating_mul(self.cell_h).saturating_add(2);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        BoardLayout {
            start_x,
            start_y,
            frame_w,
            frame_h,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &EngineSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(snap, viewport);
        let BoardLayout {
            start_x,
            start_y,
            frame_w,
            frame_h,
        } = layout;

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for y in 0..snap.height as i32 {
            for x in 0..snap.width as i32 {
                match snap.cell(x, y).flatten() {
                    Some(kind) => self.draw_board_cell(fb, &layout, x, y, kind),
                    None => self.draw_empty_cell(fb, &layout, x, y),
                }
            }
        }

        if let (Some(active), Some(ghost_y)) = (snap.active, snap.ghost_y) {
            if ghost_y != active.y {
                let style = CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG).dim();
                for (dx, dy) in active.shape.cells() {
                    self.fill_cell_rect(fb, &layout, snap, active.x + dx, ghost_y + dy, '░', style);
                }
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                self.draw_board_cell_checked(fb, &layout, snap, x, y, active.kind);
            }
        }

        self.draw_side_panel(fb, snap, viewport, &layout);

        if snap.game_over {
            self.draw_overlay_text(fb, &layout, "GAME OVER");
            let hint_y = start_y.saturating_add(frame_h / 2).saturating_add(1);
            let hint = "r: restart  q: quit";
            let x = start_x.saturating_add(frame_w.saturating_sub(hint.len() as u16) / 2);
            fb.put_str(x, hint_y, hint, CellStyle::default().dim());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &EngineSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, layout: &BoardLayout, x: i32, y: i32) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        self.put_cell(fb, layout, x as u16, y as u16, '·', style);
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        x: i32,
        y: i32,
        kind: PieceKind,
    ) {
        let style = CellStyle::new(kind.color(), PLAY_BG).bold();
        self.put_cell(fb, layout, x as u16, y as u16, '█', style);
    }

    /// Draw a piece cell, skipping cells in the hidden spawn rows.
    fn draw_board_cell_checked(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        snap: &EngineSnapshot,
        x: i32,
        y: i32,
        kind: PieceKind,
    ) {
        if in_grid(snap, x, y) {
            self.draw_board_cell(fb, layout, x, y, kind);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        snap: &EngineSnapshot,
        x: i32,
        y: i32,
        ch: char,
        style: CellStyle,
    ) {
        if in_grid(snap, x, y) {
            self.put_cell(fb, layout, x as u16, y as u16, ch, style);
        }
    }

    fn put_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = layout.start_x + 1 + cell_x * self.cell_w;
        let py = layout.start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &EngineSnapshot,
        viewport: Viewport,
        layout: &BoardLayout,
    ) {
        let panel_x = layout
            .start_x
            .saturating_add(layout.frame_w)
            .saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u64(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_u64(panel_x, y, snap.lines, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        let shape = base_shape(snap.next);
        let style = CellStyle::new(snap.next.color(), Rgb::new(0, 0, 0)).bold();
        for (dx, dy) in shape.cells() {
            let px = panel_x.saturating_add(dx as u16 * self.cell_w);
            fb.fill_rect(px, y.saturating_add(dy as u16), self.cell_w, 1, '█', style);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &BoardLayout, text: &str) {
        let mid_y = layout.start_y.saturating_add(layout.frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = layout
            .start_x
            .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn in_grid(snap: &EngineSnapshot, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && x < snap.width as i32 && y < snap.height as i32
}
