//! BattleView: maps a `core::BattleSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, relative to the arena origin:
//!
//! ```text
//! ┌ enemy slot 0 ┐┌ enemy slot 1 ┐┌ enemy slot 2 ┐   rows 0..5
//!
//! ┌────────────┐  HP / statuses / potions
//! │   board    │  NEXT
//! │   6 x 12   │  SCORE / CHAIN
//! └────────────┘
//! ```

use crate::core::effects::NumberAnchor;
use crate::core::enemy::ActionKind;
use crate::core::pair::LiveCell;
use crate::core::snapshot::{BattleSnapshot, EnemySnapshot, StatusSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{
    BattlePhase, CellColor, DamageTint, PotionKind, SpecialKind, StatusKind, ENEMY_SLOT_H,
    ENEMY_SLOT_W, GRID_HEIGHT, GRID_WIDTH, MAX_ENEMIES,
};

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

const BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(120, 120, 130);
const HP_GREEN: Rgb = Rgb::new(90, 200, 100);
const HP_RED: Rgb = Rgb::new(220, 70, 70);
const FLASH: Rgb = Rgb::new(255, 60, 60);

/// Rows between the arena and the board
const ARENA_GAP: u16 = 1;

/// Terminal renderer for a battle.
pub struct BattleView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for BattleView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl BattleView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn board_frame(&self) -> (u16, u16) {
        (
            GRID_WIDTH as u16 * self.cell_w + 2,
            GRID_HEIGHT as u16 * self.cell_h + 2,
        )
    }

    /// Total footprint of arena, board and panel
    pub fn layout_size(&self) -> (u16, u16) {
        let (frame_w, frame_h) = self.board_frame();
        let arena_w = ENEMY_SLOT_W * MAX_ENEMIES as u16;
        let w = arena_w.max(frame_w + 2 + 24);
        (w, ENEMY_SLOT_H + ARENA_GAP + frame_h)
    }

    /// Top-left of the enemy arena, the origin of `SelectEnemyAt` coordinates
    pub fn arena_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (w, h) = self.layout_size();
        (
            viewport.width.saturating_sub(w) / 2,
            viewport.height.saturating_sub(h) / 2,
        )
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, snap: &BattleSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(TEXT, BG).into_cell(' '));

        let (ox, oy) = self.arena_origin(viewport);
        for (i, enemy) in snap.enemies.iter().enumerate().take(MAX_ENEMIES) {
            self.draw_enemy(fb, ox + i as u16 * ENEMY_SLOT_W, oy, enemy);
        }

        let board_x = ox;
        let board_y = oy + ENEMY_SLOT_H + ARENA_GAP;
        self.draw_board(fb, snap, board_x, board_y);

        let (frame_w, frame_h) = self.board_frame();
        let panel_x = board_x + frame_w + 2;
        self.draw_panel(fb, snap, panel_x, board_y);

        self.draw_numbers(fb, snap, ox, oy, panel_x, board_y);

        match snap.phase {
            BattlePhase::Countdown => {
                let secs = snap.countdown.ceil().max(1.0) as u32;
                let text = match secs {
                    1 => "1",
                    2 => "2",
                    _ => "3",
                };
                self.draw_overlay_text(fb, board_x, board_y, frame_w, frame_h, text);
            }
            BattlePhase::Victory => {
                self.draw_overlay_text(fb, board_x, board_y, frame_w, frame_h, "VICTORY")
            }
            BattlePhase::Defeat => {
                self.draw_overlay_text(fb, board_x, board_y, frame_w, frame_h, "DEFEAT")
            }
            BattlePhase::Active => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &BattleSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_enemy(&self, fb: &mut FrameBuffer, x: u16, y: u16, enemy: &EnemySnapshot) {
        let inner = ENEMY_SLOT_W.saturating_sub(2);
        let name_style = if !enemy.alive {
            CellStyle::new(MUTED, BG).dim()
        } else if enemy.flash > 0.0 {
            CellStyle::new(FLASH, BG).bold()
        } else {
            CellStyle::new(TEXT, BG).bold()
        };

        let marker = if enemy.selected && enemy.alive { '▶' } else { ' ' };
        fb.put_char(x, y, marker, CellStyle::new(Rgb::new(255, 220, 80), BG).bold());
        let end = fb.put_str(x + 1, y, enemy.name, name_style);
        if !enemy.alive {
            fb.put_str(end + 1, y, "✝", CellStyle::new(MUTED, BG));
            return;
        }

        let frac = enemy.hp as f32 / enemy.max_hp.max(1) as f32;
        fb.put_bar(
            x + 1,
            y + 1,
            inner,
            frac,
            CellStyle::new(HP_RED, BG),
            CellStyle::new(MUTED, BG).dim(),
        );
        let value = CellStyle::new(TEXT, BG);
        let end = fb.put_u32(x + 1, y + 2, enemy.hp, value);
        let end = fb.put_str(end, y + 2, "/", value);
        fb.put_u32(end, y + 2, enemy.max_hp, value);

        let intent_style = CellStyle::new(intent_color(enemy.intent), BG);
        let end = fb.put_str(x + 1, y + 3, enemy.intent_name, intent_style);
        if let Some(d) = enemy.intent.damage() {
            if end < x + ENEMY_SLOT_W - 3 {
                fb.put_u32(end + 1, y + 3, d, intent_style.bold());
            }
        }

        fb.put_bar(
            x + 1,
            y + 4,
            inner / 2,
            enemy.timer_progress,
            CellStyle::new(Rgb::new(240, 170, 60), BG),
            CellStyle::new(MUTED, BG).dim(),
        );
        let mut sx = x + 1 + inner / 2 + 1;
        if enemy.guarding {
            fb.put_char(sx, y + 4, 'G', CellStyle::new(Rgb::new(120, 160, 255), BG).bold());
            sx += 1;
        }
        if enemy.stunned {
            fb.put_char(sx, y + 4, 'Z', CellStyle::new(Rgb::new(160, 220, 255), BG).bold());
            sx += 1;
        }
        for status in enemy.statuses.iter().filter(|s| s.kind != StatusKind::Stun) {
            if sx >= x + ENEMY_SLOT_W {
                break;
            }
            let (ch, fg) = status_glyph(status.kind);
            fb.put_char(sx, y + 4, ch, CellStyle::new(fg, BG));
            sx += 1;
        }
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &BattleSnapshot, x: u16, y: u16) {
        let (frame_w, frame_h) = self.board_frame();
        let border_fg = if snap.player.flash > 0.0 {
            FLASH
        } else {
            Rgb::new(200, 200, 200)
        };
        self.draw_border(fb, x, y, frame_w, frame_h, CellStyle::new(border_fg, BG));

        for gy in 0..GRID_HEIGHT as u16 {
            for gx in 0..GRID_WIDTH as u16 {
                let color = snap.grid[gy as usize][gx as usize];
                if color.is_empty() {
                    let dot = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
                    self.fill_cell_rect(fb, x, y, gx, gy, '·', dot);
                } else {
                    self.draw_block(fb, x, y, gx, gy, color, None);
                }
            }
        }
        for &(pos, kind) in snap.specials.iter() {
            let color = snap
                .grid
                .get(pos.y as usize)
                .and_then(|row| row.get(pos.x as usize))
                .copied()
                .unwrap_or(CellColor::Empty);
            if !color.is_empty() {
                self.draw_block(fb, x, y, pos.x as u16, pos.y as u16, color, Some(kind));
            }
        }

        let ghost = CellStyle::new(Rgb::new(140, 140, 140), BOARD_BG).dim();
        for cell in snap.ghost.iter().filter(|c| in_grid(c)) {
            self.fill_cell_rect(fb, x, y, cell.pos.x as u16, cell.pos.y as u16, '░', ghost);
        }
        for cell in snap.pair.iter().filter(|c| in_grid(c)) {
            self.draw_block(
                fb,
                x,
                y,
                cell.pos.x as u16,
                cell.pos.y as u16,
                cell.color,
                cell.special,
            );
        }

        for p in snap.particles.iter() {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (gx, gy) = (p.x.round() as u16, p.y.round() as u16);
            if gx >= GRID_WIDTH as u16 || gy >= GRID_HEIGHT as u16 {
                continue;
            }
            let fade = 1.0 - p.life / p.max_life.max(f32::EPSILON);
            let fg = color_rgb(p.color).mix(BOARD_BG, fade);
            fb.put_char(
                x + 1 + gx * self.cell_w,
                y + 1 + gy * self.cell_h,
                '*',
                CellStyle::new(fg, BOARD_BG),
            );
        }
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, snap: &BattleSnapshot, x: u16, y: u16) {
        if x >= fb.width() {
            return;
        }
        let label = CellStyle::new(TEXT, BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BG);
        let player = &snap.player;

        let mut cy = y;
        fb.put_str(x, cy, "HP", label);
        let end = fb.put_u32(x + 3, cy, player.hp, value);
        let end = fb.put_str(end, cy, "/", value);
        fb.put_u32(end, cy, player.max_hp, value);
        cy += 1;
        let frac = player.hp as f32 / player.max_hp.max(1) as f32;
        fb.put_bar(
            x,
            cy,
            16,
            frac,
            CellStyle::new(HP_GREEN, BG),
            CellStyle::new(MUTED, BG).dim(),
        );
        cy += 1;
        if player.shield > 0.0 {
            let shield = CellStyle::new(Rgb::new(120, 160, 255), BG);
            let end = fb.put_str(x, cy, "SHIELD ", shield);
            fb.put_u32(end, cy, player.shield.ceil() as u32, shield);
        }
        cy += 1;
        cy = self.draw_statuses(fb, &player.statuses, x, cy);

        cy += 1;
        fb.put_str(x, cy, "NEXT", label);
        cy += 1;
        for spec in snap.next_queue.iter() {
            let end = fb.put_str(x, cy, "██", CellStyle::new(color_rgb(spec.sub), BG));
            fb.put_str(end, cy, " ", value);
            let end = fb.put_str(x, cy + 1, "██", CellStyle::new(color_rgb(spec.main), BG));
            fb.put_str(end, cy + 1, " ", value);
            cy += 2;
        }

        cy += 1;
        fb.put_str(x, cy, "SCORE", label);
        let score = snap.score.min(u32::MAX as u64) as u32;
        fb.put_u32(x + 6, cy, score, value);
        cy += 1;
        fb.put_str(x, cy, "CHAIN", label);
        let end = fb.put_u32(x + 6, cy, player.chain_count, value);
        let end = fb.put_str(end + 1, cy, "best ", value.dim());
        fb.put_u32(end, cy, snap.best_chain, value.dim());
        cy += 2;

        for (i, potion) in player.potions.iter().enumerate() {
            let end = fb.put_u32(x, cy, i as u32 + 1, label);
            fb.put_str(end + 1, cy, potion_name(potion.kind), value);
            cy += 1;
        }
    }

    fn draw_statuses(
        &self,
        fb: &mut FrameBuffer,
        statuses: &[StatusSnapshot],
        x: u16,
        y: u16,
    ) -> u16 {
        let mut cy = y;
        for status in statuses.iter().filter(|s| !s.kind.is_shield()) {
            let (_, fg) = status_glyph(status.kind);
            let style = CellStyle::new(fg, BG);
            let end = fb.put_str(x, cy, status.kind.as_str(), style);
            fb.put_u32(end + 1, cy, status.remaining.ceil() as u32, style.dim());
            cy += 1;
        }
        cy
    }

    fn draw_numbers(
        &self,
        fb: &mut FrameBuffer,
        snap: &BattleSnapshot,
        ox: u16,
        oy: u16,
        panel_x: u16,
        panel_y: u16,
    ) {
        for n in snap.numbers.iter() {
            let (x, base_y) = match n.anchor {
                NumberAnchor::Enemy(i) => (ox + i as u16 * ENEMY_SLOT_W + ENEMY_SLOT_W - 4, oy + 2),
                NumberAnchor::Player => (panel_x + 10, panel_y + 1),
            };
            let rise = n.rise().round().max(0.0) as u16;
            let y = base_y.saturating_sub(rise);
            let style = CellStyle::new(tint_rgb(n.tint), BG).bold();
            let sign = if n.tint == DamageTint::Heal { "+" } else { "-" };
            let end = fb.put_str(x, y, sign, style);
            fb.put_u32(end, y, n.value, style);
        }
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

    #[allow(clippy::too_many_arguments)]
    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        color: CellColor,
        special: Option<SpecialKind>,
    ) {
        let rgb = color_rgb(color);
        match special {
            None => {
                let style = CellStyle::new(rgb, BOARD_BG).bold();
                self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
            }
            Some(kind) => {
                let style = CellStyle::new(Rgb::new(0, 0, 0), rgb).bold();
                self.fill_cell_rect(fb, start_x, start_y, x, y, special_glyph(kind), style);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn in_grid(cell: &LiveCell) -> bool {
    cell.pos.x >= 0
        && cell.pos.x < GRID_WIDTH as i8
        && cell.pos.y >= 0
        && cell.pos.y < GRID_HEIGHT as i8
}

pub fn color_rgb(color: CellColor) -> Rgb {
    match color {
        CellColor::Empty => BOARD_BG,
        CellColor::Red => Rgb::new(220, 80, 80),
        CellColor::Blue => Rgb::new(80, 120, 220),
        CellColor::Green => Rgb::new(100, 220, 120),
        CellColor::Yellow => Rgb::new(240, 220, 80),
        CellColor::Purple => Rgb::new(200, 120, 220),
        CellColor::Orange => Rgb::new(255, 165, 0),
        CellColor::Cyan => Rgb::new(80, 220, 220),
        CellColor::Garbage => Rgb::new(110, 110, 110),
    }
}

pub fn tint_rgb(tint: DamageTint) -> Rgb {
    match tint {
        DamageTint::Outgoing => Rgb::new(255, 220, 80),
        DamageTint::Incoming => Rgb::new(255, 70, 70),
        DamageTint::Reflected => Rgb::new(255, 150, 40),
        DamageTint::Heal => Rgb::new(90, 220, 110),
    }
}

fn special_glyph(kind: SpecialKind) -> char {
    match kind {
        SpecialKind::Heal => '+',
        SpecialKind::Bomb => '*',
        SpecialKind::Lightning => '!',
        SpecialKind::Shield => '#',
        SpecialKind::Multiplier => 'x',
        SpecialKind::Poison => '~',
    }
}

fn status_glyph(kind: StatusKind) -> (char, Rgb) {
    match kind {
        StatusKind::AttackBuff => ('A', Rgb::new(255, 170, 60)),
        StatusKind::AttackDebuff => ('a', Rgb::new(170, 120, 80)),
        StatusKind::DefenseBuff => ('D', Rgb::new(120, 160, 255)),
        StatusKind::ShieldFlat | StatusKind::AbsorbShield => ('S', Rgb::new(120, 160, 255)),
        StatusKind::Reflect => ('R', Rgb::new(255, 150, 40)),
        StatusKind::Curse => ('C', Rgb::new(180, 80, 200)),
        StatusKind::Poison => ('P', Rgb::new(120, 220, 80)),
        StatusKind::Stun => ('Z', Rgb::new(160, 220, 255)),
    }
}

fn intent_color(kind: ActionKind) -> Rgb {
    match kind {
        ActionKind::Attack(_) => Rgb::new(255, 120, 120),
        ActionKind::Special(_) => Rgb::new(255, 80, 200),
        ActionKind::Guard => Rgb::new(120, 160, 255),
        ActionKind::Heal(_) => HP_GREEN,
        ActionKind::BuffSelf { .. } => Rgb::new(255, 170, 60),
        ActionKind::DebuffPlayer { .. } => Rgb::new(180, 80, 200),
    }
}

fn potion_name(kind: PotionKind) -> &'static str {
    match kind {
        PotionKind::Health => "Health",
        PotionKind::Strength => "Strength",
        PotionKind::Defense => "Defense",
        PotionKind::FreezeTime => "Freeze",
        PotionKind::Venom => "Venom",
        PotionKind::Explosive => "Explosive",
    }
}
