//! Screen-space overlays: weapon, crosshair, counters and the top-down map.
use glam::Vec2;

use crate::game::maze::{Grid, Tile};
use crate::render::casters::RayHit;
use crate::render::color::Color;
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::TextureManager;

/// 3x5 glyphs for 0-9, one row per 3 bits, top row first.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const HEALTH_COLOR: Color = Color::new(220, 40, 40, 255);
const AMMO_COLOR: Color = Color::new(230, 200, 60, 255);

fn glyph_scale(fb: &Framebuffer) -> u32 {
    (fb.height / 90).max(1)
}

/// Draws `value` in blocky digits with its top-left corner at (x, y).
/// Returns the x just past the last glyph.
pub fn draw_number(fb: &mut Framebuffer, x: u32, y: u32, value: u32, scale: u32, color: Color) -> u32 {
    let text = value.to_string();
    let mut cx = x;
    for ch in text.bytes() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3u32 {
                if bits & (0b100 >> col) != 0 {
                    fb.fill_rect(cx + col * scale, y + row as u32 * scale, scale, scale, color);
                }
            }
        }
        cx += 4 * scale;
    }
    cx
}

pub fn draw_health(fb: &mut Framebuffer, health: i32) {
    let s = glyph_scale(fb);
    let y = fb.height.saturating_sub(7 * s);
    draw_number(fb, 2 * s, y, health.max(0) as u32, s, HEALTH_COLOR);
}

pub fn draw_ammo(fb: &mut Framebuffer, ammo: u32) {
    let s = glyph_scale(fb);
    let digits = ammo.to_string().len() as u32;
    let x = fb.width.saturating_sub(digits * 4 * s + 2 * s);
    let y = fb.height.saturating_sub(7 * s);
    draw_number(fb, x, y, ammo, s, AMMO_COLOR);
}

pub fn draw_crosshair(fb: &mut Framebuffer) {
    let cx = fb.width / 2;
    let cy = fb.height / 2;
    let arm = glyph_scale(fb) * 3;
    fb.fill_rect(cx.saturating_sub(arm), cy, arm * 2 + 1, 1, Color::WHITE);
    fb.fill_rect(cx, cy.saturating_sub(arm), 1, arm * 2 + 1, Color::WHITE);
}

/// Weapon sprite, bottom centre, about half the screen tall.
pub fn draw_weapon(fb: &mut Framebuffer, texman: &TextureManager, frame: usize) {
    let pix = texman.weapon_frame(frame);
    let h = fb.height / 2;
    let w = h * pix.width() / pix.height().max(1);
    let x0 = (fb.width / 2).saturating_sub(w / 2);
    let y0 = fb.height - h;
    for y in 0..h {
        let v = y as f32 / h as f32;
        for x in 0..w {
            let c = pix.sample_uv(x as f32 / w as f32, v);
            if c.a < 8 { continue; }
            fb.set_pixel_color(x0 + x, y0 + y, c);
        }
    }
}

fn draw_cell(fb: &mut Framebuffer, xo: u32, yo: u32, block: u32, color: Color) {
    fb.fill_rect(xo, yo, block, block, color);
}

/// Top-down view in the corner: walls, the player and the cast rays.
pub fn draw_minimap(fb: &mut Framebuffer, grid: &Grid, pos: Vec2, hits: &[RayHit], block: u32) {
    let wall = Color::new(150, 40, 40, 255);
    let floor = Color::new(20, 20, 20, 255);
    for j in 0..grid.height() {
        for i in 0..grid.width() {
            let color = match grid.tile((i as i32, j as i32)) {
                Some(Tile::Wall(_)) => wall,
                _ => floor,
            };
            draw_cell(fb, i as u32 * block, j as u32 * block, block, color);
        }
    }
    let b = block as f32;
    for hit in hits.iter().step_by(8) {
        let dir = Vec2::from_angle(hit.angle);
        let steps = (hit.raw_distance * b) as u32;
        for s in 0..steps {
            let p = (pos + dir * (s as f32 / b)) * b;
            fb.set_pixel_color(p.x as u32, p.y as u32, Color::new(240, 240, 240, 255));
        }
    }
    let p = pos * b;
    let r = (block / 3).max(1);
    fb.fill_rect((p.x as u32).saturating_sub(r), (p.y as u32).saturating_sub(r), r * 2, r * 2, Color::YELLOW);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_advance_per_digit() {
        let mut fb = Framebuffer::new(40, 10);
        let end = draw_number(&mut fb, 0, 0, 105, 1, Color::WHITE);
        assert_eq!(end, 12);
        // '1' has its stem in the middle column
        assert_eq!(fb.get_pixel(1, 0), Color::WHITE);
        assert_eq!(fb.get_pixel(0, 0), Color::BLACK);
        // '0' is hollow
        assert_eq!(fb.get_pixel(5, 2), Color::BLACK);
        assert_eq!(fb.get_pixel(4, 2), Color::WHITE);
    }

    #[test]
    fn minimap_marks_walls_and_player() {
        let g = Grid::parse("111\n1.1\n111").unwrap();
        let mut fb = Framebuffer::new(30, 30);
        draw_minimap(&mut fb, &g, Vec2::new(1.5, 1.5), &[], 6);
        assert_ne!(fb.get_pixel(1, 1), Color::BLACK);
        assert_eq!(fb.get_pixel(9, 9), Color::YELLOW);
    }
}
