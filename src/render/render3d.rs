//! Column renderer: sky and floor, textured wall strips, depth buffer, then
//! sprites, weapon and HUD on top.
use crate::game::session::{Session, Status};
use crate::render::casters::{cast_view, HitSide, RayHit};
use crate::render::color::Color;
use crate::render::depth_buffer::DepthBuffer;
use crate::render::framebuffer::Framebuffer;
use crate::render::hud;
use crate::render::sprites::draw_sprites_sorted;
use crate::render::textures::TextureManager;
use crate::settings::MIN_BRIGHTNESS;

const FLOOR_NEAR: Color = Color::new(56, 58, 62, 255);
const FLOOR_FAR: Color = Color::new(26, 28, 30, 255);
/// Extra darkening for east-west faces.
const HORIZONTAL_SHADE: f32 = 0.75;
/// Sky texture repeats this many times around a full turn.
const SKY_REPEAT: f32 = 4.0;

/// Camera parameters shared by the wall and sprite passes.
#[derive(Copy, Clone, Debug)]
pub struct View {
    pub width: u32,
    pub height: u32,
    pub fov: f32,
    pub max_depth: f32,
}

impl View {
    pub fn of(fb: &Framebuffer, fov: f32, max_depth: f32) -> Self {
        Self { width: fb.width, height: fb.height, fov, max_depth }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width as f32 * 0.5
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height as f32 * 0.5
    }

    /// Eye to projection plane, in pixels.
    #[inline]
    pub fn screen_dist(&self) -> f32 {
        self.half_width() / (self.fov * 0.5).tan()
    }

    /// Distance shading with a brightness floor.
    #[inline]
    pub fn shade(&self, depth: f32) -> f32 {
        (1.0 - depth / self.max_depth).max(MIN_BRIGHTNESS)
    }
}

fn paint_sky_and_floor(fb: &mut Framebuffer, texman: &TextureManager, angle: f32) {
    let w = fb.width;
    let h = fb.height;
    let hh = h / 2;
    let sky = texman.sky();
    let (tw, th) = (sky.width(), sky.height());
    let offset = (angle / std::f32::consts::TAU * SKY_REPEAT * tw as f32) as u32;
    for y in 0..hh {
        let ty = (y * th) / hh.max(1);
        for x in 0..w {
            let tx = (x * tw) / w + offset;
            fb.set_pixel_color(x, y, sky.sample(tx, ty.min(th - 1)));
        }
    }
    for y in hh..h {
        let t = (y - hh) as f32 / (h - hh).max(1) as f32;
        let col = FLOOR_FAR.lerp(FLOOR_NEAR, t);
        fb.fill_rect(0, y, w, 1, col);
    }
}

/// Draws one textured strip per ray and records its depth.
pub fn draw_walls(
    fb: &mut Framebuffer,
    view: &View,
    hits: &[RayHit],
    depth: &mut DepthBuffer,
    texman: &TextureManager,
) {
    let h = fb.height as f32;
    let hh = view.half_height();
    let screen_dist = view.screen_dist();

    for (col, hit) in hits.iter().enumerate().take(fb.width as usize) {
        let Some(tex_id) = hit.texture else {
            depth.set(col, view.max_depth);
            continue;
        };
        depth.set(col, hit.distance);

        let proj_h = screen_dist / hit.distance.max(1e-4);
        let top = hh - proj_h * 0.5;
        let y0 = top.max(0.0) as u32;
        let y1 = (hh + proj_h * 0.5).min(h) as u32;

        let mut shade = view.shade(hit.distance);
        if hit.side == HitSide::Horizontal {
            shade = (shade * HORIZONTAL_SHADE).max(MIN_BRIGHTNESS);
        }
        let tex = texman.wall(tex_id);
        let x = col as u32;
        for y in y0..y1 {
            let v = (y as f32 - top) / proj_h;
            let c = tex.sample_uv(hit.texture_u, v).scale(shade);
            fb.set_pixel_color(x, y, c);
        }
    }
}

/// Renders a full frame for the session into `fb`. `depth` is resized to the
/// frame width when they differ.
pub fn render_frame(
    fb: &mut Framebuffer,
    depth: &mut DepthBuffer,
    session: &Session,
    texman: &TextureManager,
    show_map: bool,
) {
    let settings = &session.settings;
    let player = &session.player;
    let view = View::of(fb, settings.fov, settings.max_depth);
    if depth.len() != fb.width as usize {
        depth.resize(fb.width as usize, view.max_depth);
    }
    depth.reset(view.max_depth);
    paint_sky_and_floor(fb, texman, player.a);

    let hits = cast_view(&session.grid, player.pos, player.a, view.fov, fb.width as usize, view.max_depth);
    draw_walls(fb, &view, &hits, depth, texman);

    let billboards = session.objects.billboards();
    draw_sprites_sorted(fb, &view, texman, depth, player.pos, player.a, &billboards);

    hud::draw_weapon(fb, texman, session.weapon.frame());
    hud::draw_crosshair(fb);
    hud::draw_health(fb, player.health.max(0));
    hud::draw_ammo(fb, player.ammo);
    if show_map {
        let block = (fb.height / 4 / session.grid.height().max(1) as u32).max(2);
        hud::draw_minimap(fb, &session.grid, player.pos, &hits, block);
    }

    if player.damage_flash > 0.0 {
        fb.apply_tint(Color::new(200, 0, 0, 255), (player.damage_flash * 2.0).min(0.5));
    }
    match session.status() {
        Status::Playing => {}
        Status::GameOver => {
            fb.apply_tint(Color::new(60, 0, 0, 255), 0.6);
            fb.apply_vignette(0.8);
        }
        Status::Won => fb.apply_tint(Color::new(20, 60, 20, 255), 0.4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::maze::Grid;
    use glam::Vec2;

    #[test]
    fn nearer_walls_draw_taller_strips() {
        let g = Grid::parse("1111111\n1.....1\n1.....1\n1.....1\n1111111").unwrap();
        let tm = TextureManager::procedural();
        let mut fb = Framebuffer::new(64, 48);
        fb.set_background_color(Color::BLANK);
        fb.clear();
        let view = View::of(&fb, std::f32::consts::FRAC_PI_3, 20.0);
        let mut depth = DepthBuffer::new(64, 20.0);

        let near = cast_view(&g, Vec2::new(4.5, 2.5), 0.0, view.fov, 64, 20.0);
        draw_walls(&mut fb, &view, &near, &mut depth, &tm);
        let near_rows = (0..48).filter(|&y| fb.get_pixel(32, y) != Color::BLANK).count();
        assert!((depth.get(32) - 1.5).abs() < 1e-3);

        fb.clear();
        let far = cast_view(&g, Vec2::new(1.5, 2.5), 0.0, view.fov, 64, 20.0);
        draw_walls(&mut fb, &view, &far, &mut depth, &tm);
        let far_rows = (0..48).filter(|&y| fb.get_pixel(32, y) != Color::BLANK).count();
        assert!(near_rows > far_rows);
    }

    #[test]
    fn shading_has_a_floor() {
        let view = View { width: 10, height: 10, fov: 1.0, max_depth: 20.0 };
        assert_eq!(view.shade(0.0), 1.0);
        assert_eq!(view.shade(50.0), MIN_BRIGHTNESS);
        assert!(view.shade(5.0) > view.shade(10.0));
    }
}
