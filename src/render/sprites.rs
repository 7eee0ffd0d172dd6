//! Billboard projection and drawing.
//!
//! - `project`: world position to screen column, depth and size
//! - `draw_billboard`: one pixmap, clipped per column by the depth buffer
//! - `draw_sprites_sorted`: far-to-near draw of every visible billboard
use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use crate::game::sprite::Billboard;
use crate::game::wrap_pi;
use crate::render::depth_buffer::DepthBuffer;
use crate::render::framebuffer::Framebuffer;
use crate::render::render3d::View;
use crate::render::textures::{Pixmap, TextureManager};
use crate::settings::MIN_SPRITE_DEPTH;

/// A billboard placed on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// Horizontal centre in pixels.
    pub screen_x: f32,
    /// Perpendicular distance, comparable with wall depths.
    pub depth: f32,
    /// Projected height in pixels.
    pub size: f32,
    /// Top edge in pixels.
    pub top: f32,
}

/// Projects a point at `pos` for a camera at `eye` looking along `angle`.
/// Returns `None` for points behind the camera, too close, or fully off-screen.
pub fn project(view: &View, eye: Vec2, angle: f32, pos: Vec2, scale: f32, shift: f32) -> Option<Projection> {
    let d = pos - eye;
    let delta = wrap_pi(d.y.atan2(d.x) - angle);
    if delta.abs() >= FRAC_PI_2 {
        return None;
    }
    let depth = d.length() * delta.cos();
    if depth < MIN_SPRITE_DEPTH {
        return None;
    }
    let screen_dist = view.screen_dist();
    let screen_x = view.half_width() + delta.tan() * screen_dist;
    let size = screen_dist / depth * scale;
    if screen_x + size < 0.0 || screen_x - size > view.width as f32 {
        return None;
    }
    let top = view.half_height() - size * 0.5 + size * shift;
    Some(Projection { screen_x, depth, size, top })
}

/// Draws `pix` at `proj`, skipping columns where a wall is nearer.
pub fn draw_billboard(fb: &mut Framebuffer, view: &View, depth: &DepthBuffer, proj: &Projection, pix: &Pixmap) {
    let height = proj.size;
    let width = height * pix.width() as f32 / pix.height() as f32;
    if height < 1.0 || width < 1.0 {
        return;
    }
    let left = proj.screen_x - width * 0.5;
    let x0 = left.max(0.0) as u32;
    let x1 = (left + width).min(fb.width as f32).max(0.0) as u32;
    let y0 = proj.top.max(0.0) as u32;
    let y1 = (proj.top + height).min(fb.height as f32).max(0.0) as u32;
    let shade = view.shade(proj.depth);

    for sx in x0..x1 {
        if depth.occludes(sx as usize, proj.depth) {
            continue;
        }
        let u = (sx as f32 - left) / width;
        for sy in y0..y1 {
            let v = (sy as f32 - proj.top) / height;
            let color = pix.sample_uv(u, v);
            if color.a < 8 { continue; }
            fb.set_pixel_color(sx, sy, color.scale(shade));
        }
    }
}

pub fn draw_sprites_sorted(
    fb: &mut Framebuffer,
    view: &View,
    texman: &TextureManager,
    depth: &DepthBuffer,
    eye: Vec2,
    angle: f32,
    billboards: &[Billboard],
) {
    let mut visible: Vec<(Projection, &Billboard)> = billboards
        .iter()
        .filter_map(|b| {
            let (scale, shift) = b.kind.appearance();
            project(view, eye, angle, b.pos, scale, shift).map(|p| (p, b))
        })
        .collect();
    visible.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));
    for (proj, b) in visible {
        let pix = texman.sprite_frame(b.kind, b.set, b.frame);
        draw_billboard(fb, view, depth, &proj, pix);
    }
}
