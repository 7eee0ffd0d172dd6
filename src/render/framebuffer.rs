//! CPU framebuffer and full-screen overlays.
use crate::render::color::Color;

pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    #[inline] pub fn set_background_color(&mut self, c: Color) { self.background_color = c; }

    pub fn fill_rect(&mut self, x0: u32, y0: u32, w: u32, h: u32, color: Color) {
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        for y in y0.min(y1)..y1 {
            let row = (y * self.width) as usize;
            self.color_buffer[row + x0.min(x1) as usize..row + x1 as usize].fill(color);
        }
    }

    /// Blends every pixel toward `tint` by `strength` (0..1).
    pub fn apply_tint(&mut self, tint: Color, strength: f32) {
        let s = strength.clamp(0.0, 1.0);
        if s <= 0.0 { return; }
        for c in &mut self.color_buffer {
            let a = c.a;
            *c = c.lerp(tint, s);
            c.a = a;
        }
    }

    /// Darkens the screen edges; stronger `intensity` reaches further in.
    pub fn apply_vignette(&mut self, intensity: f32) {
        let k = intensity.clamp(0.0, 1.0);
        if k <= 0.0 { return; }
        let cx = self.width as f32 * 0.5;
        let cy = self.height as f32 * 0.5;
        let max_r = (cx * cx + cy * cy).sqrt();
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let t = ((dx * dx + dy * dy).sqrt() / max_r).clamp(0.0, 1.0);
                let fade = t * t;
                if fade > 0.2 {
                    let idx = (y * self.width + x) as usize;
                    self.color_buffer[idx] = self.color_buffer[idx].scale(1.0 - k * (fade - 0.2));
                }
            }
        }
    }

    /// Raw RGBA8 bytes of the whole buffer.
    pub fn as_bytes(&self) -> &[u8] {
        let byte_len = self.color_buffer.len() * std::mem::size_of::<Color>();
        // SAFETY: Color is repr(C) with four u8 fields, so the buffer is a
        // contiguous run of byte_len initialised bytes.
        unsafe { std::slice::from_raw_parts(self.color_buffer.as_ptr() as *const u8, byte_len) }
    }

    /// Uploads the pixels into a persistent raylib texture of the same size.
    #[cfg(feature = "window")]
    pub fn upload_to_texture(&self, tex: &mut raylib::prelude::Texture2D) {
        use raylib::core::texture::RaylibTexture2D;
        let _ = tex.update_texture(self.as_bytes());
    }
}
