/// RGBA8 colour, laid out like raylib's so a framebuffer can be uploaded as-is.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RED: Color = Color::new(230, 41, 55, 255);
    pub const YELLOW: Color = Color::new(253, 249, 0, 255);
    pub const BLANK: Color = Color::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiplies rgb by `k`, keeping alpha.
    #[inline]
    pub fn scale(self, k: f32) -> Color {
        let s = k.max(0.0);
        let mul = |v: u8| -> u8 { (v as f32 * s).min(255.0) as u8 };
        Color::new(mul(self.r), mul(self.g), mul(self.b), self.a)
    }

    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let f = |x: u8, y: u8| -> u8 { ((x as f32) * (1.0 - t) + (y as f32) * t) as u8 };
        Color::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b), f(self.a, other.a))
    }

    /// Saturating per-channel add.
    #[inline]
    pub fn additive(self, other: Color) -> Color {
        Color::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
            self.a.saturating_add(other.a),
        )
    }
}

#[cfg(feature = "window")]
impl From<Color> for raylib::prelude::Color {
    fn from(c: Color) -> Self {
        raylib::prelude::Color::new(c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_darkens_and_keeps_alpha() {
        let c = Color::new(200, 100, 50, 128).scale(0.5);
        assert_eq!(c, Color::new(100, 50, 25, 128));
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 1.0), Color::WHITE);
    }
}
