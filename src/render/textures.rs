//! Texture store: wall textures by id, sprite frames by (kind, set), weapon
//! frames and the sky. Files are optional; missing ones fall back to
//! procedural pixmaps where a built-in exists.
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::game::maze::{Grid, TextureId};
use crate::game::sprite::{AnimSet, SpriteKind};
use crate::game::weapon::WEAPON_FRAMES;
use crate::render::color::Color;

/// Wall ids that have a procedural fallback.
const BUILTIN_WALLS: std::ops::RangeInclusive<TextureId> = 1..=5;

/// An immutable CPU pixmap, sampled per pixel.
#[derive(Clone)]
pub struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<Color>,
}

impl Pixmap {
    pub fn new(w: u32, h: u32, px: Vec<Color>) -> Self {
        debug_assert_eq!(px.len(), (w * h) as usize);
        Self { w, h, px }
    }

    pub fn solid(w: u32, h: u32, c: Color) -> Self {
        Self::new(w, h, vec![c; (w * h) as usize])
    }

    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|source| Error::Image { path: path.to_path_buf(), source })?
            .to_rgba8();
        let (w, h) = img.dimensions();
        let px = img.pixels().map(|p| Color::new(p[0], p[1], p[2], p[3])).collect();
        Ok(Self::new(w.max(1), h.max(1), px))
    }

    #[inline] pub fn width(&self) -> u32 { self.w }
    #[inline] pub fn height(&self) -> u32 { self.h }

    /// Wrapping texel lookup.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[yi * self.w as usize + xi]
    }

    /// Normalized lookup, `u` and `v` in `[0, 1)`.
    #[inline]
    pub fn sample_uv(&self, u: f32, v: f32) -> Color {
        let x = (u * self.w as f32).clamp(0.0, self.w as f32 - 1.0) as u32;
        let y = (v * self.h as f32).clamp(0.0, self.h as f32 - 1.0) as u32;
        self.sample(x, y)
    }
}

pub struct TextureManager {
    walls: HashMap<TextureId, Pixmap>,
    sprites: HashMap<(SpriteKind, AnimSet), Vec<Pixmap>>,
    weapon: Vec<Pixmap>,
    sky: Pixmap,
    missing: Pixmap,
}

impl TextureManager {
    /// Built-in pixmaps only.
    pub fn procedural() -> Self {
        let mut tm = Self {
            walls: HashMap::new(),
            sprites: HashMap::new(),
            weapon: (0..WEAPON_FRAMES).map(make_weapon_frame).collect(),
            sky: make_sky(256, 96),
            missing: make_checker(16, 16, Color::new(255, 0, 255, 255)),
        };
        for id in BUILTIN_WALLS {
            tm.walls.insert(id, make_wall(64, 64, id));
        }
        for kind in SpriteKind::ALL {
            for set in AnimSet::ALL {
                let n = kind.frame_count(set);
                if n > 0 {
                    let frames = (0..n).map(|f| make_sprite_frame(kind, set, f, n)).collect();
                    tm.sprites.insert((kind, set), frames);
                }
            }
        }
        tm
    }

    /// Loads overrides from `dir`:
    /// `walls/<id>.png`, `sprites/<kind>/<set>/<frame>.png`, `weapon/<frame>.png`, `sky.png`.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut tm = Self::procedural();
        let mut loaded = 0usize;

        for id in 1..=9u8 {
            let p = dir.join("walls").join(format!("{id}.png"));
            if p.is_file() {
                tm.walls.insert(id, Pixmap::open(&p)?);
                loaded += 1;
            }
        }

        for kind in SpriteKind::ALL {
            for set in AnimSet::ALL {
                let expected = kind.frame_count(set);
                let set_dir = dir.join("sprites").join(kind.name()).join(set.name());
                if expected == 0 || !set_dir.is_dir() {
                    continue;
                }
                let frames = load_sequence(&set_dir)?;
                if frames.len() != expected {
                    return Err(Error::Asset(format!(
                        "{} has {} frames, expected {expected}",
                        set_dir.display(),
                        frames.len()
                    )));
                }
                loaded += frames.len();
                tm.sprites.insert((kind, set), frames);
            }
        }

        let weapon_dir = dir.join("weapon");
        if weapon_dir.is_dir() {
            let frames = load_sequence(&weapon_dir)?;
            if frames.len() != WEAPON_FRAMES {
                return Err(Error::Asset(format!(
                    "{} has {} frames, expected {WEAPON_FRAMES}",
                    weapon_dir.display(),
                    frames.len()
                )));
            }
            loaded += frames.len();
            tm.weapon = frames;
        }

        let sky = dir.join("sky.png");
        if sky.is_file() {
            tm.sky = Pixmap::open(&sky)?;
            loaded += 1;
        }

        log::info!("loaded {loaded} texture files from {}", dir.display());
        Ok(tm)
    }

    /// Fails when the map uses a wall id with no texture.
    pub fn validate(&self, grid: &Grid) -> Result<()> {
        let missing: Vec<_> = grid.texture_ids().into_iter().filter(|id| !self.walls.contains_key(id)).collect();
        if !missing.is_empty() {
            return Err(Error::Asset(format!("no texture for wall ids {missing:?}")));
        }
        Ok(())
    }

    /// Validated ids always resolve; anything else gets the magenta checker.
    #[inline]
    pub fn wall(&self, id: TextureId) -> &Pixmap {
        self.walls.get(&id).unwrap_or(&self.missing)
    }

    pub fn sprite_frame(&self, kind: SpriteKind, set: AnimSet, frame: usize) -> &Pixmap {
        let frames = self
            .sprites
            .get(&(kind, set))
            .or_else(|| self.sprites.get(&(kind, AnimSet::Idle)));
        match frames {
            Some(f) if !f.is_empty() => &f[frame.min(f.len() - 1)],
            _ => &self.missing,
        }
    }

    pub fn weapon_frame(&self, frame: usize) -> &Pixmap {
        &self.weapon[frame.min(self.weapon.len() - 1)]
    }

    #[inline]
    pub fn sky(&self) -> &Pixmap {
        &self.sky
    }
}

/// Loads every `.png` in `dir`, ordered by file name.
fn load_sequence(dir: &Path) -> Result<Vec<Pixmap>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("png")))
        .collect();
    paths.sort();
    paths.iter().map(|p| Pixmap::open(p)).collect()
}

#[inline]
fn mix(a: Color, b: Color, t: u8) -> Color {
    let ta = t as u16;
    let na = 255u16 - ta;
    let mixc = |x: u8, y: u8| -> u8 { (((x as u16) * na + (y as u16) * ta) / 255) as u8 };
    Color::new(mixc(a.r, b.r), mixc(a.g, b.g), mixc(a.b, b.b), mixc(a.a, b.a))
}

fn make_checker(w: u32, h: u32, base: Color) -> Pixmap {
    let mut px = vec![base; (w * h) as usize];
    let cell = 8u32;
    for y in 0..h {
        for x in 0..w {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                let i = (y * w + x) as usize;
                px[i] = mix(px[i], Color::WHITE, 24);
            }
        }
    }
    Pixmap::new(w, h, px)
}

/// Brick wall with mortar lines; `id` picks the palette.
fn make_wall(w: u32, h: u32, id: TextureId) -> Pixmap {
    let base = match id {
        1 => Color::new(120, 118, 110, 255),
        2 => Color::new(140, 60, 40, 255),
        3 => Color::new(70, 90, 120, 255),
        4 => Color::new(90, 110, 60, 255),
        _ => Color::new(130, 100, 50, 255),
    };
    let mortar = Color::new(35, 32, 30, 255);
    let brick_h = (h / 8).max(2);
    let brick_w = (w / 4).max(2);
    let mut px = vec![base; (w * h) as usize];
    for y in 0..h {
        let row = y / brick_h;
        let shift = if row % 2 == 0 { 0 } else { brick_w / 2 };
        for x in 0..w {
            let i = (y * w + x) as usize;
            let on_mortar = y % brick_h == 0 || (x + shift) % brick_w == 0;
            px[i] = if on_mortar {
                mortar
            } else {
                // slight per-brick variation
                let n = ((x + shift) / brick_w * 7 + row * 13) % 5;
                base.scale(0.85 + n as f32 * 0.06)
            };
        }
    }
    Pixmap::new(w, h, px)
}

fn make_sky(w: u32, h: u32) -> Pixmap {
    let top = Color::new(12, 16, 26, 255);
    let bottom = Color::new(70, 40, 40, 255);
    let mut px = vec![Color::BLACK; (w * h) as usize];
    for y in 0..h {
        let col = top.lerp(bottom, y as f32 / (h - 1).max(1) as f32);
        for x in 0..w {
            // sparse stars
            let star = (x * 73 + y * 151) % 211 == 0 && y < h / 2;
            px[(y * w + x) as usize] = if star { Color::WHITE } else { col };
        }
    }
    Pixmap::new(w, h, px)
}

fn make_glowing_orb(w: u32, h: u32, color: Color) -> Pixmap {
    let mut px = vec![Color::BLANK; (w * h) as usize];
    let cx = (w as f32) * 0.5;
    let cy = (h as f32) * 0.5;
    let r = (w.min(h) as f32) * 0.3;
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let i = (y * w + x) as usize;
            if d <= r {
                let t = (1.0 - (d / r)).clamp(0.0, 1.0);
                let core = mix(color, Color::WHITE, (t * 220.0) as u8);
                px[i] = px[i].additive(core);
                px[i].a = 255;
            } else {
                let t = (1.0 - ((d - r) / (r * 0.9))).clamp(0.0, 1.0);
                if t > 0.0 {
                    let halo = mix(color, Color::BLANK, (200.0 * (1.0 - t)) as u8);
                    px[i] = px[i].additive(halo);
                    px[i].a = (t * 180.0) as u8;
                }
            }
        }
    }
    Pixmap::new(w, h, px)
}

fn make_body(w: u32, h: u32, body: Color, squash: f32) -> Pixmap {
    let mut px = vec![Color::BLANK; (w * h) as usize];
    let cx = (w as f32) * 0.5;
    let ry = (h as f32) * 0.35 * (1.0 - squash).max(0.1);
    let cy = h as f32 - ry - 1.0;
    let rx = (w as f32) * 0.23 * (1.0 + squash);
    for y in 0..h {
        for x in 0..w {
            let nx = (x as f32 - cx) / rx;
            let ny = (y as f32 - cy) / ry;
            if nx * nx + ny * ny <= 1.0 {
                px[(y * w + x) as usize] = body;
            }
        }
    }
    Pixmap::new(w, h, px)
}

fn make_sprite_frame(kind: SpriteKind, set: AnimSet, frame: usize, frames: usize) -> Pixmap {
    let progress = frame as f32 / frames.max(1) as f32;
    match kind {
        SpriteKind::Candlebra => {
            let mut pm = make_body(32, 64, Color::BLANK, 0.0);
            for y in 16..64 {
                for x in 15..17 {
                    pm.px[(y * 32 + x) as usize] = Color::new(90, 80, 60, 255);
                }
            }
            for y in 6..16 {
                for x in 13..19 {
                    pm.px[(y * 32 + x) as usize] = Color::new(255, 200, 80, 255);
                }
            }
            pm
        }
        SpriteKind::GreenLight | SpriteKind::RedLight => {
            let base = if kind == SpriteKind::GreenLight {
                Color::new(60, 255, 90, 255)
            } else {
                Color::new(255, 70, 60, 255)
            };
            make_glowing_orb(64, 64, base.scale(0.7 + 0.3 * (progress * std::f32::consts::TAU).sin().abs()))
        }
        SpriteKind::Medkit => {
            let mut pm = Pixmap::solid(32, 24, Color::new(230, 230, 230, 255));
            for y in 4..20 {
                for x in 13..19 {
                    pm.px[(y * 32 + x) as usize] = Color::new(200, 20, 20, 255);
                }
            }
            for y in 9..15 {
                for x in 8..24 {
                    pm.px[(y * 32 + x) as usize] = Color::new(200, 20, 20, 255);
                }
            }
            pm
        }
        SpriteKind::AmmoBox => make_checker(32, 24, Color::new(150, 120, 40, 255)),
        SpriteKind::Soldier | SpriteKind::CacoDemon | SpriteKind::CyberDemon => {
            let body = match kind {
                SpriteKind::Soldier => Color::new(120, 120, 255, 255),
                SpriteKind::CacoDemon => Color::new(255, 120, 120, 255),
                _ => Color::new(255, 180, 80, 255),
            };
            match set {
                AnimSet::Idle | AnimSet::Walk => make_body(64, 64, body, 0.0),
                AnimSet::Attack => make_body(64, 64, mix(body, Color::YELLOW, 90), 0.0),
                AnimSet::Pain => make_body(64, 64, mix(body, Color::RED, 160), 0.0),
                AnimSet::Death => make_body(64, 64, body.scale(1.0 - progress * 0.5), progress * 0.8),
            }
        }
    }
}

fn make_weapon_frame(frame: usize) -> Pixmap {
    let (w, h) = (96u32, 64u32);
    let mut px = vec![Color::BLANK; (w * h) as usize];
    let kick = if frame == 0 { 0 } else { 6 - frame.min(5) as u32 };
    for y in (16 + kick)..h {
        for x in 38..58 {
            px[(y * w + x) as usize] = Color::new(70, 70, 75, 255);
        }
    }
    if frame == 1 || frame == 2 {
        let flash = make_glowing_orb(32, 32, Color::new(255, 200, 60, 255));
        for y in 0..16 {
            for x in 0..32 {
                let c = flash.sample(x, y + 8);
                if c.a > 0 {
                    px[(y * w + x + 32) as usize] = c;
                }
            }
        }
    }
    Pixmap::new(w, h, px)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_covers_default_map() {
        let tm = TextureManager::procedural();
        assert!(tm.validate(&Grid::default_map()).is_ok());
    }

    #[test]
    fn unknown_wall_id_fails_validation() {
        let tm = TextureManager::procedural();
        let g = Grid::parse("797\n7.7\n777").unwrap();
        assert!(matches!(tm.validate(&g), Err(Error::Asset(_))));
    }

    #[test]
    fn sprite_frames_match_declared_counts() {
        let tm = TextureManager::procedural();
        let last = SpriteKind::Soldier.frame_count(AnimSet::Death) - 1;
        let a = tm.sprite_frame(SpriteKind::Soldier, AnimSet::Death, last) as *const Pixmap;
        let b = tm.sprite_frame(SpriteKind::Soldier, AnimSet::Death, last + 10) as *const Pixmap;
        assert_eq!(a, b);
    }

    #[test]
    fn uv_sampling_stays_in_bounds() {
        let pm = Pixmap::new(2, 1, vec![Color::BLACK, Color::WHITE]);
        assert_eq!(pm.sample_uv(0.0, 0.0), Color::BLACK);
        assert_eq!(pm.sample_uv(0.99, 0.99), Color::WHITE);
        assert_eq!(pm.sample_uv(1.5, 0.0), Color::WHITE);
    }
}
