//! Maze-chase arena: wall rectangles, finish area, spawns and the move rule.
use crate::net::protocol::Direction;

/// Player radius in pixels.
pub const PLAYER_SIZE: i32 = 20;
/// Pixels per accepted move.
pub const STEP: i32 = 5;

/// Layout is authored for this resolution and scaled to the real one.
const BASE_W: f32 = 800.0;
const BASE_H: f32 = 600.0;

/// (x, y, w, h) in base-resolution pixels.
const WALLS: [(f32, f32, f32, f32); 9] = [
    (50.0, 50.0, 700.0, 20.0),
    (50.0, 50.0, 20.0, 500.0),
    (50.0, 530.0, 700.0, 20.0),
    (730.0, 50.0, 20.0, 500.0),
    (150.0, 150.0, 500.0, 20.0),
    (150.0, 150.0, 20.0, 120.0),
    (150.0, 330.0, 20.0, 120.0),
    (150.0, 430.0, 500.0, 20.0),
    (630.0, 150.0, 20.0, 300.0),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of half extent `half` around (cx, cy).
    pub const fn around(cx: i32, cy: i32, half: i32) -> Self {
        Self::new(cx - half, cy - half, half * 2, half * 2)
    }

    /// Strict overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn contains(&self, (px, py): (i32, i32)) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub walls: Vec<Rect>,
    pub finish: Rect,
}

impl Arena {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as i32, height as i32);
        let sx = width as f32 / BASE_W;
        let sy = height as f32 / BASE_H;
        let walls = WALLS
            .iter()
            .map(|&(x, y, w, h)| Rect::new((x * sx) as i32, (y * sy) as i32, (w * sx) as i32, (h * sy) as i32))
            .collect();
        let finish = Rect::new(
            width / 2 - (50.0 * sx) as i32,
            height / 2 - (50.0 * sy) as i32,
            (100.0 * sx) as i32,
            (100.0 * sy) as i32,
        );
        Self { width, height, walls, finish }
    }

    /// The four screen corners, handed out round-robin.
    pub fn spawn_point(&self, index: usize) -> (i32, i32) {
        let (lo_x, hi_x) = (PLAYER_SIZE, self.width - PLAYER_SIZE);
        let (lo_y, hi_y) = (PLAYER_SIZE, self.height - PLAYER_SIZE);
        [(lo_x, lo_y), (hi_x, lo_y), (lo_x, hi_y), (hi_x, hi_y)][index % 4]
    }

    pub fn collides(&self, (x, y): (i32, i32)) -> bool {
        let body = Rect::around(x, y, PLAYER_SIZE);
        self.walls.iter().any(|w| body.intersects(w))
    }

    /// Position after one step in `dir`, or `pos` unchanged when the step
    /// would overlap a wall. Always clamped to the screen.
    pub fn step(&self, (x, y): (i32, i32), dir: Direction) -> (i32, i32) {
        let next = match dir {
            Direction::Up => (x, (y - STEP).max(PLAYER_SIZE)),
            Direction::Down => (x, (y + STEP).min(self.height - PLAYER_SIZE)),
            Direction::Left => ((x - STEP).max(PLAYER_SIZE), y),
            Direction::Right => ((x + STEP).min(self.width - PLAYER_SIZE), y),
        };
        if self.collides(next) { (x, y) } else { next }
    }

    pub fn in_finish(&self, pos: (i32, i32)) -> bool {
        self.finish.contains(pos)
    }
}
