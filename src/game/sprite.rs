//! Sprite entities (decorations, pickups) and their animation clocks.
use glam::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKind {
    Candlebra,
    GreenLight,
    RedLight,
    Medkit,
    AmmoBox,
    Soldier,
    CacoDemon,
    CyberDemon,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimSet {
    Idle,
    Walk,
    Attack,
    Pain,
    Death,
}

impl AnimSet {
    pub const ALL: [AnimSet; 5] = [AnimSet::Idle, AnimSet::Walk, AnimSet::Attack, AnimSet::Pain, AnimSet::Death];

    pub fn name(self) -> &'static str {
        match self {
            AnimSet::Idle => "idle",
            AnimSet::Walk => "walk",
            AnimSet::Attack => "attack",
            AnimSet::Pain => "pain",
            AnimSet::Death => "death",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Pickup {
    Health(i32),
    Ammo(u32),
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 8] = [
        SpriteKind::Candlebra,
        SpriteKind::GreenLight,
        SpriteKind::RedLight,
        SpriteKind::Medkit,
        SpriteKind::AmmoBox,
        SpriteKind::Soldier,
        SpriteKind::CacoDemon,
        SpriteKind::CyberDemon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpriteKind::Candlebra => "candlebra",
            SpriteKind::GreenLight => "green_light",
            SpriteKind::RedLight => "red_light",
            SpriteKind::Medkit => "medkit",
            SpriteKind::AmmoBox => "ammo",
            SpriteKind::Soldier => "soldier",
            SpriteKind::CacoDemon => "caco_demon",
            SpriteKind::CyberDemon => "cyber_demon",
        }
    }

    /// Frames in an animation set; 0 means the kind has no such set.
    pub fn frame_count(self, set: AnimSet) -> usize {
        use AnimSet::*;
        use SpriteKind::*;
        match (self, set) {
            (Candlebra | Medkit | AmmoBox, Idle) => 1,
            (GreenLight | RedLight, Idle) => 4,
            (Soldier | CacoDemon | CyberDemon, Idle) => 8,
            (Soldier | CyberDemon, Walk) => 4,
            (CacoDemon, Walk) => 3,
            (Soldier | CyberDemon, Attack) => 2,
            (CacoDemon, Attack) => 5,
            (Soldier, Pain) => 1,
            (CacoDemon | CyberDemon, Pain) => 2,
            (Soldier | CyberDemon, Death) => 9,
            (CacoDemon, Death) => 6,
            _ => 0,
        }
    }

    /// (world scale, vertical shift) of the billboard.
    pub fn appearance(self) -> (f32, f32) {
        match self {
            SpriteKind::Candlebra => (0.7, 0.27),
            SpriteKind::GreenLight | SpriteKind::RedLight => (0.8, 0.16),
            SpriteKind::Medkit | SpriteKind::AmmoBox => (0.35, 0.6),
            SpriteKind::Soldier => (0.6, 0.38),
            SpriteKind::CacoDemon => (0.7, 0.27),
            SpriteKind::CyberDemon => (1.0, 0.04),
        }
    }

    /// Seconds per animation frame.
    pub fn frame_time(self) -> f32 {
        match self {
            SpriteKind::Soldier => 0.18,
            SpriteKind::CacoDemon => 0.25,
            SpriteKind::CyberDemon => 0.21,
            _ => 0.12,
        }
    }

    pub fn pickup(self) -> Option<Pickup> {
        match self {
            SpriteKind::Medkit => Some(Pickup::Health(25)),
            SpriteKind::AmmoBox => Some(Pickup::Ammo(10)),
            _ => None,
        }
    }
}

/// dt-driven frame clock for one animation set.
#[derive(Clone, Debug)]
pub struct Animation {
    pub set: AnimSet,
    pub frame: usize,
    timer: f32,
    period: f32,
}

impl Animation {
    pub fn new(period: f32) -> Self {
        Self { set: AnimSet::Idle, frame: 0, timer: 0.0, period }
    }

    /// Switches set, restarting from frame 0 when it changes.
    pub fn play(&mut self, set: AnimSet) {
        if self.set != set {
            self.set = set;
            self.frame = 0;
            self.timer = 0.0;
        }
    }

    /// Starts `set` from frame 0 even if it is already playing.
    pub fn restart(&mut self, set: AnimSet) {
        self.set = set;
        self.frame = 0;
        self.timer = 0.0;
    }

    /// Advances the clock. Returns true when the set wrapped back to frame 0.
    pub fn tick(&mut self, dt: f32, frames: usize) -> bool {
        if frames <= 1 {
            return false;
        }
        self.timer += dt;
        let mut wrapped = false;
        while self.timer >= self.period {
            self.timer -= self.period;
            self.frame += 1;
            if self.frame >= frames {
                self.frame = 0;
                wrapped = true;
            }
        }
        wrapped
    }

    /// Advances without wrapping; stays on the last frame. Returns true once
    /// the last frame is reached.
    pub fn tick_once(&mut self, dt: f32, frames: usize) -> bool {
        let last = frames.saturating_sub(1);
        if self.frame >= last {
            return true;
        }
        self.timer += dt;
        while self.timer >= self.period && self.frame < last {
            self.timer -= self.period;
            self.frame += 1;
        }
        self.frame >= last
    }
}

pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub anim: Animation,
    pub alive: bool,
}

impl Sprite {
    pub fn new(kind: SpriteKind, pos: Vec2) -> Self {
        Self { kind, pos, anim: Animation::new(kind.frame_time()), alive: true }
    }

    pub fn update(&mut self, dt: f32) {
        self.anim.tick(dt, self.kind.frame_count(self.anim.set));
    }

    pub fn billboard(&self) -> Billboard {
        Billboard { pos: self.pos, kind: self.kind, set: self.anim.set, frame: self.anim.frame }
    }
}

/// What the renderer needs to draw one sprite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Billboard {
    pub pos: Vec2,
    pub kind: SpriteKind,
    pub set: AnimSet,
    pub frame: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_wraps_after_last_frame() {
        let mut a = Animation::new(0.1);
        assert!(!a.tick(0.25, 4));
        assert_eq!(a.frame, 2);
        assert!(a.tick(0.2, 4));
        assert_eq!(a.frame, 0);
    }

    #[test]
    fn tick_once_holds_last_frame() {
        let mut a = Animation::new(0.1);
        a.play(AnimSet::Death);
        assert!(!a.tick_once(0.15, 4));
        assert!(a.tick_once(1.0, 4));
        assert_eq!(a.frame, 3);
        assert!(a.tick_once(1.0, 4));
        assert_eq!(a.frame, 3);
    }

    #[test]
    fn every_npc_kind_has_all_sets() {
        for kind in [SpriteKind::Soldier, SpriteKind::CacoDemon, SpriteKind::CyberDemon] {
            for set in AnimSet::ALL {
                assert!(kind.frame_count(set) > 0, "{kind:?} {set:?}");
            }
        }
        assert_eq!(SpriteKind::Candlebra.frame_count(AnimSet::Walk), 0);
    }
}
