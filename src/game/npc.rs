//! NPC agents: per-kind stats and one state machine for all kinds.
use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::game::maze::{Cell, Grid};
use crate::game::pathfinding::find_path;
use crate::game::session::SoundEvent;
use crate::game::sprite::{AnimSet, Animation, Billboard, SpriteKind};
use crate::game::wrap_pi;
use crate::render::casters::march;

const NPC_HALF_SIZE: f32 = 0.2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NpcKind {
    Soldier,
    CacoDemon,
    CyberDemon,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NpcStats {
    pub health: i32,
    /// Cells per second.
    pub speed: f32,
    pub attack_dist: f32,
    pub damage: i32,
    /// Chance that one attack cycle hits the player.
    pub accuracy: f64,
}

impl NpcKind {
    pub const ALL: [NpcKind; 3] = [NpcKind::Soldier, NpcKind::CacoDemon, NpcKind::CyberDemon];

    pub fn sprite(self) -> SpriteKind {
        match self {
            NpcKind::Soldier => SpriteKind::Soldier,
            NpcKind::CacoDemon => SpriteKind::CacoDemon,
            NpcKind::CyberDemon => SpriteKind::CyberDemon,
        }
    }

    /// Relative spawn weight.
    pub fn weight(self) -> u32 {
        match self {
            NpcKind::Soldier => 70,
            NpcKind::CacoDemon => 20,
            NpcKind::CyberDemon => 10,
        }
    }

    /// Weighted random kind.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> NpcKind {
        let total: u32 = Self::ALL.iter().map(|k| k.weight()).sum();
        let mut roll = rng.gen_range(0..total);
        for kind in Self::ALL {
            if roll < kind.weight() {
                return kind;
            }
            roll -= kind.weight();
        }
        NpcKind::Soldier
    }

    /// Soldiers roll their attack distance once, at spawn.
    pub fn stats<R: Rng + ?Sized>(self, rng: &mut R) -> NpcStats {
        match self {
            NpcKind::Soldier => NpcStats {
                health: 100,
                speed: 1.8,
                attack_dist: rng.gen_range(3.0..6.0),
                damage: 10,
                accuracy: 0.15,
            },
            NpcKind::CacoDemon => NpcStats { health: 150, speed: 3.0, attack_dist: 1.0, damage: 25, accuracy: 0.35 },
            NpcKind::CyberDemon => NpcStats { health: 350, speed: 3.3, attack_dist: 6.0, damage: 15, accuracy: 0.25 },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NpcState {
    Idle,
    Chase,
    Attack,
    Pain,
    Dying,
    Dead,
}

pub struct Npc {
    pub kind: NpcKind,
    pub pos: Vec2,
    pub health: i32,
    pub stats: NpcStats,
    state: NpcState,
    anim: Animation,
    path: VecDeque<Cell>,
    frames_since_path: u32,
    pain_timer: f32,
    /// Set once the NPC has seen or been shot by the player.
    triggered: bool,
}

impl Npc {
    pub fn new(kind: NpcKind, pos: Vec2, stats: NpcStats) -> Self {
        Self {
            kind,
            pos,
            health: stats.health,
            stats,
            state: NpcState::Idle,
            anim: Animation::new(kind.sprite().frame_time()),
            path: VecDeque::new(),
            frames_since_path: 0,
            pain_timer: 0.0,
            triggered: false,
        }
    }

    #[inline]
    pub fn state(&self) -> NpcState {
        self.state
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, NpcState::Dying | NpcState::Dead)
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        Grid::cell_of(self.pos)
    }

    pub fn billboard(&self) -> Billboard {
        Billboard { pos: self.pos, kind: self.kind.sprite(), set: self.anim.set, frame: self.anim.frame }
    }

    /// True when nothing solid lies between the NPC and `target`.
    pub fn sees(&self, grid: &Grid, target: Vec2) -> bool {
        let d = target - self.pos;
        let dist = d.length();
        if dist < 1e-4 {
            return true;
        }
        let hit = march(grid, self.pos, d.y.atan2(d.x), dist);
        !hit.is_hit() || hit.raw_distance >= dist
    }

    /// Distance from `eye` if the NPC's body covers the view ray at `angle`.
    pub fn in_crosshair(&self, eye: Vec2, angle: f32) -> Option<f32> {
        let d = self.pos - eye;
        let dist = d.length();
        let radius = self.kind.sprite().appearance().0 * 0.5;
        let delta = wrap_pi(d.y.atan2(d.x) - angle);
        (delta.abs() <= (radius / dist.max(1e-4)).atan()).then_some(dist)
    }

    pub fn take_hit(&mut self, damage: i32, events: &mut Vec<SoundEvent>) {
        if !self.is_alive() {
            return;
        }
        self.triggered = true;
        self.health -= damage;
        if self.health <= 0 {
            self.state = NpcState::Dying;
            self.anim.restart(AnimSet::Death);
            events.push(SoundEvent::NpcDeath);
        } else {
            self.state = NpcState::Pain;
            self.anim.restart(AnimSet::Pain);
            let sprite = self.kind.sprite();
            self.pain_timer = sprite.frame_count(AnimSet::Pain) as f32 * sprite.frame_time();
            events.push(SoundEvent::NpcPain);
        }
    }

    /// One frame of behaviour. Returns the damage dealt to the player.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        target: Vec2,
        dt: f32,
        recompute_frames: u32,
        rng: &mut R,
        events: &mut Vec<SoundEvent>,
    ) -> i32 {
        let sprite = self.kind.sprite();
        match self.state {
            NpcState::Dead => return 0,
            NpcState::Dying => {
                if self.anim.tick_once(dt, sprite.frame_count(AnimSet::Death)) {
                    self.state = NpcState::Dead;
                }
                return 0;
            }
            NpcState::Pain => {
                self.anim.tick_once(dt, sprite.frame_count(AnimSet::Pain));
                self.pain_timer -= dt;
                if self.pain_timer <= 0.0 {
                    self.state = NpcState::Chase;
                }
                return 0;
            }
            _ => {}
        }

        let visible = self.sees(grid, target);
        self.triggered |= visible;
        let mut damage = 0;

        if visible && self.pos.distance(target) <= self.stats.attack_dist {
            self.state = NpcState::Attack;
            self.anim.play(AnimSet::Attack);
            if self.anim.tick(dt, sprite.frame_count(AnimSet::Attack)) {
                events.push(SoundEvent::NpcShot);
                if rng.gen_bool(self.stats.accuracy) {
                    damage = self.stats.damage;
                }
            }
        } else if self.triggered && self.chase(grid, Grid::cell_of(target), dt, recompute_frames) {
            self.state = NpcState::Chase;
            self.anim.play(AnimSet::Walk);
            self.anim.tick(dt, sprite.frame_count(AnimSet::Walk));
        } else {
            self.state = NpcState::Idle;
            self.anim.play(AnimSet::Idle);
            self.anim.tick(dt, sprite.frame_count(AnimSet::Idle));
        }
        damage
    }

    /// Follows the cached path toward `goal`. Returns false when the goal is
    /// unreachable.
    fn chase(&mut self, grid: &Grid, goal: Cell, dt: f32, recompute_frames: u32) -> bool {
        self.frames_since_path += 1;
        if self.path.is_empty() || self.frames_since_path >= recompute_frames {
            self.frames_since_path = 0;
            let path = find_path(grid, self.cell(), goal);
            if path.is_empty() {
                self.path.clear();
                return false;
            }
            self.path = path.into_iter().collect();
            if self.path.front() == Some(&self.cell()) {
                self.path.pop_front();
            }
        }
        let Some(&next) = self.path.front() else {
            return true;
        };
        let to = Grid::cell_center(next) - self.pos;
        let step = self.stats.speed * dt;
        if to.length() <= step {
            self.slide(grid, to);
            if Grid::cell_of(self.pos) == next {
                self.path.pop_front();
            }
        } else {
            self.slide(grid, to.normalize() * step);
        }
        true
    }

    fn slide(&mut self, grid: &Grid, delta: Vec2) {
        let nx = Vec2::new(self.pos.x + delta.x, self.pos.y);
        if delta.x != 0.0 && grid.box_is_free(nx, NPC_HALF_SIZE) {
            self.pos = nx;
        }
        let ny = Vec2::new(self.pos.x, self.pos.y + delta.y);
        if delta.y != 0.0 && grid.box_is_free(ny, NPC_HALF_SIZE) {
            self.pos = ny;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn hall() -> Grid {
        Grid::parse(
            "1111111111\n\
             1........1\n\
             1........1\n\
             1111111111",
        )
        .unwrap()
    }

    fn caco(pos: Vec2) -> Npc {
        let mut rng = StdRng::seed_from_u64(1);
        Npc::new(NpcKind::CacoDemon, pos, NpcKind::CacoDemon.stats(&mut rng))
    }

    #[test]
    fn soldiers_are_the_common_pick() {
        let mut rng = StdRng::seed_from_u64(5);
        let soldiers = (0..1000).filter(|_| NpcKind::pick(&mut rng) == NpcKind::Soldier).count();
        assert!((600..800).contains(&soldiers), "{soldiers}");
    }

    #[test]
    fn soldier_attack_distance_is_rolled_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let s = NpcKind::Soldier.stats(&mut rng);
            assert!((3.0..6.0).contains(&s.attack_dist));
        }
    }

    #[test]
    fn lethal_hit_dies_then_stays_dead() {
        let g = hall();
        let mut rng = StdRng::seed_from_u64(1);
        let mut npc = caco(Vec2::new(7.5, 1.5));
        let mut events = Vec::new();
        npc.take_hit(500, &mut events);
        assert_eq!(events, vec![SoundEvent::NpcDeath]);
        assert_eq!(npc.state(), NpcState::Dying);
        assert!(!npc.is_alive());

        for _ in 0..40 {
            npc.update(&g, Vec2::new(1.5, 1.5), 0.1, 10, &mut rng, &mut events);
        }
        assert_eq!(npc.state(), NpcState::Dead);
        let b = npc.billboard();
        assert_eq!(b.set, AnimSet::Death);
        assert_eq!(b.frame, SpriteKind::CacoDemon.frame_count(AnimSet::Death) - 1);

        // corpses ignore further hits
        events.clear();
        npc.take_hit(10, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn pain_returns_to_chase() {
        let g = hall();
        let mut rng = StdRng::seed_from_u64(1);
        let mut npc = caco(Vec2::new(7.5, 1.5));
        let mut events = Vec::new();
        npc.take_hit(10, &mut events);
        assert_eq!(npc.state(), NpcState::Pain);
        assert_eq!(npc.health, 140);
        for _ in 0..10 {
            npc.update(&g, Vec2::new(1.5, 2.5), 0.1, 10, &mut rng, &mut events);
        }
        assert!(matches!(npc.state(), NpcState::Chase | NpcState::Attack));
    }

    #[test]
    fn walls_block_sight() {
        let g = Grid::parse("11111\n1.1.1\n11111").unwrap();
        let npc = caco(Vec2::new(3.5, 1.5));
        assert!(!npc.sees(&g, Vec2::new(1.5, 1.5)));
        let open = hall();
        assert!(npc.sees(&open, Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn chasing_closes_the_distance() {
        let g = hall();
        let mut rng = StdRng::seed_from_u64(3);
        let mut npc = caco(Vec2::new(8.5, 2.5));
        let target = Vec2::new(1.5, 1.5);
        let before = npc.pos.distance(target);
        let mut events = Vec::new();
        for _ in 0..10 {
            npc.update(&g, target, 0.05, 10, &mut rng, &mut events);
        }
        assert_eq!(npc.state(), NpcState::Chase);
        assert!(npc.pos.distance(target) < before);
        assert!(!g.is_wall_at(npc.pos));
    }

    #[test]
    fn cached_path_is_kept_until_the_recompute_frame() {
        let g = hall();
        let mut rng = StdRng::seed_from_u64(3);
        let mut npc = caco(Vec2::new(8.5, 1.5));
        let mut events = Vec::new();
        let frames = 5;
        npc.update(&g, Vec2::new(1.5, 1.5), 0.01, frames, &mut rng, &mut events);
        assert_eq!(npc.state(), NpcState::Chase);
        assert_eq!(npc.path.back(), Some(&(1, 1)));

        let moved = Vec2::new(1.5, 2.5);
        for _ in 1..frames {
            npc.update(&g, moved, 0.01, frames, &mut rng, &mut events);
            assert_eq!(npc.path.back(), Some(&(1, 1)));
        }
        npc.update(&g, moved, 0.01, frames, &mut rng, &mut events);
        assert_eq!(npc.path.back(), Some(&(1, 2)));
    }

    #[test]
    fn unreachable_player_leaves_npc_idle() {
        let g = Grid::parse("1111111\n1...1.1\n1111111").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut npc = caco(Vec2::new(1.5, 1.5));
        let mut events = Vec::new();
        npc.take_hit(1, &mut events);
        for _ in 0..20 {
            npc.update(&g, Vec2::new(5.5, 1.5), 0.1, 10, &mut rng, &mut events);
        }
        assert_eq!(npc.state(), NpcState::Idle);
        assert_eq!(npc.pos, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn sure_shot_attack_damages_player() {
        let g = hall();
        let mut rng = StdRng::seed_from_u64(3);
        let mut npc = caco(Vec2::new(2.2, 1.5));
        npc.stats.accuracy = 1.0;
        let mut events = Vec::new();
        let mut dealt = 0;
        for _ in 0..20 {
            dealt += npc.update(&g, Vec2::new(1.5, 1.5), 0.1, 10, &mut rng, &mut events);
        }
        assert_eq!(npc.state(), NpcState::Attack);
        assert!(dealt >= 25);
        assert!(events.contains(&SoundEvent::NpcShot));
    }

    #[test]
    fn crosshair_picks_centre_only() {
        let npc = caco(Vec2::new(5.0, 0.0));
        assert!(npc.in_crosshair(Vec2::ZERO, 0.0).is_some());
        assert!(npc.in_crosshair(Vec2::ZERO, 0.5).is_none());
    }
}
