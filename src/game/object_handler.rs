//! Owns every sprite and NPC in the level and updates them once per frame.
use glam::Vec2;
use rand::Rng;

use crate::game::maze::{Cell, Grid};
use crate::game::npc::{Npc, NpcKind};
use crate::game::player::Player;
use crate::game::session::SoundEvent;
use crate::game::sprite::{Billboard, Pickup, Sprite, SpriteKind};
use crate::settings::PICKUP_RADIUS;

/// NPCs never spawn within this many cells of the player start (Chebyshev).
const RESTRICTED_RADIUS: i32 = 4;

/// Decorations and pickups placed on the level, in world coordinates.
const PLACED: &[(SpriteKind, f32, f32)] = &[
    (SpriteKind::Candlebra, 1.5, 1.5),
    (SpriteKind::Candlebra, 1.5, 7.5),
    (SpriteKind::Candlebra, 1.5, 14.5),
    (SpriteKind::Candlebra, 7.5, 14.5),
    (SpriteKind::GreenLight, 14.5, 1.5),
    (SpriteKind::GreenLight, 30.5, 1.5),
    (SpriteKind::RedLight, 30.5, 14.5),
    (SpriteKind::RedLight, 11.5, 12.5),
    (SpriteKind::Medkit, 8.5, 6.5),
    (SpriteKind::Medkit, 20.5, 10.5),
    (SpriteKind::AmmoBox, 18.5, 3.5),
    (SpriteKind::AmmoBox, 28.5, 8.5),
];

/// Per-frame inputs the handler needs from the session.
pub struct FrameContext<'a> {
    pub grid: &'a Grid,
    pub dt: f32,
    pub recompute_frames: u32,
}

#[derive(Default)]
pub struct ObjectHandler {
    pub sprites: Vec<Sprite>,
    pub npcs: Vec<Npc>,
}

impl ObjectHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the fixed sprites, then `npc_count` NPCs away from `start`.
    pub fn populate<R: Rng + ?Sized>(grid: &Grid, start: Cell, npc_count: usize, rng: &mut R) -> Self {
        let mut handler = Self::new();
        for &(kind, x, y) in PLACED {
            let pos = Vec2::new(x, y);
            if grid.is_wall_at(pos) {
                log::debug!("skipping {} at ({x}, {y}): inside a wall", kind.name());
                continue;
            }
            handler.add_sprite(Sprite::new(kind, pos));
        }
        handler.spawn_npcs(grid, start, npc_count, rng);
        handler
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn add_npc(&mut self, npc: Npc) {
        self.npcs.push(npc);
    }

    /// Spawns up to `count` NPCs on distinct empty cells outside the restricted
    /// area, picking kinds by weight.
    pub fn spawn_npcs<R: Rng + ?Sized>(&mut self, grid: &Grid, start: Cell, count: usize, rng: &mut R) {
        let mut free: Vec<Cell> = grid
            .empty_cells()
            .filter(|&(i, j)| (i - start.0).abs().max((j - start.1).abs()) > RESTRICTED_RADIUS)
            .collect();

        for n in 0..count {
            if free.is_empty() {
                log::warn!("only {n} of {count} npcs fit on the map");
                break;
            }
            let cell = free.swap_remove(rng.gen_range(0..free.len()));
            let kind = NpcKind::pick(rng);
            let stats = kind.stats(rng);
            self.add_npc(Npc::new(kind, Grid::cell_center(cell), stats));
        }
        log::info!("spawned {} npcs", self.npcs.len());
    }

    /// Applies a shot from `eye` along `angle` to the nearest visible living
    /// NPC under the crosshair. Returns true if something was hit.
    pub fn resolve_shot(
        &mut self,
        grid: &Grid,
        eye: Vec2,
        angle: f32,
        damage: i32,
        events: &mut Vec<SoundEvent>,
    ) -> bool {
        let target = self
            .npcs
            .iter_mut()
            .filter(|n| n.is_alive())
            .filter_map(|n| n.in_crosshair(eye, angle).map(|d| (d, n)))
            .filter(|(_, n)| n.sees(grid, eye))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        match target {
            Some((_, npc)) => {
                npc.take_hit(damage, events);
                true
            }
            None => false,
        }
    }

    /// Animations, pickups and NPC behaviour for one frame. Returns the total
    /// damage dealt to the player.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &FrameContext<'_>,
        player: &mut Player,
        rng: &mut R,
        events: &mut Vec<SoundEvent>,
    ) -> i32 {
        for sprite in self.sprites.iter_mut().filter(|s| s.alive) {
            sprite.update(ctx.dt);
            let Some(pickup) = sprite.kind.pickup() else { continue };
            if sprite.pos.distance(player.pos) > PICKUP_RADIUS {
                continue;
            }
            match pickup {
                Pickup::Health(n) => player.heal(n),
                Pickup::Ammo(n) => player.ammo += n,
            }
            sprite.alive = false;
            events.push(SoundEvent::Pickup);
        }

        self.npcs
            .iter_mut()
            .map(|npc| npc.update(ctx.grid, player.pos, ctx.dt, ctx.recompute_frames, rng, events))
            .sum()
    }

    pub fn all_dead(&self) -> bool {
        self.npcs.iter().all(|n| !n.is_alive())
    }

    pub fn billboards(&self) -> Vec<Billboard> {
        self.sprites
            .iter()
            .filter(|s| s.alive)
            .map(Sprite::billboard)
            .chain(self.npcs.iter().map(Npc::billboard))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_room() -> Grid {
        Grid::parse(
            "111111111111\n\
             1..........1\n\
             1..........1\n\
             1..........1\n\
             111111111111",
        )
        .unwrap()
    }

    #[test]
    fn spawns_avoid_walls_and_start_area() {
        let g = Grid::default_map();
        let mut rng = StdRng::seed_from_u64(11);
        let start = (1, 5);
        let h = ObjectHandler::populate(&g, start, 20, &mut rng);
        assert_eq!(h.npcs.len(), 20);
        for npc in &h.npcs {
            let (i, j) = npc.cell();
            assert!(!g.is_wall((i, j)));
            assert!((i - start.0).abs().max((j - start.1).abs()) > RESTRICTED_RADIUS);
        }
        let mut cells: Vec<Cell> = h.npcs.iter().map(Npc::cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 20);
        assert!(h.sprites.iter().all(|s| !g.is_wall_at(s.pos)));
    }

    #[test]
    fn spawning_stops_when_the_map_is_full() {
        let g = open_room();
        let mut rng = StdRng::seed_from_u64(1);
        let mut h = ObjectHandler::new();
        h.spawn_npcs(&g, (1, 1), 100, &mut rng);
        // 10x3 floor, columns 1..=5 are inside the restricted square
        assert_eq!(h.npcs.len(), 15);
    }

    #[test]
    fn pickups_are_collected_once() {
        let g = open_room();
        let mut rng = StdRng::seed_from_u64(1);
        let mut h = ObjectHandler::new();
        h.add_sprite(Sprite::new(SpriteKind::AmmoBox, Vec2::new(3.5, 2.5)));
        h.add_sprite(Sprite::new(SpriteKind::Medkit, Vec2::new(9.5, 2.5)));
        let mut player = Player::new(&Settings::default());
        player.pos = Vec2::new(3.3, 2.5);
        let ammo = player.ammo;
        let ctx = FrameContext { grid: &g, dt: 0.016, recompute_frames: 10 };

        let mut events = Vec::new();
        h.update(&ctx, &mut player, &mut rng, &mut events);
        h.update(&ctx, &mut player, &mut rng, &mut events);
        assert_eq!(player.ammo, ammo + 10);
        assert_eq!(events, vec![SoundEvent::Pickup]);
        assert_eq!(h.billboards().len(), 1);
    }

    #[test]
    fn shot_hits_nearest_npc_only() {
        let g = open_room();
        let mut rng = StdRng::seed_from_u64(1);
        let mut h = ObjectHandler::new();
        for x in [8.5, 5.5] {
            let kind = NpcKind::CyberDemon;
            h.add_npc(Npc::new(kind, Vec2::new(x, 2.5), kind.stats(&mut rng)));
        }
        let mut events = Vec::new();
        assert!(h.resolve_shot(&g, Vec2::new(1.5, 2.5), 0.0, 50, &mut events));
        assert_eq!(h.npcs[0].health, 350);
        assert_eq!(h.npcs[1].health, 300);
        assert_eq!(events, vec![SoundEvent::NpcPain]);

        assert!(!h.resolve_shot(&g, Vec2::new(1.5, 2.5), std::f32::consts::PI, 50, &mut events));
    }

    #[test]
    fn walls_stop_shots() {
        let g = Grid::parse("1111111\n1..1..1\n1111111").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut h = ObjectHandler::new();
        let kind = NpcKind::Soldier;
        h.add_npc(Npc::new(kind, Vec2::new(5.5, 1.5), kind.stats(&mut rng)));
        let mut events = Vec::new();
        assert!(!h.resolve_shot(&g, Vec2::new(1.5, 1.5), 0.0, 50, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn victory_needs_every_npc_down() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut h = ObjectHandler::new();
        let kind = NpcKind::Soldier;
        h.add_npc(Npc::new(kind, Vec2::new(5.5, 1.5), kind.stats(&mut rng)));
        h.add_npc(Npc::new(kind, Vec2::new(6.5, 1.5), kind.stats(&mut rng)));
        assert!(!h.all_dead());
        let mut events = Vec::new();
        h.npcs[0].take_hit(1000, &mut events);
        assert!(!h.all_dead());
        h.npcs[1].take_hit(1000, &mut events);
        assert!(h.all_dead());
    }
}
