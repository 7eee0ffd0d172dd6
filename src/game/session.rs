//! One game in progress: the grid, the player, the weapon and every object,
//! stepped together by `update`.
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::{Error, Result};
use crate::game::input::Intents;
use crate::game::maze::Grid;
use crate::game::object_handler::{FrameContext, ObjectHandler};
use crate::game::player::Player;
use crate::game::weapon::Weapon;
use crate::settings::Settings;

/// Something the audio layer should play this frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Shotgun,
    NpcPain,
    NpcDeath,
    NpcShot,
    PlayerPain,
    Pickup,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 6] = [
        SoundEvent::Shotgun,
        SoundEvent::NpcPain,
        SoundEvent::NpcDeath,
        SoundEvent::NpcShot,
        SoundEvent::PlayerPain,
        SoundEvent::Pickup,
    ];

    /// File stem looked up in the sound directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            SoundEvent::Shotgun => "shotgun",
            SoundEvent::NpcPain => "npc_pain",
            SoundEvent::NpcDeath => "npc_death",
            SoundEvent::NpcShot => "npc_attack",
            SoundEvent::PlayerPain => "player_pain",
            SoundEvent::Pickup => "pickup",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
    Won,
}

pub struct Session {
    pub settings: Settings,
    pub grid: Grid,
    pub player: Player,
    pub weapon: Weapon,
    pub objects: ObjectHandler,
    status: Status,
    /// Seconds spent in a terminal status.
    status_timer: f32,
    rng: StdRng,
}

impl Session {
    /// Fails when the configured player start is off the grid or too close
    /// to a wall for the player to move.
    pub fn new(settings: Settings, grid: Grid, seed: u64) -> Result<Self> {
        let (x, y) = settings.player_start;
        let start = Vec2::new(x, y);
        if !grid.in_bounds(Grid::cell_of(start)) {
            return Err(Error::Map(format!(
                "player start ({x}, {y}) is outside the {}x{} map",
                grid.width(),
                grid.height()
            )));
        }
        if !grid.box_is_free(start, settings.player_half_size) {
            return Err(Error::Map(format!("player start ({x}, {y}) overlaps a wall")));
        }
        Ok(Self::fresh(settings, grid, seed))
    }

    fn fresh(settings: Settings, grid: Grid, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let player = Player::new(&settings);
        let objects = ObjectHandler::populate(&grid, player.cell(), settings.npc_count, &mut rng);
        let weapon = Weapon::new(&settings);
        log::info!("new game on a {}x{} map, seed {seed:#x}", grid.width(), grid.height());
        Self { settings, grid, player, weapon, objects, status: Status::Playing, status_timer: 0.0, rng }
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Steps the whole game by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &Intents) -> Vec<SoundEvent> {
        let mut events = Vec::new();
        if self.status != Status::Playing {
            self.status_timer += dt;
            if self.status_timer >= self.settings.restart_delay {
                self.restart();
            }
            return events;
        }

        self.player.update(&self.grid, input, dt);
        self.weapon.update(dt);
        if input.fire && self.weapon.trigger(&mut self.player.ammo) {
            events.push(SoundEvent::Shotgun);
            self.objects.resolve_shot(&self.grid, self.player.pos, self.player.a, self.weapon.damage, &mut events);
        }

        let ctx = FrameContext { grid: &self.grid, dt, recompute_frames: self.settings.path_recompute_frames };
        let damage = self.objects.update(&ctx, &mut self.player, &mut self.rng, &mut events);
        if damage > 0 {
            self.player.take_damage(damage);
            events.push(SoundEvent::PlayerPain);
        }

        if self.player.is_dead() {
            log::info!("game over");
            self.enter(Status::GameOver);
        } else if self.objects.all_dead() {
            log::info!("every npc is down");
            self.enter(Status::Won);
        }
        events
    }

    fn enter(&mut self, status: Status) {
        self.status = status;
        self.status_timer = 0.0;
    }

    /// Fresh player, weapon and objects on the same grid.
    fn restart(&mut self) {
        let seed = self.rng.next_u64();
        *self = Session::fresh(self.settings.clone(), self.grid.clone(), seed);
    }
}
