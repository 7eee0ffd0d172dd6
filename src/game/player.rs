use glam::Vec2;

use crate::game::input::Intents;
use crate::game::maze::{Cell, Grid};
use crate::game::normalize_angle;
use crate::settings::Settings;

const SPRINT_FACTOR: f32 = 1.7;
/// Seconds the red damage flash stays on screen.
const DAMAGE_FLASH: f32 = 0.25;

pub struct Player {
    pub pos: Vec2,
    pub a: f32,            // yaw, [0, 2π)
    pub speed: f32,
    pub rot_speed: f32,
    pub mouse_sens: f32,
    pub half_size: f32,
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub sprinting: bool,
    pub damage_flash: f32,
    recover_interval: f32,
    recover_timer: f32,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let (x, y) = settings.player_start;
        Self {
            pos: Vec2::new(x, y),
            a: normalize_angle(settings.player_angle),
            speed: settings.player_speed,
            rot_speed: settings.player_rot_speed,
            mouse_sens: settings.mouse_sensitivity,
            half_size: settings.player_half_size,
            health: settings.player_max_health,
            max_health: settings.player_max_health,
            ammo: settings.player_start_ammo,
            sprinting: false,
            damage_flash: 0.0,
            recover_interval: settings.recover_interval,
            recover_timer: 0.0,
        }
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        Vec2::from_angle(self.a)
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        Grid::cell_of(self.pos)
    }

    pub fn update(&mut self, grid: &Grid, input: &Intents, dt: f32) {
        self.rotate(input.turn * self.rot_speed * dt + input.look_delta * self.mouse_sens);

        self.sprinting = input.sprint;
        let right = self.dir().perp();
        let mut wish = self.dir() * input.forward + right * input.strafe;
        if wish.length_squared() > 1.0 {
            wish = wish.normalize();
        }
        let speed = if self.sprinting { self.speed * SPRINT_FACTOR } else { self.speed };
        self.try_move(grid, wish * speed * dt);

        self.recover(dt);
        self.damage_flash = (self.damage_flash - dt).max(0.0);
    }

    pub fn rotate(&mut self, delta: f32) {
        self.a = normalize_angle(self.a + delta);
    }

    /// Applies each axis on its own so a blocked axis does not stop the other.
    /// Returns true if the player moved at all.
    pub fn try_move(&mut self, grid: &Grid, delta: Vec2) -> bool {
        let mut moved = false;
        let nx = Vec2::new(self.pos.x + delta.x, self.pos.y);
        if delta.x != 0.0 && grid.box_is_free(nx, self.half_size) {
            self.pos = nx;
            moved = true;
        }
        let ny = Vec2::new(self.pos.x, self.pos.y + delta.y);
        if delta.y != 0.0 && grid.box_is_free(ny, self.half_size) {
            self.pos = ny;
            moved = true;
        }
        moved
    }

    fn recover(&mut self, dt: f32) {
        if self.health <= 0 || self.health >= self.max_health {
            self.recover_timer = 0.0;
            return;
        }
        self.recover_timer += dt;
        while self.recover_timer >= self.recover_interval && self.health < self.max_health {
            self.recover_timer -= self.recover_interval;
            self.health += 1;
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
        self.damage_flash = DAMAGE_FLASH;
        log::debug!("player hit for {amount}, health {}", self.health);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}
