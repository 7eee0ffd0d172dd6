//! Shotgun state machine: idle → firing → recovery → idle, driven by frame dt.
use crate::settings::Settings;

pub const WEAPON_FRAMES: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WeaponState {
    Idle,
    Firing,
    Recovery,
}

pub struct Weapon {
    pub damage: i32,
    state: WeaponState,
    elapsed: f32,
    cooldown: f32,
    fire_time: f32,
}

impl Weapon {
    pub fn new(settings: &Settings) -> Self {
        Self {
            damage: settings.weapon_damage,
            state: WeaponState::Idle,
            elapsed: 0.0,
            cooldown: settings.weapon_cooldown,
            fire_time: settings.weapon_fire_time.min(settings.weapon_cooldown),
        }
    }

    #[inline]
    pub fn state(&self) -> WeaponState {
        self.state
    }

    /// Pulls the trigger. Returns true when a shot actually goes off, which
    /// only happens from `Idle` with ammo left.
    pub fn trigger(&mut self, ammo: &mut u32) -> bool {
        if self.state != WeaponState::Idle || *ammo == 0 {
            return false;
        }
        *ammo -= 1;
        self.state = WeaponState::Firing;
        self.elapsed = 0.0;
        true
    }

    pub fn update(&mut self, dt: f32) {
        if self.state == WeaponState::Idle {
            return;
        }
        self.elapsed += dt;
        if self.state == WeaponState::Firing && self.elapsed >= self.fire_time {
            self.state = WeaponState::Recovery;
        }
        if self.state == WeaponState::Recovery && self.elapsed >= self.cooldown {
            self.state = WeaponState::Idle;
            self.elapsed = 0.0;
        }
    }

    /// Animation frame for the overlay, 0 when idle.
    pub fn frame(&self) -> usize {
        match self.state {
            WeaponState::Idle => 0,
            _ => {
                let t = (self.elapsed / self.cooldown).clamp(0.0, 0.999);
                (t * WEAPON_FRAMES as f32) as usize
            }
        }
    }
}
