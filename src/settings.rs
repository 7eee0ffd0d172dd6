//! Engine tunables.
//!
//! Defaults live in code; a JSON file may override any subset of fields.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Shading never drops below this factor.
pub const MIN_BRIGHTNESS: f32 = 0.18;
/// Hard cap on DDA iterations for a single ray.
pub const MAX_STEPS: usize = 512;
/// Sprites nearer than this (perpendicular) are not drawn.
pub const MIN_SPRITE_DEPTH: f32 = 0.3;
/// Distance at which pickups are collected.
pub const PICKUP_RADIUS: f32 = 0.5;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Window scale applied by the frontend when presenting.
    pub window_scale: u32,
    pub fov: f32,
    pub max_depth: f32,

    pub player_start: (f32, f32),
    pub player_angle: f32,
    /// Cells per second.
    pub player_speed: f32,
    /// Radians per second for keyboard turning.
    pub player_rot_speed: f32,
    pub mouse_sensitivity: f32,
    /// Half extent of the player's collision box, in cells.
    pub player_half_size: f32,
    pub player_max_health: i32,
    pub player_start_ammo: u32,
    /// Seconds per recovered health point.
    pub recover_interval: f32,

    pub weapon_damage: i32,
    /// Seconds from trigger to ready.
    pub weapon_cooldown: f32,
    /// Portion of the cooldown spent in the firing phase.
    pub weapon_fire_time: f32,

    pub npc_count: usize,
    pub path_recompute_frames: u32,
    /// Seconds a finished game stays on screen before restarting.
    pub restart_delay: f32,
    pub seed: u64,

    /// TCP port of the maze-chase server.
    pub net_port: u16,
    /// Maze-chase arena in pixels; the wall layout scales to it.
    pub arena_size: (u32, u32),
    pub map_path: Option<PathBuf>,
    pub texture_dir: Option<PathBuf>,
    pub sound_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 360,
            window_scale: 2,
            fov: std::f32::consts::FRAC_PI_3,
            max_depth: 20.0,
            player_start: (1.5, 5.0),
            player_angle: 0.0,
            player_speed: 3.0,
            player_rot_speed: 2.0,
            mouse_sensitivity: 0.003,
            player_half_size: 0.2,
            player_max_health: 100,
            player_start_ammo: 50,
            recover_interval: 0.7,
            weapon_damage: 50,
            weapon_cooldown: 0.6,
            weapon_fire_time: 0.15,
            npc_count: 12,
            path_recompute_frames: 10,
            restart_delay: 1.5,
            seed: 0x5eed,
            net_port: 12345,
            arena_size: (800, 600),
            map_path: None,
            texture_dir: None,
            sound_dir: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the first CLI argument, or defaults when none is given.
    pub fn from_args() -> Result<Self> {
        match std::env::args().nth(1) {
            Some(p) => Self::load(Path::new(&p)),
            None => Ok(Self::default()),
        }
    }
}
