//! Game state and logic (grid, player, weapon, NPCs, session).
//!
//! Re-exports:
//! - `maze`: grid loading and queries
//! - `pathfinding`: BFS over the grid
//! - `player`: player state, movement and health
//! - `input`: per-frame intents
//! - `weapon`: fire/cooldown state machine
//! - `sprite`: decorations, pickups and animation clocks
//! - `npc`: NPC kinds and behaviour
//! - `object_handler`: owns sprites and NPCs
//! - `session`: the per-game context passed through update and render

pub mod input;
pub mod maze;
pub mod npc;
pub mod object_handler;
pub mod pathfinding;
pub mod player;
pub mod session;
pub mod sprite;
pub mod weapon;

use std::f32::consts::{PI, TAU};

/// Wraps an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    let r = a.rem_euclid(TAU);
    if r >= TAU { 0.0 } else { r }
}

/// Wraps an angle difference into `[-π, π]`.
#[inline]
pub fn wrap_pi(mut a: f32) -> f32 {
    while a > PI {
        a -= TAU;
    }
    while a < -PI {
        a += TAU;
    }
    a
}
