//! DOOM-style raycasting engine.
//!
//! Modules:
//! - `game`: grid, player, weapon, NPCs, pathfinding and the session context
//! - `render`: framebuffer, textures, ray casting and the column renderer
//! - `net`: multiplayer maze-chase server/client
//! - `settings`: tunables with JSON overrides
//! - `audio_manager`: rodio playback of session sound events (feature `audio`)

pub mod error;
pub mod game;
pub mod net;
pub mod render;
pub mod settings;

#[cfg(feature = "audio")]
pub mod audio_manager;

pub use error::{Error, Result};
pub use settings::Settings;

/// Installs the `env_logger` backend. `RUST_LOG` overrides the default level.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
