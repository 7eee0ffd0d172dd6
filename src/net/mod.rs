//! Multiplayer maze chase over TCP.
//!
//! - `arena`: wall layout and the move rule
//! - `protocol`: direction tokens and snapshot frames
//! - `server`: thread-per-client server with one shared state
//! - `client`: connection with a background reader

pub mod arena;
pub mod client;
pub mod protocol;
pub mod server;

/// Frame rate of the maze client.
pub const CLIENT_FPS: u32 = 30;
