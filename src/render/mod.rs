//! Software renderer.
//!
//! Re-exports:
//! - `color`: RGBA8 colour
//! - `framebuffer`: CPU framebuffer and effects
//! - `textures`: pixmap store with procedural fallbacks
//! - `casters`: DDA ray marching
//! - `depth_buffer`: per-column wall depth
//! - `render3d`: column renderer and frame entry point
//! - `sprites`: billboard projection and sorting
//! - `hud`: weapon, counters and minimap

pub mod casters;
pub mod color;
pub mod depth_buffer;
pub mod framebuffer;
pub mod hud;
pub mod render3d;
pub mod sprites;
pub mod textures;

pub use render3d::render_frame;
