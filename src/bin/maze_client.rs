use anyhow::Context;
use raylib::prelude::*;

use doom_raycaster::net::arena::{Arena, PLAYER_SIZE};
use doom_raycaster::net::client::Client;
use doom_raycaster::net::protocol::Direction;
use doom_raycaster::net::CLIENT_FPS;
use doom_raycaster::{init_logging, Settings};

const PLAYER_COLORS: [Color; 4] = [Color::RED, Color::GREEN, Color::BLUE, Color::MAGENTA];

/// Host from `MAZE_HOST`, defaulting to localhost.
fn server_host() -> String {
    std::env::var("MAZE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

fn held_direction(rl: &RaylibHandle) -> Option<Direction> {
    if rl.is_key_down(KeyboardKey::KEY_UP) { return Some(Direction::Up); }
    if rl.is_key_down(KeyboardKey::KEY_DOWN) { return Some(Direction::Down); }
    if rl.is_key_down(KeyboardKey::KEY_LEFT) { return Some(Direction::Left); }
    if rl.is_key_down(KeyboardKey::KEY_RIGHT) { return Some(Direction::Right); }
    None
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let settings = Settings::from_args().context("loading settings")?;
    let host = server_host();
    let mut client = Client::connect((host.as_str(), settings.net_port))
        .with_context(|| format!("connecting to {host}:{}", settings.net_port))?;

    let (w, h) = settings.arena_size;
    let arena = Arena::new(w, h);
    let (mut window, raylib_thread) = raylib::init()
        .size(w as i32, h as i32)
        .title("Maze chase")
        .build();
    window.set_target_fps(CLIENT_FPS);

    while !window.window_should_close() && client.is_connected() {
        if let Some(dir) = held_direction(&window) {
            client.send(dir)?;
        }
        client.poll();
        let me = client.local_addr();
        let reached = client.position().is_some_and(|p| arena.in_finish(p));

        let mut d = window.begin_drawing(&raylib_thread);
        d.clear_background(Color::BLACK);
        for wall in &arena.walls {
            d.draw_rectangle(wall.x, wall.y, wall.w, wall.h, Color::new(100, 100, 100, 255));
            d.draw_rectangle_lines(wall.x, wall.y, wall.w, wall.h, Color::WHITE);
        }
        let f = arena.finish;
        d.draw_rectangle(f.x, f.y, f.w, f.h, Color::new(218, 165, 32, 255));
        d.draw_rectangle_lines(f.x, f.y, f.w, f.h, Color::WHITE);

        for (i, (addr, &(x, y))) in client.snapshot().players.iter().enumerate() {
            let color = PLAYER_COLORS[i % PLAYER_COLORS.len()];
            d.draw_circle(x, y, PLAYER_SIZE as f32, color);
            if *addr == me {
                d.draw_circle_lines(x, y, PLAYER_SIZE as f32 + 2.0, Color::WHITE);
            }
        }
        if reached {
            d.draw_text("FINISH!", 10, 10, 30, Color::GOLD);
        }
    }
    Ok(())
}
