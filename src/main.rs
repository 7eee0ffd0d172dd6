mod process_events;

use anyhow::{anyhow, Context};
use raylib::prelude::*;

use doom_raycaster::game::maze::Grid;
use doom_raycaster::game::session::{Session, Status};
use doom_raycaster::render::depth_buffer::DepthBuffer;
use doom_raycaster::render::framebuffer::Framebuffer;
use doom_raycaster::render::render_frame;
use doom_raycaster::render::textures::TextureManager;
use doom_raycaster::{init_logging, Settings};
use process_events::process_events;

/// Frame times above this are clamped so a stall does not teleport anything.
const MAX_DT: f32 = 0.1;

fn main() -> anyhow::Result<()> {
    init_logging();
    let settings = Settings::from_args().context("loading settings")?;

    let grid = match &settings.map_path {
        Some(p) => Grid::load(p).with_context(|| format!("loading map {}", p.display()))?,
        None => Grid::default_map(),
    };
    let texman = match &settings.texture_dir {
        Some(d) => TextureManager::load(d)?,
        None => TextureManager::procedural(),
    };
    texman.validate(&grid)?;

    let (w, h) = (settings.screen_width, settings.screen_height);
    let scale = settings.window_scale.max(1);
    let (mut window, raylib_thread) = raylib::init()
        .size((w * scale) as i32, (h * scale) as i32)
        .title("Raycaster")
        .build();
    window.disable_cursor();
    window.set_target_fps(60);

    let image = Image::gen_image_color(w as i32, h as i32, Color::BLACK);
    let mut screen = window
        .load_texture_from_image(&raylib_thread, &image)
        .map_err(|e| anyhow!("screen texture: {e}"))?;

    #[cfg(feature = "audio")]
    let audio = {
        let mut audio = doom_raycaster::audio_manager::AudioManager::new();
        if let (Some(a), Some(dir)) = (audio.as_mut(), settings.sound_dir.as_deref()) {
            a.load_dir(dir);
            a.play_music_loop(dir);
        }
        audio
    };

    let mut framebuffer = Framebuffer::new(w, h);
    let mut depth = DepthBuffer::new(w as usize, settings.max_depth);
    let mut session = Session::new(settings.clone(), grid, settings.seed)?;
    let mut show_map = false;

    while !window.window_should_close() {
        if window.is_key_pressed(KeyboardKey::KEY_M) {
            show_map = !show_map;
        }
        let dt = window.get_frame_time().min(MAX_DT);
        let intents = process_events(&window);
        let _events = session.update(dt, &intents);
        #[cfg(feature = "audio")]
        {
            if let Some(a) = &audio {
                a.play_all(&_events);
            }
        }

        render_frame(&mut framebuffer, &mut depth, &session, &texman, show_map);
        framebuffer.upload_to_texture(&mut screen);

        let fps_now = window.get_fps();
        let sprint_on = session.player.sprinting;
        let status = session.status();
        {
            let mut d = window.begin_drawing(&raylib_thread);
            d.clear_background(Color::BLACK);
            d.draw_texture_ex(&screen, Vector2::new(0.0, 0.0), 0.0, scale as f32, Color::WHITE);

            d.draw_text(&format!("FPS: {}", fps_now), 10, 10, 20, Color::WHITE);
            if sprint_on {
                d.draw_text("SPRINT", 10, 40, 20, Color::RED);
            }
            let banner = match status {
                Status::Playing => None,
                Status::GameOver => Some(("GAME OVER", Color::RED)),
                Status::Won => Some(("YOU WIN", Color::GOLD)),
            };
            if let Some((text, color)) = banner {
                let size = 60;
                let tw = measure_text(text, size);
                let cx = (w * scale) as i32 / 2 - tw / 2;
                let cy = (h * scale) as i32 / 2 - size / 2;
                d.draw_text(text, cx, cy, size, color);
            }
        }
    }
    Ok(())
}
