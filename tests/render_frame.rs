use doom_raycaster::game::input::Intents;
use doom_raycaster::game::maze::Grid;
use doom_raycaster::game::session::{Session, Status};
use doom_raycaster::render::color::Color;
use doom_raycaster::render::depth_buffer::DepthBuffer;
use doom_raycaster::render::framebuffer::Framebuffer;
use doom_raycaster::render::render_frame;
use doom_raycaster::render::textures::TextureManager;
use doom_raycaster::Settings;

fn session() -> Session {
    let settings = Settings { screen_width: 160, screen_height: 90, npc_count: 6, ..Settings::default() };
    Session::new(settings, Grid::default_map(), 42).unwrap()
}

#[test]
fn default_map_validates_against_builtin_textures() {
    let tm = TextureManager::procedural();
    assert!(tm.validate(&Grid::default_map()).is_ok());
}

#[test]
fn full_frame_fills_every_pixel_and_column() {
    let s = session();
    let tm = TextureManager::procedural();
    let mut fb = Framebuffer::new(160, 90);
    fb.set_background_color(Color::BLANK);
    fb.clear();
    let mut depth = DepthBuffer::new(160, s.settings.max_depth);

    render_frame(&mut fb, &mut depth, &s, &tm, true);

    assert!(fb.color_buffer.iter().all(|&c| c != Color::BLANK));
    assert!(depth.as_slice().iter().all(|&d| d > 0.0 && d <= s.settings.max_depth));
}

#[test]
fn frames_keep_rendering_while_the_game_runs() {
    let mut s = session();
    let tm = TextureManager::procedural();
    let mut fb = Framebuffer::new(160, 90);
    let mut depth = DepthBuffer::new(160, s.settings.max_depth);
    let input = Intents { forward: 1.0, turn: 0.3, fire: true, ..Default::default() };

    for _ in 0..120 {
        s.update(1.0 / 60.0, &input);
        render_frame(&mut fb, &mut depth, &s, &tm, false);
        assert!(!s.grid.is_wall_at(s.player.pos));
    }
    assert!(matches!(s.status(), Status::Playing | Status::GameOver | Status::Won));
}

#[test]
fn mismatched_depth_buffer_is_resized_to_the_frame() {
    let s = session();
    let tm = TextureManager::procedural();
    let mut fb = Framebuffer::new(160, 90);
    let mut depth = DepthBuffer::new(40, s.settings.max_depth);

    render_frame(&mut fb, &mut depth, &s, &tm, false);

    assert_eq!(depth.len(), 160);
    assert!(depth.as_slice().iter().all(|&d| d > 0.0 && d <= s.settings.max_depth));
}
