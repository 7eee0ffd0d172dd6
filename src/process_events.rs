use raylib::prelude::*;

use doom_raycaster::game::input::Intents;

fn axis(rl: &RaylibHandle, pos: KeyboardKey, neg: KeyboardKey) -> f32 {
    let mut v = 0.0;
    if rl.is_key_down(pos) { v += 1.0; }
    if rl.is_key_down(neg) { v -= 1.0; }
    v
}

/// WASD to move, arrows or mouse to turn, left click or space to fire
/// (once per press), shift to sprint.
pub fn process_events(rl: &RaylibHandle) -> Intents {
    Intents {
        forward: axis(rl, KeyboardKey::KEY_W, KeyboardKey::KEY_S),
        strafe: axis(rl, KeyboardKey::KEY_D, KeyboardKey::KEY_A),
        turn: axis(rl, KeyboardKey::KEY_RIGHT, KeyboardKey::KEY_LEFT),
        look_delta: rl.get_mouse_delta().x,
        fire: rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) || rl.is_key_pressed(KeyboardKey::KEY_SPACE),
        sprint: rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT),
    }
}
