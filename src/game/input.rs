/// Per-frame movement, look and fire intents, filled by the frontend.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Intents {
    /// +1 forward, -1 back.
    pub forward: f32,
    /// +1 right, -1 left.
    pub strafe: f32,
    /// Keyboard turning, +1 clockwise.
    pub turn: f32,
    /// Mouse delta in pixels since the last frame.
    pub look_delta: f32,
    /// Trigger pressed this frame.
    pub fire: bool,
    pub sprint: bool,
}
