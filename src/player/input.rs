use glam::Vec2;

/// Discrete intents delivered once per frame by the input layer.
#[derive(Default, Clone, Copy, Debug)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub break_block: bool,
    pub reset_position: bool,
    /// Mouse movement since the last frame in screen units, y growing downward.
    pub look_delta: Vec2,
}
