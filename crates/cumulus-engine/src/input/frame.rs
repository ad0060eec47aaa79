use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas.
///
/// `InputState` provides the held keys; `InputFrame` provides what changed
/// since the last frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame (repeats excluded).
    pub keys_pressed: HashSet<Key>,

    /// Accumulated vertical wheel motion this frame, in lines.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.wheel_lines = 0.0;
    }

    /// True if something an app reacts to arrived: a fresh key press or wheel motion.
    ///
    /// Releases and focus changes alone do not warrant a redraw.
    pub fn needs_frame(&self) -> bool {
        !self.keys_pressed.is_empty() || self.wheel_lines != 0.0
    }
}
