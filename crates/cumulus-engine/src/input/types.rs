/// Keyboard key identifier, mapped from the physical key position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,

    /// Platform key the viewer does not bind.
    Unknown,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` comes from notched wheels; `Pixel` from touchpads and other
/// high-precision devices, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Pixels treated as one wheel line when normalizing precise deltas.
    pub const PIXELS_PER_LINE: f32 = 20.0;

    /// Delta expressed in wheel lines; positive `y` scrolls up / away.
    pub fn lines(self) -> (f32, f32) {
        match self {
            MouseWheelDelta::Line { x, y } => (x, y),
            MouseWheelDelta::Pixel { x, y } => {
                (x / Self::PIXELS_PER_LINE, y / Self::PIXELS_PER_LINE)
            }
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, state: KeyState },

    MouseWheel { delta: MouseWheelDelta },

    /// Window focus change.
    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_delta_passes_through() {
        assert_eq!(MouseWheelDelta::Line { x: 0.0, y: -1.0 }.lines(), (0.0, -1.0));
    }

    #[test]
    fn pixel_delta_is_normalized() {
        let d = MouseWheelDelta::Pixel { x: 0.0, y: 40.0 };
        assert_eq!(d.lines(), (0.0, 2.0));
    }
}
