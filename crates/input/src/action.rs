/// A decoded player command.
///
/// Keyboard, touch and on-screen buttons all produce these; the run never sees
/// raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift one lane to the left.
    MoveLaneLeft,
    /// Shift one lane to the right.
    MoveLaneRight,
    /// Return to the centre lane.
    SetLaneCenter,
    /// Tear down the track and start over.
    Restart,
    /// Unbound input.
    Noop,
}

impl Action {
    /// Map a key name (DOM `KeyboardEvent.code` style) to an action.
    pub fn from_key(code: &str) -> Self {
        match code {
            "ArrowLeft" | "KeyA" => Self::MoveLaneLeft,
            "ArrowRight" | "KeyD" => Self::MoveLaneRight,
            "ArrowUp" | "ArrowDown" | "KeyW" | "KeyS" => Self::SetLaneCenter,
            "KeyR" | "Enter" => Self::Restart,
            _ => Self::Noop,
        }
    }

    /// Map a horizontal swipe to a lane move. Swipes shorter than `threshold`
    /// (in pixels) are ignored.
    pub fn from_swipe(dx: f32, threshold: f32) -> Self {
        if dx.abs() < threshold {
            Self::Noop
        } else if dx < 0.0 {
            Self::MoveLaneLeft
        } else {
            Self::MoveLaneRight
        }
    }

    /// Parse a short action name as used in input scripts.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Self::MoveLaneLeft),
            "right" | "r" => Some(Self::MoveLaneRight),
            "center" | "centre" | "c" => Some(Self::SetLaneCenter),
            "restart" => Some(Self::Restart),
            "noop" => Some(Self::Noop),
            _ => None,
        }
    }
}
