//=========================================================================
// Input Event Types
//
// Defines the engine-side representation of raw device events.
//
// This module abstracts host-specific input (e.g. Winit) into already
// dispatched payloads the input state can consume.
//
// Responsibilities:
// - Represent pointer, key, button and wheel events in a portable way
// - Carry host timestamps where held-duration tracking needs them
// - Describe the surface's on-screen box for pointer remapping
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputState (pointer vector, held keys, press timestamps)
//         ↓
//    Game / SpriteBehavior hooks
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts platform-specific button representations into a stable enum.
/// The numeric conversion follows the browser convention (0 = left,
/// 1 = middle, 2 = right); anything else is carried in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Middle button (wheel click).
    Middle,

    /// Secondary button (typically right).
    Right,

    /// Side buttons, thumb buttons, macro keys.
    Other(u16),
}

impl MouseButton {
    /// Browser-style button index.
    pub fn index(self) -> u16 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
            Self::Other(n) => n,
        }
    }
}

impl From<u16> for MouseButton {
    fn from(index: u16) -> Self {
        match index {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            n => Self::Other(n),
        }
    }
}

//=== InputEvent ==========================================================

/// Raw input event as delivered by the host.
///
/// Pointer coordinates are client coordinates (logical pixels relative to
/// the host window), not surface pixels; remapping happens in
/// [`InputState`](super::InputState). Timestamps are milliseconds on the
/// host's high-resolution clock.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a new client position.
    PointerMoved { client_x: f64, client_y: f64 },

    /// Key pressed or auto-repeated; `key` is the host key name.
    KeyDown { key: String },

    /// Key released.
    KeyUp { key: String },

    /// Pointer button pressed.
    ButtonDown { button: MouseButton, timestamp: f64 },

    /// Pointer button released.
    ButtonUp { button: MouseButton, timestamp: f64 },

    /// Vertical wheel scroll, positive = down.
    Wheel { delta_y: f64 },
}

//=== SurfaceBounds =======================================================

/// On-screen box of the surface, in client (logical) pixels.
///
/// Together with the surface's pixel size this defines the mapping from
/// client coordinates to surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Bounds anchored at the client origin.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
