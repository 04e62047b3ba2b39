//=========================================================================
// Input State
//
// Maintains the current input snapshot for an instance.
// Consumes raw `InputEvent` payloads and updates persistent state
// (pointer vector, held keys, button press timestamps).
//
// Responsibilities:
// - Remap client pointer coordinates into surface pixel space
// - Track pointer motion as a Vector (bearing between samples)
// - Track held keys by lower-cased key name
// - Track press timestamps per button to report held durations
//
// Notes:
// State is mutated only by event handlers running between ticks, so a
// change is always visible to the next tick, never the one in progress.
// Readers (game hooks, sprite behaviours) only get `&InputState`.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashMap;
use std::fmt;

//=== External Crates =====================================================
use log::trace;

//=== Internal Modules ====================================================
use super::event::{MouseButton, SurfaceBounds};
use crate::core::vector::{Point, Vector};

//=== InputState ==========================================================

/// Pointer position (surface pixels), held keys and held buttons.
pub struct InputState {
    pointer: Vector,
    keys: HashMap<String, bool>,
    button_presses: HashMap<MouseButton, f64>,
}

impl InputState {
    //--- Constructor ------------------------------------------------------
    //
    // Pointer starts at the surface origin with no bearing.
    //
    pub fn new() -> Self {
        const KEY_BASE: usize = 32;
        Self {
            pointer: Vector::new(0.0, 0.0),
            keys: HashMap::with_capacity(KEY_BASE),
            button_presses: HashMap::new(),
        }
    }

    //=====================================================================
    // Event Handlers
    //=====================================================================

    /// Remaps a client position into surface pixels and replaces the pointer.
    ///
    /// The new Vector is positioned at the mapped point and its bearing
    /// describes the step from the previous mapped point. Returns the new
    /// pointer Vector.
    pub fn on_pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        bounds: SurfaceBounds,
        surface_size: (u32, u32),
    ) -> Vector {
        let mapped = map_to_surface(client_x, client_y, bounds, surface_size);
        self.pointer = Vector::from_motion(self.pointer.position(), mapped);
        trace!(target: "input", "Pointer moved to ({:.1}, {:.1})", mapped.x, mapped.y);
        self.pointer
    }

    /// Records a key transition. Returns the lower-cased key name.
    pub fn on_key_change(&mut self, raw_key: &str, pressed: bool) -> String {
        let key = raw_key.to_lowercase();
        self.keys.insert(key.clone(), pressed);
        key
    }

    /// Records the press timestamp for `button`.
    pub fn on_button_down(&mut self, button: MouseButton, timestamp: f64) {
        self.button_presses.insert(button, timestamp);
    }

    /// Clears `button` and returns how long it was held, in milliseconds.
    ///
    /// Returns 0 when no matching press was seen (e.g. the press happened
    /// before the window had focus). Never negative.
    pub fn on_button_up(&mut self, button: MouseButton, timestamp: f64) -> f64 {
        match self.button_presses.remove(&button) {
            Some(pressed_at) => (timestamp - pressed_at).max(0.0),
            None => 0.0,
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Current pointer Vector in surface pixel space.
    pub fn pointer(&self) -> Vector {
        self.pointer
    }

    /// Returns `true` while the key is held. Case-insensitive.
    pub fn is_key_down(&self, key: &str) -> bool {
        if let Some(&held) = self.keys.get(key) {
            return held;
        }
        self.keys.get(&key.to_lowercase()).copied().unwrap_or(false)
    }

    /// Returns `true` if any of the named keys is held.
    pub fn any_key_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.is_key_down(key))
    }

    /// Every key seen so far with its held state.
    pub fn keys(&self) -> impl Iterator<Item = (&str, bool)> {
        self.keys.iter().map(|(key, &held)| (key.as_str(), held))
    }

    /// Returns `true` while the button is held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.button_presses.contains_key(&button)
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait =========================================================
//
// Example:
//
// ```text
// InputState {
//     pointer: (420.0, 255.0),
//     held_keys: ["w", "arrowleft"],
//     held_buttons: [Left],
// }
// ```
//
impl fmt::Debug for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held_keys: Vec<_> = self
            .keys
            .iter()
            .filter(|(_, &held)| held)
            .map(|(key, _)| key.as_str())
            .collect();
        let held_buttons: Vec<_> = self.button_presses.keys().collect();

        f.debug_struct("InputState")
            .field("pointer", &(self.pointer.x(), self.pointer.y()))
            .field("held_keys", &held_keys)
            .field("held_buttons", &held_buttons)
            .finish()
    }
}

//=== Coordinate Mapping ==================================================

/// Maps a client position to surface pixels.
///
/// Scales by surface pixels per client pixel on each axis, which folds in
/// the device pixel ratio. A degenerate box maps to the origin.
pub(crate) fn map_to_surface(
    client_x: f64,
    client_y: f64,
    bounds: SurfaceBounds,
    (surface_width, surface_height): (u32, u32),
) -> Point {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Point::ORIGIN;
    }

    Point::new(
        (client_x - bounds.left) / bounds.width * f64::from(surface_width),
        (client_y - bounds.top) / bounds.height * f64::from(surface_height),
    )
}

//=========================================================================
// Unit Tests
//=========================================================================
