//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into raw engine InputEvents.
//
// Architecture:
//   Winit WindowEvent → InputProcessor → InputEvent → Instance::handle_event
//
// Stateful scale tracking: caches the window scale factor from
// ScaleFactorChanged so cursor positions (physical pixels) can be
// reported in logical client pixels, the space `SurfaceBounds` uses.
// Keys are reported by logical name ("a", "ArrowUp", " "); keys without a
// name (dead keys, unidentified native codes) are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{Key, NamedKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, MouseButton};

/// Pixels scrolled per wheel "line", matching common browser behaviour.
const WHEEL_LINE_HEIGHT: f64 = 100.0;

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents using the cached scale factor.
pub(crate) struct InputProcessor {
    scale_factor: f64,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self { scale_factor: 1.0 }
    }

    //--- Scale State Management -------------------------------------------

    /// Updates the cached scale factor (applied to subsequent cursor events).
    pub(crate) fn update_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub(crate) fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a logical key transition (filters unnamed keys).
    pub(crate) fn process_key(&self, key: &Key, state: ElementState) -> Option<InputEvent> {
        let key = key_name(key)?;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key },
            ElementState::Released => InputEvent::KeyUp { key },
        })
    }

    /// Converts a mouse button transition stamped with the host clock.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
        timestamp: f64,
    ) -> InputEvent {
        let button = MouseButton::from(button);

        match state {
            ElementState::Pressed => InputEvent::ButtonDown { button, timestamp },
            ElementState::Released => InputEvent::ButtonUp { button, timestamp },
        }
    }

    /// Converts a physical cursor position to logical client coordinates.
    pub(crate) fn process_cursor_moved(&self, position: PhysicalPosition<f64>) -> InputEvent {
        InputEvent::PointerMoved {
            client_x: position.x / self.scale_factor,
            client_y: position.y / self.scale_factor,
        }
    }

    /// Converts a wheel delta to a vertical pixel delta, positive = down.
    pub(crate) fn process_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, lines) => -f64::from(lines) * WHEEL_LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(position) => -position.y / self.scale_factor,
        };
        InputEvent::Wheel { delta_y }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Host key name for a logical key.
///
/// Characters are reported as typed; named keys use their W3C key name,
/// which Winit's `NamedKey` variants follow. Space is reported as `" "`.
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(text) => Some(text.to_string()),
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        Key::Named(named) => Some(format!("{:?}", named)),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

/// Converts Winit mouse buttons to engine buttons.
///
/// Back/Forward take the DOM button indices 3 and 4.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Other(3),
            WinitMouseButton::Forward => MouseButton::Other(4),
            WinitMouseButton::Other(id) => MouseButton::Other(id),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{NativeKey, SmolStr};

    //=====================================================================
    // Key Conversion Tests
    //=====================================================================

    #[test]
    fn character_keys_keep_their_text() {
        let processor = InputProcessor::new();
        let event = processor.process_key(&Key::Character(SmolStr::new("W")), ElementState::Pressed);
        assert_eq!(event, Some(InputEvent::KeyDown { key: "W".into() }));
    }

    #[test]
    fn named_keys_use_key_names() {
        let processor = InputProcessor::new();
        let event = processor.process_key(&Key::Named(NamedKey::ArrowLeft), ElementState::Released);
        assert_eq!(event, Some(InputEvent::KeyUp { key: "ArrowLeft".into() }));
    }

    #[test]
    fn space_is_a_single_space() {
        let processor = InputProcessor::new();
        let event = processor.process_key(&Key::Named(NamedKey::Space), ElementState::Pressed);
        assert_eq!(event, Some(InputEvent::KeyDown { key: " ".into() }));
    }

    #[test]
    fn unnamed_keys_are_filtered() {
        let processor = InputProcessor::new();
        assert!(processor.process_key(&Key::Dead(None), ElementState::Pressed).is_none());
        assert!(processor
            .process_key(&Key::Unidentified(NativeKey::Unidentified), ElementState::Pressed)
            .is_none());
    }

    //=====================================================================
    // Mouse Conversion Tests
    //=====================================================================

    #[test]
    fn mouse_buttons_carry_timestamp() {
        let processor = InputProcessor::new();

        let down = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed, 12.5);
        assert_eq!(down, InputEvent::ButtonDown { button: MouseButton::Left, timestamp: 12.5 });

        let up = processor.process_mouse_button(WinitMouseButton::Back, ElementState::Released, 20.0);
        assert_eq!(up, InputEvent::ButtonUp { button: MouseButton::Other(3), timestamp: 20.0 });
    }

    #[test]
    fn cursor_is_reported_in_logical_pixels() {
        let mut processor = InputProcessor::new();
        processor.update_scale_factor(2.0);

        let event = processor.process_cursor_moved(PhysicalPosition::new(300.0, 120.0));
        assert_eq!(event, InputEvent::PointerMoved { client_x: 150.0, client_y: 60.0 });
    }

    #[test]
    fn invalid_scale_factor_is_ignored() {
        let mut processor = InputProcessor::new();
        processor.update_scale_factor(0.0);
        assert_eq!(processor.scale_factor(), 1.0);
    }

    #[test]
    fn wheel_down_is_positive() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_wheel(MouseScrollDelta::LineDelta(0.0, -1.0)),
            InputEvent::Wheel { delta_y: 100.0 }
        );
        assert_eq!(
            processor.process_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 30.0))),
            InputEvent::Wheel { delta_y: -30.0 }
        );
    }
}
