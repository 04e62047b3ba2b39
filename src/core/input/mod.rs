//=========================================================================
// Input System
//
// Raw event payloads and the shared input snapshot.
//
// Responsibilities:
// - Define the raw events the host feeds in (`InputEvent`)
// - Own the pointer / key / button state (`InputState`)
//
// Notes:
// The instance owns exactly one `InputState`; game hooks and sprite
// behaviours read it through `&InputState`.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod event;
mod input_state;

//=== Public API ==========================================================
pub use event::{InputEvent, MouseButton, SurfaceBounds};
pub use input_state::InputState;
