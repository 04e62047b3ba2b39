//=========================================================================
// Core
//
// Host-independent game loop: everything that can run without a window.
//
// Responsibilities:
// - Value types (`Vector`) and raw input payloads
// - Input state, sprites, the frame scheduler and the surface contract
// - The `Instance` root tying a user `Game` to a `Surface`
//
// Notes:
// Nothing in `core` touches the OS. The desktop host lives in the private
// `platform` module and drives an `Instance` one frame at a time, so every
// part of this tree is testable headless with `PixelSurface`.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod error;
pub mod game;
pub mod input;
pub mod instance;
pub mod scheduler;
pub mod sprite;
pub mod surface;
pub mod vector;

//=== Re-exports ==========================================================
pub use error::GameError;
pub use game::{Game, GameContext};
pub use instance::{Instance, InstanceConfig};
pub use scheduler::{FrameScheduler, SchedulerState, FRAME_WINDOW};
pub use vector::{Point, Vector};
