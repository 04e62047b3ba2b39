//=========================================================================
// Sprite Loop - Library Root
//
// A single-threaded 2D game loop: frame throttling, FPS tracking, input
// mapping and depth-ordered sprite update/draw on one raster surface.
//
// Responsibilities:
// - Expose the desktop entry point (`EngineBuilder` / `Engine`)
// - Expose the host-independent loop (`core`) for headless use and tests
// - Keep the Winit/Pixels host (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use sprite_loop::prelude::*;
//
// struct MyGame;
//
// impl Game for MyGame {
//     fn setup(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
//         Ok(())
//     }
// }
//
// fn main() -> Result<(), GameError> {
//     EngineBuilder::new().build(MyGame).run()
// }
// ```
//
// Logging goes through the `log` facade; the application installs a
// logger of its choice.
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the whole loop (scheduler, sprites, input, surface).
// It drives an `Instance` one frame at a time and never touches the OS,
// so it can be embedded in any host.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit window, Pixels presentation and event
// translation, and is kept private.
//
// `engine` defines the desktop entry point and its builder.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder};
