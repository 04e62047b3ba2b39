//=========================================================================
// Sprite Loop Engine
//
// Desktop entry point: configures a window and runs a `Game` in it.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(game)──>  Engine  ──run()──>  [Platform]
//         │                              │
//         ├─ with_title()                └─ creates window
//         ├─ with_size()                    runs Game::setup
//         ├─ with_max_fps()                 ticks until close
//         └─ with_debug_overlay()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::error::GameError;
use crate::core::game::Game;
use crate::core::instance::InstanceConfig;
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Sprite Loop"
/// - **Size**: 800x600 logical pixels
/// - **Max FPS**: unthrottled
/// - **Debug overlay**: off
/// - **Sprite drawing**: on
/// - **Debug colour**: opaque black
/// - **Background**: opaque white
///
/// # Examples
///
/// ```no_run
/// use sprite_loop::prelude::*;
///
/// struct MyGame;
///
/// impl Game for MyGame {
///     fn setup(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
///         Ok(())
///     }
/// }
///
/// EngineBuilder::new()
///     .with_title("My Game")
///     .with_max_fps(60.0)
///     .with_debug_overlay(true)
///     .build(MyGame)
///     .run()?;
/// # Ok::<(), GameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    background: u32,
    config: InstanceConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Sprite Loop".to_string(),
            width: 800,
            height: 600,
            background: 0xFFFF_FFFF,
            config: InstanceConfig::default(),
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// Default: 800x600
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.width = width;
        self.height = height;
        self
    }

    /// Caps the frame rate. The loop waits out the remainder of each
    /// `1000 / max_fps` ms period before requesting the next frame.
    ///
    /// Default: unthrottled
    ///
    /// # Panics
    ///
    /// Panics if `max_fps` is not a positive finite number.
    pub fn with_max_fps(mut self, max_fps: f64) -> Self {
        assert!(max_fps.is_finite() && max_fps > 0.0, "Max FPS must be positive, got {}", max_fps);
        self.config.max_fps = Some(max_fps);
        self
    }

    /// Shows the "FPS: N" overlay in the top-left corner.
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.config.debug_overlay = enabled;
        self
    }

    /// Overlay text colour, `0xAARRGGBB`.
    pub fn with_debug_color(mut self, color: u32) -> Self {
        self.config.debug_color = color;
        self
    }

    /// Turns the sprite draw pass on or off. Sprite updates still run.
    pub fn with_draw_sprites(mut self, enabled: bool) -> Self {
        self.config.draw_sprites = enabled;
        self
    }

    /// Colour behind transparent surface pixels. Alpha is ignored.
    pub fn with_background(mut self, color: u32) -> Self {
        self.background = color;
        self
    }

    /// Builds the engine around `game`.
    pub fn build<G: Game>(self, game: G) -> Engine<G> {
        info!(
            "Building engine ({} {}x{}, max fps: {:?})",
            self.title, self.width, self.height, self.config.max_fps
        );

        Engine {
            game,
            window: WindowConfig {
                title: self.title,
                width: self.width,
                height: self.height,
                background: self.background,
            },
            config: self.config,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Sprite Loop desktop runtime.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build(game)`.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Winit event loop)
///         ├─► Window + Pixels (presentation)
///         └─► Instance<G, PixelSurface>
///               ├─► FrameScheduler
///               ├─► SpriteSet
///               └─► InputState
///
/// Image decoding: one background worker (crossbeam channels)
/// ```
pub struct Engine<G: Game> {
    game: G,
    window: WindowConfig,
    config: InstanceConfig,
}

impl<G: Game> Engine<G> {
    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it is closed.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the Winit event loop
    /// 2. On resume: creates window and pixel buffer, runs `Game::setup`
    /// 3. Ticks once per redraw, paced by the max FPS setting
    /// 4. On window close: event loop exits, instance is dropped
    ///
    /// # Errors
    ///
    /// Returns the fatal error that stopped the loop: event loop failure,
    /// window or pixel buffer creation failure, or a `Game::setup` error.
    pub fn run(self) -> Result<(), GameError> {
        info!("Starting engine runtime (max fps: {:?})", self.config.max_fps);

        let result = Platform::new(self.window, self.config, self.game).run();

        match &result {
            Ok(()) => info!("Engine shutdown complete"),
            Err(e) => error!("Engine stopped: {}", e),
        }
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
