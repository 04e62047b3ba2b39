//=========================================================================
// Platform Subsystem
//
// Hosts an `Instance` inside a Winit window and presents its surface.
//
// Architecture:
// ```text
//  Main Thread (single):
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ├─ WindowEvent ──> InputProcessor          │
//  │   │                    └─> Instance::handle_event
//  │   ├─ Resized / ScaleFactorChanged            │
//  │   │        └─> Instance::resize + Pixels resize
//  │   ├─ RedrawRequested                         │
//  │   │        ├─> Instance::tick(t)             │
//  │   │        ├─> PixelSurface → Pixels::render │
//  │   │        └─> frame_deadline(t, now)        │
//  │   └─ about_to_wait                           │
//  │            └─> WaitUntil(next frame) / request_redraw
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = tick**: one host frame runs exactly one tick, and
//   input events dispatched between redraws land before the next tick
// - **Pacing via ControlFlow::WaitUntil**: the scheduler's delay, taken
//   after presenting, becomes the wake-up deadline for the next redraw
// - **Window creation is the surface locator**: failure maps to
//   `SurfaceNotFound`; a missing GPU surface maps to `ContextUnavailable`
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
// Responsibilities:
// - Create and manage the OS window and its pixel buffer
// - Convert Winit types → engine InputEvents
// - Keep the surface size in step with the window and its scale factor
// - Pace redraws to the scheduler's frame delay
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::*;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::error::GameError;
use crate::core::game::Game;
use crate::core::input::InputEvent;
use crate::core::instance::{Instance, InstanceConfig};
use crate::core::scheduler::FrameScheduler;
use crate::core::surface::{PixelSurface, Surface};
use input_processor::InputProcessor;

//=== HostClock ===========================================================

/// Monotonic millisecond clock shared by ticks and input timestamps.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HostClock {
    origin: Instant,
}

impl HostClock {
    pub(crate) fn new() -> Self {
        Self { origin: Instant::now() }
    }

    /// Milliseconds since the clock was created.
    pub(crate) fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

//=== WindowConfig ========================================================

/// Window settings resolved by `EngineBuilder`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowConfig {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Opaque colour shown behind transparent surface pixels.
    pub background: u32,
}

//=== Session =============================================================

/// Everything that exists only while the window does.
struct Session<G: Game> {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    instance: Instance<G, PixelSurface>,
}

impl<G: Game> Session<G> {
    /// Resizes the instance surface and the presentation buffer together.
    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let (css_width, css_height) = logical_size(size, scale_factor);
        self.instance.resize(css_width, css_height, scale_factor);

        let (width, height) = self.instance.surface().size();
        if let Err(e) = self.pixels.resize_surface(size.width.max(1), size.height.max(1)) {
            warn!(target: "platform", "Presentation surface resize failed: {}", e);
        }
        if let Err(e) = self.pixels.resize_buffer(width.max(1), height.max(1)) {
            warn!(target: "platform", "Pixel buffer resize failed: {}", e);
        }
    }
}

//=== Platform ============================================================

/// Window host driving a single [`Instance`].
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(..)` stores the game and settings
/// 2. **Execution**: `platform.run()` starts the event loop (blocks)
/// 3. **Resume**: window, pixel buffer and instance are created, then
///    `Game::setup` runs
/// 4. **Shutdown**: user closes window → event loop exits → `run` returns
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform<G: Game> {
    window_config: WindowConfig,
    instance_config: InstanceConfig,

    /// Moved into the instance on first resume.
    game: Option<G>,

    /// `None` until `resumed()` succeeds.
    session: Option<Session<G>>,

    input_processor: InputProcessor,
    clock: HostClock,

    /// Earliest moment the next redraw may be requested.
    next_frame: Instant,

    /// Fatal error that stopped the event loop, returned from `run`.
    error: Option<GameError>,
}

impl<G: Game> Platform<G> {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet - that happens lazily in `resumed()`.
    pub(crate) fn new(window_config: WindowConfig, instance_config: InstanceConfig, game: G) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window_config,
            instance_config,
            game: Some(game),
            session: None,
            input_processor: InputProcessor::new(),
            clock: HostClock::new(),
            next_frame: Instant::now(),
            error: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// - [`GameError::EventLoop`] if the loop cannot be created or fails
    /// - [`GameError::SurfaceNotFound`] if the window cannot be created
    /// - [`GameError::ContextUnavailable`] if the pixel buffer cannot be
    ///   attached to the window
    /// - any error returned by `Game::setup`
    pub(crate) fn run(mut self) -> Result<(), GameError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;

        info!(target: "platform", "Event loop exited");
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Records a fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GameError) {
        error!(target: "platform", "{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_session(&mut self, event_loop: &ActiveEventLoop) -> Result<Session<G>, GameError> {
        let attrs = WindowAttributes::default()
            .with_title(self.window_config.title.as_str())
            .with_inner_size(LogicalSize::new(self.window_config.width, self.window_config.height));

        let window = event_loop
            .create_window(attrs)
            .map(Arc::new)
            .map_err(|e| GameError::SurfaceNotFound(e.to_string()))?;

        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        self.input_processor.update_scale_factor(scale_factor);
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            scale_factor
        );

        let game = self
            .game
            .take()
            .ok_or_else(|| GameError::InvalidOperation("game already moved into a session".into()))?;

        let mut instance = Instance::new(game, PixelSurface::new(size.width, size.height), self.instance_config);
        let (css_width, css_height) = logical_size(size, scale_factor);
        instance.resize(css_width, css_height, scale_factor);

        let (width, height) = instance.surface().size();
        let texture = SurfaceTexture::new(size.width.max(1), size.height.max(1), Arc::clone(&window));
        let pixels = Pixels::new(width.max(1), height.max(1), texture)
            .map_err(|e| GameError::ContextUnavailable(e.to_string()))?;

        instance.start(self.clock.now())?;

        Ok(Session { window, pixels, instance })
    }

    /// One host frame: tick, present, schedule the next one.
    ///
    /// The deadline is measured after presenting, so time spent blocked on
    /// vsync counts toward the frame period.
    fn redraw(&mut self) {
        let clock = self.clock;
        let background = self.window_config.background;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let tick_started = Instant::now();
        let t = clock.now();
        session.instance.tick(t);

        session.instance.surface().write_rgba(session.pixels.frame_mut(), background);
        if let Err(e) = session.pixels.render() {
            warn!(target: "platform", "Present failed: {}", e);
        }

        self.next_frame = frame_deadline(session.instance.context().scheduler(), tick_started, t, clock.now());
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let Some(session) = self.session.as_mut() {
            session.instance.handle_event(event);
        }
    }
}

//=== Winit Integration ===================================================

impl<G: Game> ApplicationHandler for Platform<G> {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window, pixel buffer and instance if they don't exist
    /// yet. On mobile, this may be called multiple times.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match self.create_session(event_loop) {
            Ok(session) => {
                session.window.request_redraw();
                self.session = Some(session);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    trace!(target: "platform", "Zero-size resize ignored (minimized?)");
                    return;
                }
                let scale_factor = self.input_processor.scale_factor();
                if let Some(session) = self.session.as_mut() {
                    session.resize(size, scale_factor);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                debug!(target: "platform", "Scale factor changed to {}", scale_factor);
                self.input_processor.update_scale_factor(scale_factor);
                if let Some(session) = self.session.as_mut() {
                    let size = session.window.inner_size();
                    session.resize(size, scale_factor);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor_moved(position);
                self.dispatch(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key(&key_event.logical_key, key_event.state) {
                    Some(event) => self.dispatch(event),
                    None => trace!(target: "platform::input", "Unnamed key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state, self.clock.now());
                self.dispatch(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.input_processor.process_wheel(delta);
                self.dispatch(event);
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {
                // Ignore: Focused, Moved, etc.
            }
        }
    }

    /// Requests the next redraw once the frame delay has elapsed.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        if Instant::now() >= self.next_frame {
            session.window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
        }
    }
}

//=== Helpers =============================================================

/// Instant the next tick may start.
///
/// `t` is the tick's host timestamp, taken at `tick_started`, and `now` the
/// host time once the frame has been presented. The result is
/// `tick_started + max(1000 / max_fps, now - t)` ms, or right after
/// presenting when unthrottled.
fn frame_deadline(scheduler: &FrameScheduler, tick_started: Instant, t: f64, now: f64) -> Instant {
    let elapsed = Duration::from_secs_f64((now - t).max(0.0) / 1000.0);
    tick_started + elapsed + scheduler.next_frame_delay(t, now)
}

/// Physical window size → logical (CSS) size.
fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> (f64, f64) {
    let logical: LogicalSize<f64> = size.to_logical(scale_factor);
    (logical.width, logical.height)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::GameContext;

    struct Idle;

    impl Game for Idle {
        fn setup(&mut self, _: &mut GameContext) -> Result<(), GameError> {
            Ok(())
        }
    }

    fn window_config() -> WindowConfig {
        WindowConfig { title: "test".into(), width: 320, height: 240, background: 0xFFFF_FFFF }
    }

    //=====================================================================
    // Platform Tests
    //=====================================================================

    #[test]
    fn platform_creation_is_lazy() {
        let platform = Platform::new(window_config(), InstanceConfig::default(), Idle);
        assert!(platform.session.is_none(), "Window should be created lazily");
        assert!(platform.game.is_some());
        assert!(platform.error.is_none());
    }

    #[test]
    fn redraw_without_session_is_noop() {
        let mut platform = Platform::new(window_config(), InstanceConfig::default(), Idle);
        platform.redraw();
        platform.dispatch(InputEvent::Wheel { delta_y: 1.0 });
    }

    //=====================================================================
    // Helper Tests
    //=====================================================================

    #[test]
    fn clock_is_monotonic() {
        let clock = HostClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    fn ms(duration: Duration) -> f64 {
        duration.as_secs_f64() * 1000.0
    }

    #[test]
    fn deadline_includes_present_time_in_period() {
        let scheduler = FrameScheduler::new(Some(30.0));
        let started = Instant::now();

        // Tick done at 2 ms, present blocked on vsync until 18.7 ms.
        let deadline = frame_deadline(&scheduler, started, 100.0, 118.7);

        assert!((ms(deadline - started) - 1000.0 / 30.0).abs() < 1e-3);
    }

    #[test]
    fn overrun_frame_deadline_is_when_presenting_ended() {
        let scheduler = FrameScheduler::new(Some(60.0));
        let started = Instant::now();

        let deadline = frame_deadline(&scheduler, started, 0.0, 40.0);

        assert!((ms(deadline - started) - 40.0).abs() < 1e-3);
    }

    #[test]
    fn unthrottled_deadline_follows_present() {
        let scheduler = FrameScheduler::new(None);
        let started = Instant::now();

        assert!((ms(frame_deadline(&scheduler, started, 10.0, 15.0) - started) - 5.0).abs() < 1e-3);
        assert_eq!(frame_deadline(&scheduler, started, 10.0, 9.0), started, "clock skew never moves the deadline back");
    }

    #[test]
    fn logical_size_divides_by_scale() {
        assert_eq!(logical_size(PhysicalSize::new(1600, 1200), 2.0), (800.0, 600.0));
        assert_eq!(logical_size(PhysicalSize::new(800, 600), 1.0), (800.0, 600.0));
    }
}
