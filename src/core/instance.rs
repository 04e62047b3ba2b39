//=========================================================================
// Instance
//
// Root object composing the surface, the game, and the engine data.
//
// Responsibilities:
// - Run `Game::setup` once, then hold the scheduler idle until the game
//   reports ready
// - Execute one tick per host frame in a fixed order
// - Route raw input events: input state first, then the game, then every
//   sprite behaviour in ascending z order
// - Recompute the surface pixel size on host resize
//
// Notes:
// Tick order (Running only):
//   1. delta = t - previous tick
//   2. clear surface
//   3. draw sprites by ascending z (when sprite drawing is on)
//   4. Game::update
//   5. re-sort, then SpriteBehavior::update by ascending z
//   6. debug overlay "FPS: N" (when enabled)
//   7. push delta into the rolling window, refresh FPS, store t
//
// Input events arrive between ticks, never during one, so their effects
// are seen by the next tick. Dropping the instance tears everything down.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::time::Duration;

//=== External Crates =====================================================
use log::{debug, info, trace};

//=== Internal Modules ====================================================
use crate::core::error::GameError;
use crate::core::game::{Game, GameContext};
use crate::core::input::{InputEvent, InputState, SurfaceBounds};
use crate::core::scheduler::{FrameScheduler, SchedulerState};
use crate::core::sprite::{FrameContext, Sprite, SpriteBehavior};
use crate::core::surface::{DecodedImage, Surface};

//=== Constants ===========================================================

/// Top-left anchor of the debug overlay text (baseline).
const OVERLAY_POSITION: (f64, f64) = (10.0, 20.0);

//=== InstanceConfig ======================================================

/// Start-up settings for an [`Instance`].
///
/// Every value can be changed later through [`GameContext`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceConfig {
    /// Frame-rate cap; `None` runs unthrottled.
    pub max_fps: Option<f64>,
    pub debug_overlay: bool,
    pub draw_sprites: bool,
    /// Overlay text colour, `0xAARRGGBB`.
    pub debug_color: u32,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            max_fps: None,
            debug_overlay: false,
            draw_sprites: true,
            debug_color: 0xFF00_0000,
        }
    }
}

//=== Instance ============================================================

pub struct Instance<G: Game, S: Surface> {
    game: G,
    surface: S,
    context: GameContext,
    bounds: SurfaceBounds,
    setup_done: bool,
}

impl<G: Game, S: Surface> Instance<G, S> {
    //--- Construction -----------------------------------------------------
    //
    // Bounds default to the surface size at the client origin (device
    // pixel ratio 1) until the host reports real ones.
    //
    pub fn new(game: G, mut surface: S, config: InstanceConfig) -> Self {
        surface.set_image_smoothing(false);
        let size = surface.size();

        let context = GameContext::new(
            FrameScheduler::new(config.max_fps),
            size,
            config.debug_overlay,
            config.draw_sprites,
            config.debug_color,
        );

        debug!(target: "instance", "Instance created ({}x{}, {:?})", size.0, size.1, config);

        Self {
            game,
            surface,
            context,
            bounds: SurfaceBounds::sized(f64::from(size.0), f64::from(size.1)),
            setup_done: false,
        }
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    /// Runs `Game::setup` (once) and starts the scheduler at `now` if the
    /// game is already ready. Otherwise the scheduler starts on the first
    /// tick at which [`Game::is_ready`] holds.
    ///
    /// Setup errors are returned as-is and leave the instance idle.
    pub fn start(&mut self, now: f64) -> Result<(), GameError> {
        if !self.setup_done {
            info!(target: "instance", "Running game setup");
            self.game.setup(&mut self.context)?;
            self.setup_done = true;
        }
        self.start_when_ready(now);
        Ok(())
    }

    /// One host frame: runs [`tick`](Self::tick) at `t`, then returns the
    /// delay before the next frame should be requested. `now` is read after
    /// the tick so the delay accounts for the time the tick took.
    pub fn frame(&mut self, t: f64, now: impl FnOnce() -> f64) -> Duration {
        self.tick(t);
        self.context.scheduler.next_frame_delay(t, now())
    }

    /// Executes one tick at host timestamp `t`.
    ///
    /// Returns `true` when the draw and update passes ran; `false` while
    /// waiting for setup or readiness, and while paused.
    pub fn tick(&mut self, t: f64) -> bool {
        if !self.setup_done {
            trace!(target: "instance", "Tick before setup ignored");
            return false;
        }
        if self.context.scheduler.state() == SchedulerState::Idle {
            self.start_when_ready(t);
            return false;
        }

        //--- 1. Delta -----------------------------------------------------
        let Some(delta) = self.context.scheduler.begin_frame(t) else {
            return false;
        };
        let (width, height) = self.surface.size();

        //--- 2. Clear -----------------------------------------------------
        self.surface.clear();
        self.context.sprites_mut().poll_images(delta);

        //--- 3. Draw ------------------------------------------------------
        if self.context.draw_sprites() {
            let sprites = self.context.sprites_mut();
            for id in sprites.ordered_ids() {
                if let Some(sprite) = sprites.get_mut(id) {
                    sprite.draw(&mut self.surface, None);
                }
            }
        }

        //--- 4. Game update -----------------------------------------------
        self.game.update(&mut self.context, delta, width, height);

        //--- 5. Sprite updates (z may have changed, re-sort) -------------
        {
            let (sprites, input) = self.context.sprites_and_input();
            let frame = FrameContext { delta, width, height, input };
            for id in sprites.ordered_ids() {
                if let Some(sprite) = sprites.get_mut(id) {
                    sprite.with_behavior_mut(|behavior, sprite| behavior.update(sprite, &frame));
                }
            }
        }

        //--- 6. Overlay ---------------------------------------------------
        if self.context.debug_overlay() {
            let text = format!("FPS: {}", self.context.fps());
            let (x, y) = OVERLAY_POSITION;
            self.surface.fill_text(&text, x, y, self.context.debug_color());
        }

        //--- 7. Bookkeeping -----------------------------------------------
        self.context.scheduler.end_frame(t, delta);
        true
    }

    fn start_when_ready(&mut self, now: f64) {
        // Readiness often waits on image decodes, so keep them moving.
        self.context.sprites_mut().poll_images(0.0);
        if self.game.is_ready(&self.context) {
            self.context.scheduler.start(now);
        } else {
            trace!(target: "instance", "Game not ready, holding first tick");
        }
    }

    //=====================================================================
    // Input Routing
    //=====================================================================

    /// Applies one raw input event.
    ///
    /// Input state is always updated. Game and sprite hooks run only once
    /// setup has completed.
    pub fn handle_event(&mut self, event: InputEvent) {
        trace!(target: "input", "Event: {:?}", event);
        let size = self.surface.size();

        match event {
            InputEvent::PointerMoved { client_x, client_y } => {
                let pointer = self.context.input.on_pointer_move(client_x, client_y, self.bounds, size);
                if self.setup_done {
                    self.game.mouse_moved(&mut self.context, pointer);
                    self.dispatch(|behavior, sprite, input| behavior.mouse_moved(sprite, input, pointer));
                }
            }
            InputEvent::KeyDown { key } => {
                let key = self.context.input.on_key_change(&key, true);
                if self.setup_done {
                    self.game.key_down(&mut self.context, &key);
                    self.dispatch(|behavior, sprite, input| behavior.key_down(sprite, input, &key));
                }
            }
            InputEvent::KeyUp { key } => {
                let key = self.context.input.on_key_change(&key, false);
                if self.setup_done {
                    self.game.key_up(&mut self.context, &key);
                    self.dispatch(|behavior, sprite, input| behavior.key_up(sprite, input, &key));
                }
            }
            InputEvent::ButtonDown { button, timestamp } => {
                self.context.input.on_button_down(button, timestamp);
                let pointer = self.context.input.pointer();
                if self.setup_done {
                    self.game.mouse_down(&mut self.context, pointer, button);
                    self.dispatch(|behavior, sprite, input| behavior.mouse_down(sprite, input, pointer, button));
                }
            }
            InputEvent::ButtonUp { button, timestamp } => {
                let held = self.context.input.on_button_up(button, timestamp);
                let pointer = self.context.input.pointer();
                if self.setup_done {
                    self.game.mouse_up(&mut self.context, pointer, button, held);
                    self.dispatch(|behavior, sprite, input| {
                        behavior.mouse_up(sprite, input, pointer, button, held)
                    });
                }
            }
            InputEvent::Wheel { delta_y } => {
                let pointer = self.context.input.pointer();
                if self.setup_done {
                    self.game.wheel(&mut self.context, pointer, delta_y);
                    self.dispatch(|behavior, sprite, input| behavior.wheel(sprite, input, pointer, delta_y));
                }
            }
        }
    }

    /// Runs `hook` against every sprite behaviour in ascending z order.
    fn dispatch<F>(&mut self, mut hook: F)
    where
        F: FnMut(&mut dyn SpriteBehavior, &mut Sprite, &InputState),
    {
        let (sprites, input) = self.context.sprites_and_input();
        for id in sprites.ordered_ids() {
            if let Some(sprite) = sprites.get_mut(id) {
                sprite.with_behavior_mut(|behavior, sprite| hook(behavior, sprite, input));
            }
        }
    }

    //=====================================================================
    // Surface Management
    //=====================================================================

    /// Host resize: the surface becomes `round(css * dpr)` pixels and image
    /// smoothing is switched off again. Bounds keep their position and take
    /// the new CSS size.
    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        let width = (css_width * device_pixel_ratio).round().max(0.0) as u32;
        let height = (css_height * device_pixel_ratio).round().max(0.0) as u32;

        self.surface.resize(width, height);
        self.surface.set_image_smoothing(false);
        self.context.set_surface_size((width, height));
        self.bounds.width = css_width;
        self.bounds.height = css_height;

        debug!(
            target: "instance",
            "Resized to {}x{} px (css {}x{}, dpr {})",
            width,
            height,
            css_width,
            css_height,
            device_pixel_ratio
        );
    }

    /// Replaces the on-screen box used for pointer mapping.
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    /// Copy of the surface as last drawn.
    pub fn screenshot(&self) -> DecodedImage {
        self.surface.snapshot()
    }

    //=====================================================================
    // Accessors
    //=====================================================================

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.context
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// `true` once `Game::setup` has returned successfully.
    pub fn is_set_up(&self) -> bool {
        self.setup_done
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MouseButton;
    use crate::core::sprite::{SpriteId, SpriteOptions};
    use crate::core::surface::{PixelSurface, Rect};
    use crate::core::vector::Vector;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    //--- Test Doubles -----------------------------------------------------

    struct RecordingSurface {
        log: Log,
        size: (u32, u32),
        smoothing: bool,
    }

    impl RecordingSurface {
        fn new(log: &Log) -> Self {
            Self { log: Rc::clone(log), size: (320, 240), smoothing: true }
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.size.0
        }
        fn height(&self) -> u32 {
            self.size.1
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
        fn set_image_smoothing(&mut self, enabled: bool) {
            self.smoothing = enabled;
        }
        fn image_smoothing(&self) -> bool {
            self.smoothing
        }
        fn clear(&mut self) {
            self.log.borrow_mut().push("clear".into());
        }
        fn draw_image(&mut self, _: &DecodedImage, _: Rect, dest: Rect) {
            self.log.borrow_mut().push(format!("draw:{}", dest.x + dest.width / 2.0));
        }
        fn fill_text(&mut self, text: &str, _: f64, _: f64, _: u32) {
            self.log.borrow_mut().push(format!("text:{}", text));
        }
        fn snapshot(&self) -> DecodedImage {
            DecodedImage::solid(0, 0, 0)
        }
    }

    struct LogBehavior(Log);

    impl SpriteBehavior for LogBehavior {
        fn update(&mut self, sprite: &mut Sprite, _: &FrameContext<'_>) {
            self.0.borrow_mut().push(format!("sprite:{}", sprite.z));
        }

        fn key_down(&mut self, sprite: &mut Sprite, input: &InputState, key: &str) {
            self.0.borrow_mut().push(format!("sprite-key:{}:{}:{}", sprite.z, key, input.is_key_down(key)));
        }
    }

    #[derive(Default)]
    struct TestGame {
        log: Log,
        z_values: Vec<f64>,
        ids: Vec<SpriteId>,
        ready: bool,
        raise_first_on_update: bool,
        fail_setup: bool,
        setup_calls: usize,
        deltas: Vec<f64>,
        held: Vec<f64>,
        pointers: Vec<Vector>,
    }

    impl TestGame {
        fn with_sprites(log: &Log, z_values: &[f64]) -> Self {
            Self { log: Rc::clone(log), z_values: z_values.to_vec(), ready: true, ..Self::default() }
        }
    }

    impl Game for TestGame {
        fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
            self.setup_calls += 1;
            if self.fail_setup {
                return Err(GameError::Setup("no assets".into()));
            }
            for z in &self.z_values {
                let sprite = Sprite::new(
                    SpriteOptions::new(2.0, 2.0).at(z * 10.0, 5.0).z(*z),
                    DecodedImage::solid(2, 2, 0xFF00_FF00),
                )
                .with_behavior(LogBehavior(Rc::clone(&self.log)));
                self.ids.push(ctx.add_sprite(sprite));
            }
            Ok(())
        }

        fn is_ready(&self, _: &GameContext) -> bool {
            self.ready
        }

        fn update(&mut self, ctx: &mut GameContext, delta: f64, _: u32, _: u32) {
            self.log.borrow_mut().push("update".into());
            self.deltas.push(delta);
            if self.raise_first_on_update {
                ctx.bring_to_front(self.ids[0]).unwrap();
            }
        }

        fn mouse_moved(&mut self, _: &mut GameContext, pointer: Vector) {
            self.pointers.push(pointer);
        }

        fn mouse_up(&mut self, _: &mut GameContext, _: Vector, _: MouseButton, held: f64) {
            self.held.push(held);
        }

        fn key_down(&mut self, ctx: &mut GameContext, key: &str) {
            self.log.borrow_mut().push(format!("game-key:{}:{}", key, ctx.input().is_key_down(key)));
        }
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn recording_instance(log: &Log, game: TestGame, config: InstanceConfig) -> Instance<TestGame, RecordingSurface> {
        Instance::new(game, RecordingSurface::new(log), config)
    }

    //=====================================================================
    // Tick Order
    //=====================================================================

    #[test]
    fn tick_draws_then_updates_in_z_order() {
        let log = log();
        let config = InstanceConfig { debug_overlay: true, ..InstanceConfig::default() };
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[3.0, 1.0, 2.0]), config);

        instance.start(0.0).unwrap();
        assert!(instance.tick(16.0));

        assert_eq!(
            *log.borrow(),
            vec![
                "clear", "draw:10", "draw:20", "draw:30", "update", "sprite:1", "sprite:2", "sprite:3",
                "text:FPS: 0",
            ]
        );
    }

    #[test]
    fn update_order_is_resorted_after_game_update() {
        let log = log();
        let mut game = TestGame::with_sprites(&log, &[1.0, 2.0, 3.0]);
        game.raise_first_on_update = true;
        let mut instance = recording_instance(&log, game, InstanceConfig::default());

        instance.start(0.0).unwrap();
        instance.tick(16.0);

        let log = log.borrow();
        let updates: Vec<&str> = log.iter().filter(|e| e.starts_with("sprite:")).map(String::as_str).collect();
        assert_eq!(updates, vec!["sprite:2", "sprite:3", "sprite:4"]);
    }

    #[test]
    fn sprite_drawing_can_be_disabled() {
        let log = log();
        let config = InstanceConfig { draw_sprites: false, ..InstanceConfig::default() };
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[1.0]), config);

        instance.start(0.0).unwrap();
        instance.tick(16.0);

        assert!(!log.borrow().iter().any(|e| e.starts_with("draw:")));
        assert!(log.borrow().contains(&"sprite:1".to_string()));
    }

    #[test]
    fn overlay_reports_previous_estimate() {
        let log = log();
        let config = InstanceConfig { debug_overlay: true, ..InstanceConfig::default() };
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[]), config);

        instance.start(0.0).unwrap();
        instance.tick(20.0);
        instance.tick(40.0);

        assert_eq!(log.borrow().last().unwrap(), "text:FPS: 50");
        assert_eq!(instance.context().fps(), 50);
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    #[test]
    fn ticks_before_setup_do_nothing() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[1.0]), InstanceConfig::default());

        assert!(!instance.tick(16.0));
        assert!(log.borrow().is_empty());
        assert_eq!(instance.game().setup_calls, 0);
    }

    #[test]
    fn first_tick_waits_for_ready() {
        let log = log();
        let mut game = TestGame::with_sprites(&log, &[1.0]);
        game.ready = false;
        let mut instance = recording_instance(&log, game, InstanceConfig::default());

        instance.start(0.0).unwrap();
        assert!(!instance.tick(16.0));
        assert_eq!(instance.context().scheduler().state(), SchedulerState::Idle);

        instance.game_mut().ready = true;
        assert!(!instance.tick(32.0), "readiness tick only starts the scheduler");
        assert!(instance.tick(48.0));
        assert_eq!(instance.game().deltas, vec![16.0]);
    }

    #[test]
    fn setup_runs_once() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[1.0]), InstanceConfig::default());

        instance.start(0.0).unwrap();
        instance.start(10.0).unwrap();

        assert_eq!(instance.game().setup_calls, 1);
        assert_eq!(instance.context().sprites().len(), 1);
    }

    #[test]
    fn setup_error_propagates() {
        let log = log();
        let game = TestGame { fail_setup: true, ..TestGame::default() };
        let mut instance = recording_instance(&log, game, InstanceConfig::default());

        assert!(matches!(instance.start(0.0), Err(GameError::Setup(_))));
        assert!(!instance.is_set_up());
        assert!(!instance.tick(16.0));
    }

    #[test]
    fn pause_skips_work_and_resume_is_instant() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[]), InstanceConfig::default());

        instance.start(0.0).unwrap();
        instance.tick(16.0);
        instance.context_mut().pause();
        assert!(!instance.tick(2000.0));
        instance.context_mut().resume();
        assert!(instance.tick(2016.0));

        assert_eq!(instance.game().deltas, vec![16.0, 16.0]);
    }

    #[test]
    fn frame_returns_throttle_delay() {
        let log = log();
        let config = InstanceConfig { max_fps: Some(50.0), ..InstanceConfig::default() };
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[]), config);

        instance.start(0.0).unwrap();
        let delay = instance.frame(100.0, || 105.0);

        assert!((delay.as_secs_f64() - 0.015).abs() < 1e-9);
    }

    //=====================================================================
    // Input Routing
    //=====================================================================

    #[test]
    fn key_events_update_state_before_hooks() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[2.0, 1.0]), InstanceConfig::default());
        instance.start(0.0).unwrap();

        instance.handle_event(InputEvent::KeyDown { key: "ArrowLeft".into() });

        assert_eq!(
            *log.borrow(),
            vec!["game-key:arrowleft:true", "sprite-key:1:arrowleft:true", "sprite-key:2:arrowleft:true"]
        );
    }

    #[test]
    fn key_pressed_between_ticks_reaches_next_update() {
        struct StepRight;

        impl SpriteBehavior for StepRight {
            fn update(&mut self, sprite: &mut Sprite, frame: &FrameContext<'_>) {
                if frame.input.is_key_down("d") {
                    sprite.x += 0.5 * frame.delta;
                }
            }
        }

        #[derive(Default)]
        struct Walker {
            player: Option<SpriteId>,
        }

        impl Game for Walker {
            fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
                let sprite = Sprite::new(SpriteOptions::new(2.0, 2.0).at(10.0, 10.0), DecodedImage::solid(2, 2, 0xFF00_00FF))
                    .with_behavior(StepRight);
                self.player = Some(ctx.add_sprite(sprite));
                Ok(())
            }
        }

        let log = log();
        let mut instance = Instance::new(Walker::default(), RecordingSurface::new(&log), InstanceConfig::default());
        instance.start(0.0).unwrap();
        let player = instance.game().player.unwrap();
        let x = |instance: &Instance<Walker, RecordingSurface>| instance.context().sprite(player).unwrap().x;

        assert!(instance.tick(20.0));
        assert_eq!(x(&instance), 10.0);

        instance.handle_event(InputEvent::KeyDown { key: "D".into() });
        assert_eq!(x(&instance), 10.0, "input alone does not move the sprite");

        assert!(instance.tick(40.0));
        assert_eq!(x(&instance), 20.0);
    }

    #[test]
    fn input_state_updates_before_setup_without_hooks() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[1.0]), InstanceConfig::default());

        instance.handle_event(InputEvent::KeyDown { key: "W".into() });

        assert!(instance.context().input().is_key_down("w"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn button_release_reports_held_duration() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[]), InstanceConfig::default());
        instance.start(0.0).unwrap();

        instance.handle_event(InputEvent::ButtonDown { button: MouseButton::Left, timestamp: 100.0 });
        instance.handle_event(InputEvent::ButtonUp { button: MouseButton::Left, timestamp: 350.0 });
        instance.handle_event(InputEvent::ButtonUp { button: MouseButton::Right, timestamp: 400.0 });

        assert_eq!(instance.game().held, vec![250.0, 0.0]);
    }

    #[test]
    fn pointer_maps_through_resize_and_dpr() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[]), InstanceConfig::default());
        instance.start(0.0).unwrap();

        instance.resize(100.0, 50.0, 2.0);
        instance.handle_event(InputEvent::PointerMoved { client_x: 0.0, client_y: 0.0 });
        instance.handle_event(InputEvent::PointerMoved { client_x: 100.0, client_y: 50.0 });

        let pointers = &instance.game().pointers;
        assert_eq!((pointers[0].x(), pointers[0].y()), (0.0, 0.0));
        assert_eq!((pointers[1].x(), pointers[1].y()), (200.0, 100.0));
        assert!((pointers[1].direction() - (100.0f64).atan2(200.0)).abs() < 1e-12);
    }

    //=====================================================================
    // Surface Management
    //=====================================================================

    #[test]
    fn resize_updates_surface_and_disables_smoothing() {
        let log = log();
        let mut instance = recording_instance(&log, TestGame::with_sprites(&log, &[]), InstanceConfig::default());
        instance.surface.set_image_smoothing(true);

        instance.resize(400.0, 300.0, 1.5);

        assert_eq!(instance.surface().size(), (600, 450));
        assert!(!instance.surface().image_smoothing());
        assert_eq!(instance.context().surface_size(), (600, 450));
        assert_eq!(instance.bounds(), SurfaceBounds::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn screenshot_captures_rendered_frame() {
        struct Square;

        impl Game for Square {
            fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
                let image = DecodedImage::solid(4, 4, 0xFFFF_0000);
                ctx.add_sprite(Sprite::new(SpriteOptions::new(4.0, 4.0).at(8.0, 8.0), image));
                Ok(())
            }
        }

        let config = InstanceConfig { debug_overlay: true, ..InstanceConfig::default() };
        let mut instance = Instance::new(Square, PixelSurface::new(64, 32), config);
        instance.start(0.0).unwrap();
        instance.tick(16.0);

        let shot = instance.screenshot();
        assert_eq!((shot.width(), shot.height()), (64, 32));
        assert_eq!(shot.pixel(7, 7), Some(0xFFFF_0000));
        assert_eq!(shot.pixel(10, 6), Some(0xFF00_0000), "overlay text drawn in black");
        assert_eq!(shot.pixel(60, 30), Some(0));
    }
}
