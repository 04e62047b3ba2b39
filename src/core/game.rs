//=========================================================================
// Game Hooks
//=========================================================================
//
// The user-facing side of an instance.
//
// Architecture:
//   Instance
//     ├─ game: G: Game           (user hooks, user state)
//     └─ context: GameContext    (data hooks may read and mutate)
//          ├─ sprites: SpriteSet
//          ├─ input: InputState  (read-only to hooks)
//          ├─ loader: ImageLoader
//          └─ scheduler: FrameScheduler
//
// Keeping user state in `G` and engine data in `GameContext` lets a hook
// take `&mut self` and `&mut GameContext` at the same time.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::path::Path;

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::GameError;
use crate::core::input::{InputState, MouseButton};
use crate::core::scheduler::FrameScheduler;
use crate::core::sprite::{ImageLoader, PendingImage, Sprite, SpriteId, SpriteSet};
use crate::core::vector::Vector;

//=== Game Trait ==========================================================

/// User game hooks.
///
/// Only [`Game::setup`] is required. Every other hook defaults to a no-op.
///
/// # Minimal Implementation
///
/// ```rust
/// # use sprite_loop::prelude::*;
/// struct Empty;
///
/// impl Game for Empty {
///     fn setup(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
///         Ok(())
///     }
/// }
/// ```
///
/// Errors returned from hooks are never caught by the loop: `setup`
/// failures abort the instance.
#[allow(unused_variables)]
pub trait Game {
    /// Called once before the first tick.
    fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError>;

    /// Gate for asynchronous setup work. The first tick runs only once this
    /// returns `true`; until then the scheduler stays idle.
    fn is_ready(&self, ctx: &GameContext) -> bool {
        true
    }

    /// Called every running tick, after sprites are drawn and before sprite
    /// behaviours update.
    fn update(&mut self, ctx: &mut GameContext, delta: f64, width: u32, height: u32) {}

    /// Pointer moved; `pointer` is in surface pixels with the bearing of
    /// the last step.
    fn mouse_moved(&mut self, ctx: &mut GameContext, pointer: Vector) {}

    fn mouse_down(&mut self, ctx: &mut GameContext, pointer: Vector, button: MouseButton) {}

    /// `held` is the press duration in milliseconds.
    fn mouse_up(&mut self, ctx: &mut GameContext, pointer: Vector, button: MouseButton, held: f64) {}

    /// `key` is lower-cased.
    fn key_down(&mut self, ctx: &mut GameContext, key: &str) {}

    fn key_up(&mut self, ctx: &mut GameContext, key: &str) {}

    fn wheel(&mut self, ctx: &mut GameContext, pointer: Vector, delta: f64) {}
}

//=== GameContext =========================================================

/// Engine-owned data a game hook may read and mutate.
pub struct GameContext {
    sprites: SpriteSet,
    pub(crate) input: InputState,
    loader: ImageLoader,
    pub(crate) scheduler: FrameScheduler,
    surface_size: (u32, u32),
    debug_overlay: bool,
    draw_sprites: bool,
    debug_color: u32,
}

impl GameContext {
    pub(crate) fn new(
        scheduler: FrameScheduler,
        surface_size: (u32, u32),
        debug_overlay: bool,
        draw_sprites: bool,
        debug_color: u32,
    ) -> Self {
        Self {
            sprites: SpriteSet::new(),
            input: InputState::new(),
            loader: ImageLoader::new(),
            scheduler,
            surface_size,
            debug_overlay,
            draw_sprites,
            debug_color,
        }
    }

    //--- Sprites ----------------------------------------------------------

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteSet {
        &mut self.sprites
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        self.sprites.insert(sprite)
    }

    pub fn remove_sprite(&mut self, id: SpriteId) -> Option<Sprite> {
        self.sprites.remove(id)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id)
    }

    /// See [`SpriteSet::bring_to_front`].
    pub fn bring_to_front(&mut self, id: SpriteId) -> Result<f64, GameError> {
        self.sprites.bring_to_front(id)
    }

    /// See [`SpriteSet::send_to_back`].
    pub fn send_to_back(&mut self, id: SpriteId) -> Result<f64, GameError> {
        self.sprites.send_to_back(id)
    }

    /// Sprites mutably alongside the input snapshot, for behaviour dispatch.
    pub(crate) fn sprites_and_input(&mut self) -> (&mut SpriteSet, &InputState) {
        (&mut self.sprites, &self.input)
    }

    //--- Images -----------------------------------------------------------

    /// Starts decoding the image at `path` in the background.
    pub fn load_image(&self, path: impl AsRef<Path>) -> PendingImage {
        self.loader.load(path)
    }

    /// Starts decoding an encoded in-memory image in the background.
    pub fn load_image_bytes(&self, bytes: Vec<u8>) -> PendingImage {
        self.loader.load_bytes(bytes)
    }

    //--- Input / Surface --------------------------------------------------

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// `(width, height)` of the surface in device pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    pub(crate) fn set_surface_size(&mut self, size: (u32, u32)) {
        self.surface_size = size;
    }

    //--- Scheduler --------------------------------------------------------

    pub fn fps(&self) -> u32 {
        self.scheduler.fps()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    pub fn resume(&mut self) {
        self.scheduler.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// `None` removes the limit.
    pub fn set_max_fps(&mut self, max_fps: Option<f64>) {
        self.scheduler.set_max_fps(max_fps);
    }

    //--- Rendering Flags --------------------------------------------------

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    pub fn set_debug_overlay(&mut self, enabled: bool) {
        debug!(target: "scheduler", "Debug overlay {}", if enabled { "on" } else { "off" });
        self.debug_overlay = enabled;
    }

    pub fn draw_sprites(&self) -> bool {
        self.draw_sprites
    }

    pub fn set_draw_sprites(&mut self, enabled: bool) {
        self.draw_sprites = enabled;
    }

    /// Colour of the overlay text, `0xAARRGGBB`.
    pub fn debug_color(&self) -> u32 {
        self.debug_color
    }

    pub fn set_debug_color(&mut self, color: u32) {
        self.debug_color = color;
    }
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("sprites", &self.sprites.len())
            .field("surface_size", &self.surface_size)
            .field("scheduler", &self.scheduler.state())
            .field("fps", &self.scheduler.fps())
            .field("debug_overlay", &self.debug_overlay)
            .field("draw_sprites", &self.draw_sprites)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sprite::SpriteOptions;
    use crate::core::surface::DecodedImage;

    fn context() -> GameContext {
        GameContext::new(FrameScheduler::new(None), (320, 240), false, true, 0xFF00_0000)
    }

    fn sprite(z: f64) -> Sprite {
        Sprite::new(SpriteOptions::new(4.0, 4.0).z(z), DecodedImage::solid(4, 4, 0xFFFF_FFFF))
    }

    struct Minimal;

    impl Game for Minimal {
        fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
            ctx.add_sprite(sprite(0.0));
            Ok(())
        }
    }

    #[test]
    fn only_setup_is_required() {
        let mut ctx = context();
        let mut game = Minimal;

        game.setup(&mut ctx).unwrap();
        assert!(game.is_ready(&ctx));
        game.update(&mut ctx, 16.0, 320, 240);
        game.key_down(&mut ctx, "a");
        game.mouse_up(&mut ctx, Vector::new(0.0, 0.0), MouseButton::Left, 10.0);

        assert_eq!(ctx.sprites().len(), 1);
    }

    #[test]
    fn sprite_management_round_trip() {
        let mut ctx = context();
        let a = ctx.add_sprite(sprite(1.0));
        let b = ctx.add_sprite(sprite(4.0));

        assert_eq!(ctx.bring_to_front(a).unwrap(), 5.0);
        assert!(ctx.remove_sprite(b).is_some());
        assert!(ctx.sprite(b).is_none());
        assert_eq!(ctx.send_to_back(a).unwrap(), 4.0);
    }

    #[test]
    fn flags_are_mutable_from_hooks() {
        let mut ctx = context();
        ctx.set_debug_overlay(true);
        ctx.set_draw_sprites(false);
        ctx.set_debug_color(0xFFFF_0000);
        ctx.set_max_fps(Some(30.0));

        assert!(ctx.debug_overlay());
        assert!(!ctx.draw_sprites());
        assert_eq!(ctx.debug_color(), 0xFFFF_0000);
        assert_eq!(ctx.scheduler().max_fps(), Some(30.0));
    }

    #[test]
    fn pause_before_start_is_ignored() {
        let mut ctx = context();
        ctx.pause();
        assert!(!ctx.is_paused());
    }
}
