//=========================================================================
// Sprite System
//=========================================================================
//
// Positioned, scaled, depth-ordered raster elements.
//
// Architecture:
//   SpriteSet (owned by the instance)
//     └─ Sprite
//          ├─ geometry: x, y, z, width, height, scale
//          ├─ image: Pending → Ready | Failed (placeholder + blink)
//          └─ behavior: Option<Box<dyn SpriteBehavior>>
//
// Flow per tick:
//   poll_image(delta) → draw(surface) → behavior.update(sprite, frame)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputState, MouseButton};
use crate::core::surface::{DecodedImage, Rect, Surface};
use crate::core::vector::Vector;

//=== Module Declarations =================================================

mod image;
mod sprite_set;

//=== Public API ==========================================================

pub use self::image::{ImageLoadError, ImageLoader, PendingImage};
pub use sprite_set::{SpriteId, SpriteSet};

/// Interval between visible-frame toggles of a failed image, in ms.
pub const BLINK_INTERVAL_MS: f64 = 1000.0;

//=== FrameContext ========================================================

/// Read-only view of the current tick handed to update hooks.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Milliseconds since the previous tick.
    pub delta: f64,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Input snapshot as of the end of the previous event batch.
    pub input: &'a InputState,
}

//=== SpriteBehavior Trait ================================================

/// Optional per-sprite hooks.
///
/// Every method defaults to a no-op, so a behaviour only overrides what it
/// needs. Hooks may mutate the sprite's own geometry; they cannot reach
/// other sprites.
///
/// ```rust
/// # use sprite_loop::prelude::*;
/// struct Drift;
///
/// impl SpriteBehavior for Drift {
///     fn update(&mut self, sprite: &mut Sprite, frame: &FrameContext<'_>) {
///         sprite.x += 0.1 * frame.delta;
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait SpriteBehavior {
    /// Called once per tick, in ascending z order.
    fn update(&mut self, sprite: &mut Sprite, frame: &FrameContext<'_>) {}

    /// Pointer moved; `pointer` is in surface pixels.
    fn mouse_moved(&mut self, sprite: &mut Sprite, input: &InputState, pointer: Vector) {}

    fn mouse_down(&mut self, sprite: &mut Sprite, input: &InputState, pointer: Vector, button: MouseButton) {}

    /// `held` is the press duration in milliseconds.
    fn mouse_up(
        &mut self,
        sprite: &mut Sprite,
        input: &InputState,
        pointer: Vector,
        button: MouseButton,
        held: f64,
    ) {
    }

    /// `key` is lower-cased.
    fn key_down(&mut self, sprite: &mut Sprite, input: &InputState, key: &str) {}

    fn key_up(&mut self, sprite: &mut Sprite, input: &InputState, key: &str) {}

    fn wheel(&mut self, sprite: &mut Sprite, input: &InputState, pointer: Vector, delta: f64) {}
}

//=== SpriteOptions =======================================================

/// Geometry descriptor for a new sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteOptions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Width of one animation frame in the source image.
    pub width: f64,
    /// Height of one animation frame in the source image.
    pub height: f64,
    /// Initial animation frame.
    pub frame: usize,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl SpriteOptions {
    /// Frame size with position at the origin, z = 0 and unit scale.
    pub fn new(width: f64, height: f64) -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, width, height, frame: 0, scale_x: 1.0, scale_y: 1.0 }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }

    pub fn scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }
}

//=== SpriteImage =========================================================

/// Backing image of a sprite at construction time.
///
/// Built from a [`PendingImage`] (asynchronous) or an already decoded
/// image.
pub struct SpriteImage(ImageState);

enum ImageState {
    Pending(PendingImage),
    Ready(Arc<DecodedImage>),
    Failed { placeholder: Arc<DecodedImage>, blink_elapsed: f64 },
}

impl From<PendingImage> for SpriteImage {
    fn from(pending: PendingImage) -> Self {
        Self(ImageState::Pending(pending))
    }
}

impl From<DecodedImage> for SpriteImage {
    fn from(image: DecodedImage) -> Self {
        Self(ImageState::Ready(Arc::new(image)))
    }
}

impl From<Arc<DecodedImage>> for SpriteImage {
    fn from(image: Arc<DecodedImage>) -> Self {
        Self(ImageState::Ready(image))
    }
}

//=== Sprite ==============================================================

/// A positioned, depth-ordered raster element.
///
/// `(x, y)` is the sprite's centre on the surface. `z` orders drawing and
/// updating: lower values go first.
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    width: f64,
    height: f64,
    frame_index: usize,
    frame_count: usize,
    image: ImageState,
    behavior: Option<Box<dyn SpriteBehavior>>,
}

impl Sprite {
    //--- Construction -----------------------------------------------------

    pub fn new(options: SpriteOptions, image: impl Into<SpriteImage>) -> Self {
        let mut sprite = Self {
            x: options.x,
            y: options.y,
            z: options.z,
            scale_x: options.scale_x,
            scale_y: options.scale_y,
            width: options.width,
            height: options.height,
            frame_index: options.frame,
            frame_count: 0,
            image: image.into().0,
            behavior: None,
        };
        if let ImageState::Ready(image) = &sprite.image {
            sprite.frame_count = frame_count_for(image.width(), sprite.width);
        }
        sprite
    }

    /// Attaches per-tick / input behaviour.
    pub fn with_behavior(mut self, behavior: impl SpriteBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Frame drawn last (or the initial frame before the first draw).
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Frames in the backing image; 0 until it has decoded.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn set_frame(&mut self, frame: usize) {
        self.frame_index = frame;
    }

    pub fn is_image_ready(&self) -> bool {
        matches!(self.image, ImageState::Ready(_))
    }

    pub fn has_image_failed(&self) -> bool {
        matches!(self.image, ImageState::Failed { .. })
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// On-surface size after scaling.
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }

    //--- Image Lifecycle --------------------------------------------------

    /// Advances the image state without blocking.
    ///
    /// A pending image that finished decoding becomes ready (and sets
    /// `frame_count`); a failed one is replaced by the blinking placeholder.
    /// While failed, `delta` drives the blink.
    pub fn poll_image(&mut self, delta: f64) {
        match &mut self.image {
            ImageState::Pending(pending) => match pending.poll() {
                None => {}
                Some(Ok(image)) => {
                    self.frame_count = frame_count_for(image.width(), self.width);
                    debug!(
                        target: "sprite",
                        "Image ready: {}x{} ({} frames)",
                        image.width(),
                        image.height(),
                        self.frame_count
                    );
                    self.image = ImageState::Ready(Arc::new(image));
                }
                Some(Err(e)) => {
                    warn!(target: "sprite", "Image load failed, using placeholder: {}", e);
                    let placeholder = image::placeholder(self.width as u32, self.height as u32);
                    self.image = ImageState::Failed { placeholder: Arc::new(placeholder), blink_elapsed: 0.0 };
                    self.frame_count = 2;
                    self.frame_index = 0;
                }
            },
            ImageState::Failed { blink_elapsed, .. } => {
                *blink_elapsed += delta.max(0.0);
                while *blink_elapsed >= BLINK_INTERVAL_MS {
                    *blink_elapsed -= BLINK_INTERVAL_MS;
                    self.frame_index = if self.frame_index == 0 { 1 } else { 0 };
                }
            }
            ImageState::Ready(_) => {}
        }
    }

    //--- Rendering --------------------------------------------------------

    /// Draws the current (or overridden) frame centred on `(x, y)`.
    ///
    /// No-op while the image is still decoding. Records the drawn frame as
    /// the current frame.
    pub fn draw(&mut self, surface: &mut dyn Surface, frame_override: Option<usize>) {
        let (image, frame) = match &self.image {
            ImageState::Pending(_) => return,
            ImageState::Ready(image) => (image, frame_override.unwrap_or(self.frame_index)),
            // The blink owns the frame of a failed image.
            ImageState::Failed { placeholder, .. } => (placeholder, self.frame_index),
        };

        let (dest_width, dest_height) = self.scaled_size();
        let (src_width, src_height) = match &self.image {
            ImageState::Failed { placeholder, .. } => {
                (f64::from(placeholder.width() / 2), f64::from(placeholder.height()))
            }
            _ => (self.width, self.height),
        };

        surface.draw_image(
            image,
            Rect::new(frame as f64 * src_width, 0.0, src_width, src_height),
            Rect::new(self.x - dest_width / 2.0, self.y - dest_height / 2.0, dest_width, dest_height),
        );

        self.frame_index = frame;
    }

    //--- Behaviour Dispatch -----------------------------------------------

    /// Runs `f` against the attached behaviour, if any.
    ///
    /// The behaviour is detached for the duration of the call so it can
    /// borrow the sprite mutably.
    pub(crate) fn with_behavior_mut<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn SpriteBehavior, &mut Sprite),
    {
        if let Some(mut behavior) = self.behavior.take() {
            f(behavior.as_mut(), self);
            // A hook may have installed a replacement; keep it.
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
        }
    }

    /// Replaces (or removes) the behaviour.
    pub fn set_behavior(&mut self, behavior: Option<Box<dyn SpriteBehavior>>) {
        self.behavior = behavior;
    }
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let image = match &self.image {
            ImageState::Pending(_) => "pending",
            ImageState::Ready(_) => "ready",
            ImageState::Failed { .. } => "failed",
        };
        f.debug_struct("Sprite")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("z", &self.z)
            .field("size", &(self.width, self.height))
            .field("scale", &(self.scale_x, self.scale_y))
            .field("frame", &(self.frame_index, self.frame_count))
            .field("image", &image)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

fn frame_count_for(image_width: u32, frame_width: f64) -> usize {
    if frame_width <= 0.0 {
        return 0;
    }
    (f64::from(image_width) / frame_width).floor() as usize
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::PixelSurface;

    const RED: u32 = 0xFFFF_0000;
    const BLUE: u32 = 0xFF00_00FF;

    //--- Recording Surface ------------------------------------------------

    #[derive(Default)]
    struct RecordingSurface {
        draws: Vec<(Rect, Rect)>,
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            100
        }
        fn height(&self) -> u32 {
            100
        }
        fn resize(&mut self, _: u32, _: u32) {}
        fn set_image_smoothing(&mut self, _: bool) {}
        fn image_smoothing(&self) -> bool {
            false
        }
        fn clear(&mut self) {}
        fn draw_image(&mut self, _: &DecodedImage, src: Rect, dest: Rect) {
            self.draws.push((src, dest));
        }
        fn fill_text(&mut self, _: &str, _: f64, _: f64, _: u32) {}
        fn snapshot(&self) -> DecodedImage {
            DecodedImage::solid(0, 0, 0)
        }
    }

    fn strip() -> DecodedImage {
        // Three 2x2 frames side by side, plus one spare column.
        DecodedImage::solid(7, 2, RED)
    }

    //--- Geometry ---------------------------------------------------------

    #[test]
    fn frame_count_derived_from_image_width() {
        let sprite = Sprite::new(SpriteOptions::new(2.0, 2.0), strip());
        assert_eq!(sprite.frame_count(), 3);
        assert!(sprite.is_image_ready());
    }

    #[test]
    fn draw_uses_centre_anchor_and_scale() {
        let mut surface = RecordingSurface::default();
        let mut sprite = Sprite::new(SpriteOptions::new(16.0, 8.0).at(50.0, 40.0).scale(4.0, 2.0), strip());

        sprite.draw(&mut surface, None);

        let (src, dest) = surface.draws[0];
        assert_eq!(src, Rect::new(0.0, 0.0, 16.0, 8.0));
        assert_eq!(dest, Rect::new(50.0 - 32.0, 40.0 - 8.0, 64.0, 16.0));
    }

    #[test]
    fn frame_override_selects_sub_rect_and_sticks() {
        let mut surface = RecordingSurface::default();
        let mut sprite = Sprite::new(SpriteOptions::new(2.0, 2.0), strip());

        sprite.draw(&mut surface, Some(2));
        assert_eq!(surface.draws[0].0, Rect::new(4.0, 0.0, 2.0, 2.0));
        assert_eq!(sprite.frame_index(), 2);

        sprite.draw(&mut surface, None);
        assert_eq!(surface.draws[1].0, Rect::new(4.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn draw_renders_pixels_on_a_real_surface() {
        let mut surface = PixelSurface::new(4, 4);
        surface.set_image_smoothing(false);
        let image = DecodedImage::from_argb(4, 2, vec![RED, RED, BLUE, BLUE, RED, RED, BLUE, BLUE]).unwrap();
        let mut sprite = Sprite::new(SpriteOptions::new(2.0, 2.0).at(2.0, 2.0).frame(1), image);

        sprite.draw(&mut surface, None);

        assert_eq!(surface.pixel(1, 1), Some(BLUE));
        assert_eq!(surface.pixel(2, 2), Some(BLUE));
        assert_eq!(surface.pixel(0, 0), Some(0));
    }

    //--- Image Lifecycle --------------------------------------------------

    #[test]
    fn pending_image_draw_is_noop() {
        let (_tx, rx) = crossbeam_channel::bounded(1);
        let pending = PendingImage::from_receiver(rx);
        let mut surface = RecordingSurface::default();
        let mut sprite = Sprite::new(SpriteOptions::new(2.0, 2.0), pending);

        sprite.poll_image(16.0);
        sprite.draw(&mut surface, None);

        assert!(surface.draws.is_empty());
        assert_eq!(sprite.frame_count(), 0);
    }

    #[test]
    fn pending_image_becomes_ready_after_poll() {
        let pending = PendingImage::resolved(Ok(strip()));
        let mut sprite = Sprite::new(SpriteOptions::new(2.0, 2.0), pending);
        assert!(!sprite.is_image_ready());

        sprite.poll_image(0.0);

        assert!(sprite.is_image_ready());
        assert_eq!(sprite.frame_count(), 3);
    }

    #[test]
    fn failed_image_blinks_every_second() {
        let pending = PendingImage::resolved(Err(ImageLoadError::WorkerGone));
        let mut surface = RecordingSurface::default();
        let mut sprite = Sprite::new(SpriteOptions::new(4.0, 4.0), pending);

        sprite.poll_image(16.0);
        assert!(sprite.has_image_failed());
        assert_eq!(sprite.frame_index(), 0);

        let mut frames = Vec::new();
        for _ in 0..5 {
            for _ in 0..4 {
                sprite.poll_image(250.0);
                sprite.draw(&mut surface, Some(7));
            }
            frames.push(sprite.frame_index());
        }

        assert_eq!(frames, vec![1, 0, 1, 0, 1]);
        assert!(surface.draws.iter().all(|(src, _)| src.x == 0.0 || src.x == 4.0));
    }

    #[test]
    fn failed_image_draw_never_panics_with_degenerate_size() {
        let pending = PendingImage::resolved(Err(ImageLoadError::WorkerGone));
        let mut surface = PixelSurface::new(8, 8);
        let mut sprite = Sprite::new(SpriteOptions::new(0.0, 0.0), pending);

        sprite.poll_image(0.0);
        sprite.draw(&mut surface, None);
        sprite.poll_image(1000.0);
        sprite.draw(&mut surface, None);
    }

    #[test]
    fn failed_image_on_huge_sprite_stretches_small_placeholder() {
        let pending = PendingImage::resolved(Err(ImageLoadError::WorkerGone));
        let mut surface = RecordingSurface::default();
        let mut sprite = Sprite::new(SpriteOptions::new(3e9, 16.0), pending);

        sprite.poll_image(0.0);
        assert!(sprite.has_image_failed());
        assert_eq!(sprite.frame_count(), 2);

        sprite.poll_image(1000.0);
        sprite.draw(&mut surface, None);

        let (src, dest) = surface.draws[0];
        assert_eq!(src, Rect::new(8.0, 0.0, 8.0, 8.0));
        assert_eq!((dest.width, dest.height), (3e9, 16.0));
    }

    //--- Behaviour --------------------------------------------------------

    struct Mover;

    impl SpriteBehavior for Mover {
        fn update(&mut self, sprite: &mut Sprite, frame: &FrameContext<'_>) {
            if frame.input.is_key_down("d") {
                sprite.x += 0.5 * frame.delta;
            }
        }
    }

    #[test]
    fn behaviour_update_mutates_own_geometry() {
        let mut input = InputState::new();
        input.on_key_change("D", true);
        let mut sprite = Sprite::new(SpriteOptions::new(1.0, 1.0), strip()).with_behavior(Mover);
        let frame = FrameContext { delta: 10.0, width: 100, height: 100, input: &input };

        sprite.with_behavior_mut(|behavior, sprite| behavior.update(sprite, &frame));

        assert_eq!(sprite.x, 5.0);
        assert!(sprite.has_behavior(), "behaviour is reattached after the call");
    }

    #[test]
    fn sprite_without_behaviour_skips_dispatch() {
        let mut sprite = Sprite::new(SpriteOptions::new(1.0, 1.0), strip());
        let mut called = false;
        sprite.with_behavior_mut(|_, _| called = true);
        assert!(!called);
    }
}
