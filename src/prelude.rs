//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use sprite_loop::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine entry point
pub use crate::engine::{Engine, EngineBuilder};

// Game hooks and errors
pub use crate::core::error::GameError;
pub use crate::core::game::{Game, GameContext};
pub use crate::core::instance::{Instance, InstanceConfig};

// Input
pub use crate::core::input::{InputEvent, InputState, MouseButton, SurfaceBounds};

// Sprites
pub use crate::core::sprite::{
    FrameContext, ImageLoader, PendingImage, Sprite, SpriteBehavior, SpriteId, SpriteImage, SpriteOptions,
    SpriteSet,
};

// Rendering
pub use crate::core::surface::{DecodedImage, PixelSurface, Rect, Surface};

// Values
pub use crate::core::vector::{Point, Vector};
