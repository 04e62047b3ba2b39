//=========================================================================
// Walker Demo
//=========================================================================
//
// A 16x16 player sprite, drawn at 4x, walked around with WASD or the
// arrow keys. The FPS overlay is on.
//
// Extras:
// - "p" pauses / resumes the loop
// - mouse wheel grows / shrinks the player
// - a click sends the player behind the crate, right-click brings it back
// - the crate's image is missing on purpose, so it blinks as a placeholder
//
// Run with `RUST_LOG=debug cargo run --example walker` for engine logs.
//
//=========================================================================

use std::io::Cursor;

use log::info;
use sprite_loop::prelude::*;

//=== Player ==============================================================

const SPEED: f64 = 0.5;

struct Walk;

impl SpriteBehavior for Walk {
    fn update(&mut self, sprite: &mut Sprite, frame: &FrameContext<'_>) {
        let step = SPEED * frame.delta;
        let input = frame.input;

        if input.any_key_down(&["w", "arrowup"]) {
            sprite.y -= step;
        }
        if input.any_key_down(&["a", "arrowleft"]) {
            sprite.x -= step;
        }
        if input.any_key_down(&["s", "arrowdown"]) {
            sprite.y += step;
        }
        if input.any_key_down(&["d", "arrowright"]) {
            sprite.x += step;
        }
    }

    fn wheel(&mut self, sprite: &mut Sprite, _input: &InputState, _pointer: Vector, delta: f64) {
        let scale = (sprite.scale_x - delta.signum() * 0.5).clamp(1.0, 12.0);
        sprite.scale_x = scale;
        sprite.scale_y = scale;
    }
}

/// A 16x16 figure encoded as PNG, so it goes through the image loader
/// like a file would.
fn player_png() -> Vec<u8> {
    const BODY: [u8; 4] = [40, 110, 220, 255];
    const SKIN: [u8; 4] = [245, 200, 160, 255];

    let image = image::RgbaImage::from_fn(16, 16, |x, y| {
        let pixel = match (x, y) {
            (5..=10, 1..=5) => SKIN,
            (3..=12, 6..=11) => BODY,
            (4..=6, 12..=15) | (9..=11, 12..=15) => BODY,
            _ => [0, 0, 0, 0],
        };
        image::Rgba(pixel)
    });

    let mut bytes = Cursor::new(Vec::new());
    match image::DynamicImage::ImageRgba8(image).write_to(&mut bytes, image::ImageFormat::Png) {
        Ok(()) => bytes.into_inner(),
        // An empty buffer fails to decode and shows the placeholder.
        Err(_) => Vec::new(),
    }
}

//=== Game ================================================================

#[derive(Default)]
struct Walker {
    player: Option<SpriteId>,
}

impl Game for Walker {
    fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        let (width, height) = ctx.surface_size();
        let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);

        let crate_image = ctx.load_image("demos/assets/crate.png");
        ctx.add_sprite(Sprite::new(
            SpriteOptions::new(16.0, 16.0).at(cx + 96.0, cy).z(1.0).scale(4.0, 4.0),
            crate_image,
        ));

        let player_image = ctx.load_image_bytes(player_png());
        let player = Sprite::new(SpriteOptions::new(16.0, 16.0).at(cx, cy).z(2.0).scale(4.0, 4.0), player_image)
            .with_behavior(Walk);
        self.player = Some(ctx.add_sprite(player));

        Ok(())
    }

    /// Hold the first frame until the player has decoded.
    fn is_ready(&self, ctx: &GameContext) -> bool {
        self.player
            .and_then(|id| ctx.sprite(id))
            .map_or(true, |player| player.is_image_ready() || player.has_image_failed())
    }

    fn key_down(&mut self, ctx: &mut GameContext, key: &str) {
        if key == "p" {
            if ctx.is_paused() {
                ctx.resume();
            } else {
                ctx.pause();
            }
        }
    }

    fn mouse_down(&mut self, ctx: &mut GameContext, _pointer: Vector, button: MouseButton) {
        let Some(player) = self.player else {
            return;
        };
        let moved = match button {
            MouseButton::Left => ctx.send_to_back(player),
            MouseButton::Right => ctx.bring_to_front(player),
            _ => return,
        };
        if let Ok(z) = moved {
            info!("Player moved to z = {}", z);
        }
    }

    fn mouse_up(&mut self, _ctx: &mut GameContext, _pointer: Vector, button: MouseButton, held: f64) {
        info!("{:?} held for {:.0} ms", button, held);
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    EngineBuilder::new()
        .with_title("Walker")
        .with_debug_overlay(true)
        .build(Walker::default())
        .run()
}
