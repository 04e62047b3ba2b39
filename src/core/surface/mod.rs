//=========================================================================
// Surface
//=========================================================================
//
// The raster drawing target every sprite renders into.
//
// Architecture:
//   Instance ──owns──> S: Surface
//     ├─ clear()                      (start of every tick)
//     ├─ draw_image(src → dest)       (one call per visible sprite)
//     └─ fill_text()                  (debug overlay)
//
// `PixelSurface` is the in-memory implementation used both headless and
// by the desktop platform, which copies it into the window each frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod font;
mod pixel_surface;

//=== Public API ==========================================================

pub use pixel_surface::PixelSurface;

//=== Rect ================================================================

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// `true` when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

//=== DecodedImage ========================================================

/// A decoded raster image, row-major, non-premultiplied `0xAARRGGBB`.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl DecodedImage {
    /// Wraps an ARGB buffer. Returns `None` if the length does not match.
    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self { width, height, pixels })
    }

    /// Converts packed RGBA bytes (as produced by most decoders).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| u32::from_be_bytes([px[3], px[0], px[1], px[2]]))
            .collect();
        Some(Self { width, height, pixels })
    }

    /// Image of one colour.
    pub fn solid(width: u32, height: u32, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width as usize * height as usize] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

//=== Surface Trait =======================================================

/// A 2D raster drawing target.
///
/// Colours are `0xAARRGGBB`. Implementations must treat zero-area or fully
/// off-surface draws as no-ops rather than errors.
pub trait Surface {
    /// Width in device pixels.
    fn width(&self) -> u32;

    /// Height in device pixels.
    fn height(&self) -> u32;

    /// Reallocates the pixel buffer. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32);

    /// Bilinear (`true`) or nearest-neighbour (`false`) image scaling.
    fn set_image_smoothing(&mut self, enabled: bool);

    fn image_smoothing(&self) -> bool;

    /// Resets every pixel to transparent.
    fn clear(&mut self);

    /// Draws the `src` sub-rectangle of `image` scaled into `dest`.
    fn draw_image(&mut self, image: &DecodedImage, src: Rect, dest: Rect);

    /// Draws `text` with its baseline-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: u32);

    /// Copy of the current contents.
    fn snapshot(&self) -> DecodedImage;

    /// `(width, height)` in device pixels.
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
