//=========================================================================
// Pixel Surface
//=========================================================================
//
// Software raster implementing `Surface` over a `Vec<u32>` ARGB buffer.
//
// Sampling:
//   smoothing off → nearest neighbour (pixel-art contract, the default
//                   the instance re-applies on every resize)
//   smoothing on  → bilinear, clamped to the source rectangle
//
// Compositing is source-over with straight (non-premultiplied) alpha.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{DecodedImage, Rect, Surface};

/// Scale applied to the 5x7 font (≈16px line height).
const TEXT_SCALE: u32 = 2;

//=== PixelSurface ========================================================

/// In-memory raster surface.
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    smoothing: bool,
}

impl PixelSurface {
    //--- Construction -----------------------------------------------------

    /// Creates a transparent surface. Smoothing starts enabled, as a fresh
    /// canvas context does; the instance turns it off on resize.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            smoothing: true,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    //--- Presentation -----------------------------------------------------

    /// Writes the surface as RGBA bytes composited over an opaque
    /// `background`. `frame` must hold `width * height * 4` bytes; any
    /// excess is left untouched.
    pub fn write_rgba(&self, frame: &mut [u8], background: u32) {
        let background = background | 0xFF00_0000;
        for (dst, &src) in frame.chunks_exact_mut(4).zip(&self.pixels) {
            let [_, r, g, b] = blend(background, src).to_be_bytes();
            dst.copy_from_slice(&[r, g, b, 0xFF]);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx] = blend(self.pixels[idx], color);
    }

    fn fill_block(&mut self, x: i64, y: i64, size: u32, color: u32) {
        for dy in 0..i64::from(size) {
            for dx in 0..i64::from(size) {
                self.blend_pixel(x + dx, y + dy, color);
            }
        }
    }
}

//=== Surface Implementation ==============================================

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize];
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }

    fn image_smoothing(&self) -> bool {
        self.smoothing
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn draw_image(&mut self, image: &DecodedImage, src: Rect, dest: Rect) {
        // Source rect clipped to the image; nothing left means nothing to draw.
        let sx0 = src.x.max(0.0);
        let sy0 = src.y.max(0.0);
        let sx1 = (src.x + src.width).min(f64::from(image.width()));
        let sy1 = (src.y + src.height).min(f64::from(image.height()));
        if src.is_empty() || dest.is_empty() || sx1 <= sx0 || sy1 <= sy0 {
            return;
        }

        let x_start = dest.x.round().max(0.0) as i64;
        let y_start = dest.y.round().max(0.0) as i64;
        let x_end = (dest.x + dest.width).round().min(f64::from(self.width)) as i64;
        let y_end = (dest.y + dest.height).round().min(f64::from(self.height)) as i64;

        let scale_x = src.width / dest.width;
        let scale_y = src.height / dest.height;

        for py in y_start..y_end {
            let v = src.y + ((py as f64 + 0.5) - dest.y) * scale_y;
            if v < sy0 || v >= sy1 {
                continue;
            }
            for px in x_start..x_end {
                let u = src.x + ((px as f64 + 0.5) - dest.x) * scale_x;
                if u < sx0 || u >= sx1 {
                    continue;
                }

                let color = if self.smoothing {
                    sample_bilinear(image, u, v, (sx0, sy0, sx1, sy1))
                } else {
                    image.pixel(u as u32, v as u32).unwrap_or(0)
                };
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: u32) {
        let top = y.round() as i64 - i64::from(GLYPH_HEIGHT * TEXT_SCALE);
        let mut left = x.round() as i64;

        for ch in text.chars() {
            if let Some(rows) = font::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                            self.fill_block(
                                left + i64::from(col * TEXT_SCALE),
                                top + row as i64 * i64::from(TEXT_SCALE),
                                TEXT_SCALE,
                                color,
                            );
                        }
                    }
                }
            }
            left += i64::from(ADVANCE * TEXT_SCALE);
        }
    }

    fn snapshot(&self) -> DecodedImage {
        DecodedImage::from_argb(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| DecodedImage::solid(self.width, self.height, 0))
    }
}

//=== Pixel Math ==========================================================

/// Source-over compositing of straight-alpha ARGB colours.
fn blend(dst: u32, src: u32) -> u32 {
    let sa = src >> 24;
    if sa == 0xFF {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = dst >> 24;
    let inv = 255 - sa;
    let out_a = sa + da * inv / 255;
    if out_a == 0 {
        return 0;
    }

    let channel = |shift: u32| {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        ((s * sa + d * da * inv / 255) / out_a).min(255)
    };

    (out_a << 24) | (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

/// Bilinear sample at `(u, v)` (pixel-centre coordinates), clamped to `clip`.
fn sample_bilinear(image: &DecodedImage, u: f64, v: f64, clip: (f64, f64, f64, f64)) -> u32 {
    let (cx0, cy0, cx1, cy1) = clip;
    let max_x = (cx1.ceil() - 1.0).max(cx0);
    let max_y = (cy1.ceil() - 1.0).max(cy0);

    let fx = (u - 0.5).clamp(cx0.floor(), max_x);
    let fy = (v - 0.5).clamp(cy0.floor(), max_y);
    let x0 = fx.floor();
    let y0 = fy.floor();
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);
    let tx = fx - x0;
    let ty = fy - y0;

    let at = |x: f64, y: f64| image.pixel(x as u32, y as u32).unwrap_or(0);
    let (c00, c10, c01, c11) = (at(x0, y0), at(x1, y0), at(x0, y1), at(x1, y1));

    let mut out = 0u32;
    for shift in [24u32, 16, 8, 0] {
        let ch = |c: u32| f64::from((c >> shift) & 0xFF);
        let top = ch(c00) * (1.0 - tx) + ch(c10) * tx;
        let bottom = ch(c01) * (1.0 - tx) + ch(c11) * tx;
        let value = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u32;
        out |= value << shift;
    }
    out
}

//=========================================================================
// Unit Tests
//=========================================================================
