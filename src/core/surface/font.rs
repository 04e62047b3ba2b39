//=========================================================================
// Bitmap Font
//=========================================================================
//
// 5x7 glyphs for overlay text. Each glyph is 7 rows; the low 5 bits of a
// row are its pixels, bit 4 leftmost. Lower-case input renders with the
// upper-case glyph; characters without a glyph are skipped.
//
//=========================================================================

pub(super) const GLYPH_WIDTH: u32 = 5;
pub(super) const GLYPH_HEIGHT: u32 = 7;

/// Horizontal advance per character, in unscaled pixels.
pub(super) const ADVANCE: u32 = GLYPH_WIDTH + 1;

macro_rules! g {
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr) => {
        Some([$a, $b, $c, $d, $e, $f, $g])
    };
}

/// Rows for `ch`, or `None` if the font has no glyph for it.
pub(super) fn glyph(ch: char) -> Option<[u8; 7]> {
    match ch.to_ascii_uppercase() {
        //--- Digits -------------------------------------------------------
        '0' => g!(0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110),
        '1' => g!(0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        '2' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111),
        '3' => g!(0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110),
        '4' => g!(0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010),
        '5' => g!(0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110),
        '6' => g!(0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110),
        '7' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000),
        '8' => g!(0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110),
        '9' => g!(0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100),

        //--- Letters ------------------------------------------------------
        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'B' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110),
        'C' => g!(0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'F' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'J' => g!(0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'K' => g!(0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'M' => g!(0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001),
        'N' => g!(0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'P' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000),
        'Q' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'T' => g!(0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        'U' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        'X' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001),
        'Y' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100),
        'Z' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111),

        //--- Punctuation --------------------------------------------------
        ' ' => g!(0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000),
        ':' => g!(0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000),
        '.' => g!(0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000),
        ',' => g!(0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000),
        '-' => g!(0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000),
        '|' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        '/' => g!(0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000),
        '(' => g!(0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010),
        ')' => g!(0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000),

        _ => None,
    }
}
