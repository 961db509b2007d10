use crate::color::{Hsv, Rgb};

/// Convert HSV to RGB using the `smart_leds` spectrum conversion
#[inline]
pub fn hsv2rgb(color: Hsv) -> Rgb {
    smart_leds::hsv::hsv2rgb(color.into())
}

/// Convert RGB to HSV (all channels are 0-255).
///
/// Inverse of [`hsv2rgb`]: the hue circle is split into six sectors of 42.5
/// steps with red, green and blue at 0, 85 and 170, so the primaries survive
/// a round trip exactly. Value is the brightest channel, so
/// `rgb2hsv(c).val == 0` exactly when `c` is black.
#[allow(clippy::cast_possible_truncation)]
pub fn rgb2hsv(rgb: Rgb) -> Hsv {
    let Rgb { r, g, b } = rgb;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let sat = if max == 0 {
        0
    } else {
        ((u16::from(delta) * 255) / u16::from(max)) as u8
    };

    if delta == 0 {
        return Hsv { hue: 0, sat, val: max };
    }

    // Position inside a sector, on the doubled 0..=85 scale
    let offset = |span: u8| {
        (85 * u16::from(span) + u16::from(delta) / 2) / u16::from(delta)
    };
    let twice_hue = if max == r {
        if g >= b { offset(g - b) } else { 5 * 85 + offset(r - b) }
    } else if max == g {
        if b >= r { 2 * 85 + offset(b - r) } else { 85 + offset(g - r) }
    } else if r >= g {
        4 * 85 + offset(r - g)
    } else {
        3 * 85 + offset(b - g)
    };
    let hue = (twice_hue / 2).min(255) as u8;

    Hsv { hue, sat, val: max }
}

/// Parse a one or two digit hex byte (`"f"`, `"7F"`)
pub fn parse_hex_byte(value: &str) -> Option<u8> {
    if value.is_empty() || value.len() > 2 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(value, 16).ok()
}

/// Parse a packed `hhssvv` color made of exactly six hex digits
pub fn parse_hsv_hex(value: &str) -> Option<Hsv> {
    if value.len() != 6 || !value.is_ascii() {
        return None;
    }
    Some(Hsv {
        hue: parse_hex_byte(&value[0..2])?,
        sat: parse_hex_byte(&value[2..4])?,
        val: parse_hex_byte(&value[4..6])?,
    })
}
