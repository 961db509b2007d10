mod utils;

use smart_leds::RGB8;

pub use utils::{hsv2rgb, parse_hex_byte, parse_hsv_hex, rgb2hsv};

pub type Rgb = RGB8;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// HSV color with all channels on a 0-255 scale.
///
/// Hue uses the same 0-255 circle as `smart_leds::hsv::Hsv`, which this type
/// converts into for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hsv {
    pub hue: u8,
    pub sat: u8,
    pub val: u8,
}

impl Hsv {
    pub const fn new(hue: u8, sat: u8, val: u8) -> Self {
        Self { hue, sat, val }
    }

    /// Get one channel of the color
    pub const fn channel(self, channel: HsvChannel) -> u8 {
        match channel {
            HsvChannel::Hue => self.hue,
            HsvChannel::Saturation => self.sat,
            HsvChannel::Value => self.val,
        }
    }

    /// Replace one channel of the color
    pub fn set_channel(&mut self, channel: HsvChannel, value: u8) {
        match channel {
            HsvChannel::Hue => self.hue = value,
            HsvChannel::Saturation => self.sat = value,
            HsvChannel::Value => self.val = value,
        }
    }

    /// Packed 3-byte representation, in `hue, sat, val` order
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.hue, self.sat, self.val]
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<Hsv> for smart_leds::hsv::Hsv {
    fn from(color: Hsv) -> Self {
        Self {
            hue: color.hue,
            sat: color.sat,
            val: color.val,
        }
    }
}

/// Six lowercase hex digits, `hhssvv`
impl core::fmt::LowerHex for Hsv {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.hue, self.sat, self.val)
    }
}

/// Channel of an HSV color, addressed by index 0-2 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HsvChannel {
    Hue = 0,
    Saturation = 1,
    Value = 2,
}

impl HsvChannel {
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Hue,
            1 => Self::Saturation,
            2 => Self::Value,
            _ => return None,
        })
    }
}

/// Channel of an RGB color, addressed by index 0-2 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RgbChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl RgbChannel {
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Red,
            1 => Self::Green,
            2 => Self::Blue,
            _ => return None,
        })
    }

    /// Read this channel from a color
    pub const fn get(self, color: Rgb) -> u8 {
        match self {
            Self::Red => color.r,
            Self::Green => color.g,
            Self::Blue => color.b,
        }
    }

    /// Write this channel of a color
    pub fn set(self, color: &mut Rgb, value: u8) {
        match self {
            Self::Red => color.r = value,
            Self::Green => color.g = value,
            Self::Blue => color.b = value,
        }
    }
}
