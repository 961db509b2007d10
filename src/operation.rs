//! Decoded commands, shared by every transport.
//!
//! The text transport names operations with single ASCII letters. The letter
//! table below is the wire vocabulary; both directions go through [`OpCode`].

use crate::color::{Hsv, HsvChannel, RgbChannel};
use crate::device::DeviceId;

const OP_CODE_ENABLED: u8 = b'e';
const OP_CODE_SET_ENABLE: u8 = b'a';
const OP_CODE_HUE: u8 = b'h';
const OP_CODE_SATURATION: u8 = b's';
const OP_CODE_VALUE: u8 = b'v';
const OP_CODE_COLOR: u8 = b'c';
const OP_CODE_DEFAULT_COLOR: u8 = b'd';
const OP_CODE_RED: u8 = b'r';
const OP_CODE_GREEN: u8 = b'g';
const OP_CODE_BLUE: u8 = b'b';
const OP_CODE_INFO: u8 = b'i';

/// Direction of a text request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Set,
}

/// Operation selector of a text request.
///
/// | code | get                   | set                        |
/// |------|-----------------------|----------------------------|
/// | `e`  | enabled flag, `1`/`0` |                            |
/// | `a`  |                       | tri-state enable code      |
/// | `h`  | hue                   | hue                        |
/// | `s`  | saturation            | saturation                 |
/// | `v`  | brightness            | brightness                 |
/// | `c`  | color, `hhssvv`       | color, `hhssvv`            |
/// | `d`  | default color         | default color              |
/// | `r`  | red                   | red                        |
/// | `g`  | green                 | green                      |
/// | `b`  | blue                  | blue                       |
/// | `i`  | device summary        |                            |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Enabled = OP_CODE_ENABLED,
    SetEnable = OP_CODE_SET_ENABLE,
    Hue = OP_CODE_HUE,
    Saturation = OP_CODE_SATURATION,
    Value = OP_CODE_VALUE,
    Color = OP_CODE_COLOR,
    DefaultColor = OP_CODE_DEFAULT_COLOR,
    Red = OP_CODE_RED,
    Green = OP_CODE_GREEN,
    Blue = OP_CODE_BLUE,
    Info = OP_CODE_INFO,
}

impl OpCode {
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            OP_CODE_ENABLED => Self::Enabled,
            OP_CODE_SET_ENABLE => Self::SetEnable,
            OP_CODE_HUE => Self::Hue,
            OP_CODE_SATURATION => Self::Saturation,
            OP_CODE_VALUE => Self::Value,
            OP_CODE_COLOR => Self::Color,
            OP_CODE_DEFAULT_COLOR => Self::DefaultColor,
            OP_CODE_RED => Self::Red,
            OP_CODE_GREEN => Self::Green,
            OP_CODE_BLUE => Self::Blue,
            OP_CODE_INFO => Self::Info,
            _ => return None,
        })
    }

    /// Parse a one-letter code argument
    pub fn parse_from_str(value: &str) -> Option<Self> {
        match value.as_bytes() {
            [code] => Self::from_code(*code),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether the operation exists for the given direction
    pub const fn supports(self, verb: Verb) -> bool {
        match self {
            Self::Enabled | Self::Info => matches!(verb, Verb::Get),
            Self::SetEnable => matches!(verb, Verb::Set),
            _ => true,
        }
    }

    /// Read-side meaning of the code
    pub const fn query(self) -> Option<Query> {
        Some(match self {
            Self::Enabled => Query::Enabled,
            Self::Hue => Query::Hsv(HsvChannel::Hue),
            Self::Saturation => Query::Hsv(HsvChannel::Saturation),
            Self::Value => Query::Hsv(HsvChannel::Value),
            Self::Color => Query::Color,
            Self::DefaultColor => Query::DefaultColor,
            Self::Red => Query::Rgb(RgbChannel::Red),
            Self::Green => Query::Rgb(RgbChannel::Green),
            Self::Blue => Query::Rgb(RgbChannel::Blue),
            Self::Info => Query::Info,
            Self::SetEnable => return None,
        })
    }

    /// HSV channel addressed by `h`, `s` or `v`
    pub const fn hsv_channel(self) -> Option<HsvChannel> {
        match self {
            Self::Hue => Some(HsvChannel::Hue),
            Self::Saturation => Some(HsvChannel::Saturation),
            Self::Value => Some(HsvChannel::Value),
            _ => None,
        }
    }

    /// RGB channel addressed by `r`, `g` or `b`
    pub const fn rgb_channel(self) -> Option<RgbChannel> {
        match self {
            Self::Red => Some(RgbChannel::Red),
            Self::Green => Some(RgbChannel::Green),
            Self::Blue => Some(RgbChannel::Blue),
            _ => None,
        }
    }
}

/// Device mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `0` off, `1` on, anything else toggles
    SetEnable(u8),
    Toggle,
    SetHsv(HsvChannel, u8),
    SetRgb(RgbChannel, u8),
    /// Replace the whole target color
    SetColor(Hsv),
    /// Persist a new default color
    SetDefaultColor(Hsv),
}

/// Device read-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Enabled,
    Hsv(HsvChannel),
    Color,
    DefaultColor,
    Rgb(RgbChannel),
    /// Fixed-format device summary
    Info,
}

/// A mutation addressed to one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub device: DeviceId,
    pub action: Action,
}

impl Command {
    pub const fn new(device: DeviceId, action: Action) -> Self {
        Self { device, action }
    }
}
