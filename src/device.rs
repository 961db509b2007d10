use core::fmt;

use heapless::String;

use crate::color::{BLACK, Hsv, Rgb};

/// Maximum length of a device name
pub const DEVICE_NAME_LEN: usize = 16;

/// Dense device index, assigned in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u8);

impl DeviceId {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    #[allow(clippy::cast_lossless)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One controllable LED strip.
///
/// The logical target (`target_hsv` and its RGB pair) survives turning the
/// strip off; the strip fades towards [`Device::target_color`], which is black
/// while the device is disabled.
#[derive(Debug)]
pub struct Device<D> {
    pub(crate) id: DeviceId,
    pub(crate) name: Option<String<DEVICE_NAME_LEN>>,
    pub(crate) leds: usize,
    pub(crate) driver: D,
    /// Color currently shown on the strip
    pub(crate) current: Rgb,
    /// Logical target in RGB, always paired with `target_hsv`
    pub(crate) target: Rgb,
    pub(crate) target_hsv: Hsv,
    /// Color restored when turning on with a black target
    pub(crate) default_color: Hsv,
    pub(crate) enabled: bool,
    pub(crate) blending: bool,
}

impl<D> Device<D> {
    pub(crate) const fn new(
        id: DeviceId,
        name: Option<String<DEVICE_NAME_LEN>>,
        leds: usize,
        driver: D,
        default_color: Hsv,
    ) -> Self {
        Self {
            id,
            name,
            leds,
            driver,
            current: BLACK,
            target: BLACK,
            target_hsv: Hsv::new(0, 0, 0),
            default_color,
            enabled: false,
            blending: false,
        }
    }

    pub const fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of pixels in the strip
    pub const fn leds(&self) -> usize {
        self.leds
    }

    pub const fn current_color(&self) -> Rgb {
        self.current
    }

    /// Color the strip is fading towards: the logical target, or black when off
    pub const fn target_color(&self) -> Rgb {
        if self.enabled { self.target } else { BLACK }
    }

    /// Logical target in RGB
    pub const fn target_rgb(&self) -> Rgb {
        self.target
    }

    /// Logical target in HSV
    pub const fn target_hsv(&self) -> Hsv {
        self.target_hsv
    }

    pub const fn default_color(&self) -> Hsv {
        self.default_color
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_blending(&self) -> bool {
        self.blending
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Diagnostic one-line summary, see [`DeviceInfo`]
    pub const fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.id,
            enabled: self.enabled,
            color: self.target,
        }
    }

    /// Recompute `blending` from the current and effective target colors
    pub(crate) fn sync_blending(&mut self) {
        self.blending = self.current != self.target_color();
    }
}

/// Fixed-format device summary: `00: enabled  RGB: (255,000,000)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub enabled: bool,
    pub color: Rgb,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.enabled { "enabled " } else { "disabled" };
        write!(
            f,
            "{:02}: {} RGB: ({:03},{:03},{:03})",
            self.id.raw(),
            state,
            self.color.r,
            self.color.g,
            self.color.b
        )
    }
}
