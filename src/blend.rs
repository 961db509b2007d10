//! Constant-step color fades.
//!
//! Every channel moves one unit per step towards its target, independently of
//! the other channels. A fade therefore takes as many steps as the largest
//! channel difference, and channels with smaller differences arrive first.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::Rgb;
use crate::registry::{DeviceRegistry, render};

/// Move `current` one unit towards `target`, never past it
#[inline]
pub const fn step_channel(current: u8, target: u8) -> u8 {
    if current < target {
        current + 1
    } else if current > target {
        current - 1
    } else {
        current
    }
}

/// Step every channel of `current` towards `target`
pub const fn step_color(current: Rgb, target: Rgb) -> Rgb {
    Rgb {
        r: step_channel(current.r, target.r),
        g: step_channel(current.g, target.g),
        b: step_channel(current.b, target.b),
    }
}

/// Advance every fading device by one step and render it.
///
/// Devices that are not fading are left untouched. Returns `true` while at
/// least one device still differs from its target, so the caller can disarm
/// the blend task once everything has settled.
pub fn blend_step<D: OutputDriver, const DEVICES: usize, const MAX_LEDS: usize>(
    registry: &mut DeviceRegistry<D, DEVICES, MAX_LEDS>,
) -> bool {
    let (devices, frame) = registry.parts_mut();
    let mut blending = false;
    for device in devices.iter_mut().filter(|device| device.blending) {
        device.current = step_color(device.current, device.target_color());
        render(device, frame);
        device.sync_blending();
        blending |= device.blending;
    }
    #[cfg(feature = "esp32-log")]
    if !blending {
        println!("blend: all devices settled");
    }
    blending
}
