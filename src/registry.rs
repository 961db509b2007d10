//! Fixed-capacity device registry.
//!
//! Owns every [`Device`] and implements the device-scoped color operations.
//! Any operation that changes what a strip should show raises a blend
//! request, which the owner turns into arming the blend task
//! (see [`DeviceRegistry::take_blend_request`]).

use core::fmt;

use embedded_storage::Storage;
use heapless::{String, Vec};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{BLACK, Hsv, HsvChannel, Rgb, RgbChannel, hsv2rgb, rgb2hsv};
use crate::device::{DEVICE_NAME_LEN, Device, DeviceId};
use crate::persistence::{DefaultColorStore, StorageError};

/// Default number of devices a registry can hold
pub const DEVICES_MAX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// No free device slot
    Full,
    /// Strip is longer than the frame buffer
    TooManyLeds,
    /// Name does not fit into [`DEVICE_NAME_LEN`] bytes
    NameTooLong,
    /// No device with the requested id
    UnknownDevice,
}

/// Collection of all devices, indexed by [`DeviceId`].
///
/// `MAX_LEDS` is the size of the shared frame buffer used to render a solid
/// color onto any of the strips.
pub struct DeviceRegistry<D, const DEVICES: usize, const MAX_LEDS: usize> {
    devices: Vec<Device<D>, DEVICES>,
    frame: [Rgb; MAX_LEDS],
    blend_requested: bool,
}

impl<D: OutputDriver, const DEVICES: usize, const MAX_LEDS: usize>
    DeviceRegistry<D, DEVICES, MAX_LEDS>
{
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
            frame: [BLACK; MAX_LEDS],
            blend_requested: false,
        }
    }

    /// Register a new strip.
    ///
    /// The strip is switched to black, and its default color is loaded from
    /// `store`. A default color that cannot be read falls back to black.
    pub fn register<S: Storage>(
        &mut self,
        driver: D,
        leds: usize,
        name: Option<&str>,
        store: &mut DefaultColorStore<S>,
    ) -> Result<DeviceId, RegistryError> {
        if self.devices.is_full() {
            #[cfg(feature = "esp32-log")]
            println!("registry: registry full ({} devices)", DEVICES);
            return Err(RegistryError::Full);
        }
        let raw_id = u8::try_from(self.devices.len()).map_err(|_| RegistryError::Full)?;
        if leds > MAX_LEDS {
            return Err(RegistryError::TooManyLeds);
        }
        let name = match name {
            Some(name) => {
                let name = String::<DEVICE_NAME_LEN>::try_from(name)
                    .map_err(|()| RegistryError::NameTooLong)?;
                Some(name)
            }
            None => None,
        };

        let id = DeviceId::new(raw_id);
        let default_color = store.read(id).unwrap_or_else(|_e| {
            #[cfg(feature = "esp32-log")]
            println!("registry: no default color for device {}: {:?}", id, _e);
            Hsv::default()
        });

        let mut device = Device::new(id, name, leds, driver, default_color);
        render(&mut device, &mut self.frame);
        if self.devices.push(device).is_err() {
            return Err(RegistryError::Full);
        }
        Ok(id)
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device<D>> {
        self.devices.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device<D>> {
        self.devices.iter()
    }

    /// Find a device by its name
    pub fn find(&self, name: &str) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|device| device.name() == Some(name))
            .map(Device::id)
    }

    /// Resolve a textual selector: a registered decimal id first, then a device name
    pub fn resolve(&self, selector: &str) -> Option<DeviceId> {
        selector
            .parse::<u8>()
            .ok()
            .and_then(|raw| self.get(DeviceId::new(raw)))
            .map(Device::id)
            .or_else(|| self.find(selector))
    }

    /// Turn the strip on.
    ///
    /// A black logical target is replaced by the default color so turning on
    /// never lands on black by accident.
    pub fn enable(&mut self, id: DeviceId) -> Result<(), RegistryError> {
        let device = self.device_mut(id)?;
        if device.enabled {
            return Ok(());
        }
        device.enabled = true;
        if device.target == BLACK {
            device.target_hsv = device.default_color;
            device.target = hsv2rgb(device.default_color);
        }
        self.start_blend(id);
        Ok(())
    }

    /// Turn the strip off, keeping the logical target for the next enable
    pub fn disable(&mut self, id: DeviceId) -> Result<(), RegistryError> {
        let device = self.device_mut(id)?;
        if !device.enabled {
            return Ok(());
        }
        device.enabled = false;
        self.start_blend(id);
        Ok(())
    }

    pub fn toggle(&mut self, id: DeviceId) -> Result<(), RegistryError> {
        if self.device_mut(id)?.enabled {
            self.disable(id)
        } else {
            self.enable(id)
        }
    }

    /// Tri-state enable: `0` turns off, `1` turns on, anything else toggles
    pub fn set_enable(&mut self, id: DeviceId, code: u8) -> Result<(), RegistryError> {
        match code {
            0 => self.disable(id),
            1 => self.enable(id),
            _ => self.toggle(id),
        }
    }

    /// Change one HSV channel of the logical target
    pub fn set_param_hsv(
        &mut self,
        id: DeviceId,
        channel: HsvChannel,
        value: u8,
    ) -> Result<(), RegistryError> {
        let device = self.device_mut(id)?;
        device.target_hsv.set_channel(channel, value);
        device.target = hsv2rgb(device.target_hsv);
        self.did_set_param(id);
        Ok(())
    }

    /// Change one RGB channel of the logical target
    pub fn set_param_rgb(
        &mut self,
        id: DeviceId,
        channel: RgbChannel,
        value: u8,
    ) -> Result<(), RegistryError> {
        let device = self.device_mut(id)?;
        channel.set(&mut device.target, value);
        device.target_hsv = rgb2hsv(device.target);
        self.did_set_param(id);
        Ok(())
    }

    /// Replace the whole logical target
    pub fn set_color(&mut self, id: DeviceId, color: Hsv) -> Result<(), RegistryError> {
        let device = self.device_mut(id)?;
        device.target_hsv = color;
        device.target = hsv2rgb(color);
        self.did_set_param(id);
        Ok(())
    }

    /// Persist a new default color and adopt it once the write succeeded
    pub fn write_default_color<S: Storage>(
        &mut self,
        id: DeviceId,
        color: Hsv,
        store: &mut DefaultColorStore<S>,
    ) -> Result<(), DefaultColorError> {
        let device = self.device_mut(id)?;
        store.write(id, color)?;
        device.default_color = color;
        Ok(())
    }

    /// Reload the default color of a device from the store
    pub fn read_default_color<S: Storage>(
        &mut self,
        id: DeviceId,
        store: &mut DefaultColorStore<S>,
    ) -> Result<Hsv, DefaultColorError> {
        let device = self.device_mut(id)?;
        let color = store.read(id)?;
        device.default_color = color;
        Ok(color)
    }

    /// Consume the pending blend request, if any
    pub fn take_blend_request(&mut self) -> bool {
        core::mem::take(&mut self.blend_requested)
    }

    /// Whether any device is still fading
    pub fn is_blending(&self) -> bool {
        self.devices.iter().any(Device::is_blending)
    }

    /// Push the current color of a device to its strip
    pub fn show(&mut self, id: DeviceId) -> Result<(), RegistryError> {
        let device = self
            .devices
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownDevice)?;
        render(device, &mut self.frame);
        Ok(())
    }

    /// Write the device count followed by one [`DeviceInfo`](crate::device::DeviceInfo) line per device
    pub fn write_summary(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "{} devices registered", self.devices.len())?;
        for device in &self.devices {
            writeln!(out, "{}", device.info())?;
        }
        Ok(())
    }

    /// Devices and the shared frame buffer, borrowed together for blending
    pub(crate) fn parts_mut(&mut self) -> (&mut [Device<D>], &mut [Rgb]) {
        (self.devices.as_mut_slice(), &mut self.frame[..])
    }

    fn device_mut(&mut self, id: DeviceId) -> Result<&mut Device<D>, RegistryError> {
        self.devices
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownDevice)
    }

    /// Brightness decides power: zero turns the strip off, anything else on
    fn did_set_param(&mut self, id: DeviceId) {
        if let Some(device) = self.devices.get_mut(id.index()) {
            device.enabled = device.target_hsv.val != 0;
            self.start_blend(id);
        }
    }

    fn start_blend(&mut self, id: DeviceId) {
        if let Some(device) = self.devices.get_mut(id.index()) {
            device.sync_blending();
            #[cfg(feature = "esp32-log")]
            println!("blend: start device {} -> {:?}", id, device.target_color());
        }
        self.blend_requested = true;
    }
}

impl<D: OutputDriver, const DEVICES: usize, const MAX_LEDS: usize> Default
    for DeviceRegistry<D, DEVICES, MAX_LEDS>
{
    fn default() -> Self {
        Self::new()
    }
}

/// Error of the default color operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultColorError {
    Registry(RegistryError),
    Storage(StorageError),
}

impl From<RegistryError> for DefaultColorError {
    fn from(error: RegistryError) -> Self {
        Self::Registry(error)
    }
}

impl From<StorageError> for DefaultColorError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

/// Fill the frame with the current color of the device and write it out
pub(crate) fn render<D: OutputDriver>(device: &mut Device<D>, frame: &mut [Rgb]) {
    let count = device.leds.min(frame.len());
    let frame = &mut frame[..count];
    frame.fill(device.current);
    device.driver.write(frame);
}
