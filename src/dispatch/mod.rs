//! Translation of transport input into registry calls.
//!
//! Both front ends decode into the same [`Command`] and go through [`apply`],
//! so equal intents always end in equal registry mutations.

pub mod datagram;
pub mod text;

use core::fmt;

use embedded_storage::Storage;

use crate::OutputDriver;
use crate::device::Device;
use crate::operation::{Action, Command, Query};
use crate::persistence::DefaultColorStore;
use crate::registry::{DefaultColorError, DeviceRegistry};

pub use text::TextDispatcher;

/// Execute a decoded command on the registry
pub fn apply<D, S, const DEVICES: usize, const MAX_LEDS: usize>(
    registry: &mut DeviceRegistry<D, DEVICES, MAX_LEDS>,
    store: &mut DefaultColorStore<S>,
    command: Command,
) -> Result<(), DefaultColorError>
where
    D: OutputDriver,
    S: Storage,
{
    let id = command.device;
    match command.action {
        Action::SetEnable(code) => registry.set_enable(id, code)?,
        Action::Toggle => registry.toggle(id)?,
        Action::SetHsv(channel, value) => registry.set_param_hsv(id, channel, value)?,
        Action::SetRgb(channel, value) => registry.set_param_rgb(id, channel, value)?,
        Action::SetColor(color) => registry.set_color(id, color)?,
        Action::SetDefaultColor(color) => registry.write_default_color(id, color, store)?,
    }
    Ok(())
}

/// Write the answer to `query` for one device.
///
/// Channels are decimal, colors are `hhssvv` in lowercase hex.
pub fn query<D>(device: &Device<D>, query: Query, out: &mut impl fmt::Write) -> fmt::Result {
    match query {
        Query::Enabled => out.write_str(if device.is_enabled() { "1" } else { "0" }),
        Query::Hsv(channel) => write!(out, "{}", device.target_hsv().channel(channel)),
        Query::Color => write!(out, "{:x}", device.target_hsv()),
        Query::DefaultColor => write!(out, "{:x}", device.default_color()),
        Query::Rgb(channel) => write!(out, "{}", channel.get(device.target_rgb())),
        Query::Info => write!(out, "{}", device.info()),
    }
}
