//! Binary datagram protocol.
//!
//! The datagram length selects the meaning, the first byte is always the
//! device id:
//!
//! | len | payload                    | action                        |
//! |-----|----------------------------|-------------------------------|
//! | 1   | `id`                       | toggle                        |
//! | 2   | `id, code`                 | tri-state enable code         |
//! | 3   | `id, channel, value`       | one HSV channel, channel 0-2  |
//! | 4   | `id, hue, sat, val`        | full HSV color                |
//!
//! Anything else is discarded. Nothing is ever sent back.

use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{Hsv, HsvChannel};
use crate::datagram::{DatagramTransport, MAX_PACKET_LEN};
use crate::device::DeviceId;
use crate::dispatch::apply;
use crate::operation::{Action, Command};
use crate::persistence::DefaultColorStore;
use crate::registry::DeviceRegistry;

/// Decode one datagram, `None` if its shape is not recognized
pub fn decode(packet: &[u8]) -> Option<Command> {
    let (device, action) = match *packet {
        [device] => (device, Action::Toggle),
        [device, code] => (device, Action::SetEnable(code)),
        [device, channel, value] => {
            (device, Action::SetHsv(HsvChannel::from_index(channel)?, value))
        }
        [device, hue, sat, val] => (device, Action::SetColor(Hsv::new(hue, sat, val))),
        _ => return None,
    };
    Some(Command::new(DeviceId::new(device), action))
}

/// Receive and execute at most one datagram.
///
/// Returns `true` if a datagram was consumed, whether or not it was valid.
pub fn dispatch<T, D, S, const DEVICES: usize, const MAX_LEDS: usize>(
    transport: &mut T,
    registry: &mut DeviceRegistry<D, DEVICES, MAX_LEDS>,
    store: &mut DefaultColorStore<S>,
) -> bool
where
    T: DatagramTransport,
    D: OutputDriver,
    S: Storage,
{
    let mut buf = [0u8; MAX_PACKET_LEN];
    let Some(len) = transport.receive(&mut buf) else {
        return false;
    };
    if len > buf.len() {
        #[cfg(feature = "esp32-log")]
        println!("udp: dropped oversized datagram ({} bytes)", len);
        return true;
    }

    let Some(command) = decode(&buf[..len]) else {
        #[cfg(feature = "esp32-log")]
        println!("udp: dropped datagram of {} bytes", len);
        return true;
    };
    if registry.get(command.device).is_none() {
        #[cfg(feature = "esp32-log")]
        println!("udp: unknown device {}", command.device);
        return true;
    }
    if let Err(_e) = apply(registry, store, command) {
        #[cfg(feature = "esp32-log")]
        println!("udp: command failed: {:?}", _e);
    }
    true
}
