//! Text protocol: `/get` and `/set` requests with named arguments.
//!
//! `d` selects the device (decimal id or name), `c` is the one-letter
//! [`OpCode`] and `v` carries the value of a `set`. Channel values are one or
//! two hex digits, colors are six (`hhssvv`).

use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{parse_hex_byte, parse_hsv_hex};
use crate::device::DeviceId;
use crate::dispatch::{apply, query};
use crate::http::{Request, RequestHandler, Response};
use crate::operation::{Action, Command, OpCode, Query, Verb};
use crate::persistence::DefaultColorStore;
use crate::registry::{DefaultColorError, DeviceRegistry};

pub const PATH_GET: &str = "/get";
pub const PATH_SET: &str = "/set";

pub const ARG_DEVICE: &str = "d";
pub const ARG_COMMAND: &str = "c";
pub const ARG_VALUE: &str = "v";

/// Reply body of a successful `set`
pub const SET_OK: &str = "ok";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// No `d` argument
    MissingDevice,
    /// `d` matches neither an id nor a name
    UnknownDevice,
    /// No `c` argument
    MissingCommand,
    /// `c` is not a known operation code
    InvalidCommand,
    /// Operation code exists, but not for this verb
    UnsupportedCommand,
    /// `set` without a `v` argument
    MissingValue,
    /// `v` is not valid for the operation
    InvalidValue,
}

impl DecodeError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingDevice => "missing device",
            Self::UnknownDevice => "unknown device",
            Self::MissingCommand => "missing command",
            Self::InvalidCommand => "invalid command",
            Self::UnsupportedCommand => "unsupported command",
            Self::MissingValue => "missing value",
            Self::InvalidValue => "invalid value",
        }
    }
}

fn non_empty<'a>(request: &Request<'a>, name: &str) -> Option<&'a str> {
    request.arg(name).filter(|value| !value.is_empty())
}

fn decode_target<D: OutputDriver, const DEVICES: usize, const MAX_LEDS: usize>(
    registry: &DeviceRegistry<D, DEVICES, MAX_LEDS>,
    request: &Request<'_>,
    verb: Verb,
) -> Result<(DeviceId, OpCode), DecodeError> {
    let selector = non_empty(request, ARG_DEVICE).ok_or(DecodeError::MissingDevice)?;
    let device = registry
        .resolve(selector)
        .ok_or(DecodeError::UnknownDevice)?;
    let code = non_empty(request, ARG_COMMAND).ok_or(DecodeError::MissingCommand)?;
    let code = OpCode::parse_from_str(code).ok_or(DecodeError::InvalidCommand)?;
    if !code.supports(verb) {
        return Err(DecodeError::UnsupportedCommand);
    }
    Ok((device, code))
}

/// Decode a `/get` request
pub fn decode_get<D: OutputDriver, const DEVICES: usize, const MAX_LEDS: usize>(
    registry: &DeviceRegistry<D, DEVICES, MAX_LEDS>,
    request: &Request<'_>,
) -> Result<(DeviceId, Query), DecodeError> {
    let (device, code) = decode_target(registry, request, Verb::Get)?;
    let query = code.query().ok_or(DecodeError::UnsupportedCommand)?;
    Ok((device, query))
}

/// Decode a `/set` request
pub fn decode_set<D: OutputDriver, const DEVICES: usize, const MAX_LEDS: usize>(
    registry: &DeviceRegistry<D, DEVICES, MAX_LEDS>,
    request: &Request<'_>,
) -> Result<Command, DecodeError> {
    let (device, code) = decode_target(registry, request, Verb::Set)?;
    let value = non_empty(request, ARG_VALUE).ok_or(DecodeError::MissingValue)?;
    let byte = || parse_hex_byte(value).ok_or(DecodeError::InvalidValue);
    let color = || parse_hsv_hex(value).ok_or(DecodeError::InvalidValue);

    let action = match code {
        OpCode::SetEnable => Action::SetEnable(byte()?),
        OpCode::Color => Action::SetColor(color()?),
        OpCode::DefaultColor => Action::SetDefaultColor(color()?),
        _ => {
            if let Some(channel) = code.hsv_channel() {
                Action::SetHsv(channel, byte()?)
            } else if let Some(channel) = code.rgb_channel() {
                Action::SetRgb(channel, byte()?)
            } else {
                return Err(DecodeError::UnsupportedCommand);
            }
        }
    };
    Ok(Command::new(device, action))
}

/// [`RequestHandler`] serving `/get` and `/set` against a registry
pub struct TextDispatcher<'a, D, S, const DEVICES: usize, const MAX_LEDS: usize> {
    registry: &'a mut DeviceRegistry<D, DEVICES, MAX_LEDS>,
    store: &'a mut DefaultColorStore<S>,
}

impl<'a, D, S, const DEVICES: usize, const MAX_LEDS: usize>
    TextDispatcher<'a, D, S, DEVICES, MAX_LEDS>
where
    D: OutputDriver,
    S: Storage,
{
    pub fn new(
        registry: &'a mut DeviceRegistry<D, DEVICES, MAX_LEDS>,
        store: &'a mut DefaultColorStore<S>,
    ) -> Self {
        Self { registry, store }
    }

    fn get(&self, request: &Request<'_>) -> Response {
        let (id, requested) = match decode_get(&*self.registry, request) {
            Ok(decoded) => decoded,
            Err(error) => return reject(request, error),
        };
        let Some(device) = self.registry.get(id) else {
            return reject(request, DecodeError::UnknownDevice);
        };
        let mut response = Response::ok("");
        if query(device, requested, &mut response).is_err() {
            return Response::internal_error("response too long");
        }
        response
    }

    fn set(&mut self, request: &Request<'_>) -> Response {
        let command = match decode_set(&*self.registry, request) {
            Ok(command) => command,
            Err(error) => return reject(request, error),
        };
        match apply(&mut *self.registry, &mut *self.store, command) {
            Ok(()) => Response::ok(SET_OK),
            Err(DefaultColorError::Registry(_)) => {
                reject(request, DecodeError::UnknownDevice)
            }
            Err(DefaultColorError::Storage(_e)) => {
                #[cfg(feature = "esp32-log")]
                println!("http: storing default color failed: {:?}", _e);
                Response::internal_error("storage error")
            }
        }
    }
}

impl<D, S, const DEVICES: usize, const MAX_LEDS: usize> RequestHandler
    for TextDispatcher<'_, D, S, DEVICES, MAX_LEDS>
where
    D: OutputDriver,
    S: Storage,
{
    fn handle(&mut self, request: &Request<'_>) -> Response {
        match request.path() {
            PATH_GET => self.get(request),
            PATH_SET => self.set(request),
            _ => Response::not_found(),
        }
    }
}

fn reject(_request: &Request<'_>, error: DecodeError) -> Response {
    #[cfg(feature = "esp32-log")]
    println!("http: rejected {}: {}", _request.path(), error.message());
    Response::bad_request(error.message())
}
