//! Minimal request/response model for the text transport.
//!
//! The controller never owns a socket. A [`RequestServer`] adapter hands
//! decoded requests to a [`RequestHandler`] and sends back the [`Response`].

use core::fmt;

use heapless::String;

/// Capacity of a response body
pub const MAX_BODY_LEN: usize = 64;

pub type StatusCode = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    InternalError = 500,
}

impl Status {
    pub const fn code(self) -> StatusCode {
        self as StatusCode
    }

    pub const fn reason_phrase(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::InternalError => "Internal Server Error",
        }
    }
}

/// Request path with its named arguments.
///
/// Arguments are read from the query string on demand, so a request can
/// carry any number of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    path: &'a str,
    query: &'a str,
}

impl<'a> Request<'a> {
    /// Request without arguments
    pub const fn new(path: &'a str) -> Self {
        Self { path, query: "" }
    }

    /// Split a request target such as `/set?d=0&c=h&v=ff`.
    ///
    /// An argument without `=` gets an empty value. Values are taken verbatim,
    /// without percent-decoding.
    pub fn parse(target: &'a str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self { path, query }
    }

    pub const fn path(&self) -> &'a str {
        self.path
    }

    /// Value of the first argument called `name`
    pub fn arg(&self, name: &str) -> Option<&'a str> {
        self.args()
            .find(|(arg, _)| *arg == name)
            .map(|(_, value)| value)
    }

    pub fn args(&self) -> impl Iterator<Item = (&'a str, &'a str)> + use<'a> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
    }
}

/// Plain-text response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub body: String<MAX_BODY_LEN>,
}

impl Response {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    /// Response with a fixed body, truncated to [`MAX_BODY_LEN`]
    pub fn text(status: Status, body: &str) -> Self {
        let mut response = Self::new(status);
        for c in body.chars() {
            if response.body.push(c).is_err() {
                break;
            }
        }
        response
    }

    pub fn ok(body: &str) -> Self {
        Self::text(Status::Ok, body)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::text(Status::BadRequest, message)
    }

    pub fn not_found() -> Self {
        Self::text(Status::NotFound, "Page doesn't exist")
    }

    pub fn internal_error(message: &str) -> Self {
        Self::text(Status::InternalError, message)
    }

    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}

impl fmt::Write for Response {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.body.push_str(s).map_err(|()| fmt::Error)
    }
}

/// Produces a response for every request
pub trait RequestHandler {
    fn handle(&mut self, request: &Request<'_>) -> Response;
}

/// Transport side of the text protocol.
///
/// Implementations must not block: `poll` serves at most one pending request
/// and returns right away when nothing is waiting.
pub trait RequestServer {
    /// Serve one pending request, returns `true` if a request was handled
    fn poll<H: RequestHandler>(&mut self, handler: &mut H) -> bool;
}
