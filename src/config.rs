use embassy_time::Duration;

/// Default blend step interval (50 steps per second).
pub const DEFAULT_BLEND_INTERVAL: Duration = Duration::from_millis(20);

/// Default interval between two text transport polls.
pub const DEFAULT_REQUEST_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default interval between two datagram transport polls.
pub const DEFAULT_DATAGRAM_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_DATAGRAM_PORT: u16 = 8000;

/// Configuration for the light controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Interval of the blend task
    pub blend_interval: Duration,
    /// Interval of the text transport poll task
    pub request_poll_interval: Duration,
    /// Interval of the datagram poll task
    pub datagram_poll_interval: Duration,
    /// Port the text transport should listen on
    pub http_port: u16,
    /// Port the datagram transport should listen on
    pub datagram_port: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            blend_interval: DEFAULT_BLEND_INTERVAL,
            request_poll_interval: DEFAULT_REQUEST_POLL_INTERVAL,
            datagram_poll_interval: DEFAULT_DATAGRAM_POLL_INTERVAL,
            http_port: DEFAULT_HTTP_PORT,
            datagram_port: DEFAULT_DATAGRAM_PORT,
        }
    }
}
