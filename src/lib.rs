#![no_std]

pub mod blend;
pub mod color;
pub mod config;
pub mod controller;
pub mod datagram;
pub mod device;
pub mod dispatch;
pub mod http;
pub mod operation;
pub mod persistence;
pub mod registry;
pub mod scheduler;

pub use config::ControllerConfig;
pub use controller::LightController;
pub use datagram::{DatagramTransport, Packet, PacketQueue, PacketSender};
pub use device::{Device, DeviceId, DeviceInfo};
pub use dispatch::TextDispatcher;
pub use http::{Request, RequestHandler, RequestServer, Response, Status};
pub use operation::{Action, Command, OpCode, Query, Verb};
pub use persistence::{DefaultColorStore, MemoryStorage, StorageError};
pub use registry::{DEVICES_MAX, DefaultColorError, DeviceRegistry, RegistryError};
pub use scheduler::{Scheduler, SchedulerError, Task, TaskControl, TaskFn, TaskHandle};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The registry is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

impl<T: OutputDriver + ?Sized> OutputDriver for &mut T {
    fn write(&mut self, colors: &[Rgb]) {
        (**self).write(colors);
    }
}
