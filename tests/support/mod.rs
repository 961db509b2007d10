#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_storage::{ReadStorage, Storage};
use myrtio_strip_controller::{OutputDriver, Request, RequestHandler, RequestServer, Response, Rgb};

/// Driver keeping every frame it was asked to show
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub frames: Vec<Vec<Rgb>>,
}

impl RecordingDriver {
    pub fn last_frame(&self) -> Option<&[Rgb]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Rgb]) {
        self.frames.push(colors.to_vec());
    }
}

/// Text transport replaying queued request targets, one per poll
#[derive(Debug, Default)]
pub struct ScriptedRequests {
    pending: VecDeque<String>,
    pub responses: Vec<Response>,
}

impl ScriptedRequests {
    pub fn push(&mut self, target: &str) {
        self.pending.push_back(target.to_string());
    }
}

impl RequestServer for ScriptedRequests {
    fn poll<H: RequestHandler>(&mut self, handler: &mut H) -> bool {
        let Some(target) = self.pending.pop_front() else {
            return false;
        };
        let response = handler.handle(&Request::parse(&target));
        self.responses.push(response);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverFault;

/// Storage whose every access fails
#[derive(Debug, Default)]
pub struct FailingStorage;

impl ReadStorage for FailingStorage {
    type Error = DriverFault;

    fn read(&mut self, _offset: u32, _bytes: &mut [u8]) -> Result<(), Self::Error> {
        Err(DriverFault)
    }

    fn capacity(&self) -> usize {
        64
    }
}

impl Storage for FailingStorage {
    fn write(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), Self::Error> {
        Err(DriverFault)
    }
}
