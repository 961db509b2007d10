//! Datagram transport and an interrupt-safe datagram queue.
//!
//! The queue is built on `critical-section` and `heapless::Deque`, so a
//! network task or an interrupt handler can push datagrams while the
//! cooperative loop drains them.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Longest datagram the controller accepts, longer ones are discarded
pub const MAX_PACKET_LEN: usize = 8;

/// Source of raw datagrams.
///
/// Receiving consumes the datagram, so a datagram that cannot be processed
/// is discarded by simply receiving it.
pub trait DatagramTransport {
    /// Copy the next pending datagram into `buf`.
    ///
    /// Returns the full length of the datagram, which is larger than
    /// `buf.len()` when it was truncated, or `None` when nothing is pending.
    fn receive(&mut self, buf: &mut [u8]) -> Option<usize>;
}

/// Datagram stored by value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    bytes: [u8; MAX_PACKET_LEN],
    len: usize,
}

impl Packet {
    /// Copy `data`, keeping its full length even when it does not fit
    pub fn new(data: &[u8]) -> Self {
        let mut bytes = [0; MAX_PACKET_LEN];
        let stored = data.len().min(MAX_PACKET_LEN);
        bytes[..stored].copy_from_slice(&data[..stored]);
        Self {
            bytes,
            len: data.len(),
        }
    }

    /// Length of the original datagram
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored bytes, at most [`MAX_PACKET_LEN`]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len.min(MAX_PACKET_LEN)]
    }
}

/// Error returned when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

/// Bounded queue of datagrams shared between a producer and the control loop
pub struct PacketQueue<const DEPTH: usize> {
    inner: Mutex<RefCell<Deque<Packet, DEPTH>>>,
}

impl<const DEPTH: usize> PacketQueue<DEPTH> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle, may be copied into interrupt handlers
    pub const fn sender(&self) -> PacketSender<'_, DEPTH> {
        PacketSender { queue: self }
    }

    /// Enqueue a datagram, dropping it if the queue is full
    pub fn try_send(&self, data: &[u8]) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(Packet::new(data)).map_err(|_| QueueFull)
        })
    }

    pub fn try_receive(&self) -> Option<Packet> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of pending datagrams
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn receive_into(&self, buf: &mut [u8]) -> Option<usize> {
        let packet = self.try_receive()?;
        let bytes = packet.as_bytes();
        let copied = bytes.len().min(buf.len());
        buf[..copied].copy_from_slice(&bytes[..copied]);
        Some(packet.len())
    }
}

impl<const DEPTH: usize> Default for PacketQueue<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> DatagramTransport for PacketQueue<DEPTH> {
    fn receive(&mut self, buf: &mut [u8]) -> Option<usize> {
        self.receive_into(buf)
    }
}

impl<const DEPTH: usize> DatagramTransport for &PacketQueue<DEPTH> {
    fn receive(&mut self, buf: &mut [u8]) -> Option<usize> {
        self.receive_into(buf)
    }
}

/// Producer side of a [`PacketQueue`]
#[derive(Clone, Copy)]
pub struct PacketSender<'a, const DEPTH: usize> {
    queue: &'a PacketQueue<DEPTH>,
}

impl<const DEPTH: usize> PacketSender<'_, DEPTH> {
    pub fn try_send(&self, data: &[u8]) -> Result<(), QueueFull> {
        self.queue.try_send(data)
    }
}
