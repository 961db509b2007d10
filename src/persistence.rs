//! Default color persistence.
//!
//! Every device owns one 3-byte `hue, sat, val` record at offset `3 * id`.
//! Ids are dense and stable, so records never overlap and the whole layout
//! takes `3 * device_count` bytes.

use embedded_storage::{ReadStorage, Storage};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Hsv;
use crate::device::DeviceId;

/// Size of one default color record
pub const RECORD_LEN: usize = 3;

/// Error type for the persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Record does not fit into the storage
    OutOfBounds,
    /// Storage driver rejected the operation
    Driver,
}

/// Reads and writes per-device default colors on a byte-addressable storage
#[derive(Debug)]
pub struct DefaultColorStore<S> {
    storage: S,
}

impl<S: Storage> DefaultColorStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Byte offset of the record owned by `id`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn offset(id: DeviceId) -> u32 {
        (id.index() * RECORD_LEN) as u32
    }

    /// Read the default color of a device
    pub fn read(&mut self, id: DeviceId) -> Result<Hsv, StorageError> {
        self.check_bounds(id)?;
        let mut record = [0u8; RECORD_LEN];
        self.storage
            .read(Self::offset(id), &mut record)
            .map_err(|_| {
                #[cfg(feature = "esp32-log")]
                println!("storage: error reading default color of device {}", id);
                StorageError::Driver
            })?;
        Ok(Hsv::from_bytes(record))
    }

    /// Write the default color of a device
    pub fn write(&mut self, id: DeviceId, color: Hsv) -> Result<(), StorageError> {
        self.check_bounds(id)?;
        self.storage
            .write(Self::offset(id), &color.to_bytes())
            .map_err(|_| {
                #[cfg(feature = "esp32-log")]
                println!("storage: error writing default color of device {}", id);
                StorageError::Driver
            })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn check_bounds(&self, id: DeviceId) -> Result<(), StorageError> {
        if id.index() * RECORD_LEN + RECORD_LEN > self.storage.capacity() {
            return Err(StorageError::OutOfBounds);
        }
        Ok(())
    }
}

/// RAM-backed storage, for hosts without EEPROM and for tests
#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> MemoryStorage<N> {
    /// Zero-filled storage
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    fn range(offset: u32, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let start = usize::try_from(offset).map_err(|_| StorageError::OutOfBounds)?;
        let end = start.checked_add(len).ok_or(StorageError::OutOfBounds)?;
        if end > N {
            return Err(StorageError::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadStorage for MemoryStorage<N> {
    type Error = StorageError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = Self::range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for MemoryStorage<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = Self::range(offset, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }
}
