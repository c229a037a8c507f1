//! Single-slot message store
//!
//! Holds one message at a time. A write replaces the stored message with
//! the caller's bytes plus a declared-length annotation; a read drains
//! the slot. The annotation records the length the caller declared, not
//! the byte count actually transferred; the two may differ and the
//! declared value always wins.

use crate::error::DeviceError;
use crate::transfer::{CallerSink, CallerSource};

/// Default buffer capacity in bytes
pub const DEFAULT_CAPACITY: usize = 256;

/// The device's single message slot
#[derive(Debug)]
pub struct MessageStore {
    buffer: Vec<u8>,
    capacity: usize,
}

impl MessageStore {
    /// Creates an empty store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty store with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::new(),
            capacity,
        }
    }

    /// Returns the fixed buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the readable length of the stored message
    pub fn readable_len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns whether the slot currently holds no message
    pub fn is_drained(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replaces the stored message
    ///
    /// Transfers the caller's bytes in and stores them followed by the
    /// annotation `(<declared_len> letters)`. Returns the declared
    /// length as the number of bytes accepted.
    ///
    /// On any failure (transfer fault, formatted message larger than
    /// the capacity) the previously stored message is left untouched.
    pub fn write(
        &mut self,
        source: &(impl CallerSource + ?Sized),
        declared_len: usize,
    ) -> Result<usize, DeviceError> {
        let mut formatted = source.transfer_in()?;
        let annotation = format!("({declared_len} letters)");
        let needed = formatted.len() + annotation.len();
        if needed > self.capacity {
            return Err(DeviceError::CapacityExceeded {
                needed,
                capacity: self.capacity,
            });
        }
        formatted.extend_from_slice(annotation.as_bytes());
        self.buffer = formatted;
        Ok(declared_len)
    }

    /// Drains the stored message into the caller's sink
    ///
    /// Returns the number of bytes copied out. The slot is reset only
    /// after the transfer succeeds; a failed transfer leaves message and
    /// length untouched so the caller can retry. Reading an empty slot
    /// is valid and returns zero bytes.
    pub fn read(&mut self, sink: &mut (impl CallerSink + ?Sized)) -> Result<usize, DeviceError> {
        sink.transfer_out(&self.buffer)?;
        let sent = self.buffer.len();
        self.buffer.clear();
        Ok(sent)
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
