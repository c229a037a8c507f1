//! # Device Contract Tests
//!
//! This crate provides "golden" tests for the message-device contracts
//! to ensure they don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the caller-visible message format and
//!   error text are written down as code
//! - **Testability first**: contract tests fail when observable behavior
//!   changes
//! - **Concurrency is part of the contract**: mutual exclusion is
//!   verified under real thread contention, not assumed
//!
//! ## Structure
//!
//! - [`device`]: message format and error contracts
//! - [`registry`]: registration metadata contracts
//! - [`exclusion`]: mutual-exclusion and blocking-open contracts

pub mod device;
pub mod exclusion;
pub mod registry;

/// Common test helpers for contract validation
pub mod test_helpers {
    use device_log::MemoryLog;
    use message_device::{DeviceConfig, MessageDevice};
    use std::sync::Arc;

    /// Creates a device with an attached in-memory log
    pub fn logged_device(name: &str) -> (Arc<MessageDevice>, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let device = Arc::new(MessageDevice::new(
            DeviceConfig::new(name).with_log(log.clone()),
        ));
        (device, log)
    }

    /// Opens, writes, reads, and closes in one session, returning the
    /// bytes read back
    pub fn round_trip(device: &MessageDevice, content: &str, declared_len: usize) -> Vec<u8> {
        let session = device.open();
        device
            .write(&session, content, declared_len)
            .expect("write failed");
        let mut out = Vec::new();
        device.read(&session, &mut out).expect("read failed");
        device.close(session).expect("close failed");
        out
    }
}
