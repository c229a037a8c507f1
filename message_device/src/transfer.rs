//! Caller memory transfer boundary
//!
//! Every byte that enters or leaves the device crosses the boundary
//! between caller-owned memory and device-owned storage, and that
//! crossing can fail. The traits here make the boundary explicit so the
//! store never touches caller memory directly.

use thiserror::Error;

/// Failure of a byte transfer across the caller boundary
///
/// Carries no detail on purpose: from the device's point of view the
/// caller's buffer was simply unreadable or unwritable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("caller-supplied buffer could not be transferred")]
pub struct TransferFault;

/// Supplies bytes for a write
pub trait CallerSource {
    /// Copies the caller's bytes into device-side storage
    fn transfer_in(&self) -> Result<Vec<u8>, TransferFault>;
}

/// Receives bytes from a read
pub trait CallerSink {
    /// Copies device-side bytes out to the caller
    fn transfer_out(&mut self, bytes: &[u8]) -> Result<(), TransferFault>;
}

impl CallerSource for [u8] {
    fn transfer_in(&self) -> Result<Vec<u8>, TransferFault> {
        Ok(self.to_vec())
    }
}

impl CallerSource for Vec<u8> {
    fn transfer_in(&self) -> Result<Vec<u8>, TransferFault> {
        Ok(self.clone())
    }
}

impl CallerSource for str {
    fn transfer_in(&self) -> Result<Vec<u8>, TransferFault> {
        Ok(self.as_bytes().to_vec())
    }
}

impl CallerSink for Vec<u8> {
    fn transfer_out(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        self.clear();
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Fault-injecting transfer doubles
///
/// Deterministic stand-ins for callers whose memory cannot be reached,
/// used by unit and contract tests to exercise the failure paths.
pub mod test_doubles {
    use super::{CallerSink, CallerSource, TransferFault};

    /// A source whose memory is never readable
    #[derive(Debug, Default)]
    pub struct FaultySource;

    impl CallerSource for FaultySource {
        fn transfer_in(&self) -> Result<Vec<u8>, TransferFault> {
            Err(TransferFault)
        }
    }

    /// A sink whose memory is never writable
    #[derive(Debug, Default)]
    pub struct FaultySink;

    impl CallerSink for FaultySink {
        fn transfer_out(&mut self, _bytes: &[u8]) -> Result<(), TransferFault> {
            Err(TransferFault)
        }
    }

    /// A sink that fails a configured number of times, then succeeds
    ///
    /// Models a transient fault so tests can verify that a retry after a
    /// failed read still sees the original message.
    #[derive(Debug, Default)]
    pub struct FlakySink {
        failures_left: usize,
        received: Vec<u8>,
    }

    impl FlakySink {
        /// Creates a sink that fails the next `failures` transfers
        pub fn failing(failures: usize) -> Self {
            Self {
                failures_left: failures,
                received: Vec::new(),
            }
        }

        /// Returns the bytes received by the last successful transfer
        pub fn received(&self) -> &[u8] {
            &self.received
        }
    }

    impl CallerSink for FlakySink {
        fn transfer_out(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(TransferFault);
            }
            self.received.clear();
            self.received.extend_from_slice(bytes);
            Ok(())
        }
    }
}
