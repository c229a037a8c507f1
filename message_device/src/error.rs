//! Error types for device operations

use crate::transfer::TransferFault;
use thiserror::Error;

/// Error types surfaced by device operations
///
/// No variant is fatal to the device itself: after any error the device
/// remains usable by the current and subsequent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Byte transfer across the caller memory boundary failed.
    /// The store is left unchanged from before the call.
    #[error("transfer across the caller memory boundary failed")]
    Transfer,

    /// Close without holding the gate, or read/write with a handle that
    /// is not the current holder.
    #[error("caller does not hold the device open")]
    ExclusionViolation,

    /// The formatted message would not fit in the device buffer.
    #[error("formatted message needs {needed} bytes but capacity is {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },
}

impl From<TransferFault> for DeviceError {
    fn from(_: TransferFault) -> Self {
        DeviceError::Transfer
    }
}
