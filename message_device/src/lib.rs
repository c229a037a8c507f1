//! # Message Device
//!
//! This crate implements a single-slot exclusive-access message device.
//!
//! ## Philosophy
//!
//! The device is an explicitly constructed, explicitly owned object, not a
//! global singleton. One message slot, one session at a time:
//!
//! - The **exclusion gate** admits at most one open session; competing
//!   opens block on a condition variable until the holder closes.
//! - The **message store** holds one message. Writes replace it (with a
//!   declared-length annotation appended); reads drain it.
//! - All byte traffic with the caller crosses an explicit transfer
//!   boundary that can fail, modeled by the [`CallerSource`] and
//!   [`CallerSink`] traits.
//!
//! Undefined behavior is not an option: closing without holding the gate,
//! touching the store without a session, and overflowing the buffer are
//! all explicit [`DeviceError`] variants.

pub mod device;
pub mod error;
pub mod gate;
pub mod store;
pub mod transfer;

pub use device::{DeviceConfig, MessageDevice};
pub use error::DeviceError;
pub use gate::{ExclusionGate, SessionHandle};
pub use store::{MessageStore, DEFAULT_CAPACITY};
pub use transfer::{CallerSink, CallerSource, TransferFault};
