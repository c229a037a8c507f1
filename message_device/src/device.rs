//! Device facade combining gate, store, and diagnostics
//!
//! `MessageDevice` is the unit callers interact with: open for exclusive
//! access, write/read the message slot, close to let the next session
//! in. The device is `Sync` and intended to be shared behind an `Arc`.

use crate::error::DeviceError;
use crate::gate::{ExclusionGate, SessionHandle};
use crate::store::{MessageStore, DEFAULT_CAPACITY};
use crate::transfer::{CallerSink, CallerSource};
use device_log::{LogEntry, LogLevel, LogSink};
use device_types::{DeviceId, DeviceName};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Construction parameters for a message device
pub struct DeviceConfig {
    name: DeviceName,
    capacity: usize,
    log: Option<Arc<dyn LogSink>>,
}

impl DeviceConfig {
    /// Creates a config with the default capacity and no log sink
    pub fn new(name: impl Into<DeviceName>) -> Self {
        Self {
            name: name.into(),
            capacity: DEFAULT_CAPACITY,
            log: None,
        }
    }

    /// Sets the message buffer capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Attaches a diagnostic log sink
    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = Some(log);
        self
    }
}

/// Exclusive-access single-slot message device
pub struct MessageDevice {
    id: DeviceId,
    name: DeviceName,
    gate: ExclusionGate,
    // The gate already serializes sessions; this mutex exists so the
    // device is Sync and is uncontended by protocol.
    store: Mutex<MessageStore>,
    log: Option<Arc<dyn LogSink>>,
}

impl std::fmt::Debug for MessageDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDevice")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl MessageDevice {
    /// Creates a device from a config
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            id: DeviceId::new(),
            name: config.name,
            gate: ExclusionGate::new(),
            store: Mutex::new(MessageStore::with_capacity(config.capacity)),
            log: config.log,
        }
    }

    /// Returns the device ID
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the device name
    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    /// Returns the message buffer capacity
    pub fn capacity(&self) -> usize {
        self.lock_store().capacity()
    }

    /// Returns the total number of successful opens
    pub fn open_count(&self) -> u64 {
        self.gate.open_count()
    }

    /// Opens the device, blocking until exclusive access is granted
    pub fn open(&self) -> SessionHandle {
        let handle = self.gate.open();
        self.record(
            LogEntry::new(
                LogLevel::Info,
                format!("device opened {} time(s)", self.gate.open_count()),
            )
            .with_source(handle.session_id())
            .with_field("device", self.name.as_str()),
        );
        handle
    }

    /// Opens the device without blocking
    ///
    /// Returns `None` if another session currently holds it open.
    pub fn try_open(&self) -> Option<SessionHandle> {
        let handle = self.gate.try_open()?;
        self.record(
            LogEntry::new(
                LogLevel::Info,
                format!("device opened {} time(s)", self.gate.open_count()),
            )
            .with_source(handle.session_id())
            .with_field("device", self.name.as_str()),
        );
        Some(handle)
    }

    /// Writes a new message, replacing any stored one
    ///
    /// Requires the handle of the session currently holding the device.
    /// Returns the declared length as the number of bytes accepted.
    pub fn write(
        &self,
        handle: &SessionHandle,
        source: &(impl CallerSource + ?Sized),
        declared_len: usize,
    ) -> Result<usize, DeviceError> {
        self.gate.verify_holder(handle)?;
        let result = self.lock_store().write(source, declared_len);
        match &result {
            Ok(accepted) => self.record(
                LogEntry::new(
                    LogLevel::Info,
                    format!("received {accepted} characters from the caller"),
                )
                .with_source(handle.session_id())
                .with_field("device", self.name.as_str()),
            ),
            Err(err) => self.record(
                LogEntry::new(LogLevel::Warn, format!("write failed: {err}"))
                    .with_source(handle.session_id())
                    .with_field("device", self.name.as_str()),
            ),
        }
        result
    }

    /// Reads and drains the stored message
    ///
    /// Requires the handle of the session currently holding the device.
    /// Returns the number of bytes copied out; zero if the slot was
    /// empty or already drained.
    pub fn read(
        &self,
        handle: &SessionHandle,
        sink: &mut (impl CallerSink + ?Sized),
    ) -> Result<usize, DeviceError> {
        self.gate.verify_holder(handle)?;
        let result = self.lock_store().read(sink);
        match &result {
            Ok(sent) => self.record(
                LogEntry::new(LogLevel::Info, format!("sent {sent} characters to the caller"))
                    .with_source(handle.session_id())
                    .with_field("device", self.name.as_str()),
            ),
            Err(err) => self.record(
                LogEntry::new(LogLevel::Warn, format!("read failed: {err}"))
                    .with_source(handle.session_id())
                    .with_field("device", self.name.as_str()),
            ),
        }
        result
    }

    /// Closes the session, releasing the device for the next open
    ///
    /// Consumes the handle. Fails with
    /// [`DeviceError::ExclusionViolation`] if the handle is not the
    /// current holder.
    pub fn close(&self, handle: SessionHandle) -> Result<(), DeviceError> {
        self.gate.close(&handle)?;
        self.record(
            LogEntry::new(LogLevel::Info, "device closed")
                .with_source(handle.session_id())
                .with_field("device", self.name.as_str()),
        );
        Ok(())
    }

    fn record(&self, entry: LogEntry) {
        if let Some(log) = &self.log {
            log.record(entry);
        }
    }

    fn lock_store(&self) -> MutexGuard<'_, MessageStore> {
        // Store mutations are all-or-nothing, so recovering from a
        // poisoned lock observes a consistent slot.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
