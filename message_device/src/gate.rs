//! Exclusion gate for single-session access
//!
//! The gate admits at most one open session at a time. A blocked open
//! waits on a condition variable and is woken when the holder closes;
//! there is no wakeup polling and no retry interval. Fairness between
//! waiters is unspecified.
//!
//! An open with no matching close blocks all future opens forever. That
//! liveness risk is accepted: the gate has no timeout and no forced
//! revocation.

use crate::error::DeviceError;
use device_types::SessionId;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Proof of an admitted session
///
/// Minted by a successful open; consumed by the matching close. Not
/// cloneable, so a session cannot be shared or duplicated.
#[derive(Debug)]
pub struct SessionHandle {
    session: SessionId,
}

impl SessionHandle {
    /// Returns the session ID this handle was minted for
    pub fn session_id(&self) -> SessionId {
        self.session
    }
}

#[derive(Debug, Default)]
struct GateState {
    /// Session currently inside the gate, if any
    holder: Option<SessionId>,
    /// Total successful opens, diagnostic only, never reset
    opens: u64,
}

/// Gate serializing access to the device
#[derive(Debug, Default)]
pub struct ExclusionGate {
    state: Mutex<GateState>,
    released: Condvar,
}

impl ExclusionGate {
    /// Creates an unheld gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate, blocking until it is free
    ///
    /// Never fails; if the gate is held, the caller waits until the
    /// holder closes. On success the open counter is incremented and a
    /// fresh handle is returned.
    pub fn open(&self) -> SessionHandle {
        let mut state = self.lock_state();
        while state.holder.is_some() {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Self::admit(&mut state)
    }

    /// Opens the gate without blocking
    ///
    /// Returns `None` if another session currently holds the gate.
    pub fn try_open(&self) -> Option<SessionHandle> {
        let mut state = self.lock_state();
        if state.holder.is_some() {
            return None;
        }
        Some(Self::admit(&mut state))
    }

    /// Closes the gate and wakes one waiting open
    ///
    /// Fails with [`DeviceError::ExclusionViolation`] if `handle` is not
    /// the current holder; in that case the gate is left untouched.
    pub fn close(&self, handle: &SessionHandle) -> Result<(), DeviceError> {
        let mut state = self.lock_state();
        if state.holder != Some(handle.session) {
            return Err(DeviceError::ExclusionViolation);
        }
        state.holder = None;
        self.released.notify_one();
        Ok(())
    }

    /// Verifies that `handle` is the current holder
    pub fn verify_holder(&self, handle: &SessionHandle) -> Result<(), DeviceError> {
        let state = self.lock_state();
        if state.holder == Some(handle.session) {
            Ok(())
        } else {
            Err(DeviceError::ExclusionViolation)
        }
    }

    /// Returns the total number of successful opens
    pub fn open_count(&self) -> u64 {
        self.lock_state().opens
    }

    /// Returns whether any session currently holds the gate
    pub fn is_held(&self) -> bool {
        self.lock_state().holder.is_some()
    }

    fn admit(state: &mut GateState) -> SessionHandle {
        let session = SessionId::new();
        state.holder = Some(session);
        state.opens += 1;
        SessionHandle { session }
    }

    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        // The state is a holder marker plus a counter; both stay
        // consistent even if a panicking thread poisoned the mutex.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_open_then_close() {
        let gate = ExclusionGate::new();
        let handle = gate.open();
        assert!(gate.is_held());
        gate.close(&handle).unwrap();
        assert!(!gate.is_held());
    }

    #[test]
    fn test_open_counter_increments() {
        let gate = ExclusionGate::new();
        assert_eq!(gate.open_count(), 0);

        let h1 = gate.open();
        gate.close(&h1).unwrap();
        let h2 = gate.open();
        gate.close(&h2).unwrap();

        assert_eq!(gate.open_count(), 2);
    }

    #[test]
    fn test_try_open_while_held() {
        let gate = ExclusionGate::new();
        let handle = gate.open();
        assert!(gate.try_open().is_none());
        gate.close(&handle).unwrap();
        assert!(gate.try_open().is_some());
    }

    #[test]
    fn test_close_without_open_rejected() {
        let gate = ExclusionGate::new();
        let other = ExclusionGate::new();
        let foreign = other.open();

        assert_eq!(gate.close(&foreign), Err(DeviceError::ExclusionViolation));
    }

    #[test]
    fn test_double_close_rejected() {
        let gate = ExclusionGate::new();
        let handle = gate.open();
        gate.close(&handle).unwrap();
        assert_eq!(gate.close(&handle), Err(DeviceError::ExclusionViolation));
    }

    #[test]
    fn test_stale_handle_fails_verification() {
        let gate = ExclusionGate::new();
        let first = gate.open();
        gate.close(&first).unwrap();

        let _second = gate.open();
        assert_eq!(
            gate.verify_holder(&first),
            Err(DeviceError::ExclusionViolation)
        );
    }

    #[test]
    fn test_second_open_blocks_until_close() {
        let gate = Arc::new(ExclusionGate::new());
        let first = gate.open();

        let gate2 = Arc::clone(&gate);
        let waiter = thread::spawn(move || {
            let handle = gate2.open();
            gate2.close(&handle).unwrap();
        });

        // The waiter must still be blocked while we hold the gate.
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        gate.close(&first).unwrap();
        waiter.join().unwrap();
        assert_eq!(gate.open_count(), 2);
    }
}
