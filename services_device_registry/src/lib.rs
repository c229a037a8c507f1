//! # Device Registry
//!
//! This crate implements name-based registration for message devices.
//!
//! ## Philosophy
//!
//! A device exists independently of any registry; registration only
//! makes it reachable under a name. The registry assigns each device a
//! monotonically increasing node number at registration time and hands
//! out shared handles (`Arc`) on lookup. Unregistering returns the
//! device to the caller; it is never torn down behind anyone's back.

use device_types::{DeviceId, NodeNumber};
use message_device::MessageDevice;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error types for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A device is already registered under this name
    #[error("device name already registered: {0}")]
    NameAlreadyRegistered(String),

    /// No device is registered under this name
    #[error("device name not found: {0}")]
    NameNotFound(String),
}

/// Metadata for a registered device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    pub name: String,
    pub node: NodeNumber,
}

struct Registration {
    device: Arc<MessageDevice>,
    descriptor: DeviceDescriptor,
}

/// Registry mapping device names to devices
///
/// Node numbers count up from zero and are never reused, so a number
/// identifies one registration even after its device is unregistered.
pub struct DeviceRegistry {
    devices: HashMap<String, Registration>,
    next_node: u32,
}

impl DeviceRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
            next_node: 0,
        }
    }

    /// Registers a device under its own name
    ///
    /// Returns the assigned node number.
    pub fn register(&mut self, device: Arc<MessageDevice>) -> Result<NodeNumber, RegistryError> {
        let name = device.name().as_str().to_string();
        if self.devices.contains_key(&name) {
            return Err(RegistryError::NameAlreadyRegistered(name));
        }
        let node = NodeNumber::new(self.next_node);
        self.next_node += 1;
        let descriptor = DeviceDescriptor {
            id: device.id(),
            name: name.clone(),
            node,
        };
        self.devices.insert(name, Registration { device, descriptor });
        Ok(node)
    }

    /// Looks up a device by name
    pub fn lookup(&self, name: &str) -> Result<Arc<MessageDevice>, RegistryError> {
        self.devices
            .get(name)
            .map(|r| Arc::clone(&r.device))
            .ok_or_else(|| RegistryError::NameNotFound(name.to_string()))
    }

    /// Returns the descriptor for a registered device
    pub fn descriptor(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.devices.get(name).map(|r| &r.descriptor)
    }

    /// Lists descriptors of all registered devices, ordered by node number
    pub fn descriptors(&self) -> Vec<&DeviceDescriptor> {
        let mut all: Vec<&DeviceDescriptor> =
            self.devices.values().map(|r| &r.descriptor).collect();
        all.sort_by_key(|d| d.node);
        all
    }

    /// Removes a registration and returns its device
    pub fn unregister(&mut self, name: &str) -> Result<Arc<MessageDevice>, RegistryError> {
        self.devices
            .remove(name)
            .map(|r| r.device)
            .ok_or_else(|| RegistryError::NameNotFound(name.to_string()))
    }

    /// Returns the number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_device::DeviceConfig;

    fn device(name: &str) -> Arc<MessageDevice> {
        Arc::new(MessageDevice::new(DeviceConfig::new(name)))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = DeviceRegistry::new();
        let dev = device("msgslot");
        let node = registry.register(Arc::clone(&dev)).unwrap();
        assert_eq!(node, NodeNumber::new(0));

        let found = registry.lookup("msgslot").unwrap();
        assert_eq!(found.id(), dev.id());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = DeviceRegistry::new();
        registry.register(device("msgslot")).unwrap();

        let result = registry.register(device("msgslot"));
        assert_eq!(
            result,
            Err(RegistryError::NameAlreadyRegistered("msgslot".to_string()))
        );
    }

    #[test]
    fn test_node_numbers_monotonic() {
        let mut registry = DeviceRegistry::new();
        let a = registry.register(device("a")).unwrap();
        let b = registry.register(device("b")).unwrap();
        registry.unregister("a").unwrap();
        let c = registry.register(device("c")).unwrap();

        assert_eq!(a, NodeNumber::new(0));
        assert_eq!(b, NodeNumber::new(1));
        // Numbers are never reused, even after an unregister.
        assert_eq!(c, NodeNumber::new(2));
    }

    #[test]
    fn test_lookup_unknown_name() {
        let registry = DeviceRegistry::new();
        assert_eq!(
            registry.lookup("missing").unwrap_err(),
            RegistryError::NameNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_unregister_returns_device() {
        let mut registry = DeviceRegistry::new();
        let dev = device("msgslot");
        registry.register(Arc::clone(&dev)).unwrap();

        let removed = registry.unregister("msgslot").unwrap();
        assert_eq!(removed.id(), dev.id());
        assert!(registry.is_empty());
        assert!(registry.lookup("msgslot").is_err());
    }

    #[test]
    fn test_descriptors_ordered_by_node() {
        let mut registry = DeviceRegistry::new();
        registry.register(device("b")).unwrap();
        registry.register(device("a")).unwrap();

        let names: Vec<&str> = registry
            .descriptors()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_descriptor_fields() {
        let mut registry = DeviceRegistry::new();
        let dev = device("msgslot");
        registry.register(Arc::clone(&dev)).unwrap();

        let descriptor = registry.descriptor("msgslot").unwrap();
        assert_eq!(descriptor.id, dev.id());
        assert_eq!(descriptor.name, "msgslot");
        assert_eq!(descriptor.node, NodeNumber::new(0));
    }
}
