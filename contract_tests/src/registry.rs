//! Device registry contract tests
//!
//! These tests define the stable metadata contract for registered
//! devices, including the serialized descriptor shape.
