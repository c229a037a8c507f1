//! Message device contract tests
//!
//! These tests pin the caller-visible message format and the error
//! taxonomy of the device.

// ===== Message Format Contract =====
//
// A stored message is always `<received-bytes>(<declared-length> letters)`.
// The annotation reflects the caller-declared length, never a recomputed
// byte count.

/// Annotation suffix format, spelled out for the golden tests below
pub fn annotation(declared_len: usize) -> String {
    format!("({declared_len} letters)")
}
