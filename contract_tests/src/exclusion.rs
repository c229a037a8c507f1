//! Mutual-exclusion contract tests
//!
//! These tests put real threads behind one device and verify that the
//! open/close window never admits two sessions at once, that blocked
//! opens proceed after the holder closes, and that no caller is
//! silently dropped.
