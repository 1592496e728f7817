//! Utility modules.

/// Log sanitization utilities to prevent secrets and large bodies from reaching logs.
pub mod log_sanitizer;
