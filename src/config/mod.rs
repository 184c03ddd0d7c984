//! Session and per-frame configuration.

/// Partial option sets merged into the session configuration.
pub mod options;
/// Resolved configuration and its value types.
pub mod session;
