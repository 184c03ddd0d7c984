//! Event delivery for session progress and completion.

/// Generic typed publish/subscribe bus.
pub mod bus;
/// Session event payloads.
pub mod event;
