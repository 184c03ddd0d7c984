//! Caller-facing encode session.

/// Session object, abort handle and run driver.
pub mod encode_session;
