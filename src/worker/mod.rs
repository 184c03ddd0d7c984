//! Worker units, the pool that owns them, and the messages they exchange.

/// Encoder seam run inside each worker unit.
pub mod encoder;
pub(crate) mod pool;
/// Encoded page output and the page writer.
pub mod result;
/// Encode task and palette types.
pub mod task;
pub(crate) mod unit;
