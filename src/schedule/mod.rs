//! Run scheduling: result collection, reassembly and run state.

/// Page reassembly and the output artifact.
pub mod reassemble;
pub(crate) mod scheduler;
/// Run lifecycle states.
pub mod status;
pub(crate) mod table;
