use crate::events::bus::BusEvent;
use crate::schedule::reassemble::Artifact;

/// Names listeners subscribe to on an [`crate::EncodeSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A run has started dispatching frames.
    Start,
    /// Frame completion counter changed.
    Progress,
    /// The artifact is ready.
    Finished,
    /// The run was aborted by the caller.
    Abort,
    /// The run failed.
    Error,
}

/// Events raised by a session during a run.
#[derive(Clone, Debug)]
pub enum EncoderEvent {
    /// Emitted once per run, after the initial dispatch.
    Start,
    /// Emitted with `loaded = 0` at run start, then once per completed frame.
    Progress {
        /// Frames encoded so far.
        loaded: usize,
        /// Frames in the run.
        total: usize,
    },
    /// Emitted once when every frame has been reassembled.
    Finished {
        /// The encoded animation.
        artifact: Artifact,
    },
    /// Emitted once when a running run is aborted.
    Abort,
    /// Emitted once when the run ends in the failed state.
    Error {
        /// Display form of the failure.
        message: String,
    },
}

impl BusEvent for EncoderEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Self::Start => EventKind::Start,
            Self::Progress { .. } => EventKind::Progress,
            Self::Finished { .. } => EventKind::Finished,
            Self::Abort => EventKind::Abort,
            Self::Error { .. } => EventKind::Error,
        }
    }
}
