use crate::foundation::core::FrameIndex;

/// Crate-wide result alias.
pub type GifResult<T> = Result<T, GifError>;

/// Errors raised by the session, the scheduler and the worker pool.
///
/// Usage errors (`InvalidState`, `MissingDimensions`, `NoFrames`, `InvalidImage`, `Validation`)
/// are returned synchronously from the offending call. Everything else ends the current run in
/// the failed state and is reported from [`crate::EncodeSession::wait`].
#[derive(thiserror::Error, Debug)]
pub enum GifError {
    /// Operation not allowed in the current run state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// `start()` called before both output dimensions were known.
    #[error("missing dimensions: width and height must be set prior to rendering")]
    MissingDimensions,

    /// `start()` called with an empty frame queue.
    #[error("no frames queued")]
    NoFrames,

    /// `add_frame` given a pixel source form the encoder cannot read.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A queued frame could not produce pixels for its task.
    #[error("invalid frame {index}: {message}")]
    InvalidFrame {
        /// Queue position of the offending frame.
        index: FrameIndex,
        /// What went wrong.
        message: String,
    },

    /// Dispatch attempted while no worker unit was idle.
    #[error("no free workers")]
    NoFreeWorker,

    /// Dispatch targeted a unit that already holds a task.
    #[error("worker {0} is busy")]
    WorkerBusy(u32),

    /// A worker returned a result that violates the page contract.
    #[error("invalid result: {0}")]
    InvalidResult(String),

    /// The encoder reported an error (or panicked) for a frame.
    #[error("worker failed on frame {index}: {message}")]
    WorkerFailed {
        /// Frame the worker was encoding.
        index: FrameIndex,
        /// Encoder error text.
        message: String,
    },

    /// No worker completed within the configured timeout.
    #[error("worker timeout: no result within {0} ms")]
    WorkerTimeout(u64),

    /// Rejected configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// The run was aborted before producing an artifact.
    #[error("run aborted")]
    Aborted,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifError {
    /// Build a [`GifError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`GifError::InvalidImage`] value.
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Build a [`GifError::InvalidFrame`] value.
    pub fn invalid_frame(index: FrameIndex, msg: impl Into<String>) -> Self {
        Self::InvalidFrame {
            index,
            message: msg.into(),
        }
    }

    /// Build a [`GifError::InvalidResult`] value.
    pub fn invalid_result(msg: impl Into<String>) -> Self {
        Self::InvalidResult(msg.into())
    }

    /// Build a [`GifError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
