use std::fmt;

/// The own result type of every stream and relay operation.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Terminal and validation conditions of the session core.
///
/// The error is `Clone` because a frame channel stores its terminal condition
/// and replays it to every pending and future read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamError {
    /// Graceful close, nothing more will ever arrive on this half. Not a
    /// failure, `relay::copy` translates it to success.
    EndOfStream,
    /// Write on a closed sending half.
    OutputClosed,
    /// The frame is not allowed in the current state of the sending half.
    /// It was not admitted.
    InvalidFrame(&'static str),
    /// Any other terminal condition recorded on a channel.
    Transport(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::EndOfStream => write!(f, "end of stream"),
            StreamError::OutputClosed => write!(f, "output closed"),
            StreamError::InvalidFrame(reason) => write!(f, "invalid frame: {}", reason),
            StreamError::Transport(reason) => write!(f, "transport error: {}", reason),
        }
    }
}

impl std::error::Error for StreamError {}

impl From<tokio::task::JoinError> for StreamError {
    fn from(err: tokio::task::JoinError) -> StreamError {
        StreamError::Transport(format!("copy task failed: {}", err))
    }
}
