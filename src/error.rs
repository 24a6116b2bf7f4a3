//! Error types for stream probing and decoding
//!
//! Everything inside the engine returns [`StreamResult`]; the probing
//! pipeline absorbs these errors and only reports an absent handle to
//! callers.

use thiserror::Error;

/// Errors raised while building or driving a stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The prober does not recognize the resource.
    #[error("Unrecognized format: {0}")]
    RejectedFormat(String),

    /// Header values outside the playable envelope.
    #[error("Invalid stream: {0}")]
    InvalidStream(String),

    /// Subsong count outside `0..=65535`.
    #[error("Too many subsongs: {0}")]
    TooManySubsongs(i32),

    /// Channel count outside `1..=64`.
    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(usize),

    /// A cursor or payload allocation failed.
    #[error("Out of memory allocating {0}")]
    ResourceExhausted(&'static str),

    /// A sibling file was found but cannot be merged into stereo.
    #[error("Dual stereo mismatch: {0}")]
    DualStereoMismatch(String),

    /// A header field lies past the end of the resource.
    #[error("Unexpected end of data at offset {offset:#x} in {name}")]
    UnexpectedEof { name: String, offset: u64 },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vorbis setup or packet decode failure.
    #[error("Vorbis error: {0}")]
    Vorbis(String),
}

impl From<lewton::VorbisError> for StreamError {
    fn from(err: lewton::VorbisError) -> Self {
        StreamError::Vorbis(format!("{:?}", err))
    }
}

/// Result type for engine operations
pub type StreamResult<T> = Result<T, StreamError>;
