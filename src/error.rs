//! Error types for chartwire encoding/decoding.

use thiserror::Error;

/// Result type alias for chartwire operations.
pub type RoxResult<T> = Result<T, RoxError>;

/// Errors that can occur during chart/music encoding, decoding, or I/O.
#[derive(Debug, Error)]
pub enum RoxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    #[error("bad magic bytes: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("invalid file provider tag {0}")]
    InvalidTag(i8),

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("FileFromPath.base is not set")]
    BaseNotSet,

    #[error("relative-path reads are not supported in this environment")]
    UnsupportedEnvironment,

    #[error("decoder error: {0}")]
    DecoderError(String),

    #[error("string not NUL-terminated before end of buffer")]
    StringNotTerminated,

    #[error("unexpected end of buffer: needed {needed} bytes, had {available}")]
    UnexpectedEof { needed: usize, available: usize },

    #[error("string contains an embedded NUL byte")]
    StringContainsNul,

    #[error("duplicate difficulty name: {0}")]
    DuplicateDifficultyName(String),

    #[error("unknown provider tag {0}")]
    UnknownProviderTag(i8),

    #[error("invalid CBT data: {0}")]
    InvalidCbt(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
