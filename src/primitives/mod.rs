//! Exact rational beats and the little-endian byte cursor they're built on.

mod beat;
mod io;

pub use beat::Beat;
pub use io::{ByteReader, ByteWriter};

/// Encoded length of a NUL-terminated UTF-8 string: its byte length plus one.
#[must_use]
pub fn cstr_len(s: &str) -> usize {
    s.len() + 1
}
