//! `FileProvider`: the three ways a blob of bytes can be described on the
//! wire — embedded directly, fetched from a URL, or read from a relative
//! path — plus the gzip-or-not sign-of-tag trick shared by all three.

use std::path::{Path, PathBuf};

use crate::error::{RoxError, RoxResult};
use crate::primitives::{ByteReader, ByteWriter};

use super::context::DecodeContext;
use super::embed::EmbedRequest;

/// Bytes embedded directly in the file, optionally gzip-compressed.
///
/// The stored `bytes` are always the *wire* representation: if `compressed`
/// is set, they are already gzip bytes, not the original payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEmbedded {
    compressed: bool,
    bytes: Vec<u8>,
}

impl FileEmbedded {
    /// Wrap already-uncompressed bytes, stored verbatim.
    #[must_use]
    pub fn from_raw(bytes: Vec<u8>) -> Self {
        Self {
            compressed: false,
            bytes,
        }
    }

    /// Store `bytes`, gzip-compressing first when `compress` is set.
    ///
    /// # Errors
    ///
    /// Propagates a [`RoxError::Io`] from the underlying gzip stream.
    pub fn set(bytes: &[u8], compress: bool, ctx: &DecodeContext) -> RoxResult<Self> {
        if compress {
            let compressed = ctx.gzip()?.compress(bytes)?;
            Ok(Self {
                compressed: true,
                bytes: compressed,
            })
        } else {
            Ok(Self::from_raw(bytes.to_vec()))
        }
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The stored bytes exactly as they sit on the wire (gzip bytes if
    /// `is_compressed()`).
    #[must_use]
    pub fn original_array_buffer(&self) -> &[u8] {
        &self.bytes
    }

    /// The stored bytes, gzip-decompressed if necessary.
    ///
    /// # Errors
    ///
    /// Propagates a [`RoxError::Io`] from the underlying gzip stream.
    pub fn array_buffer(&self, ctx: &DecodeContext) -> RoxResult<Vec<u8>> {
        if self.compressed {
            ctx.gzip()?.decompress(&self.bytes)
        } else {
            Ok(self.bytes.clone())
        }
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        17
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        17 + self.bytes.len()
    }

    pub fn encode(&self, w: &mut ByteWriter, embeds: &mut Vec<EmbedRequest>) {
        w.write_i8(if self.compressed { -1 } else { 1 });
        let placeholder_offset = w.reserve(16);
        embeds.push(EmbedRequest {
            blob: self.bytes.clone(),
            placeholder_offset,
        });
    }

    /// # Errors
    ///
    /// Returns [`RoxError::InvalidTag`] if the tag's magnitude isn't 1, or
    /// propagates an underlying read failure.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let tag = r.read_i8()?;
        if tag.unsigned_abs() != 1 {
            return Err(RoxError::InvalidTag(tag));
        }
        let offset = r.read_u64()?;
        let length = r.read_u64()?;
        let bytes = r.slice_abs(offset, length)?.to_vec();
        Ok(Self {
            compressed: tag < 0,
            bytes,
        })
    }
}

/// A blob fetched over HTTP(S) at resolution time.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFromUrl {
    pub compressed: bool,
    pub url: String,
}

impl FileFromUrl {
    #[must_use]
    pub fn new(url: impl Into<String>, compressed: bool) -> Self {
        Self {
            url: url.into(),
            compressed,
        }
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        1 + crate::primitives::cstr_len(&self.url)
    }

    /// # Errors
    ///
    /// Propagates [`RoxError::StringContainsNul`] if the URL contains a NUL.
    pub fn encode(&self, w: &mut ByteWriter) -> RoxResult<()> {
        w.write_i8(if self.compressed { -2 } else { 2 });
        w.write_cstr(&self.url)
    }

    /// # Errors
    ///
    /// Returns [`RoxError::InvalidTag`] if the tag's magnitude isn't 2.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let tag = r.read_i8()?;
        if tag.unsigned_abs() != 2 {
            return Err(RoxError::InvalidTag(tag));
        }
        let url = r.read_cstr()?;
        Ok(Self {
            compressed: tag < 0,
            url,
        })
    }

    /// Fetch and, if `compressed`, decompress the bytes behind this URL.
    ///
    /// # Errors
    ///
    /// Returns [`RoxError::UnsupportedEnvironment`] if no fetcher is
    /// configured, [`RoxError::FetchFailed`] if the request fails, or
    /// propagates a decompression error.
    pub fn array_buffer(&self, ctx: &DecodeContext) -> RoxResult<Vec<u8>> {
        let bytes = ctx.http()?.fetch(&self.url).inspect_err(|e| {
            tracing::debug!(url = %self.url, error = %e, "fetch failed");
        })?;
        if self.compressed {
            ctx.gzip()?.decompress(&bytes)
        } else {
            Ok(bytes)
        }
    }
}

/// A blob read from a path relative to [`DecodeContext::base`].
#[derive(Debug, Clone, PartialEq)]
pub struct FileFromPath {
    pub compressed: bool,
    pub path: String,
}

impl FileFromPath {
    #[must_use]
    pub fn new(path: impl Into<String>, compressed: bool) -> Self {
        Self {
            path: path.into(),
            compressed,
        }
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        1 + crate::primitives::cstr_len(&self.path)
    }

    /// # Errors
    ///
    /// Propagates [`RoxError::StringContainsNul`] if the path contains a NUL.
    pub fn encode(&self, w: &mut ByteWriter) -> RoxResult<()> {
        w.write_i8(if self.compressed { -3 } else { 3 });
        w.write_cstr(&self.path)
    }

    /// # Errors
    ///
    /// Returns [`RoxError::InvalidTag`] if the tag's magnitude isn't 3.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let tag = r.read_i8()?;
        if tag.unsigned_abs() != 3 {
            return Err(RoxError::InvalidTag(tag));
        }
        let path = r.read_cstr()?;
        Ok(Self {
            compressed: tag < 0,
            path,
        })
    }

    fn resolved_path(&self, ctx: &DecodeContext) -> RoxResult<PathBuf> {
        let base = ctx.base.as_ref().ok_or(RoxError::BaseNotSet)?;
        Ok(base.join(Path::new(&self.path)))
    }

    /// Read and, if `compressed`, decompress the bytes behind this path.
    ///
    /// # Errors
    ///
    /// Returns [`RoxError::BaseNotSet`] if no base directory is configured,
    /// [`RoxError::UnsupportedEnvironment`] if no filesystem reader is
    /// configured, or propagates a read/decompression error.
    pub fn array_buffer(&self, ctx: &DecodeContext) -> RoxResult<Vec<u8>> {
        let path = self.resolved_path(ctx)?;
        let bytes = ctx.fs()?.read(&path)?;
        if self.compressed {
            ctx.gzip()?.decompress(&bytes)
        } else {
            Ok(bytes)
        }
    }
}

/// Any of the three ways a blob of bytes can be described on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FileProvider {
    Embedded(FileEmbedded),
    FromUrl(FileFromUrl),
    FromPath(FileFromPath),
}

impl FileProvider {
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        match self {
            Self::Embedded(e) => e.encoded_length(),
            Self::FromUrl(u) => u.encoded_length(),
            Self::FromPath(p) => p.encoded_length(),
        }
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        match self {
            Self::Embedded(e) => e.total_encoded_length(),
            other => other.encoded_length(),
        }
    }

    /// # Errors
    ///
    /// Propagates [`RoxError::StringContainsNul`] from a `FromUrl`/`FromPath`
    /// variant's string header.
    pub fn encode(&self, w: &mut ByteWriter, embeds: &mut Vec<EmbedRequest>) -> RoxResult<()> {
        match self {
            Self::Embedded(e) => {
                e.encode(w, embeds);
                Ok(())
            }
            Self::FromUrl(u) => u.encode(w),
            Self::FromPath(p) => p.encode(w),
        }
    }

    /// # Errors
    ///
    /// Returns [`RoxError::InvalidTag`] for an unrecognized tag byte, or
    /// propagates an underlying read failure.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let tag = r.peek_u8()? as i8;
        match tag.unsigned_abs() {
            1 => Ok(Self::Embedded(FileEmbedded::decode(r)?)),
            2 => Ok(Self::FromUrl(FileFromUrl::decode(r)?)),
            3 => Ok(Self::FromPath(FileFromPath::decode(r)?)),
            _ => Err(RoxError::InvalidTag(tag)),
        }
    }

    /// Resolve this provider to its underlying bytes, gzip-decompressing if
    /// the wire tag indicates compression.
    ///
    /// # Errors
    ///
    /// See [`FileEmbedded::array_buffer`], [`FileFromUrl::array_buffer`], and
    /// [`FileFromPath::array_buffer`].
    pub fn array_buffer(&self, ctx: &DecodeContext) -> RoxResult<Vec<u8>> {
        match self {
            Self::Embedded(e) => e.array_buffer(ctx),
            Self::FromUrl(u) => u.array_buffer(ctx),
            Self::FromPath(p) => p.array_buffer(ctx),
        }
    }
}
