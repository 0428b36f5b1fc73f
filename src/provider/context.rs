//! Capabilities a caller supplies for resolving providers into bytes.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{RoxError, RoxResult};

use super::external::{FsReader, GzipCodec, HttpFetcher, PngDecoder, VorbisDecoder};

/// The capabilities needed to resolve [`super::FileProvider`] variants and
/// decode the media behind them.
///
/// Every field is optional: a caller that only ever encodes charts, or only
/// ever decodes already-embedded ones, need not supply a fetcher or a
/// filesystem reader at all. Missing a capability a resolution actually
/// needs surfaces as [`RoxError::UnsupportedEnvironment`].
#[derive(Clone, Default)]
pub struct DecodeContext {
    /// Base directory `FileFromPath` providers resolve relative paths against.
    pub base: Option<PathBuf>,
    pub gzip: Option<Arc<dyn GzipCodec>>,
    pub http: Option<Arc<dyn HttpFetcher>>,
    pub fs: Option<Arc<dyn FsReader>>,
    pub vorbis: Option<Arc<dyn VorbisDecoder>>,
    pub png: Option<Arc<dyn PngDecoder>>,
}

impl DecodeContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context wired up to the default, feature-gated implementations
    /// (flate2, ureq, memmap2, symphonia, image), with no base directory set.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            base: None,
            #[cfg(feature = "gzip")]
            gzip: Some(Arc::new(super::external::Flate2Gzip)),
            #[cfg(not(feature = "gzip"))]
            gzip: None,
            #[cfg(feature = "net")]
            http: Some(Arc::new(super::external::UreqFetcher)),
            #[cfg(not(feature = "net"))]
            http: None,
            #[cfg(feature = "mmap")]
            fs: Some(Arc::new(super::external::MmapFsReader)),
            #[cfg(not(feature = "mmap"))]
            fs: None,
            #[cfg(feature = "audio")]
            vorbis: Some(Arc::new(super::external::SymphoniaVorbisDecoder)),
            #[cfg(not(feature = "audio"))]
            vorbis: None,
            #[cfg(feature = "image")]
            png: Some(Arc::new(super::external::ImagePngDecoder)),
            #[cfg(not(feature = "image"))]
            png: None,
        }
    }

    pub(crate) fn gzip(&self) -> RoxResult<&dyn GzipCodec> {
        self.gzip
            .as_deref()
            .ok_or(RoxError::UnsupportedEnvironment)
    }

    pub(crate) fn http(&self) -> RoxResult<&dyn HttpFetcher> {
        self.http
            .as_deref()
            .ok_or(RoxError::UnsupportedEnvironment)
    }

    pub(crate) fn fs(&self) -> RoxResult<&dyn FsReader> {
        self.fs.as_deref().ok_or(RoxError::UnsupportedEnvironment)
    }

    pub(crate) fn vorbis(&self) -> RoxResult<&dyn VorbisDecoder> {
        self.vorbis
            .as_deref()
            .ok_or(RoxError::UnsupportedEnvironment)
    }

    pub(crate) fn png(&self) -> RoxResult<&dyn PngDecoder> {
        self.png.as_deref().ok_or(RoxError::UnsupportedEnvironment)
    }
}
