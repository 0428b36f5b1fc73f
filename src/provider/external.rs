//! Interfaces to the outside world: decoders, network, filesystem.
//!
//! The original tool this crate's format is modeled on reaches for global
//! platform APIs (an audio decoder, `fetch`, a filesystem) wherever it needs
//! them. Here those capabilities are explicit traits threaded through a
//! [`super::context::DecodeContext`] instead of ambient globals, so a caller
//! embedding this crate in a server or a sandboxed tool can supply (or
//! withhold) exactly the capabilities it wants.

use crate::error::{RoxError, RoxResult};

/// Decoded PCM audio: one `f32` sample vector per channel, all the same
/// length, plus the sample rate they were decoded at.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// A decoded RGBA8 raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

impl RasterImage {
    /// A single fully-transparent pixel, used as the empty-cover fallback.
    #[must_use]
    pub fn transparent_pixel() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba8: vec![0, 0, 0, 0],
        }
    }
}

/// Decodes Vorbis-in-Ogg audio bytes into PCM.
pub trait VorbisDecoder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RoxError::DecoderError`] if `bytes` cannot be decoded.
    fn decode(&self, bytes: &[u8]) -> RoxResult<AudioBuffer>;
}

/// Decodes PNG bytes into an RGBA8 raster.
pub trait PngDecoder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RoxError::DecoderError`] if `bytes` cannot be decoded.
    fn decode(&self, bytes: &[u8]) -> RoxResult<RasterImage>;
}

/// Compresses and decompresses the gzip streams embedded providers may use.
pub trait GzipCodec: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RoxError::Io`] on an underlying stream failure.
    fn compress(&self, bytes: &[u8]) -> RoxResult<Vec<u8>>;

    /// # Errors
    ///
    /// Returns [`RoxError::Io`] on an underlying stream failure.
    fn decompress(&self, bytes: &[u8]) -> RoxResult<Vec<u8>>;
}

/// Fetches the bytes behind a `FileFromUrl` provider.
pub trait HttpFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RoxError::FetchFailed`] if the request fails or the
    /// response status is not successful.
    fn fetch(&self, url: &str) -> RoxResult<Vec<u8>>;
}

/// Reads the bytes behind a `FileFromPath` provider, relative to a base
/// directory recorded on the [`super::context::DecodeContext`].
pub trait FsReader: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RoxError::Io`] if the file cannot be read.
    fn read(&self, path: &std::path::Path) -> RoxResult<Vec<u8>>;
}

#[cfg(feature = "gzip")]
pub struct Flate2Gzip;

#[cfg(feature = "gzip")]
impl GzipCodec for Flate2Gzip {
    fn compress(&self, bytes: &[u8]) -> RoxResult<Vec<u8>> {
        use std::io::Write;
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, bytes: &[u8]) -> RoxResult<Vec<u8>> {
        use std::io::Read;
        let mut decoder = flate2::read::GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}

#[cfg(feature = "net")]
pub struct UreqFetcher;

#[cfg(feature = "net")]
impl HttpFetcher for UreqFetcher {
    fn fetch(&self, url: &str) -> RoxResult<Vec<u8>> {
        url::Url::parse(url).map_err(|e| RoxError::FetchFailed(e.to_string()))?;
        let response = ureq::get(url)
            .call()
            .map_err(|e| RoxError::FetchFailed(e.to_string()))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| RoxError::FetchFailed(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(feature = "mmap")]
pub struct MmapFsReader;

#[cfg(feature = "mmap")]
impl FsReader for MmapFsReader {
    fn read(&self, path: &std::path::Path) -> RoxResult<Vec<u8>> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the file is not expected to be mutated concurrently by
        // another process while we hold this mapping.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(mmap.to_vec())
    }
}

#[cfg(feature = "audio")]
pub struct SymphoniaVorbisDecoder;

#[cfg(feature = "audio")]
impl VorbisDecoder for SymphoniaVorbisDecoder {
    fn decode(&self, bytes: &[u8]) -> RoxResult<AudioBuffer> {
        use symphonia::core::audio::Signal;
        use symphonia::core::codecs::DecoderOptions;
        use symphonia::core::formats::FormatOptions;
        use symphonia::core::io::MediaSourceStream;
        use symphonia::core::meta::MetadataOptions;
        use symphonia::core::probe::Hint;

        let source = Box::new(std::io::Cursor::new(bytes.to_vec()));
        let stream = MediaSourceStream::new(source, Default::default());
        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| RoxError::DecoderError(e.to_string()))?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .first()
            .ok_or_else(|| RoxError::DecoderError("no audio track".to_string()))?;
        let track_id = track.id;
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| RoxError::DecoderError(e.to_string()))?;

        let mut channels: Vec<Vec<f32>> = Vec::new();
        let mut sample_rate = 0;
        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(_)) => break,
                Err(e) => return Err(RoxError::DecoderError(e.to_string())),
            };
            if packet.track_id() != track_id {
                continue;
            }
            let decoded = decoder
                .decode(&packet)
                .map_err(|e| RoxError::DecoderError(e.to_string()))?;
            let spec = *decoded.spec();
            sample_rate = spec.rate;
            if channels.is_empty() {
                channels = vec![Vec::new(); spec.channels.count()];
            }
            let mut sample_buf =
                symphonia::core::audio::SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            for (i, frame) in sample_buf.samples().chunks(spec.channels.count()).enumerate() {
                for (ch, &s) in frame.iter().enumerate() {
                    if channels.len() <= ch {
                        channels.resize(ch + 1, Vec::new());
                    }
                    if channels[ch].len() <= i {
                        channels[ch].push(s);
                    }
                }
            }
        }

        Ok(AudioBuffer {
            sample_rate,
            channels,
        })
    }
}

#[cfg(feature = "image")]
pub struct ImagePngDecoder;

#[cfg(feature = "image")]
impl PngDecoder for ImagePngDecoder {
    fn decode(&self, bytes: &[u8]) -> RoxResult<RasterImage> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| RoxError::DecoderError(e.to_string()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(RasterImage {
            width,
            height,
            rgba8: img.into_raw(),
        })
    }
}
