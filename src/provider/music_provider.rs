//! The audio backing a chart set: always a plain [`FileProvider`].

use crate::error::RoxResult;
use crate::primitives::{ByteReader, ByteWriter};

use super::context::DecodeContext;
use super::embed::EmbedRequest;
use super::external::AudioBuffer;
use super::file::FileProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct MusicProvider {
    pub file: FileProvider,
}

impl MusicProvider {
    #[must_use]
    pub fn new(file: FileProvider) -> Self {
        Self { file }
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        self.file.encoded_length()
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        self.file.total_encoded_length()
    }

    pub fn encode(&self, w: &mut ByteWriter, embeds: &mut Vec<EmbedRequest>) -> RoxResult<()> {
        self.file.encode(w, embeds)
    }

    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        Ok(Self {
            file: FileProvider::decode(r)?,
        })
    }

    /// Fetch and decode the backing audio.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RoxError::UnsupportedEnvironment`] if no
    /// Vorbis decoder is configured, or propagates a fetch/decode failure.
    pub fn audio_buffer(&self, ctx: &DecodeContext) -> RoxResult<AudioBuffer> {
        let bytes = self.file.array_buffer(ctx)?;
        ctx.vorbis()?.decode(&bytes)
    }
}
