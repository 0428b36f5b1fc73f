//! The short preview clip played while browsing a chart set.

use crate::error::RoxResult;
use crate::primitives::{ByteReader, ByteWriter};

use super::context::DecodeContext;
use super::embed::EmbedRequest;
use super::external::AudioBuffer;
use super::file::FileProvider;

/// A window into the music track's audio, with linear fade in/out applied
/// at render time rather than stored pre-rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewFromMusic {
    pub offset: u64,
    pub length: u64,
    pub fade_in: u32,
    pub fade_out: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewProvider {
    FromFile(FileProvider),
    FromMusic(PreviewFromMusic),
}

impl PreviewProvider {
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        match self {
            Self::FromFile(f) => f.encoded_length(),
            Self::FromMusic(_) => 25,
        }
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        match self {
            Self::FromFile(f) => f.total_encoded_length(),
            Self::FromMusic(_) => 25,
        }
    }

    pub fn encode(&self, w: &mut ByteWriter, embeds: &mut Vec<EmbedRequest>) -> RoxResult<()> {
        match self {
            Self::FromFile(f) => f.encode(w, embeds),
            Self::FromMusic(m) => {
                w.write_i8(0);
                w.write_u64(m.offset);
                w.write_u64(m.length);
                w.write_u32(m.fade_in);
                w.write_u32(m.fade_out);
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Propagates an underlying read or tag-validation failure.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        if r.peek_u8()? == 0 {
            let _tag = r.read_i8()?;
            let offset = r.read_u64()?;
            let length = r.read_u64()?;
            let fade_in = r.read_u32()?;
            let fade_out = r.read_u32()?;
            Ok(Self::FromMusic(PreviewFromMusic {
                offset,
                length,
                fade_in,
                fade_out,
            }))
        } else {
            Ok(Self::FromFile(FileProvider::decode(r)?))
        }
    }

    /// Render the preview clip, fading in/out when it derives from the
    /// music track; decoding its own bytes when it's a standalone file.
    ///
    /// # Errors
    ///
    /// Propagates a decode failure, or [`crate::error::RoxError::UnsupportedEnvironment`]
    /// if a required decoder isn't configured.
    pub fn audio_buffer(
        &self,
        ctx: &DecodeContext,
        music_source: &AudioBuffer,
    ) -> RoxResult<AudioBuffer> {
        match self {
            Self::FromFile(f) => {
                let bytes = f.array_buffer(ctx)?;
                ctx.vorbis()?.decode(&bytes)
            }
            Self::FromMusic(m) => Ok(apply_fade(music_source, *m)),
        }
    }
}

fn fade_factor(j: u64, length: u64, fade_in: u32, fade_out: u32) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let in_factor = if fade_in == 0 {
        1.0
    } else {
        ((j + 1) as f64 / f64::from(fade_in)).min(1.0)
    };
    #[allow(clippy::cast_precision_loss)]
    let out_factor = if fade_out == 0 {
        1.0
    } else {
        ((length - j) as f64 / f64::from(fade_out)).min(1.0)
    };
    in_factor.min(out_factor)
}

fn apply_fade(source: &AudioBuffer, window: PreviewFromMusic) -> AudioBuffer {
    let start = usize::try_from(window.offset).unwrap_or(usize::MAX);
    let length = usize::try_from(window.length).unwrap_or(0);
    let channels = source
        .channels
        .iter()
        .map(|samples| {
            (0..length)
                .map(|j| {
                    let src = samples.get(start + j).copied().unwrap_or(0.0);
                    #[allow(clippy::cast_possible_truncation)]
                    let factor =
                        fade_factor(j as u64, window.length, window.fade_in, window.fade_out)
                            as f32;
                    src * factor
                })
                .collect()
        })
        .collect();
    AudioBuffer {
        sample_rate: source.sample_rate,
        channels,
    }
}
