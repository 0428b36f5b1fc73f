//! Cover art: either absent (a transparent-pixel fallback) or a file.

use crate::error::RoxResult;
use crate::primitives::{ByteReader, ByteWriter};

use super::context::DecodeContext;
use super::embed::EmbedRequest;
use super::external::RasterImage;
use super::file::FileProvider;

#[derive(Debug, Clone, PartialEq)]
pub enum CoverProvider {
    Empty,
    FromFile(FileProvider),
}

impl CoverProvider {
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        match self {
            Self::Empty => 1,
            Self::FromFile(f) => f.encoded_length(),
        }
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        match self {
            Self::Empty => 1,
            Self::FromFile(f) => f.total_encoded_length(),
        }
    }

    pub fn encode(&self, w: &mut ByteWriter, embeds: &mut Vec<EmbedRequest>) -> RoxResult<()> {
        match self {
            Self::Empty => {
                w.write_i8(0);
                Ok(())
            }
            Self::FromFile(f) => f.encode(w, embeds),
        }
    }

    /// # Errors
    ///
    /// Propagates an underlying read or tag-validation failure.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        if r.peek_u8()? == 0 {
            let _tag = r.read_i8()?;
            Ok(Self::Empty)
        } else {
            Ok(Self::FromFile(FileProvider::decode(r)?))
        }
    }

    /// # Errors
    ///
    /// Returns [`crate::error::RoxError::UnsupportedEnvironment`] if no PNG
    /// decoder is configured, or propagates a fetch/decode failure.
    pub fn image_data(&self, ctx: &DecodeContext) -> RoxResult<RasterImage> {
        match self {
            Self::Empty => Ok(RasterImage::transparent_pixel()),
            Self::FromFile(f) => {
                let bytes = f.array_buffer(ctx)?;
                ctx.png()?.decode(&bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::file::FileEmbedded;

    #[test]
    fn empty_roundtrip() {
        let p = CoverProvider::Empty;
        let mut w = ByteWriter::default();
        let mut embeds = Vec::new();
        p.encode(&mut w, &mut embeds).unwrap();
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(CoverProvider::decode(&mut r).unwrap(), p);
    }

    #[test]
    fn empty_image_data_is_transparent_pixel() {
        let ctx = DecodeContext::new();
        let img = CoverProvider::Empty.image_data(&ctx).unwrap();
        assert_eq!(img.width, 1);
        assert_eq!(img.height, 1);
        assert_eq!(img.rgba8, vec![0, 0, 0, 0]);
    }

    #[test]
    fn from_file_roundtrip() {
        let p = CoverProvider::FromFile(FileProvider::Embedded(FileEmbedded::from_raw(vec![
            0x89, b'P', b'N', b'G',
        ])));
        let mut w = ByteWriter::default();
        let mut embeds = Vec::new();
        p.encode(&mut w, &mut embeds).unwrap();
        super::super::embed::drain_embeds(&mut w, embeds);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(CoverProvider::decode(&mut r).unwrap(), p);
    }
}
