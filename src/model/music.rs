//! The outermost container: one song, its providers, and every chart built
//! against it.

use crate::error::RoxResult;
use crate::primitives::{ByteReader, ByteWriter};
use crate::provider::{drain_embeds, CoverProvider, DecodeContext, MusicProvider, PreviewProvider};

use super::{Categories, ChartList};

/// Magic bytes identifying a `Music` file: `"CWPM"`.
pub const MUSIC_MAGIC: [u8; 4] = *b"CWPM";

/// Current `Music` wire-format version.
pub const MUSIC_VERSION: u8 = 1;

/// A song, its cover/preview/audio providers, and the chart sets built
/// against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Music {
    pub name: String,
    pub artist: String,
    pub categories: Categories,
    pub keywords: Vec<String>,
    pub music_provider: MusicProvider,
    pub preview_provider: PreviewProvider,
    pub cover_provider: CoverProvider,
    pub chart_list: ChartList,
}

impl Music {
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        4 + 1
            + crate::primitives::cstr_len(&self.name)
            + crate::primitives::cstr_len(&self.artist)
            + 1
            + 1
            + self
                .keywords
                .iter()
                .map(|k| crate::primitives::cstr_len(k))
                .sum::<usize>()
            + self.music_provider.encoded_length()
            + self.preview_provider.encoded_length()
            + self.cover_provider.encoded_length()
            + self.chart_list.encoded_length()
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        4 + 1
            + crate::primitives::cstr_len(&self.name)
            + crate::primitives::cstr_len(&self.artist)
            + 1
            + 1
            + self
                .keywords
                .iter()
                .map(|k| crate::primitives::cstr_len(k))
                .sum::<usize>()
            + self.music_provider.total_encoded_length()
            + self.preview_provider.total_encoded_length()
            + self.cover_provider.total_encoded_length()
            + self.chart_list.total_encoded_length()
    }

    /// Encode the whole file: header and placeholders in one pass, then
    /// every embedded blob appended and back-patched in generation order.
    ///
    /// `compressed` controls whether any chart lazily materialized from a
    /// cached (not-yet-encoded) [`crate::model::ChartInfo`] is gzipped; it
    /// has no effect on charts that already carry a decoded provider.
    ///
    /// # Errors
    ///
    /// Propagates an encode failure from any provider or chart entry.
    pub fn encode(&mut self, compressed: bool, ctx: &DecodeContext) -> RoxResult<Vec<u8>> {
        tracing::debug!(
            name = %self.name,
            charts = self.chart_list.len(),
            compressed,
            "encoding Music file"
        );
        let mut w = ByteWriter::with_capacity(self.total_encoded_length());
        let mut embeds = Vec::new();

        w.write_bytes(&MUSIC_MAGIC);
        w.write_u8(MUSIC_VERSION);
        w.write_cstr(&self.name)?;
        w.write_cstr(&self.artist)?;
        w.write_u8(self.categories.to_byte());
        self.music_provider.encode(&mut w, &mut embeds)?;
        self.preview_provider.encode(&mut w, &mut embeds)?;
        self.cover_provider.encode(&mut w, &mut embeds)?;
        #[allow(clippy::cast_possible_truncation)]
        w.write_u8(self.keywords.len() as u8);
        for keyword in &self.keywords {
            w.write_cstr(keyword)?;
        }
        self.chart_list.encode(&mut w, &mut embeds, compressed, ctx)?;

        drain_embeds(&mut w, embeds);
        Ok(w.into_bytes())
    }

    /// # Errors
    ///
    /// Returns [`crate::error::RoxError::BadMagic`] or
    /// [`crate::error::RoxError::UnsupportedVersion`] if the header doesn't
    /// match, or propagates any underlying decode error.
    pub fn decode(data: &[u8]) -> RoxResult<Self> {
        tracing::debug!(bytes = data.len(), "decoding Music file");
        let mut r = ByteReader::new(data);
        let mut magic = [0u8; 4];
        for b in &mut magic {
            *b = r.read_u8()?;
        }
        if magic != MUSIC_MAGIC {
            tracing::debug!(?magic, "Music decode failed: bad magic");
            return Err(crate::error::RoxError::BadMagic {
                expected: MUSIC_MAGIC,
                found: magic,
            });
        }
        let version = r.read_u8()?;
        if version != MUSIC_VERSION {
            tracing::debug!(version, "Music decode failed: unsupported version");
            return Err(crate::error::RoxError::UnsupportedVersion {
                found: version,
                expected: MUSIC_VERSION,
            });
        }
        let name = r.read_cstr()?;
        let artist = r.read_cstr()?;
        let categories = Categories::from_byte(r.read_u8()?);
        let music_provider = MusicProvider::decode(&mut r)?;
        let preview_provider = PreviewProvider::decode(&mut r)?;
        let cover_provider = CoverProvider::decode(&mut r)?;
        let keyword_count = r.read_u8()? as usize;
        let mut keywords = Vec::with_capacity(keyword_count);
        for _ in 0..keyword_count {
            keywords.push(r.read_cstr()?);
        }
        let chart_list = ChartList::decode(&mut r)?;
        Ok(Self {
            name,
            artist,
            categories,
            keywords,
            music_provider,
            preview_provider,
            cover_provider,
            chart_list,
        })
    }
}

#[cfg(feature = "hash")]
impl Music {
    /// `BLAKE3` hash of the music file's encoded bytes, as a hex string.
    ///
    /// # Errors
    ///
    /// Propagates an encode failure from [`Music::encode`].
    pub fn hash(&mut self, compressed: bool, ctx: &DecodeContext) -> RoxResult<String> {
        let encoded = self.encode(compressed, ctx)?;
        Ok(blake3::hash(&encoded).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chart, ChartInfo};
    use crate::provider::{FileEmbedded, FileProvider};

    fn sample_music() -> Music {
        Music {
            name: "Song Name".to_string(),
            artist: "Artist Name".to_string(),
            categories: Categories::VOCAL,
            keywords: vec!["rhythm".to_string(), "exercise".to_string()],
            music_provider: MusicProvider::new(FileProvider::Embedded(FileEmbedded::from_raw(
                b"ogg bytes".to_vec(),
            ))),
            preview_provider: PreviewProvider::FromMusic(crate::provider::PreviewFromMusic {
                offset: 0,
                length: 1000,
                fade_in: 100,
                fade_out: 100,
            }),
            cover_provider: CoverProvider::Empty,
            chart_list: {
                let mut list = ChartList::new();
                list.insert(ChartInfo::new("Normal", 3, Chart::new()));
                list
            },
        }
    }

    #[test]
    fn roundtrip() {
        let ctx = DecodeContext::with_defaults();
        let mut music = sample_music();
        let bytes = music.encode(false, &ctx).unwrap();
        assert_eq!(bytes.len(), music.total_encoded_length());
        let decoded = Music::decode(&bytes).unwrap();
        assert_eq!(decoded.name, "Song Name");
        assert_eq!(decoded.categories, Categories::VOCAL);
        assert_eq!(decoded.keywords, vec!["rhythm", "exercise"]);
        assert_eq!(decoded.chart_list.len(), 1);
        assert_eq!(
            decoded
                .chart_list
                .get("Normal")
                .unwrap()
                .chart(&ctx)
                .unwrap(),
            Chart::new()
        );
    }

    #[cfg(feature = "hash")]
    #[test]
    fn hash_is_deterministic_and_sensitive_to_content() {
        let ctx = DecodeContext::with_defaults();
        let mut a = sample_music();
        let mut b = sample_music();
        assert_eq!(a.hash(false, &ctx).unwrap(), b.hash(false, &ctx).unwrap());

        let mut changed = sample_music();
        changed.name = "Different Name".to_string();
        assert_ne!(a.hash(false, &ctx).unwrap(), changed.hash(false, &ctx).unwrap());
    }

    #[test]
    fn bad_magic_is_rejected() {
        assert!(Music::decode(&[0u8; 16]).is_err());
    }
}
