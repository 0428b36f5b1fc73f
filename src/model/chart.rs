//! Aggregates tempo, scroll speed, and notes for one piece of music.

use crate::error::RoxResult;
use crate::primitives::{Beat, ByteReader, ByteWriter};

use super::{BpsList, NoteList, SpeedList};

/// Magic bytes identifying a chart blob: `"CWPC\0"`'s first four bytes,
/// little-endian as `0x43505743`.
pub const CHART_MAGIC: [u8; 4] = *b"CWPC";

/// Current chart wire-format version.
pub const CHART_VERSION: u8 = 1;

/// One chart: timing, scroll, notes, and the handful of fields that
/// describe the chart itself rather than any shared Music metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub charter: String,
    pub comments: String,
    /// Audio time, in seconds, of beat 0.
    pub offset: f64,
    pub bps_list: BpsList,
    pub speed_list: SpeedList,
    pub note_list: NoteList,
}

impl Chart {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charter: String::new(),
            comments: String::new(),
            offset: 0.0,
            bps_list: BpsList::default(),
            speed_list: SpeedList::default(),
            note_list: NoteList::default(),
        }
    }

    /// Audio time, in seconds, at `beat`.
    #[must_use]
    pub fn y_at_beat(&self, beat: Beat) -> f64 {
        self.y_at(self.bps_list.time_at(beat))
    }

    /// Visual scroll position at audio time `time`.
    #[must_use]
    pub fn y_at(&self, time: f64) -> f64 {
        self.speed_list.y_at(time, &self.bps_list)
    }

    /// Byte length of [`Chart::encode`]'s output.
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        4 + 1
            + crate::primitives::cstr_len(&self.charter)
            + crate::primitives::cstr_len(&self.comments)
            + 8
            + self.bps_list.encoded_length()
            + self.speed_list.encoded_length()
            + self.note_list.encoded_length()
    }

    /// # Errors
    ///
    /// Propagates [`crate::error::RoxError::StringContainsNul`] if
    /// `charter`/`comments` contain an embedded NUL.
    pub fn encode(&self, w: &mut ByteWriter) -> RoxResult<()> {
        w.write_bytes(&CHART_MAGIC);
        w.write_u8(CHART_VERSION);
        w.write_cstr(&self.charter)?;
        w.write_cstr(&self.comments)?;
        w.write_f64(self.offset);
        self.bps_list.encode(w);
        self.speed_list.encode(w);
        self.note_list.encode(w);
        Ok(())
    }

    /// Encode to a freestanding byte vector.
    ///
    /// # Errors
    ///
    /// See [`Chart::encode`].
    pub fn encode_to_vec(&self) -> RoxResult<Vec<u8>> {
        let mut w = ByteWriter::with_capacity(self.encoded_length());
        self.encode(&mut w)?;
        Ok(w.into_bytes())
    }

    /// # Errors
    ///
    /// Returns [`crate::error::RoxError::BadMagic`] or
    /// [`crate::error::RoxError::UnsupportedVersion`] if the header doesn't
    /// match, or propagates any underlying decode error.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let mut magic = [0u8; 4];
        for b in &mut magic {
            *b = r.read_u8()?;
        }
        if magic != CHART_MAGIC {
            return Err(crate::error::RoxError::BadMagic {
                expected: CHART_MAGIC,
                found: magic,
            });
        }
        let version = r.read_u8()?;
        if version != CHART_VERSION {
            return Err(crate::error::RoxError::UnsupportedVersion {
                found: version,
                expected: CHART_VERSION,
            });
        }
        let charter = r.read_cstr()?;
        let comments = r.read_cstr()?;
        let offset = r.read_f64()?;
        let bps_list = BpsList::decode(r)?;
        let speed_list = SpeedList::decode(r)?;
        let note_list = NoteList::decode(r)?;
        Ok(Self {
            charter,
            comments,
            offset,
            bps_list,
            speed_list,
            note_list,
        })
    }

    /// Decode a standalone chart blob (as produced by [`Chart::encode_to_vec`]).
    ///
    /// # Errors
    ///
    /// See [`Chart::decode`].
    pub fn decode_from_slice(data: &[u8]) -> RoxResult<Self> {
        let mut r = ByteReader::new(data);
        Self::decode(&mut r)
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "hash")]
impl Chart {
    /// `BLAKE3` hash of the chart's encoded bytes, as a hex string.
    ///
    /// # Errors
    ///
    /// See [`Chart::encode_to_vec`].
    pub fn hash(&self) -> RoxResult<String> {
        let encoded = self.encode_to_vec()?;
        Ok(blake3::hash(&encoded).to_hex().to_string())
    }

    /// First 16 hex characters of [`Chart::hash`].
    ///
    /// # Errors
    ///
    /// See [`Chart::hash`].
    pub fn short_hash(&self) -> RoxResult<String> {
        Ok(self.hash()?[..16].to_string())
    }
}
