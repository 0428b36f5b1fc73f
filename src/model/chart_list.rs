//! An ordered, difficulty-name-keyed collection of [`ChartInfo`] entries.

use crate::error::RoxResult;
use crate::primitives::{ByteReader, ByteWriter};
use crate::provider::{DecodeContext, EmbedRequest};

use super::ChartInfo;

/// Difficulties belonging to one chart set, in insertion order.
///
/// Insertion order is preserved on the wire (a plain `uint8` count followed
/// by that many headers); inserting under a difficulty name that's already
/// present overwrites the existing entry in place rather than appending a
/// duplicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartList {
    entries: Vec<ChartInfo>,
}

impl ChartList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `info`, overwriting any existing entry with the same
    /// `difficulty_name` in place (preserving its original position).
    pub fn insert(&mut self, info: ChartInfo) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.difficulty_name == info.difficulty_name)
        {
            *existing = info;
        } else {
            self.entries.push(info);
        }
    }

    #[must_use]
    pub fn get(&self, difficulty_name: &str) -> Option<&ChartInfo> {
        self.entries
            .iter()
            .find(|e| e.difficulty_name == difficulty_name)
    }

    pub fn get_mut(&mut self, difficulty_name: &str) -> Option<&mut ChartInfo> {
        self.entries
            .iter_mut()
            .find(|e| e.difficulty_name == difficulty_name)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, ChartInfo> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        1 + self.entries.iter().map(ChartInfo::encoded_length).sum::<usize>()
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        1 + self
            .entries
            .iter()
            .map(ChartInfo::total_encoded_length)
            .sum::<usize>()
    }

    /// # Errors
    ///
    /// Propagates an entry's encode failure.
    pub fn encode(
        &mut self,
        w: &mut ByteWriter,
        embeds: &mut Vec<EmbedRequest>,
        compressed: bool,
        ctx: &DecodeContext,
    ) -> RoxResult<()> {
        #[allow(clippy::cast_possible_truncation)]
        w.write_u8(self.entries.len() as u8);
        for entry in &mut self.entries {
            entry.encode(w, embeds, compressed, ctx)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates an entry's decode failure.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let count = r.read_u8()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(ChartInfo::decode(r)?);
        }
        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a ChartList {
    type Item = &'a ChartInfo;
    type IntoIter = std::slice::Iter<'a, ChartInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
