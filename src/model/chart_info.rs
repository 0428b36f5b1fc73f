//! One difficulty entry in a [`super::ChartList`]: display metadata plus the
//! chart it points at.

use crate::error::{RoxError, RoxResult};
use crate::primitives::{ByteReader, ByteWriter};
use crate::provider::{ChartProvider, DecodeContext};

use super::Chart;

/// A single difficulty's metadata and chart.
///
/// `ChartInfo` weakly co-owns its chart: setting one via [`ChartInfo::set_chart`]
/// caches it and drops any existing wire provider, which is lazily rebuilt
/// the next time the entry is encoded. A decoded `ChartInfo` starts out the
/// other way around — a provider and no cached chart — and only caches once
/// something actually asks for the parsed chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInfo {
    pub difficulty_name: String,
    pub difficulty_text: String,
    pub difficulty_color: [u8; 3],
    pub difficulty: u32,
    provider: Option<ChartProvider>,
    cached_chart: Option<Chart>,
}

/// Byte length of an absent-chart [`ChartProvider`] placeholder: the
/// 1-byte embedded-file tag plus the 16-byte offset/length pair, written out
/// in full the moment the chart is actually materialized on encode.
const ABSENT_PROVIDER_LEN: usize = 17;

impl ChartInfo {
    #[must_use]
    pub fn new(difficulty_name: impl Into<String>, difficulty: u32, chart: Chart) -> Self {
        Self {
            difficulty_name: difficulty_name.into(),
            difficulty_text: String::new(),
            difficulty_color: [0, 0, 0],
            difficulty,
            provider: None,
            cached_chart: Some(chart),
        }
    }

    /// Replace the cached chart, discarding any existing wire provider.
    pub fn set_chart(&mut self, chart: Chart) {
        self.cached_chart = Some(chart);
        self.provider = None;
    }

    /// The parsed chart, decoding through the wire provider if nothing is
    /// cached yet.
    ///
    /// # Errors
    ///
    /// Propagates a decode failure, or [`RoxError::InvalidCbt`] if neither a
    /// cached chart nor a provider is present (unreachable outside this
    /// module).
    pub fn chart(&self, ctx: &DecodeContext) -> RoxResult<Chart> {
        if let Some(chart) = &self.cached_chart {
            return Ok(chart.clone());
        }
        self.provider
            .as_ref()
            .ok_or_else(|| RoxError::InvalidCbt("chart info has no provider or cache".to_string()))?
            .chart(ctx)
    }

    /// Like [`ChartInfo::chart`], but caches the result for future calls.
    ///
    /// # Errors
    ///
    /// See [`ChartInfo::chart`].
    pub fn load_chart(&mut self, ctx: &DecodeContext) -> RoxResult<&Chart> {
        if self.cached_chart.is_none() {
            let chart = self.chart(ctx)?;
            self.cached_chart = Some(chart);
        }
        Ok(self.cached_chart.as_ref().expect("just populated"))
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        crate::primitives::cstr_len(&self.difficulty_name)
            + crate::primitives::cstr_len(&self.difficulty_text)
            + 3
            + 4
            + self
                .provider
                .as_ref()
                .map_or(ABSENT_PROVIDER_LEN, ChartProvider::encoded_length)
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        let header = crate::primitives::cstr_len(&self.difficulty_name)
            + crate::primitives::cstr_len(&self.difficulty_text)
            + 3
            + 4;
        let provider_total = self.provider.as_ref().map_or_else(
            || ABSENT_PROVIDER_LEN + self.cached_chart.as_ref().map_or(0, Chart::encoded_length),
            ChartProvider::total_encoded_length,
        );
        header + provider_total
    }

    /// Encode this entry, lazily materializing a [`ChartProvider`] from the
    /// cached chart if one wasn't already decoded from the wire.
    ///
    /// # Errors
    ///
    /// Propagates a chart-encode, gzip, or string-validation failure.
    pub fn encode(
        &mut self,
        w: &mut ByteWriter,
        embeds: &mut Vec<crate::provider::EmbedRequest>,
        compressed: bool,
        ctx: &DecodeContext,
    ) -> RoxResult<()> {
        if self.provider.is_none() {
            tracing::debug!(
                difficulty = %self.difficulty_name,
                compressed,
                "materializing chart provider from cached chart"
            );
            let chart = self
                .cached_chart
                .clone()
                .ok_or_else(|| RoxError::InvalidCbt("chart info has no chart to encode".to_string()))?;
            self.provider = Some(ChartProvider::from_chart(&chart, compressed, ctx)?);
        }
        w.write_cstr(&self.difficulty_name)?;
        w.write_cstr(&self.difficulty_text)?;
        for c in self.difficulty_color {
            w.write_u8(c);
        }
        w.write_u32(self.difficulty);
        self.provider
            .as_ref()
            .expect("materialized above")
            .encode(w, embeds);
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates an underlying read failure.
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let difficulty_name = r.read_cstr()?;
        let difficulty_text = r.read_cstr()?;
        let difficulty_color = [r.read_u8()?, r.read_u8()?, r.read_u8()?];
        let difficulty = r.read_u32()?;
        let provider = ChartProvider::decode(r)?;
        Ok(Self {
            difficulty_name,
            difficulty_text,
            difficulty_color,
            difficulty,
            provider: Some(provider),
            cached_chart: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_encode_materializes_provider() {
        let ctx = DecodeContext::with_defaults();
        let mut info = ChartInfo::new("Hard", 7, Chart::new());

        let header_len =
            crate::primitives::cstr_len(&info.difficulty_name) + crate::primitives::cstr_len(&info.difficulty_text) + 3 + 4;
        // No provider materialized yet: encoded_length uses the 17-byte
        // absent-provider placeholder, and total_encoded_length already
        // accounts for the cached chart's own encoded bytes.
        assert_eq!(info.encoded_length(), header_len + ABSENT_PROVIDER_LEN);
        assert_eq!(
            info.total_encoded_length(),
            header_len + ABSENT_PROVIDER_LEN + Chart::new().encoded_length()
        );

        let mut w = ByteWriter::default();
        let mut embeds = Vec::new();
        info.encode(&mut w, &mut embeds, false, &ctx).unwrap();
        crate::provider::drain_embeds(&mut w, embeds);
        let bytes = w.into_bytes();

        // After encode, the provider is materialized from the cached chart;
        // encoded_length (header-only) is unchanged since a FileEmbedded
        // header is also 17 bytes, but the written output now carries the
        // chart bytes as well.
        assert_eq!(info.encoded_length(), header_len + ABSENT_PROVIDER_LEN);
        assert_eq!(bytes.len(), header_len + 17 + Chart::new().encoded_length());

        let mut r = ByteReader::new(&bytes);
        let decoded = ChartInfo::decode(&mut r).unwrap();
        assert_eq!(decoded.difficulty_name, "Hard");
        assert_eq!(decoded.difficulty, 7);
        assert_eq!(decoded.chart(&ctx).unwrap(), Chart::new());
    }

    #[test]
    fn set_chart_clears_provider_and_invalidates_cache() {
        let mut info = ChartInfo::new("Normal", 3, Chart::new());
        let mut other = Chart::new();
        other.charter = "someone else".to_string();
        info.set_chart(other.clone());
        let ctx = DecodeContext::with_defaults();
        assert_eq!(info.chart(&ctx).unwrap(), other);
    }
}
