//! A single chart's serialized bytes, always stored as an embedded blob.

use crate::error::RoxResult;
use crate::model::Chart;
use crate::primitives::{ByteReader, ByteWriter};

use super::context::DecodeContext;
use super::embed::EmbedRequest;
use super::file::FileEmbedded;

/// The wire provider behind one [`ChartInfo`](crate::model::ChartInfo)
/// entry. Unlike [`super::MusicProvider`]/[`super::CoverProvider`], a chart
/// is always `ChartFromFileEmbedded` — there's no URL or relative-path
/// variant for per-difficulty chart data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartProvider(pub FileEmbedded);

impl ChartProvider {
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        self.0.encoded_length()
    }

    #[must_use]
    pub fn total_encoded_length(&self) -> usize {
        self.0.total_encoded_length()
    }

    pub fn encode(&self, w: &mut ByteWriter, embeds: &mut Vec<EmbedRequest>) {
        self.0.encode(w, embeds);
    }

    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        Ok(Self(FileEmbedded::decode(r)?))
    }

    /// Resolve and parse the embedded chart.
    ///
    /// # Errors
    ///
    /// Propagates a decompression or chart-decode failure.
    pub fn chart(&self, ctx: &DecodeContext) -> RoxResult<Chart> {
        let bytes = self.0.array_buffer(ctx)?;
        Chart::decode_from_slice(&bytes)
    }

    /// Materialize a `ChartProvider` by encoding `chart`, gzip-compressing
    /// when `compressed` is set.
    ///
    /// # Errors
    ///
    /// Propagates a chart-encode or gzip failure.
    pub fn from_chart(chart: &Chart, compressed: bool, ctx: &DecodeContext) -> RoxResult<Self> {
        let bytes = chart.encode_to_vec()?;
        Ok(Self(FileEmbedded::set(&bytes, compressed, ctx)?))
    }
}
