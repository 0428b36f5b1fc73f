//! Source descriptors for the media a chart set references, and the
//! deferred-embedding mechanism that lets them be written in one streaming
//! pass while their payloads are appended afterward.

mod chart_provider;
mod context;
mod cover_provider;
mod embed;
mod external;
mod file;
mod music_provider;
mod preview_provider;

pub use chart_provider::ChartProvider;
pub use context::DecodeContext;
pub use cover_provider::CoverProvider;
pub use embed::{drain_embeds, EmbedRequest};
pub use external::{
    AudioBuffer, FsReader, GzipCodec, HttpFetcher, PngDecoder, RasterImage, VorbisDecoder,
};
pub use file::{FileEmbedded, FileFromPath, FileFromUrl, FileProvider};
pub use music_provider::MusicProvider;
pub use preview_provider::{PreviewFromMusic, PreviewProvider};
