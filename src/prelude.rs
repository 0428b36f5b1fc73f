//! Convenient re-exports.
//!
//! ```
//! use chartwire::prelude::*;
//! ```

pub use crate::cbt::{CbtFile, CbtInfo, CbtNote};
pub use crate::error::{RoxError, RoxResult};
pub use crate::model::{
    BpsChange, BpsList, Categories, Chart, ChartInfo, ChartList, GroupId, Music, Note, NoteId,
    NoteList, NoteVariant, SpeedChange, SpeedList,
};
pub use crate::primitives::Beat;
pub use crate::provider::{
    ChartProvider, CoverProvider, DecodeContext, FileEmbedded, FileFromPath, FileFromUrl,
    FileProvider, MusicProvider, PreviewProvider,
};
