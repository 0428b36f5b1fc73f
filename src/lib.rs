//! # chartwire
//!
//! A binary codec for rhythm-game charts: an exact-rational tempo/scroll
//! timing model, grouped taps/holds/drags, and the provider layer that lets
//! a `Music` file embed, link to, or lazily derive its audio/cover/preview
//! assets. Also converts bidirectionally to CBT, a legacy tuple-array
//! interchange format.

#![warn(clippy::pedantic)]

pub mod cbt;
pub mod error;
pub mod model;
pub mod prelude;
pub mod primitives;
pub mod provider;

pub use cbt::{CbtFile, CbtInfo, CbtNote};
pub use error::{RoxError, RoxResult};
pub use model::{
    BpsChange, BpsList, Categories, Chart, ChartInfo, ChartList, GroupId, Music, Note, NoteId,
    NoteList, NoteVariant, SpeedChange, SpeedList,
};
pub use primitives::Beat;
pub use provider::DecodeContext;
