//! Tempo map: piecewise-constant beats-per-second over exact beat positions.

use crate::error::RoxResult;
use crate::primitives::{Beat, ByteReader, ByteWriter};

/// Default beats-per-second in effect before any [`BpsChange`].
pub const DEFAULT_INITIAL_BPS: f64 = 2.0;

/// A single tempo change: from `beat` onward, the tempo is `bps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpsChange {
    pub beat: Beat,
    pub bps: f64,
}

impl BpsChange {
    #[must_use]
    pub fn new(beat: Beat, bps: f64) -> Self {
        Self { beat, bps }
    }

    /// `bpm = 60 * bps`.
    #[must_use]
    pub fn bpm(&self) -> f64 {
        60.0 * self.bps
    }
}

/// The tempo map of a chart: an initial tempo plus an ordered list of
/// changes, strictly sorted by beat.
#[derive(Debug, Clone, PartialEq)]
pub struct BpsList {
    pub initial_bps: f64,
    changes: Vec<BpsChange>,
}

impl Default for BpsList {
    fn default() -> Self {
        Self {
            initial_bps: DEFAULT_INITIAL_BPS,
            changes: Vec::new(),
        }
    }
}

impl BpsList {
    #[must_use]
    pub fn new(initial_bps: f64) -> Self {
        Self {
            initial_bps,
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn changes(&self) -> &[BpsChange] {
        &self.changes
    }

    /// Insert a tempo change, keeping `changes` sorted by beat.
    pub fn add_bps_change(&mut self, beat: Beat, bps: f64) {
        let idx = self.changes.partition_point(|c| c.beat < beat);
        self.changes.insert(idx, BpsChange::new(beat, bps));
    }

    /// Tempo in effect at `beat`: `initial_bps` if `beat` precedes every
    /// change, else the bps of the last change with `change.beat <= beat`.
    #[must_use]
    pub fn bps_at(&self, beat: Beat) -> f64 {
        match self.changes.partition_point(|c| c.beat <= beat) {
            0 => self.initial_bps,
            n => self.changes[n - 1].bps,
        }
    }

    /// Audio time, in seconds, at `beat`.
    ///
    /// Accumulates over every change strictly before `beat`, then adds the
    /// remainder at the tempo in force at `beat`.
    #[must_use]
    pub fn time_at(&self, beat: Beat) -> f64 {
        let mut t = 0.0;
        let mut cur_beat = Beat::ZERO;
        let mut cur_bps = self.initial_bps;

        for change in &self.changes {
            if change.beat >= beat {
                break;
            }
            t += (change.beat - cur_beat).to_f64() / cur_bps;
            cur_beat = change.beat;
            cur_bps = change.bps;
        }
        t += (beat - cur_beat).to_f64() / cur_bps;
        t
    }

    /// Remove any change whose bps equals the tempo already in force
    /// immediately before it.
    pub fn deduplicate(&mut self) {
        let mut result: Vec<BpsChange> = Vec::with_capacity(self.changes.len());
        let mut prev_bps = self.initial_bps;
        for change in self.changes.drain(..) {
            if change.bps != prev_bps {
                prev_bps = change.bps;
                result.push(change);
            }
        }
        self.changes = result;
    }

    /// Byte length of [`BpsList::encode`]'s output.
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        4 + 8 + 16 * self.changes.len()
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        #[allow(clippy::cast_possible_truncation)]
        w.write_u32(self.changes.len() as u32);
        w.write_f64(self.initial_bps);
        let mut prev = Beat::ZERO;
        for change in &self.changes {
            prev = w.write_beat_delta(prev, change.beat);
            w.write_f64(change.bps);
        }
    }

    /// # Errors
    ///
    /// Propagates any I/O or malformed-beat error from the underlying
    /// [`ByteReader`].
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let count = r.read_u32()? as usize;
        let initial_bps = r.read_f64()?;
        let mut changes = Vec::with_capacity(count);
        let mut prev = Beat::ZERO;
        for _ in 0..count {
            prev = r.read_beat_delta(prev)?;
            let bps = r.read_f64()?;
            changes.push(BpsChange::new(prev, bps));
        }
        Ok(Self {
            initial_bps,
            changes,
        })
    }
}
