//! Visual scroll speed map, evaluated over time via the tempo map.

use crate::error::RoxResult;
use crate::model::BpsList;
use crate::primitives::{Beat, ByteReader, ByteWriter};

/// Default scroll speed in effect before any [`SpeedChange`].
pub const DEFAULT_INITIAL_SPEED: f64 = 1.0;

/// A single scroll-speed change: from `beat` onward, scroll speed is `speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedChange {
    pub beat: Beat,
    pub speed: f64,
}

impl SpeedChange {
    #[must_use]
    pub fn new(beat: Beat, speed: f64) -> Self {
        Self { beat, speed }
    }
}

/// The scroll-speed map of a chart. Shape mirrors [`BpsList`], but speed is
/// a multiplier on `y`, not on time itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedList {
    pub initial_speed: f64,
    changes: Vec<SpeedChange>,
}

impl Default for SpeedList {
    fn default() -> Self {
        Self {
            initial_speed: DEFAULT_INITIAL_SPEED,
            changes: Vec::new(),
        }
    }
}

impl SpeedList {
    #[must_use]
    pub fn new(initial_speed: f64) -> Self {
        Self {
            initial_speed,
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn changes(&self) -> &[SpeedChange] {
        &self.changes
    }

    pub fn add_speed_change(&mut self, beat: Beat, speed: f64) {
        let idx = self.changes.partition_point(|c| c.beat < beat);
        self.changes.insert(idx, SpeedChange::new(beat, speed));
    }

    #[must_use]
    pub fn speed_at(&self, beat: Beat) -> f64 {
        match self.changes.partition_point(|c| c.beat <= beat) {
            0 => self.initial_speed,
            n => self.changes[n - 1].speed,
        }
    }

    /// The integral of `speed(t)` from `0` to `time`, piecewise constant.
    ///
    /// Iterates changes in order, converting each change's beat to a time
    /// via `bps_list`, accumulating `(segment_time) * segment_speed` until
    /// the segment containing `time` is reached.
    #[must_use]
    pub fn y_at(&self, time: f64, bps_list: &BpsList) -> f64 {
        let mut result = 0.0;
        let mut cur_time = 0.0;
        let mut cur_speed = self.initial_speed;

        for change in &self.changes {
            let new_time = bps_list.time_at(change.beat);
            if new_time >= time {
                break;
            }
            result += (new_time - cur_time) * cur_speed;
            cur_time = new_time;
            cur_speed = change.speed;
        }
        result += (time - cur_time) * cur_speed;
        result
    }

    pub fn deduplicate(&mut self) {
        let mut result: Vec<SpeedChange> = Vec::with_capacity(self.changes.len());
        let mut prev_speed = self.initial_speed;
        for change in self.changes.drain(..) {
            if change.speed != prev_speed {
                prev_speed = change.speed;
                result.push(change);
            }
        }
        self.changes = result;
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        4 + 8 + 16 * self.changes.len()
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        #[allow(clippy::cast_possible_truncation)]
        w.write_u32(self.changes.len() as u32);
        w.write_f64(self.initial_speed);
        let mut prev = Beat::ZERO;
        for change in &self.changes {
            prev = w.write_beat_delta(prev, change.beat);
            w.write_f64(change.speed);
        }
    }

    /// # Errors
    ///
    /// Propagates any I/O or malformed-beat error from the underlying
    /// [`ByteReader`].
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let count = r.read_u32()? as usize;
        let initial_speed = r.read_f64()?;
        let mut changes = Vec::with_capacity(count);
        let mut prev = Beat::ZERO;
        for _ in 0..count {
            prev = r.read_beat_delta(prev)?;
            let speed = r.read_f64()?;
            changes.push(SpeedChange::new(prev, speed));
        }
        Ok(Self {
            initial_speed,
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec.md §8 scenario 2 (`offset=0, initialBps=1, initialSpeed=1`).
    #[test]
    fn scenario_y_at_beat() {
        let bps = BpsList::new(1.0);
        let mut speed = SpeedList::new(1.0);
        speed.add_speed_change(Beat::from_integer(1), 2.0);
        speed.add_speed_change(Beat::from_integer(2), 0.5);

        let y_at_beat = |b: Beat| speed.y_at(bps.time_at(b), &bps);

        assert_eq!(y_at_beat(Beat::ZERO), 0.0);
        assert_eq!(y_at_beat(Beat::new(1, 2).unwrap()), 0.5);
        assert_eq!(y_at_beat(Beat::from_integer(1)), 1.0);
        assert_eq!(y_at_beat(Beat::new(3, 2).unwrap()), 2.0);
        assert_eq!(y_at_beat(Beat::from_integer(2)), 3.0);
        assert_eq!(y_at_beat(Beat::new(5, 2).unwrap()), 3.25);
        assert_eq!(y_at_beat(Beat::from_integer(3)), 3.5);
        assert_eq!(y_at_beat(Beat::from_integer(4)), 4.0);
    }

    #[test]
    fn y_at_is_monotonic_for_nonnegative_speeds() {
        let bps = BpsList::new(1.5);
        let mut speed = SpeedList::new(1.0);
        speed.add_speed_change(Beat::from_integer(2), 3.0);
        speed.add_speed_change(Beat::from_integer(4), 0.25);

        let mut prev_y = speed.y_at(0.0, &bps);
        for i in 1..=40 {
            let t = f64::from(i) * 0.25;
            let y = speed.y_at(t, &bps);
            assert!(y >= prev_y);
            prev_y = y;
        }
    }

    #[test]
    fn codec_roundtrip() {
        let mut list = SpeedList::new(0.75);
        list.add_speed_change(Beat::new(1, 4).unwrap(), 1.25);
        list.add_speed_change(Beat::from_integer(10), 2.0);

        let mut w = ByteWriter::default();
        list.encode(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), list.encoded_length());

        let mut r = ByteReader::new(&bytes);
        let decoded = SpeedList::decode(&mut r).unwrap();
        assert_eq!(list, decoded);
    }
}
