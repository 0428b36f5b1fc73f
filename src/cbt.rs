//! Bidirectional conversion to/from CBT, the legacy tuple-array chart
//! interchange format.
//!
//! A CBT file is a plain JSON tree: an `info` object and a flat `notes`
//! array of tuples `[measure, trackCount, subdivisionCount, trackIndex,
//! subdivision, type, ...args]`. [`CbtNote`] serializes to and from exactly
//! that array shape rather than a JSON object, so a [`CbtFile`] written with
//! `serde_json` round-trips through whatever reads the legacy format.

use std::collections::HashMap;

use num_rational::Ratio;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{RoxError, RoxResult};
use crate::model::{Chart, GroupId, NoteId, NoteVariant};
use crate::primitives::Beat;

/// The default measure grid: 4 beats per measure.
#[must_use]
pub fn default_beats_per_measure() -> Ratio<i64> {
    Ratio::from_integer(4)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbtInfo {
    pub bpm: f64,
    pub dir: String,
    pub delay: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CbtNote {
    pub measure: i64,
    pub track_count: u16,
    pub subdivision_count: u64,
    pub track_index: u16,
    pub subdivision: u64,
    pub kind: u8,
    pub args: Vec<Value>,
}

impl Serialize for CbtNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(6 + self.args.len()))?;
        seq.serialize_element(&self.measure)?;
        seq.serialize_element(&self.track_count)?;
        seq.serialize_element(&self.subdivision_count)?;
        seq.serialize_element(&self.track_index)?;
        seq.serialize_element(&self.subdivision)?;
        seq.serialize_element(&self.kind)?;
        for arg in &self.args {
            seq.serialize_element(arg)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CbtNote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TupleVisitor;
        impl<'de> Visitor<'de> for TupleVisitor {
            type Value = CbtNote;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a CBT note tuple")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<CbtNote, A::Error> {
                let measure = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let track_count = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let subdivision_count = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                let track_index = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(3, &self))?;
                let subdivision = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(4, &self))?;
                let kind = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(5, &self))?;
                let mut args = Vec::new();
                while let Some(v) = seq.next_element::<Value>()? {
                    args.push(v);
                }
                Ok(CbtNote {
                    measure,
                    track_count,
                    subdivision_count,
                    track_index,
                    subdivision,
                    kind,
                    args,
                })
            }
        }
        deserializer.deserialize_seq(TupleVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbtFile {
    pub info: CbtInfo,
    pub notes: Vec<CbtNote>,
}

fn beat_to_measure_subdivision(
    beat_ratio: Ratio<i64>,
    beats_per_measure: Ratio<i64>,
    starting_measure: i64,
) -> (i64, u64, u64) {
    let floor_val = (beat_ratio / beats_per_measure).floor().to_integer();
    let measure = floor_val - starting_measure;
    let fraction = (beat_ratio - Ratio::from_integer(floor_val) * beats_per_measure) / beats_per_measure;
    (measure, fraction.numer().unsigned_abs(), fraction.denom().unsigned_abs())
}

fn measure_subdivision_to_beat(
    measure: i64,
    subdivision: u64,
    subdivision_count: u64,
    beats_per_measure: Ratio<i64>,
) -> RoxResult<Beat> {
    let denom = if subdivision_count == 0 { 1 } else { subdivision_count };
    #[allow(clippy::cast_possible_wrap)]
    let fraction = Ratio::new(subdivision as i64, denom as i64);
    let beat_ratio = Ratio::from_integer(measure) * beats_per_measure + fraction * beats_per_measure;
    Beat::new(
        beat_ratio.numer().unsigned_abs(),
        beat_ratio.denom().unsigned_abs(),
    )
    .ok_or_else(|| RoxError::InvalidCbt("CBT tuple decodes to a negative beat".to_string()))
}

impl Chart {
    /// Convert this chart to the legacy tuple-array CBT format.
    ///
    /// `beats_per_measure` is the measure grid CBT positions are expressed
    /// against; pass [`default_beats_per_measure`] absent another
    /// convention.
    #[must_use]
    pub fn to_cbt(&self, beats_per_measure: Ratio<i64>) -> CbtFile {
        let offset_beat = Ratio::<i64>::approximate_float(-self.offset * self.bps_list.initial_bps)
            .unwrap_or_else(|| Ratio::from_integer(0));
        let starting_measure = (offset_beat / beats_per_measure)
            .floor()
            .to_integer()
            .min(0);

        let mut notes = Vec::new();

        let (measure, subdivision, subdivision_count) =
            beat_to_measure_subdivision(offset_beat, beats_per_measure, starting_measure);
        notes.push(CbtNote {
            measure,
            track_count: 0,
            subdivision_count,
            track_index: 0,
            subdivision,
            kind: 1,
            args: vec![Value::String(String::new())],
        });

        let bpm_scale = beats_per_measure.to_f64_lossy() / 4.0;
        for change in self.bps_list.changes() {
            let (measure, subdivision, subdivision_count) = beat_to_measure_subdivision(
                change.beat.to_signed_ratio(),
                beats_per_measure,
                starting_measure,
            );
            notes.push(CbtNote {
                measure,
                track_count: 0,
                subdivision_count,
                track_index: 0,
                subdivision,
                kind: 2,
                args: vec![Value::from(change.bpm() * bpm_scale)],
            });
        }

        if self.speed_list.initial_speed != 1.0 {
            let (measure, subdivision, subdivision_count) =
                beat_to_measure_subdivision(Beat::ZERO.to_signed_ratio(), beats_per_measure, starting_measure);
            notes.push(CbtNote {
                measure,
                track_count: 0,
                subdivision_count,
                track_index: 0,
                subdivision,
                kind: 3,
                args: vec![Value::from(self.speed_list.initial_speed)],
            });
        }
        for change in self.speed_list.changes() {
            let (measure, subdivision, subdivision_count) = beat_to_measure_subdivision(
                change.beat.to_signed_ratio(),
                beats_per_measure,
                starting_measure,
            );
            notes.push(CbtNote {
                measure,
                track_count: 0,
                subdivision_count,
                track_index: 0,
                subdivision,
                kind: 3,
                args: vec![Value::from(change.speed)],
            });
        }

        let mut group_ids: HashMap<GroupId, i64> = HashMap::new();
        let mut next_group_id = 0i64;
        for note in self.note_list.notes() {
            let (measure, subdivision, subdivision_count) = beat_to_measure_subdivision(
                note.beat.to_signed_ratio(),
                beats_per_measure,
                starting_measure,
            );
            let (kind, args) = match note.variant {
                NoteVariant::Tap => {
                    if note.is_wide() {
                        (40, vec![Value::from(f64::from(note.width.to_f32()))])
                    } else {
                        (10, Vec::new())
                    }
                }
                NoteVariant::Hold | NoteVariant::Drag => {
                    let gid = *group_ids.entry(note.group().expect("groupable note has a group")).or_insert_with(|| {
                        let id = next_group_id;
                        next_group_id += 1;
                        id
                    });
                    let begin = self.note_list.is_begin(note.id()) || self.note_list.is_isolated(note.id());
                    let end = self.note_list.is_end(note.id()) || self.note_list.is_isolated(note.id());
                    let middle = self.note_list.is_middle(note.id());
                    if note.variant == NoteVariant::Drag {
                        let kind = if begin { 30 } else if middle { 31 } else { 32 };
                        (kind, vec![Value::from(gid)])
                    } else if note.is_wide() {
                        let kind = if begin { 50 } else if middle { 52 } else { 51 };
                        (kind, vec![Value::from(gid), Value::from(f64::from(note.width.to_f32()))])
                    } else {
                        let kind = if begin { 20 } else if middle { 22 } else { 21 };
                        (kind, vec![Value::from(gid)])
                    }
                }
            };
            notes.push(CbtNote {
                measure,
                track_count: note.track_count,
                subdivision_count,
                track_index: note.track_index,
                subdivision,
                kind,
                args,
            });
        }

        CbtFile {
            info: CbtInfo {
                bpm: self.bps_list.initial_bps * 60.0,
                dir: String::new(),
                delay: self.offset,
            },
            notes,
        }
    }

    /// Reconstruct a chart from its CBT representation.
    ///
    /// # Errors
    ///
    /// Returns [`RoxError::InvalidCbt`] for a malformed tuple (wrong arity,
    /// unknown type code, or a group reference that resolves to a negative
    /// beat).
    pub fn from_cbt(cbt: &CbtFile, beats_per_measure: Ratio<i64>) -> RoxResult<Self> {
        let mut chart = Chart::new();
        chart.bps_list.initial_bps = cbt.info.bpm / 60.0;

        let mut offset_beat: Option<Beat> = None;
        let mut hold_groups: HashMap<i64, Vec<NoteId>> = HashMap::new();
        let mut drag_groups: HashMap<i64, Vec<NoteId>> = HashMap::new();

        for note in &cbt.notes {
            let beat = measure_subdivision_to_beat(
                note.measure,
                note.subdivision,
                note.subdivision_count,
                beats_per_measure,
            )?;
            match note.kind {
                1 => offset_beat = Some(beat),
                2 => {
                    let bpm = arg_f64(note, 0)?;
                    let bps = (bpm / (beats_per_measure.to_f64_lossy() / 4.0)) / 60.0;
                    chart.bps_list.add_bps_change(beat, bps);
                }
                3 => {
                    let speed = arg_f64(note, 0)?;
                    chart.speed_list.add_speed_change(beat, speed);
                }
                10 | 40 => {
                    let width = if note.kind == 40 {
                        half::f16::from_f64(arg_f64(note, 0)?)
                    } else {
                        half::f16::ZERO
                    };
                    chart
                        .note_list
                        .add_tap(beat, note.track_count, note.track_index, width);
                }
                20 | 21 | 22 | 50 | 51 | 52 => {
                    let group = arg_i64(note, 0)?;
                    let width = if matches!(note.kind, 50 | 51 | 52) {
                        half::f16::from_f64(arg_f64(note, 1)?)
                    } else {
                        half::f16::ZERO
                    };
                    let id = chart
                        .note_list
                        .add_hold(beat, note.track_count, note.track_index, width);
                    hold_groups.entry(group).or_default().push(id);
                }
                30 | 31 | 32 => {
                    let group = arg_i64(note, 0)?;
                    let id = chart
                        .note_list
                        .add_drag(beat, note.track_count, note.track_index, half::f16::ZERO);
                    drag_groups.entry(group).or_default().push(id);
                }
                other => {
                    return Err(RoxError::InvalidCbt(format!("unknown CBT note type {other}")));
                }
            }
        }

        for members in hold_groups.values().chain(drag_groups.values()) {
            if members.len() > 1 {
                chart.note_list.merge(members)?;
            }
        }

        if let Some(offset_beat) = offset_beat {
            chart.offset = -chart.bps_list.time_at(offset_beat);
        }

        Ok(chart)
    }
}

fn arg_f64(note: &CbtNote, idx: usize) -> RoxResult<f64> {
    note.args
        .get(idx)
        .and_then(Value::as_f64)
        .ok_or_else(|| RoxError::InvalidCbt(format!("CBT type {} missing numeric arg {idx}", note.kind)))
}

fn arg_i64(note: &CbtNote, idx: usize) -> RoxResult<i64> {
    note.args
        .get(idx)
        .and_then(Value::as_i64)
        .ok_or_else(|| RoxError::InvalidCbt(format!("CBT type {} missing integer arg {idx}", note.kind)))
}

trait RatioLossyF64 {
    fn to_f64_lossy(self) -> f64;
}

impl RatioLossyF64 for Ratio<i64> {
    fn to_f64_lossy(self) -> f64 {
        *self.numer() as f64 / *self.denom() as f64
    }
}
