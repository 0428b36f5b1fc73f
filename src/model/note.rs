//! Notes (tap/hold/drag) and the group relation that links hold/drag peers.

use std::collections::HashMap;

use half::f16;

use crate::error::{RoxError, RoxResult};
use crate::primitives::{Beat, ByteReader, ByteWriter};

/// Stable identity for a [`Note`], independent of its position in the
/// beat-sorted note list (which shifts on every insert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(u32);

/// Stable identity for a peer group arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// The three note variants a chart can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteVariant {
    /// Single tap.
    Tap,
    /// Hold: must be pressed at the first peer and released at the last.
    Hold,
    /// Drag: must be traced continuously through every peer.
    Drag,
}

impl NoteVariant {
    fn is_groupable(self) -> bool {
        matches!(self, NoteVariant::Hold | NoteVariant::Drag)
    }
}

/// A single note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    id: NoteId,
    pub beat: Beat,
    pub track_count: u16,
    pub track_index: u16,
    /// Magnitude of the note's width; `0` means not wide. The variant is
    /// tracked explicitly on this struct rather than via the wire format's
    /// signed-zero trick (see the codec for that compatibility shim).
    pub width: f16,
    pub variant: NoteVariant,
    group: Option<GroupId>,
}

impl Note {
    /// Stable id, usable as a key into [`NoteList`] group queries.
    #[must_use]
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Horizontal position in `[0, 1)`: `(track_index + 0.5) / track_count`.
    #[must_use]
    pub fn x(&self) -> f64 {
        (f64::from(self.track_index) + 0.5) / f64::from(self.track_count)
    }

    /// `true` if this note occupies more than one track's width.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.width != f16::ZERO
    }

    /// The group this note belongs to, if it is a [`NoteVariant::Hold`] or
    /// [`NoteVariant::Drag`].
    #[must_use]
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }
}

#[derive(Debug, Clone)]
struct Group {
    variant: NoteVariant,
    /// Ordered by beat; always non-empty while the slot is `Some`.
    members: Vec<NoteId>,
}

/// A beat-sorted sequence of notes, with an arena of hold/drag peer groups.
///
/// Per the Design Notes' recommendation, groups are not shared references:
/// each groupable note carries a [`GroupId`] (an arena index) and the arena
/// holds the ordered member list. [`NoteList::merge`] rewrites the
/// `GroupId` of every affected note and drops the now-empty slot.
#[derive(Debug, Clone, Default)]
pub struct NoteList {
    notes: Vec<Note>,
    groups: Vec<Option<Group>>,
    next_id: u32,
}

impl NoteList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn alloc_id(&mut self) -> NoteId {
        let id = NoteId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_sorted(&mut self, note: Note) -> NoteId {
        let id = note.id;
        let idx = self.notes.partition_point(|n| n.beat <= note.beat);
        self.notes.insert(idx, note);
        id
    }

    /// Add a tap note. Returns the new note's id.
    pub fn add_tap(&mut self, beat: Beat, track_count: u16, track_index: u16, width: f16) -> NoteId {
        let id = self.alloc_id();
        self.insert_sorted(Note {
            id,
            beat,
            track_count,
            track_index,
            width,
            variant: NoteVariant::Tap,
            group: None,
        })
    }

    /// Add a hold note as a new singleton group. Use [`NoteList::merge`] to
    /// join it with other holds afterward.
    pub fn add_hold(&mut self, beat: Beat, track_count: u16, track_index: u16, width: f16) -> NoteId {
        self.add_groupable(beat, track_count, track_index, width, NoteVariant::Hold)
    }

    /// Add a drag note as a new singleton group.
    pub fn add_drag(&mut self, beat: Beat, track_count: u16, track_index: u16, width: f16) -> NoteId {
        self.add_groupable(beat, track_count, track_index, width, NoteVariant::Drag)
    }

    fn add_groupable(
        &mut self,
        beat: Beat,
        track_count: u16,
        track_index: u16,
        width: f16,
        variant: NoteVariant,
    ) -> NoteId {
        let id = self.alloc_id();
        let group_id = GroupId(self.groups.len());
        self.groups.push(Some(Group {
            variant,
            members: vec![id],
        }));
        self.insert_sorted(Note {
            id,
            beat,
            track_count,
            track_index,
            width,
            variant,
            group: Some(group_id),
        })
    }

    fn note_index(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Look up a note by id.
    #[must_use]
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.note_index(id).map(|i| &self.notes[i])
    }

    /// The ordered peer list (by beat) a groupable note belongs to.
    #[must_use]
    pub fn peers(&self, id: NoteId) -> Option<&[NoteId]> {
        let group = self.get(id)?.group?;
        self.groups[group.0].as_ref().map(|g| g.members.as_slice())
    }

    /// `true` if `id` is the first member of a group with more than one peer.
    #[must_use]
    pub fn is_begin(&self, id: NoteId) -> bool {
        self.peers(id)
            .is_some_and(|p| p.len() > 1 && p.first() == Some(&id))
    }

    /// `true` if `id` is the last member of a group with more than one peer.
    #[must_use]
    pub fn is_end(&self, id: NoteId) -> bool {
        self.peers(id)
            .is_some_and(|p| p.len() > 1 && p.last() == Some(&id))
    }

    /// `true` if `id` is neither the first nor the last peer.
    #[must_use]
    pub fn is_middle(&self, id: NoteId) -> bool {
        self.peers(id)
            .is_some_and(|p| p.len() > 1 && p.first() != Some(&id) && p.last() != Some(&id))
    }

    /// `true` if `id`'s group has exactly one member.
    #[must_use]
    pub fn is_isolated(&self, id: NoteId) -> bool {
        self.peers(id).is_some_and(|p| p.len() == 1)
    }

    /// Union the groups of every note in `ids` into one, re-sorted by beat.
    ///
    /// All notes must be groupable (`Hold` or `Drag`) and share the same
    /// variant. Distinct groups already containing more than one of the
    /// given ids are only unioned once (dedup by group identity).
    ///
    /// # Errors
    ///
    /// Returns [`RoxError::InvalidCbt`] if `ids` is empty, any id is
    /// unknown, not groupable, or the ids span more than one variant.
    pub fn merge(&mut self, ids: &[NoteId]) -> RoxResult<GroupId> {
        if ids.is_empty() {
            return Err(RoxError::InvalidCbt(
                "merge: ids must not be empty".to_string(),
            ));
        }
        let mut group_ids = Vec::new();
        let mut variant = None;
        for &id in ids {
            let note = self
                .get(id)
                .ok_or_else(|| RoxError::InvalidCbt(format!("merge: unknown note id {id:?}")))?;
            if !note.variant.is_groupable() {
                return Err(RoxError::InvalidCbt(
                    "merge: note is not groupable (must be Hold or Drag)".to_string(),
                ));
            }
            match variant {
                None => variant = Some(note.variant),
                Some(v) if v == note.variant => {}
                Some(_) => {
                    return Err(RoxError::InvalidCbt(
                        "merge: notes span more than one variant".to_string(),
                    ));
                }
            }
            let gid = note.group.expect("groupable note always has a group");
            if !group_ids.contains(&gid) {
                group_ids.push(gid);
            }
        }

        let survivor = group_ids[0];
        let mut members = Vec::new();
        for &gid in &group_ids {
            if let Some(group) = self.groups[gid.0].take() {
                members.extend(group.members);
            }
        }
        members.sort_by_key(|id| self.get(*id).map(|n| n.beat).unwrap_or(Beat::ZERO));
        members.dedup();

        for &id in &members {
            if let Some(idx) = self.note_index(id) {
                self.notes[idx].group = Some(survivor);
            }
        }
        self.groups[survivor.0] = Some(Group {
            variant: variant.expect("ids is non-empty"),
            members,
        });
        Ok(survivor)
    }

    /// Byte length of [`NoteList::encode`]'s output.
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        4 + 18 * self.notes.len()
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        #[allow(clippy::cast_possible_truncation)]
        w.write_u32(self.notes.len() as u32);

        let pos_of: HashMap<NoteId, usize> =
            self.notes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect();

        let mut next = vec![0u32; self.notes.len()];
        for group in self.groups.iter().flatten() {
            for pair in group.members.windows(2) {
                let i = pos_of[&pair[0]];
                let j = pos_of[&pair[1]];
                #[allow(clippy::cast_possible_truncation)]
                {
                    next[i] = (j - i) as u32;
                }
            }
        }

        let mut prev = Beat::ZERO;
        for (i, note) in self.notes.iter().enumerate() {
            prev = w.write_beat_delta(prev, note.beat);
            w.write_u16(note.track_count);
            w.write_u16(note.track_index);
            w.write_u32(next[i]);
            let signed_width = if note.variant == NoteVariant::Drag {
                -note.width
            } else {
                note.width
            };
            w.write_f16(signed_width);
        }
    }

    /// # Errors
    ///
    /// Propagates any I/O or malformed-beat error from the underlying
    /// [`ByteReader`].
    pub fn decode(r: &mut ByteReader) -> RoxResult<Self> {
        let count = r.read_u32()? as usize;
        let mut list = NoteList::new();
        let mut prev = Beat::ZERO;
        let mut pending: HashMap<usize, GroupId> = HashMap::new();

        for i in 0..count {
            prev = r.read_beat_delta(prev)?;
            let track_count = r.read_u16()?;
            let track_index = r.read_u16()?;
            let next = r.read_u32()?;
            let width_raw = r.read_f16()?;
            let is_drag = width_raw.is_sign_negative();
            let width = if is_drag { -width_raw } else { width_raw };

            let variant = if is_drag {
                NoteVariant::Drag
            } else if pending.contains_key(&i) || next != 0 {
                NoteVariant::Hold
            } else {
                NoteVariant::Tap
            };

            let id = list.alloc_id();
            let group = match variant {
                NoteVariant::Tap => None,
                NoteVariant::Hold | NoteVariant::Drag => {
                    if let Some(gid) = pending.remove(&i) {
                        list.groups[gid.0]
                            .as_mut()
                            .expect("pending group slot still live")
                            .members
                            .push(id);
                        Some(gid)
                    } else {
                        let gid = GroupId(list.groups.len());
                        list.groups.push(Some(Group {
                            variant,
                            members: vec![id],
                        }));
                        Some(gid)
                    }
                }
            };

            if next != 0 {
                let target = i + next as usize;
                pending.insert(target, group.expect("next != 0 implies groupable"));
            }

            list.notes.push(Note {
                id,
                beat: prev,
                track_count,
                track_index,
                width,
                variant,
                group,
            });
        }

        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat(n: u64) -> Beat {
        Beat::from_integer(n)
    }

    fn beat_frac(n: u64, d: u64) -> Beat {
        Beat::new(n, d).unwrap()
    }

    /// spec.md §8 scenario 3.
    #[test]
    fn scenario_group_roundtrip() {
        let mut list = NoteList::new();
        list.add_tap(beat(1), 4, 0, f16::ZERO);
        let h1 = list.add_hold(beat_frac(1, 2), 5, 4, f16::ZERO);
        let h2 = list.add_hold(beat_frac(3, 2), 5, 3, f16::ZERO);
        list.merge(&[h1, h2]).unwrap();
        let d1 = list.add_drag(beat(2), 5, 2, f16::ZERO);
        let d2 = list.add_drag(beat(3), 5, 1, f16::ZERO);
        list.merge(&[d1, d2]).unwrap();

        assert_eq!(list.len(), 5);

        let mut w = ByteWriter::default();
        list.encode(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), list.encoded_length());

        let mut r = ByteReader::new(&bytes);
        let decoded = NoteList::decode(&mut r).unwrap();
        assert_eq!(decoded.len(), 5);

        let variants: Vec<NoteVariant> = decoded.notes().iter().map(|n| n.variant).collect();
        assert_eq!(
            variants,
            vec![
                NoteVariant::Hold,
                NoteVariant::Tap,
                NoteVariant::Hold,
                NoteVariant::Drag,
                NoteVariant::Drag,
            ]
        );

        let hold_notes: Vec<_> = decoded
            .notes()
            .iter()
            .filter(|n| n.variant == NoteVariant::Hold)
            .collect();
        assert_eq!(hold_notes.len(), 2);
        let hold_peers = decoded.peers(hold_notes[0].id()).unwrap();
        assert_eq!(hold_peers.len(), 2);
        assert_eq!(decoded.peers(hold_notes[1].id()).unwrap(), hold_peers);

        let drag_notes: Vec<_> = decoded
            .notes()
            .iter()
            .filter(|n| n.variant == NoteVariant::Drag)
            .collect();
        assert_eq!(drag_notes.len(), 2);
        let drag_peers = decoded.peers(drag_notes[0].id()).unwrap();
        assert_eq!(drag_peers.len(), 2);
        assert_ne!(drag_peers, hold_peers);
    }

    #[test]
    fn merge_dedups_shared_groups() {
        let mut list = NoteList::new();
        let a = list.add_hold(beat(0), 4, 0, f16::ZERO);
        let b = list.add_hold(beat(1), 4, 0, f16::ZERO);
        let c = list.add_hold(beat(2), 4, 0, f16::ZERO);
        list.merge(&[a, b]).unwrap();
        // merging again with an already-shared pair plus a new member must not duplicate.
        list.merge(&[a, b, c]).unwrap();
        assert_eq!(list.peers(a).unwrap().len(), 3);
    }

    #[test]
    fn merge_rejects_mixed_variants() {
        let mut list = NoteList::new();
        let h = list.add_hold(beat(0), 4, 0, f16::ZERO);
        let d = list.add_drag(beat(1), 4, 0, f16::ZERO);
        assert!(list.merge(&[h, d]).is_err());
    }

    #[test]
    fn merge_rejects_empty_ids() {
        let mut list = NoteList::new();
        assert!(list.merge(&[]).is_err());
    }

    #[test]
    fn predicates_on_three_member_group() {
        let mut list = NoteList::new();
        let a = list.add_hold(beat(0), 4, 0, f16::ZERO);
        let b = list.add_hold(beat(1), 4, 0, f16::ZERO);
        let c = list.add_hold(beat(2), 4, 0, f16::ZERO);
        list.merge(&[a, b, c]).unwrap();

        assert!(list.is_begin(a));
        assert!(!list.is_begin(b));
        assert!(list.is_middle(b));
        assert!(!list.is_middle(a));
        assert!(list.is_end(c));
        assert!(!list.is_isolated(a));
    }

    #[test]
    fn isolated_group_is_singleton() {
        let mut list = NoteList::new();
        let a = list.add_hold(beat(0), 4, 0, f16::ZERO);
        assert!(list.is_isolated(a));
        assert!(!list.is_begin(a));
        assert!(!list.is_end(a));
    }

    #[test]
    fn wide_drag_width_survives_sign_trick() {
        let mut list = NoteList::new();
        let width = f16::from_f32(1.5);
        list.add_drag(beat(0), 4, 0, width);
        list.add_tap(beat(1), 4, 1, f16::ZERO);

        let mut w = ByteWriter::default();
        list.encode(&mut w);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        let decoded = NoteList::decode(&mut r).unwrap();

        let drag = decoded
            .notes()
            .iter()
            .find(|n| n.variant == NoteVariant::Drag)
            .unwrap();
        assert_eq!(drag.width, width);
        assert!(drag.is_wide());
    }
}
