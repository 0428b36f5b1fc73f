//! Black-box tests over the chart/music model's public API, aggregating
//! behavior across several modules at once (complementing, not duplicating,
//! the inline `#[cfg(test)]` unit tests beside each type's implementation).

mod common;

use half::f16;

use chartwire::model::{BpsList, Chart, ChartInfo, ChartList, NoteList, SpeedList};
use chartwire::prelude::Categories;
use chartwire::primitives::Beat;
use chartwire::provider::DecodeContext;

#[test]
fn chart_y_at_beat_composes_tempo_and_speed() {
    let mut chart = Chart::new();
    chart.bps_list = BpsList::new(2.0); // 2 beats/sec
    chart.speed_list = SpeedList::new(1.0);
    chart
        .speed_list
        .add_speed_change(Beat::from_integer(2), 2.0);

    // first 2 beats at bps=2 take 1s at speed=1 -> y=1.0
    // next 2 beats take another 1s at speed=2 -> y += 2.0
    assert_eq!(chart.y_at_beat(Beat::from_integer(2)), 1.0);
    assert_eq!(chart.y_at_beat(Beat::from_integer(4)), 3.0);
}

#[test]
fn chart_with_merged_groups_preserves_peer_relationships() {
    let chart = common::chart_with_groups();
    let holds: Vec<_> = chart
        .note_list
        .notes()
        .iter()
        .filter(|n| n.variant == chartwire::model::NoteVariant::Hold)
        .collect();
    assert_eq!(holds.len(), 2);
    assert!(chart.note_list.is_begin(holds[0].id()));
    assert!(chart.note_list.is_end(holds[1].id()));

    let drags: Vec<_> = chart
        .note_list
        .notes()
        .iter()
        .filter(|n| n.variant == chartwire::model::NoteVariant::Drag)
        .collect();
    assert_eq!(drags.len(), 2);
    assert_ne!(
        chart.note_list.peers(holds[0].id()),
        chart.note_list.peers(drags[0].id())
    );
}

#[test]
fn note_list_insertion_keeps_beat_order_regardless_of_insert_sequence() {
    let mut list = NoteList::new();
    list.add_tap(Beat::from_integer(5), 4, 0, f16::ZERO);
    list.add_tap(Beat::from_integer(1), 4, 1, f16::ZERO);
    list.add_tap(Beat::from_integer(3), 4, 2, f16::ZERO);

    let beats: Vec<Beat> = list.notes().iter().map(|n| n.beat).collect();
    assert_eq!(
        beats,
        vec![
            Beat::from_integer(1),
            Beat::from_integer(3),
            Beat::from_integer(5)
        ]
    );
}

#[test]
fn chart_info_lazily_reencodes_after_set_chart() {
    let ctx = DecodeContext::with_defaults();
    let mut info = ChartInfo::new("Normal", 3, common::sample_chart());

    let mut updated = common::sample_chart();
    updated.charter = "Someone Else".to_string();
    info.set_chart(updated.clone());

    assert_eq!(info.chart(&ctx).unwrap(), updated);
}

#[test]
fn chart_list_overwrite_preserves_position_and_updates_fields() {
    let mut list = ChartList::new();
    list.insert(ChartInfo::new("Easy", 1, Chart::new()));
    list.insert(ChartInfo::new("Hard", 8, common::sample_chart()));
    list.insert(ChartInfo::new("Easy", 2, common::chart_with_groups()));

    let names: Vec<_> = list.iter().map(|e| e.difficulty_name.clone()).collect();
    assert_eq!(names, vec!["Easy", "Hard"]);
    assert_eq!(list.get("Easy").unwrap().difficulty, 2);
}

#[test]
fn categories_combine_named_bits_and_round_trip_through_music() {
    let cats = Categories::VOCAL | Categories::INSTRUMENTAL;
    assert!(cats.contains(Categories::VOCAL));
    assert!(cats.contains(Categories::INSTRUMENTAL));
    assert_eq!(cats.to_byte(), 0b0000_1100);

    let mut music = common::sample_music();
    music.categories = cats;
    let ctx = DecodeContext::with_defaults();
    let bytes = music.encode(false, &ctx).unwrap();
    let decoded = chartwire::model::Music::decode(&bytes).unwrap();
    assert_eq!(decoded.categories, cats);
}

#[test]
fn empty_chart_has_default_tempo_and_speed() {
    let chart = Chart::new();
    assert_eq!(chart.bps_list.initial_bps, chartwire::model::DEFAULT_INITIAL_BPS);
}
