//! Shared fixtures for the black-box integration tests.

#![allow(dead_code)]

use half::f16;

use chartwire::model::{BpsList, Chart, ChartInfo, ChartList, Music, NoteList, SpeedList};
use chartwire::prelude::Categories;
use chartwire::primitives::Beat;
use chartwire::provider::{
    CoverProvider, FileEmbedded, FileProvider, MusicProvider, PreviewFromMusic, PreviewProvider,
};

/// A chart with a couple of tempo/speed changes and a mix of tap, hold, and
/// drag notes, none of them merged into groups yet.
pub fn sample_chart() -> Chart {
    let mut chart = Chart::new();
    chart.charter = "Test Charter".to_string();
    chart.comments = "fixture chart".to_string();
    chart.offset = 0.25;
    chart.bps_list = BpsList::new(2.0);
    chart.bps_list.add_bps_change(Beat::from_integer(8), 3.0);
    chart.speed_list = SpeedList::new(1.0);
    chart
        .speed_list
        .add_speed_change(Beat::from_integer(4), 1.5);

    chart.note_list.add_tap(Beat::from_integer(0), 4, 0, f16::ZERO);
    chart.note_list.add_tap(Beat::from_integer(1), 4, 1, f16::ZERO);
    chart.note_list.add_hold(Beat::from_integer(2), 4, 2, f16::ZERO);
    chart.note_list.add_drag(Beat::from_integer(3), 4, 3, f16::ZERO);
    chart
}

/// A chart with a hold and a drag each merged into a two-note group, to
/// exercise group-preserving round trips.
pub fn chart_with_groups() -> Chart {
    let mut chart = Chart::new();
    chart.bps_list = BpsList::new(2.5);
    chart.note_list = NoteList::new();

    let h1 = chart.note_list.add_hold(Beat::from_integer(0), 4, 0, f16::ZERO);
    let h2 = chart
        .note_list
        .add_hold(Beat::new(1, 2).unwrap(), 4, 0, f16::ZERO);
    chart.note_list.merge(&[h1, h2]).unwrap();

    let d1 = chart.note_list.add_drag(Beat::from_integer(1), 4, 1, f16::ZERO);
    let d2 = chart.note_list.add_drag(Beat::from_integer(2), 4, 1, f16::ZERO);
    chart.note_list.merge(&[d1, d2]).unwrap();

    chart
}

/// A `Music` file with two difficulties, an embedded audio blob, and a
/// music-relative preview window.
pub fn sample_music() -> Music {
    let mut chart_list = ChartList::new();
    chart_list.insert(ChartInfo::new("Normal", 3, sample_chart()));
    chart_list.insert(ChartInfo::new("Hard", 7, chart_with_groups()));

    Music {
        name: "Fixture Song".to_string(),
        artist: "Fixture Artist".to_string(),
        categories: Categories::VOCAL | Categories::INSTRUMENTAL,
        keywords: vec!["test".to_string(), "fixture".to_string()],
        music_provider: MusicProvider::new(FileProvider::Embedded(FileEmbedded::from_raw(
            b"pretend ogg bytes".to_vec(),
        ))),
        preview_provider: PreviewProvider::FromMusic(PreviewFromMusic {
            offset: 5_000,
            length: 15_000,
            fade_in: 500,
            fade_out: 500,
        }),
        cover_provider: CoverProvider::Empty,
        chart_list,
    }
}
