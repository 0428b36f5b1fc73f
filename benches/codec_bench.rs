//! Benchmarks for the chartwire codec encode/decode performance.

use std::hint::black_box;

use chartwire::model::{Chart, ChartInfo, ChartList, Music};
use chartwire::prelude::*;
use chartwire::provider::{CoverProvider, FileEmbedded, FileProvider, MusicProvider, PreviewFromMusic, PreviewProvider};
use criterion::{criterion_group, criterion_main, Criterion};
use half::f16;

/// Build a chart with `note_count` notes spread across 100 tempo/speed
/// changes, mirroring the shape of a long, dense playable chart.
fn create_large_chart(note_count: u64) -> Chart {
    let mut chart = Chart::new();
    chart.charter = "Benchmark Charter".to_string();
    chart.bps_list = BpsList::new(2.0);
    chart.speed_list = SpeedList::new(1.0);

    for i in 0..100u64 {
        let beat = Beat::from_integer(i * 4);
        chart.bps_list.add_bps_change(beat, 2.0 + (i as f64) * 0.05);
        chart.speed_list.add_speed_change(beat, 1.0 + (i % 10) as f64 * 0.1);
    }

    let mut open_hold: Option<chartwire::model::NoteId> = None;
    for i in 0..note_count {
        let beat = Beat::new(i, 4).unwrap();
        let track_index = (i % 7) as u16;
        match i % 20 {
            18 => {
                let id = chart.note_list.add_hold(beat, 7, track_index, f16::ZERO);
                if let Some(prev) = open_hold.take() {
                    chart.note_list.merge(&[prev, id]).unwrap();
                } else {
                    open_hold = Some(id);
                }
            }
            19 => {
                chart.note_list.add_drag(beat, 7, track_index, f16::ZERO);
            }
            _ => {
                chart.note_list.add_tap(beat, 7, track_index, f16::ZERO);
            }
        }
    }
    chart
}

fn create_music(chart: Chart) -> Music {
    let mut chart_list = ChartList::new();
    chart_list.insert(ChartInfo::new("Benchmark", 10, chart));
    Music {
        name: "Benchmark Song".to_string(),
        artist: "Criterion".to_string(),
        categories: Categories::empty(),
        keywords: vec!["benchmark".to_string()],
        music_provider: MusicProvider::new(FileProvider::Embedded(FileEmbedded::from_raw(
            vec![0u8; 4096],
        ))),
        preview_provider: PreviewProvider::FromMusic(PreviewFromMusic {
            offset: 0,
            length: 44100 * 10,
            fade_in: 4410,
            fade_out: 4410,
        }),
        cover_provider: CoverProvider::Empty,
        chart_list,
    }
}

fn bench_encode_chart_large(c: &mut Criterion) {
    let chart = create_large_chart(32_000);
    c.bench_function("encode_chart_32000_notes", |b| {
        b.iter(|| black_box(&chart).encode_to_vec().unwrap())
    });
}

fn bench_decode_chart_large(c: &mut Criterion) {
    let chart = create_large_chart(32_000);
    let encoded = chart.encode_to_vec().unwrap();
    c.bench_function("decode_chart_32000_notes", |b| {
        b.iter(|| Chart::decode_from_slice(black_box(&encoded)).unwrap())
    });
}

fn bench_encode_chart_medium(c: &mut Criterion) {
    let chart = create_large_chart(5_000);
    c.bench_function("encode_chart_5000_notes", |b| {
        b.iter(|| black_box(&chart).encode_to_vec().unwrap())
    });
}

fn bench_decode_chart_medium(c: &mut Criterion) {
    let chart = create_large_chart(5_000);
    let encoded = chart.encode_to_vec().unwrap();
    c.bench_function("decode_chart_5000_notes", |b| {
        b.iter(|| Chart::decode_from_slice(black_box(&encoded)).unwrap())
    });
}

fn bench_roundtrip_chart(c: &mut Criterion) {
    let chart = create_large_chart(5_000);
    c.bench_function("roundtrip_chart_5000_notes", |b| {
        b.iter(|| {
            let encoded = black_box(&chart).encode_to_vec().unwrap();
            Chart::decode_from_slice(black_box(&encoded)).unwrap()
        })
    });
}

fn bench_encode_music(c: &mut Criterion) {
    let ctx = DecodeContext::with_defaults();
    c.bench_function("encode_music_with_500_note_chart", |b| {
        b.iter_batched(
            || create_music(create_large_chart(500)),
            |mut music| black_box(&mut music).encode(false, &ctx).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_decode_music(c: &mut Criterion) {
    let ctx = DecodeContext::with_defaults();
    let mut music = create_music(create_large_chart(500));
    let encoded = music.encode(false, &ctx).unwrap();
    c.bench_function("decode_music_with_500_note_chart", |b| {
        b.iter(|| Music::decode(black_box(&encoded)).unwrap())
    });
}

fn bench_to_cbt(c: &mut Criterion) {
    let chart = create_large_chart(5_000);
    c.bench_function("to_cbt_5000_notes", |b| {
        b.iter(|| black_box(&chart).to_cbt(chartwire::cbt::default_beats_per_measure()))
    });
}

criterion_group!(
    benches,
    bench_encode_chart_large,
    bench_decode_chart_large,
    bench_encode_chart_medium,
    bench_decode_chart_medium,
    bench_roundtrip_chart,
    bench_encode_music,
    bench_decode_music,
    bench_to_cbt,
);
criterion_main!(benches);
