//! chartwire CLI - inspect, convert, and hash chart/music files.
//!
//! Usage:
//!   cwtool info <file.cwpc|file.cwpm>
//!   cwtool to-cbt <chart.cwpc> <out.json>
//!   cwtool from-cbt <chart.json> <out.cwpc>
//!   cwtool hash <file.cwpc|file.cwpm>

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use chartwire::cbt::{default_beats_per_measure, CbtFile};
use chartwire::model::{Chart, Music};
use chartwire::provider::DecodeContext;
use clap::{Parser, Subcommand};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "cwtool", version, about = "Inspect and convert chartwire files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print metadata and note counts for a chart or music file.
    Info { path: PathBuf },
    /// Convert a standalone chart blob to the legacy CBT JSON format.
    ToCbt { chart: PathBuf, out: PathBuf },
    /// Convert a CBT JSON file into a standalone chart blob.
    FromCbt { cbt: PathBuf, out: PathBuf },
    /// Print the BLAKE3 hash of a chart file.
    Hash { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Info { path } => cmd_info(&path),
        Command::ToCbt { chart, out } => cmd_to_cbt(&chart, &out),
        Command::FromCbt { cbt, out } => cmd_from_cbt(&cbt, &out),
        Command::Hash { path } => cmd_hash(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_info(path: &std::path::Path) -> CliResult {
    let bytes = std::fs::read(path)?;
    if bytes.starts_with(&chartwire::model::MUSIC_MAGIC) {
        let music = Music::decode(&bytes)?;
        println!("Music: {} - {}", music.artist, music.name);
        println!("  Keywords:   {}", music.keywords.join(", "));
        println!("  Categories: {:#010b}", music.categories.to_byte());
        println!("  Charts:     {}", music.chart_list.len());
        for info in &music.chart_list {
            println!(
                "    {} (difficulty {})",
                info.difficulty_name, info.difficulty
            );
        }
    } else {
        let chart = Chart::decode_from_slice(&bytes)?;
        println!("Chart by {}", chart.charter);
        println!("  Notes:        {}", chart.note_list.len());
        println!("  Offset:       {:.3}s", chart.offset);
        println!("  Initial BPM:  {:.1}", chart.bps_list.initial_bps * 60.0);
        println!("  Tempo changes: {}", chart.bps_list.changes().len());
        println!("  Speed changes: {}", chart.speed_list.changes().len());
        if !chart.comments.is_empty() {
            println!("  Comments:     {}", chart.comments);
        }
    }
    Ok(())
}

fn cmd_to_cbt(chart_path: &std::path::Path, out: &std::path::Path) -> CliResult {
    let bytes = std::fs::read(chart_path)?;
    let chart = Chart::decode_from_slice(&bytes)?;
    let cbt = chart.to_cbt(default_beats_per_measure());
    let json = serde_json::to_string_pretty(&cbt)?;
    std::fs::write(out, json)?;
    println!("Wrote {} CBT notes to {}", cbt.notes.len(), out.display());
    Ok(())
}

fn cmd_from_cbt(cbt_path: &std::path::Path, out: &std::path::Path) -> CliResult {
    let json = std::fs::read_to_string(cbt_path)?;
    let cbt: CbtFile = serde_json::from_str(&json)?;
    let chart = Chart::from_cbt(&cbt, default_beats_per_measure())?;
    let bytes = chart.encode_to_vec()?;
    std::fs::write(out, &bytes)?;
    println!("Wrote a {}-note chart ({} bytes) to {}", chart.note_list.len(), bytes.len(), out.display());
    Ok(())
}

fn cmd_hash(path: &std::path::Path) -> CliResult {
    let bytes = std::fs::read(path)?;
    let ctx = DecodeContext::with_defaults();
    let chart = if bytes.starts_with(&chartwire::model::MUSIC_MAGIC) {
        let mut music = Music::decode(&bytes)?;
        let first = music
            .chart_list
            .iter()
            .next()
            .ok_or("music file has no charts")?
            .difficulty_name
            .clone();
        music
            .chart_list
            .get_mut(&first)
            .expect("just looked up")
            .load_chart(&ctx)?
            .clone()
    } else {
        Chart::decode_from_slice(&bytes)?
    };
    println!("{}", chart.hash()?);
    Ok(())
}
