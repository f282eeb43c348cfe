//! Flame Smash headless runner
//!
//! Loads a level (SVG or JSON file, URL, demo flame graph, random pick from a
//! directory, or a generated flame graph) and lets the autopilot play it at
//! the nominal frame rate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use flame_smash::consts::NOMINAL_DT;
use flame_smash::level::{
    Catalog, FlameGraphGenerator, LevelDocument, LevelSource, RemoteLevel, demo_level, open_file, pick_demo,
};
use flame_smash::persistence::{BestTimeStore, JsonFileStore, MemoryStore};
use flame_smash::platform::{Autopilot, LogRenderSink};
use flame_smash::{Session, SessionPhase, Settings, format_seconds};

#[derive(Debug, Parser)]
#[command(name = "flame-smash", about = "Smash a flame graph, one frame at a time")]
struct Cli {
    /// Level file: a flame-graph SVG, or a JSON document of its rectangles
    #[arg(long)]
    level: Option<PathBuf>,

    /// Flame-graph SVG to download
    #[arg(long)]
    url: Option<String>,

    /// Built-in demo flame graph by file name (e.g. cpu-grep.svg)
    #[arg(long)]
    demo: Option<String>,

    /// Play a random built-in demo flame graph
    #[arg(long)]
    surprise: bool,

    /// Directory of level documents to pick one from at random
    #[arg(long)]
    levels_dir: Option<PathBuf>,

    /// Seed for level selection and generation (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Best-time file (overrides the settings)
    #[arg(long)]
    best_time: Option<PathBuf>,

    /// Give up after this many frames
    #[arg(long, default_value_t = 60 * 300)]
    max_frames: u64,

    /// Log the HUD every N frames
    #[arg(long, default_value_t = 60)]
    hud_every: u64,

    /// Write the generated level to this file and exit
    #[arg(long)]
    export: Option<PathBuf>,
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn pick_source(cli: &Cli, seed: u64) -> Result<Box<dyn LevelSource>> {
    if let Some(path) = &cli.level {
        return Ok(open_file(path));
    }
    if let Some(url) = &cli.url {
        return Ok(Box::new(RemoteLevel::new(url.as_str())));
    }
    if let Some(name) = &cli.demo {
        return Ok(Box::new(demo_level(name)?));
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    if cli.surprise {
        return Ok(Box::new(pick_demo(&mut rng)));
    }

    if let Some(dir) = &cli.levels_dir {
        let catalog = Catalog::from_dir(dir).context("reading level directory")?;
        if let Some(path) = catalog.pick_random(&mut rng) {
            return Ok(open_file(path));
        }
        log::warn!("No levels in {}, generating one", dir.display());
    }

    Ok(Box::new(FlameGraphGenerator::new(seed)))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Flame Smash (headless) starting...");

    let seed = cli.seed.unwrap_or_else(clock_seed);

    if let Some(path) = &cli.export {
        let generator = FlameGraphGenerator::new(seed);
        let doc = LevelDocument {
            name: Some(generator.name()),
            rects: generator.generate(),
        };
        std::fs::write(path, doc.to_json()?).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {} rects to {}", doc.rects.len(), path.display());
        return Ok(());
    }

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path).with_context(|| format!("loading settings {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(path) = &cli.best_time {
        settings.best_time_file = Some(path.clone());
    }

    let store: Box<dyn BestTimeStore> = match &settings.best_time_file {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };

    let mut session = Session::new(settings, store);
    let source = pick_source(&cli, seed)?;
    session.load(&*source).context("loading level")?;

    let mut pilot = Autopilot;
    let mut sink = LogRenderSink::new(cli.hud_every);
    for _ in 0..cli.max_frames {
        session.run_frame(&mut pilot, &mut sink, NOMINAL_DT);
        if session.phase() == SessionPhase::Complete {
            break;
        }
    }

    let game = session.game().context("no level running")?;
    match session.phase() {
        SessionPhase::Complete => println!(
            "Level complete: {} blocks in {} (best {})",
            game.total_blocks,
            format_seconds(game.elapsed),
            format_seconds(session.best().value())
        ),
        _ => println!(
            "Out of time after {} frames: {}/{} blocks destroyed",
            sink.frames(),
            game.destroyed_blocks,
            game.total_blocks
        ),
    }

    Ok(())
}
