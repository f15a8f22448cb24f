use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod orbital;
mod report;
mod tle;
mod tracks;
mod visualization;

use config::{Cli, MAX_TRACKS, Mode, RunConfig, prompt_mode};
use orbital::Sgp4Propagator;
use report::{SnapshotReport, track_reports};
use tle::Catalog;
use tracks::{SessionEvent, TrackSession, sample_current_positions};
use visualization::{MapConfig, SelectionRng, TrackWindowSettings};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let run = cli.run_config();

    let catalog = tle::load_catalog(&run.source, run.timeout)?;
    info!(
        "Loaded {} Starlink satellites ({} malformed entries skipped)",
        catalog.len(),
        catalog.rejected()
    );

    let mode = match cli.mode {
        Some(mode) => Mode::from(mode),
        None => {
            let max_tracks = u32::try_from(catalog.len()).unwrap_or(u32::MAX).min(MAX_TRACKS);
            prompt_mode(&mut io::stdin().lock(), &mut io::stdout(), max_tracks)?
        }
    };
    let propagator = Sgp4Propagator::from_catalog(&catalog);

    match mode {
        Mode::Positions => run_positions(&run, catalog, propagator, None),
        Mode::Animate { seconds } => run_positions(&run, catalog, propagator, Some(seconds)),
        Mode::Tracks { count, minutes } => run_tracks(&run, catalog, propagator, count, minutes),
    }
}

fn run_positions(
    run: &RunConfig,
    catalog: Catalog,
    propagator: Sgp4Propagator,
    updates: Option<u32>,
) -> anyhow::Result<()> {
    let snapshot = sample_current_positions(&catalog, &propagator, Utc::now());

    if !run.headless {
        return check_exit(visualization::run_snapshot(
            map_config(run),
            catalog,
            propagator,
            snapshot,
            updates,
        ));
    }

    let mut out = io::stdout().lock();
    print_json(&mut out, &SnapshotReport::new(&catalog, &snapshot))?;
    for _ in 0..updates.unwrap_or(0) {
        thread::sleep(Duration::from_secs(1));
        let snapshot = sample_current_positions(&catalog, &propagator, Utc::now());
        print_json(&mut out, &SnapshotReport::new(&catalog, &snapshot))?;
    }
    Ok(())
}

fn run_tracks(
    run: &RunConfig,
    catalog: Catalog,
    propagator: Sgp4Propagator,
    count: u32,
    minutes: u32,
) -> anyhow::Result<()> {
    let mut rng = match run.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let settings = TrackWindowSettings {
        minutes,
        align_hour: run.align_hour,
    };

    let mut session = TrackSession::new(count as usize);
    session.handle(
        SessionEvent::Init,
        &catalog,
        &propagator,
        &settings.window(Utc::now()),
        &mut rng,
    )?;
    info!("Selected {} of {} satellites", session.count(), catalog.len());
    for selection in session.selections() {
        if let Some(record) = catalog.get(selection.index) {
            info!(
                "Tracking {} (NORAD {}) for {} minutes",
                record.label(),
                record.norad,
                minutes
            );
        }
    }

    if run.headless {
        let mut out = io::stdout().lock();
        return print_json(&mut out, &track_reports(&catalog, session.selections()));
    }
    check_exit(visualization::run_tracks(
        map_config(run),
        catalog,
        propagator,
        session,
        settings,
        SelectionRng(rng),
    ))
}

fn map_config(run: &RunConfig) -> MapConfig {
    MapConfig {
        basemap: run.basemap.clone(),
        ..Default::default()
    }
}

fn print_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value).context("failed to serialize report")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn check_exit(exit: bevy::app::AppExit) -> anyhow::Result<()> {
    if exit.is_error() {
        bail!("renderer exited with {exit:?}");
    }
    Ok(())
}
