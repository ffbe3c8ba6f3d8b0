use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lanewatch::{Session, TextReport, format_bars, parse_script};
use lanewatch_config::Settings;
use lanewatch_display::SessionClock;
use lanewatch_input::{SessionMessage, event_queue};
use lanewatch_timing::{CyclePartitioner, CycleSample, PartitionerConfig};

#[derive(Parser, Debug)]
#[command(name = "lanewatch", about = "Keylock, repeat and skip monitor for lane-based play")]
struct Args {
    /// Log per-event decisions.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an event script and print mistakes and timing bars.
    Replay {
        /// Script with one `<time_ms> <down|up> <code>` entry per line.
        script: PathBuf,

        /// Settings JSON file; defaults are used when omitted.
        #[arg(long, env = "LANEWATCH_SETTINGS")]
        settings: Option<PathBuf>,
    },
    /// Print the timing bars of one rotation given as JSON (`pressMs`, `holdMs`).
    Bars {
        sample: PathBuf,

        #[arg(long, env = "LANEWATCH_SETTINGS")]
        settings: Option<PathBuf>,
    },
    /// Write default settings to a file.
    InitSettings {
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::read(path),
        None => Ok(Settings::default()),
    }
}

fn replay(script: &Path, settings: Option<&Path>) -> Result<()> {
    let settings = load_settings(settings)?;
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("reading script {}", script.display()))?;

    let mut session = Session::new(&settings, SessionClock::starting_now(0))?;
    let messages = parse_script(&text, session.bindings())
        .with_context(|| format!("parsing script {}", script.display()))?;

    let (tx, rx) = event_queue();
    for message in messages {
        tx.send(message);
    }
    tx.send(SessionMessage::Shutdown);

    let mut report = TextReport::new(io::stdout().lock());
    let processed = session.run(&rx, &mut report);
    let (mistakes, rotations) = (report.mistakes(), report.rotations());
    report.finish().context("writing report")?;
    log::info!("{processed} events, {mistakes} mistakes, {rotations} rotations");
    Ok(())
}

fn bars(sample: &Path, settings: Option<&Path>) -> Result<()> {
    let mut settings = load_settings(settings)?;
    let data = std::fs::read_to_string(sample)
        .with_context(|| format!("reading sample {}", sample.display()))?;
    let sample: CycleSample = serde_json::from_str(&data)
        .with_context(|| format!("parsing sample {}", sample.display()))?;
    if sample.lane_count() != settings.lane_count {
        log::info!(
            "sample has {} lanes, settings {}; using sample lane count",
            sample.lane_count(),
            settings.lane_count
        );
        settings.lane_count = sample.lane_count();
        settings.validate();
    }
    if settings.lane_count != sample.lane_count() {
        bail!("samples with {} lanes are not supported", sample.lane_count());
    }
    let partitioner = CyclePartitioner::new(PartitionerConfig::new(settings.colours.clone()));
    println!("{}", format_bars(&partitioner.partition(&sample)));
    Ok(())
}

fn init_settings(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Settings::default().write(path)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Command::Replay { script, settings } => replay(&script, settings.as_deref()),
        Command::Bars { sample, settings } => bars(&sample, settings.as_deref()),
        Command::InitSettings { path, force } => init_settings(&path, force),
    }
}
