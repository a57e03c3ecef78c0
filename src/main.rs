// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use arcd::config::{validate_settings_file, CatalogFile, PlayerSettings, SettingsWatcher};
use arcd::media::SimulatedMedia;
use arcd::player::{PlaybackController, PlayerCommand, PlayerView};
use arcd::stage::SimulatedStage;
use arcd::tracking::{SimulatedCamera, TargetStatus, TrackingBridge};
use arcd::App;

/// Clip length used when a catalog entry gives none
const DEFAULT_CLIP_LENGTH: f64 = 30.0;

/// Seconds of simulated camera activity in the demo
const DEMO_DURATION: f64 = 16.0;

const DEMO_CATALOG: &str = r#"
songs:
  - name: "Moonlight Shuffle"
    vocal: "audio/moonlight_vocal"
    accompaniment: "audio/moonlight_backing"
    video: "video/moonlight"
    character: "models/idol"
    animation: "Hip Hop Dancing"
    background: "materials/stars"
    length: 6.0
  - name: "Sunrise Stomp"
    vocal: "audio/sunrise_vocal"
    accompaniment: "audio/sunrise_backing"
    video: "video/sunrise"
    character: "models/robot"
    animation: "Robot Dance"
    length: 5.0
  - name: "Lantern Waltz"
    vocal: "audio/lantern_vocal"
    accompaniment: "audio/lantern_backing"
    character: "models/idol"
    animation: "Waltz"
    length: 8.0
"#;

fn print_usage() {
    println!("ARCD - Marker-Triggered Karaoke Player");
    println!();
    println!("Usage: arcd [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --catalog <FILE>    Song catalog (YAML); a built-in catalog is used if omitted");
    println!("  --settings <FILE>   Player settings (TOML); reloaded when the file changes");
    println!("  --validate <FILE>   Validate a catalog (.yaml) or settings (.toml) file and exit");
    println!("  --demo              Run a headless session against a simulated camera");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
}

#[derive(Debug, Default)]
struct Options {
    catalog: Option<PathBuf>,
    settings: Option<PathBuf>,
    validate: Option<PathBuf>,
    demo: bool,
    verbose: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => {
                let path = iter.next().ok_or_else(|| anyhow!("--catalog requires a file"))?;
                options.catalog = Some(PathBuf::from(path));
            }
            "--settings" => {
                let path = iter.next().ok_or_else(|| anyhow!("--settings requires a file"))?;
                options.settings = Some(PathBuf::from(path));
            }
            "--validate" => {
                let path = iter.next().ok_or_else(|| anyhow!("--validate requires a file"))?;
                options.validate = Some(PathBuf::from(path));
            }
            "--demo" => options.demo = true,
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => options.help = true,
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
    }

    Ok(options)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info,arcd=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn validate_file(path: &Path) -> Result<()> {
    let is_settings = path.extension().map(|ext| ext == "toml").unwrap_or(false);
    if is_settings {
        let settings = validate_settings_file(path)?;
        println!("{:?}: OK", path);
        println!("  resume from last position: {}", settings.resume_from_last_position);
        println!("  initial volume: {:.2}", settings.initial_volume);
        println!("  drift tolerance: {:.3}s", settings.drift_tolerance);
        println!("  end margin: {:.3}s", settings.end_margin);
        println!("  frame rate: {}", settings.frame_rate);
    } else {
        let catalog = CatalogFile::load(path)?.into_catalog()?;
        println!("{:?}: OK ({} songs)", path, catalog.len());
        for label in catalog.labels() {
            println!("  {}", label);
        }
    }
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<CatalogFile> {
    match path {
        Some(path) => CatalogFile::load(path),
        None => CatalogFile::from_yaml(DEMO_CATALOG).context("Built-in catalog is invalid"),
    }
}

fn load_settings(path: Option<&Path>) -> Result<PlayerSettings> {
    match path {
        Some(path) => PlayerSettings::load(path),
        None => Ok(PlayerSettings::default()),
    }
}

/// Scripted camera: the marker comes and goes, with noisy status bursts
async fn run_camera(camera: SimulatedCamera) {
    let script = [
        (0.5, TargetStatus::Limited),
        (1.0, TargetStatus::Tracked),
        (4.0, TargetStatus::NoPose),
        (5.5, TargetStatus::ExtendedTracked),
        (11.0, TargetStatus::Limited),
        (12.5, TargetStatus::Tracked),
    ];

    let mut now = 0.0;
    for (index, (at, status)) in script.into_iter().enumerate() {
        tokio::time::sleep(Duration::from_secs_f64(at - now)).await;
        now = at;
        debug!("Camera reports {:?}", status);
        camera.emit(status);
        if status.is_tracked() {
            camera.emit_jitter(30, index as u64);
        }
    }
}

/// Scripted catalog UI input, keyed by demo time
fn scripted_command(previous: f64, now: f64) -> Option<PlayerCommand> {
    let script = [
        (2.0, PlayerCommand::ToggleMode),
        (3.0, PlayerCommand::ToggleMode),
        (4.5, PlayerCommand::Next),
        (6.5, PlayerCommand::TogglePlayPause),
        (7.5, PlayerCommand::TogglePlayPause),
        (8.0, PlayerCommand::SetVolume(0.5)),
        (14.0, PlayerCommand::Previous),
    ];
    script
        .into_iter()
        .find(|(at, _)| *at > previous && *at <= now)
        .map(|(_, command)| command)
}

fn log_view(view: &PlayerView) {
    info!(
        "[{}] {} {} / {} ({:.0}%) [{}] mode={} volume={}% [{}]{}",
        if view.is_tracking_active { "tracked" } else { "lost" },
        view.current_song_name,
        view.current_time,
        view.total_time,
        view.progress_fraction * 100.0,
        view.play_pause_label(),
        view.mode_label(),
        view.volume_percent,
        view.mute_label(),
        view.notice.as_deref().map(|n| format!(" ({})", n)).unwrap_or_default()
    );
}

async fn run_demo(options: &Options) -> Result<()> {
    let catalog_file = load_catalog(options.catalog.as_deref())?;
    let settings = load_settings(options.settings.as_deref())?;

    let library = Arc::new(catalog_file.clip_lengths(DEFAULT_CLIP_LENGTH));
    let catalog = catalog_file.into_catalog()?;
    info!("Catalog: {}", catalog.labels().join(", "));

    let (engine, media) = SimulatedMedia::engine(library);
    let stage = SimulatedStage::new();
    let controller = PlaybackController::new(catalog, engine, Box::new(stage.clone()), &settings);

    let camera = SimulatedCamera::new();
    let bridge = TrackingBridge::new(Arc::new(camera.clone()));
    let mut app = App::new(bridge, controller);

    if let Some(path) = options.settings.as_deref() {
        match SettingsWatcher::new(path, None) {
            Ok(watcher) => app = app.with_watcher(watcher),
            Err(e) => warn!("Settings will not be hot-reloaded: {:#}", e),
        }
    }

    let camera_task = tokio::spawn(run_camera(camera));

    let frame_rate = settings.frame_rate.max(1);
    let dt = 1.0 / f64::from(frame_rate);
    let mut interval = tokio::time::interval(Duration::from_secs_f64(dt));
    let mut elapsed = 0.0;
    let mut last_view: Option<PlayerView> = None;
    let mut last_report = 0.0;

    info!("Demo running at {} fps; press Ctrl+C to stop", frame_rate);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }

        let previous = elapsed;
        elapsed += dt;

        media.advance(dt);
        if let Some(command) = scripted_command(previous, elapsed) {
            info!("UI: {:?}", command);
            if let Err(e) = app.command(command) {
                debug!("Refused: {}", e);
            }
        }
        app.frame(dt);

        let view = app.view();
        let changed = last_view
            .as_ref()
            .map(|last| {
                last.current_song_name != view.current_song_name
                    || last.is_playing != view.is_playing
                    || last.is_tracking_active != view.is_tracking_active
                    || last.is_vocal_mode != view.is_vocal_mode
            })
            .unwrap_or(true);
        if changed || elapsed - last_report >= 1.0 {
            log_view(&view);
            last_report = elapsed;
        }
        last_view = Some(view);

        if elapsed >= DEMO_DURATION {
            break;
        }
    }

    camera_task.abort();

    let controller = app.controller();
    info!(
        "Demo finished after {} frames: {} drift corrections, {} collapsed tracking flickers, \
         {} characters spawned, disc at {:.0} degrees",
        app.frames(),
        controller.engine().corrections(),
        app.bridge().collapsed(),
        stage.spawn_count(),
        controller.disc_angle()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if options.help {
        print_usage();
        return Ok(());
    }

    init_logging(options.verbose);

    if let Some(path) = options.validate.as_deref() {
        return validate_file(path);
    }

    if options.demo {
        return run_demo(&options).await;
    }

    if args.len() < 2 {
        println!("ARCD - Marker-Triggered Karaoke Player");
        println!("Run with --help for usage information");
        return Ok(());
    }

    // Without --demo, check the given files and report what would be played
    let catalog = load_catalog(options.catalog.as_deref())?.into_catalog()?;
    let settings = load_settings(options.settings.as_deref())?;
    println!(
        "{} songs loaded; resume from last position: {}",
        catalog.len(),
        settings.resume_from_last_position
    );
    println!("Run with --demo to play them against a simulated camera");
    Ok(())
}
