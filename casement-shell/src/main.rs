use std::{
    fs,
    path::{Path, PathBuf},
};

use casement_core::{Margins, Monitor, Rect, compute_initial_geometry, scale_position};
use casement_shell::{
    JsonSettingsStore, MainWindow, NativeWindow, SettingsStore, ShellConfig, ShellContext,
    headless::{HeadlessWindow, RecordingController, RecordingTray},
    replay::{ScriptStep, replay},
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "casement")]
struct CliArgs {
    /// JSON file with `ShellConfig` overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Settings file; defaults to `settings.json` in the working dir.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the geometry the main window would open with.
    Place {
        /// JSON array of monitors.
        #[arg(long)]
        monitors: PathBuf,
        /// Override the display scale percent from the config.
        #[arg(long)]
        scale: Option<i32>,
    },
    /// Run a scripted session against a headless window and save the result.
    Replay {
        #[arg(long)]
        monitors: PathBuf,
        /// JSON array of script steps.
        #[arg(long)]
        script: PathBuf,
    },
}

#[derive(Serialize)]
struct PlaceOutput {
    geometry: Rect,
    maximized: bool,
}

#[derive(Serialize)]
struct ReplayOutput<'a> {
    geometry: Rect,
    visible: bool,
    title: &'a str,
    position: casement_core::WindowPosition,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))?;
    serde_json::from_str(&data).map_err(|err| format!("{}: {err}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{out}");
    Ok(())
}

fn place(config: &ShellConfig, settings: &JsonSettingsStore, monitors: &[Monitor]) -> PlaceOutput {
    let saved = settings.window_position();
    let position = scale_position(saved, config.scale_percent);
    let geometry = compute_initial_geometry(
        position,
        monitors,
        config.initial_size(),
        config.min_size,
        Margins::ZERO,
    );
    PlaceOutput {
        geometry,
        maximized: saved.maximized,
    }
}

async fn run(args: CliArgs) -> Result<(), String> {
    let mut config = match args.config.as_ref() {
        Some(path) => ShellConfig::load_from_path(path).map_err(|err| err.to_string())?,
        None => ShellConfig::default(),
    };
    let settings_path = args.settings.unwrap_or_else(|| config.settings_path());
    let settings = JsonSettingsStore::open(&settings_path);

    match args.command {
        Command::Place { monitors, scale } => {
            if let Some(scale) = scale {
                config.scale_percent = scale;
            }
            let monitors: Vec<Monitor> = read_json(&monitors)?;
            print_json(&place(&config, &settings, &monitors))
        }
        Command::Replay { monitors, script } => {
            let monitors: Vec<Monitor> = read_json(&monitors)?;
            let steps: Vec<ScriptStep> = read_json(&script)?;

            let (tx, mut rx) = mpsc::unbounded_channel();
            let window = HeadlessWindow::new(monitors).with_notifier(tx.clone());
            let uses_tray = settings.work_mode().uses_tray();
            let mut main = MainWindow::new(
                window,
                settings,
                RecordingController::default(),
                ShellContext::new(config),
                tx,
            );
            if uses_tray {
                main.attach_to_tray_icon(Box::new(RecordingTray::default()));
            }
            main.init();
            main.activate();
            main.process_pending(&mut rx);

            info!(steps = steps.len(), "replaying session");
            replay(&mut main, &mut rx, &steps)
                .await
                .map_err(|err| err.to_string())?;

            print_json(&ReplayOutput {
                geometry: main.window().geometry(),
                visible: main.window().is_visible(),
                title: main.window().title(),
                position: main.settings().window_position(),
            })
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    if let Err(err) = run(args).await {
        error!("{}", err);
        std::process::exit(1);
    }
}
