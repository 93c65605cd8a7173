use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use casement_core::WindowPosition;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// `settings.json` is expected to be tiny.
pub const MAX_SETTINGS_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    #[default]
    WindowAndTray,
    TrayOnly,
    WindowOnly,
}

impl WorkMode {
    pub fn uses_tray(self) -> bool {
        matches!(self, WorkMode::WindowAndTray | WorkMode::TrayOnly)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub window_position: WindowPosition,
    pub work_mode: WorkMode,
    pub native_window_frame: bool,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("metadata read failed: {0}")]
    Metadata(#[source] io::Error),
    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("parse failed: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("serialize failed: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("tmp write failed: {0}")]
    WriteTmp(#[source] io::Error),
    #[error("rename failed: {0}")]
    Rename(#[source] io::Error),
}

/// Where the main window keeps what it remembers between runs.
pub trait SettingsStore {
    fn window_position(&self) -> WindowPosition;
    fn set_window_position(&mut self, position: WindowPosition);
    fn work_mode(&self) -> WorkMode;
    fn set_work_mode(&mut self, mode: WorkMode);
    fn native_window_frame(&self) -> bool;
    fn set_native_window_frame(&mut self, native: bool);
    /// Mark settings for writing at the next [`SettingsStore::flush`].
    fn save_delayed(&mut self);
    fn flush(&mut self) -> Result<(), SettingsError>;
}

pub fn parse_settings_json(data: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str::<Settings>(data)
}

pub fn load_settings_from_path(path: &Path) -> Result<Settings, SettingsError> {
    let meta = fs::metadata(path).map_err(SettingsError::Metadata)?;
    if meta.len() > MAX_SETTINGS_BYTES {
        return Err(SettingsError::TooLarge {
            size: meta.len(),
            max: MAX_SETTINGS_BYTES,
        });
    }

    let data = fs::read_to_string(path).map_err(SettingsError::Read)?;
    parse_settings_json(&data).map_err(SettingsError::Parse)
}

pub fn save_settings_to_path(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let tmp = path.with_extension("json.tmp");
    let payload = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
    fs::write(&tmp, payload.as_bytes()).map_err(SettingsError::WriteTmp)?;

    if path.exists() {
        let _ = fs::remove_file(path);
    }

    fs::rename(&tmp, path).map_err(SettingsError::Rename)?;
    Ok(())
}

pub fn save_settings_with_retry(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    const MAX_ATTEMPTS: u32 = 3;
    const BACKOFF_BASE_MS: u64 = 50;

    let mut attempt = 1;
    loop {
        match save_settings_to_path(path, settings) {
            Ok(()) => return Ok(()),
            Err(err) if attempt >= MAX_ATTEMPTS => return Err(err),
            Err(err) => {
                warn!(attempt, "settings save failed, retrying: {}", err);
                let backoff_ms = BACKOFF_BASE_MS.saturating_mul(1_u64 << (attempt - 1));
                std::thread::sleep(Duration::from_millis(backoff_ms));
                attempt += 1;
            }
        }
    }
}

/// JSON file backed [`SettingsStore`].
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    settings: Settings,
    dirty: bool,
}

impl JsonSettingsStore {
    /// Load `path`, starting from defaults when it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match load_settings_from_path(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Metadata(err)) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file yet");
                Settings::default()
            }
            Err(err) => {
                warn!(path = %path.display(), "settings ignored: {}", err);
                Settings::default()
            }
        };
        Self {
            path,
            settings,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl SettingsStore for JsonSettingsStore {
    fn window_position(&self) -> WindowPosition {
        self.settings.window_position
    }

    fn set_window_position(&mut self, position: WindowPosition) {
        self.settings.window_position = position;
    }

    fn work_mode(&self) -> WorkMode {
        self.settings.work_mode
    }

    fn set_work_mode(&mut self, mode: WorkMode) {
        self.settings.work_mode = mode;
    }

    fn native_window_frame(&self) -> bool {
        self.settings.native_window_frame
    }

    fn set_native_window_frame(&mut self, native: bool) {
        self.settings.native_window_frame = native;
    }

    fn save_delayed(&mut self) {
        self.dirty = true;
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        if !self.dirty {
            return Ok(());
        }
        save_settings_with_retry(&self.path, &self.settings)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}
