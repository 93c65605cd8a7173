use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use casement_core::{SAVE_WINDOW_POSITION_TIMEOUT_MS, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_WIDTH: i32 = 380;
pub const MIN_HEIGHT: i32 = 480;
pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 600;
pub const BIG_DEFAULT_WIDTH: i32 = 1280;
pub const BIG_DEFAULT_HEIGHT: i32 = 800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static configuration of the main window shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    pub app_name: String,
    pub working_dir: PathBuf,
    /// Directory holding `logo_256*.png`.
    pub assets_dir: PathBuf,
    /// Display scale in percent.
    pub scale_percent: i32,
    /// Logo variant, `0` for the default one.
    pub custom_icon_id: i32,
    pub native_frame_supported: bool,
    pub third_column_by_default: bool,
    pub is_mac: bool,
    pub min_size: Size,
    pub default_size: Size,
    pub big_default_size: Size,
    pub outdated_bar_height: i32,
    pub save_position_delay_ms: u64,
    pub save_settings_delay_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_name: "Casement".to_owned(),
            working_dir: PathBuf::from("."),
            assets_dir: PathBuf::from("assets"),
            scale_percent: 100,
            custom_icon_id: 0,
            native_frame_supported: true,
            third_column_by_default: false,
            is_mac: cfg!(target_os = "macos"),
            min_size: Size::new(MIN_WIDTH, MIN_HEIGHT),
            default_size: Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            big_default_size: Size::new(BIG_DEFAULT_WIDTH, BIG_DEFAULT_HEIGHT),
            outdated_bar_height: 0,
            save_position_delay_ms: SAVE_WINDOW_POSITION_TIMEOUT_MS,
            save_settings_delay_ms: 1000,
        }
    }
}

impl ShellConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Size used when there is no usable saved position.
    pub fn initial_size(&self) -> Size {
        if self.third_column_by_default {
            self.big_default_size
        } else {
            self.default_size
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.working_dir.join("settings.json")
    }

    pub fn save_position_delay(&self) -> Duration {
        Duration::from_millis(self.save_position_delay_ms)
    }

    pub fn save_settings_delay(&self) -> Duration {
        Duration::from_millis(self.save_settings_delay_ms)
    }
}

/// Process-wide state the window reads: passed in rather than kept in globals.
#[derive(Debug, Clone)]
pub struct ShellContext {
    config: ShellConfig,
    custom_icon_id: i32,
    quitting: bool,
    unread_badge: u32,
}

impl ShellContext {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            custom_icon_id: config.custom_icon_id,
            config,
            quitting: false,
            unread_badge: 0,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn custom_icon_id(&self) -> i32 {
        self.custom_icon_id
    }

    pub fn set_custom_icon_id(&mut self, id: i32) {
        self.custom_icon_id = id;
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn set_quitting(&mut self, quitting: bool) {
        self.quitting = quitting;
    }

    pub fn unread_badge(&self) -> u32 {
        self.unread_badge
    }

    pub fn set_unread_badge(&mut self, count: u32) {
        self.unread_badge = count;
    }
}
