//! Main window lifecycle: placement on startup, debounced position saving,
//! tray minimization, icon and title upkeep.

pub mod config;
pub mod debounce;
pub mod headless;
pub mod icon;
pub mod platform;
pub mod replay;
pub mod settings;
pub mod window;

pub use config::{ConfigError, ShellConfig, ShellContext};
pub use platform::{NativeWindow, SessionInfo, TrayActivation, TrayIcon, WindowController};
pub use settings::{JsonSettingsStore, Settings, SettingsError, SettingsStore, WorkMode};
pub use window::{MainWindow, ShellEvent};
