use std::io::Write;

use casement_core::WindowPosition;
use casement_shell::{
    JsonSettingsStore, SettingsStore, WorkMode,
    settings::{MAX_SETTINGS_BYTES, load_settings_from_path},
};

#[test]
fn load_settings_rejects_oversized_file() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.json");

    let mut file = std::fs::File::create(&path).expect("create settings.json");
    file.write_all(&vec![b' '; (MAX_SETTINGS_BYTES as usize) + 1024])
        .expect("write oversized settings.json");
    drop(file);

    let err = load_settings_from_path(&path).expect_err("oversized file should error");
    let msg = err.to_string();
    assert!(msg.contains("too large"), "unexpected error: {msg}");
}

#[test]
fn flushed_settings_survive_reopen() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.json");
    let position = WindowPosition {
        x: 40,
        y: 30,
        w: 900,
        h: 700,
        scale: 125,
        maximized: false,
        monitor_checksum: 0x1234_5678,
    };

    let mut store = JsonSettingsStore::open(&path);
    store.set_window_position(position);
    store.set_work_mode(WorkMode::TrayOnly);
    store.save_delayed();
    assert!(store.is_dirty());
    store.flush().expect("flush settings");
    assert!(!store.is_dirty());
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = JsonSettingsStore::open(&path);
    assert_eq!(reopened.window_position(), position);
    assert_eq!(reopened.work_mode(), WorkMode::TrayOnly);
    assert!(!reopened.native_window_frame());
}

#[test]
fn corrupt_settings_fall_back_to_defaults() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ \"window_position\": ").expect("write corrupt settings");

    let store = JsonSettingsStore::open(&path);
    assert_eq!(store.window_position(), WindowPosition::default());
    assert_eq!(store.work_mode(), WorkMode::WindowAndTray);
    assert!(!store.is_dirty());
}

#[test]
fn older_records_without_new_fields_still_load() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"window_position": {"x": 10, "y": 20, "w": 800, "h": 600}}"#,
    )
    .expect("write settings");

    let settings = load_settings_from_path(&path).expect("load settings");
    assert_eq!(settings.window_position.scale, 0);
    assert_eq!(settings.window_position.monitor_checksum, 0);
    assert_eq!(settings.window_position.w, 800);
}
