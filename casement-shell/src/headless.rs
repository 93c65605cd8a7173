//! In-memory backend: a window that only records what it was told, plus
//! session and tray stand-ins. Used by the `replay` command and by tests.

use std::{cell::RefCell, rc::Rc};

use casement_core::{Margins, Monitor, Rect, Size, WindowPosition, WindowState};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    icon::WindowIcon,
    platform::{NativeWindow, SessionInfo, TrayIcon, WindowController},
    settings::{SettingsError, SettingsStore, WorkMode},
    window::ShellEvent,
};

/// Window that emits the notifications a real toolkit would.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    monitors: Vec<Monitor>,
    geometry: Rect,
    frame: Margins,
    state: WindowState,
    visible: bool,
    active: bool,
    title: String,
    icon_sizes: Vec<u32>,
    icon_updates: usize,
    minimum_size: Size,
    native_frame: bool,
    raise_count: usize,
    notifier: Option<UnboundedSender<ShellEvent>>,
}

impl HeadlessWindow {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors,
            ..Self::default()
        }
    }

    /// Send toolkit notifications (move, resize, state, visibility, focus) to `tx`.
    #[must_use]
    pub fn with_notifier(mut self, tx: UnboundedSender<ShellEvent>) -> Self {
        self.notifier = Some(tx);
        self
    }

    #[must_use]
    pub fn with_frame(mut self, frame: Margins) -> Self {
        self.frame = frame;
        self
    }

    fn notify(&self, event: ShellEvent) {
        if let Some(tx) = self.notifier.as_ref() {
            let _ = tx.send(event);
        }
    }

    pub fn set_monitors(&mut self, monitors: Vec<Monitor>) {
        self.monitors = monitors;
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.set_geometry(Rect::new(x, y, self.geometry.w, self.geometry.h));
    }

    pub fn resize(&mut self, w: i32, h: i32) {
        self.set_geometry(Rect::new(self.geometry.x, self.geometry.y, w, h));
    }

    /// Focus change coming from the user, not from the app.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.notify(ShellEvent::ActiveChanged);
        }
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_sizes(&self) -> &[u32] {
        &self.icon_sizes
    }

    pub fn icon_updates(&self) -> usize {
        self.icon_updates
    }

    pub fn native_frame(&self) -> bool {
        self.native_frame
    }

    pub fn raise_count(&self) -> usize {
        self.raise_count
    }
}

impl NativeWindow for HeadlessWindow {
    fn window_state(&self) -> WindowState {
        self.state
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_active_window(&self) -> bool {
        self.active
    }

    fn body_geometry(&self) -> Rect {
        self.geometry
    }

    fn frame_margins(&self) -> Margins {
        self.frame
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.monitors.clone()
    }

    fn minimum_size(&self) -> Size {
        self.minimum_size
    }

    fn set_geometry(&mut self, rect: Rect) {
        let old = self.geometry;
        self.geometry = rect;
        if old.origin() != rect.origin() {
            self.notify(ShellEvent::Moved);
        }
        if old.size() != rect.size() {
            self.notify(ShellEvent::Resized);
        }
    }

    fn set_window_state(&mut self, state: WindowState) {
        if self.state != state {
            self.state = state;
            self.notify(ShellEvent::StateChanged(state));
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            if !visible {
                self.set_active(false);
            }
            self.notify(ShellEvent::VisibleChanged(visible));
        }
    }

    fn raise_and_activate(&mut self) {
        self.raise_count += 1;
        self.set_active(true);
    }

    fn close_without_destroy(&mut self) {
        self.set_visible(false);
    }

    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    fn set_icon(&mut self, icon: &WindowIcon) {
        self.icon_sizes = icon.sizes();
        self.icon_updates += 1;
    }

    fn set_minimum_size(&mut self, size: Size) {
        self.minimum_size = size;
    }

    fn set_native_frame(&mut self, native: bool) {
        self.native_frame = native;
    }
}

/// Controller that counts what the window asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingController {
    pub session: Option<SessionInfo>,
    pub focus_updates: usize,
    pub blur_updates: usize,
    pub chats_list_shown: usize,
    pub windows_shown: usize,
    pub active_changes: Vec<bool>,
}

impl WindowController for RecordingController {
    fn update_is_active_focus(&mut self) {
        self.focus_updates += 1;
    }

    fn update_is_active_blur(&mut self) {
        self.blur_updates += 1;
    }

    fn session(&self) -> Option<SessionInfo> {
        self.session
    }

    fn show_chats_list(&mut self) {
        self.chats_list_shown += 1;
    }

    fn window_shown(&mut self) {
        self.windows_shown += 1;
    }

    fn active_changed(&mut self, active: bool) {
        self.active_changes.push(active);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrayLog {
    pub tooltip: String,
    pub tooltips_shown: usize,
}

/// Tray whose log stays readable after the window takes ownership of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingTray {
    log: Rc<RefCell<TrayLog>>,
}

impl RecordingTray {
    pub fn log(&self) -> TrayLog {
        self.log.borrow().clone()
    }
}

impl TrayIcon for RecordingTray {
    fn set_tooltip(&mut self, tooltip: &str) {
        tooltip.clone_into(&mut self.log.borrow_mut().tooltip);
    }

    fn show_tooltip(&mut self) {
        self.log.borrow_mut().tooltips_shown += 1;
    }
}

/// Settings kept in memory, counting writes.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    pub position: WindowPosition,
    pub work_mode: WorkMode,
    pub native_window_frame: bool,
    pub position_writes: usize,
    pub save_requests: usize,
    pub flushes: usize,
    pub dirty: bool,
}

impl MemorySettingsStore {
    pub fn with_position(position: WindowPosition) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn window_position(&self) -> WindowPosition {
        self.position
    }

    fn set_window_position(&mut self, position: WindowPosition) {
        self.position = position;
        self.position_writes += 1;
    }

    fn work_mode(&self) -> WorkMode {
        self.work_mode
    }

    fn set_work_mode(&mut self, mode: WorkMode) {
        self.work_mode = mode;
    }

    fn native_window_frame(&self) -> bool {
        self.native_window_frame
    }

    fn set_native_window_frame(&mut self, native: bool) {
        self.native_window_frame = native;
    }

    fn save_delayed(&mut self) {
        self.save_requests += 1;
        self.dirty = true;
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        if self.dirty {
            self.dirty = false;
            self.flushes += 1;
        }
        Ok(())
    }
}
