//! Seams to the windowing toolkit, the session layer and the tray.

use casement_core::{Margins, Monitor, Rect, Size, WindowState};
use serde::{Deserialize, Serialize};

use crate::icon::WindowIcon;

/// Toolkit handle for the main window.
pub trait NativeWindow {
    fn window_state(&self) -> WindowState;
    fn is_visible(&self) -> bool;
    /// Whether the window has keyboard focus.
    fn is_active_window(&self) -> bool;
    /// Client area (without title bar) in global desktop coordinates.
    fn body_geometry(&self) -> Rect;
    /// Native decoration sizes; only meaningful while the native frame is on.
    fn frame_margins(&self) -> Margins;
    fn monitors(&self) -> Vec<Monitor>;
    fn minimum_size(&self) -> Size;

    fn set_geometry(&mut self, rect: Rect);
    fn set_window_state(&mut self, state: WindowState);
    fn set_visible(&mut self, visible: bool);
    fn raise_and_activate(&mut self);
    /// Hide without tearing down native resources.
    fn close_without_destroy(&mut self);
    fn set_title(&mut self, title: &str);
    fn set_icon(&mut self, icon: &WindowIcon);
    fn set_minimum_size(&mut self, size: Size);
    fn set_native_frame(&mut self, native: bool);
}

/// What the window needs to know about the signed-in session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    pub support_mode: bool,
    pub filters_width: i32,
}

/// Session side of the window: focus bookkeeping and content reactions.
pub trait WindowController {
    fn update_is_active_focus(&mut self);
    fn update_is_active_blur(&mut self);
    fn session(&self) -> Option<SessionInfo>;

    fn show_chats_list(&mut self) {}
    fn window_shown(&mut self) {}
    fn active_changed(&mut self, _active: bool) {}
}

pub trait TrayIcon {
    fn set_tooltip(&mut self, tooltip: &str);
    fn show_tooltip(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrayActivation {
    Trigger,
    DoubleClick,
    Context,
    MiddleClick,
}
