use std::{path::PathBuf, time::Duration};

use casement_core::{
    Margins, Rect, SaveInput, SizeAdditions, WindowState, compute_initial_geometry,
    compute_min_size, extend_width, nearest_monitor, reconcile_on_save, scale_position,
};
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    config::ShellContext,
    debounce::DebounceTimer,
    icon::{self, WindowIcon},
    platform::{NativeWindow, TrayActivation, TrayIcon, WindowController},
    settings::{SettingsError, SettingsStore, WorkMode},
};

const DESKTOP_RECT_TTL: Duration = Duration::from_millis(1000);

/// Everything the main window reacts to: toolkit notifications, app-level
/// changes and its own timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Moved,
    Resized,
    StateChanged(WindowState),
    VisibleChanged(bool),
    ActiveChanged,
    TrayActivated(TrayActivation),
    UnreadBadgeChanged(u32),
    WorkModeChanged(WorkMode),
    NativeFrameChanged(bool),
    CustomIconChanged(i32),
    SessionChanged,
    PositionInitialized,
    CloseRequested,
    Quit,
    SavePositionTimer(u64),
    SaveSettingsTimer(u64),
}

pub struct MainWindow<W, S, C> {
    window: W,
    settings: S,
    controller: C,
    context: ShellContext,
    tray: Option<Box<dyn TrayIcon>>,
    position_timer: DebounceTimer<ShellEvent>,
    settings_timer: DebounceTimer<ShellEvent>,
    position_inited: bool,
    is_active: bool,
    maximized_before_hide: bool,
    icon: Option<WindowIcon>,
    using_support_icon: bool,
    icon_custom_id: i32,
    right_column_width: Option<i32>,
    desktop_rect: Option<(Instant, Rect)>,
}

impl<W, S, C> MainWindow<W, S, C>
where
    W: NativeWindow,
    S: SettingsStore,
    C: WindowController,
{
    /// Timer events are delivered through `events`; feed them back into
    /// [`MainWindow::handle_event`].
    pub fn new(
        window: W,
        settings: S,
        controller: C,
        context: ShellContext,
        events: UnboundedSender<ShellEvent>,
    ) -> Self {
        let config = context.config();
        let position_timer = DebounceTimer::new(
            config.save_position_delay(),
            events.clone(),
            ShellEvent::SavePositionTimer,
        );
        let settings_timer = DebounceTimer::new(
            config.save_settings_delay(),
            events,
            ShellEvent::SaveSettingsTimer,
        );
        let icon_custom_id = context.custom_icon_id();
        Self {
            window,
            settings,
            controller,
            context,
            tray: None,
            position_timer,
            settings_timer,
            position_inited: false,
            is_active: false,
            maximized_before_hide: false,
            icon: None,
            using_support_icon: false,
            icon_custom_id,
            right_column_width: None,
            desktop_rect: None,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn context(&self) -> &ShellContext {
        &self.context
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn position_inited(&self) -> bool {
        self.position_inited
    }

    pub fn has_tray_icon(&self) -> bool {
        self.tray.is_some()
    }

    pub fn is_save_pending(&self) -> bool {
        self.position_timer.is_pending()
    }

    pub fn init(&mut self) {
        self.update_window_icon();
        self.refresh_title_widget();
        self.init_geometry();
        self.update_unread_counter();
    }

    pub fn handle_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Moved | ShellEvent::Resized => self.position_updated(),
            ShellEvent::StateChanged(state) => self.handle_state_changed(state),
            ShellEvent::VisibleChanged(visible) => self.handle_visible_changed(visible),
            ShellEvent::ActiveChanged => self.update_is_active(),
            ShellEvent::TrayActivated(reason) => self.handle_tray_activation(reason),
            ShellEvent::UnreadBadgeChanged(count) => {
                self.context.set_unread_badge(count);
                self.update_unread_counter();
            }
            ShellEvent::WorkModeChanged(mode) => self.workmode_updated(mode),
            ShellEvent::NativeFrameChanged(native) => {
                self.settings.set_native_window_frame(native);
                self.save_settings_delayed();
                self.refresh_title_widget();
                self.update_minimum_size();
            }
            ShellEvent::CustomIconChanged(id) => {
                self.context.set_custom_icon_id(id);
                self.update_window_icon();
            }
            ShellEvent::SessionChanged => {
                self.update_window_icon();
                self.update_minimum_size();
            }
            ShellEvent::PositionInitialized => self.set_position_inited(),
            ShellEvent::CloseRequested => {
                self.close_requested();
            }
            ShellEvent::Quit => self.quit(),
            ShellEvent::SavePositionTimer(generation) => {
                if self.position_timer.take_fired(generation) {
                    let state = self.window.window_state();
                    self.save_position(state);
                }
            }
            ShellEvent::SaveSettingsTimer(generation) => {
                if self.settings_timer.take_fired(generation) {
                    self.flush_settings();
                }
            }
        }
    }

    /// Handle everything already queued on `events` without waiting.
    pub fn process_pending(&mut self, events: &mut UnboundedReceiver<ShellEvent>) {
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
        }
    }

    /// Run until the app quits, then write what is still pending.
    pub async fn run(
        &mut self,
        events: &mut UnboundedReceiver<ShellEvent>,
    ) -> Result<(), SettingsError> {
        while !self.context.is_quitting() {
            let Some(event) = events.recv().await else {
                break;
            };
            self.handle_event(event);
        }
        self.shutdown()
    }

    pub fn set_position_inited(&mut self) {
        self.position_inited = true;
    }

    pub fn position_updated(&mut self) {
        self.position_timer.call_once();
    }

    pub fn handle_state_changed(&mut self, state: WindowState) {
        if state == WindowState::Minimized {
            self.controller.update_is_active_blur();
        } else {
            self.controller.update_is_active_focus();
        }
        self.update_is_active();

        if state == WindowState::Minimized && self.settings.work_mode() == WorkMode::TrayOnly {
            self.minimize_to_tray();
        }
        self.save_position(state);
    }

    pub fn handle_visible_changed(&mut self, visible: bool) {
        if visible {
            if self.maximized_before_hide {
                debug!("Window Pos: window was maximized before hiding, setting maximized");
                self.window.set_window_state(WindowState::Maximized);
            }
        } else {
            self.maximized_before_hide = self.settings.window_position().maximized;
        }
        self.update_is_active();
    }

    pub fn update_is_active(&mut self) {
        let is_active = self.compute_is_active();
        if self.is_active != is_active {
            self.is_active = is_active;
            debug!(is_active, "main window activity changed");
            self.controller.active_changed(is_active);
        }
    }

    fn compute_is_active(&self) -> bool {
        self.window.is_active_window()
            && self.window.is_visible()
            && self.window.window_state() != WindowState::Minimized
    }

    /// Hide instead of quitting when the work mode or platform allows it.
    pub fn hide_no_quit(&mut self) -> bool {
        if self.context.is_quitting() {
            return false;
        }
        if self.settings.work_mode().uses_tray() {
            if self.minimize_to_tray() {
                self.controller.show_chats_list();
                return true;
            }
        } else if self.context.config().is_mac {
            self.window.close_without_destroy();
            self.controller.update_is_active_blur();
            self.update_is_active();
            self.controller.show_chats_list();
            return true;
        }
        false
    }

    pub fn minimize_to_tray(&mut self) -> bool {
        if self.context.is_quitting() || self.tray.is_none() {
            return false;
        }
        self.window.close_without_destroy();
        self.controller.update_is_active_blur();
        self.update_is_active();
        if let Some(tray) = self.tray.as_mut() {
            tray.show_tooltip();
        }
        info!("main window minimized to tray");
        true
    }

    /// Returns `true` when the window was hidden instead of closing the app.
    pub fn close_requested(&mut self) -> bool {
        if self.hide_no_quit() {
            return true;
        }
        self.quit();
        false
    }

    pub fn quit(&mut self) {
        info!("quitting");
        self.context.set_quitting(true);
    }

    pub fn show_from_tray(&mut self) {
        self.activate();
        self.update_unread_counter();
    }

    pub fn activate(&mut self) {
        let was_hidden = !self.window.is_visible();
        if self.window.window_state() == WindowState::Minimized {
            let restored = if self.settings.window_position().maximized {
                WindowState::Maximized
            } else {
                WindowState::Normal
            };
            self.window.set_window_state(restored);
        }
        self.window.set_visible(true);
        self.window.raise_and_activate();
        self.controller.update_is_active_focus();
        self.update_is_active();
        if was_hidden {
            self.controller.window_shown();
        }
    }

    pub fn handle_tray_activation(&mut self, reason: TrayActivation) {
        match reason {
            TrayActivation::Trigger if self.window.is_visible() && self.is_active => {
                self.minimize_to_tray();
            }
            TrayActivation::Trigger | TrayActivation::DoubleClick => self.show_from_tray(),
            TrayActivation::Context | TrayActivation::MiddleClick => {
                debug!(?reason, "tray activation left to the tray menu");
            }
        }
    }

    pub fn attach_to_tray_icon(&mut self, mut tray: Box<dyn TrayIcon>) {
        let config = self.context.config();
        let workdir: PathBuf = config.working_dir.components().collect();
        tray.set_tooltip(&format!("{}\n{}", config.app_name, workdir.display()));
        self.tray = Some(tray);
    }

    pub fn detach_tray_icon(&mut self) {
        self.tray = None;
    }

    fn workmode_updated(&mut self, mode: WorkMode) {
        self.settings.set_work_mode(mode);
        self.save_settings_delayed();
        if mode == WorkMode::WindowOnly {
            self.detach_tray_icon();
            if !self.window.is_visible() {
                self.activate();
            }
        }
    }

    pub fn update_unread_counter(&mut self) {
        if self.context.is_quitting() {
            return;
        }
        let app_name = &self.context.config().app_name;
        let title = match self.context.unread_badge() {
            0 => app_name.clone(),
            counter => format!("{app_name} ({counter})"),
        };
        self.window.set_title(&title);
    }

    pub fn update_window_icon(&mut self) {
        let support_icon = self
            .controller
            .session()
            .is_some_and(|session| session.support_mode);
        let custom_id = self.context.custom_icon_id();
        if self.icon.is_none()
            || support_icon != self.using_support_icon
            || custom_id != self.icon_custom_id
        {
            let config = self.context.config();
            let created =
                icon::create_icon(&config.working_dir, &config.assets_dir, custom_id, support_icon);
            match created {
                Ok(icon) => {
                    self.icon = Some(icon);
                    self.using_support_icon = support_icon;
                    self.icon_custom_id = custom_id;
                }
                Err(err) => warn!("window icon unavailable: {}", err),
            }
        }
        if let Some(icon) = self.icon.as_ref() {
            self.window.set_icon(icon);
        }
    }

    fn refresh_title_widget(&mut self) {
        let native =
            self.context.config().native_frame_supported && self.settings.native_window_frame();
        self.window.set_native_frame(native);
    }

    fn size_additions(&self) -> SizeAdditions {
        SizeAdditions {
            filters_width: self
                .controller
                .session()
                .map_or(0, |session| session.filters_width),
            right_column_width: self.right_column_width.unwrap_or(0),
            outdated_bar_height: self.context.config().outdated_bar_height,
        }
    }

    pub fn update_minimum_size(&mut self) {
        let size = compute_min_size(self.context.config().min_size, self.size_additions());
        self.window.set_minimum_size(size);
    }

    fn frame_margins(&self) -> Margins {
        if self.settings.native_window_frame() {
            self.window.frame_margins()
        } else {
            Margins::ZERO
        }
    }

    fn init_geometry(&mut self) {
        self.update_minimum_size();

        let config = self.context.config();
        let saved = self.settings.window_position();
        debug!(
            x = saved.x,
            y = saved.y,
            w = saved.w,
            h = saved.h,
            scale = saved.scale,
            maximized = saved.maximized,
            "Window Pos: initializing first"
        );
        let position = scale_position(saved, config.scale_percent);
        let geometry = compute_initial_geometry(
            position,
            &self.window.monitors(),
            config.initial_size(),
            config.min_size,
            self.frame_margins(),
        );
        debug!(?geometry, "Window Pos: setting first");
        self.window.set_geometry(geometry);
    }

    pub fn save_position(&mut self, state: WindowState) {
        let input = SaveInput {
            body: self.window.body_geometry(),
            state,
            visible: self.window.is_visible(),
            position_inited: self.position_inited,
            right_column_width: self.right_column_width.unwrap_or(0),
        };
        let config = self.context.config();
        let saved = self.settings.window_position();
        if let Some(real) = reconcile_on_save(
            &input,
            &saved,
            &self.window.monitors(),
            config.scale_percent,
            config.min_size,
        ) {
            self.settings.set_window_position(real);
            self.save_settings_delayed();
        }
    }

    fn save_settings_delayed(&mut self) {
        self.settings.save_delayed();
        self.settings_timer.call_once();
    }

    fn flush_settings(&mut self) {
        if let Err(err) = self.settings.flush() {
            warn!("failed to write settings: {}", err);
        }
    }

    /// Write a pending position and any unsaved settings right away.
    pub fn shutdown(&mut self) -> Result<(), SettingsError> {
        if self.position_timer.is_pending() {
            self.position_timer.cancel();
            let state = self.window.window_state();
            self.save_position(state);
        }
        self.settings_timer.cancel();
        self.settings.flush()
    }

    /// Available area of the monitor under the window, refreshed at most once a second.
    pub fn desktop_rect(&mut self) -> Rect {
        let now = Instant::now();
        if let Some((taken, rect)) = self.desktop_rect
            && now < taken + DESKTOP_RECT_TTL
        {
            return rect;
        }
        let body = self.window.body_geometry();
        let rect = nearest_monitor(&self.window.monitors(), body.center())
            .map_or(body, |monitor| monitor.available);
        self.desktop_rect = Some((now, rect));
        rect
    }

    pub fn maximal_extend_by(&mut self) -> i32 {
        let body_width = self.window.body_geometry().w;
        casement_core::maximal_extend_by(self.desktop_rect(), body_width)
    }

    pub fn can_extend_no_move(&mut self, extend_by: i32) -> bool {
        let inner = self.window.body_geometry();
        casement_core::can_extend_no_move(inner, self.desktop_rect(), extend_by)
    }

    pub fn try_extend_width_by(&mut self, add_to_width: i32) -> i32 {
        let desktop = self.desktop_rect();
        let inner = self.window.body_geometry();
        let (extended, added) = extend_width(inner, desktop, add_to_width);
        if extended != inner {
            self.window.set_geometry(extended);
        }
        added
    }

    pub fn right_column_width(&self) -> Option<i32> {
        self.right_column_width
    }

    /// Show (`Some(width)`) or hide (`None`) the right column, widening or
    /// narrowing the window so the chat area keeps its width.
    pub fn show_right_column(&mut self, width: Option<i32>) {
        let was_width = self.window.body_geometry().w;
        let was_right_width = self.right_column_width.unwrap_or(0);
        self.right_column_width = width;
        let now_right_width = width.unwrap_or(0);

        let was_minimum = self.window.minimum_size();
        let now_minimum = compute_min_size(self.context.config().min_size, self.size_additions());
        let first_resize = now_minimum.w < was_minimum.w;
        if first_resize {
            self.window.set_minimum_size(now_minimum);
        }
        if self.window.window_state() != WindowState::Maximized {
            let current_width = self.window.body_geometry().w;
            self.try_extend_width_by(was_width + now_right_width - was_right_width - current_width);
        }
        if !first_resize {
            self.window.set_minimum_size(now_minimum);
        }
    }
}
