use std::time::Duration;

use casement_core::{Monitor, WindowState};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::{
    headless::HeadlessWindow,
    platform::{NativeWindow, TrayActivation, WindowController},
    settings::{SettingsError, SettingsStore, WorkMode},
    window::{MainWindow, ShellEvent},
};

/// One user or system action in a scripted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    Move { x: i32, y: i32 },
    Resize { w: i32, h: i32 },
    State { state: WindowState },
    Visible { visible: bool },
    Focus { active: bool },
    Monitors { monitors: Vec<Monitor> },
    PositionInitialized,
    Tray { activation: TrayActivation },
    Unread { count: u32 },
    WorkMode { mode: WorkMode },
    NativeFrame { enabled: bool },
    RightColumn { width: Option<i32> },
    Close,
    /// Let timers run for `ms` milliseconds.
    Wait { ms: u64 },
}

/// Play `steps` against a headless window, then shut down.
///
/// The window must have been built with a notifier feeding `events`.
pub async fn replay<S, C>(
    main: &mut MainWindow<HeadlessWindow, S, C>,
    events: &mut UnboundedReceiver<ShellEvent>,
    steps: &[ScriptStep],
) -> Result<(), SettingsError>
where
    S: SettingsStore,
    C: WindowController,
{
    for step in steps {
        debug!(?step, "replay step");
        match step {
            ScriptStep::Move { x, y } => main.window_mut().move_to(*x, *y),
            ScriptStep::Resize { w, h } => main.window_mut().resize(*w, *h),
            ScriptStep::State { state } => main.window_mut().set_window_state(*state),
            ScriptStep::Visible { visible } => main.window_mut().set_visible(*visible),
            ScriptStep::Focus { active } => main.window_mut().set_active(*active),
            ScriptStep::Monitors { monitors } => main.window_mut().set_monitors(monitors.clone()),
            ScriptStep::PositionInitialized => main.handle_event(ShellEvent::PositionInitialized),
            ScriptStep::Tray { activation } => {
                main.handle_event(ShellEvent::TrayActivated(*activation));
            }
            ScriptStep::Unread { count } => {
                main.handle_event(ShellEvent::UnreadBadgeChanged(*count));
            }
            ScriptStep::WorkMode { mode } => main.handle_event(ShellEvent::WorkModeChanged(*mode)),
            ScriptStep::NativeFrame { enabled } => {
                main.handle_event(ShellEvent::NativeFrameChanged(*enabled));
            }
            ScriptStep::RightColumn { width } => main.show_right_column(*width),
            ScriptStep::Close => main.handle_event(ShellEvent::CloseRequested),
            ScriptStep::Wait { ms } => run_for(main, events, Duration::from_millis(*ms)).await,
        }
        main.process_pending(events);
        if main.context().is_quitting() {
            break;
        }
    }
    main.shutdown()
}

/// Handle events, including timer firings, for `duration`.
pub async fn run_for<W, S, C>(
    main: &mut MainWindow<W, S, C>,
    events: &mut UnboundedReceiver<ShellEvent>,
    duration: Duration,
) where
    W: NativeWindow,
    S: SettingsStore,
    C: WindowController,
{
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = events.recv() => match event {
                Some(event) => main.handle_event(event),
                None => break,
            },
        }
    }
}
