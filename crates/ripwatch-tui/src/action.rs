//! Every state change in the UI goes through an `Action`.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use ripwatch_core::{Alert, EjectOutcome, LoadOutcome, PollEvent, RestartOutcome, SaveOutcome};

/// An operation that needs a y/n confirmation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Eject,
    SaveAndRestart,
}

impl ConfirmAction {
    /// Translation key of the question shown in the dialog.
    pub fn message_key(self) -> &'static str {
        match self {
            Self::Eject => "msg_eject_confirm",
            Self::SaveAndRestart => "msg_restart_confirm",
        }
    }
}

/// Log panel scroll requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up(usize),
    Down(usize),
    /// One viewport up.
    PageUp,
    /// One viewport down.
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data ──
    Poll(PollEvent),

    // ── Navigation ──
    OpenSettings,
    CloseSettings,

    // ── Status screen ──
    EjectDone(EjectOutcome),
    CycleLanguage,
    ToggleLogs,
    ClearLogs,
    ToggleAutoScroll,
    ScrollLogs(Scroll),

    // ── Settings screen ──
    ReloadConfig,
    ConfigLoaded(LoadOutcome),
    Saved(SaveOutcome),
    SaveAndRestart,
    /// The configuration was written; the restart request follows.
    RestartPending,
    Restarted(RestartOutcome),

    // ── Dialogs and alerts ──
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    Notify(Alert),
    DismissNotification,
}

/// Dispatch `action` once `delay` has passed.
pub fn send_after(tx: &UnboundedSender<Action>, delay: Duration, action: Action) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(action);
    });
}
