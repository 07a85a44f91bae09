// ── Operator actions ──
//
// Things the operator triggers from the status screen. Network actions
// are async and return an outcome that the UI loop turns into an `Alert`
// with the translator it owns.

use std::time::Duration;

use ripwatch_api::RipperClient;
use strum::Display;
use tracing::{info, warn};

use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::i18n::Translator;

/// How long an alert stays on screen unless configured otherwise.
pub const ALERT_LIFETIME: Duration = Duration::from_secs(5);

// ── Alerts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Warning,
    Error,
    Info,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Info,
            message: message.into(),
        }
    }

    /// `"{localized framing}: {detail}"`.
    pub(crate) fn framed(level: AlertLevel, framing: &str, detail: &str) -> Self {
        Self {
            level,
            message: format!("{framing}: {detail}"),
        }
    }
}

// ── Eject ───────────────────────────────────────────────────────────

/// Result of an eject request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EjectOutcome {
    Ejected,
    Failed { detail: String },
}

impl EjectOutcome {
    pub fn alert(&self, t: &Translator) -> Alert {
        match self {
            Self::Ejected => Alert::success(t.t("msg_eject_success")),
            Self::Failed { detail } => {
                Alert::framed(AlertLevel::Error, &t.t("msg_eject_error"), detail)
            }
        }
    }
}

/// Ask the service to eject the disc. The caller obtains confirmation
/// first. Never fails: transport and service errors become `Failed`.
pub async fn eject(client: &RipperClient) -> EjectOutcome {
    match client.eject().await {
        Ok(()) => {
            info!("disc ejected");
            EjectOutcome::Ejected
        }
        Err(e) => {
            let e = CoreError::from(e);
            warn!(error = %e, "eject failed");
            EjectOutcome::Failed { detail: e.detail() }
        }
    }
}

// ── Log panel and language ──────────────────────────────────────────

impl Dashboard {
    /// Expand or collapse the log panel; returns the indicator glyph.
    pub fn toggle_log_panel(&mut self) -> &'static str {
        self.logs_expanded = !self.logs_expanded;
        self.log_panel_indicator()
    }

    /// `▼` while expanded, `▶` while collapsed.
    pub fn log_panel_indicator(&self) -> &'static str {
        if self.logs_expanded { "▼" } else { "▶" }
    }

    /// Replace the rows with the "cleared" placeholder until the next poll.
    pub fn clear_logs_view(&mut self) {
        self.logs.clear();
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.logs.set_auto_scroll(enabled);
    }

    /// Switch to `code`, re-rendering translated text. Unknown codes leave
    /// everything as it was and return `None`.
    pub fn set_language(&mut self, code: &str) -> Option<Alert> {
        if !self.translator.set_language(code) {
            return None;
        }
        self.rerender();
        Some(self.language_alert())
    }

    /// Advance to the next available language.
    pub fn cycle_language(&mut self) -> Alert {
        self.translator.cycle_language();
        self.rerender();
        self.language_alert()
    }

    fn language_alert(&self) -> Alert {
        let name = self.translator.language_name();
        Alert::info(
            self.translator
                .t_with("msg_language_changed", &[("language", name)]),
        )
    }
}
