//! State and logic behind the ripwatch dashboard.
//!
//! - **[`Poller`]** runs the status and log-tail loops and emits
//!   [`PollEvent`]s over a channel, each tagged with a generation number.
//! - **[`Dashboard`]** is the status screen's state. It applies poll events
//!   through [`FreshnessGate`]s, renders them with [`render_status`] and
//!   [`LogView`], and carries the operator actions (log panel, language).
//! - **[`SettingsController`]** holds the editable [`SettingsForm`] plus the
//!   last loaded configuration; [`settings::save`] and
//!   [`settings::save_and_restart`] talk to the service.
//! - **[`Translator`]** resolves UI text against the built-in [`Catalog`].

pub mod actions;
pub mod dashboard;
pub mod error;
pub mod i18n;
pub mod poller;
pub mod render;
pub mod settings;

// ── Primary re-exports ──────────────────────────────────────────────
pub use actions::{ALERT_LIFETIME, Alert, AlertLevel, EjectOutcome, eject};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use i18n::{Catalog, DEFAULT_LANGUAGE, LanguageStore, Markup, Segment, Translator};
pub use poller::{FreshnessGate, PollEvent, Poller, PollerConfig};
pub use render::{LevelClass, LogRow, LogView, ProgressView, StatusPhase, StatusView, render_status};
pub use settings::{
    FieldKind, FieldValue, LoadOutcome, RestartOutcome, SaveOutcome, SettingsController,
    SettingsField, SettingsForm, SettingsTab,
};

// The API client is part of this crate's public surface.
pub use ripwatch_api::{
    CdInfo, ConfigDocument, LogEntry, RipperClient, StatusSnapshot, StepId, TransportConfig,
};
