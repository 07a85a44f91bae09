// ── Settings form controller ──
//
// The editable form behind the settings screen. `populate` maps a service
// configuration document onto flat field values (filling defaults for
// anything missing) and `build` maps them back. Sections the form does not
// edit (`logging.format`, `web_interface`, unknown keys) come from the last
// loaded document.

use std::time::Duration;

use ripwatch_api::{
    ConfigDocument, EncoderProfiles, EncoderSection, LoggingSection, LosslessProfile,
    LossyProfile, OutputSection, RemotePaths, RipperClient, RipperSection, SyncSection,
};
use serde_json::json;
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, info, warn};

use crate::actions::{Alert, AlertLevel};
use crate::error::CoreError;
use crate::i18n::Translator;

// ── Defaults ────────────────────────────────────────────────────────

pub const DEFAULT_DEVICE: &str = "/dev/sr0";
pub const DEFAULT_QUALITY: &str = "paranoia";
pub const DEFAULT_LOSSY_FORMAT: &str = "mp3";
pub const DEFAULT_BITRATE: u32 = 320;
pub const DEFAULT_LOSSLESS_FORMAT: &str = "flac";
pub const DEFAULT_COMPRESSION: u32 = 8;
pub const DEFAULT_LOCAL_PATH: &str = "/mnt/dietpi_userdata/rips";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FILE: &str = "/root/projects/cd-ripper/logs/ripper.log";
pub const DEFAULT_LOG_FORMAT: &str = "%(asctime)s - %(name)s - %(levelname)s - %(message)s";

/// Delay before re-fetching after a successful save.
pub const REFETCH_DELAY: Duration = Duration::from_secs(1);
/// Delay between saving and requesting the restart.
pub const RESTART_DELAY: Duration = Duration::from_secs(1);
/// Delay before returning to the status screen once a restart is underway.
pub const NAVIGATE_BACK_DELAY: Duration = Duration::from_secs(3);

const QUALITIES: &[&str] = &["paranoia", "normal", "fast"];
const FORMATS: &[&str] = &["mp3", "flac"];
const LOG_LEVELS: &[&str] = &["DEBUG", "INFO", "WARNING", "ERROR"];

fn default_web_interface() -> serde_json::Value {
    json!({ "host": "0.0.0.0", "port": 5000 })
}

// ── Field metadata ──────────────────────────────────────────────────

/// Settings tab a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum SettingsTab {
    Ripper,
    Encoder,
    Output,
    Sync,
    Logging,
}

impl SettingsTab {
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Ripper => "tab_ripper",
            Self::Encoder => "tab_encoder",
            Self::Output => "tab_output",
            Self::Sync => "tab_sync",
            Self::Logging => "tab_logging",
        }
    }

    pub fn fields(self) -> impl Iterator<Item = SettingsField> {
        SettingsField::iter().filter(move |f| f.tab() == self)
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text drawn masked.
    Secret,
    /// Text that must parse as a non-negative integer on save.
    Number,
    Toggle,
    /// One of a fixed set, cycled with left/right.
    Choice(&'static [&'static str]),
}

/// Every editable field, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum SettingsField {
    Device,
    Quality,
    Cat12Format,
    Cat12Bitrate,
    Cat3Format,
    Cat3Compression,
    LocalPath,
    SyncEnabled,
    SyncHost,
    SyncUser,
    SyncPassword,
    RemoteCat1,
    RemoteCat2,
    RemoteCat3,
    Cleanup,
    AutoEject,
    LogLevel,
    LogFile,
}

impl SettingsField {
    pub fn tab(self) -> SettingsTab {
        match self {
            Self::Device | Self::Quality => SettingsTab::Ripper,
            Self::Cat12Format | Self::Cat12Bitrate | Self::Cat3Format | Self::Cat3Compression => {
                SettingsTab::Encoder
            }
            Self::LocalPath => SettingsTab::Output,
            Self::SyncEnabled
            | Self::SyncHost
            | Self::SyncUser
            | Self::SyncPassword
            | Self::RemoteCat1
            | Self::RemoteCat2
            | Self::RemoteCat3
            | Self::Cleanup
            | Self::AutoEject => SettingsTab::Sync,
            Self::LogLevel | Self::LogFile => SettingsTab::Logging,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Quality => FieldKind::Choice(QUALITIES),
            Self::Cat12Format | Self::Cat3Format => FieldKind::Choice(FORMATS),
            Self::LogLevel => FieldKind::Choice(LOG_LEVELS),
            Self::Cat12Bitrate | Self::Cat3Compression => FieldKind::Number,
            Self::SyncPassword => FieldKind::Secret,
            Self::SyncEnabled | Self::Cleanup | Self::AutoEject => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Self::Device => "label_device",
            Self::Quality => "label_quality",
            Self::Cat12Format => "label_cat12_format",
            Self::Cat12Bitrate => "label_cat12_bitrate",
            Self::Cat3Format => "label_cat3_format",
            Self::Cat3Compression => "label_cat3_compression",
            Self::LocalPath => "label_local_path",
            Self::SyncEnabled => "label_enabled",
            Self::SyncHost => "label_host",
            Self::SyncUser => "label_user",
            Self::SyncPassword => "label_password",
            Self::RemoteCat1 => "label_remote_cat1",
            Self::RemoteCat2 => "label_remote_cat2",
            Self::RemoteCat3 => "label_remote_cat3",
            Self::Cleanup => "label_cleanup",
            Self::AutoEject => "label_auto_eject",
            Self::LogLevel => "label_log_level",
            Self::LogFile => "label_log_file",
        }
    }
}

// ── Form ────────────────────────────────────────────────────────────

/// Current value of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Toggle(bool),
}

/// Flat field values of the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub device: String,
    pub quality: String,
    pub cat12_format: String,
    pub cat12_bitrate: String,
    pub cat3_format: String,
    pub cat3_compression: String,
    pub local_path: String,
    pub sync_enabled: bool,
    pub sync_host: String,
    pub sync_user: String,
    pub sync_password: String,
    pub remote_cat1: String,
    pub remote_cat2: String,
    pub remote_cat3: String,
    pub cleanup: bool,
    pub auto_eject: bool,
    pub log_level: String,
    pub log_file: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::populated(&ConfigDocument::default())
    }
}

impl SettingsForm {
    /// A form showing `doc`, with defaults for whatever it leaves out.
    pub fn populated(doc: &ConfigDocument) -> Self {
        let profiles = &doc.encoder.profiles;
        let sync = &doc.sync;
        let text = |v: Option<&str>, default: &str| v.unwrap_or(default).to_owned();
        let number = |v: Option<u32>, default: u32| v.unwrap_or(default).to_string();

        Self {
            device: text(doc.ripper.device.as_deref(), DEFAULT_DEVICE),
            quality: text(doc.ripper.quality.as_deref(), DEFAULT_QUALITY),
            cat12_format: text(profiles.category_1_2.format.as_deref(), DEFAULT_LOSSY_FORMAT),
            cat12_bitrate: number(profiles.category_1_2.bitrate, DEFAULT_BITRATE),
            cat3_format: text(profiles.category_3.format.as_deref(), DEFAULT_LOSSLESS_FORMAT),
            cat3_compression: number(profiles.category_3.compression_level, DEFAULT_COMPRESSION),
            local_path: text(doc.output.local_path.as_deref(), DEFAULT_LOCAL_PATH),
            sync_enabled: sync.enabled.unwrap_or(true),
            sync_host: text(sync.host.as_deref(), ""),
            sync_user: text(sync.user.as_deref(), ""),
            sync_password: text(sync.password.as_deref(), ""),
            remote_cat1: text(sync.remote_paths.category_1.as_deref(), ""),
            remote_cat2: text(sync.remote_paths.category_2.as_deref(), ""),
            remote_cat3: text(sync.remote_paths.category_3.as_deref(), ""),
            cleanup: sync.cleanup.unwrap_or(true),
            auto_eject: sync.auto_eject.unwrap_or(true),
            log_level: text(doc.logging.level.as_deref(), DEFAULT_LOG_LEVEL),
            log_file: text(doc.logging.file.as_deref(), DEFAULT_LOG_FILE),
        }
    }

    /// Overwrite every field from `doc`.
    pub fn populate(&mut self, doc: &ConfigDocument) {
        *self = Self::populated(doc);
    }

    /// The document to POST. Numbers that do not parse fall back to their
    /// defaults; `logging.format`, `web_interface` and unknown top-level
    /// keys are taken from `retained`.
    pub fn build(&self, retained: Option<&ConfigDocument>) -> ConfigDocument {
        let format = retained
            .and_then(|d| d.logging.format.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_owned());
        let web_interface = retained
            .and_then(|d| d.web_interface.clone())
            .unwrap_or_else(default_web_interface);
        let extra = retained.map(|d| d.extra.clone()).unwrap_or_default();

        ConfigDocument {
            ripper: RipperSection {
                device: Some(self.device.clone()),
                quality: Some(self.quality.clone()),
            },
            encoder: EncoderSection {
                profiles: EncoderProfiles {
                    category_1_2: LossyProfile {
                        format: Some(self.cat12_format.clone()),
                        bitrate: Some(parse_number(&self.cat12_bitrate, DEFAULT_BITRATE)),
                    },
                    category_3: LosslessProfile {
                        format: Some(self.cat3_format.clone()),
                        compression_level: Some(parse_number(
                            &self.cat3_compression,
                            DEFAULT_COMPRESSION,
                        )),
                    },
                },
            },
            output: OutputSection {
                local_path: Some(self.local_path.clone()),
            },
            sync: SyncSection {
                enabled: Some(self.sync_enabled),
                host: Some(self.sync_host.clone()),
                user: Some(self.sync_user.clone()),
                password: Some(self.sync_password.clone()),
                remote_paths: RemotePaths {
                    category_1: Some(self.remote_cat1.clone()),
                    category_2: Some(self.remote_cat2.clone()),
                    category_3: Some(self.remote_cat3.clone()),
                },
                cleanup: Some(self.cleanup),
                auto_eject: Some(self.auto_eject),
            },
            logging: LoggingSection {
                level: Some(self.log_level.clone()),
                file: Some(self.log_file.clone()),
                format: Some(format),
            },
            web_interface: Some(web_interface),
            extra,
        }
    }

    pub fn value(&self, field: SettingsField) -> FieldValue<'_> {
        match field {
            SettingsField::SyncEnabled => FieldValue::Toggle(self.sync_enabled),
            SettingsField::Cleanup => FieldValue::Toggle(self.cleanup),
            SettingsField::AutoEject => FieldValue::Toggle(self.auto_eject),
            other => FieldValue::Text(self.text(other).unwrap_or_default()),
        }
    }

    /// Mutable text of a text-like field; `None` for toggles.
    pub fn text_mut(&mut self, field: SettingsField) -> Option<&mut String> {
        let slot = match field {
            SettingsField::Device => &mut self.device,
            SettingsField::Quality => &mut self.quality,
            SettingsField::Cat12Format => &mut self.cat12_format,
            SettingsField::Cat12Bitrate => &mut self.cat12_bitrate,
            SettingsField::Cat3Format => &mut self.cat3_format,
            SettingsField::Cat3Compression => &mut self.cat3_compression,
            SettingsField::LocalPath => &mut self.local_path,
            SettingsField::SyncHost => &mut self.sync_host,
            SettingsField::SyncUser => &mut self.sync_user,
            SettingsField::SyncPassword => &mut self.sync_password,
            SettingsField::RemoteCat1 => &mut self.remote_cat1,
            SettingsField::RemoteCat2 => &mut self.remote_cat2,
            SettingsField::RemoteCat3 => &mut self.remote_cat3,
            SettingsField::LogLevel => &mut self.log_level,
            SettingsField::LogFile => &mut self.log_file,
            SettingsField::SyncEnabled | SettingsField::Cleanup | SettingsField::AutoEject => {
                return None;
            }
        };
        Some(slot)
    }

    fn text(&self, field: SettingsField) -> Option<&str> {
        let slot = match field {
            SettingsField::Device => &self.device,
            SettingsField::Quality => &self.quality,
            SettingsField::Cat12Format => &self.cat12_format,
            SettingsField::Cat12Bitrate => &self.cat12_bitrate,
            SettingsField::Cat3Format => &self.cat3_format,
            SettingsField::Cat3Compression => &self.cat3_compression,
            SettingsField::LocalPath => &self.local_path,
            SettingsField::SyncHost => &self.sync_host,
            SettingsField::SyncUser => &self.sync_user,
            SettingsField::SyncPassword => &self.sync_password,
            SettingsField::RemoteCat1 => &self.remote_cat1,
            SettingsField::RemoteCat2 => &self.remote_cat2,
            SettingsField::RemoteCat3 => &self.remote_cat3,
            SettingsField::LogLevel => &self.log_level,
            SettingsField::LogFile => &self.log_file,
            SettingsField::SyncEnabled | SettingsField::Cleanup | SettingsField::AutoEject => {
                return None;
            }
        };
        Some(slot.as_str())
    }

    /// Flip a toggle field. Returns `false` for other kinds.
    pub fn toggle(&mut self, field: SettingsField) -> bool {
        let slot = match field {
            SettingsField::SyncEnabled => &mut self.sync_enabled,
            SettingsField::Cleanup => &mut self.cleanup,
            SettingsField::AutoEject => &mut self.auto_eject,
            _ => return false,
        };
        *slot = !*slot;
        true
    }

    /// Step a choice field to the next (or previous) option. A value not in
    /// the option list moves to the first option.
    pub fn cycle(&mut self, field: SettingsField, forward: bool) -> bool {
        let FieldKind::Choice(options) = field.kind() else {
            return false;
        };
        let Some(slot) = self.text_mut(field) else {
            return false;
        };
        let len = options.len();
        let next = match options.iter().position(|o| *o == slot.as_str()) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        if let Some(option) = options.get(next) {
            (*option).clone_into(slot);
        }
        true
    }
}

/// Leading-digit integer parse with a fallback for anything unusable.
fn parse_number(raw: &str, fallback: u32) -> u32 {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().unwrap_or(fallback)
}

// ── Controller ──────────────────────────────────────────────────────

/// Form plus the last configuration document loaded from the service.
///
/// Owned by the UI loop; the async operations below run on their own
/// tasks and hand their outcome back to be applied here.
#[derive(Debug, Clone, Default)]
pub struct SettingsController {
    form: SettingsForm,
    current: Option<ConfigDocument>,
}

impl SettingsController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SettingsForm {
        &mut self.form
    }

    /// The document last loaded from the service, if any.
    pub fn current(&self) -> Option<&ConfigDocument> {
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Apply a load result. On failure the form is left untouched and an
    /// error alert is returned.
    pub fn apply_loaded(&mut self, result: LoadOutcome, t: &Translator) -> Option<Alert> {
        match result {
            LoadOutcome::Loaded(doc) => {
                self.form.populate(&doc);
                self.current = Some(*doc);
                None
            }
            LoadOutcome::Failed { detail } => Some(Alert::framed(
                AlertLevel::Error,
                &t.t("msg_config_load_error"),
                &detail,
            )),
        }
    }

    /// The document the form currently describes.
    pub fn build(&self) -> ConfigDocument {
        self.form.build(self.current.as_ref())
    }
}

// ── Async operations ────────────────────────────────────────────────

/// Result of `load_configuration`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Box<ConfigDocument>),
    Failed { detail: String },
}

/// Result of `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// `message` is the service's confirmation text, possibly empty.
    Saved { message: String },
    Failed { detail: String },
}

impl SaveOutcome {
    pub fn alert(&self, t: &Translator) -> Alert {
        match self {
            Self::Saved { message } if !message.is_empty() => {
                Alert::success(format!("✅ {message}"))
            }
            Self::Saved { .. } => Alert::success(format!("✅ {}", t.t("msg_config_saved"))),
            Self::Failed { detail } => {
                Alert::framed(AlertLevel::Error, &format!("❌ {}", t.t("msg_config_error")), detail)
            }
        }
    }

    /// When to re-fetch the configuration, if at all.
    pub fn refetch_after(&self) -> Option<Duration> {
        matches!(self, Self::Saved { .. }).then_some(REFETCH_DELAY)
    }
}

/// Result of `save_and_restart`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarting,
    SaveFailed { detail: String },
    RestartFailed { detail: String },
}

impl RestartOutcome {
    pub fn alert(&self, t: &Translator) -> Alert {
        match self {
            Self::Restarting => Alert::success(format!("✅ {}", t.t("msg_restart_success"))),
            Self::SaveFailed { detail } => {
                Alert::framed(AlertLevel::Error, &format!("❌ {}", t.t("msg_config_error")), detail)
            }
            Self::RestartFailed { detail } => Alert::framed(
                AlertLevel::Error,
                &format!("⚠️ {}", t.t("msg_restart_error")),
                detail,
            ),
        }
    }

    /// When to return to the status screen, if at all.
    pub fn navigate_back_after(&self) -> Option<Duration> {
        matches!(self, Self::Restarting).then_some(NAVIGATE_BACK_DELAY)
    }
}

/// Alert shown between a successful save and the restart request.
pub fn restart_pending_alert(t: &Translator) -> Alert {
    Alert::warning(format!("✅ {}", t.t("msg_restart_pending")))
}

/// Fetch the configuration document.
pub async fn load_configuration(client: &RipperClient) -> LoadOutcome {
    match client.get_config().await {
        Ok(doc) => {
            debug!("configuration loaded");
            LoadOutcome::Loaded(Box::new(doc))
        }
        Err(e) => {
            let e = CoreError::from(e);
            warn!(error = %e, "failed to load configuration");
            LoadOutcome::Failed { detail: e.detail() }
        }
    }
}

/// POST `doc`. The caller's retained document is not touched either way.
pub async fn save(client: &RipperClient, doc: &ConfigDocument) -> SaveOutcome {
    match client.save_config(doc).await {
        Ok(message) => {
            info!("configuration saved");
            SaveOutcome::Saved { message }
        }
        Err(e) => {
            let e = CoreError::from(e);
            warn!(error = %e, "failed to save configuration");
            SaveOutcome::Failed { detail: e.detail() }
        }
    }
}

/// POST `doc`, then (only if that succeeded) wait `RESTART_DELAY` and ask
/// the service to restart. `on_saved` runs between the two steps. The
/// caller obtains confirmation first.
pub async fn save_and_restart<F>(
    client: &RipperClient,
    doc: &ConfigDocument,
    on_saved: F,
) -> RestartOutcome
where
    F: FnOnce() + Send,
{
    if let Err(e) = client.save_config(doc).await {
        let e = CoreError::from(e);
        warn!(error = %e, "failed to save configuration before restart");
        return RestartOutcome::SaveFailed { detail: e.detail() };
    }
    on_saved();

    tokio::time::sleep(RESTART_DELAY).await;

    match client.restart().await {
        Ok(()) => {
            info!("service restart requested");
            RestartOutcome::Restarting
        }
        Err(e) => {
            let e = CoreError::from(e);
            warn!(error = %e, "service restart failed");
            RestartOutcome::RestartFailed { detail: e.detail() }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::i18n::Catalog;

    fn full_document() -> ConfigDocument {
        serde_json::from_value(json!({
            "ripper": { "device": "/dev/sr1", "quality": "fast" },
            "encoder": { "profiles": {
                "category_1_2": { "format": "mp3", "bitrate": 256 },
                "category_3": { "format": "flac", "compression_level": 5 }
            }},
            "output": { "local_path": "/srv/rips" },
            "sync": {
                "enabled": false,
                "host": "nas.local",
                "user": "music",
                "password": "hunter2",
                "remote_paths": {
                    "category_1": "/music/pop",
                    "category_2": "/music/rock",
                    "category_3": "/music/classical"
                },
                "cleanup": false,
                "auto_eject": true
            },
            "logging": {
                "level": "DEBUG",
                "file": "/var/log/ripper.log",
                "format": "%(levelname)s %(message)s"
            },
            "web_interface": { "host": "127.0.0.1", "port": 8080, "debug": true }
        }))
        .expect("document")
    }

    #[test]
    fn build_after_populate_round_trips() {
        let doc = full_document();
        let form = SettingsForm::populated(&doc);
        let built = form.build(Some(&doc));

        assert_eq!(built.ripper, doc.ripper);
        assert_eq!(built.encoder, doc.encoder);
        assert_eq!(built.output, doc.output);
        assert_eq!(built.sync, doc.sync);
        assert_eq!(built.logging, doc.logging);
        assert_eq!(built.web_interface, doc.web_interface);
    }

    #[test]
    fn populate_fills_defaults() {
        let form = SettingsForm::populated(&ConfigDocument::default());
        assert_eq!(form.device, "/dev/sr0");
        assert_eq!(form.quality, "paranoia");
        assert_eq!(form.cat12_bitrate, "320");
        assert_eq!(form.cat3_compression, "8");
        assert_eq!(form.local_path, "/mnt/dietpi_userdata/rips");
        assert!(form.sync_enabled && form.cleanup && form.auto_eject);
        assert_eq!(form.log_level, "INFO");
        assert_eq!(form.sync_host, "");
    }

    #[test]
    fn explicit_false_toggles_survive_populate() {
        let mut doc = ConfigDocument::default();
        doc.sync.enabled = Some(false);
        doc.sync.cleanup = Some(false);
        let form = SettingsForm::populated(&doc);
        assert!(!form.sync_enabled);
        assert!(!form.cleanup);
        assert!(form.auto_eject);
    }

    #[test]
    fn build_without_retained_uses_defaults() {
        let built = SettingsForm::default().build(None);
        assert_eq!(built.logging.format.as_deref(), Some(DEFAULT_LOG_FORMAT));
        assert_eq!(
            built.web_interface,
            Some(json!({ "host": "0.0.0.0", "port": 5000 }))
        );
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        let mut form = SettingsForm::default();
        form.cat12_bitrate = "abc".into();
        form.cat3_compression = "-3".into();
        let built = form.build(None);
        assert_eq!(built.encoder.profiles.category_1_2.bitrate, Some(320));
        assert_eq!(built.encoder.profiles.category_3.compression_level, Some(8));

        form.cat12_bitrate = " 192kbps".into();
        form.cat3_compression = "0".into();
        let built = form.build(None);
        assert_eq!(built.encoder.profiles.category_1_2.bitrate, Some(192));
        assert_eq!(built.encoder.profiles.category_3.compression_level, Some(0));
    }

    #[test]
    fn unknown_sections_are_carried_through() {
        let mut doc = full_document();
        doc.extra.insert("categorizer".into(), json!({ "threshold": 0.8 }));
        let built = SettingsForm::populated(&doc).build(Some(&doc));
        assert_eq!(built.extra.get("categorizer"), Some(&json!({ "threshold": 0.8 })));
    }

    #[test]
    fn choice_cycling_wraps() {
        let mut form = SettingsForm::default();
        assert!(form.cycle(SettingsField::Quality, true));
        assert_eq!(form.quality, "normal");
        assert!(form.cycle(SettingsField::Quality, false));
        assert!(form.cycle(SettingsField::Quality, false));
        assert_eq!(form.quality, "fast");

        form.log_level = "TRACE".into();
        form.cycle(SettingsField::LogLevel, true);
        assert_eq!(form.log_level, "DEBUG");

        assert!(!form.cycle(SettingsField::Device, true));
    }

    #[test]
    fn toggles_and_text_slots() {
        let mut form = SettingsForm::default();
        assert!(form.toggle(SettingsField::Cleanup));
        assert!(!form.cleanup);
        assert!(!form.toggle(SettingsField::Device));
        assert!(form.text_mut(SettingsField::AutoEject).is_none());

        if let Some(host) = form.text_mut(SettingsField::SyncHost) {
            host.push_str("nas");
        }
        assert_eq!(form.value(SettingsField::SyncHost), FieldValue::Text("nas"));
        assert_eq!(form.value(SettingsField::Cleanup), FieldValue::Toggle(false));
    }

    #[test]
    fn every_field_has_a_tab() {
        let total: usize = SettingsTab::iter().map(|t| t.fields().count()).sum();
        assert_eq!(total, SettingsField::iter().count());
    }

    #[test]
    fn failed_load_leaves_form_untouched() {
        let t = Translator::new(Catalog::builtin());
        let mut controller = SettingsController::new();
        controller.apply_loaded(LoadOutcome::Loaded(Box::new(full_document())), &t);
        let before = controller.form().clone();

        let alert = controller
            .apply_loaded(
                LoadOutcome::Failed {
                    detail: "timeout".into(),
                },
                &t,
            )
            .expect("alert");
        assert_eq!(alert.level, AlertLevel::Error);
        assert!(alert.message.contains("timeout"));
        assert_eq!(controller.form(), &before);
        assert!(controller.is_loaded());
    }

    #[test]
    fn save_failure_alert_shows_backend_text() {
        let mut t = Translator::new(Catalog::builtin());
        t.set_language("de");
        let alert = SaveOutcome::Failed {
            detail: "disk full".into(),
        }
        .alert(&t);
        assert_eq!(alert.level, AlertLevel::Error);
        assert_eq!(
            alert.message,
            "❌ Fehler beim Speichern der Konfiguration: disk full"
        );
    }

    #[test]
    fn follow_up_delays() {
        let saved = SaveOutcome::Saved {
            message: String::new(),
        };
        assert_eq!(saved.refetch_after(), Some(REFETCH_DELAY));
        assert_eq!(RestartOutcome::Restarting.navigate_back_after(), Some(NAVIGATE_BACK_DELAY));
        let failed = RestartOutcome::RestartFailed {
            detail: "x".into(),
        };
        assert_eq!(failed.navigate_back_after(), None);
    }
}
