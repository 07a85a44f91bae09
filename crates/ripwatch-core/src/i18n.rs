// ── Translation store ──
//
// Immutable per-language tables plus a small `Translator` that tracks the
// active language. Lookup is layered: active table, then the default
// (English) table, then the raw key itself. It never fails.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use tracing::{info, warn};

use crate::error::CoreError;

/// Language used when nothing else is configured, and the lookup fallback.
pub const DEFAULT_LANGUAGE: &str = "en";

// ── Tables ──────────────────────────────────────────────────────────

const EN: &[(&str, &str)] = &[
    // Header
    ("app_title", "CD-Ripper"),
    ("page_status", "Status"),
    ("btn_eject", "Eject"),
    ("btn_settings", "Settings"),
    ("btn_language", "Language"),
    ("btn_quit", "Quit"),
    // Status
    ("no_cd", "No CD inserted"),
    ("unknown_cd", "Unknown CD"),
    ("cd_detected", "CD detected"),
    (
        "warning_banner",
        "<strong>Do not remove CD!</strong> Ripping in progress...",
    ),
    ("waiting", "Waiting..."),
    ("processing", "Processing..."),
    // Steps
    ("step_detecting", "Detecting CD..."),
    ("step_identifying", "Identifying..."),
    ("step_ripping", "Ripping"),
    ("step_encoding", "Encoding"),
    ("step_tagging", "Tagging"),
    ("step_syncing", "Syncing to server"),
    ("step_done", "Done"),
    // Track info
    ("track_of", "Track {current} of {total}"),
    // Logs
    ("logs_title", "Live Logs"),
    ("logs_empty", "No logs available yet..."),
    ("logs_cleared", "Logs cleared"),
    ("logs_auto_scroll", "Auto-scroll"),
    ("btn_clear_logs", "Clear"),
    ("btn_toggle_logs", "Toggle logs"),
    // Settings page
    ("settings_title", "Settings"),
    ("settings_save", "Save"),
    ("settings_save_restart", "Save & Restart"),
    ("settings_back", "Back to Status"),
    ("settings_loading", "Loading configuration..."),
    // Settings tabs
    ("tab_ripper", "Ripper Settings"),
    ("tab_encoder", "Encoder Settings"),
    ("tab_sync", "Sync Settings"),
    ("tab_output", "Output Settings"),
    ("tab_web", "Web Interface"),
    ("tab_logging", "Logging"),
    // Settings labels
    ("label_device", "CD Device"),
    ("label_quality", "Ripping Quality"),
    ("label_language", "Language"),
    ("label_host", "Server Host"),
    ("label_user", "SSH User"),
    ("label_password", "SSH Password"),
    ("label_enabled", "Enabled"),
    ("label_port", "Port"),
    ("label_cat12_format", "Category 1+2 Format"),
    ("label_cat12_bitrate", "Category 1+2 Bitrate (kbps)"),
    ("label_cat3_format", "Category 3 Format"),
    ("label_cat3_compression", "Category 3 Compression Level"),
    ("label_local_path", "Local Output Path"),
    ("label_remote_cat1", "Remote Path Category 1"),
    ("label_remote_cat2", "Remote Path Category 2"),
    ("label_remote_cat3", "Remote Path Category 3"),
    ("label_cleanup", "Delete local files after sync"),
    ("label_auto_eject", "Eject CD when finished"),
    ("label_log_level", "Log Level"),
    ("label_log_file", "Log File"),
    // Messages
    ("msg_config_saved", "Configuration saved successfully!"),
    ("msg_config_error", "Error saving configuration"),
    ("msg_config_load_error", "Error loading configuration"),
    ("msg_restart_pending", "Service will restart..."),
    ("msg_restart_confirm", "Service will restart. Is a rip in progress?"),
    ("msg_restart_success", "Service is restarting. Please wait..."),
    ("msg_restart_error", "Service restart failed"),
    ("msg_eject_confirm", "Really eject CD?"),
    ("msg_eject_success", "CD ejected"),
    ("msg_eject_error", "Error ejecting CD"),
    ("msg_language_changed", "Language: {language}"),
    // Dialog
    ("confirm_title", "Confirm"),
    ("confirm_hint", "y confirm  ·  n cancel"),
];

const DE: &[(&str, &str)] = &[
    // Header
    ("app_title", "CD-Ripper"),
    ("page_status", "Status"),
    ("btn_eject", "Auswerfen"),
    ("btn_settings", "Einstellungen"),
    ("btn_language", "Sprache"),
    ("btn_quit", "Beenden"),
    // Status
    ("no_cd", "Keine CD eingelegt"),
    ("unknown_cd", "Unbekannte CD"),
    ("cd_detected", "CD erkannt"),
    (
        "warning_banner",
        "<strong>CD nicht entfernen!</strong> Ripping läuft...",
    ),
    ("waiting", "Warte..."),
    ("processing", "Verarbeite..."),
    // Steps
    ("step_detecting", "Erkenne CD..."),
    ("step_identifying", "Identifiziere..."),
    ("step_ripping", "Rippe"),
    ("step_encoding", "Kodiere"),
    ("step_tagging", "Tagge"),
    ("step_syncing", "Synchronisiere zum Server"),
    ("step_done", "Fertig"),
    // Track info
    ("track_of", "Track {current} von {total}"),
    // Logs
    ("logs_title", "Live-Logs"),
    ("logs_empty", "Noch keine Logs verfügbar..."),
    ("logs_cleared", "Logs gelöscht"),
    ("logs_auto_scroll", "Auto-Scroll"),
    ("btn_clear_logs", "Leeren"),
    ("btn_toggle_logs", "Logs ein/aus"),
    // Settings page
    ("settings_title", "Einstellungen"),
    ("settings_save", "Speichern"),
    ("settings_save_restart", "Speichern & Neu starten"),
    ("settings_back", "Zurück zum Status"),
    ("settings_loading", "Lade Konfiguration..."),
    // Settings tabs
    ("tab_ripper", "Ripper-Einstellungen"),
    ("tab_encoder", "Encoder-Einstellungen"),
    ("tab_sync", "Sync-Einstellungen"),
    ("tab_output", "Output-Einstellungen"),
    ("tab_web", "Web-Interface"),
    ("tab_logging", "Logging"),
    // Settings labels
    ("label_device", "CD-Laufwerk"),
    ("label_quality", "Ripping-Qualität"),
    ("label_language", "Sprache"),
    ("label_host", "Server-Host"),
    ("label_user", "SSH-Benutzer"),
    ("label_password", "SSH-Passwort"),
    ("label_enabled", "Aktiviert"),
    ("label_port", "Port"),
    ("label_cat12_format", "Kategorie 1+2 Format"),
    ("label_cat12_bitrate", "Kategorie 1+2 Bitrate (kbps)"),
    ("label_cat3_format", "Kategorie 3 Format"),
    ("label_cat3_compression", "Kategorie 3 Kompressionsstufe"),
    ("label_local_path", "Lokaler Ausgabepfad"),
    ("label_remote_cat1", "Remote-Pfad Kategorie 1"),
    ("label_remote_cat2", "Remote-Pfad Kategorie 2"),
    ("label_remote_cat3", "Remote-Pfad Kategorie 3"),
    ("label_cleanup", "Lokale Dateien nach Sync löschen"),
    ("label_auto_eject", "CD nach Abschluss auswerfen"),
    ("label_log_level", "Log-Level"),
    ("label_log_file", "Log-Datei"),
    // Messages
    ("msg_config_saved", "Konfiguration erfolgreich gespeichert!"),
    ("msg_config_error", "Fehler beim Speichern der Konfiguration"),
    ("msg_config_load_error", "Fehler beim Laden der Konfiguration"),
    ("msg_restart_pending", "Service wird neu gestartet..."),
    (
        "msg_restart_confirm",
        "Service wird neu gestartet. Läuft gerade ein Ripping-Vorgang?",
    ),
    ("msg_restart_success", "Service wird neu gestartet. Bitte warten..."),
    ("msg_restart_error", "Service-Neustart fehlgeschlagen"),
    ("msg_eject_confirm", "CD wirklich auswerfen?"),
    ("msg_eject_success", "CD ausgeworfen"),
    ("msg_eject_error", "Fehler beim Auswerfen der CD"),
    ("msg_language_changed", "Sprache: {language}"),
    // Dialog
    ("confirm_title", "Bestätigen"),
    ("confirm_hint", "y bestätigen  ·  n abbrechen"),
];

static BUILTIN: LazyLock<Arc<Catalog>> = LazyLock::new(|| {
    Arc::new(Catalog::from_tables(&[
        ("en", "English", EN),
        ("de", "Deutsch", DE),
    ]))
});

// ── Catalog ─────────────────────────────────────────────────────────

/// One language table.
#[derive(Debug, Clone)]
pub struct Language {
    pub code: &'static str,
    /// Native display name ("Deutsch").
    pub name: &'static str,
    entries: HashMap<&'static str, &'static str>,
}

/// Ordered, immutable set of language tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    languages: Vec<Language>,
}

impl Catalog {
    /// The built-in English and German tables.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Build a catalog from `(code, name, entries)` tables, in display order.
    pub fn from_tables(
        tables: &[(&'static str, &'static str, &'static [(&'static str, &'static str)])],
    ) -> Self {
        let languages = tables
            .iter()
            .map(|&(code, name, entries)| Language {
                code,
                name,
                entries: entries.iter().copied().collect(),
            })
            .collect();
        Self { languages }
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }

    /// Look `key` up in `lang`, then in the default table, else return the
    /// key itself. Each `(name, value)` param replaces the first `{name}`
    /// token; tokens without a matching param stay as they are.
    pub fn resolve(&self, lang: &str, key: &str, params: &[(&str, &str)]) -> String {
        let text = self
            .lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .unwrap_or(key);

        let mut out = text.to_owned();
        for (name, value) in params {
            out = out.replacen(&format!("{{{name}}}"), value, 1);
        }
        out
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.language(lang)
            .and_then(|l| l.entries.get(key))
            .copied()
    }
}

// ── Persistence seam ────────────────────────────────────────────────

/// Where the chosen language survives restarts.
pub trait LanguageStore: Send {
    /// The persisted language code, if any.
    fn load(&self) -> Option<String>;

    /// Persist `code`.
    fn save(&mut self, code: &str) -> Result<(), CoreError>;
}

// ── Translator ──────────────────────────────────────────────────────

/// Catalog plus the active language.
pub struct Translator {
    catalog: Arc<Catalog>,
    language: &'static str,
    store: Option<Box<dyn LanguageStore>>,
}

impl Translator {
    /// A translator over `catalog`, starting in the default language.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let language = catalog
            .language(DEFAULT_LANGUAGE)
            .or_else(|| catalog.languages().first())
            .map_or(DEFAULT_LANGUAGE, |l| l.code);
        Self {
            catalog,
            language,
            store: None,
        }
    }

    /// A translator initialized from the persisted preference, else
    /// `fallback`, else the default language. Later switches are written
    /// back to `store`.
    pub fn with_store(
        catalog: Arc<Catalog>,
        store: Box<dyn LanguageStore>,
        fallback: &str,
    ) -> Self {
        let mut translator = Self::new(catalog);
        let saved = store.load();
        for candidate in saved.as_deref().into_iter().chain([fallback]) {
            if let Some(lang) = translator.catalog.language(candidate) {
                translator.language = lang.code;
                break;
            }
        }
        translator.store = Some(store);
        translator
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Active language code.
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Display name of the active language.
    pub fn language_name(&self) -> &'static str {
        self.catalog
            .language(self.language)
            .map_or(self.language, |l| l.name)
    }

    pub fn t(&self, key: &str) -> String {
        self.catalog.resolve(self.language, key, &[])
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.catalog.resolve(self.language, key, params)
    }

    /// Translated text that carries inline emphasis.
    pub fn markup(&self, key: &str) -> Markup {
        Markup::parse(&self.t(key))
    }

    /// Window title for a page, e.g. "CD-Ripper - Status".
    pub fn title(&self, page_key: &str) -> String {
        format!("{} - {}", self.t("app_title"), self.t(page_key))
    }

    /// Switch to `code`. Unknown codes are logged and ignored (returns
    /// `false`). A failed write to the store does not undo the switch.
    pub fn set_language(&mut self, code: &str) -> bool {
        let Some(lang) = self.catalog.language(code) else {
            warn!(language = code, "language not available");
            return false;
        };
        self.language = lang.code;

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(lang.code) {
                warn!(error = %e, "failed to persist language preference");
            }
        }
        info!(language = lang.code, "language changed");
        true
    }

    /// Advance to the next language in catalog order, wrapping around.
    pub fn cycle_language(&mut self) -> &'static str {
        let languages = self.catalog.languages();
        let next = languages
            .iter()
            .position(|l| l.code == self.language)
            .map_or(0, |i| (i + 1) % languages.len());
        if let Some(code) = languages.get(next).map(|l| l.code) {
            self.set_language(code);
        }
        self.language
    }
}

// ── Markup ──────────────────────────────────────────────────────────

/// A run of text with or without emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub strong: bool,
}

/// Translated text with `<strong>` emphasis split out. Any other tag, and
/// an unterminated `<strong>`, is kept as literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub segments: Vec<Segment>,
}

impl Markup {
    const OPEN: &'static str = "<strong>";
    const CLOSE: &'static str = "</strong>";

    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(Self::OPEN) {
            let after_open = &rest[start + Self::OPEN.len()..];
            let Some(end) = after_open.find(Self::CLOSE) else {
                break;
            };
            push_segment(&mut segments, &rest[..start], false);
            push_segment(&mut segments, &after_open[..end], true);
            rest = &after_open[end + Self::CLOSE.len()..];
        }
        push_segment(&mut segments, rest, false);

        Self { segments }
    }

    /// The text without emphasis.
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

fn push_segment(segments: &mut Vec<Segment>, text: &str, strong: bool) {
    if !text.is_empty() {
        segments.push(Segment {
            text: text.to_owned(),
            strong,
        });
    }
}
