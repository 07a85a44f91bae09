// Wire types for the ripper service API.
//
// Every field is optional on the wire: the service builds these payloads
// from whatever the pipeline has produced so far, so absent and `null`
// fields are routine rather than exceptional.

use serde::{Deserialize, Deserializer, Serialize};
use strum::EnumString;

// ── Status ──────────────────────────────────────────────────────────

/// One poll cycle's full status payload (`GET /api/status`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub current_cd: Option<CdInfo>,
    #[serde(deserialize_with = "lenient_bool")]
    pub processing: bool,
    pub current_step: Option<StepId>,
    #[serde(deserialize_with = "lenient_u32")]
    pub current_track: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub total_tracks: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub progress: Option<u32>,
    pub last_update: Option<String>,
}

/// Metadata of the disc currently in the drive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CdInfo {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub cover_url: Option<String>,
    /// Fields the dashboard does not display (category, track list, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Pipeline stage reported in `current_step`.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum StepId {
    Detecting,
    Identifying,
    Ripping,
    Encoding,
    Tagging,
    Syncing,
    Done,
    /// A stage this client does not know about; kept verbatim.
    #[strum(default)]
    Other(String),
}

impl StepId {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Detecting => "detecting",
            Self::Identifying => "identifying",
            Self::Ripping => "ripping",
            Self::Encoding => "encoding",
            Self::Tagging => "tagging",
            Self::Syncing => "syncing",
            Self::Done => "done",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for StepId {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(step) => step,
            Err(_) => Self::Other(raw),
        }
    }
}

impl Serialize for StepId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

// ── Logs ────────────────────────────────────────────────────────────

/// One parsed line of the service log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp: String::new(),
            level: "INFO".into(),
            message: String::new(),
            logger: None,
        }
    }
}

/// Envelope of `GET /api/logs/tail` and `GET /api/logs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LogBatch {
    pub logs: Vec<LogEntry>,
}

// ── Configuration ───────────────────────────────────────────────────

/// The service configuration document (`GET`/`POST /api/config`).
///
/// Sections the dashboard edits are typed; `web_interface` and any
/// unknown top-level keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigDocument {
    pub ripper: RipperSection,
    pub encoder: EncoderSection,
    pub output: OutputSection,
    pub sync: SyncSection,
    pub logging: LoggingSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_interface: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RipperSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderSection {
    pub profiles: EncoderProfiles,
}

/// Encoding profiles keyed by disc category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderProfiles {
    /// Lossy profile for categories 1 and 2.
    pub category_1_2: LossyProfile,
    /// Lossless profile for category 3.
    pub category_3: LosslessProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LossyProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitrate: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LosslessProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub compression_level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub remote_paths: RemotePaths,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_eject: Option<bool>,
}

/// Remote destination directory per disc category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RemotePaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_3: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

// ── Responses ───────────────────────────────────────────────────────

/// `{ "message": ... }` body of a successful `POST /api/config`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MessageBody {
    pub message: Option<String>,
}

/// `{ "error": ... }` body of a failed request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

// ── Lenient field decoding ──────────────────────────────────────────

/// Accept integers, floats, numeric strings, or null.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_u32))
}

fn value_to_u32(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| n.as_f64().and_then(float_to_u32)),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().and_then(float_to_u32),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn float_to_u32(v: f64) -> Option<u32> {
    (v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX)).then(|| v.round() as u32)
}

/// Accept booleans or null (null reads as `false`).
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_status_decodes_to_defaults() {
        let snap: StatusSnapshot = serde_json::from_value(json!({})).expect("decode");
        assert_eq!(snap, StatusSnapshot::default());
    }

    #[test]
    fn status_tolerates_nulls_and_floats() {
        let snap: StatusSnapshot = serde_json::from_value(json!({
            "current_cd": { "name": "Abbey Road", "artist": null, "category": 1 },
            "processing": null,
            "current_step": "encoding",
            "current_track": 3,
            "total_tracks": "17",
            "progress": 42.6
        }))
        .expect("decode");

        let cd = snap.current_cd.expect("cd");
        assert_eq!(cd.name.as_deref(), Some("Abbey Road"));
        assert_eq!(cd.artist, None);
        assert_eq!(cd.extra.get("category"), Some(&json!(1)));
        assert!(!snap.processing);
        assert_eq!(snap.current_step, Some(StepId::Encoding));
        assert_eq!(snap.total_tracks, Some(17));
        assert_eq!(snap.progress, Some(43));
    }

    #[test]
    fn unknown_step_is_preserved() {
        let step: StepId = serde_json::from_value(json!("normalizing")).expect("decode");
        assert_eq!(step, StepId::Other("normalizing".into()));
        assert_eq!(serde_json::to_value(&step).expect("encode"), json!("normalizing"));
    }

    #[test]
    fn log_entry_defaults_level_to_info() {
        let entry: LogEntry =
            serde_json::from_value(json!({ "message": "hello" })).expect("decode");
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.timestamp, "");
    }

    #[test]
    fn config_document_keeps_unknown_sections() {
        let raw = json!({
            "ripper": { "device": "/dev/sr1" },
            "web_interface": { "host": "127.0.0.1", "port": 8080 },
            "categorizer": { "threshold": 0.8 }
        });
        let doc: ConfigDocument = serde_json::from_value(raw).expect("decode");
        assert_eq!(doc.ripper.device.as_deref(), Some("/dev/sr1"));
        assert_eq!(doc.web_interface, Some(json!({ "host": "127.0.0.1", "port": 8080 })));

        let back = serde_json::to_value(&doc).expect("encode");
        assert_eq!(back["categorizer"], json!({ "threshold": 0.8 }));
        assert_eq!(back["web_interface"]["port"], json!(8080));
    }
}
