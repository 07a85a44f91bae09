#![allow(clippy::unwrap_used)]
// Settings controller against a mocked ripper service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ripwatch_core::settings::{self, load_configuration, save, save_and_restart};
use ripwatch_core::{
    AlertLevel, Catalog, LoadOutcome, RestartOutcome, RipperClient, SaveOutcome,
    SettingsController, Translator,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RipperClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RipperClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn translator() -> Translator {
    Translator::new(Catalog::builtin())
}

async fn mount_config(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ripper": { "device": "/dev/sr1", "quality": "fast" },
            "output": { "local_path": "/srv/rips" },
            "logging": { "level": "DEBUG", "format": "%(message)s" },
            "web_interface": { "host": "127.0.0.1", "port": 8080 }
        })))
        .mount(server)
        .await;
}

async fn loaded_controller(client: &RipperClient) -> SettingsController {
    let mut controller = SettingsController::new();
    let outcome = load_configuration(client).await;
    assert!(controller.apply_loaded(outcome, &translator()).is_none());
    controller
}

// ── Load ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_populates_form() {
    let (server, client) = setup().await;
    mount_config(&server).await;

    let controller = loaded_controller(&client).await;

    let form = controller.form();
    assert_eq!(form.device, "/dev/sr1");
    assert_eq!(form.quality, "fast");
    assert_eq!(form.local_path, "/srv/rips");
    assert_eq!(form.cat12_bitrate, "320");
    assert_eq!(form.log_level, "DEBUG");
}

#[tokio::test]
async fn test_load_failure_keeps_form() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "config unreadable" })),
        )
        .mount(&server)
        .await;

    let mut controller = SettingsController::new();
    let before = controller.form().clone();
    let outcome = load_configuration(&client).await;
    assert!(matches!(outcome, LoadOutcome::Failed { .. }));

    let alert = controller.apply_loaded(outcome, &translator()).unwrap();
    assert_eq!(alert.level, AlertLevel::Error);
    assert!(alert.message.contains("config unreadable"));
    assert_eq!(controller.form(), &before);
    assert!(!controller.is_loaded());
}

// ── Save ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_save_posts_form_with_retained_sections() {
    let (server, client) = setup().await;
    mount_config(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_partial_json(json!({
            "ripper": { "device": "/dev/sr2" },
            "logging": { "format": "%(message)s" },
            "web_interface": { "host": "127.0.0.1", "port": 8080 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Konfiguration gespeichert"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = loaded_controller(&client).await;
    "/dev/sr2".clone_into(&mut controller.form_mut().device);

    let outcome = save(&client, &controller.build()).await;

    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            message: "Konfiguration gespeichert".into()
        }
    );
    assert_eq!(outcome.alert(&translator()).message, "✅ Konfiguration gespeichert");
    assert!(outcome.refetch_after().is_some());
}

#[tokio::test]
async fn test_save_failure_reports_disk_full() {
    let (server, client) = setup().await;
    mount_config(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
        .mount(&server)
        .await;

    let mut controller = loaded_controller(&client).await;
    let retained = controller.current().cloned();
    controller.form_mut().device = "/dev/sr9".into();

    let outcome = save(&client, &controller.build()).await;
    let alert = outcome.alert(&translator());

    assert_eq!(alert.level, AlertLevel::Error);
    assert!(alert.message.contains("disk full"), "alert: {}", alert.message);
    assert_eq!(controller.current().cloned(), retained);
    assert!(outcome.refetch_after().is_none());
}

// ── Save & restart ──────────────────────────────────────────────────

#[tokio::test]
async fn test_save_and_restart_success() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/restart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let saved = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&saved);
    let doc = SettingsController::new().build();

    let outcome = save_and_restart(&client, &doc, move || flag.store(true, Ordering::SeqCst)).await;

    assert_eq!(outcome, RestartOutcome::Restarting);
    assert!(saved.load(Ordering::SeqCst));
    assert_eq!(outcome.navigate_back_after(), Some(settings::NAVIGATE_BACK_DELAY));
}

#[tokio::test]
async fn test_save_failure_skips_restart() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "read-only fs" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/restart"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let saved = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&saved);
    let doc = SettingsController::new().build();

    let outcome = save_and_restart(&client, &doc, move || flag.store(true, Ordering::SeqCst)).await;

    assert_eq!(
        outcome,
        RestartOutcome::SaveFailed {
            detail: "read-only fs".into()
        }
    );
    assert!(!saved.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_restart_failure_is_reported() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/restart"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "systemctl not found" })),
        )
        .mount(&server)
        .await;

    let doc = SettingsController::new().build();
    let outcome = save_and_restart(&client, &doc, || {}).await;

    let alert = outcome.alert(&translator());
    assert_eq!(alert.level, AlertLevel::Error);
    assert!(alert.message.contains("systemctl not found"));
    assert_eq!(outcome.navigate_back_after(), None);
}
