//! Delivery tests against mock HTTP endpoints.

use chrono::{TimeZone, Utc};
use fieldhook_core::{
    Coordinates, IconPatterns, ParamValue, ParseMode, PatternIconResolver, PlaintextCredentials, PoiSnapshot,
    Reporter, ReporterKind, ResearchDescriptor, StaticGeofences, TelegramOptions, WebhookTarget,
};
use fieldhook_dispatch::{DispatchConfig, Dispatcher};
use fieldhook_research::{builtin_translations, ResearchCatalog};
use fieldhook_template::RenderEnv;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher(config: DispatchConfig) -> Dispatcher {
    let env = RenderEnv::new(
        Arc::new(builtin_translations().unwrap()),
        Arc::new(PatternIconResolver::new("https://map.example.com", IconPatterns::default())),
        Arc::new(ResearchCatalog::builtin().unwrap()),
    )
    .with_site_url("https://map.example.com/");
    Dispatcher::new(
        Arc::new(env),
        Arc::new(StaticGeofences::new()),
        Arc::new(PlaintextCredentials),
        config,
    )
}

fn event() -> fieldhook_core::ResearchEvent {
    fieldhook_core::ResearchEvent {
        reporter: Reporter::new("brock", ReporterKind::Api),
        poi: PoiSnapshot {
            id: Some("12".to_string()),
            name: "Old Mill".to_string(),
            location: Coordinates::new(59.9, 10.7),
            objective: ResearchDescriptor::new("spin_pokestop").with_param("quantity", 10),
            reward: ResearchDescriptor::new("encounter").with_param("species", ParamValue::list([133])),
        },
        reported_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
    }
}

// ============================================================================
// Generic webhooks
// ============================================================================

#[tokio::test]
async fn test_generic_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(header_exists("content-length"))
        .and(body_string(r#"{"poi":"Old Mill","by":"brock"}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let target = WebhookTarget::generic(
        "hook",
        format!("{}/hook", server.uri()),
        r#"{"poi":"<%POI%>","by":"<%REPORTER%>"}"#,
    );
    let report = dispatcher(DispatchConfig::default()).dispatch(&[target], &event()).await;

    assert_eq!(report.considered, 1);
    assert_eq!(report.eligible, 1);
    assert_eq!(report.delivered, vec!["hook"]);
    assert!(report.all_delivered());
}

#[tokio::test]
async fn test_error_status_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let target = WebhookTarget::generic("broken", server.uri(), "{}");
    let report = dispatcher(DispatchConfig::default()).dispatch(&[target], &event()).await;

    assert!(report.delivered.is_empty());
    assert_eq!(report.failed, vec![("broken".to_string(), "STATUS/500".to_string())]);
}

#[tokio::test]
async fn test_failure_does_not_stop_later_targets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let targets = vec![
        WebhookTarget::generic("unreachable", "http://127.0.0.1:1/", "{}"),
        WebhookTarget::generic("second", format!("{}/second", server.uri()), "{}"),
    ];
    let report = dispatcher(DispatchConfig::default()).dispatch(&targets, &event()).await;

    assert_eq!(report.delivered, vec!["second"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "unreachable");
    assert!(report.failed[0].1.starts_with("TRANSPORT/"));
}

#[tokio::test]
async fn test_ineligible_targets_are_not_contacted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let hatch_only = fieldhook_core::ResearchFilter::whitelist(vec![ResearchDescriptor::new("hatch")]);
    let targets = vec![
        WebhookTarget::generic("off", server.uri(), "{}").inactive(),
        WebhookTarget::generic("hatch", server.uri(), "{}").with_objectives(hatch_only),
        WebhookTarget::generic("fenced", server.uri(), "{}").with_geofence("nowhere"),
    ];
    let report = dispatcher(DispatchConfig::default()).dispatch(&targets, &event()).await;

    assert_eq!(report.considered, 3);
    assert_eq!(report.eligible, 0);
    assert!(report.delivered.is_empty());
    assert!(report.failed.is_empty());
}

// ============================================================================
// Telegram
// ============================================================================

#[tokio::test]
async fn test_telegram_send_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({
            "chat_id": "-100500",
            "text": "*Old Mill*: Spin 10 PokéStops",
            "disable_web_page_preview": false,
            "disable_notification": true,
            "parse_mode": "Markdown"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let options = TelegramOptions {
        parse_mode: ParseMode::Markdown,
        disable_web_page_preview: false,
        disable_notification: true,
        bot_token: "123:abc".to_string(),
    };
    let target = WebhookTarget::telegram("tg", "tg://send?to=-100500", "*<%POI%>*: <%OBJECTIVE%>", options);
    let config = DispatchConfig {
        telegram_api_base: server.uri(),
        ..DispatchConfig::default()
    };
    let report = dispatcher(config).dispatch(&[target], &event()).await;

    assert_eq!(report.delivered, vec!["tg"]);
}

#[tokio::test]
async fn test_telegram_without_chat_id_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let target = WebhookTarget::telegram("tg", "tg://send?to=@channel", "x", TelegramOptions::default());
    let config = DispatchConfig {
        telegram_api_base: server.uri(),
        ..DispatchConfig::default()
    };
    let report = dispatcher(config).dispatch(&[target], &event()).await;

    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].1.starts_with("INVALID_TARGET/"));
}

#[tokio::test]
async fn test_transport_failure_hides_bot_token() {
    let options = TelegramOptions {
        bot_token: "999999:SECRET_BOT_TOKEN".to_string(),
        ..TelegramOptions::default()
    };
    let target = WebhookTarget::telegram("tg", "tg://send?to=-100500", "<%POI%>", options);
    let config = DispatchConfig {
        telegram_api_base: "http://127.0.0.1:1".to_string(),
        ..DispatchConfig::default()
    };
    let report = dispatcher(config).dispatch(&[target], &event()).await;

    assert_eq!(report.failed.len(), 1);
    let (id, reason) = &report.failed[0];
    assert_eq!(id, "tg");
    assert!(reason.starts_with("TRANSPORT/"));
    assert!(!reason.contains("SECRET_BOT_TOKEN"));
}
