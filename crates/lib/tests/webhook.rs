//! Integration tests: start the gateway on a free port with the Gemini base
//! URL pointed at a local stub, then exercise the health probe and the
//! webhook (empty body, successful generation, failing backend).
//! No real Gemini credentials or network access required.

use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use lib::config::Config;
use lib::gateway;
use lib::handler::EMPTY_INPUT_REPLY;
use lib::responder::GENERATION_FALLBACK;
use serde_json::json;
use std::time::Duration;

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

/// Stub Gemini API: any POST answers with a fixed generateContent payload.
async fn start_gemini_stub(reply: &'static str) -> u16 {
    let app = Router::new().fallback(move || async move {
        Json(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": reply}]}}
            ]
        }))
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let port = listener.local_addr().expect("local_addr").port();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    port
}

/// Stub Gemini API that always fails with 500.
async fn start_failing_gemini_stub() -> u16 {
    let app = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let port = listener.local_addr().expect("local_addr").port();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    port
}

fn gateway_config(port: u16, stub_port: u16) -> Config {
    let mut config = Config::default();
    config.gateway.port = port;
    config.gateway.bind = "127.0.0.1".to_string();
    config.gemini.api_key = Some(format!("test-key-{}", uuid::Uuid::new_v4()));
    config.gemini.base_url = Some(format!("http://127.0.0.1:{}", stub_port));
    config
}

async fn start_gateway(config: Config) {
    tokio::spawn(async move {
        let _ = gateway::run_gateway(config).await;
    });
}

/// Poll GET / until the gateway answers, or panic after ~5s.
async fn wait_until_up(port: u16) {
    let url = format!("http://127.0.0.1:{}/", port);
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway on port {} did not come up within 5s", port);
}

async fn post_webhook(port: u16, form: &[(&str, &str)]) -> (StatusCode, Option<String>, String) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/webhook", port))
        .form(form)
        .send()
        .await
        .expect("post webhook");
    let status = StatusCode::from_u16(resp.status().as_u16()).expect("status");
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = resp.text().await.expect("read body");
    (status, content_type, body)
}

#[tokio::test]
async fn health_endpoint_reports_online() {
    let port = free_port();
    let stub_port = start_gemini_stub("unused").await;
    start_gateway(gateway_config(port, stub_port)).await;
    wait_until_up(port).await;

    let resp = reqwest::get(format!("http://127.0.0.1:{}/", port))
        .await
        .expect("get health");
    assert!(resp.status().is_success());
    let json: serde_json::Value = resp.json().await.expect("parse JSON");
    assert_eq!(
        json.get("message").and_then(|v| v.as_str()),
        Some("Pharmacy bot is online and waiting for messages")
    );
    assert_eq!(json.get("port").and_then(|v| v.as_u64()), Some(port as u64));
}

#[tokio::test]
async fn webhook_replies_with_model_text_in_twiml() {
    let port = free_port();
    let stub_port = start_gemini_stub("Das 8h às 18h.").await;
    start_gateway(gateway_config(port, stub_port)).await;
    wait_until_up(port).await;

    let (status, content_type, body) = post_webhook(
        port,
        &[
            ("From", "whatsapp:+5511999999999"),
            ("Body", "Qual o horário de funcionamento?"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/xml"));
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(body.contains("<Response><Message>Das 8h às 18h.</Message></Response>"));
}

#[tokio::test]
async fn webhook_empty_body_yields_empty_input_reply() {
    let port = free_port();
    let stub_port = start_gemini_stub("unused").await;
    start_gateway(gateway_config(port, stub_port)).await;
    wait_until_up(port).await;

    let (status, _content_type, body) =
        post_webhook(port, &[("From", "whatsapp:+5511999999999"), ("Body", "")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!(
        "<Message>{}</Message>",
        htmlescape::encode_minimal(EMPTY_INPUT_REPLY)
    )));
}

#[tokio::test]
async fn webhook_absent_body_yields_empty_input_reply() {
    let port = free_port();
    let stub_port = start_gemini_stub("unused").await;
    start_gateway(gateway_config(port, stub_port)).await;
    wait_until_up(port).await;

    let (status, _content_type, body) =
        post_webhook(port, &[("From", "whatsapp:+5511999999999")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!(
        "<Message>{}</Message>",
        htmlescape::encode_minimal(EMPTY_INPUT_REPLY)
    )));
}

#[tokio::test]
async fn webhook_backend_failure_yields_generation_fallback() {
    let port = free_port();
    let stub_port = start_failing_gemini_stub().await;
    start_gateway(gateway_config(port, stub_port)).await;
    wait_until_up(port).await;

    let (status, _content_type, body) =
        post_webhook(port, &[("From", "whatsapp:+5511999999999"), ("Body", "oi")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!(
        "<Message>{}</Message>",
        htmlescape::encode_minimal(GENERATION_FALLBACK)
    )));
}
