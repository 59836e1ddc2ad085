//! Gateway HTTP server: health probe and the Twilio messaging webhook.

use crate::config::{self, Config};
use crate::handler::{handle_message, InboundMessage};
use crate::llm::GeminiClient;
use crate::persona::Persona;
use crate::responder::Responder;
use anyhow::{Context, Result};
use axum::{
    extract::{Form, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
struct GatewayState {
    config: Arc<Config>,
    responder: Arc<Responder<GeminiClient>>,
}

/// Run the webhook gateway until SIGINT/SIGTERM. Fails fast when the Gemini
/// API key is not configured; the per-request pipeline never sees a missing
/// credential.
pub async fn run_gateway(config: Config) -> Result<()> {
    let api_key = config::resolve_google_api_key(&config).context(
        "Gemini API key not configured; set GOOGLE_API_KEY or gemini.apiKey in the config file",
    )?;
    let client = GeminiClient::new(
        api_key,
        config.gemini.model.clone(),
        config.gemini.base_url.clone(),
    );
    log::info!("gateway: using model {}", client.model());
    let persona = Persona::from_config(&config.persona);
    let responder = Arc::new(Responder::new(client, persona));

    let state = GatewayState {
        config: Arc::new(config.clone()),
        responder,
    };

    let app = Router::new()
        .route("/", get(health_http))
        .route("/webhook", post(twilio_webhook))
        .with_state(state);

    let bind_addr = format!("{}:{}", config.gateway.bind, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// Twilio delivers messages as an x-www-form-urlencoded POST with `From` and `Body`.
#[derive(Debug, Deserialize)]
struct TwilioForm {
    #[serde(rename = "From", default)]
    from: Option<String>,
    #[serde(rename = "Body", default)]
    body: Option<String>,
}

/// POST /webhook — run the pipeline and answer with a TwiML envelope.
/// Always 200 with a non-empty message; the handler absorbs all failures.
async fn twilio_webhook(
    State(state): State<GatewayState>,
    Form(form): Form<TwilioForm>,
) -> Response {
    let inbound = InboundMessage {
        sender: form.from.unwrap_or_else(|| "unknown".to_string()),
        body: form.body,
    };
    let outbound = handle_message(state.responder.as_ref(), &inbound).await;
    let xml = crate::twiml::message_response(&outbound.text);
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

/// GET / returns a simple status JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    log::info!("gateway: health probe");
    Json(json!({
        "message": "Pharmacy bot is online and waiting for messages",
        "port": state.config.gateway.port,
    }))
}
