//! Message handler: validate one inbound webhook record, delegate to the
//! responder, and always produce exactly one non-empty outbound reply.
//!
//! The handler is error-opaque towards the delivery layer: every path ends in
//! a constructed [`OutboundMessage`], never an error.

use crate::llm::LlmBackend;
use crate::responder::Responder;

/// Reply when the inbound record carries no message body.
pub const EMPTY_INPUT_REPLY: &str = "Sorry, I didn't receive any message. Could you try again?";

/// Reply when the delegation itself misbehaves (safety net; the responder's
/// contract should make this unreachable).
pub const HANDLER_ERROR_REPLY: &str =
    "Sorry, an error occurred while processing your request. Please try again later.";

const LOG_BODY_MAX: usize = 120;

/// One inbound webhook record: sender id and optional message body.
/// Ephemeral; lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Sender identifier (e.g. "whatsapp:+5511999999999").
    pub sender: String,
    /// Message text; absent or empty yields the empty-input reply.
    pub body: Option<String>,
}

/// The reply to send back through the channel. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
}

/// Handle one inbound message. Empty or absent body short-circuits without
/// touching the responder; otherwise the responder's reply is passed through
/// unmodified. Never returns empty text.
pub async fn handle_message<B: LlmBackend>(
    responder: &Responder<B>,
    inbound: &InboundMessage,
) -> OutboundMessage {
    let body = inbound.body.as_deref().map(str::trim).unwrap_or("");
    if body.is_empty() {
        log::warn!("handler: empty message from {}", inbound.sender);
        return OutboundMessage {
            text: EMPTY_INPUT_REPLY.to_string(),
        };
    }

    log::info!(
        "handler: message from {}: {}",
        inbound.sender,
        truncate_for_log(body)
    );

    let reply = responder.reply(body).await;
    // The responder guarantees non-empty text; do not rely on it blindly.
    let text = if reply.trim().is_empty() {
        log::error!(
            "handler: error processing message from {}: responder returned empty text",
            inbound.sender
        );
        HANDLER_ERROR_REPLY.to_string()
    } else {
        reply
    };

    log::info!("handler: reply to {}: {}", inbound.sender, truncate_for_log(&text));
    OutboundMessage { text }
}

/// Cap a message body for log lines.
fn truncate_for_log(s: &str) -> String {
    if s.chars().count() <= LOG_BODY_MAX {
        s.to_string()
    } else {
        let cut: String = s.chars().take(LOG_BODY_MAX).collect();
        format!("{}…", cut)
    }
}
