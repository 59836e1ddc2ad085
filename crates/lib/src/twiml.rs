//! TwiML reply envelope for Twilio messaging webhooks.
//!
//! Twilio expects an XML document in the webhook response body:
//! `<Response><Message>…</Message></Response>`.

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Wrap a reply text in a TwiML `<Response><Message>` envelope, XML-escaped.
pub fn message_response(text: &str) -> String {
    format!(
        "{}<Response><Message>{}</Message></Response>",
        XML_HEADER,
        htmlescape::encode_minimal(text)
    )
}
