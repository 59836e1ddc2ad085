//! Webhook HTTP server: Twilio inbound messages in, TwiML replies out.

mod server;

pub use server::run_gateway;
