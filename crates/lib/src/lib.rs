//! Botica core library — config, persona, Gemini client, responder,
//! message handler, and the webhook gateway used by the CLI.

pub mod config;
pub mod gateway;
pub mod handler;
pub mod init;
pub mod llm;
pub mod persona;
pub mod responder;
pub mod twiml;
