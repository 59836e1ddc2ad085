//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.botica/config.json`) and environment.
//! Kept minimal: gateway bind/port, Gemini credentials, and the persona facts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Gemini API settings (credential, model, base URL).
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Pharmacy facts the persona may recite.
    #[serde(default)]
    pub persona: PersonaConfig,
}

/// Gateway bind and port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the webhook HTTP server (default 8000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8000
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Gemini API config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiConfig {
    /// API key for the Generative Language API. Overridden by GOOGLE_API_KEY env when set.
    pub api_key: Option<String>,
    /// Model id (e.g. "gemini-1.5-flash"). Default applied by the client when absent.
    pub model: Option<String>,
    /// Base URL override (e.g. a local stub in tests). Default is the public API endpoint.
    pub base_url: Option<String>,
}

/// Resolve the Gemini API key: env GOOGLE_API_KEY overrides config.
pub fn resolve_google_api_key(config: &Config) -> Option<String> {
    std::env::var("GOOGLE_API_KEY")
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .gemini
                .api_key
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Pharmacy facts rendered into the persona instruction. All fields have
/// built-in defaults so an empty config file still yields a working bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaConfig {
    /// Display name of the pharmacy.
    #[serde(default = "default_pharmacy_name")]
    pub pharmacy_name: String,
    /// Opening hours, as recited to customers.
    #[serde(default = "default_hours")]
    pub hours: String,
    /// Street address.
    #[serde(default = "default_address")]
    pub address: String,
    /// Contact phone number.
    #[serde(default = "default_phone")]
    pub phone: String,
    /// How customers submit prescriptions and orders (e.g. this WhatsApp number).
    #[serde(default = "default_order_channels")]
    pub order_channels: String,
    /// Product categories the assistant may mention.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_pharmacy_name() -> String {
    "Vida Pharmacy".to_string()
}

fn default_hours() -> String {
    "Monday to Saturday, 8am to 6pm".to_string()
}

fn default_address() -> String {
    "123 Flores Avenue, Downtown".to_string()
}

fn default_phone() -> String {
    "+55 11 4000-1234".to_string()
}

fn default_order_channels() -> String {
    "prescriptions and orders can be sent as a photo or text through this WhatsApp number"
        .to_string()
}

fn default_categories() -> Vec<String> {
    [
        "prescription medicines",
        "over-the-counter medicines",
        "dermocosmetics",
        "hygiene and personal care",
        "vitamins and supplements",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            pharmacy_name: default_pharmacy_name(),
            hours: default_hours(),
            address: default_address(),
            phone: default_phone(),
            order_channels: default_order_channels(),
            categories: default_categories(),
        }
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("BOTICA_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".botica").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the default path (or BOTICA_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 8000);
        assert_eq!(g.bind, "127.0.0.1");
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config: Config = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.gateway.port, 8000);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.persona.pharmacy_name, "Vida Pharmacy");
        assert!(!config.persona.categories.is_empty());
    }

    #[test]
    fn gemini_section_camel_case() {
        let config: Config = serde_json::from_str(
            r#"{"gemini":{"apiKey":"k","model":"gemini-1.5-pro","baseUrl":"http://127.0.0.1:1"}}"#,
        )
        .expect("parse");
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
        assert_eq!(config.gemini.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.gemini.base_url.as_deref(), Some("http://127.0.0.1:1"));
    }

    #[test]
    fn api_key_from_config_when_env_unset() {
        let mut config = Config::default();
        config.gemini.api_key = Some("  from-config  ".to_string());
        if std::env::var("GOOGLE_API_KEY").is_err() {
            assert_eq!(
                resolve_google_api_key(&config).as_deref(),
                Some("from-config")
            );
        }
    }
}
