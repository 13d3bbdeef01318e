//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use folio_core::greeting::DEFAULT_GREETING_REPLY;
use folio_upstream::{GenerationConfig, KeyPlacement};

pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Portfolio chat proxy for a generative-language API.
///
/// Every flag can also be set through the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "folio", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "FOLIO_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5173)]
    pub port: u16,

    /// Upstream API key. Without it the service starts but chat requests fail.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream `generateContent` endpoint.
    #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// `AUTHORIZATION` sends the key as a bearer token; otherwise `X-goog-api-key` is used.
    #[arg(long, env = "GEMINI_API_KEY_HEADER")]
    pub api_key_header: Option<String>,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Sampling temperature forwarded upstream.
    #[arg(long, env = "GEMINI_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Output token cap forwarded upstream.
    #[arg(long, env = "GEMINI_MAX_OUTPUT_TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Canned reply for bare greetings.
    #[arg(long, env = "GREETING_REPLY", default_value = DEFAULT_GREETING_REPLY)]
    pub greeting_reply: String,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn key_placement(&self) -> KeyPlacement {
        KeyPlacement::from_setting(self.api_key_header.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn generation_config(&self) -> Option<GenerationConfig> {
        GenerationConfig::from_settings(self.temperature, self.max_output_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["folio"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags() {
        let config = parse(&[
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--api-key",
            "k",
            "--api-key-header",
            "AUTHORIZATION",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(config.addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api_key(), Some("k"));
        assert_eq!(config.key_placement(), KeyPlacement::Bearer);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = parse(&["--api-key", "   "]);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn generation_config_only_when_set() {
        let config = parse(&["--temperature", "0.2", "--max-output-tokens", "128"]);
        let generation = config.generation_config().unwrap();
        assert_eq!(generation.temperature, Some(0.2));
        assert_eq!(generation.max_output_tokens, Some(128));
    }

    #[test]
    fn invalid_port_rejected() {
        assert!(Config::try_parse_from(["folio", "--port", "70000"]).is_err());
    }
}
