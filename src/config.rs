//! Runtime settings: compiled defaults, overridable via `CHATBRIDGE_*`
//! environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "chatbridge";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 1.0;
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SECRET_NAME: &str = "prod/api/key/chatgpt";
const DEFAULT_SECRET_KEY: &str = "api-key-chatgpt";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info")
}

/// Application data directory, `~/.chatbridge/`.
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".chatbridge")
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub secrets_dir: PathBuf,
    pub secret_name: String,
    pub secret_key: String,
    pub completions_url: String,
    pub model: String,
    pub temperature: f32,
    pub chat_timeout_secs: u64,
}

impl Settings {
    /// Settings from the environment, falling back to compiled defaults.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("CHATBRIDGE_ADDR", DEFAULT_BIND_ADDR)
                .parse()
                .expect("Invalid CHATBRIDGE_ADDR"),
            database_path: std::env::var("CHATBRIDGE_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| app_data_dir().join("conversations.db")),
            secrets_dir: std::env::var("CHATBRIDGE_SECRETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| app_data_dir().join("secrets")),
            secret_name: env_or("CHATBRIDGE_SECRET_NAME", DEFAULT_SECRET_NAME),
            secret_key: env_or("CHATBRIDGE_SECRET_KEY", DEFAULT_SECRET_KEY),
            completions_url: env_or("CHATBRIDGE_COMPLETIONS_URL", DEFAULT_COMPLETIONS_URL),
            model: env_or("CHATBRIDGE_MODEL", DEFAULT_MODEL),
            temperature: std::env::var("CHATBRIDGE_TEMPERATURE")
                .ok()
                .map(|v| v.parse().expect("Invalid CHATBRIDGE_TEMPERATURE"))
                .unwrap_or(DEFAULT_TEMPERATURE),
            chat_timeout_secs: std::env::var("CHATBRIDGE_CHAT_TIMEOUT_SECS")
                .ok()
                .map(|v| v.parse().expect("Invalid CHATBRIDGE_CHAT_TIMEOUT_SECS"))
                .unwrap_or(DEFAULT_CHAT_TIMEOUT_SECS),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
