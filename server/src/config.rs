use std::env;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "http://data.fixer.io/api";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base of the echo URLs returned to callers.
    pub public_url: String,
    pub provider_url: String,
    pub provider_access_key: Option<String>,
    pub upstream_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        load_dotenv_layers();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let host = read_optional_string(&lookup, "RATES_HOST", "127.0.0.1");
        let port = match lookup("RATES_PORT") {
            Some(v) => v.parse::<u16>().map_err(|e| format!("invalid RATES_PORT: {e}"))?,
            None => 8080,
        };
        let public_url = lookup("RATES_PUBLIC_URL").unwrap_or_else(|| format!("http://{host}:{port}/api"));
        let timeout_seconds = read_optional_u64(&lookup, "RATES_UPSTREAM_TIMEOUT_SECONDS", 10)?;
        if timeout_seconds == 0 {
            return Err("invalid RATES_UPSTREAM_TIMEOUT_SECONDS: must be at least 1".to_string());
        }
        let log_format = match lookup("RATES_LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) => return Err(format!("invalid RATES_LOG_FORMAT: {v}")),
            None => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            public_url,
            provider_url: read_optional_string(&lookup, "RATES_PROVIDER_URL", DEFAULT_PROVIDER_URL),
            provider_access_key: lookup("RATES_PROVIDER_ACCESS_KEY").filter(|k| !k.trim().is_empty()),
            upstream_timeout: Duration::from_secs(timeout_seconds),
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_optional_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64, String> {
    match lookup(key) {
        Some(v) => v.parse::<u64>().map_err(|e| format!("invalid {key}: {e}")),
        None => Ok(default),
    }
}

fn read_optional_string(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn load_dotenv_layers() {
    for path in [".env", "../.env"] {
        let _ = dotenvy::from_path_override(path);
    }
}
