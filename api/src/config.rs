use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default OpenWeatherMap endpoint root.
const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const DEFAULT_PORT: u16 = 8080;

/// Default upstream request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// OpenWeatherMap API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key. Blank keys are treated as absent.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration, parsed from environment variables.
///
/// `main` loads a local `.env` file first, so every key below may come from
/// either the process environment or that file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when `OPENWEATHER_KEY` is unset or blank.
    pub openweather_key: Option<ApiKey>,
    pub openweather_base_url: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            openweather_key: std::env::var("OPENWEATHER_KEY")
                .ok()
                .and_then(|raw| ApiKey::new(&raw)),
            openweather_base_url: std::env::var("OPENWEATHER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
            port: parse_setting("PORT", std::env::var("PORT").ok(), DEFAULT_PORT),
            request_timeout: Duration::from_secs(parse_setting(
                "REQUEST_TIMEOUT_SECS",
                std::env::var("REQUEST_TIMEOUT_SECS").ok(),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            log_format: match std::env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }
}

/// Parse a numeric setting, falling back to `default` when unset.
///
/// A value that is set but malformed aborts startup.
fn parse_setting<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a valid number, got {:?}", name, value)),
    }
}
