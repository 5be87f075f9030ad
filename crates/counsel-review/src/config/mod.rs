use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the review client and the reference backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub client: ClientConfig,
    pub review: ReviewConfig,
    pub backend: BackendConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        let timeout = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber { key: "API_TIMEOUT_SECS" })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        let page_limit = parse_number("REVIEW_PAGE_LIMIT", 20u32)?;
        if page_limit == 0 {
            return Err(ConfigError::InvalidNumber { key: "REVIEW_PAGE_LIMIT" });
        }
        let debounce_ms = parse_number("REVIEW_SEARCH_DEBOUNCE_MS", 300u64)?;

        let token_store = env::var("TOKEN_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".counsel-review/tokens.json"));

        let admin_token =
            env::var("BACKEND_ADMIN_TOKEN").unwrap_or_else(|_| "dev-admin-token".to_string());
        let couple_token =
            env::var("BACKEND_COUPLE_TOKEN").unwrap_or_else(|_| "dev-couple-token".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            client: ClientConfig {
                base_url,
                timeout,
                token_store,
            },
            review: ReviewConfig {
                page_limit,
                search_debounce: Duration::from_millis(debounce_ms),
            },
            backend: BackendConfig {
                admin_token,
                couple_token,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the review client sends requests and keeps its tokens.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` leaves the HTTP client default in place.
    pub timeout: Option<Duration>,
    pub token_store: PathBuf,
}

/// List view defaults shared by every review board.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub page_limit: u32,
    pub search_debounce: Duration,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            page_limit: 20,
            search_debounce: Duration::from_millis(300),
        }
    }
}

/// Tokens accepted by the reference backend when served locally.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub admin_token: String,
    pub couple_token: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
