use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
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

const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];
const PREVIEW_ORIGIN_PREFIX: &str = "https://";
const PREVIEW_ORIGIN_SUFFIX: &str = ".netlify.app";
const DEFAULT_NARRATIVE_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_NARRATIVE_MODEL: &str = "gpt-4o-mini";
const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 25;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
    pub narrative: NarrativeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let database_path =
            env::var("APP_DATABASE_PATH").unwrap_or_else(|_| "whatif.db".to_string());
        let cors = CorsConfig::from_list(&env::var("APP_CORS_ORIGINS").unwrap_or_default());

        let timeout_secs = match env::var("APP_NARRATIVE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNarrativeTimeout)?,
            Err(_) => DEFAULT_NARRATIVE_TIMEOUT_SECS,
        };
        let narrative = NarrativeConfig {
            api_key: env::var("APP_NARRATIVE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("APP_NARRATIVE_MODEL")
                .unwrap_or_else(|_| DEFAULT_NARRATIVE_MODEL.to_string()),
            endpoint: env::var("APP_NARRATIVE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_NARRATIVE_ENDPOINT.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { database_path },
            cors,
            narrative,
        })
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

/// Where simulation runs are stored.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: String,
}

impl StorageConfig {
    pub fn is_in_memory(&self) -> bool {
        self.database_path.trim() == ":memory:"
    }
}

/// Browser origins allowed to call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

impl CorsConfig {
    /// Local dev origins first, then the comma separated extras, de-duplicated in order.
    pub fn from_list(raw: &str) -> Self {
        let mut origins: Vec<String> = Vec::new();
        let candidates = DEFAULT_CORS_ORIGINS
            .iter()
            .copied()
            .chain(raw.split(','))
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty());

        for origin in candidates {
            if !origins.iter().any(|known| known == origin) {
                origins.push(origin.to_string());
            }
        }

        Self { origins }
    }

    pub fn allows(&self, origin: &str) -> bool {
        if self.origins.iter().any(|known| known == origin) {
            return true;
        }

        origin
            .strip_prefix(PREVIEW_ORIGIN_PREFIX)
            .and_then(|rest| rest.strip_suffix(PREVIEW_ORIGIN_SUFFIX))
            .map(|subdomain| {
                !subdomain.is_empty() && !subdomain.contains(['/', ':', '@', '?', '#'])
            })
            .unwrap_or(false)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_list("")
    }
}

/// Optional prose-summary collaborator.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNarrativeTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNarrativeTimeout => write!(
                f,
                "APP_NARRATIVE_TIMEOUT_SECS must be a positive number of seconds"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNarrativeTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
