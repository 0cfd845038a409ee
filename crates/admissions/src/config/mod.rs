use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::applications::XiiMaximum;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub scoring: ScoringConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            store: StoreConfig::from_env()?,
            scoring: ScoringConfig::from_env()?,
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

/// Where application documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-process store, optionally seeded from a JSON fixture.
    Memory { fixture: Option<PathBuf> },
    Firestore(FirestoreConfig),
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env::var("ADMISSIONS_STORE").unwrap_or_else(|_| "memory".to_string());
        match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreConfig::Memory {
                fixture: non_empty_var("ADMISSIONS_FIXTURE").map(PathBuf::from),
            }),
            "firestore" => {
                let project_id = non_empty_var("FIRESTORE_PROJECT_ID")
                    .ok_or(ConfigError::MissingVar("FIRESTORE_PROJECT_ID"))?;
                Ok(StoreConfig::Firestore(FirestoreConfig {
                    project_id,
                    collection: non_empty_var("FIRESTORE_COLLECTION")
                        .unwrap_or_else(|| "admission_application".to_string()),
                    base_url: non_empty_var("FIRESTORE_BASE_URL")
                        .unwrap_or_else(|| "https://firestore.googleapis.com".to_string()),
                    api_key: non_empty_var("FIRESTORE_API_KEY"),
                    bearer_token: non_empty_var("FIRESTORE_BEARER_TOKEN"),
                }))
            }
            _ => Err(ConfigError::InvalidStore(backend)),
        }
    }
}

/// Connection settings for the Firestore REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub collection: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

impl fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("collection", &self.collection)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Scoring and audit knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub xii_maximum: XiiMaximum,
    pub id_prefix: String,
}

impl ScoringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let xii_maximum = match non_empty_var("ADMISSIONS_XII_MAXIMUM") {
            None => XiiMaximum::Declared,
            Some(raw) if raw.trim().eq_ignore_ascii_case("declared") => XiiMaximum::Declared,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => XiiMaximum::Fixed(value),
                _ => return Err(ConfigError::InvalidXiiMaximum(raw)),
            },
        };

        Ok(Self {
            xii_maximum,
            id_prefix: non_empty_var("ADMISSIONS_ID_PREFIX")
                .unwrap_or_else(|| "CRML-2025".to_string()),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStore(String),
    MissingVar(&'static str),
    InvalidXiiMaximum(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStore(value) => write!(
                f,
                "ADMISSIONS_STORE must be 'memory' or 'firestore', got '{value}'"
            ),
            ConfigError::MissingVar(key) => write!(f, "{key} must be set"),
            ConfigError::InvalidXiiMaximum(value) => write!(
                f,
                "ADMISSIONS_XII_MAXIMUM must be 'declared' or a positive number, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStore(_)
            | ConfigError::MissingVar(_)
            | ConfigError::InvalidXiiMaximum(_) => None,
        }
    }
}
