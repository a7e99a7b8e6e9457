use chrono_tz::Tz;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
    pub enable_swagger: bool,
}

/// Attendance session settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// How long a freshly issued code stays valid.
    pub validity_minutes: i64,
    /// IANA zone used when rendering `formatted_expires_at`.
    pub display_timezone: Tz,
    /// Minimum width/height of the rendered QR SVG, in pixels.
    pub qr_min_dimension: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/roll_call".to_string(),
            max_connections: 16,
            min_connections: 2,
            acquire_timeout: 5,
            run_migrations: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            enable_swagger: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validity_minutes: 5,
            display_timezone: Tz::UTC,
            qr_min_dimension: 400,
        }
    }
}

impl SessionConfig {
    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.validity_minutes)
    }

    fn validate(&self) -> Result<(), figment::Error> {
        if self.validity_minutes <= 0 {
            return Err(figment::Error::from(format!(
                "session.validity_minutes must be positive, got {}",
                self.validity_minutes
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. RollCall.toml (base configuration file)
    /// 2. Environment variables (prefixed with ROLLCALL_, `__` between sections,
    ///    e.g. ROLLCALL_SESSION__VALIDITY_MINUTES)
    /// 3. DATABASE_URL environment variable
    ///
    /// An unknown display time zone or a non-positive validity window is a load error.
    pub fn load() -> Result<Self, figment::Error> {
        let config: Config = Self::figment().extract()?;
        config.session.validate()?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("RollCall.toml").nested())
            .merge(Env::prefixed("ROLLCALL_").split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
    }
}
