use std::path::PathBuf;

use countryfx_sources::client::{DEFAULT_COUNTRIES_API_URL, DEFAULT_EXCHANGE_API_URL};
use countryfx_sources::SourceConfig;

/// Deployment mode, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Parse an `APP_ENV` value. Anything other than `production`/`prod`
    /// (case-insensitive) is development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
        }
    }
}

/// Individual database connection settings, used when `DATABASE_URL` is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
}

impl DatabaseSettings {
    /// Build a `postgres://` connection URL.
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.name
            )
        } else {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            )
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Development enables verbose request logging and error detail in
    /// 500 responses.
    pub env: AppEnv,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,
    /// Upstream endpoints.
    pub sources: SourceConfig,
    /// Directory holding the cached summary image.
    pub cache_dir: PathBuf,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `3000`                           |
    /// | `APP_ENV`              | `development`                    |
    /// | `DATABASE_URL`         | built from `DB_*`                |
    /// | `DB_HOST`              | `localhost`                      |
    /// | `DB_USER`              | `postgres`                       |
    /// | `DB_PASSWORD`          | (empty)                          |
    /// | `DB_NAME`              | `country_currency_db`            |
    /// | `DB_PORT`              | `5432`                           |
    /// | `DB_MAX_CONNECTIONS`   | `10`                             |
    /// | `COUNTRIES_API_URL`    | restcountries v2 `all` endpoint  |
    /// | `EXCHANGE_API_URL`     | open.er-api.com USD endpoint     |
    /// | `CACHE_DIR`            | `cache`                          |
    /// | `CORS_ORIGINS`         | `*`                              |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                             |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let env = AppEnv::parse(&env_or("APP_ENV", "development"));

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            DatabaseSettings {
                host: env_or("DB_HOST", "localhost"),
                user: env_or("DB_USER", "postgres"),
                password: env_or("DB_PASSWORD", ""),
                name: env_or("DB_NAME", "country_currency_db"),
                port: env_or("DB_PORT", "5432")
                    .parse()
                    .expect("DB_PORT must be a valid u16"),
            }
            .url()
        });

        let db_max_connections: u32 = env_or(
            "DB_MAX_CONNECTIONS",
            &countryfx_db::DEFAULT_MAX_CONNECTIONS.to_string(),
        )
        .parse()
        .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let sources = SourceConfig {
            countries_url: env_or("COUNTRIES_API_URL", DEFAULT_COUNTRIES_API_URL),
            exchange_url: env_or("EXCHANGE_API_URL", DEFAULT_EXCHANGE_API_URL),
        };

        let cache_dir = PathBuf::from(env_or("CACHE_DIR", "cache"));

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "60")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            env,
            database_url,
            db_max_connections,
            sources,
            cache_dir,
            cors_origins,
            request_timeout_secs,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
