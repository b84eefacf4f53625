use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub max_connections: u32,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    /// Address the HTTP listener binds to
    pub url: String,
    pub stage: String,
}

/// Where the document store lives
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    /// `DATABASE_URL`
    Url(String),
    /// Discrete `PG_*` settings
    Postgres(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
    pub ssl_mode: String,
    pub schema: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load an explicit env file first, then read the environment
    pub fn from_env_file(path: &Path) -> Result<Self> {
        if let Err(e) = dotenvy::from_path(path) {
            tracing::warn!(path = %path.display(), error = %e, "Env file not loaded, using process environment only");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = match (var("DATABASE_URL"), var("PG_HOST")) {
            (Some(url), _) => DatabaseConfig::Url(url),
            (None, Some(host)) => DatabaseConfig::Postgres(PostgresConfig {
                host,
                port: var("PG_PORT")
                    .unwrap_or_else(|| "5432".to_string())
                    .parse()
                    .context("PG_PORT must be a valid port number")?,
                user: var("PG_USER").unwrap_or_else(|| "postgres".to_string()),
                password: var("PG_PASSWORD").unwrap_or_default(),
                db_name: var("PG_DBNAME").unwrap_or_else(|| "postgres".to_string()),
                ssl_mode: var("PG_SSLMODE").unwrap_or_else(|| "prefer".to_string()),
                schema: var("PG_SCHEMA"),
            }),
            (None, None) => bail!("DATABASE_URL or PG_HOST must be set"),
        };

        Ok(Self {
            app: AppConfig {
                name: var("APP_NAME").unwrap_or_else(|| "doc".to_string()),
                url: var("APP_URL").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
                stage: var("APP_STAGE").unwrap_or_else(|| "local".to_string()),
            },
            database,
            max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            request_timeout: Duration::from_secs(
                var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),
        })
    }

    /// Connection options for the document store pool
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match &self.database {
            DatabaseConfig::Url(url) => {
                PgConnectOptions::from_str(url).context("DATABASE_URL is not a valid Postgres URL")
            }
            DatabaseConfig::Postgres(pg) => {
                let ssl_mode = PgSslMode::from_str(&pg.ssl_mode)
                    .with_context(|| format!("PG_SSLMODE '{}' is not recognised", pg.ssl_mode))?;

                let mut options = PgConnectOptions::new()
                    .host(&pg.host)
                    .port(pg.port)
                    .username(&pg.user)
                    .password(&pg.password)
                    .database(&pg.db_name)
                    .ssl_mode(ssl_mode);

                if let Some(schema) = &pg.schema {
                    options = options.options([("search_path", schema.as_str())]);
                }

                Ok(options)
            }
        }
    }
}
