use std::{env, path::PathBuf};

use anyhow::{Result, bail};
use tracing::{info, warn};

const DEFAULT_SECRET_KEY: &str = "dev-key-please-change";
const DEFAULT_SQLITE_PATH: &str = "data/app.db";
const DEFAULT_PORT: u16 = 8080;

/// Which relational backend the application talks to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseSettings {
    Sqlite { path: PathBuf },
    Postgres { url: String },
}

impl DatabaseSettings {
    pub fn is_sqlite(&self) -> bool {
        matches!(self, DatabaseSettings::Sqlite { .. })
    }

    /// Connection URL understood by the `sqlx` any driver.
    pub fn connection_url(&self) -> String {
        match self {
            DatabaseSettings::Sqlite { path } => {
                format!("sqlite://{}?mode=rwc", path.display())
            }
            DatabaseSettings::Postgres { url } => url.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub secret_key: String,
    pub database: DatabaseSettings,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = match lookup("SECRET_KEY").filter(|value| !value.trim().is_empty()) {
            Some(value) => value,
            None => {
                warn!("SECRET_KEY is not set; using the development key");
                DEFAULT_SECRET_KEY.to_string()
            }
        };

        let database = resolve_database(&lookup)?;

        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => bail!("PORT must be a valid port number, got {raw:?}"),
            },
            None => DEFAULT_PORT,
        };

        Ok(Self {
            secret_key,
            database,
            port,
        })
    }
}

fn resolve_database<F>(lookup: &F) -> Result<DatabaseSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let database_type = lookup("DATABASE_TYPE")
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "sqlite".to_string());
    let sqlite_path = lookup("SQLITE_DATABASE_PATH")
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

    match database_type.as_str() {
        "sqlite" => {
            info!(path = %sqlite_path, "using SQLite database");
            Ok(DatabaseSettings::Sqlite {
                path: PathBuf::from(sqlite_path),
            })
        }
        "postgres" | "postgresql" => match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty())
        {
            Some(url) => {
                info!("using PostgreSQL database");
                Ok(DatabaseSettings::Postgres {
                    url: normalize_postgres_url(&url),
                })
            }
            None => {
                warn!(
                    path = %sqlite_path,
                    "DATABASE_TYPE=postgres but DATABASE_URL is missing, falling back to SQLite"
                );
                Ok(DatabaseSettings::Sqlite {
                    path: PathBuf::from(sqlite_path),
                })
            }
        },
        other => bail!("unsupported DATABASE_TYPE {other:?}, expected sqlite or postgres"),
    }
}

/// Heroku-style `postgres://` URLs are rewritten to the `postgresql://` scheme.
fn normalize_postgres_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{rest}"),
        None => url.to_string(),
    }
}
