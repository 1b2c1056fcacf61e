use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use argon2::Argon2;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::{
    Any, AnyPool, Executor, Transaction,
    any::{AnyPoolOptions, install_default_drivers},
    migrate::Migrator,
};
use tracing::info;

use crate::config::{AppConfig, DatabaseSettings};

static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");
static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

const COOKIE_KEY_SALT: &[u8] = b"corporate-site/cookie-key";
const MAX_CONNECTIONS: u32 = 10;

/// Everything a request handler needs: the connection pool, the cookie
/// signing key and the password hasher.
#[derive(Clone)]
pub struct AppState {
    pool: AnyPool,
    cookie_key: Key,
    hasher: Argon2<'static>,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        if let DatabaseSettings::Sqlite { path } = &config.database {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let pool = connect_pool(&config.database, MAX_CONNECTIONS).await?;
        run_migrations(&pool, &config.database).await?;

        let cookie_key = derive_cookie_key(&config.secret_key)?;

        Ok(Self {
            pool,
            cookie_key,
            hasher: Argon2::default(),
        })
    }

    pub fn pool_ref(&self) -> &AnyPool {
        &self.pool
    }

    /// Open a unit-of-work; dropping it without `commit` rolls back.
    pub async fn begin(&self) -> sqlx::Result<Transaction<'static, Any>> {
        self.pool.begin().await
    }

    pub fn password_hasher(&self) -> &Argon2<'static> {
        &self.hasher
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

async fn connect_pool(settings: &DatabaseSettings, max_connections: u32) -> Result<AnyPool> {
    install_default_drivers();

    let enable_foreign_keys = settings.is_sqlite();
    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                if enable_foreign_keys {
                    conn.execute("PRAGMA foreign_keys = ON").await?;
                }
                Ok(())
            })
        })
        .connect(&settings.connection_url())
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

async fn run_migrations(pool: &AnyPool, settings: &DatabaseSettings) -> Result<()> {
    let migrator = match settings {
        DatabaseSettings::Sqlite { .. } => &SQLITE_MIGRATOR,
        DatabaseSettings::Postgres { .. } => &POSTGRES_MIGRATOR,
    };

    migrator
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    info!("database migrations applied");

    Ok(())
}

/// Stretch `SECRET_KEY` into the 64 bytes of key material cookie signing needs.
fn derive_cookie_key(secret: &str) -> Result<Key> {
    let mut material = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), COOKIE_KEY_SALT, &mut material)
        .map_err(|err| anyhow!("failed to derive cookie key: {err}"))?;
    Ok(Key::from(&material))
}

/// Argon2 with the smallest legal cost, so tests do not spend seconds hashing.
#[cfg(test)]
pub fn test_password_hasher() -> Argon2<'static> {
    let params = argon2::Params::new(argon2::Params::MIN_M_COST, 1, 1, None)
        .expect("minimal argon2 params are valid");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

#[cfg(test)]
impl AppState {
    /// Fresh in-memory SQLite database with the schema applied.
    pub async fn in_memory() -> Self {
        // A single connection that never recycles keeps the in-memory database alive.
        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("PRAGMA foreign_keys = ON").await?;
                    Ok(())
                })
            })
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite connects");
        SQLITE_MIGRATOR
            .run(&pool)
            .await
            .expect("migrations apply to in-memory sqlite");

        Self {
            pool,
            cookie_key: Key::generate(),
            hasher: test_password_hasher(),
        }
    }
}
