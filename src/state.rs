use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{jwt::JwtKeys, password::PasswordHasher};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Connects to the database; an unreachable database is fatal.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Self::from_parts(db, config)
    }

    pub fn from_parts(db: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt);
        let hasher = PasswordHasher::new(config.password).context("argon2 parameters")?;
        Ok(Self {
            db,
            config: Arc::new(config),
            keys,
            hasher,
        })
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
