use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    auth::jwt::JwtKeys,
    config::{AppConfig, JwtConfig},
    store::{memory::MemoryStore, postgres::PgStore, HabitStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub habits: Arc<dyn HabitStore>,
    pub keys: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;

        let keys = JwtKeys::from_config(&config.jwt);
        let store = Arc::new(PgStore::new(pool));
        Ok(Self {
            users: store.clone(),
            habits: store,
            keys,
            config,
        })
    }

    /// State backed by the in-memory store, for unit tests.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: "postgres://localhost/unused".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_hours: 24,
            },
        });

        let keys = JwtKeys::from_config(&config.jwt);
        let store = Arc::new(MemoryStore::default());
        Self {
            users: store.clone(),
            habits: store,
            keys,
            config,
        }
    }
}
