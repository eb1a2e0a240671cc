use crate::config::AppConfig;
use crate::entries::{FoodLog, PgFoodLog};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub food_log: Arc<dyn FoodLog>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let food_log = Arc::new(PgFoodLog::new(db.clone())) as Arc<dyn FoodLog>;

        Ok(Self {
            db,
            config,
            food_log,
        })
    }

    /// State over a pool that never connects, for unit tests.
    #[cfg(test)]
    pub fn fake(food_log: Arc<dyn FoodLog>) -> Self {
        let config = Arc::new(AppConfig::for_tests());
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool ok");

        Self {
            db,
            config,
            food_log,
        }
    }
}
