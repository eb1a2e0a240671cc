use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::entries::repo_types::{DailyTotal, FoodEntry};

/// Read side of the food log used by the dashboard.
#[async_trait]
pub trait FoodLog: Send + Sync {
    /// Entries of `user_id` on `day`, ordered by time of day.
    async fn entries_on(&self, user_id: Uuid, day: Date) -> anyhow::Result<Vec<FoodEntry>>;

    /// Calorie sums per day for `user_id` within `[from, to]`, ascending by day.
    /// Days without entries are absent.
    async fn daily_totals(
        &self,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<DailyTotal>>;

    /// Target stored on the user's profile, if any.
    async fn target_calories(&self, user_id: Uuid) -> anyhow::Result<Option<i32>>;
}

#[derive(Clone)]
pub struct PgFoodLog {
    db: PgPool,
}

impl PgFoodLog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodLog for PgFoodLog {
    async fn entries_on(&self, user_id: Uuid, day: Date) -> anyhow::Result<Vec<FoodEntry>> {
        let rows = sqlx::query_as::<_, FoodEntry>(
            r#"
            SELECT id, user_id, name, date, time, calories
              FROM food_entries
             WHERE user_id = $1 AND date = $2
             ORDER BY time ASC
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_all(&self.db)
        .await
        .context("list food entries by day")?;
        Ok(rows)
    }

    async fn daily_totals(
        &self,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<DailyTotal>> {
        let rows = sqlx::query_as::<_, DailyTotal>(
            r#"
            SELECT date AS day, SUM(calories)::BIGINT AS cal_sum
              FROM food_entries
             WHERE user_id = $1 AND date BETWEEN $2 AND $3
             GROUP BY date
             ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .context("aggregate daily calorie totals")?;
        Ok(rows)
    }

    async fn target_calories(&self, user_id: Uuid) -> anyhow::Result<Option<i32>> {
        let target = sqlx::query_scalar::<_, Option<i32>>(
            r#"SELECT target_calories FROM user_profiles WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("load profile target")?;
        Ok(target.flatten())
    }
}
