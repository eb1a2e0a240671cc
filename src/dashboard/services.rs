use time::{Date, Duration};
use tracing::debug;
use uuid::Uuid;

use super::dto::{AboutContext, IndexContext};
use crate::entries::FoodLog;

/// Used when the profile has no target.
pub const DEFAULT_TARGET_CALORIES: i32 = 2000;

/// Monday of the week containing `day`.
pub fn week_start(day: Date) -> Date {
    day - Duration::days(i64::from(day.weekday().number_days_from_monday()))
}

/// Builds the home page data: today's entries and total, the target,
/// and the per-day series from Monday through `today`.
pub async fn assemble_index(
    log: &dyn FoodLog,
    user_id: Uuid,
    today: Date,
) -> anyhow::Result<IndexContext> {
    let today_entries = log.entries_on(user_id, today).await?;
    let total_calories: i64 = today_entries.iter().map(|e| i64::from(e.calories)).sum();

    let target_calories = log
        .target_calories(user_id)
        .await?
        .unwrap_or(DEFAULT_TARGET_CALORIES);

    let weekly = log.daily_totals(user_id, week_start(today), today).await?;
    let (dates, calories): (Vec<String>, Vec<i64>) = weekly
        .iter()
        .map(|row| (row.day.to_string(), row.cal_sum))
        .unzip();

    debug!(
        user_id = %user_id,
        today_total = total_calories,
        weekly_points = weekly.len(),
        "index data prepared"
    );

    Ok(IndexContext {
        today_entries,
        total_calories,
        target_calories,
        dates,
        calories,
    })
}

pub fn about_context() -> AboutContext {
    AboutContext { title: "About" }
}
