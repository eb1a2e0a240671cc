use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, Time};
use uuid::Uuid;

/// One logged food item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub date: Date,
    pub time: Time,
    pub calories: i32,
}

impl FoodEntry {
    /// `HH:MM`, as shown in the entries table.
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.time.hour(), self.time.minute())
    }
}

/// Per-day calorie sum computed by the store.
#[derive(Debug, Clone, Copy, FromRow, PartialEq, Eq)]
pub struct DailyTotal {
    pub day: Date,
    pub cal_sum: i64,
}
