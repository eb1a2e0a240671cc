use serde::Serialize;

use crate::entries::FoodEntry;

/// Everything the home page shows for one user and day.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IndexContext {
    pub today_entries: Vec<FoodEntry>,
    pub total_calories: i64,
    pub target_calories: i32,
    /// ISO-8601 days of the current week that have entries.
    pub dates: Vec<String>,
    /// Calorie sums parallel to `dates`.
    pub calories: Vec<i64>,
}

impl IndexContext {
    /// Negative once the target is exceeded.
    pub fn remaining_calories(&self) -> i64 {
        i64::from(self.target_calories) - self.total_calories
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AboutContext {
    pub title: &'static str,
}
