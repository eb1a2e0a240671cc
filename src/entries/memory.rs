use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::repo::FoodLog;
use super::repo_types::{DailyTotal, FoodEntry};

/// In-process food log for tests.
#[derive(Default, Clone)]
pub struct MemoryFoodLog {
    entries: Vec<FoodEntry>,
    targets: HashMap<Uuid, i32>,
}

impl MemoryFoodLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: FoodEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_target(mut self, user_id: Uuid, target: i32) -> Self {
        self.targets.insert(user_id, target);
        self
    }
}

#[async_trait]
impl FoodLog for MemoryFoodLog {
    async fn entries_on(&self, user_id: Uuid, day: Date) -> anyhow::Result<Vec<FoodEntry>> {
        let mut rows: Vec<FoodEntry> = self
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.date == day)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.time);
        Ok(rows)
    }

    async fn daily_totals(
        &self,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<DailyTotal>> {
        let mut sums: BTreeMap<Date, i64> = BTreeMap::new();
        for e in self
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.date >= from && e.date <= to)
        {
            *sums.entry(e.date).or_default() += i64::from(e.calories);
        }
        Ok(sums
            .into_iter()
            .map(|(day, cal_sum)| DailyTotal { day, cal_sum })
            .collect())
    }

    async fn target_calories(&self, user_id: Uuid) -> anyhow::Result<Option<i32>> {
        Ok(self.targets.get(&user_id).copied())
    }
}

/// Always fails, to exercise store error propagation.
pub struct FailingFoodLog;

#[async_trait]
impl FoodLog for FailingFoodLog {
    async fn entries_on(&self, _user_id: Uuid, _day: Date) -> anyhow::Result<Vec<FoodEntry>> {
        anyhow::bail!("store unavailable")
    }

    async fn daily_totals(
        &self,
        _user_id: Uuid,
        _from: Date,
        _to: Date,
    ) -> anyhow::Result<Vec<DailyTotal>> {
        anyhow::bail!("store unavailable")
    }

    async fn target_calories(&self, _user_id: Uuid) -> anyhow::Result<Option<i32>> {
        anyhow::bail!("store unavailable")
    }
}
