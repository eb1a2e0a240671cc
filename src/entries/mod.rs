#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;

pub use repo::{FoodLog, PgFoodLog};
pub use repo_types::FoodEntry;
