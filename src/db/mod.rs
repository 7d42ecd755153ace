mod repository;
mod schema;

pub use repository::Repository;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CategorySet, PreferenceRecord, ViewLogEntry};

/// Storage for per-user category preferences.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Every preference row stored for `user_id`, oldest first.
    async fn find_preferences(&self, user_id: &str) -> Result<Vec<PreferenceRecord>>;

    /// Always writes a new row.
    async fn insert_preferences(
        &self,
        user_id: &str,
        categories: &CategorySet,
    ) -> Result<PreferenceRecord>;

    /// Leaves exactly one row for `user_id` holding `categories`.
    async fn upsert_preferences(
        &self,
        user_id: &str,
        categories: &CategorySet,
    ) -> Result<PreferenceRecord>;
}

/// Append-only storage for article opens.
#[async_trait]
pub trait ViewLogRepository: Send + Sync {
    async fn append_view(&self, entry: ViewLogEntry) -> Result<()>;

    /// Entries for `user_id`, newest first.
    async fn views_for_user(&self, user_id: &str) -> Result<Vec<ViewLogEntry>>;
}
