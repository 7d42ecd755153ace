use std::sync::Arc;

use crate::config::PreferenceWriteMode;
use crate::db::PreferenceRepository;
use crate::error::{AppError, Result};
use crate::models::{CategorySet, PreferenceRecord};

#[derive(Clone)]
pub struct PreferenceStore {
    repo: Arc<dyn PreferenceRepository>,
    write_mode: PreferenceWriteMode,
}

impl PreferenceStore {
    pub fn new(repo: Arc<dyn PreferenceRepository>) -> Self {
        Self {
            repo,
            write_mode: PreferenceWriteMode::default(),
        }
    }

    pub fn with_write_mode(mut self, write_mode: PreferenceWriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// The user's followed categories, in the order they were chosen.
    ///
    /// A user with no record gets one holding the defaults. More than one
    /// record means the store is corrupted and nothing is returned.
    pub async fn get_categories(&self, user_id: &str) -> Result<CategorySet> {
        let mut records = self.repo.find_preferences(user_id).await?;

        match records.len() {
            0 => {
                let record = self
                    .repo
                    .insert_preferences(user_id, &CategorySet::defaults())
                    .await?;
                tracing::info!(user_id, "Created default preferences");
                Ok(record.categories)
            }
            1 => Ok(records.remove(0).categories),
            n => Err(AppError::DataIntegrity(format!(
                "{n} preference records found for user {user_id}"
            ))),
        }
    }

    /// Stores `categories` as given. An empty set is valid and names are not
    /// checked against the catalog.
    pub async fn save_preferences(
        &self,
        user_id: &str,
        categories: &CategorySet,
    ) -> Result<PreferenceRecord> {
        let record = match self.write_mode {
            PreferenceWriteMode::Upsert => self.repo.upsert_preferences(user_id, categories).await?,
            PreferenceWriteMode::Append => self.repo.insert_preferences(user_id, categories).await?,
        };

        tracing::info!(
            user_id,
            count = record.categories.len(),
            mode = ?self.write_mode,
            "Saved preferences"
        );
        Ok(record)
    }
}
