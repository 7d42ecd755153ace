use crate::error::{AppError, Result};
use crate::identity::Session;
use crate::models::{Category, CategorySet, CATEGORY_CATALOG};

use super::PreferenceStore;

/// Onboarding multi-select over the category catalog.
#[derive(Debug, Default)]
pub struct PreferenceSelector {
    selection: CategorySet,
    committed: bool,
}

impl PreferenceSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &'static [Category] {
        &CATEGORY_CATALOG
    }

    /// Flips `name` in the selection. Returns true if it is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        self.selection.toggle(name)
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.contains(name)
    }

    /// Current selection, in the order it was picked.
    pub fn selection(&self) -> &CategorySet {
        &self.selection
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Saves the selection for the signed-in user and returns it so the caller
    /// can move on to the feed. Any selection size is accepted, including
    /// none. Only one successful commit is allowed per onboarding pass.
    pub async fn commit(
        &mut self,
        session: Option<&Session>,
        store: &PreferenceStore,
    ) -> Result<CategorySet> {
        if self.committed {
            return Err(AppError::Validation(
                "Preferences were already saved".to_string(),
            ));
        }

        let Some(session) = session else {
            tracing::error!("Cannot save preferences before the user is known");
            return Err(AppError::MissingUser);
        };

        store.save_preferences(session.user_id(), &self.selection).await?;
        self.committed = true;
        Ok(self.selection.clone())
    }
}
