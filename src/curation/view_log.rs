use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::db::ViewLogRepository;
use crate::error::Result;
use crate::models::{Article, ViewLogEntry};

#[derive(Clone)]
pub struct ViewLog {
    repo: Arc<dyn ViewLogRepository>,
}

impl ViewLog {
    pub fn new(repo: Arc<dyn ViewLogRepository>) -> Self {
        Self { repo }
    }

    /// Appends one entry stamped with the current time. A failed write is
    /// logged and swallowed; it must never keep an article from being shown.
    pub async fn record_view(&self, user_id: &str, article: &Article) {
        let entry = ViewLogEntry::opened_now(user_id, article);
        self.append(entry).await;
    }

    /// Like `record_view`, but runs on its own task so the caller never waits
    /// on the write.
    pub fn record_view_detached(&self, user_id: &str, article: &Article) -> JoinHandle<()> {
        let entry = ViewLogEntry::opened_now(user_id, article);
        let log = self.clone();
        tokio::spawn(async move { log.append(entry).await })
    }

    /// Entries for `user_id`, most recent first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ViewLogEntry>> {
        self.repo.views_for_user(user_id).await
    }

    async fn append(&self, entry: ViewLogEntry) {
        let article_id = entry.article_id.clone();
        let user_id = entry.user_id.clone();
        match self.repo.append_view(entry).await {
            Ok(()) => tracing::debug!(%user_id, %article_id, "Logged article view"),
            Err(e) => tracing::warn!(%user_id, %article_id, error = %e, "Failed to log article view"),
        }
    }
}
