use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Article;

/// One article-detail open. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewLogEntry {
    pub article_id: String,
    pub article_title: String,
    pub user_id: String,
    pub opened_at: DateTime<Utc>,
}

impl ViewLogEntry {
    pub fn opened_now(user_id: &str, article: &Article) -> Self {
        Self {
            article_id: article.id.clone(),
            article_title: article.title.clone(),
            user_id: user_id.to_string(),
            opened_at: Utc::now(),
        }
    }
}
