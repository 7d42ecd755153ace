use serde::{Deserialize, Serialize};

use crate::models::{Article, ViewLogEntry};

/// Entry in a secondary feed section such as "Continue Reading".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingListItem {
    pub article_id: String,
    pub title: String,
}

/// Derives a secondary article list from the user's view history and the
/// articles currently on screen.
pub trait ReadingListStrategy: Send + Sync {
    /// `history` is newest first.
    fn derive(&self, history: &[ViewLogEntry], current: &[Article]) -> Vec<ReadingListItem>;
}

/// Produces nothing. There is no progress tracking or similarity model yet,
/// so both sections stay hidden until a real strategy is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecommendations;

impl ReadingListStrategy for NoRecommendations {
    fn derive(&self, _history: &[ViewLogEntry], _current: &[Article]) -> Vec<ReadingListItem> {
        Vec::new()
    }
}
