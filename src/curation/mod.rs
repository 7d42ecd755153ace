//! Personalization core: which categories a user follows, which articles
//! they see, and what they have opened.

mod curator;
mod preferences;
mod selector;
mod strategy;
mod view_log;

pub use curator::{FeedCurator, FeedLimits, FeedPhase, FeedRequest, FetchOutcome};
pub use preferences::PreferenceStore;
pub use selector::PreferenceSelector;
pub use strategy::{NoRecommendations, ReadingListItem, ReadingListStrategy};
pub use view_log::ViewLog;
