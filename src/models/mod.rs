mod article;
mod category;
mod preference;
mod user;
mod view_log;

pub use article::{Article, Sentiment};
pub use category::{find_category, Category, Rgb, CATEGORY_CATALOG};
pub use preference::{CategorySet, PreferenceRecord, DEFAULT_CATEGORIES, FALLBACK_CATEGORY};
pub use user::{Profile, User};
pub use view_log::ViewLogEntry;
