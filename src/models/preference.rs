use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Written for a user the first time their categories are requested and no
/// record exists yet.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["general", "technology", "sports"];

/// Loaded when a user follows no categories at all.
pub const FALLBACK_CATEGORY: &str = "general";

/// Ordered set of category names. Keeps first-insertion order and drops
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn defaults() -> Self {
        DEFAULT_CATEGORIES.iter().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    /// Adds `name` if absent. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != name);
        self.0.len() != before
    }

    /// Flips membership. Returns `true` if `name` is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.remove(name) {
            false
        } else {
            self.0.push(name.to_string());
            true
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl From<Vec<String>> for CategorySet {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<CategorySet> for Vec<String> {
    fn from(set: CategorySet) -> Self {
        set.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub id: i64,
    pub user_id: String,
    pub categories: CategorySet,
    pub created_at: DateTime<Utc>,
}
