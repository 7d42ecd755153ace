pub const SCHEMA: &str = r#"
-- preferences table (user_id is not unique: rows written in append mode can
-- pile up, and reads report that as an integrity error)
CREATE TABLE IF NOT EXISTS preferences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    categories TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_preferences_user_id ON preferences(user_id);

-- articles table (view log, append-only)
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_id TEXT NOT NULL,
    article_name TEXT NOT NULL,
    user_id TEXT NOT NULL,
    opened_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_user_opened ON articles(user_id, opened_at DESC);
"#;
