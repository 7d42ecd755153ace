use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{CategorySet, PreferenceRecord, ViewLogEntry};

use super::schema::SCHEMA;
use super::{PreferenceRepository, ViewLogRepository};

// (id, user_id, categories json, created_at)
type PreferenceRow = (i64, String, String, String);

const PREFERENCE_COLUMNS: &str = "id, user_id, categories, created_at";

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::with_connection(conn).await
    }

    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl PreferenceRepository for Repository {
    async fn find_preferences(&self, user_id: &str) -> Result<Vec<PreferenceRecord>> {
        let user_id = user_id.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PREFERENCE_COLUMNS} FROM preferences WHERE user_id = ?1 ORDER BY id"
                ))?;
                let rows = stmt
                    .query_map(params![user_id], preference_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(preference_from_row).collect()
    }

    async fn insert_preferences(
        &self,
        user_id: &str,
        categories: &CategorySet,
    ) -> Result<PreferenceRecord> {
        let categories_json = serde_json::to_string(categories)?;
        let created_at = Utc::now();
        let stamp = format_timestamp(created_at);
        let owner = user_id.to_string();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO preferences (user_id, categories, created_at) VALUES (?1, ?2, ?3)",
                    params![owner, categories_json, stamp],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(PreferenceRecord {
            id,
            user_id: user_id.to_string(),
            categories: categories.clone(),
            created_at,
        })
    }

    async fn upsert_preferences(
        &self,
        user_id: &str,
        categories: &CategorySet,
    ) -> Result<PreferenceRecord> {
        let categories_json = serde_json::to_string(categories)?;
        let stamp = format_timestamp(Utc::now());
        let owner = user_id.to_string();

        let row = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let existing: Option<i64> = tx.query_row(
                    "SELECT MIN(id) FROM preferences WHERE user_id = ?1",
                    params![owner],
                    |row| row.get(0),
                )?;

                let id = match existing {
                    Some(id) => {
                        // Collapse any extra rows left behind by append-mode writes
                        tx.execute(
                            "DELETE FROM preferences WHERE user_id = ?1 AND id <> ?2",
                            params![owner, id],
                        )?;
                        tx.execute(
                            "UPDATE preferences SET categories = ?1 WHERE id = ?2",
                            params![categories_json, id],
                        )?;
                        id
                    }
                    None => {
                        tx.execute(
                            "INSERT INTO preferences (user_id, categories, created_at) VALUES (?1, ?2, ?3)",
                            params![owner, categories_json, stamp],
                        )?;
                        tx.last_insert_rowid()
                    }
                };

                let row = tx.query_row(
                    &format!("SELECT {PREFERENCE_COLUMNS} FROM preferences WHERE id = ?1"),
                    params![id],
                    preference_row,
                )?;
                tx.commit()?;
                Ok(row)
            })
            .await?;

        preference_from_row(row)
    }
}

#[async_trait]
impl ViewLogRepository for Repository {
    async fn append_view(&self, entry: ViewLogEntry) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO articles (article_id, article_name, user_id, opened_at) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        entry.article_id,
                        entry.article_title,
                        entry.user_id,
                        format_timestamp(entry.opened_at),
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn views_for_user(&self, user_id: &str) -> Result<Vec<ViewLogEntry>> {
        let user_id = user_id.to_string();
        let entries = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT article_id, article_name, user_id, opened_at
                       FROM articles
                       WHERE user_id = ?1
                       ORDER BY opened_at DESC, id DESC"#,
                )?;
                let entries = stmt
                    .query_map(params![user_id], |row| {
                        let opened_at: String = row.get(3)?;
                        Ok(ViewLogEntry {
                            article_id: row.get(0)?,
                            article_title: row.get(1)?,
                            user_id: row.get(2)?,
                            opened_at: parse_datetime(&opened_at).unwrap_or_else(Utc::now),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await?;
        Ok(entries)
    }
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    // Fixed width so lexical order in SQLite matches chronological order
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime('now') format
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn preference_row(row: &Row) -> rusqlite::Result<PreferenceRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn preference_from_row((id, user_id, categories, created_at): PreferenceRow) -> Result<PreferenceRecord> {
    Ok(PreferenceRecord {
        id,
        user_id,
        categories: serde_json::from_str(&categories)?,
        created_at: parse_datetime(&created_at).unwrap_or_else(Utc::now),
    })
}
