use chrono::Utc;
use tempfile::TempDir;

use newspalette::db::{PreferenceRepository, Repository, ViewLogRepository};
use newspalette::models::{CategorySet, ViewLogEntry};

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("newspalette.db");
    let path = path.to_str().unwrap();
    let categories: CategorySet = ["Health", "Travel"].into_iter().collect();

    {
        let repo = Repository::new(path).await.unwrap();
        repo.upsert_preferences("user-1", &categories).await.unwrap();
        repo.append_view(ViewLogEntry {
            article_id: "https://news.example/a".to_string(),
            article_title: "A".to_string(),
            user_id: "user-1".to_string(),
            opened_at: Utc::now(),
        })
        .await
        .unwrap();
    }

    let repo = Repository::new(path).await.unwrap();
    let records = repo.find_preferences("user-1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].categories, categories);

    let views = repo.views_for_user("user-1").await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].article_title, "A");
}
