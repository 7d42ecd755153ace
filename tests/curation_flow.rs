use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio_test::{assert_err, assert_ok};

use newspalette::app::{App, Screen};
use newspalette::config::PreferenceWriteMode;
use newspalette::curation::{
    FeedCurator, FeedPhase, FeedRequest, PreferenceStore, ReadingListItem, ReadingListStrategy,
    ViewLog,
};
use newspalette::db::{PreferenceRepository, Repository, ViewLogRepository};
use newspalette::error::{AppError, Result};
use newspalette::identity::{IdentityProvider, ProfileUpdate, Session, SignUp, SignUpOutcome};
use newspalette::models::{Article, CategorySet, Profile, User, ViewLogEntry};
use newspalette::news::ArticleSource;
use newspalette::tui::AppAction;

/// Serves five articles per category, optionally after a delay, and records
/// every category it was asked for.
#[derive(Default)]
struct FakeSource {
    calls: Mutex<Vec<String>>,
    delays: HashMap<String, Duration>,
    failing: Vec<String>,
}

impl FakeSource {
    fn with_delay(mut self, category: &str, delay: Duration) -> Self {
        self.delays.insert(category.to_string(), delay);
        self
    }

    fn failing_on(mut self, category: &str) -> Self {
        self.failing.push(category.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn articles_for(label: &str, count: usize) -> Vec<Article> {
    (0..count)
        .map(|i| Article {
            id: format!("https://news.example/{}/{i}", label.to_lowercase()),
            title: format!("{label} story {i}"),
            description: None,
            image_url: None,
            published_at: None,
            sentiment: None,
        })
        .collect()
}

#[async_trait]
impl ArticleSource for FakeSource {
    async fn fetch_by_category(&self, category: &str, limit: u32) -> Result<Vec<Article>> {
        self.calls.lock().unwrap().push(category.to_string());
        if let Some(delay) = self.delays.get(category) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|c| c == category) {
            return Err(AppError::Retrieval("HTTP 503 Service Unavailable".to_string()));
        }
        Ok(articles_for(category, 5.min(limit as usize)))
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Article>> {
        self.calls.lock().unwrap().push(format!("search:{query}"));
        Ok(articles_for(query, 2.min(limit as usize)))
    }
}

struct FakeIdentity;

fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        profile: Profile::default(),
    }
}

fn session(id: &str) -> Session {
    Session {
        user: test_user(id),
        access_token: format!("token-{id}"),
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(&self, request: &SignUp) -> Result<SignUpOutcome> {
        let mut session = session("new-user");
        session.user.email = request.email.clone();
        session.user.profile = request.profile.clone();
        Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        })
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session> {
        Err(AppError::Auth("Invalid login credentials".to_string()))
    }

    /// The provider's copy carries a profile edited elsewhere.
    async fn current_user(&self, session: &Session) -> Result<User> {
        let mut user = session.user.clone();
        user.profile.first_name = "Augusta".to_string();
        Ok(user)
    }

    async fn update_profile(&self, session: &Session, _update: &ProfileUpdate) -> Result<User> {
        Ok(session.user.clone())
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        Ok(())
    }
}

/// View log storage whose writes always fail.
struct BrokenViewLog;

#[async_trait]
impl ViewLogRepository for BrokenViewLog {
    async fn append_view(&self, _entry: ViewLogEntry) -> Result<()> {
        Err(AppError::Io(std::io::Error::other("disk full")))
    }

    async fn views_for_user(&self, _user_id: &str) -> Result<Vec<ViewLogEntry>> {
        Ok(Vec::new())
    }
}

/// Lists the articles the user opened, newest first, once each.
struct RecentlyOpened;

impl ReadingListStrategy for RecentlyOpened {
    fn derive(&self, history: &[ViewLogEntry], _current: &[Article]) -> Vec<ReadingListItem> {
        let mut items: Vec<ReadingListItem> = Vec::new();
        for entry in history {
            if !items.iter().any(|item| item.article_id == entry.article_id) {
                items.push(ReadingListItem {
                    article_id: entry.article_id.clone(),
                    title: entry.article_title.clone(),
                });
            }
        }
        items
    }
}

async fn setup(source: FakeSource) -> (FeedCurator, Arc<FakeSource>, Arc<Repository>) {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let source = Arc::new(source);
    let curator = FeedCurator::new(
        PreferenceStore::new(repo.clone()),
        source.clone(),
        ViewLog::new(repo.clone()),
    );
    (curator, source, repo)
}

async fn wait_until_settled(curator: &mut FeedCurator) {
    for _ in 0..100 {
        curator.poll_results();
        if !curator.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("feed never settled");
}

async fn wait_for_feed(app: &mut App) {
    for _ in 0..100 {
        app.poll_feed_results().await.unwrap();
        if !app.curator.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("feed never settled");
}

#[tokio::test]
async fn test_sign_up_onboarding_and_category_switch() {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let source = Arc::new(FakeSource::default());
    let store = PreferenceStore::new(repo.clone());
    let curator = FeedCurator::new(store.clone(), source.clone(), ViewLog::new(repo.clone()));
    let mut app = App::from_parts(Arc::new(FakeIdentity), store.clone(), curator);

    assert_eq!(app.screen, Screen::Login);
    assert_ok!(app.handle_action(AppAction::SwitchForm).await);
    assert_eq!(app.screen, Screen::SignUp);

    let values = ["Ada", "Lovelace", "ada@example.com", "5551234567", "secret123", "secret123"];
    for (field, value) in app.form.fields.iter_mut().zip(values) {
        field.value = value.to_string();
    }
    assert_ok!(app.handle_action(AppAction::InputConfirm).await);
    assert_eq!(app.form.error, None);
    assert_eq!(app.screen, Screen::Onboarding);

    // Catalog order: Technology, Science, Health, Sports, ...
    app.handle_action(AppAction::MoveDown).await.unwrap();
    app.handle_action(AppAction::ToggleCategory).await.unwrap();
    app.handle_action(AppAction::MoveDown).await.unwrap();
    app.handle_action(AppAction::MoveDown).await.unwrap();
    app.handle_action(AppAction::ToggleCategory).await.unwrap();
    assert_eq!(app.selector.selection().as_slice(), &["Science", "Sports"]);

    app.handle_action(AppAction::CommitPreferences).await.unwrap();
    assert!(app.selector.is_committed());
    assert_eq!(app.screen, Screen::Home);

    wait_for_feed(&mut app).await;
    assert_eq!(app.curator.phase(), FeedPhase::Ready);
    assert_eq!(app.curator.categories().as_slice(), &["Science", "Sports"]);
    assert_eq!(app.curator.selected_category(), Some("Science"));
    assert!(app.curator.articles().iter().all(|a| a.title.starts_with("Science")));

    app.handle_action(AppAction::NextCategory).await.unwrap();
    wait_for_feed(&mut app).await;
    assert_eq!(app.curator.selected_category(), Some("Sports"));
    assert_eq!(app.curator.articles().len(), 5);
    assert!(app.curator.articles().iter().all(|a| a.title.starts_with("Sports")));
    assert_eq!(source.calls(), vec!["Science", "Sports"]);

    let stored = store.get_categories("new-user").await.unwrap();
    assert_eq!(stored.as_slice(), &["Science", "Sports"]);
}

#[tokio::test]
async fn test_invalid_sign_up_stays_on_form() {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let store = PreferenceStore::new(repo.clone());
    let curator = FeedCurator::new(
        store.clone(),
        Arc::new(FakeSource::default()),
        ViewLog::new(repo),
    );
    let mut app = App::from_parts(Arc::new(FakeIdentity), store, curator);

    app.handle_action(AppAction::SwitchForm).await.unwrap();
    app.handle_action(AppAction::InputConfirm).await.unwrap();

    assert_eq!(app.screen, Screen::SignUp);
    assert_eq!(
        app.form.error.as_deref(),
        Some("Please enter all required fields")
    );
    assert!(app.session.is_none());
}

#[tokio::test]
async fn test_edit_profile_shows_provider_copy_of_user() {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let store = PreferenceStore::new(repo.clone());
    let curator = FeedCurator::new(
        store.clone(),
        Arc::new(FakeSource::default()),
        ViewLog::new(repo),
    );
    let mut app = App::from_parts(Arc::new(FakeIdentity), store, curator);
    app.session = Some(session("user-1"));
    app.screen = Screen::Home;

    assert_ok!(app.handle_action(AppAction::EditProfile).await);

    assert_eq!(app.screen, Screen::Profile);
    assert_eq!(app.form.fields[0].value, "Augusta");
    assert_eq!(
        app.session.as_ref().map(|s| s.user.profile.first_name.as_str()),
        Some("Augusta")
    );
}

#[tokio::test]
async fn test_new_user_gets_defaults_once() {
    let (mut curator, source, repo) = setup(FakeSource::default()).await;

    curator.start(&session("user-1")).await;
    assert_eq!(
        curator.categories().as_slice(),
        &["general", "technology", "sports"]
    );
    assert_eq!(curator.selected_category(), Some("general"));
    assert_eq!(source.calls(), vec!["general"]);

    curator.start(&session("user-1")).await;
    assert_eq!(assert_ok!(repo.find_preferences("user-1").await).len(), 1);
}

#[tokio::test]
async fn test_duplicate_preference_records_fall_back() {
    let (mut curator, source, repo) = setup(FakeSource::default()).await;
    let store = PreferenceStore::new(repo.clone()).with_write_mode(PreferenceWriteMode::Append);
    let science: CategorySet = ["Science"].into_iter().collect();

    assert_ok!(store.save_preferences("user-1", &science).await);
    assert_ok!(store.save_preferences("user-1", &science).await);
    let err = assert_err!(store.get_categories("user-1").await);
    assert!(matches!(err, AppError::DataIntegrity(_)));

    curator.start(&session("user-1")).await;
    assert!(curator.categories().is_empty());
    assert_eq!(curator.phase(), FeedPhase::Ready);
    assert_eq!(source.calls(), vec!["general"]);
    // Integrity problems are logged, not shown
    assert!(curator.notice().is_none());
}

#[tokio::test]
async fn test_record_view_lands_in_history() {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let log = ViewLog::new(repo);
    let article = &articles_for("Science", 1)[0];

    let before = Utc::now() - chrono::Duration::seconds(1);
    log.record_view("user-1", article).await;
    let after = Utc::now() + chrono::Duration::seconds(1);

    let history = assert_ok!(log.list_for_user("user-1").await);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].article_id, article.id);
    assert_eq!(history[0].article_title, article.title);
    assert!(history[0].opened_at >= before && history[0].opened_at <= after);

    assert!(assert_ok!(log.list_for_user("user-2").await).is_empty());
}

#[tokio::test]
async fn test_view_log_failure_does_not_block_opening() {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let log = ViewLog::new(Arc::new(BrokenViewLog));
    let mut curator = FeedCurator::new(
        PreferenceStore::new(repo),
        Arc::new(FakeSource::default()),
        log.clone(),
    );
    curator.start(&session("user-1")).await;

    let article = curator.open_article(0).unwrap();
    assert_eq!(article.title, "general story 0");
    assert_eq!(curator.phase(), FeedPhase::Ready);

    // Swallowed, not propagated
    log.record_view("user-1", &article).await;
    assert_ok!(log.record_view_detached("user-1", &article).await);
}

#[tokio::test]
async fn test_opened_articles_feed_reading_lists() {
    let repo = Arc::new(Repository::in_memory().await.unwrap());
    let log = ViewLog::new(repo.clone());
    let mut curator = FeedCurator::new(
        PreferenceStore::new(repo),
        Arc::new(FakeSource::default()),
        log.clone(),
    )
    .with_strategies(Box::new(RecentlyOpened), Box::new(RecentlyOpened));
    curator.start(&session("user-1")).await;
    assert!(curator.continue_reading().is_empty());

    let first = curator.open_article(0).unwrap();
    log.record_view("user-1", &first).await;
    curator.refresh_reading_lists().await;

    assert_eq!(curator.continue_reading().len(), 1);
    assert_eq!(curator.continue_reading()[0].article_id, first.id);
    assert_eq!(curator.recommended().len(), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_recoverable() {
    let (mut curator, _source, _repo) = setup(FakeSource::default().failing_on("Broken")).await;
    curator.start(&session("user-1")).await;
    let shown = curator.articles().to_vec();

    curator.select_category("Broken").await;
    assert_eq!(curator.phase(), FeedPhase::Errored);
    assert_eq!(curator.articles(), shown.as_slice());
    assert!(curator.take_notice().unwrap().contains("503"));

    curator.select_category("technology").await;
    assert_eq!(curator.phase(), FeedPhase::Ready);
    assert!(curator.articles()[0].title.starts_with("technology"));
}

#[tokio::test]
async fn test_search_uses_literal_query() {
    let (mut curator, source, _repo) = setup(FakeSource::default()).await;
    curator.start(&session("user-1")).await;

    curator.search("  mars rover ").await;
    curator.search("   ").await;

    assert_eq!(source.calls(), vec!["general", "search:mars rover"]);
    assert_eq!(
        curator.active_request(),
        Some(&FeedRequest::Search("mars rover".to_string()))
    );
    // Searching leaves the highlighted chip alone
    assert_eq!(curator.selected_category(), Some("general"));
}

#[tokio::test]
async fn test_slow_response_for_abandoned_category_is_dropped() {
    let source = FakeSource::default().with_delay("Science", Duration::from_millis(150));
    let (mut curator, _source, _repo) = setup(source).await;
    curator.resolve_preferences(&session("user-1")).await;

    curator.dispatch(FeedRequest::Category("Science".to_string()));
    curator.dispatch(FeedRequest::Category("Sports".to_string()));
    wait_until_settled(&mut curator).await;
    assert!(curator.articles()[0].title.starts_with("Sports"));

    // Let the slow response arrive
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!curator.poll_results());
    assert_eq!(curator.selected_category(), Some("Sports"));
    assert!(curator.articles().iter().all(|a| a.title.starts_with("Sports")));
}
