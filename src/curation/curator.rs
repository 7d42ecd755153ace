use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::identity::Session;
use crate::models::{Article, CategorySet, FALLBACK_CATEGORY};
use crate::news::{ArticleSource, DEFAULT_HEADLINE_LIMIT, DEFAULT_SEARCH_LIMIT};

use super::strategy::{NoRecommendations, ReadingListItem, ReadingListStrategy};
use super::{PreferenceStore, ViewLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    #[default]
    Initial,
    ResolvingPreferences,
    Loading,
    Ready,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    Category(String),
    Search(String),
}

impl FeedRequest {
    /// `None` for a blank query, which should not trigger a fetch at all.
    pub fn search(query: &str) -> Option<Self> {
        let query = query.trim();
        (!query.is_empty()).then(|| FeedRequest::Search(query.to_string()))
    }

    pub fn label(&self) -> String {
        match self {
            FeedRequest::Category(category) => category.clone(),
            FeedRequest::Search(query) => format!("\"{query}\""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLimits {
    pub headlines: u32,
    pub search: u32,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            headlines: DEFAULT_HEADLINE_LIMIT,
            search: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Result of a background fetch, tagged with the generation it was issued
/// under.
pub struct FetchOutcome {
    pub generation: u64,
    pub result: Result<Vec<Article>>,
}

/// Per-session feed state: the user's category chips, the one article list
/// on screen, and the secondary reading lists.
///
/// Every fetch gets a fresh generation number and only the result for the
/// latest generation is applied, so a slow response for a category the user
/// already left cannot overwrite newer state.
pub struct FeedCurator {
    store: PreferenceStore,
    source: Arc<dyn ArticleSource>,
    view_log: ViewLog,
    continue_reading_strategy: Box<dyn ReadingListStrategy>,
    recommended_strategy: Box<dyn ReadingListStrategy>,
    limits: FeedLimits,

    user_id: Option<String>,
    phase: FeedPhase,
    categories: CategorySet,
    selected_category: Option<String>,
    active_request: Option<FeedRequest>,
    articles: Vec<Article>,
    continue_reading: Vec<ReadingListItem>,
    recommended: Vec<ReadingListItem>,
    notice: Option<String>,

    generation: u64,
    results_tx: mpsc::Sender<FetchOutcome>,
    results_rx: mpsc::Receiver<FetchOutcome>,
}

impl FeedCurator {
    pub fn new(store: PreferenceStore, source: Arc<dyn ArticleSource>, view_log: ViewLog) -> Self {
        let (results_tx, results_rx) = mpsc::channel(8);

        Self {
            store,
            source,
            view_log,
            continue_reading_strategy: Box::new(NoRecommendations),
            recommended_strategy: Box::new(NoRecommendations),
            limits: FeedLimits::default(),
            user_id: None,
            phase: FeedPhase::Initial,
            categories: CategorySet::new(),
            selected_category: None,
            active_request: None,
            articles: Vec::new(),
            continue_reading: Vec::new(),
            recommended: Vec::new(),
            notice: None,
            generation: 0,
            results_tx,
            results_rx,
        }
    }

    pub fn with_limits(mut self, limits: FeedLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_strategies(
        mut self,
        continue_reading: Box<dyn ReadingListStrategy>,
        recommended: Box<dyn ReadingListStrategy>,
    ) -> Self {
        self.continue_reading_strategy = continue_reading;
        self.recommended_strategy = recommended;
        self
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FeedPhase::ResolvingPreferences | FeedPhase::Loading)
    }

    /// Chip list, in preference order.
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn active_request(&self) -> Option<&FeedRequest> {
        self.active_request.as_ref()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn continue_reading(&self) -> &[ReadingListItem] {
        &self.continue_reading
    }

    pub fn recommended(&self) -> &[ReadingListItem] {
        &self.recommended
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One-shot message for the last user-visible failure.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Binds the curator to `session` and resolves the user's categories.
    /// Returns the request for the first category (or the fallback category
    /// when the user follows none), which the caller then loads.
    pub async fn resolve_preferences(&mut self, session: &Session) -> FeedRequest {
        self.reset();
        self.user_id = Some(session.user_id().to_string());
        self.phase = FeedPhase::ResolvingPreferences;

        match self.store.get_categories(session.user_id()).await {
            Ok(categories) => self.categories = categories,
            Err(e) => {
                // Carry on with an empty chip list; the fallback feed still loads
                self.report(&e, "Failed to resolve preferences");
                self.categories = CategorySet::new();
            }
        }

        let first = self.categories.first().unwrap_or(FALLBACK_CATEGORY).to_string();
        tracing::debug!(
            user_id = %session.user_id(),
            categories = self.categories.len(),
            initial = %first,
            "Resolved preferences"
        );
        FeedRequest::Category(first)
    }

    /// Resolves preferences and loads the initial feed inline.
    pub async fn start(&mut self, session: &Session) {
        let request = self.resolve_preferences(session).await;
        self.load(request).await;
        self.refresh_reading_lists().await;
    }

    pub async fn select_category(&mut self, category: &str) {
        self.load(FeedRequest::Category(category.to_string())).await;
    }

    /// Searches with the caller's literal query. A blank query is ignored.
    pub async fn search(&mut self, query: &str) {
        if let Some(request) = FeedRequest::search(query) {
            self.load(request).await;
        }
    }

    /// Fetches and applies `request` inline.
    pub async fn load(&mut self, request: FeedRequest) {
        let generation = self.begin(request.clone());
        let result = fetch(self.source.as_ref(), &request, self.limits).await;
        self.complete(generation, result);
    }

    /// Starts fetching `request` on a background task. The result is applied
    /// by a later `poll_results`.
    pub fn dispatch(&mut self, request: FeedRequest) -> u64 {
        let generation = self.begin(request.clone());
        let source = Arc::clone(&self.source);
        let tx = self.results_tx.clone();
        let limits = self.limits;

        tokio::spawn(async move {
            let result = fetch(source.as_ref(), &request, limits).await;
            let _ = tx.send(FetchOutcome { generation, result }).await;
        });

        generation
    }

    /// Applies any finished background fetches (non-blocking). Returns true
    /// if the visible state changed.
    pub fn poll_results(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.results_rx.try_recv() {
            changed |= self.complete(outcome.generation, outcome.result);
        }
        changed
    }

    /// Marks `request` as the one whose result should be shown and returns
    /// its generation.
    pub fn begin(&mut self, request: FeedRequest) -> u64 {
        self.generation += 1;
        self.phase = FeedPhase::Loading;
        if let FeedRequest::Category(category) = &request {
            self.selected_category = Some(category.clone());
        }
        tracing::debug!(generation = self.generation, request = ?request, "Loading feed");
        self.active_request = Some(request);
        self.generation
    }

    /// Applies a fetch result if it belongs to the latest request. A failure
    /// keeps the previous article list on screen.
    pub fn complete(&mut self, generation: u64, result: Result<Vec<Article>>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "Discarding stale feed result");
            return false;
        }

        match result {
            Ok(articles) => {
                // A pending notice stays until taken
                self.articles = articles;
                self.phase = FeedPhase::Ready;
            }
            Err(e) => {
                self.phase = FeedPhase::Errored;
                self.report(&e, "Feed request failed");
            }
        }
        true
    }

    /// Returns the article at `index` for the detail view and logs the open
    /// in the background. The feed phase is left alone.
    pub fn open_article(&self, index: usize) -> Option<Article> {
        let article = self.articles.get(index)?.clone();

        match &self.user_id {
            Some(user_id) => {
                self.view_log.record_view_detached(user_id, &article);
            }
            None => {
                tracing::error!(error = %AppError::MissingUser, article_id = %article.id, "Article view not logged");
            }
        }

        Some(article)
    }

    /// Recomputes "Continue Reading" and "Recommended" from the view log.
    pub async fn refresh_reading_lists(&mut self) {
        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        let history = match self.view_log.list_for_user(&user_id).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "Failed to read view history");
                return;
            }
        };

        self.continue_reading = self.continue_reading_strategy.derive(&history, &self.articles);
        self.recommended = self.recommended_strategy.derive(&history, &self.articles);
    }

    /// Forgets the session. Fetches still in flight are ignored when they land.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.user_id = None;
        self.phase = FeedPhase::Initial;
        self.categories = CategorySet::new();
        self.selected_category = None;
        self.active_request = None;
        self.articles.clear();
        self.continue_reading.clear();
        self.recommended.clear();
        self.notice = None;
    }

    fn report(&mut self, error: &AppError, context: &str) {
        if error.is_internal() {
            tracing::error!(error = %error, "{context}");
        } else {
            tracing::warn!(error = %error, "{context}");
            self.notice = Some(error.to_string());
        }
    }
}

async fn fetch(source: &dyn ArticleSource, request: &FeedRequest, limits: FeedLimits) -> Result<Vec<Article>> {
    match request {
        FeedRequest::Category(category) => source.fetch_by_category(category, limits.headlines).await,
        FeedRequest::Search(query) => source.search(query, limits.search).await,
    }
}
