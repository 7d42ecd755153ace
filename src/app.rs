use std::sync::Arc;

use crate::config::Config;
use crate::curation::{FeedCurator, FeedLimits, FeedRequest, PreferenceSelector, PreferenceStore, ViewLog};
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::identity::{IdentityProvider, Session, SupabaseAuth};
use crate::models::Article;
use crate::news::NewsGateway;
use crate::tui::{AppAction, Form, FormKind, InputMode};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    SignUp,
    Onboarding,
    Home,
    Article,
    Profile,
}

pub struct App {
    // Session
    pub session: Option<Session>,
    pub curator: FeedCurator,
    pub selector: PreferenceSelector,

    // UI State
    pub screen: Screen,
    pub form: Form,
    pub search_active: bool,
    pub search_input: String,
    pub selected_index: usize,
    pub catalog_index: usize,
    pub current_article: Option<Article>,
    pub status: Option<String>,
    pub show_help: bool,
    spinner_frame: usize,

    // Services
    identity: Arc<dyn IdentityProvider>,
    store: PreferenceStore,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = Arc::new(Repository::new(&config.db_path).await?);
        let store = PreferenceStore::new(repository.clone()).with_write_mode(config.preference_write);
        let view_log = ViewLog::new(repository);
        let source = Arc::new(NewsGateway::from_config(config));
        let identity = Arc::new(SupabaseAuth::from_config(config)?);

        let curator = FeedCurator::new(store.clone(), source, view_log).with_limits(FeedLimits {
            headlines: config.headline_limit,
            search: config.search_limit,
        });

        Ok(Self::from_parts(identity, store, curator))
    }

    pub fn from_parts(
        identity: Arc<dyn IdentityProvider>,
        store: PreferenceStore,
        curator: FeedCurator,
    ) -> Self {
        Self {
            session: None,
            curator,
            selector: PreferenceSelector::new(),
            screen: Screen::Login,
            form: Form::login(),
            search_active: false,
            search_input: String::new(),
            selected_index: 0,
            catalog_index: 0,
            current_article: None,
            status: None,
            show_help: false,
            spinner_frame: 0,
            identity,
            store,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.show_help {
            InputMode::Help
        } else if self.search_active
            || matches!(self.screen, Screen::Login | Screen::SignUp | Screen::Profile)
        {
            InputMode::Text
        } else {
            InputMode::Normal
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Applies finished background fetches (non-blocking).
    pub async fn poll_feed_results(&mut self) -> Result<()> {
        if !self.curator.poll_results() {
            return Ok(());
        }

        let len = self.curator.articles().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        if let Some(notice) = self.curator.take_notice() {
            self.status = Some(notice);
        }
        self.curator.refresh_reading_lists().await;
        Ok(())
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),
            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
            action if self.search_active => self.handle_search_input(action),
            action => match self.screen {
                Screen::Login | Screen::SignUp | Screen::Profile => {
                    return self.handle_form_action(action).await;
                }
                Screen::Onboarding => self.handle_onboarding_action(action).await,
                Screen::Home => self.handle_home_action(action).await,
                Screen::Article => self.handle_article_action(action).await,
            },
        }

        Ok(false)
    }

    async fn handle_form_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::InputChar(c) => self.form.push_char(c),
            AppAction::InputBackspace => self.form.backspace(),
            AppAction::NextField => self.form.next_field(),
            AppAction::PrevField => self.form.prev_field(),
            AppAction::InputConfirm => self.submit_form().await?,
            AppAction::SwitchForm => match self.form.kind {
                FormKind::Login => self.show_form(Screen::SignUp, Form::sign_up()),
                FormKind::SignUp => self.show_form(Screen::Login, Form::login()),
                FormKind::Profile => {}
            },
            AppAction::SignOut if self.form.kind == FormKind::Profile => self.sign_out().await,
            AppAction::InputCancel => match self.form.kind {
                FormKind::Login => return Ok(true),
                FormKind::SignUp => self.show_form(Screen::Login, Form::login()),
                FormKind::Profile => self.screen = Screen::Home,
            },
            _ => {}
        }
        Ok(false)
    }

    fn show_form(&mut self, screen: Screen, form: Form) {
        self.screen = screen;
        self.form = form;
    }

    async fn submit_form(&mut self) -> Result<()> {
        let result = match self.form.kind {
            FormKind::Login => self.sign_in().await,
            FormKind::SignUp => self.sign_up().await,
            FormKind::Profile => self.update_profile().await,
        };

        // Validation and provider rejections stay on the form
        match result {
            Ok(()) => Ok(()),
            Err(e @ (AppError::Validation(_) | AppError::Auth(_) | AppError::Http(_))) => {
                tracing::warn!(error = %e, form = ?self.form.kind, "Form submission failed");
                self.form.error = Some(e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in(&mut self) -> Result<()> {
        let login = self.form.to_login();
        let email = login.validate()?;
        let session = self.identity.sign_in(email, &login.password).await?;
        self.session = Some(session);
        self.enter_home().await;
        Ok(())
    }

    async fn sign_up(&mut self) -> Result<()> {
        let request = self.form.to_sign_up().validate()?;
        let outcome = self.identity.sign_up(&request).await?;

        let session = match outcome.session {
            Some(session) => session,
            None => match self.identity.sign_in(&request.email, &request.password).await {
                Ok(session) => session,
                Err(e) => {
                    tracing::info!(error = %e, "Sign-up needs confirmation before sign-in");
                    self.show_form(Screen::Login, Form::login());
                    self.status = Some("Account created. Confirm your email, then sign in.".to_string());
                    return Ok(());
                }
            },
        };

        self.session = Some(session);
        self.selector = PreferenceSelector::new();
        self.catalog_index = 0;
        self.screen = Screen::Onboarding;
        self.status = Some("Sign up successful. Pick the topics you want to follow.".to_string());
        Ok(())
    }

    async fn update_profile(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            tracing::error!(error = %AppError::MissingUser, "Profile update without a session");
            return Ok(());
        };

        let update = self.form.to_profile().validate(&session.user.email)?;
        let user = self.identity.update_profile(session, &update).await?;
        session.user = user;
        self.form.error = None;
        self.status = Some("Profile updated successfully".to_string());
        Ok(())
    }

    async fn sign_out(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        if let Err(e) = self.identity.sign_out(session).await {
            tracing::warn!(error = %e, "Sign-out failed");
            self.form.error = Some(format!("Logout failed: {e}"));
            return;
        }

        self.session = None;
        self.curator.reset();
        self.current_article = None;
        self.search_input.clear();
        self.show_form(Screen::Login, Form::login());
    }

    /// Resolves the user's categories and starts loading the first one.
    async fn enter_home(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };

        let request = self.curator.resolve_preferences(&session).await;
        if let Some(notice) = self.curator.take_notice() {
            self.status = Some(notice);
        }
        self.curator.dispatch(request);
        self.selected_index = 0;
        self.screen = Screen::Home;
    }

    async fn handle_onboarding_action(&mut self, action: AppAction) {
        let catalog = self.selector.catalog();
        match action {
            AppAction::MoveDown if self.catalog_index + 1 < catalog.len() => {
                self.catalog_index += 1;
            }
            AppAction::MoveUp if self.catalog_index > 0 => {
                self.catalog_index -= 1;
            }
            AppAction::ToggleCategory | AppAction::Select => {
                if let Some(category) = catalog.get(self.catalog_index) {
                    self.selector.toggle(category.name);
                }
            }
            AppAction::CommitPreferences => self.commit_preferences().await,
            _ => {}
        }
    }

    async fn commit_preferences(&mut self) {
        match self.selector.commit(self.session.as_ref(), &self.store).await {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Onboarding finished");
                self.enter_home().await;
            }
            Err(e) if e.is_internal() => {
                tracing::error!(error = %e, "Could not save preferences");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not save preferences");
                self.status = Some(e.to_string());
            }
        }
    }

    async fn handle_home_action(&mut self, action: AppAction) {
        match action {
            AppAction::MoveDown => {
                let len = self.curator.articles().len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }
            AppAction::MoveUp => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            AppAction::NextCategory => self.step_category(1),
            AppAction::PrevCategory => self.step_category(-1),
            AppAction::Select => {
                if let Some(article) = self.curator.open_article(self.selected_index) {
                    self.current_article = Some(article);
                    self.screen = Screen::Article;
                }
            }
            AppAction::StartSearch => {
                self.search_active = true;
            }
            AppAction::Retry => {
                if let Some(request) = self.curator.active_request().cloned() {
                    self.curator.dispatch(request);
                }
            }
            AppAction::EditProfile => self.edit_profile().await,
            _ => {}
        }
    }

    /// Opens the profile form with the provider's current copy of the user.
    /// A failed refresh falls back to what the session already holds.
    async fn edit_profile(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match self.identity.current_user(session).await {
            Ok(user) => session.user = user,
            Err(e) => tracing::warn!(error = %e, "Could not refresh user before profile edit"),
        }

        self.form = Form::profile(&session.user);
        self.screen = Screen::Profile;
    }

    /// Moves the chip highlight and loads that category.
    fn step_category(&mut self, step: isize) {
        let categories = self.curator.categories();
        if categories.is_empty() {
            return;
        }

        let position = self
            .curator
            .selected_category()
            .and_then(|selected| categories.iter().position(|c| c == selected));
        let next = match position {
            Some(i) => (i as isize + step).rem_euclid(categories.len() as isize) as usize,
            None if step > 0 => 0,
            None => categories.len() - 1,
        };

        let Some(category) = categories.as_slice().get(next).cloned() else {
            return;
        };
        self.curator.dispatch(FeedRequest::Category(category));
        self.selected_index = 0;
    }

    fn handle_search_input(&mut self, action: AppAction) {
        match action {
            AppAction::InputChar(c) => self.search_input.push(c),
            AppAction::InputBackspace => {
                self.search_input.pop();
            }
            AppAction::InputConfirm => {
                self.search_active = false;
                if let Some(request) = FeedRequest::search(&self.search_input) {
                    self.curator.dispatch(request);
                    self.selected_index = 0;
                }
            }
            AppAction::InputCancel => {
                self.search_active = false;
            }
            _ => {}
        }
    }

    async fn handle_article_action(&mut self, action: AppAction) {
        match action {
            AppAction::Back => {
                self.current_article = None;
                self.screen = Screen::Home;
                self.curator.refresh_reading_lists().await;
            }
            AppAction::OpenInBrowser | AppAction::Select => {
                if let Some(article) = &self.current_article {
                    if let Err(e) = open::that(article.url()) {
                        tracing::warn!(url = %article.url(), error = %e, "Failed to open browser");
                        self.status = Some(format!("Could not open browser: {e}"));
                    }
                }
            }
            _ => {}
        }
    }

    /// Clears the one-shot status line; called before each key press is handled.
    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
