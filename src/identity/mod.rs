mod supabase;
pub mod validation;

pub use supabase::SupabaseAuth;
pub use validation::{LoginForm, ProfileForm, SignUpForm};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Profile, User};

/// Signed-in user plus the credential for authenticated identity calls.
///
/// Created on successful sign-in (or sign-up with an immediate session) and
/// dropped on sign-out. Components that act on behalf of a user take it
/// explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Validated sign-up input.
#[derive(Debug, Clone, Serialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub profile: Profile,
}

/// Fields to change on the current user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: User,
    /// Present when the provider signs the user in right away, absent when it
    /// wants the email confirmed first.
    pub session: Option<Session>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, request: &SignUp) -> Result<SignUpOutcome>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn current_user(&self, session: &Session) -> Result<User>;

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<User>;

    async fn sign_out(&self, session: &Session) -> Result<()>;
}
