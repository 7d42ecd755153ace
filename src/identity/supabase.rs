use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Profile, User};

use super::{IdentityProvider, ProfileUpdate, Session, SignUp, SignUpOutcome};

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a Profile,
}

#[derive(Debug, Serialize)]
struct UpdateUserRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Profile>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Profile,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Sign-up answers with a session when auto-confirm is on and with the bare
/// user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        User {
            id: user.id,
            email: user.email.unwrap_or_default(),
            profile: user.user_metadata,
        }
    }
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            user: token.user.into(),
            access_token: token.access_token,
        }
    }
}

/// Client for a GoTrue (Supabase Auth) endpoint.
pub struct SupabaseAuth {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        // Url::join replaces the last segment unless the base ends in '/'
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| AppError::Config(format!("invalid auth_url {base_url:?}: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.auth_url,
            config.auth_api_key.as_deref().unwrap_or_default(),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("invalid auth endpoint {path}: {e}")))
    }

    fn request(&self, builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        let builder = builder.header("apikey", &self.api_key);
        match session {
            Some(session) => builder.bearer_auth(&session.access_token),
            None => builder,
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn sign_up(&self, request: &SignUp) -> Result<SignUpOutcome> {
        let body = SignUpRequest {
            email: &request.email,
            password: &request.password,
            data: &request.profile,
        };

        let response = self
            .request(self.client.post(self.endpoint("auth/v1/signup")?), None)
            .json(&body)
            .send()
            .await?;

        let outcome = match check(response).await?.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => {
                let session: Session = token.into();
                SignUpOutcome {
                    user: session.user.clone(),
                    session: Some(session),
                }
            }
            SignUpResponse::User(user) => SignUpOutcome {
                user: user.into(),
                session: None,
            },
        };

        tracing::info!(user_id = %outcome.user.id, confirmed = outcome.session.is_some(), "Signed up");
        Ok(outcome)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .request(self.client.post(url), None)
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;

        let token: TokenResponse = check(response).await?.json().await?;
        let session: Session = token.into();
        tracing::info!(user_id = %session.user_id(), "Signed in");
        Ok(session)
    }

    async fn current_user(&self, session: &Session) -> Result<User> {
        let response = self
            .request(self.client.get(self.endpoint("auth/v1/user")?), Some(session))
            .send()
            .await?;

        let user: AuthUser = check(response).await?.json().await?;
        Ok(user.into())
    }

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<User> {
        let body = UpdateUserRequest {
            email: update.email.as_deref(),
            data: update.profile.as_ref(),
        };

        let response = self
            .request(self.client.put(self.endpoint("auth/v1/user")?), Some(session))
            .json(&body)
            .send()
            .await?;

        let user: AuthUser = check(response).await?.json().await?;
        Ok(user.into())
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let response = self
            .request(self.client.post(self.endpoint("auth/v1/logout")?), Some(session))
            .send()
            .await?;

        check(response).await?;
        tracing::info!(user_id = %session.user_id(), "Signed out");
        Ok(())
    }
}

/// Turns a non-2xx answer into `AppError::Auth` with the provider's message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let parsed: ErrorResponse = serde_json::from_str(&text).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| format!("HTTP {status}"));

    Err(AppError::Auth(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let auth = SupabaseAuth::new("https://project.supabase.co/", "anon").unwrap();
        assert_eq!(
            auth.endpoint("auth/v1/user").unwrap().as_str(),
            "https://project.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(
            SupabaseAuth::new("not a url", "anon"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_sign_up_response_shapes() {
        let with_session: SignUpResponse = serde_json::from_str(
            r#"{"access_token":"tok","user":{"id":"u1","email":"a@b.co","user_metadata":{"first_name":"Ada"}}}"#,
        )
        .unwrap();
        assert!(matches!(with_session, SignUpResponse::Session(_)));

        let bare: SignUpResponse =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.co"}"#).unwrap();
        match bare {
            SignUpResponse::User(user) => {
                let user: User = user.into();
                assert_eq!(user.id, "u1");
                assert_eq!(user.profile, Profile::default());
            }
            SignUpResponse::Session(_) => panic!("expected bare user"),
        }
    }
}
