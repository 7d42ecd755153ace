use newspalette::error::AppError;
use newspalette::identity::{IdentityProvider, ProfileUpdate, Session, SignUp, SupabaseAuth};
use newspalette::models::{Profile, User};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: &str, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": email,
        "user_metadata": {
            "first_name": "Ada",
            "last_name": "Lovelace",
            "phone": "5551234567",
        },
    })
}

fn auth(server: &MockServer) -> SupabaseAuth {
    SupabaseAuth::new(&server.uri(), "anon-key").unwrap()
}

#[tokio::test]
async fn test_sign_in_returns_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_partial_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "user": user_json("user-1", "ada@example.com"),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = auth(&server)
        .sign_in("ada@example.com", "secret123")
        .await
        .unwrap();

    assert_eq!(session.user_id(), "user-1");
    assert_eq!(session.access_token, "jwt-token");
    assert_eq!(session.user.profile.first_name, "Ada");
}

#[tokio::test]
async fn test_rejected_credentials_surface_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials",
        })))
        .mount(&server)
        .await;

    match auth(&server).sign_in("ada@example.com", "wrong").await {
        Err(AppError::Auth(message)) => assert_eq!(message, "Invalid login credentials"),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sign_up_without_session_needs_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "data": { "first_name": "Ada" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("user-2", "ada@example.com")))
        .expect(1)
        .mount(&server)
        .await;

    let request = SignUp {
        email: "ada@example.com".to_string(),
        password: "secret123".to_string(),
        profile: Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: "5551234567".to_string(),
        },
    };

    let outcome = auth(&server).sign_up(&request).await.unwrap();
    assert_eq!(outcome.user.id, "user-2");
    assert!(outcome.session.is_none());
}

#[tokio::test]
async fn test_profile_update_and_sign_out_send_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "user": user_json("user-1", "ada@example.com"),
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer jwt-token"))
        .and(body_partial_json(json!({ "email": "ada@newmail.example" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("user-1", "ada@newmail.example")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let auth = auth(&server);
    let session = auth.sign_in("ada@example.com", "secret123").await.unwrap();

    let update = ProfileUpdate {
        email: Some("ada@newmail.example".to_string()),
        profile: None,
    };
    let user = auth.update_profile(&session, &update).await.unwrap();
    assert_eq!(user.email, "ada@newmail.example");

    auth.sign_out(&session).await.unwrap();
}

#[tokio::test]
async fn test_current_user_maps_profile_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("user-1", "ada@example.com")))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session {
        user: User {
            id: "user-1".to_string(),
            email: String::new(),
            profile: Profile::default(),
        },
        access_token: "jwt-token".to_string(),
    };

    let user = auth(&server).current_user(&session).await.unwrap();
    assert_eq!(user.id, "user-1");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.profile.last_name, "Lovelace");
    assert_eq!(user.profile.phone, "5551234567");
}

#[tokio::test]
async fn test_expired_token_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "msg": "invalid JWT: token is expired",
        })))
        .mount(&server)
        .await;

    let session = Session {
        user: User {
            id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            profile: Profile::default(),
        },
        access_token: "stale".to_string(),
    };

    match auth(&server).current_user(&session).await {
        Err(AppError::Auth(message)) => assert!(message.contains("expired")),
        other => panic!("expected auth error, got {other:?}"),
    }
}
