use super::*;
use crate::net::api::ApiClient;
use crate::net::transport::StubTransport;
use crate::net::types::{NETWORK_ERROR, REQUEST_FAILED};
use crate::storage::memory::{MemoryCookieJar, MemoryStorage};
use crate::storage::{KeyValueStore, SessionPersistence, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use crate::util::validators::{EMAIL_INVALID, PASSWORD_TOO_SHORT};
use serde_json::json;
use std::sync::Arc;

// =============================================================
// Helpers
// =============================================================

fn harness(stub: StubTransport) -> (AuthApi, AuthStore, Arc<StubTransport>, Arc<MemoryStorage>) {
    let stub = Arc::new(stub);
    let api = AuthApi::new(ApiClient::new("http://api.test/api/v1", stub.clone()));
    let local = Arc::new(MemoryStorage::default());
    let store = AuthStore::new(SessionPersistence::new(local.clone(), Arc::new(MemoryCookieJar::default())));
    (api, store, stub, local)
}

fn login_ok() -> Value {
    json!({
        "data": {
            "userId": "u-7",
            "email": "test@example.com",
            "firstName": "Test",
            "lastName": "User",
            "roles": ["teacher"],
            "accessToken": "acc",
            "refreshToken": "ref",
            "expiresIn": "15m"
        },
        "error": null
    })
}

fn user_json(first_name: &str) -> Value {
    json!({
        "userId": "u-7",
        "email": "test@example.com",
        "firstName": first_name,
        "lastName": "User",
        "roles": ["teacher"]
    })
}

// =============================================================
// SubmitError
// =============================================================

#[test]
fn from_api_classifies_by_code() {
    assert!(matches!(SubmitError::from_api(ApiError::new(NETWORK_ERROR, "offline")), SubmitError::Network(_)));
    assert!(matches!(
        SubmitError::from_api(ApiError::new("INVALID_CREDENTIALS", "bad")),
        SubmitError::Request(_)
    ));
    assert_eq!(
        SubmitError::from_api(ApiError::new(INVALID_RESPONSE, "garbled")),
        SubmitError::Unexpected("garbled".to_owned())
    );
}

#[test]
fn banner_message_prefers_server_text() {
    let err = SubmitError::Request(ApiError::new("INVALID_CREDENTIALS", "Invalid email or password"));
    assert_eq!(err.banner_message().as_deref(), Some("Invalid email or password"));

    let blank = SubmitError::Request(ApiError::new(REQUEST_FAILED, ""));
    assert_eq!(blank.banner_message().as_deref(), Some(LOGIN_RETRY_MESSAGE));

    assert_eq!(SubmitError::Unexpected("x".to_owned()).banner_message().as_deref(), Some(UNEXPECTED_MESSAGE));
    assert_eq!(SubmitError::Validation(FieldErrors::default()).banner_message(), None);
}

// =============================================================
// submit_login
// =============================================================

#[tokio::test]
async fn submit_login_normalizes_email_and_commits_session() {
    let (api, store, stub, local) = harness(StubTransport::default().respond(200, login_ok()));
    let user = submit_login(&api, &store, "  Test@Example.com ", "x").await.unwrap();
    assert_eq!(user.user_id, "u-7");

    let body: Value = serde_json::from_str(stub.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], "test@example.com");

    let state = store.get();
    assert!(state.is_authenticated);
    assert_eq!(state.access_token.as_deref(), Some("acc"));
    assert_eq!(state.refresh_token.as_deref(), Some("ref"));
    assert_eq!(local.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("acc"));
}

#[tokio::test]
async fn submit_login_validation_failure_skips_network() {
    let (api, store, stub, _) = harness(StubTransport::default());
    let err = submit_login(&api, &store, "nope", "").await.unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors.first(Field::Email), Some(EMAIL_INVALID));
    assert!(stub.requests().is_empty());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn submit_login_passes_server_error_through() {
    let body = json!({ "data": null, "error": { "code": "INVALID_CREDENTIALS", "message": "Invalid email or password" } });
    let (api, store, _, _) = harness(StubTransport::default().respond(401, body));
    let err = submit_login(&api, &store, "a@b.co", "pw").await.unwrap_err();
    match err {
        SubmitError::Request(e) => {
            assert_eq!(e.code, "INVALID_CREDENTIALS");
            assert_eq!(e.message, "Invalid email or password");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn submit_login_network_failure_is_network_error() {
    let (api, store, _, _) = harness(StubTransport::default().fail("connection refused"));
    let err = submit_login(&api, &store, "a@b.co", "pw").await.unwrap_err();
    assert!(matches!(&err, SubmitError::Network(e) if e.message == "connection refused"));
    assert_eq!(err.banner_message().as_deref(), Some("connection refused"));
}

// =============================================================
// sign_out
// =============================================================

#[tokio::test]
async fn sign_out_clears_state_even_when_server_fails() {
    let (api, store, stub, local) = harness(StubTransport::default().respond(200, login_ok()).fail("offline"));
    submit_login(&api, &store, "a@b.co", "pw").await.unwrap();

    let result = sign_out(&api, &store).await;
    assert!(matches!(result, Err(SubmitError::Network(_))));
    assert_eq!(stub.requests()[1].header("Authorization"), Some("Bearer acc"));
    assert_eq!(store.get(), crate::state::auth::AuthState::anonymous());
    for key in [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
        assert_eq!(local.get(key).unwrap(), None);
    }
}

#[tokio::test]
async fn sign_out_without_session_makes_no_request() {
    let (api, store, stub, _) = harness(StubTransport::default());
    assert!(sign_out(&api, &store).await.is_ok());
    assert!(stub.requests().is_empty());
}

// =============================================================
// refresh_session / sync_current_user
// =============================================================

#[tokio::test]
async fn refresh_session_replaces_token_pair() {
    let refreshed = json!({ "data": { "accessToken": "acc-2", "refreshToken": "ref-2" }, "error": null });
    let (api, store, stub, local) = harness(StubTransport::default().respond(200, login_ok()).respond(200, refreshed));
    submit_login(&api, &store, "a@b.co", "pw").await.unwrap();

    refresh_session(&api, &store).await.unwrap();
    let sent: Value = serde_json::from_str(stub.requests()[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, json!({ "refreshToken": "ref" }));

    let state = store.get();
    assert_eq!(state.access_token.as_deref(), Some("acc-2"));
    assert_eq!(state.refresh_token.as_deref(), Some("ref-2"));
    assert_eq!(state.user.unwrap().user_id, "u-7");
    assert_eq!(local.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("ref-2"));
}

#[tokio::test]
async fn refresh_session_failure_keeps_tokens() {
    let denied = json!({ "data": null, "error": { "code": "TOKEN_EXPIRED", "message": "Refresh token expired" } });
    let (api, store, _, _) = harness(StubTransport::default().respond(200, login_ok()).respond(401, denied));
    submit_login(&api, &store, "a@b.co", "pw").await.unwrap();

    assert!(matches!(refresh_session(&api, &store).await, Err(SubmitError::Request(_))));
    assert_eq!(store.access_token().as_deref(), Some("acc"));
}

#[tokio::test]
async fn refresh_and_sync_require_a_session() {
    let (api, store, stub, _) = harness(StubTransport::default());
    assert_eq!(
        refresh_session(&api, &store).await,
        Err(SubmitError::Unexpected(NO_SESSION_MESSAGE.to_owned()))
    );
    assert!(sync_current_user(&api, &store).await.is_err());
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn sync_current_user_updates_store() {
    let me = json!({ "data": user_json("Renamed"), "error": null });
    let (api, store, stub, _) = harness(StubTransport::default().respond(200, login_ok()).respond(200, me));
    submit_login(&api, &store, "a@b.co", "pw").await.unwrap();

    let user = sync_current_user(&api, &store).await.unwrap();
    assert_eq!(user.first_name, "Renamed");
    assert_eq!(stub.requests()[1].url, "http://api.test/api/v1/auth/me");
    assert_eq!(store.get().user.unwrap().first_name, "Renamed");
    assert!(store.is_authenticated());
}

// =============================================================
// register_account
// =============================================================

#[tokio::test]
async fn register_account_sends_normalized_payload() {
    let (api, _, stub, _) = harness(StubTransport::default().respond(201, json!({ "data": { "id": "u-9" }, "error": null })));
    let data = register_account(&api, " New@School.edu", "Secret1!x", "Ada", Some(" ")).await.unwrap();
    assert_eq!(data["id"], "u-9");

    let sent: Value = serde_json::from_str(stub.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, json!({ "email": "new@school.edu", "password": "Secret1!x", "name": "Ada" }));
}

#[tokio::test]
async fn register_account_rejects_weak_password_locally() {
    let (api, _, stub, _) = harness(StubTransport::default());
    let err = register_account(&api, "a@b.co", "Aa1!", "Ada", None).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap().messages(Field::Password), vec![PASSWORD_TOO_SHORT]);
    assert!(stub.requests().is_empty());
}
