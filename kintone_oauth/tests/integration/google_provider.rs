use crate::common::{MockBehavior, MockServer};
use axum::http::StatusCode;
use kintone_oauth::{GoogleProvider, IdentityProvider, OAuth2Error, ProviderConfig};
use serde_json::json;

fn provider_for(server: &MockServer) -> GoogleProvider {
    let config = ProviderConfig {
        client_id: "mock-client-id".to_string(),
        client_secret: "mock-client-secret".to_string(),
        redirect_uri: "https://bridge.example.com/api/oauth/callback".to_string(),
        token_url: server.url("/token"),
        userinfo_url: server.url("/userinfo"),
    };
    GoogleProvider::new(config).expect("provider builds")
}

#[tokio::test]
async fn test_exchange_code_posts_form_fields() {
    let server = MockServer::start(MockBehavior::default()).await;
    let provider = provider_for(&server);

    let tokens = provider
        .exchange_code("4/0AX4XfWh-code")
        .await
        .expect("exchange succeeds");

    assert_eq!(tokens.access_token, "ya29.mock_access_token");
    assert_eq!(tokens.refresh_token.as_deref(), Some("1//mock_refresh_token"));
    assert_eq!(tokens.expires_in, 3599);

    let requests = server.token_requests();
    assert_eq!(requests.len(), 1);
    let form = &requests[0];
    assert_eq!(form["client_id"], "mock-client-id");
    assert_eq!(form["client_secret"], "mock-client-secret");
    assert_eq!(form["code"], "4/0AX4XfWh-code");
    assert_eq!(form["grant_type"], "authorization_code");
    assert_eq!(
        form["redirect_uri"],
        "https://bridge.example.com/api/oauth/callback"
    );
}

#[tokio::test]
async fn test_fetch_profile_sends_bearer_token() {
    let server = MockServer::start(MockBehavior::default()).await;
    let provider = provider_for(&server);

    let profile = provider
        .fetch_profile("ya29.mock_access_token")
        .await
        .expect("profile fetch succeeds");

    assert_eq!(profile.email, "first.last@example.com");
    assert_eq!(profile.name.as_deref(), Some("First Last"));
    assert_eq!(
        server.userinfo_authorizations(),
        vec![Some("Bearer ya29.mock_access_token".to_string())]
    );
}

#[tokio::test]
async fn test_exchange_code_error_status_keeps_upstream_detail() {
    let server = MockServer::start(MockBehavior {
        token_status: StatusCode::BAD_REQUEST,
        token_body: json!({"error": "invalid_grant", "error_description": "Bad Request"}),
        ..MockBehavior::default()
    })
    .await;

    let result = provider_for(&server).exchange_code("used-code").await;

    match result {
        Err(OAuth2Error::TokenExchange(detail)) => {
            assert!(detail.contains("400"), "{detail}");
            assert!(detail.contains("invalid_grant"), "{detail}");
        }
        other => panic!("Expected TokenExchange error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_code_success_without_access_token() {
    let server = MockServer::start(MockBehavior {
        token_body: json!({"token_type": "Bearer", "expires_in": 3599}),
        ..MockBehavior::default()
    })
    .await;

    let result = provider_for(&server).exchange_code("code").await;
    assert!(matches!(result, Err(OAuth2Error::TokenExchange(_))));
}

#[tokio::test]
async fn test_exchange_code_transport_error() {
    let config = ProviderConfig {
        token_url: "http://127.0.0.1:1/token".to_string(),
        ..ProviderConfig::google("id", "secret", "https://bridge.example.com/cb")
    };
    let provider = GoogleProvider::new(config).expect("provider builds");

    let result = provider.exchange_code("code").await;
    assert!(matches!(result, Err(OAuth2Error::TokenExchange(_))));
}

#[tokio::test]
async fn test_fetch_profile_error_status() {
    let server = MockServer::start(MockBehavior {
        userinfo_status: StatusCode::UNAUTHORIZED,
        userinfo_body: json!({"error": {"code": 401, "message": "Invalid Credentials"}}),
        ..MockBehavior::default()
    })
    .await;

    let result = provider_for(&server).fetch_profile("expired").await;
    match result {
        Err(OAuth2Error::FetchUserInfo(detail)) => assert!(detail.contains("401"), "{detail}"),
        other => panic!("Expected FetchUserInfo error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_profile_without_email() {
    let server = MockServer::start(MockBehavior {
        userinfo_body: json!({"id": "1", "name": "No Email"}),
        ..MockBehavior::default()
    })
    .await;

    let result = provider_for(&server).fetch_profile("token").await;
    assert!(matches!(result, Err(OAuth2Error::FetchUserInfo(_))));
}
