use crate::common::{MockBehavior, MockServer};
use axum::http::{Method, StatusCode};
use kintone_oauth::{
    CallbackConfig, CallbackContext, CallbackOutcome, CallbackParams, CallbackService,
    encode_state,
};
use serde_json::json;
use std::collections::HashMap;

/// Callback flow tests against the mock provider
///
/// The service is built exactly as the binary builds it, from key/value
/// configuration, with the endpoints pointed at the mock server.
fn config_for(server: &MockServer, extra: &[(&str, &str)]) -> CallbackConfig {
    let mut values: HashMap<String, String> = [
        ("GOOGLE_CLIENT_ID", "mock-client-id".to_string()),
        ("GOOGLE_CLIENT_SECRET", "mock-client-secret".to_string()),
        ("ORIGIN", "https://bridge.example.com".to_string()),
        ("OAUTH2_TOKEN_URL", server.url("/token")),
        ("OAUTH2_USERINFO_URL", server.url("/userinfo")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    for (k, v) in extra {
        values.insert(k.to_string(), v.to_string());
    }

    CallbackConfig::from_lookup(|key| values.get(key).cloned()).expect("config loads")
}

fn callback_params(code: &str) -> CallbackParams {
    let context = CallbackContext::new("https://acme.cybozu.com", 42, json!({"view": 7}));
    CallbackParams {
        code: Some(code.to_string()),
        state: Some(encode_state(&context).expect("state encodes")),
        error: None,
    }
}

fn assert_success_redirect(outcome: &CallbackOutcome) {
    let location = outcome.location().expect("expected a redirect");
    assert!(
        location.starts_with("https://acme.cybozu.com/k/42/?auth_success=1&customer_key=customer_acme_"),
        "{location}"
    );
    assert!(
        location.ends_with("&email=first.last%40example.com"),
        "{location}"
    );
}

#[tokio::test]
async fn test_full_flow_relays_to_webhook() {
    let server = MockServer::start(MockBehavior::default()).await;
    let webhook_url = server.url("/webhook");
    let config = config_for(&server, &[("ZAPIER_WEBHOOK_URL", webhook_url.as_str())]);
    let service = CallbackService::from_config(&config).expect("service builds");

    let outcome = service
        .handle_callback(&Method::GET, &callback_params("auth-code"))
        .await;

    assert_success_redirect(&outcome);

    let token_requests = server.token_requests();
    assert_eq!(token_requests.len(), 1);
    assert_eq!(
        token_requests[0]["redirect_uri"],
        "https://bridge.example.com/api/oauth/callback"
    );
    assert_eq!(server.userinfo_authorizations().len(), 1);

    let payloads = server.webhook_payloads();
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload["mail_email"], "first.last@example.com");
    assert_eq!(payload["mail_name"], "First Last");
    assert_eq!(payload["mail_access_token"], "ya29.mock_access_token");
    assert_eq!(payload["mail_refresh_token"], "1//mock_refresh_token");
    assert_eq!(payload["mail_token_type"], "Bearer");
    assert_eq!(payload["mail_expires_in"], 3599);
    assert_eq!(payload["return_domain"], "https://acme.cybozu.com");
    assert_eq!(payload["app_id"], 42);

    let key = payload["mail_customer_key"].as_str().expect("key is a string");
    let location = outcome.location().unwrap();
    assert!(location.contains(&format!("customer_key={key}&")), "{location}");
}

#[tokio::test]
async fn test_missing_access_token_never_fetches_profile() {
    let server = MockServer::start(MockBehavior {
        token_body: json!({"error": "invalid_grant"}),
        ..MockBehavior::default()
    })
    .await;
    let service = CallbackService::from_config(&config_for(&server, &[])).unwrap();

    let outcome = service
        .handle_callback(&Method::GET, &callback_params("auth-code"))
        .await;

    assert_eq!(
        outcome.location(),
        Some("https://acme.cybozu.com?auth_error=1&error_message=Failed%20to%20obtain%20access%20token")
    );
    assert!(server.userinfo_authorizations().is_empty());
}

#[tokio::test]
async fn test_webhook_error_status_does_not_block_redirect() {
    let server = MockServer::start(MockBehavior {
        webhook_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..MockBehavior::default()
    })
    .await;
    let webhook_url = server.url("/webhook");
    let config = config_for(&server, &[("ZAPIER_WEBHOOK_URL", webhook_url.as_str())]);
    let service = CallbackService::from_config(&config).unwrap();

    let outcome = service
        .handle_callback(&Method::GET, &callback_params("auth-code"))
        .await;

    assert_success_redirect(&outcome);
    assert_eq!(server.webhook_payloads().len(), 1);
}

#[tokio::test]
async fn test_unreachable_webhook_does_not_block_redirect() {
    let server = MockServer::start(MockBehavior::default()).await;
    let config = config_for(&server, &[("ZAPIER_WEBHOOK_URL", "http://127.0.0.1:1/hook")]);
    let service = CallbackService::from_config(&config).unwrap();

    let outcome = service
        .handle_callback(&Method::GET, &callback_params("auth-code"))
        .await;

    assert_success_redirect(&outcome);
}

#[tokio::test]
async fn test_placeholder_webhook_is_not_called() {
    let server = MockServer::start(MockBehavior::default()).await;
    let webhook_url = format!("{}?sample=14502913", server.url("/webhook"));
    let config = config_for(
        &server,
        &[
            ("ZAPIER_WEBHOOK_URL", webhook_url.as_str()),
            ("ZAPIER_WEBHOOK_PLACEHOLDER", "14502913"),
        ],
    );
    let service = CallbackService::from_config(&config).unwrap();

    let outcome = service
        .handle_callback(&Method::GET, &callback_params("auth-code"))
        .await;

    assert_success_redirect(&outcome);
    assert!(server.webhook_payloads().is_empty());
}

#[tokio::test]
async fn test_test_code_makes_no_outbound_call() {
    let server = MockServer::start(MockBehavior::default()).await;
    let webhook_url = server.url("/webhook");
    let config = config_for(&server, &[("ZAPIER_WEBHOOK_URL", webhook_url.as_str())]);
    let service = CallbackService::from_config(&config).unwrap();

    let outcome = service
        .handle_callback(&Method::GET, &callback_params("test"))
        .await;

    match outcome {
        CallbackOutcome::Json { status, body } => {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["customerKey"], "test_customer_key_12345");
            assert_eq!(body["decodedState"]["state"], json!({"view": 7}));
        }
        other => panic!("Expected JSON outcome, got {other:?}"),
    }
    assert!(server.token_requests().is_empty());
    assert!(server.userinfo_authorizations().is_empty());
    assert!(server.webhook_payloads().is_empty());
}
