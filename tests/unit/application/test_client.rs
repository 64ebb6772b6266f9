use async_trait::async_trait;
use msc_client::application::client::{ApiCall, Client};
use msc_client::application::config::{Config, Environment};
use msc_client::application::endpoints::ApiNamespace;
use msc_client::error::{AppError, ErrorKind};
use msc_client::model::auth::Credential;
use msc_client::model::http::{HttpRequest, HttpResponse, RequestAuth, Transport};
use msc_client::model::retry::RetryPolicy;
use msc_client::model::schema;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory transport: token requests always succeed, resource requests
/// are answered from a queue
#[derive(Default)]
struct FakeTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    token_requests: Mutex<usize>,
}

impl FakeTransport {
    fn with(responses: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn token_requests(&self) -> usize {
        *self.token_requests.lock().unwrap()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AppError> {
        if request.url.ends_with("/authenticate/token") {
            let mut count = self.token_requests.lock().unwrap();
            *count += 1;
            let body = json!({"access_token": format!("tok-{count}")});
            return Ok(HttpResponse::new(StatusCode::OK, body.to_string()));
        }
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "")))
    }
}

fn client(transport: Arc<FakeTransport>) -> Client<FakeTransport> {
    let config = Config::for_environment(Environment::Test).with_base_url("https://msc.example.com");
    Client::with_transport(config, transport)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(3, Duration::ZERO))
}

fn credential() -> Credential {
    Credential::new("20299078000166", "user", "pass").unwrap()
}

fn ok(body: Value) -> HttpResponse {
    HttpResponse::new(StatusCode::OK, body.to_string())
}

#[tokio::test]
async fn test_get_decodes_money_and_sends_bearer_token() {
    let transport = FakeTransport::with(vec![ok(json!({
        "key": "C1",
        "balance_due": 150050,
        "ur_list": [{"effect_amount": 99}]
    }))]);
    let client = client(transport.clone());

    let contract: Value = client
        .get(&credential(), ApiNamespace::Contracts, Some("C1"), &[("detail", "true")], schema::CONTRACT)
        .await
        .unwrap();

    assert_eq!(contract["balance_due"], json!(1500.5));
    assert_eq!(contract["ur_list"][0]["effect_amount"], json!(0.99));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].url, "https://msc.example.com/contracts/C1");
    assert_eq!(requests[0].query, vec![("detail".to_string(), "true".to_string())]);
    match &requests[0].auth {
        Some(RequestAuth::Bearer(token)) => assert_eq!(token.expose(), "tok-1"),
        other => panic!("unexpected auth: {other:?}"),
    }
}

#[tokio::test]
async fn test_post_encodes_money() {
    let transport = FakeTransport::with(vec![ok(json!({"key": "R1", "discount_rate_per_year": 250}))]);
    let client = client(transport.clone());

    let created: Value = client
        .post(
            &credential(),
            ApiNamespace::Recurrences,
            None,
            json!({"name": "weekly", "discount_rate_per_year": 2.5}),
            schema::RECURRENCE,
        )
        .await
        .unwrap();

    assert_eq!(created["discount_rate_per_year"], json!(2.5));
    let sent = transport.requests()[0].body.clone().unwrap();
    assert_eq!(sent, json!({"name": "weekly", "discount_rate_per_year": 250}));
}

#[tokio::test]
async fn test_token_is_shared_between_calls() {
    let transport = FakeTransport::with(vec![ok(json!({})), ok(json!({}))]);
    let client = client(transport.clone());

    let _: Value = client
        .execute(&credential(), ApiCall::new(Method::GET, ApiNamespace::Positions))
        .await
        .unwrap();
    let _: Value = client
        .execute(&credential(), ApiCall::new(Method::GET, ApiNamespace::Positions))
        .await
        .unwrap();

    assert_eq!(transport.token_requests(), 1);
}

#[tokio::test]
async fn test_status_mapping() {
    let transport = FakeTransport::with(vec![
        HttpResponse::new(StatusCode::NO_CONTENT, ""),
        HttpResponse::new(StatusCode::BAD_REQUEST, "missing field"),
        HttpResponse::new(StatusCode::CONFLICT, "duplicate"),
    ]);
    let client = client(transport);
    let call = || ApiCall::new(Method::GET, ApiNamespace::Contracts).path("C1");

    let err = client.execute_value(&credential(), call()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = client.execute_value(&credential(), call()).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(body) if body == "missing field"));

    let err = client.execute_value(&credential(), call()).await.unwrap_err();
    assert!(matches!(err, AppError::Unexpected { status: StatusCode::CONFLICT, .. }));
}

#[tokio::test]
async fn test_only_ok_counts_as_success() {
    let transport = FakeTransport::with(vec![
        HttpResponse::new(StatusCode::ACCEPTED, r#"{"amount":5}"#),
        HttpResponse::new(StatusCode::CREATED, r#"{"amount":5}"#),
    ]);
    let client = client(transport);
    let call = || {
        ApiCall::new(Method::POST, ApiNamespace::Recurrences)
            .body(json!({"amount": 0.05}), schema::OPERATION)
    };

    let err = client.execute_value(&credential(), call()).await.unwrap_err();
    assert!(matches!(err, AppError::Unexpected { status: StatusCode::ACCEPTED, .. }));

    let err = client.execute_value(&credential(), call()).await.unwrap_err();
    assert!(matches!(err, AppError::Unexpected { status: StatusCode::CREATED, .. }));
}

#[tokio::test]
async fn test_payment_required_is_a_billing_error() {
    let transport = FakeTransport::with(vec![HttpResponse::new(
        StatusCode::PAYMENT_REQUIRED,
        "billing blocked",
    )]);
    let client = client(transport.clone());

    let err = client
        .execute_value(&credential(), ApiCall::new(Method::GET, ApiNamespace::Positions))
        .await
        .unwrap_err();

    assert!(matches!(&err, AppError::Billing(body) if body == "billing blocked"));
    assert_eq!(err.kind(), ErrorKind::Billing);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_no_content_is_not_found_only_on_lookups() {
    let transport = FakeTransport::with(vec![
        HttpResponse::new(StatusCode::NO_CONTENT, ""),
        HttpResponse::new(StatusCode::NO_CONTENT, ""),
    ]);
    let client = client(transport);

    let err = client
        .execute_value(
            &credential(),
            ApiCall::new(Method::PATCH, ApiNamespace::Contracts)
                .path("C1")
                .body(json!({"balance_due": 1}), schema::CONTRACT),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unexpected { status: StatusCode::NO_CONTENT, .. }));

    let err = client
        .execute_value(&credential(), ApiCall::new(Method::GET, ApiNamespace::Contracts).path("C1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let transport = FakeTransport::with(vec![
        HttpResponse::new(StatusCode::BAD_GATEWAY, ""),
        HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE, ""),
        ok(json!({"total_ur_amount": 100})),
    ]);
    let client = client(transport.clone());

    let position = client
        .execute_value(
            &credential(),
            ApiCall::new(Method::GET, ApiNamespace::Positions).returns(schema::POSITION),
        )
        .await
        .unwrap();

    assert_eq!(position["total_ur_amount"], json!(1));
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_server_errors_give_up_after_max_attempts() {
    let transport = FakeTransport::with(Vec::new());
    let client = client(transport.clone());

    let err = client
        .execute_value(&credential(), ApiCall::new(Method::GET, ApiNamespace::Positions))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ServiceUnavailable(StatusCode::INTERNAL_SERVER_ERROR)));
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_unauthorized_resource_call_drops_cached_token() {
    let transport = FakeTransport::with(vec![
        HttpResponse::new(StatusCode::UNAUTHORIZED, ""),
        ok(json!({})),
    ]);
    let client = client(transport.clone());
    let call = || ApiCall::new(Method::GET, ApiNamespace::Recurrences);

    let err = client.execute_value(&credential(), call()).await.unwrap_err();
    assert!(matches!(err, AppError::AuthenticationFailed));
    assert!(client.tokens().is_empty().await);

    client.execute_value(&credential(), call()).await.unwrap();
    assert_eq!(transport.token_requests(), 2);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_execute_deserializes_into_type() {
    #[derive(serde::Deserialize)]
    struct Recurrence {
        key: String,
        discount_rate_per_year: rust_decimal::Decimal,
    }

    let transport = FakeTransport::with(vec![ok(json!({"key": "R1", "discount_rate_per_year": 199}))]);
    let client = client(transport);

    let recurrence: Recurrence = client
        .execute(
            &credential(),
            ApiCall::new(Method::GET, ApiNamespace::Recurrences)
                .path("R1")
                .returns(schema::RECURRENCE),
        )
        .await
        .unwrap();

    assert_eq!(recurrence.key, "R1");
    assert_eq!(recurrence.discount_rate_per_year, rust_decimal::Decimal::new(199, 2));
}

#[test]
fn test_client_rejects_invalid_config() {
    let config = Config::for_environment(Environment::Test).with_base_url("http://example.com");
    let result = Client::with_transport(config, FakeTransport::with(Vec::new()));
    assert!(matches!(result, Err(AppError::Config(_))));
}
