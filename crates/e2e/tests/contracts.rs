use reqres_common::contract::{
    build_request_contract, build_response_contract, create_user_response_spec,
    login_response_spec, missing_password_400_spec,
};
use reqres_common::{
    ApiErrorBody, BaseConfig, Error as ContractError, LoginCredentials, LoginResult,
    UserCreationRequest, UserCreationResult,
};
use reqres_e2e::stub::{StubConfig, StubHandle};
use reqres_e2e::{ApiClient, E2eError, RequestBody};

async fn stub() -> (StubHandle, BaseConfig) {
    let stub = StubHandle::spawn(StubConfig::default()).await.unwrap();
    let base = BaseConfig::new(stub.base_url(), "/api");
    (stub, base)
}

#[tokio::test]
async fn login_contract_validates_distinct_successes() {
    let (_stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let request = build_request_contract(&base);
    let contract = login_response_spec();

    let mut tokens = Vec::new();
    for email in ["eve.holt@reqres.in", "janet.weaver@reqres.in"] {
        let body = RequestBody::json(&LoginCredentials::new(email, "anything")).unwrap();
        let exchange = client.post(&request, "/login", body).await.unwrap();
        exchange.validate(&contract).unwrap();
        tokens.push(exchange.extract::<LoginResult>().unwrap().token.unwrap());
    }
    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn missing_password_is_a_400_error_body() {
    let (stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let body = RequestBody::json(&LoginCredentials::email_only("peter@klaven")).unwrap();
    let exchange = client
        .post(&build_request_contract(&base), "/login", body)
        .await
        .unwrap();

    exchange.validate(&missing_password_400_spec()).unwrap();
    let error: ApiErrorBody = exchange.extract().unwrap();
    assert_eq!(error.error, "Missing password");

    // the same body also reads as a failed LoginResult
    let login: LoginResult = exchange.extract().unwrap();
    assert!(!login.is_success());

    let seen = stub.requests();
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn wrong_status_is_reported_by_the_contract() {
    let (_stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let body = RequestBody::json(&LoginCredentials::email_only("peter@klaven")).unwrap();
    let exchange = client
        .post(&build_request_contract(&base), "/login", body)
        .await
        .unwrap();

    let err = exchange.validate(&login_response_spec()).unwrap_err();
    assert!(matches!(
        err,
        E2eError::Contract(ContractError::StatusMismatch { expected: 200, actual: 400 })
    ));
}

#[tokio::test]
async fn unknown_user_cannot_log_in() {
    let (_stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let body = RequestBody::json(&LoginCredentials::new("nobody@example.com", "x")).unwrap();
    let exchange = client
        .post(&build_request_contract(&base), "/login", body)
        .await
        .unwrap();

    exchange.validate(&build_response_contract(400)).unwrap();
    assert_eq!(exchange.extract::<ApiErrorBody>().unwrap().error, "user not found");
}

#[tokio::test]
async fn created_user_round_trips_request_fields() {
    let (_stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let request = UserCreationRequest::new("morpheus", "leader");

    let exchange = client
        .post(
            &build_request_contract(&base),
            "/users",
            RequestBody::json(&request).unwrap(),
        )
        .await
        .unwrap();
    exchange.validate(&create_user_response_spec()).unwrap();

    let created: UserCreationResult = exchange.extract().unwrap();
    assert_eq!(created.name, request.name);
    assert_eq!(created.job, request.job);
    assert!(!created.id.is_empty());
    created.created_at_timestamp().unwrap();

    // re-serializing the model reproduces the server's JSON exactly
    let server_json = exchange.body_json().unwrap();
    assert_eq!(serde_json::to_value(&created).unwrap(), server_json);
}

#[tokio::test]
async fn raw_body_reaches_the_server_verbatim() {
    let (stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let raw = r#"{ "email": "eve.holt@reqres.in", "password": "cityslicka" }"#;

    let exchange = client
        .post(&build_request_contract(&base), "/login", RequestBody::raw(raw))
        .await
        .unwrap();
    exchange.validate(&login_response_spec()).unwrap();
    assert_eq!(stub.requests()[0].body, raw);
}

#[tokio::test]
async fn absolute_url_bypasses_base_path() {
    let (_stub, base) = stub().await;
    let client = ApiClient::new().unwrap();
    let request = build_request_contract(&BaseConfig::new("http://invalid.invalid", "/nope"));
    let url = build_request_contract(&base).url_for("/users");

    let exchange = client
        .post(
            &request,
            &url,
            RequestBody::json(&UserCreationRequest::new("neo", "the one")).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(exchange.status(), 201);
}
