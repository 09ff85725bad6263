//! End-to-end tests against a mock Pokemon API.
//!
//! These drive the real reqwest transport, the client wrapper, the assertion
//! layer and the bundled schema through `wiremock`.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use apiprobe::{POKEMON_SCHEMA, PokemonData, pokemon_suite, random_email, schema_dir};
use apiprobe_application::{ApiClient, ApiError, AssertionError, Assertions};
use apiprobe_domain::ClientConfig;
use apiprobe_domain::request::QueryParams;
use apiprobe_infrastructure::{
    JsonSchemaValidator, ReqwestHttpClient, SchemaLoader, SuiteRunner, SystemClock,
    TokioFileSystem,
};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn grimer() -> Value {
    json!({
        "id": 88,
        "name": "grimer",
        "order": 141,
        "height": 9,
        "weight": 300,
        "abilities": [{
            "ability": {"name": "stench", "url": "https://pokeapi.co/api/v2/ability/1/"},
            "is_hidden": false,
            "slot": 1
        }]
    })
}

async fn pokemon_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/88"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grimer()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/8888"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer, config: impl FnOnce(ClientConfig) -> ClientConfig) -> ApiClient<ReqwestHttpClient> {
    let config = config(ClientConfig::new(&server.uri()).expect("mock server URI"));
    ApiClient::new(Arc::new(ReqwestHttpClient::new().expect("client")), config)
}

fn assertions() -> Assertions<SystemClock, JsonSchemaValidator> {
    Assertions::new(Arc::new(SystemClock::new()), Arc::new(JsonSchemaValidator::new()))
}

fn pokemon_schema() -> Value {
    SchemaLoader::<TokioFileSystem>::load_blocking(&schema_dir(None).join("pokemon.schema.json"))
        .expect("bundled schema loads")
}

#[tokio::test]
async fn test_valid_pokemon_lookup() {
    let server = pokemon_server().await;
    let client = client_for(&server, |c| c);
    let assertions = assertions();
    let valid = PokemonData::valid();

    let start = Utc::now();
    let response = client
        .get(&valid.endpoint(), QueryParams::new())
        .await
        .expect("grimer exists");

    assertions.validate_status_code(&response, 200).expect("200");
    assertions.validate_response_time(start).expect("fast enough");
    assertions
        .validate_schema(&response, &pokemon_schema())
        .expect("matches schema");
    assert_eq!(response.data.get("name"), Some(&json!(valid.name)));
    assert!(response.data.get("id").is_some());
}

#[tokio::test]
async fn test_unknown_pokemon_is_404() {
    let server = pokemon_server().await;
    let client = client_for(&server, |c| c);

    let err = client
        .get(&PokemonData::invalid().endpoint(), QueryParams::new())
        .await
        .expect_err("8888 does not exist");

    let envelope = err.response().expect("status error carries an envelope");
    assertions()
        .validate_status_code(envelope, 404)
        .expect("404 via the error envelope");

    let mismatch = assertions()
        .validate_status_code(envelope, 200)
        .expect_err("404 is not 200");
    assert_eq!(mismatch.to_string(), "Expected status 200 but got 404");
}

#[tokio::test]
async fn test_slow_backend_yields_408() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"late": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, |c| c.with_timeout(Duration::from_millis(200)));

    let err = client
        .get("/slow", QueryParams::new())
        .await
        .expect_err("must time out");

    assert!(matches!(err, ApiError::Timeout { timeout_ms: 200, .. }));
    let envelope = err.response().expect("timeout envelope");
    assert_eq!(envelope.status, 408);
    assert_eq!(envelope.status_text, "Request Timeout");
    assert_eq!(envelope.data, None);
}

#[tokio::test]
async fn test_query_params_in_order_without_nulls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;
    let client = client_for(&server, |c| c);

    let params = QueryParams::new()
        .with("limit", Some(20))
        .with("offset", None::<i64>)
        .with("sort", Some("name"));
    client
        .get("/api/v2/pokemon", params)
        .await
        .expect("listing succeeds");

    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("limit=20&sort=name"));
}

#[tokio::test]
async fn test_json_body_round_trip_with_auth() {
    let server = MockServer::start().await;
    let user = json!({"name": "Test User", "email": random_email(), "age": 30});
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(&user))
        .respond_with(ResponseTemplate::new(201).set_body_json(&user))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, |c| c.with_api_key("secret"));

    let response = client.post("/users", &user).await.expect("created");

    assert_eq!(response.status, 201);
    assert_eq!(response.data.as_json(), Some(&user));
}

#[tokio::test]
async fn test_put_patch_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"name": "Updated Name", "age": 30})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Updated Name", "age": 30})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"age": 31})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/99999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = client_for(&server, |c| c);
    let assertions = assertions();

    let updated = client
        .put("/users/1", &json!({"name": "Updated Name", "age": 30}))
        .await
        .expect("updated");
    assert_eq!(updated.data.get("name"), Some(&json!("Updated Name")));

    let patched = client
        .patch("/users/1", &json!({"age": 31}))
        .await
        .expect("patched");
    assert_eq!(patched.data.get("age"), Some(&json!(31)));

    let deleted = client.delete("/users/1").await.expect("deleted");
    assertions.validate_status_code(&deleted, 204).expect("204");

    let missing = client.delete("/users/99999").await.expect_err("not found");
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn test_schema_reports_all_violations() {
    let err = assertions()
        .validate_payload_schema(&json!({"id": "x", "order": 0}), &pokemon_schema())
        .expect_err("two violations");

    let AssertionError::Schema { violations } = &err else {
        panic!("expected a schema error, got {err:?}");
    };
    assert_eq!(violations.len(), 2);
    let message = err.to_string();
    assert!(message.starts_with("Schema validation failed:\n"));
    assert!(message.contains("/id "));
    assert!(message.contains("root \"name\" is a required property"));
}

#[tokio::test]
async fn test_bundled_suite_passes_against_mock() {
    let server = pokemon_server().await;
    let client = client_for(&server, |c| c);
    let schemas = SchemaLoader::new(Arc::new(TokioFileSystem::new()))
        .load_all(&schema_dir(None))
        .await
        .expect("schemas load");
    assert!(schemas.get_by_path(POKEMON_SCHEMA).is_ok());

    let runner = SuiteRunner::new(
        client,
        Arc::new(SystemClock::new()),
        Arc::new(JsonSchemaValidator::cached()),
        schemas,
    );
    let results = runner.run(&pokemon_suite()).await;

    assert!(results.all_passed(), "{results:#?}");
    assert_eq!(results.total, 2);
    assert!((results.pass_rate() - 100.0).abs() < f64::EPSILON);
}
