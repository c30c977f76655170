use super::*;
use serde_json::json;

fn transport() -> HttpTransport {
    HttpTransport::new(ClientConfig::new("http://127.0.0.1:8000/")).unwrap()
}

#[test]
fn get_targets_base_url_with_bearer() {
    let request = transport()
        .build(ApiRequest::get("/auth/me").bearer(Some("T".to_owned())))
        .build()
        .unwrap();

    assert_eq!(request.method(), reqwest::Method::GET);
    assert_eq!(request.url().as_str(), "http://127.0.0.1:8000/auth/me");
    assert_eq!(request.headers()[AUTHORIZATION], "Bearer T");
    assert!(request.headers().get(CONTENT_TYPE).is_none());
    assert!(request.body().is_none());
    assert!(request.headers()[reqwest::header::USER_AGENT].to_str().unwrap().starts_with("vitals-cli/"));
}

#[test]
fn form_post_sets_content_type_and_body() {
    let request = transport()
        .build(ApiRequest::post("/auth/login").form("username=a&password=b".to_owned()))
        .build()
        .unwrap();

    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(request.headers()[CONTENT_TYPE], "application/x-www-form-urlencoded");
    assert!(request.headers().get(AUTHORIZATION).is_none());
    let body = request.body().and_then(reqwest::Body::as_bytes).unwrap();
    assert_eq!(body, b"username=a&password=b");
}

#[test]
fn json_post_serializes_payload() {
    let request = transport()
        .build(ApiRequest::post("/auth/register").json(&json!({"username": "anna"})).unwrap())
        .build()
        .unwrap();

    assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    let body = request.body().and_then(reqwest::Body::as_bytes).unwrap();
    assert_eq!(serde_json::from_slice::<serde_json::Value>(body).unwrap(), json!({"username": "anna"}));
}

#[test]
fn dashboard_query_string_is_kept() {
    let request = transport().build(ApiRequest::get("/api/health/dashboard?days=30")).build().unwrap();
    assert_eq!(request.url().query(), Some("days=30"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let transport = HttpTransport::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
    let err = transport.send(ApiRequest::get("/auth/me")).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
