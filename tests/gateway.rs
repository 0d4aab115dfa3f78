#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for the gateway router: authentication, access rules,
//! rate-limit keys, fallback responses, CORS and actuator endpoints.

use std::collections::HashMap;
use std::net::SocketAddr;

use api_gateway::app::{build_router, build_state};
use api_gateway::config::Config;
use api_gateway::middleware;
use api_gateway::services::rate_limit::RateLimitKey;
use axum::{Extension, Router};
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-0123456789";
const ISSUER: &str = "https://sso.test/realms/store";

fn test_config() -> Config {
    let env: HashMap<&str, &str> = HashMap::from([
        ("JWT_ALGORITHM", "HS256"),
        ("JWT_HMAC_SECRET", SECRET),
        ("JWT_ISSUER", ISSUER),
        ("JWT_LEEWAY_SECONDS", "0"),
    ]);
    Config::from_source(|key| env.get(key).map(|v| v.to_string())).unwrap()
}

fn app() -> Router {
    let config = test_config();
    let state = build_state(&config).unwrap();
    build_router(state, &config)
}

fn token(extra: Value) -> String {
    let mut claims = json!({
        "sub": "sub-1",
        "iss": ISSUER,
        "exp": chrono::Utc::now().timestamp() + 300,
    });
    if let (Some(base), Some(extra)) = (claims.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method(Method::GET).uri(uri)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .oneshot(get("/actuator/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json_body(response).await, json!({"status": "UP"}));
}

#[tokio::test]
async fn info_reports_package_metadata() {
    let response = app()
        .oneshot(get("/actuator/info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["app"]["name"], "api-gateway");
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let response = app()
        .oneshot(get("/api/v1/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn invalid_token_is_401_even_on_public_paths() {
    let response = app()
        .oneshot(
            get("/actuator/health")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .oneshot(
            get("/actuator/health")
                .header(header::AUTHORIZATION, "Bearer   ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_credentials_are_treated_as_anonymous() {
    let basic = "Basic dXNlcjpwYXNz";

    let response = app()
        .oneshot(
            get("/actuator/health")
                .header(header::AUTHORIZATION, basic)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(
            get("/fallback/orders")
                .header(header::AUTHORIZATION, basic)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Still anonymous, so a protected route asks for a bearer token.
    let response = app()
        .oneshot(
            get("/api/v1/me")
                .header(header::AUTHORIZATION, basic)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let jwt = token(json!({"preferred_username": "erin"}));

    let response = app()
        .oneshot(
            get("/api/v1/me")
                .header(header::AUTHORIZATION, format!("bearer {jwt}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["principal"], "erin");
}

#[tokio::test]
async fn me_reports_principal_authorities_and_key() {
    let jwt = token(json!({
        "scope": "openid",
        "realm_access": {"roles": ["admin", " editor "]},
        "resource_access": {"billing-service": {"roles": ["viewer", "admin"]}},
        "preferred_username": "carol"
    }));

    let response = app()
        .oneshot(
            get("/api/v1/me")
                .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["principal"], "carol");
    assert_eq!(
        body["authorities"],
        json!(["SCOPE_openid", "ROLE_admin", "ROLE_editor", "ROLE_viewer"])
    );
    assert_eq!(body["rateLimitKey"], "carol");
}

#[tokio::test]
async fn principal_falls_back_to_subject() {
    let jwt = token(json!({"email": "   "}));

    let response = app()
        .oneshot(
            get("/api/v1/me")
                .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["principal"], "sub-1");
    assert_eq!(body["authorities"], json!([]));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let jwt = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({"sub": "s", "iss": ISSUER, "exp": chrono::Utc::now().timestamp() - 600}),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let response = app()
        .oneshot(
            get("/api/v1/me")
                .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_area_checks_roles() {
    let user = token(json!({"realm_access": {"roles": ["customer"]}}));
    let admin = token(json!({"resource_access": {"console": {"roles": ["SUPER_ADMIN"]}}}));

    let response = app()
        .oneshot(get("/api/admin/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .oneshot(
            get("/api/admin/users")
                .header(header::AUTHORIZATION, format!("Bearer {user}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Access granted; nothing is routed there inside the gateway itself.
    let response = app()
        .oneshot(
            get("/api/admin/users")
                .header(header::AUTHORIZATION, format!("Bearer {admin}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_api_needs_no_token() {
    let response = app()
        .oneshot(get("/api/v1/public/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fallback_returns_503_with_route_details() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/fallback/order-service")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], 503);
    assert_eq!(body["error"], "Service Unavailable");
    assert_eq!(body["message"], "Upstream service is temporarily unavailable.");
    assert_eq!(body["path"], "/fallback/order-service");
    assert_eq!(body["routeId"], "order-service");
    assert!(body["timestamp"].is_string());
}

/// Router exposing the resolved key on a public path, so anonymous callers can
/// be observed too.
fn key_echo_app() -> Router {
    async fn echo(Extension(key): Extension<RateLimitKey>) -> String {
        key.to_string()
    }

    let config = test_config();
    let state = build_state(&config).unwrap();
    let router = Router::new().route("/api/v1/public/key", axum::routing::get(echo));
    let router = middleware::rate_limit_key::apply(router, state.clone());
    let router = middleware::auth::access::apply(router, state.clone());
    router.with_state(state)
}

async fn text_body(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn rate_limit_key_prefers_principal_over_peer_ip() {
    let jwt = token(json!({"preferred_username": "dave"}));
    let mut request = get("/api/v1/public/key")
        .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
        .body(Body::empty())
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 5], 51000))));

    let response = key_echo_app().oneshot(request).await.unwrap();
    assert_eq!(text_body(response).await, "dave");
}

#[tokio::test]
async fn anonymous_caller_is_keyed_by_peer_ip() {
    let mut request = get("/api/v1/public/key").body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 5], 51000))));

    let response = key_echo_app().oneshot(request).await.unwrap();
    assert_eq!(text_body(response).await, "203.0.113.5");
}

#[tokio::test]
async fn anonymous_caller_without_peer_info_shares_one_bucket() {
    let request = get("/api/v1/public/key").body(Body::empty()).unwrap();

    let response = key_echo_app().oneshot(request).await.unwrap();
    assert_eq!(text_body(response).await, "anonymous");
}

#[tokio::test]
async fn cors_preflight_from_localhost_is_allowed() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/me")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
}

#[tokio::test]
async fn cors_rejects_unknown_origin() {
    let response = app()
        .oneshot(
            get("/actuator/health")
                .header(header::ORIGIN, "https://evil.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
