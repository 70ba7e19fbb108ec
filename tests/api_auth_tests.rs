//! 认证 API 集成测试
//!
//! 基于内存存储构建完整路由，使用 oneshot 逐个请求验证

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;
use common::{create_test_app_state, create_test_user};

/// 从 Set-Cookie 响应头提取 "name=value" 片段
fn extract_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(';').next())
        .expect("response should set a cookie")
        .to_string()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_welcome_route_is_public() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "Bienvenue");
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"][0]["name"], "store:memory");
    assert_eq!(json["checks"][0]["status"], "healthy");
}

#[tokio::test]
async fn test_register_success() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(form_request(
            "/users",
            "email=bob%40holberton.io&password=toto1234",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["email"], "bob@holberton.io");
    assert_eq!(json["message"], "user created");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let state = create_test_app_state("session");
    create_test_user(&state, "bob@holberton.io", "toto1234").await;

    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(form_request(
            "/users",
            "email=bob%40holberton.io&password=other5678",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "email already registered");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(form_request("/users", "email=bob%40holberton.io&password="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let state = create_test_app_state("session");
    create_test_user(&state, "bob@holberton.io", "toto1234").await;

    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(form_request(
            "/sessions",
            "email=bob%40holberton.io&password=toto1234",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = extract_cookie(&response);
    assert!(cookie.starts_with("session_id="));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["email"], "bob@holberton.io");
    assert_eq!(json["message"], "logged in");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let state = create_test_app_state("session");
    create_test_user(&state, "bob@holberton.io", "toto1234").await;

    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(form_request(
            "/sessions",
            "email=bob%40holberton.io&password=wrong",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_requires_credentials() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    // 无 Cookie：网关在凭据缺失时返回 401
    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_invalid_cookie() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    // 携带了 Cookie 但解析不到用户：403
    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header(header::COOKIE, "session_id=not-a-real-session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_then_profile() {
    let state = create_test_app_state("session");
    create_test_user(&state, "bob@holberton.io", "toto1234").await;

    let app = auth_system::routes::create_router(state);

    let login = app
        .clone()
        .oneshot(form_request(
            "/sessions",
            "email=bob%40holberton.io&password=toto1234",
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = extract_cookie(&login);

    let profile = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(profile.status(), StatusCode::OK);

    let bytes = profile.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["email"], "bob@holberton.io");
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let state = create_test_app_state("session");
    create_test_user(&state, "bob@holberton.io", "toto1234").await;

    let app = auth_system::routes::create_router(state);

    let login = app
        .clone()
        .oneshot(form_request(
            "/sessions",
            "email=bob%40holberton.io&password=toto1234",
        ))
        .await
        .unwrap();
    let cookie = extract_cookie(&login);

    // 登出后重定向到欢迎页
    let logout = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/sessions")
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    assert_eq!(logout.headers().get(header::LOCATION).unwrap(), "/");

    // 旧 Cookie 不再可用
    let profile = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_without_session() {
    let state = create_test_app_state("session");
    let app = auth_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_basic_scheme_profile() {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

    let state = create_test_app_state("basic");
    create_test_user(&state, "bob@holberton.io", "toto1234").await;

    let app = auth_system::routes::create_router(state);

    // 无凭据：401
    let unauthorized = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    // 合法 Basic 凭据：200
    let header_value = format!("Basic {}", BASE64.encode("bob@holberton.io:toto1234"));
    let profile = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header(header::AUTHORIZATION, header_value)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::OK);

    // 无法解码的头部视为凭据无效：403
    let garbled = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(garbled.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_disabled_scheme_allows_everything() {
    let state = create_test_app_state("none");
    let app = auth_system::routes::create_router(state);

    // 方案关闭时受保护路径也放行，但无当前用户可供 /profile 解析
    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
