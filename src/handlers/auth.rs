//! 认证相关的 HTTP 处理器

use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::AppError,
    middleware::{AppState, CurrentUser},
    models::{LoginForm, RegisterForm},
};

/// 注册 (POST /users)
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, AppError> {
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    let user = state.auth_service.register(&email, &password).await?;

    Ok(Json(json!({
        "email": user.email,
        "message": "user created"
    })))
}

/// 登录 (POST /sessions)
///
/// 凭据有效时创建会话并写入会话 Cookie。
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    if !state.auth_service.valid_login(&email, &password).await {
        return Err(AppError::Unauthorized);
    }

    let session_id = state
        .auth_service
        .create_session(&email)
        .await
        .ok_or(AppError::Unauthorized)?;

    let cookie_name = state.config.auth.session_cookie_name.clone();
    let cookie = Cookie::build((cookie_name, session_id))
        .path("/")
        .http_only(true)
        .build();

    Ok((
        jar.add(cookie),
        Json(json!({
            "email": email,
            "message": "logged in"
        })),
    ))
}

/// 登出 (DELETE /sessions)
///
/// Cookie 无法解析到用户时返回 403；成功后清除 Cookie 并重定向到 /。
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let cookie_name = state.config.auth.session_cookie_name.clone();
    let session_id = jar.get(&cookie_name).map(|c| c.value().to_string());

    let user = state
        .auth_service
        .session_to_user(session_id.as_deref())
        .await
        .ok_or(AppError::Forbidden)?;

    state.auth_service.destroy_session(user.id).await?;

    let removal = Cookie::build((cookie_name, String::new())).path("/");
    Ok((jar.remove(removal), Redirect::to("/")))
}

/// 当前用户资料 (GET /profile)
///
/// 认证网关已解析用户时直接使用；否则回退到会话 Cookie 解析，
/// 解析失败返回 403。
pub async fn profile(
    State(state): State<Arc<AppState>>,
    current_user: Option<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user = match current_user {
        Some(CurrentUser(user)) => user,
        None => {
            let cookie_name = &state.config.auth.session_cookie_name;
            let session_id = jar.get(cookie_name).map(|c| c.value().to_string());
            state
                .auth_service
                .session_to_user(session_id.as_deref())
                .await
                .ok_or(AppError::Forbidden)?
        }
    };

    Ok(Json(json!({ "email": user.email })))
}
