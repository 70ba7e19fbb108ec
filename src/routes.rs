//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use crate::{handlers, middleware::AppState};

/// 创建应用路由
///
/// 认证网关覆盖全部路由；公开路径由配置中的
/// auth.excluded_paths 决定，而不是按路由组硬编码。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // 欢迎页与健康检查
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health_check))
        // 注册与会话
        .route("/users", post(handlers::auth::register))
        .route(
            "/sessions",
            post(handlers::auth::login).delete(handlers::auth::logout),
        )
        // 需要认证的资源
        .route("/profile", get(handlers::auth::profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth_gate_middleware,
        ))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}
