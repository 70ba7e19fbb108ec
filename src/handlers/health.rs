//! 健康检查与欢迎页处理器

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::middleware::AppState;

static START_TIME: OnceLock<u64> = OnceLock::new();

/// 记录应用启动时间
pub fn set_start_time() {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let _ = START_TIME.set(now);
}

/// 健康检查项
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
}

/// 存活探针响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub checks: Vec<HealthCheck>,
}

/// 欢迎页 (GET /)
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "Bienvenue" }))
}

/// 存活探针 (GET /health)
///
/// 探测配置的用户存储后端；后端不可达时整体状态降级为
/// degraded，但仍返回 200 以便探针拿到细节。
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store_status = match state.store.health().await {
        Ok(()) => "healthy".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            format!("unhealthy: {}", e)
        }
    };

    let status = if store_status == "healthy" {
        "ok"
    } else {
        "degraded"
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let uptime = START_TIME
        .get()
        .map(|start| now.saturating_sub(*start))
        .unwrap_or(0);

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        checks: vec![HealthCheck {
            name: format!("store:{}", state.config.store.backend),
            status: store_status,
        }],
    })
}
