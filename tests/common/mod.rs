//! 测试公共模块
//! 提供测试辅助函数和测试工具

use auth_system::{
    auth::AuthScheme,
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig, StoreConfig},
    middleware::AppState,
    services::AuthService,
    store::{MemoryUserStore, UserStore},
};
use secrecy::Secret;
use std::sync::Arc;

/// 创建测试配置
pub fn create_test_config(scheme: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://localhost:5432/auth_system_test".to_string()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        store: StoreConfig {
            backend: "memory".to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        auth: AuthConfig {
            scheme: scheme.to_string(),
            session_cookie_name: "session_id".to_string(),
            excluded_paths: vec![
                "/".to_string(),
                "/health/".to_string(),
                "/users/".to_string(),
                "/sessions/".to_string(),
            ],
        },
    }
}

/// 创建基于内存存储的测试应用状态
pub fn create_test_app_state(scheme: &str) -> Arc<AppState> {
    let config = create_test_config(scheme);
    let auth_scheme = AuthScheme::from_config(&config.auth).expect("valid auth scheme");
    let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());

    Arc::new(AppState {
        config,
        auth_service: Arc::new(AuthService::new(store.clone())),
        auth_scheme,
        store,
    })
}

/// 创建测试用户
pub async fn create_test_user(state: &Arc<AppState>, email: &str, password: &str) {
    state
        .auth_service
        .register(email, password)
        .await
        .expect("Failed to create test user");
}
