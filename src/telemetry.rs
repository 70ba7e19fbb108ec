//! 日志与追踪系统
//! 结构化日志初始化；启动时一并记录认证服务的关键配置

use crate::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志系统
///
/// 按配置选择 JSON 或美化输出，并在启动日志中带上存储后端与
/// 认证方案，便于从一条日志确认进程的实际运行形态。
pub fn init_telemetry(config: &AppConfig) {
    let env_filter = build_env_filter(&config.logging.level);

    let log_layer = match config.logging.format.to_lowercase().as_str() {
        // JSON 格式（生产环境）
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .boxed(),
        // 美化格式（开发环境）
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        store_backend = %config.store.backend,
        auth_scheme = %config.auth.scheme,
        "Telemetry initialized"
    );
}

/// RUST_LOG 优先于配置中的日志级别
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
