//! 用户认证服务主入口

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use auth_system::{
    auth::AuthScheme,
    config::AppConfig,
    db,
    handlers::health,
    middleware::AppState,
    routes,
    services::AuthService,
    store::{MemoryUserStore, PgUserStore, UserStore},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("auth-system {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    if let Ok(path) = std::env::var("AUTH_ENV") {
        dotenv::from_filename(format!(".env.{}", path)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    // 设置应用启动时间
    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Auth system starting...");

    // 3. 用户存储后端
    let store: Arc<dyn UserStore> = match config.store.backend.to_lowercase().as_str() {
        "postgres" => {
            let db_pool = db::create_pool(&config.database).await?;
            db::run_migrations(&db_pool).await?;
            tracing::info!("Database initialized");
            Arc::new(PgUserStore::new(db_pool))
        }
        _ => {
            tracing::info!("Using in-memory user store");
            Arc::new(MemoryUserStore::new())
        }
    };

    // 4. 构建应用状态
    let auth_scheme = AuthScheme::from_config(&config.auth)
        .map_err(|e| anyhow::anyhow!("Failed to configure auth scheme: {}", e))?;

    tracing::info!(scheme = %config.auth.scheme, "Auth scheme configured");

    let app_state = Arc::new(AppState {
        config: config.clone(),
        auth_service: Arc::new(AuthService::new(store.clone())),
        auth_scheme,
        store,
    });

    // 5. 构建路由
    let app = routes::create_router(app_state.clone());

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        "Server listening"
    );

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 超时后强制关闭
    tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
    tracing::warn!("Graceful shutdown timeout reached, forcing exit");
}

/// 打印帮助信息
fn print_help() {
    println!("auth-system {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: auth-system [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 AUTH_ 前缀的环境变量完成");
    println!("  例如 AUTH_SERVER__ADDR、AUTH_STORE__BACKEND、AUTH_AUTH__SCHEME");
}
