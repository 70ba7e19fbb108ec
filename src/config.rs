//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:3000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout_secs: u64,
    /// 连接最大生命周期（秒）
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// 用户存储后端: memory, postgres
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 认证方案: none, basic, session
    pub scheme: String,
    /// 会话 Cookie 名称
    pub session_cookie_name: String,
    /// 免认证路径（精确匹配或尾部 * 前缀匹配）
    pub excluded_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("database.url", "postgresql://localhost:5432/auth_system")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("store.backend", "memory")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("auth.scheme", "session")?
            .set_default("auth.session_cookie_name", "session_id")?
            .set_default(
                "auth.excluded_paths",
                vec!["/", "/health/", "/users/", "/sessions/"],
            )?;

        // 从环境变量加载配置（前缀为 AUTH_）
        settings = settings.add_source(
            Environment::with_prefix("AUTH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .with_list_parse_key("auth.excluded_paths")
                .list_separator(","),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port < 1024 {
                    return Err(ConfigError::Message(
                        "Server port should be >= 1024".to_string(),
                    ));
                }
            }
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证存储后端
        match self.store.backend.to_lowercase().as_str() {
            "memory" | "postgres" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid store backend: {}. Must be one of: memory, postgres",
                    self.store.backend
                )))
            }
        }

        // 验证认证方案
        match self.auth.scheme.to_lowercase().as_str() {
            "none" | "basic" | "session" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid auth scheme: {}. Must be one of: none, basic, session",
                    self.auth.scheme
                )))
            }
        }

        // 验证会话 Cookie 名称
        if self.auth.session_cookie_name.is_empty() {
            return Err(ConfigError::Message(
                "auth.session_cookie_name must not be empty".to_string(),
            ));
        }

        // 验证数据库连接池配置
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        Ok(())
    }
}
