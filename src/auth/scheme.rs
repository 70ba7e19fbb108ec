//! Authentication scheme variants
//!
//! One tagged union instead of an inheritance chain: the variant is
//! picked once at configuration time and every request goes through
//! the same capability set (require_auth / credential extraction /
//! current_user).

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::{
    auth::policy,
    config::AuthConfig,
    error::AppError,
    models::User,
    services::AuthService,
};

const BASIC_PREFIX: &str = "Basic ";

/// Configured authentication scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// Authentication disabled; every request is anonymous.
    Disabled,
    /// `Authorization: Basic <base64(email:password)>` per request.
    Basic,
    /// Session id carried in a cookie, resolved against the store.
    SessionCookie { cookie_name: String },
}

impl AuthScheme {
    /// 根据配置选择认证方案
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        match config.scheme.to_lowercase().as_str() {
            "none" => Ok(AuthScheme::Disabled),
            "basic" => Ok(AuthScheme::Basic),
            "session" => Ok(AuthScheme::SessionCookie {
                cookie_name: config.session_cookie_name.clone(),
            }),
            other => Err(AppError::Config(format!("unknown auth scheme: {}", other))),
        }
    }

    /// Whether this request path needs credentials under this scheme.
    pub fn require_auth(&self, path: Option<&str>, excluded_paths: Option<&[String]>) -> bool {
        match self {
            AuthScheme::Disabled => false,
            _ => policy::requires_auth(path, excluded_paths),
        }
    }

    /// Raw `Authorization` header value, if any.
    pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
        headers.get("authorization").and_then(|v| v.to_str().ok())
    }

    /// Session cookie value for this scheme's cookie name.
    pub fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        let AuthScheme::SessionCookie { cookie_name } = self else {
            return None;
        };
        let jar = CookieJar::from_headers(headers);
        jar.get(cookie_name).map(|c| c.value().to_string())
    }

    /// Whether the request carries credentials this scheme understands.
    ///
    /// Distinguishes "nothing presented" (401) from "presented but
    /// unresolvable" (403) at the gate.
    pub fn has_credentials(&self, headers: &HeaderMap) -> bool {
        match self {
            AuthScheme::Disabled => false,
            AuthScheme::Basic => Self::authorization_header(headers).is_some(),
            AuthScheme::SessionCookie { .. } => self.session_cookie(headers).is_some(),
        }
    }

    /// Resolve the user this request authenticates as.
    ///
    /// Every malformed input degrades to `None`; credential parsing
    /// never produces an error.
    pub async fn current_user(&self, headers: &HeaderMap, service: &AuthService) -> Option<User> {
        match self {
            AuthScheme::Disabled => None,
            AuthScheme::Basic => {
                let header = Self::authorization_header(headers)?;
                let (email, password) = extract_basic_credentials(header)?;
                service.user_from_credentials(&email, &password).await
            }
            AuthScheme::SessionCookie { .. } => {
                let session_id = self.session_cookie(headers);
                service.session_to_user(session_id.as_deref()).await
            }
        }
    }
}

/// Parse a Basic authorization header into (email, password).
///
/// Strict "Basic " prefix, base64 decode, split on the first colon;
/// any failure is `None`.
fn extract_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix(BASIC_PREFIX)?;
    let decoded = BASE64.decode(encoded.as_bytes()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}
