//! Path-based access-control policy
//!
//! A request either hits an excluded path (no credentials needed) or
//! it requires authentication. Rules are exact path strings or
//! trailing-`*` prefix patterns; the first matching rule exempts.

/// Decide whether a request path requires authentication.
///
/// Fail-secure: a missing path or an empty rule list requires auth.
/// The path is normalized by appending a trailing slash before exact
/// comparison (so `/profile` and `/profile/` are the same route);
/// wildcard rules match the normalized path by prefix.
pub fn requires_auth(path: Option<&str>, excluded_paths: Option<&[String]>) -> bool {
    let Some(path) = path else {
        return true;
    };
    let Some(excluded_paths) = excluded_paths else {
        return true;
    };
    if excluded_paths.is_empty() {
        return true;
    }

    let normalized = normalize(path);

    for rule in excluded_paths {
        if let Some(prefix) = rule.strip_suffix('*') {
            if normalized.starts_with(prefix) {
                return false;
            }
        }

        if normalized == *rule {
            return false;
        }
    }

    true
}

/// Append a trailing slash unless one is already present. Idempotent.
fn normalize(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
