//! Caller Identity Extractor
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user as `x-user-id` / `x-user-role` headers. Handlers that scope data to
//! the caller take a [`CallerIdentity`] argument instead of reading any
//! ambient "current user".

use axum::{extract::FromRequestParts, http::request::Parts};
use http::HeaderMap;

use crate::core::ServerState;
use crate::utils::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Authenticated caller, as forwarded by the upstream auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: i64,
    pub role: String,
}

impl CallerIdentity {
    /// Parse the identity headers; `None` when either is missing or malformed
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let user_id = headers
            .get(USER_ID_HEADER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)?;
        let role = headers
            .get(USER_ROLE_HEADER)?
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|r| !r.is_empty())?
            .to_string();
        Some(Self { user_id, role })
    }
}

impl FromRequestParts<ServerState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted
        if let Some(caller) = parts.extensions.get::<CallerIdentity>() {
            return Ok(caller.clone());
        }

        match Self::from_headers(&parts.headers) {
            Some(caller) => {
                parts.extensions.insert(caller.clone());
                Ok(caller)
            }
            None => {
                tracing::warn!(target: "security", uri = %parts.uri, "Missing or malformed caller identity");
                Err(AppError::not_authenticated())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(id: Option<&str>, role: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(id) = id {
            map.insert(USER_ID_HEADER, HeaderValue::from_str(id).unwrap());
        }
        if let Some(role) = role {
            map.insert(USER_ROLE_HEADER, HeaderValue::from_str(role).unwrap());
        }
        map
    }

    #[test]
    fn test_parses_identity() {
        let caller = CallerIdentity::from_headers(&headers(Some(" 7 "), Some("sales_associate")));
        assert_eq!(
            caller,
            Some(CallerIdentity {
                user_id: 7,
                role: "sales_associate".into()
            })
        );
    }

    #[test]
    fn test_rejects_missing_or_malformed() {
        assert!(CallerIdentity::from_headers(&headers(None, Some("admin"))).is_none());
        assert!(CallerIdentity::from_headers(&headers(Some("7"), None)).is_none());
        assert!(CallerIdentity::from_headers(&headers(Some("abc"), Some("admin"))).is_none());
        assert!(CallerIdentity::from_headers(&headers(Some("0"), Some("admin"))).is_none());
        assert!(CallerIdentity::from_headers(&headers(Some("7"), Some("  "))).is_none());
    }
}
