//! Cookie helper for httpOnly session authentication.
//!
//! The session token travels exclusively in a secure, http-only cookie;
//! it never appears in a URL or response body.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

use crate::config::SessionConfig;

/// Cookie helper for the session cookie.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    name: String,
    secure: bool,
    same_site: String,
    domain: String,
    /// Cookie lifetime in seconds, matching the session TTL.
    max_age_secs: i64,
}

impl CookieHelper {
    /// Create a new cookie helper from the session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            same_site: config.cookie_same_site.clone(),
            domain: config.cookie_domain.clone(),
            max_age_secs: config.ttl_secs,
        }
    }

    /// Build a Set-Cookie header value carrying the session token.
    pub fn build_session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly",
            self.name, token, self.max_age_secs
        );

        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.same_site));

        if !self.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.domain));
        }

        cookie
    }

    /// Build a Set-Cookie header value that clears the session cookie.
    pub fn build_clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly",
            self.name
        );

        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.same_site));

        if !self.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.domain));
        }

        cookie
    }

    /// Add the session cookie to a response HeaderMap.
    pub fn add_session_cookie(&self, headers: &mut HeaderMap, token: &str) {
        if let Ok(value) = HeaderValue::from_str(&self.build_session_cookie(token)) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Add a clearing cookie to a response HeaderMap (for logout).
    pub fn add_clear_cookie(&self, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_cookie()) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Extract the session token from request headers.
    pub fn extract_session_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get(axum::http::header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|cookie_header| {
                cookie_header
                    .split(';')
                    .map(|s| s.trim())
                    .find_map(|cookie| {
                        let (cookie_name, cookie_value) = cookie.split_once('=')?;
                        (cookie_name == self.name).then_some(cookie_value)
                    })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn test_config() -> SessionConfig {
        SessionConfig {
            ttl_secs: 604800,
            sliding: false,
            cookie_name: "ce_session".to_string(),
            cookie_secure: true,
            cookie_same_site: "Lax".to_string(),
            cookie_domain: String::new(),
            cleanup_retention_secs: 86400,
        }
    }

    #[test]
    fn test_build_session_cookie() {
        let helper = CookieHelper::new(&test_config());
        let cookie = helper.build_session_cookie("deadbeef");

        assert!(cookie.contains("ce_session=deadbeef"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_build_clear_cookie() {
        let helper = CookieHelper::new(&test_config());
        let cookie = helper.build_clear_cookie();

        assert!(cookie.starts_with("ce_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_cookie_with_domain() {
        let mut config = test_config();
        config.cookie_domain = "chessevents.com".to_string();

        let helper = CookieHelper::new(&config);
        let cookie = helper.build_session_cookie("abc");

        assert!(cookie.contains("Domain=chessevents.com"));
    }

    #[test]
    fn test_cookie_without_secure() {
        let mut config = test_config();
        config.cookie_secure = false;

        let helper = CookieHelper::new(&config);
        let cookie = helper.build_session_cookie("abc");

        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_extract_session_token() {
        let helper = CookieHelper::new(&test_config());
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("other=value; ce_session=abc123; theme=dark"),
        );

        assert_eq!(helper.extract_session_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_extract_session_token_not_found() {
        let helper = CookieHelper::new(&test_config());
        let headers = HeaderMap::new();

        assert_eq!(helper.extract_session_token(&headers), None);
    }

    #[test]
    fn test_add_and_clear_roundtrip() {
        let helper = CookieHelper::new(&test_config());
        let mut headers = HeaderMap::new();
        helper.add_session_cookie(&mut headers, "tok");
        helper.add_clear_cookie(&mut headers);
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }
}
