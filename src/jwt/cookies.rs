//! Cookie lookup on inbound requests.

use std::collections::HashMap;

/// Anything that can hand out a named request cookie.
pub trait CookieSource {
    /// Returns the first cookie with the given name.
    fn cookie(&self, name: &str) -> Option<String>;
}

impl CookieSource for HashMap<String, String> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Finds `name` in a `Cookie` request header (`a=1; b=2`).
///
/// A value wrapped in double quotes is returned without them.
pub fn parse_cookie_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
                .to_owned()
        })
}

#[cfg(feature = "axum")]
mod http_impls {
    use axum::http::header::COOKIE;
    use axum::http::request::Parts;
    use axum::http::{HeaderMap, Request};

    use super::{CookieSource, parse_cookie_header};

    impl CookieSource for HeaderMap {
        fn cookie(&self, name: &str) -> Option<String> {
            self.get_all(COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .find_map(|header| parse_cookie_header(header, name))
        }
    }

    impl CookieSource for Parts {
        fn cookie(&self, name: &str) -> Option<String> {
            self.headers.cookie(name)
        }
    }

    impl<B> CookieSource for Request<B> {
        fn cookie(&self, name: &str) -> Option<String> {
            self.headers().cookie(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_cookie() {
        assert_eq!(
            parse_cookie_header("access_token=abc.def.ghi", "access_token"),
            Some("abc.def.ghi".to_owned())
        );
    }

    #[test]
    fn test_parse_among_several() {
        let header = "theme=dark; access_token=tok; refresh_token=other";
        assert_eq!(parse_cookie_header(header, "access_token"), Some("tok".to_owned()));
        assert_eq!(parse_cookie_header(header, "refresh_token"), Some("other".to_owned()));
    }

    #[test]
    fn test_first_match_wins() {
        let header = "access_token=first; access_token=second";
        assert_eq!(parse_cookie_header(header, "access_token"), Some("first".to_owned()));
    }

    #[test]
    fn test_quoted_value() {
        assert_eq!(parse_cookie_header("access_token=\"tok\"", "access_token"), Some("tok".to_owned()));
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(parse_cookie_header("theme=dark", "access_token"), None);
        assert_eq!(parse_cookie_header("", "access_token"), None);
        assert_eq!(parse_cookie_header("access_token_old=x", "access_token"), None);
    }

    #[test]
    fn test_hash_map_source() {
        let mut cookies = HashMap::new();
        cookies.insert("access_token".to_owned(), "tok".to_owned());
        assert_eq!(cookies.cookie("access_token"), Some("tok".to_owned()));
        assert_eq!(cookies.cookie("other"), None);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_header_map_source() {
        use axum::http::HeaderMap;
        use axum::http::header::{COOKIE, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("access_token=tok"));
        assert_eq!(headers.cookie("access_token"), Some("tok".to_owned()));
    }
}
