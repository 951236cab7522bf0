// Session cookie parsing and formatting
// Reads `Cookie` request headers and builds the `Set-Cookie` value for a session

use super::error::SessionError;
use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use std::fmt;

/// Path attached to every session cookie
pub const SESSION_COOKIE_PATH: &str = "/";

/// Read a cookie value by name from the request headers.
///
/// Every `Cookie` header is scanned; the first pair whose name matches wins.
/// Surrounding double quotes on the value are stripped.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| unquote(value.trim()).to_string())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Check that a cookie name is an RFC 7230 token
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}

/// Cookie mirroring a session identifier on the client.
/// Only `Path` is set; no expiry or security attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub path: &'a str,
}

impl<'a> SessionCookie<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            value,
            path: SESSION_COOKIE_PATH,
        }
    }

    /// Encode as a `Set-Cookie` header value
    pub fn to_header_value(&self) -> Result<HeaderValue, SessionError> {
        if !is_valid_cookie_name(self.name) {
            return Err(SessionError::InvalidCookieName(self.name.to_string()));
        }

        HeaderValue::from_str(&self.to_string()).map_err(|e| {
            SessionError::Serialization(format!("Invalid Set-Cookie header: {}", e))
        })
    }
}

impl fmt::Display for SessionCookie<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)
    }
}
