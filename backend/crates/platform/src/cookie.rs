//! Cookie helpers
//!
//! Older frontends store the identity token in a cookie instead of sending
//! an `Authorization` header.

use axum::http::{HeaderMap, header};

/// Extract a cookie value from the `Cookie` header(s).
///
/// Multiple `Cookie` headers are searched in order. Values are returned
/// verbatim, so a value containing `=` (base64 padding) is kept whole.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}
