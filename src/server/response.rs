use crate::status::{has_no_entity_body, status_reason};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt::Write as _;
use std::sync::Arc;

/// Response body. Strings are sent as HTML, everything else as JSON.
pub type Body = Value;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path
///
/// Header names use `Arc<str>` since they are mostly repeated static names.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// `SameSite` attribute of a `Set-Cookie` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Value and transport options of an outgoing cookie.
///
/// Deserializable so a cookie can be described by a plain mapping such as
/// `{"value": "nice cat", "max_age": 60}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieOptions {
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    /// Lifetime in seconds
    pub max_age: Option<i64>,
    /// Pre-formatted HTTP date
    pub expires: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

/// One accumulated cookie mutation of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieDirective {
    Set { name: String, options: CookieOptions },
    Delete { name: String, options: CookieOptions },
}

impl CookieDirective {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CookieDirective::Set { name, .. } | CookieDirective::Delete { name, .. } => name,
        }
    }

    #[must_use]
    pub fn options(&self) -> &CookieOptions {
        match self {
            CookieDirective::Set { options, .. } | CookieDirective::Delete { options, .. } => {
                options
            }
        }
    }

    /// Render as a `Set-Cookie` header value (RFC 6265).
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let options = self.options();
        let mut out = String::with_capacity(64);
        out.push_str(&urlencoding::encode(self.name()));
        out.push('=');
        if let CookieDirective::Set { .. } = self {
            out.push_str(&urlencoding::encode(&options.value));
        }
        if let Some(domain) = &options.domain {
            let _ = write!(out, "; Domain={domain}");
        }
        if let Some(path) = &options.path {
            let _ = write!(out, "; Path={path}");
        }
        match self {
            CookieDirective::Set { .. } => {
                if let Some(max_age) = options.max_age {
                    let _ = write!(out, "; Max-Age={max_age}");
                }
                if let Some(expires) = &options.expires {
                    let _ = write!(out, "; Expires={expires}");
                }
            }
            CookieDirective::Delete { .. } => {
                out.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
            }
        }
        if options.secure {
            out.push_str("; Secure");
        }
        if options.http_only {
            out.push_str("; HttpOnly");
        }
        if let Some(same_site) = options.same_site {
            let _ = write!(out, "; SameSite={}", same_site.as_str());
        }
        out
    }
}

/// Outgoing response mutated by the dispatcher and by controller actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: HeaderVec,
    body: Option<Body>,
    cookies: Vec<CookieDirective>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: None,
            cookies: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline]
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Record a set directive, replacing any earlier directive for `name`.
    pub fn set_cookie(&mut self, name: &str, options: CookieOptions) {
        self.push_cookie(CookieDirective::Set {
            name: name.to_string(),
            options,
        });
    }

    /// Record a delete directive, replacing any earlier directive for `name`.
    pub fn delete_cookie(&mut self, name: &str, options: CookieOptions) {
        self.push_cookie(CookieDirective::Delete {
            name: name.to_string(),
            options,
        });
    }

    fn push_cookie(&mut self, directive: CookieDirective) {
        self.cookies.retain(|d| d.name() != directive.name());
        self.cookies.push(directive);
    }

    #[must_use]
    pub fn cookie_directives(&self) -> &[CookieDirective] {
        &self.cookies
    }

    #[must_use]
    pub fn cookie_directive(&self, name: &str) -> Option<&CookieDirective> {
        self.cookies.iter().find(|d| d.name() == name)
    }

    /// One `Set-Cookie` value per accumulated directive, in insertion order.
    #[must_use]
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.cookies
            .iter()
            .map(CookieDirective::to_header_value)
            .collect()
    }

    /// Content type implied by the body shape, unless set explicitly.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        if let Some(explicit) = self.header("content-type") {
            return Some(explicit);
        }
        match self.body.as_ref()? {
            Value::String(_) => Some("text/html; charset=utf-8"),
            _ => Some("application/json"),
        }
    }

    /// Serialized body bytes; `None` for bodyless statuses or an absent body.
    #[must_use]
    pub fn body_bytes(&self) -> Option<Vec<u8>> {
        if has_no_entity_body(self.status) {
            return None;
        }
        match self.body.as_ref()? {
            Value::String(s) => Some(s.clone().into_bytes()),
            other => Some(other.to_string().into_bytes()),
        }
    }

    /// Convert into an `http::Response` for the serving layer.
    ///
    /// # Errors
    ///
    /// Returns an error when the status code or a header value is not valid HTTP.
    pub fn to_http(&self) -> Result<http::Response<Vec<u8>>, http::Error> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_ref(), value.as_str());
        }
        let body = self.body_bytes().unwrap_or_default();
        if !body.is_empty() && self.header("content-type").is_none() {
            if let Some(content_type) = self.content_type() {
                builder = builder.header(http::header::CONTENT_TYPE, content_type);
            }
        }
        for cookie in self.set_cookie_headers() {
            builder = builder.header(http::header::SET_COOKIE, cookie);
        }
        builder.body(body)
    }

    /// Status line reason phrase
    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_cookie_overwrites_previous_directive() {
        let mut res = Response::new();
        res.set_cookie("cat", CookieOptions::new("one").path("/"));
        res.delete_cookie("dog", CookieOptions::default().path("/"));
        res.set_cookie("cat", CookieOptions::new("two").path("/"));
        assert_eq!(res.cookie_directives().len(), 2);
        assert_eq!(res.cookie_directives()[1].options().value, "two");
    }

    #[test]
    fn test_set_cookie_header_rendering() {
        let directive = CookieDirective::Set {
            name: "cat".into(),
            options: CookieOptions::new("nice cat")
                .path("/")
                .max_age(60)
                .secure(true)
                .http_only(true)
                .same_site(SameSite::Lax),
        };
        assert_eq!(
            directive.to_header_value(),
            "cat=nice%20cat; Path=/; Max-Age=60; Secure; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_delete_cookie_header_rendering() {
        let directive = CookieDirective::Delete {
            name: "cat".into(),
            options: CookieOptions::default().path("/"),
        };
        assert_eq!(
            directive.to_header_value(),
            "cat=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_cookie_options_from_mapping() {
        let options: CookieOptions =
            serde_json::from_value(json!({"value": "v", "max_age": 60, "same_site": "strict"}))
                .unwrap();
        assert_eq!(options.value, "v");
        assert_eq!(options.max_age, Some(60));
        assert_eq!(options.same_site, Some(SameSite::Strict));
        assert_eq!(options.path, None);
    }

    #[test]
    fn test_to_http_skips_body_for_no_content() {
        let mut res = Response::new();
        res.set_status(204);
        res.set_body(Some(json!("ignored")));
        let http_res = res.to_http().unwrap();
        assert_eq!(http_res.status(), 204);
        assert!(http_res.body().is_empty());
        assert!(http_res.headers().get("content-type").is_none());
    }

    #[test]
    fn test_to_http_writes_json_and_cookies() {
        let mut res = Response::new();
        res.set_body(Some(json!({"ok": true})));
        res.set_cookie("a", CookieOptions::new("1").path("/"));
        res.set_cookie("b", CookieOptions::new("2").path("/"));
        let http_res = res.to_http().unwrap();
        assert_eq!(http_res.headers()["content-type"], "application/json");
        assert_eq!(http_res.headers().get_all("set-cookie").iter().count(), 2);
        assert_eq!(http_res.body(), br#"{"ok":true}"#);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut res = Response::new();
        res.set_header("Allow", "GET".into());
        res.set_header("allow", "GET, POST".into());
        assert_eq!(res.headers().len(), 1);
        assert_eq!(res.header("ALLOW"), Some("GET, POST"));
    }
}
